/// A closed range of reals `[min, max]`.
///
/// Used both for ray-parameter bounds and for clamping color channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Inclusive membership test.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive membership test.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Grows the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Shifts both bounds by a scalar displacement.
    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// The tightest interval enclosing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Same interval with the upper bound lowered to `max`.
    #[inline]
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(-1.0, 1.0);

        assert!(interval.contains(-1.0));
        assert!(interval.contains(1.0));
        assert!(interval.contains(0.3));
        assert!(!interval.contains(1.0001));
    }

    #[test]
    fn test_interval_surrounds_is_exclusive() {
        let interval = Interval::new(0.0, 2.0);

        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(2.0));
        assert!(interval.surrounds(1.0));
    }

    #[test]
    fn test_interval_clamp() {
        let display = Interval::new(0.0, 0.999);

        assert_eq!(display.clamp(-3.0), 0.0);
        assert_eq!(display.clamp(0.5), 0.5);
        assert_eq!(display.clamp(1.0), 0.999);
    }

    #[test]
    fn test_interval_expand_pads_both_sides() {
        let thin = Interval::new(2.0, 2.0).expand(0.5);

        assert_eq!(thin.min, 1.75);
        assert_eq!(thin.max, 2.25);
    }

    #[test]
    fn test_interval_surrounding_and_empty() {
        let joined = Interval::surrounding(&Interval::EMPTY, &Interval::new(1.0, 3.0));
        assert_eq!(joined, Interval::new(1.0, 3.0));

        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(1e30));
    }

    #[test]
    fn test_interval_with_max() {
        let shrunk = Interval::new(0.001, f32::INFINITY).with_max(4.0);
        assert_eq!(shrunk, Interval::new(0.001, 4.0));
    }
}
