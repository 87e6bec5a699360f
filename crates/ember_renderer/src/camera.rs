//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk, sample_square};
use crate::Ray;
use ember_math::Vec3;
use rand::RngCore;

/// Pinhole or thin-lens camera.
///
/// Configure with the `with_*` builders, then call `initialize()` once; the
/// derived basis and pixel grid are fixed from then on.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.1,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set width and derive the height from an aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32, width: u32) -> Self {
        self.image_width = width;
        self.image_height = ((width as f32 / aspect_ratio) as u32).max(1);
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. Angles are in degrees.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.image_width = self.image_width.max(1);
        self.image_height = self.image_height.max(1);
        self.samples_per_pixel = self.samples_per_pixel.max(1);
        self.samples_scale = 1.0 / self.samples_per_pixel as f32;
        self.center = self.look_from;

        // Viewport dimensions on the focus plane
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Orthonormal basis; w points backwards from the view direction
        self.w = (self.look_from - self.look_at).normalize_or_zero();
        self.u = self.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);

        // Viewport edges: u runs left to right, v runs top to bottom
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera initialized: {}x{}, vfov {}, focus {}, defocus {}",
            self.image_width,
            self.image_height,
            self.vfov,
            self.focus_dist,
            self.defocus_angle
        );
    }

    /// Generate a jittered ray for pixel (i, j), from the lens when depth of
    /// field is enabled.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Deterministic ray from the eye through a viewport position, where
    /// `(0, 0)` is the top-left corner and `(1, 1)` the bottom-right.
    pub fn ray_at_viewport(&self, s: f32, t: f32) -> Ray {
        let viewport_u = self.pixel_delta_u * self.image_width as f32;
        let viewport_v = self.pixel_delta_v * self.image_height as f32;
        let upper_left = self.pixel00_loc - 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let target = upper_left + s * viewport_u + t * viewport_v;
        Ray::new_simple(self.center, target - self.center)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    /// Eye position.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// The (u, v, w) viewing basis.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_neg_z(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let mut camera = Camera::new()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.6, 10.0);
        camera.initialize();

        let (u, v, w) = camera.basis();
        for axis in [u, v, w] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(u.dot(v).abs() < 1e-5);
        assert!(v.dot(w).abs() < 1e-5);
        assert!(w.dot(u).abs() < 1e-5);
        assert!((w - Vec3::new(13.0, 2.0, 3.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_camera_center_ray_points_at_look_at() {
        let camera = looking_down_neg_z(100, 100);

        let ray = camera.ray_at_viewport(0.5, 0.5);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction().normalize() - Vec3::NEG_Z).length() < 1e-5);

        // 90 degree fov with focus 1: the top-left corner is at (-1, 1, -1)
        let corner = camera.ray_at_viewport(0.0, 0.0);
        assert!((corner.direction() - Vec3::new(-1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_jitter_stays_in_pixel() {
        let camera = looking_down_neg_z(10, 10);
        let mut rng = StdRng::seed_from_u64(42);

        // Pixel (0, 0) covers x in [-1, -0.8], y in [0.8, 1] on the z = -1 plane
        for _ in 0..200 {
            let ray = camera.get_ray(0, 0, &mut rng);
            let p = ray.at(1.0);
            assert!(p.x >= -1.0 - 1e-5 && p.x <= -0.8 + 1e-5);
            assert!(p.y >= 0.8 - 1e-5 && p.y <= 1.0 + 1e-5);
            assert_eq!(ray.origin(), Vec3::ZERO);
        }
    }

    #[test]
    fn test_camera_defocus_origin_on_lens_disk() {
        let mut camera = Camera::new()
            .with_resolution(20, 20)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(40.0, 10.0, 3.0);
        camera.initialize();

        let radius = 3.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(9);
        let mut moved = false;

        for _ in 0..200 {
            let ray = camera.get_ray(10, 10, &mut rng);
            let o = ray.origin();
            assert!(o.z.abs() < 1e-6);
            assert!(o.length() <= radius + 1e-5);
            moved |= o.length() > 0.0;
        }
        assert!(moved);
    }

    #[test]
    fn test_camera_aspect_ratio() {
        let camera = Camera::new().with_aspect_ratio(2.0, 400);
        assert_eq!(camera.image_width, 400);
        assert_eq!(camera.image_height, 200);

        let tiny = Camera::new().with_aspect_ratio(16.0 / 9.0, 1);
        assert_eq!(tiny.image_height, 1);
    }
}
