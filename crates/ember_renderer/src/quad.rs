//! Planar parallelogram primitive.
//!
//! A quad is the set of points `Q + α·u + β·v` with α, β in [0, 1]. The
//! plane coordinates (α, β) double as the hit's texture coordinates.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// Rays this close to parallel with the plane are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-8;

pub struct Quad<M: Material> {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// Unnormalized plane normal `u × v`
    w: Vec3,
    /// `|u × v|²`, zero for degenerate (colinear) edges
    w_len_sq: f32,
    normal: Vec3,
    /// Plane offset: dot(normal, Q)
    d: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Quad<M> {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: M) -> Self {
        let w = u.cross(v);
        let normal = w.normalize_or_zero();

        // Both diagonals, so any orientation of u and v is enclosed
        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w,
            w_len_sq: w.length_squared(),
            normal,
            d: normal.dot(q),
            material,
            bbox,
        }
    }

    /// True when the edges are colinear and the quad has no area.
    pub fn is_degenerate(&self) -> bool {
        self.w_len_sq == 0.0
    }
}

impl<M: Material> Hittable for Quad<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        if self.is_degenerate() {
            return None;
        }

        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Express the plane hit in (u, v) coordinates
        let planar = ray.at(t) - self.q;
        let alpha = self.w.dot(planar.cross(self.v)) / self.w_len_sq;
        let beta = self.w.dot(self.u.cross(planar)) / self.w_len_sq;

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (alpha, beta), &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Closed box with opposite corners `a` and `b`, made of six quads sharing
/// one material.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];
    for (q, u, v) in faces {
        sides.add(Box::new(Quad::new(q, u, v, material.clone())));
    }

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};

    fn unit_quad() -> Quad<Lambertian> {
        // Unit square in the z = -1 plane, facing +Z
        Quad::new(
            Vec3::new(-0.5, -0.5, -1.0),
            Vec3::X,
            Vec3::Y,
            Lambertian::new(Color::splat(0.5)),
        )
    }

    #[test]
    fn test_quad_hit_center() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        let rec = quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!((rec.u - 0.5).abs() < 1e-6);
        assert!((rec.v - 0.5).abs() < 1e-6);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_quad_uv_follows_edges() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.25, -0.4, 0.0), Vec3::NEG_Z);

        let rec = quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.u - 0.75).abs() < 1e-5);
        assert!((rec.v - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_quad_miss_outside_edges() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.6, 0.0, 0.0), Vec3::NEG_Z);

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(-2.0, 0.0, -1.0), Vec3::X);

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_quad_back_face_flips_normal() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);

        let rec = quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_degenerate_quad_never_hits() {
        let quad = Quad::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::X * 2.0,
            Lambertian::new(Color::ONE),
        );
        assert!(quad.is_degenerate());

        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);
        assert!(quad.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_quad_bbox_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.z.contains(-1.0));
        assert_eq!(bbox.x, Interval::new(-0.5, 0.5));
    }

    #[test]
    fn test_make_box_is_closed() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let cube = make_box(Vec3::ZERO, Vec3::splat(2.0), material);
        assert_eq!(cube.len(), 6);

        // From inside, every axis direction hits a wall at distance 1
        let center = Vec3::ONE;
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let rec = cube
                .hit(&Ray::new_simple(center, dir), Interval::new(0.001, f32::INFINITY))
                .unwrap();
            assert!((rec.t - 1.0).abs() < 1e-5);
        }
    }
}
