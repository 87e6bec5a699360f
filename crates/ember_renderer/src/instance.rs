//! Instance wrappers that place an inner hittable in world space.
//!
//! Both wrappers move the incoming ray into the inner object's local frame,
//! delegate the test, and move the resulting hit back out.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use ember_math::{Aabb, Interval, Mat3, Mat4, Mat4Ext, Vec3};

/// Inner object displaced by a fixed offset.
pub struct Translate<H: Hittable> {
    object: H,
    offset: Vec3,
    bbox: Aabb,
}

impl<H: Hittable> Translate<H> {
    pub fn new(object: H, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl<H: Hittable> Hittable for Translate<H> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&local_ray, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Inner object rotated about the world Y axis.
pub struct RotateY<H: Hittable> {
    object: H,
    /// Local-to-world rotation
    to_world: Mat3,
    /// World-to-local rotation (the transpose of `to_world`)
    to_local: Mat3,
    bbox: Aabb,
}

impl<H: Hittable> RotateY<H> {
    /// Rotate `object` by `angle` degrees, counter-clockwise looking down -Y.
    pub fn new(object: H, angle: f32) -> Self {
        let radians = angle.to_radians();
        let to_world = Mat3::from_rotation_y(radians);

        let inner = object.bounding_box();
        let bbox = if inner == Aabb::EMPTY {
            Aabb::EMPTY
        } else {
            Mat4::from_rotation_y(radians).transform_aabb(&inner)
        };

        Self {
            object,
            to_world,
            to_local: to_world.transpose(),
            bbox,
        }
    }
}

impl<H: Hittable> Hittable for RotateY<H> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.to_local * ray.origin(),
            self.to_local * ray.direction(),
            ray.time(),
        );

        // Rotation preserves lengths, so t is the same in both frames
        let mut rec = self.object.hit(&local_ray, ray_t)?;
        rec.p = self.to_world * rec.p;
        rec.normal = self.to_world * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
