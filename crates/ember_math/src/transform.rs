// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 used by instance wrappers.
pub trait Mat4Ext {
    /// Bounding box of all 8 transformed corners of `aabb`.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let (min, max) = aabb.corners().iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), &corner| {
                let p = self.transform_point3(corner);
                (lo.min(p), hi.max(p))
            },
        );

        Aabb::from_points(min, max)
    }
}
