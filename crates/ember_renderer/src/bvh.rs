//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built once over the finished scene. Each node caches the
//! union of its children's boxes; traversal prunes any subtree whose box the
//! ray misses and returns exactly what a linear scan would.

use crate::{HitRecord, Hittable, HittableList, Ray};
use ember_math::{Aabb, Interval};

/// BVH node - a branch with two children, a leaf wrapping one object, or
/// an empty placeholder for a scene with nothing in it.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node wrapping a single object.
    Leaf { object: Box<dyn Hittable>, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        let count = objects.len();
        let node = Self::build(objects);

        log::debug!("Built BVH over {} objects, depth {}", count, node.depth());
        node
    }

    /// Recursive BVH construction.
    ///
    /// Median split: sort by bounding-box centroid along the longest axis of
    /// the current bounds, split in half, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box())
        });

        if objects.len() <= 1 {
            return match objects.pop() {
                Some(object) => BvhNode::Leaf { object, bbox },
                None => BvhNode::Empty,
            };
        }

        let axis = bbox.longest_axis();
        objects.sort_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            bbox: Aabb::surrounding(&left.bounding_box(), &right.bounding_box()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of objects stored in leaves.
    pub fn len(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.len() + right.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BvhNode::Empty)
    }
}

impl From<HittableList> for BvhNode {
    fn from(list: HittableList) -> Self {
        BvhNode::new(list.into_objects())
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Sphere};
    use ember_math::Vec3;

    fn row_of_spheres(n: usize) -> Vec<Box<dyn Hittable>> {
        (0..n)
            .map(|i| {
                Box::new(Sphere::new(
                    Vec3::new(i as f32, 0.0, -5.0),
                    0.4,
                    Lambertian::new(Color::splat(0.5)),
                )) as Box<dyn Hittable>
            })
            .collect()
    }

    fn assert_bbox_is_union(node: &BvhNode) {
        if let BvhNode::Branch { left, right, bbox } = node {
            assert_eq!(
                *bbox,
                Aabb::surrounding(&left.bounding_box(), &right.bounding_box())
            );
            assert_bbox_is_union(left);
            assert_bbox_is_union(right);
        }
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(bvh.is_empty());
        assert_eq!(bvh.bounding_box(), Aabb::EMPTY);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_bvh_single_object_is_leaf() {
        let bvh = BvhNode::new(row_of_spheres(1));
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some());
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let bvh = BvhNode::new(row_of_spheres(10));
        assert_eq!(bvh.len(), 10);
        assert!(bvh.depth() >= 4);

        // Ray that hits the sphere at x=5
        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.p.z - (-4.6)).abs() < 0.01);

        // Ray between spheres along -Z misses
        let gap = Ray::new_simple(Vec3::new(5.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(bvh.hit(&gap, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_bvh_bbox_is_union_of_children() {
        let bvh = BvhNode::new(row_of_spheres(13));
        assert_bbox_is_union(&bvh);

        let whole = bvh.bounding_box();
        assert!((whole.x.min - -0.4).abs() < 1e-5);
        assert!((whole.x.max - 12.4).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_from_list() {
        let mut list = HittableList::new();
        for object in row_of_spheres(3) {
            list.add(object);
        }
        let list_bbox = list.bounding_box();

        let bvh = BvhNode::from(list);
        assert_eq!(bvh.len(), 3);
        assert_eq!(bvh.bounding_box(), list_bbox);
    }
}
