//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: spheres and
//! quads organised in a BVH, diffuse/metal/glass/emissive materials,
//! procedural and image textures, and a thin-lens camera. Images are
//! rendered in buckets on a rayon thread pool.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{reflect, refract, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use quad::{make_box, Quad};
pub use renderer::{
    background_color, color_to_bytes, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig, SHADOW_ACNE_EPSILON,
};
pub use sampling::{gen_f32, gen_range_f32, random_in_unit_disk, random_unit_vector, sample_square};
pub use sphere::Sphere;
pub use texture::{load_image_texture, Checker, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};
