//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by the camera's max depth
//! - Emission from area lights
//! - Anti-aliasing via multi-sampling
//! - Gamma correction and byte quantization for output

use std::io::Write;
use std::time::Instant;

use crate::{Camera, Color, Hittable, Ray};
use ember_core::{write_ppm, PpmError};
use ember_math::Interval;
use rand::RngCore;

/// Rays start this far along their direction to avoid re-hitting the surface
/// they left ("shadow acne").
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// White-to-blue vertical gradient.
    Sky,
    /// Constant color, typically black for scenes lit only by emitters.
    Solid(Color),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background: Background,
    /// Base seed; every bucket derives its own generator from it
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Background::Sky,
            seed: 0,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. Emission at the hit point is added
/// to the attenuated light arriving along the scattered ray; `depth` bounds
/// the number of bounces and is the only termination condition.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY)) else {
        return background_color(ray, &config.background);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Radiance for a ray that hits nothing.
pub fn background_color(ray: &Ray, background: &Background) -> Color {
    match background {
        Background::Sky => sky_gradient(ray),
        Background::Solid(color) => *color,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Map a linear color to display bytes: gamma, clamp to [0, 0.999], scale
/// by 256 and truncate. NaN channels come out as 0.
pub fn color_to_bytes(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let to_byte = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * intensity.clamp(linear_to_gamma(c))) as u8
    };
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, config, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Linear-color image, row-major with the top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Display bytes for every pixel.
    pub fn to_bytes(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_bytes(*c)).collect()
    }

    /// Write the image as a plain-text PPM.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> Result<(), PpmError> {
        write_ppm(writer, self.width, self.height, &self.to_bytes())
    }
}

/// Render the entire scene to an image buffer on the calling thread.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let start = Instant::now();
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!("Rendered {}x{} in {:?}", image.width, image.height, start.elapsed());
    image
}
