//! Textures: a color as a function of surface coordinates and position.

use std::path::Path;
use std::sync::Arc;

use ember_core::{srgb_to_linear, TextureImage};
use ember_math::{Interval, Vec3};
use noise::{NoiseFn, Perlin, Seedable};

use crate::Color;

/// Trait for anything that yields a color at a surface point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

impl<T: Texture + ?Sized> Texture for Arc<T> {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        (**self).value(u, v, p)
    }
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// Spatial (3D) checker alternating between two sub-textures.
pub struct Checker {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    /// `scale` is the edge length of one checker cell in world units.
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Texture sampled from a decoded image, nearest pixel.
pub struct ImageTexture {
    image: TextureImage,
}

impl ImageTexture {
    pub fn new(image: TextureImage) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        // Debug cyan makes missing data obvious in renders
        if self.image.is_empty() {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top to bottom
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;
        let [r, g, b, _] = self.image.pixel(i, j);

        Color::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
    }
}

/// Load an image texture, substituting a solid color if the file is missing
/// or cannot be decoded.
pub fn load_image_texture(path: impl AsRef<Path>, fallback: Color) -> Arc<dyn Texture> {
    match TextureImage::load(path) {
        Ok(image) => Arc::new(ImageTexture::new(image)),
        Err(e) => {
            log::warn!("{}; using solid color {:?} instead", e, fallback);
            Arc::new(SolidColor::new(fallback))
        }
    }
}

/// Octaves summed by `NoiseTexture::turbulence`.
const TURBULENCE_DEPTH: usize = 7;

/// Marble-like procedural texture driven by Perlin turbulence.
pub struct NoiseTexture {
    perlin: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn with_seed(scale: f32, seed: u32) -> Self {
        Self {
            perlin: Perlin::new().set_seed(seed),
            scale,
        }
    }

    fn turbulence(&self, p: Vec3) -> f32 {
        let mut accum = 0.0;
        let mut temp = p.as_dvec3();
        let mut weight = 1.0;

        for _ in 0..TURBULENCE_DEPTH {
            accum += weight * self.perlin.get(temp.to_array());
            weight *= 0.5;
            temp *= 2.0;
        }

        accum.abs() as f32
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.turbulence(p);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}
