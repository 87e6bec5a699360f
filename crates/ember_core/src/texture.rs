//! Texture image loading.
//!
//! Decodes an image file into a row-major RGBA8 buffer that the renderer's
//! image texture samples from.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during texture loading.
///
/// A missing file and a file that exists but fails to decode are reported
/// separately so callers can word their fallback warning accordingly.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Texture file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    BadBuffer { width: u32, height: u32, len: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

const BYTES_PER_PIXEL: usize = 4;

/// A decoded RGBA8 image.
#[derive(Clone, Debug)]
pub struct TextureImage {
    width: u32,
    height: u32,
    /// Bytes per row
    stride: usize,
    data: Vec<u8>,
    /// Original file path (for debugging)
    pub path: String,
}

impl TextureImage {
    /// Wrap an existing RGBA8 buffer, row-major with no row padding.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> TextureResult<Self> {
        let stride = width as usize * BYTES_PER_PIXEL;
        if data.len() != stride * height as usize {
            return Err(TextureError::BadBuffer {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
            path: "<memory>".to_string(),
        })
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TextureError::NotFound(path.to_path_buf()));
        }

        let rgba = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut texture = Self::from_rgba(width, height, rgba.into_raw())?;
        texture.path = path.to_string_lossy().to_string();

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            texture.path,
            width,
            height,
            texture.data.len() as f32 / 1024.0
        );

        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// True when there is no pixel data to sample.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA bytes at (x, y), with out-of-range coordinates clamped to the
    /// nearest edge pixel. An empty image yields magenta.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        if self.is_empty() {
            return [255, 0, 255, 255];
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = y * self.stride + x * BYTES_PER_PIXEL;

        let mut out = [0u8; 4];
        out.copy_from_slice(&self.data[idx..idx + BYTES_PER_PIXEL]);
        out
    }
}

/// Convert sRGB byte value to linear float.
pub fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
