//! Ember Core - image input and output for the renderer.
//!
//! This crate provides:
//!
//! - **Texture images**: decoding image files into RGBA8 buffers with
//!   edge-clamped pixel lookup
//! - **PPM output**: the plain-text `P3` raster format

pub mod ppm;
pub mod texture;

// Re-export commonly used types
pub use ppm::{write_ppm, PpmError};
pub use texture::{srgb_to_linear, TextureError, TextureImage, TextureResult};
