//! Plain-text PPM (`P3`) writer.

use std::io::{self, Write};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PpmError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Expected {expected} pixels for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Write `pixels` (row-major, top row first) as a `P3` image.
///
/// The stream is `"P3\n<width> <height>\n255\n"` followed by one
/// `"R G B\n"` line per pixel.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> Result<(), PpmError> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(PpmError::SizeMismatch {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    write!(writer, "P3\n{} {}\n255\n", width, height)?;
    for [r, g, b] in pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    writer.flush()?;

    Ok(())
}
