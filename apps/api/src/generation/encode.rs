//! PNG serialization of the finished raster.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::errors::AppError;

/// Encodes `image` as an 8-bit RGBA PNG, pixel-exact.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, AppError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| AppError::Encoding(format!("encode png: {e}")))?;
    Ok(cursor.into_inner())
}
