//! Image encoding helpers: base64 wrapping and PNG verification.
//!
//! The inline delivery channel returns the capture as standard base64 text.
//! The rendering engine checks every capture with [`png_dimensions`] before
//! handing it on, so a surface that returns something other than a PNG
//! fails the render instead of producing an unreadable payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use tracing::debug;

/// Standard (padded) base64 of `bytes`.
pub fn encode_base64(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded image → {} bytes base64", b64.len());
    b64
}

/// Pixel size of a PNG byte stream.
///
/// Fails when the bytes are not a PNG or the header cannot be read.
pub fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format() != Some(ImageFormat::Png) {
        return Err(image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown),
            ),
        ));
    }
    reader.into_dimensions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn base64_decodes_back() {
        let bytes = png(10, 10);
        let b64 = encode_base64(&bytes);
        assert_eq!(STANDARD.decode(b64).unwrap(), bytes);
    }

    #[test]
    fn reads_png_dimensions() {
        assert_eq!(png_dimensions(&png(1000, 37)).unwrap(), (1000, 37));
    }

    #[test]
    fn rejects_non_png() {
        assert!(png_dimensions(b"GIF89a not really").is_err());
        assert!(png_dimensions(b"").is_err());
    }
}
