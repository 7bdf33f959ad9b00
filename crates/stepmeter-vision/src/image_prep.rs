//! Photo preprocessing
//!
//! Every capture is normalized before upload: longest edge bounded at
//! 1024 px (aspect kept, never upscaled) and re-encoded as JPEG at quality
//! 80. The extractor and the stored reference photo only ever see this
//! compressed payload, so a 12 MP phone photo does not bloat the snapshot.

use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use stepmeter_types::Result;

/// Longest allowed edge after preprocessing
pub const MAX_DIMENSION: u32 = 1024;
/// JPEG re-encode quality
pub const JPEG_QUALITY: u8 = 80;

/// Base64 JPEG payload ready for an extraction request
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

/// Load a photo from disk and compress it for upload.
pub fn prepare_image(path: &Path) -> Result<CompressedImage> {
    compress(image::open(path)?)
}

/// Compress an already-decoded photo.
pub fn compress(img: DynamicImage) -> Result<CompressedImage> {
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        img
    };

    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    Ok(CompressedImage {
        base64: STANDARD.encode(&buf),
        width: rgb.width(),
        height: rgb.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 150])))
    }

    #[test]
    fn oversized_photos_shrink_to_the_bound() {
        let compressed = compress(solid(2048, 1000)).unwrap();
        assert_eq!(compressed.width, 1024);
        assert_eq!(compressed.height, 500);
    }

    #[test]
    fn portrait_photos_bound_the_height() {
        let compressed = compress(solid(500, 2000)).unwrap();
        assert_eq!(compressed.width, 256);
        assert_eq!(compressed.height, 1024);
    }

    #[test]
    fn small_photos_are_never_upscaled() {
        let compressed = compress(solid(320, 240)).unwrap();
        assert_eq!(compressed.width, 320);
        assert_eq!(compressed.height, 240);
    }

    #[test]
    fn payload_is_base64_jpeg() {
        let compressed = compress(solid(64, 64)).unwrap();
        let bytes = STANDARD.decode(&compressed.base64).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn alpha_images_encode_cleanly() {
        let rgba = RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 128]));
        let compressed = compress(DynamicImage::ImageRgba8(rgba)).unwrap();
        assert!(!compressed.base64.is_empty());
    }
}
