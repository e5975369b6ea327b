//! Signature decoding.
//!
//! Signatures arrive as canvas data URIs (`data:image/png;base64,<payload>`).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, Rgb, RgbImage};

use super::GeneratorError;

/// Strip the data-URI prefix and base64-decode the payload.
pub fn decode_data_uri(value: &str) -> Result<Vec<u8>, GeneratorError> {
    let (_, payload) = value.split_once(',').ok_or_else(|| {
        GeneratorError::SignatureDecode("expected a data URI of the form 'data:<mime>;base64,<payload>'".to_string())
    })?;

    BASE64
        .decode(payload.trim())
        .map_err(|e| GeneratorError::SignatureDecode(format!("payload is not valid base64: {}", e)))
}

/// Decode the signature into an RGB image with transparency flattened onto white.
pub fn decode_signature_image(value: &str) -> Result<DynamicImage, GeneratorError> {
    let bytes = decode_data_uri(value)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| GeneratorError::SignatureDecode(format!("payload is not a supported image: {}", e)))?;

    let rgba = decoded.to_rgba8();
    let mut flattened = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        flattened.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    Ok(DynamicImage::ImageRgb8(flattened))
}
