//! Signature raster decoding and image XObject construction.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Stream};
use std::io::Write;

pub(crate) struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub xobject: Stream,
}

/// Strip an optional `data:<mime>;base64,` header and return the payload.
fn base64_payload(value: &str) -> &str {
    if value.starts_with("data:") {
        value.split_once(',').map_or(value, |(_, rest)| rest)
    } else {
        value
    }
}

/// Decode a data-URL raster into a DeviceRGB image XObject stream.
///
/// Alpha is composited over white so transparent canvas exports keep their
/// appearance on a typical page background. The pixel data is stored with
/// FlateDecode.
pub(crate) fn decode_signature(value: &str) -> Result<DecodedImage, String> {
    let bytes = BASE64
        .decode(base64_payload(value).trim())
        .map_err(|e| format!("invalid base64: {e}"))?;
    let img = image::load_from_memory(&bytes).map_err(|e| format!("unsupported image: {e}"))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err("image has a zero dimension".into());
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let a = u32::from(a);
        for channel in [r, g, b] {
            rgb.push(((u32::from(channel) * a + 255 * (255 - a)) / 255) as u8);
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&rgb)
        .map_err(|e| format!("compression failed: {e}"))?;
    let data = encoder
        .finish()
        .map_err(|e| format!("compression failed: {e}"))?;

    let xobject = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    );

    Ok(DecodedImage {
        width,
        height,
        xobject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([10, 20, 30, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_data_url_and_keeps_dimensions() {
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(png_bytes(4, 2)));
        let decoded = decode_signature(&data_url).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
    }

    #[test]
    fn accepts_bare_base64() {
        let payload = BASE64.encode(png_bytes(2, 2));
        assert!(decode_signature(&payload).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_signature("data:image/png;base64,!!!not-base64!!!").is_err());
        assert!(decode_signature(&BASE64.encode(b"not an image")).is_err());
    }
}
