use base64::Engine as _;
use image::ImageEncoder as _;

use crate::{
    assets::image::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    foundation::{
        core::Rgba8,
        error::{ThemeError, ThemeResult},
    },
    render::canvas::FrameRGBA,
};

/// JPEG quality used for exported previews.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Straight-alpha RGBA8 copy of a frame.
pub fn frame_to_straight_rgba(frame: &FrameRGBA) -> Vec<u8> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    data
}

/// Opaque RGB8 copy of a frame composited over `background`.
pub fn frame_to_rgb_over(frame: &FrameRGBA, background: Rgba8) -> Vec<u8> {
    let premul = if frame.premultiplied {
        std::borrow::Cow::Borrowed(&frame.data)
    } else {
        let mut d = frame.data.clone();
        premultiply_rgba8_in_place(&mut d);
        std::borrow::Cow::Owned(d)
    };
    let bg = [background.r, background.g, background.b];
    let mut out = Vec::with_capacity(premul.len() / 4 * 3);
    for px in premul.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        for c in 0..3 {
            let v = u16::from(px[c]) + (u16::from(bg[c]) * inv + 127) / 255;
            out.push(v.min(255) as u8);
        }
    }
    out
}

/// Encode a frame as PNG (straight alpha).
pub fn export_png(frame: &FrameRGBA) -> ThemeResult<Vec<u8>> {
    let rgba = frame_to_straight_rgba(frame);
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            &rgba,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| ThemeError::render(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Encode a frame as JPEG at `quality` (1..=100), flattened over `background`.
pub fn export_jpeg(frame: &FrameRGBA, background: Rgba8, quality: u8) -> ThemeResult<Vec<u8>> {
    let rgb = frame_to_rgb_over(frame, background);
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode(
            &rgb,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ThemeError::render(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

/// `data:` URL for encoded image bytes.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
