use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::foundation::error::{ThemeError, ThemeResult};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug)]
/// Decoded raster in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Process-unique id used as a renderer cache key.
    pub id: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap already premultiplied bytes.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ThemeResult<Self> {
        check_len(width, height, rgba8_premul.len())?;
        Ok(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiply straight RGBA8 bytes.
    pub fn from_straight(width: u32, height: u32, mut rgba: Vec<u8>) -> ThemeResult<Self> {
        check_len(width, height, rgba.len())?;
        premultiply_rgba8_in_place(&mut rgba);
        Self::from_premul(width, height, rgba)
    }

    /// Straight-alpha copy, e.g. for PNG export.
    pub fn to_straight(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

fn check_len(width: u32, height: u32, len: usize) -> ThemeResult<()> {
    let want = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if width == 0 || height == 0 || len != want {
        return Err(ThemeError::decode(format!(
            "image buffer mismatch: {width}x{height} needs {want} bytes, got {len}"
        )));
    }
    Ok(())
}

/// Decode raster (PNG/JPEG/GIF/WebP/BMP) or SVG bytes into premultiplied RGBA8.
///
/// Animated formats decode to their first frame.
pub fn decode_image(bytes: &[u8]) -> ThemeResult<PreparedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ThemeError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedImage::from_straight(width, height, rgba.into_raw())
}

/// Rasterize an SVG document at its intrinsic size.
pub fn rasterize_svg(bytes: &[u8]) -> ThemeResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| ThemeError::decode(format!("parse svg tree: {e}")))?;

    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() {
        return Err(ThemeError::decode("svg has invalid width/height"));
    }
    let width = (size.width().ceil() as u32).max(1);
    let height = (size.height().ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ThemeError::decode("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    PreparedImage::from_premul(width, height, pixmap.data().to_vec())
}

pub(crate) fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(s) = std::str::from_utf8(head) else {
        return false;
    };
    let s = s.trim_start_matches('\u{feff}').trim_start();
    s.starts_with("<svg") || (s.starts_with("<?xml") && s.contains("<svg"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
