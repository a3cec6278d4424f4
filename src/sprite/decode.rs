use std::io::Cursor;

use image::{AnimationDecoder, ImageFormat, RgbaImage, imageops};

use crate::{
    assets::image::PreparedImage,
    foundation::error::{ThemeError, ThemeResult},
};

/// Delay used when every decoded frame reports a zero delay.
pub const DEFAULT_FRAME_DELAY_MS: f64 = 100.0;

/// What happens to the accumulation buffer before a frame is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// Draw over whatever previous frames left behind.
    Keep,
    /// Clear the buffer first.
    Clear,
}

/// One decoded frame patch in straight RGBA8.
#[derive(Clone, Debug)]
pub struct RawFrame {
    /// Patch x offset in the logical screen.
    pub left: u32,
    /// Patch y offset in the logical screen.
    pub top: u32,
    /// Patch width.
    pub width: u32,
    /// Patch height.
    pub height: u32,
    /// Disposal applied before drawing this patch.
    pub disposal: Disposal,
    /// Frame delay in milliseconds.
    pub delay_ms: f64,
    /// Patch pixels, straight RGBA8.
    pub rgba: Vec<u8>,
}

/// Frames plus the logical screen they are positioned on.
#[derive(Clone, Debug)]
pub struct DecodedFrames {
    /// Logical screen width.
    pub width: u32,
    /// Logical screen height.
    pub height: u32,
    /// Frames in display order.
    pub frames: Vec<RawFrame>,
}

/// Optional bounds applied while packing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpriteLimits {
    /// Fit width.
    pub max_width: Option<u32>,
    /// Fit height.
    pub max_height: Option<u32>,
    /// Total duration cap in milliseconds.
    pub max_duration_ms: Option<f64>,
}

/// Packed strip with uniform frame timing.
#[derive(Clone, Debug)]
pub struct SpriteArtifact {
    /// All frames side by side, premultiplied.
    pub strip: PreparedImage,
    /// Width of one frame.
    pub frame_width: u32,
    /// Height of one frame (and of the strip).
    pub frame_height: u32,
    /// Number of frames in the strip.
    pub frame_count: u32,
    /// Mean frame delay.
    pub delay_ms: f64,
}

impl SpriteArtifact {
    /// Source rectangle `(x, y, w, h)` of frame `index` in the strip.
    pub fn frame_rect(&self, index: u32) -> (u32, u32, u32, u32) {
        let i = index % self.frame_count.max(1);
        (i * self.frame_width, 0, self.frame_width, self.frame_height)
    }

    /// Copy frame `index` out of the strip as premultiplied RGBA8.
    pub fn frame_premul(&self, index: u32) -> Vec<u8> {
        let (x, _, w, h) = self.frame_rect(index);
        let stride = self.strip.width as usize * 4;
        let mut out = Vec::with_capacity(w as usize * h as usize * 4);
        for row in 0..h as usize {
            let start = row * stride + x as usize * 4;
            out.extend_from_slice(&self.strip.rgba8_premul[start..start + w as usize * 4]);
        }
        out
    }
}

/// Decode animated bytes and pack them into a sprite strip.
#[tracing::instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn decode_sprite(bytes: &[u8], limits: SpriteLimits) -> ThemeResult<SpriteArtifact> {
    let decoded = decode_frames(bytes)?;
    pack_frames(decoded, limits)
}

/// Decode GIF, animated WebP and APNG into frames; any other raster is a single frame.
pub fn decode_frames(bytes: &[u8]) -> ThemeResult<DecodedFrames> {
    let format = image::guess_format(bytes)
        .map_err(|e| ThemeError::decode(format!("unrecognized image format: {e}")))?;

    let frames = match format {
        ImageFormat::Gif => {
            let dec = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
                .map_err(|e| ThemeError::decode(format!("gif header: {e}")))?;
            collect(dec)?
        }
        ImageFormat::WebP => {
            let dec = image::codecs::webp::WebPDecoder::new(Cursor::new(bytes))
                .map_err(|e| ThemeError::decode(format!("webp header: {e}")))?;
            if dec.has_animation() {
                collect(dec)?
            } else {
                single(bytes)?
            }
        }
        ImageFormat::Png => {
            let dec = image::codecs::png::PngDecoder::new(Cursor::new(bytes))
                .map_err(|e| ThemeError::decode(format!("png header: {e}")))?;
            if dec.is_apng().unwrap_or(false) {
                let apng = dec
                    .apng()
                    .map_err(|e| ThemeError::decode(format!("apng: {e}")))?;
                collect(apng)?
            } else {
                single(bytes)?
            }
        }
        _ => single(bytes)?,
    };

    let (width, height) = frames
        .first()
        .map(|f| (f.left + f.width, f.top + f.height))
        .unwrap_or((0, 0));
    Ok(DecodedFrames {
        width,
        height,
        frames,
    })
}

// The image decoders hand back frames already composited onto the full logical screen.
fn collect<'a>(dec: impl AnimationDecoder<'a>) -> ThemeResult<Vec<RawFrame>> {
    let frames = dec
        .into_frames()
        .collect_frames()
        .map_err(|e| ThemeError::decode(format!("decode frames: {e}")))?;
    Ok(frames
        .into_iter()
        .map(|f| {
            let (numer, denom) = f.delay().numer_denom_ms();
            let delay_ms = if denom == 0 {
                0.0
            } else {
                f64::from(numer) / f64::from(denom)
            };
            let buf = f.into_buffer();
            let (width, height) = buf.dimensions();
            RawFrame {
                left: 0,
                top: 0,
                width,
                height,
                disposal: Disposal::Clear,
                delay_ms,
                rgba: buf.into_raw(),
            }
        })
        .collect())
}

fn single(bytes: &[u8]) -> ThemeResult<Vec<RawFrame>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ThemeError::decode(format!("decode image from memory: {e}")))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(vec![RawFrame {
        left: 0,
        top: 0,
        width,
        height,
        disposal: Disposal::Clear,
        delay_ms: 0.0,
        rgba: img.into_raw(),
    }])
}

/// Composite frames into a strip: mean delay, duration truncation, uniform scale.
pub fn pack_frames(decoded: DecodedFrames, limits: SpriteLimits) -> ThemeResult<SpriteArtifact> {
    let DecodedFrames {
        width,
        height,
        mut frames,
    } = decoded;
    if frames.is_empty() {
        return Err(ThemeError::EmptyAnimation);
    }
    if width == 0 || height == 0 {
        return Err(ThemeError::decode("animation has an empty logical screen"));
    }

    let mean = frames.iter().map(|f| f.delay_ms).sum::<f64>() / frames.len() as f64;
    let delay_ms = if mean > 0.0 {
        mean
    } else {
        DEFAULT_FRAME_DELAY_MS
    };

    if let Some(max) = limits.max_duration_ms.filter(|m| *m > 0.0) {
        let duration = frames.len() as f64 * delay_ms;
        if duration > max {
            let keep = ((max / delay_ms).ceil() as usize).max(1);
            frames.truncate(keep);
        }
    }

    let max_w = f64::from(limits.max_width.unwrap_or(width));
    let max_h = f64::from(limits.max_height.unwrap_or(height));
    let scale = (max_w / f64::from(width)).min(max_h / f64::from(height));
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ThemeError::decode("sprite limits produce an empty frame"));
    }
    let out_w = ((f64::from(width) * scale).round() as u32).max(1);
    let out_h = ((f64::from(height) * scale).round() as u32).max(1);
    let count = frames.len() as u32;

    let mut accum = RgbaImage::new(out_w, out_h);
    let mut strip = RgbaImage::new(out_w.saturating_mul(count), out_h);
    for (i, frame) in frames.into_iter().enumerate() {
        if frame.disposal == Disposal::Clear {
            accum.pixels_mut().for_each(|p| p.0 = [0, 0, 0, 0]);
        }
        let patch = RgbaImage::from_raw(frame.width, frame.height, frame.rgba)
            .ok_or_else(|| ThemeError::decode(format!("frame {i} has a truncated pixel buffer")))?;
        let patch = if scale == 1.0 {
            patch
        } else {
            let pw = ((f64::from(frame.width) * scale).round() as u32).max(1);
            let ph = ((f64::from(frame.height) * scale).round() as u32).max(1);
            imageops::resize(&patch, pw, ph, imageops::FilterType::Triangle)
        };
        let x = (f64::from(frame.left) * scale).round() as i64;
        let y = (f64::from(frame.top) * scale).round() as i64;
        imageops::overlay(&mut accum, &patch, x, y);
        imageops::replace(&mut strip, &accum, i as i64 * i64::from(out_w), 0);
    }

    let (sw, sh) = strip.dimensions();
    let strip = PreparedImage::from_straight(sw, sh, strip.into_raw())?;
    tracing::debug!(
        frames = count,
        frame_width = out_w,
        frame_height = out_h,
        delay_ms,
        "packed sprite strip"
    );
    Ok(SpriteArtifact {
        strip,
        frame_width: out_w,
        frame_height: out_h,
        frame_count: count,
        delay_ms,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/decode.rs"]
mod tests;
