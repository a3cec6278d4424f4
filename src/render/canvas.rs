use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use kurbo::Shape;
use smallvec::SmallVec;

use crate::{
    assets::image::PreparedImage,
    foundation::{
        core::{Affine, Placement, Rgba8, Vec2},
        error::{ThemeError, ThemeResult},
    },
    render::text::FontBook,
    scene::{
        graph::{CircleClip, Scene},
        node::{ImageContent, ImageNode, Node, NodeKind, Paint, TextAlign, TextStyle},
    },
    sprite::player::SpriteAnimation,
    widgets::donut::arc_sweep_deg,
};

const PATH_TOLERANCE: f64 = 0.1;

/// One rendered frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

/// Rasterizes whole scenes with `vello_cpu`.
pub struct CanvasRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    fonts: FontBook,
    images: HashMap<u64, vello_cpu::Image>,
    frames: HashMap<(u64, u32), vello_cpu::Image>,
    used_images: HashSet<u64>,
    used_frames: HashSet<(u64, u32)>,
    rejected: HashSet<u64>,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("fonts", &self.fonts)
            .field("cached_images", &self.images.len())
            .field("cached_frames", &self.frames.len())
            .finish()
    }
}

impl CanvasRenderer {
    /// Renderer drawing text with `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            ctx: None,
            fonts,
            images: HashMap::new(),
            frames: HashMap::new(),
            used_images: HashSet::new(),
            used_frames: HashSet::new(),
            rejected: HashSet::new(),
        }
    }

    /// Registered fonts.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Registered fonts, for adding document fonts.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Laid-out size of `text`, if a font is available.
    pub fn measure_text(&mut self, text: &str, style: &TextStyle) -> Option<(f64, f64)> {
        self.fonts
            .layout(text, style, None)
            .map(|b| (b.width, b.height))
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ThemeResult<R>,
    ) -> ThemeResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Paint the whole scene over `background`, then `overlay` on top of everything.
    ///
    /// Round canvases are masked to their circle, background included.
    #[tracing::instrument(level = "trace", skip_all, fields(nodes = scene.len()))]
    pub fn render(
        &mut self,
        scene: &Scene,
        background: Rgba8,
        overlay: Option<&Node>,
    ) -> ThemeResult<FrameRGBA> {
        let canvas = scene.canvas();
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ThemeError::render("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ThemeError::render("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ThemeError::render("canvas has zero area"));
        }

        self.used_images.clear();
        self.used_frames.clear();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.with_ctx_mut(w, h, |this, ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            if !background.is_invisible() {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color(background));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(w),
                    f64::from(h),
                ));
            }
            for (_, node) in scene.iter() {
                this.draw_node(ctx, node, Affine::IDENTITY, 1.0);
            }
            if let Some(node) = overlay {
                this.draw_node(ctx, node, Affine::IDENTITY, 1.0);
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        let mut frame = FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        if let Some(clip) = scene.clip() {
            apply_circle_clip(&mut frame, clip);
        }

        let used_images = &self.used_images;
        self.images.retain(|k, _| used_images.contains(k));
        let used_frames = &self.used_frames;
        self.frames.retain(|k, _| used_frames.contains(k));
        self.rejected.retain(|id| {
            used_images.contains(id) || used_frames.iter().any(|(strip, _)| strip == id)
        });
        Ok(frame)
    }

    fn draw_node(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        node: &Node,
        parent: Affine,
        opacity_mul: f32,
    ) {
        let p = &node.placement;
        if !p.visible {
            return;
        }
        let opacity = (p.opacity as f32 * opacity_mul).clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        match &node.kind {
            NodeKind::Group { children } => {
                let tr = parent
                    * p.to_affine()
                    * Affine::translate(Vec2::new(p.width / 2.0, p.height / 2.0));
                for child in children {
                    self.draw_node(ctx, child, tr, opacity);
                }
            }
            NodeKind::Rect { rx, ry } => {
                let r = rx.max(*ry).max(0.0);
                let rect = kurbo::Rect::new(0.0, 0.0, p.width, p.height);
                let path = if r > 0.0 {
                    kurbo::RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
                } else {
                    rect.to_path(PATH_TOLERANCE)
                };
                fill_and_stroke(ctx, &path, &node.paint, parent * p.to_affine(), opacity);
            }
            NodeKind::Circle {
                radius,
                start_angle,
                end_angle,
            } => {
                if let Some(path) = arc_path(*radius, *start_angle, *end_angle) {
                    fill_and_stroke(ctx, &path, &node.paint, parent * p.to_affine(), opacity);
                }
            }
            NodeKind::Text { text, style } => {
                self.draw_text(ctx, p, text, style, parent, opacity);
            }
            NodeKind::Image(img) => self.draw_image(ctx, p, img, parent, opacity),
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        placement: &Placement,
        text: &str,
        style: &TextStyle,
        parent: Affine,
        opacity: f32,
    ) {
        if text.is_empty() {
            return;
        }
        let max_width = if style.wrap && placement.width > 0.0 {
            Some(placement.width)
        } else {
            None
        };
        let Some(block) = self.fonts.layout(text, style, max_width) else {
            return;
        };

        let mut boxed = *placement;
        boxed.width = match max_width {
            Some(w) => w.max(block.width),
            None => block.width,
        };
        boxed.height = block.height;

        ctx.set_transform(affine_to_cpu(parent * boxed.to_affine()));
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        if let Some(bg) = style.background {
            ctx.set_paint(color(bg));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                boxed.width,
                boxed.height,
            ));
        }
        for line in block.layout.lines() {
            let advance = f64::from(line.metrics().advance);
            let dx = match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (boxed.width - advance) / 2.0,
                TextAlign::Right => boxed.width - advance,
            } as f32;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x + dx,
                    y: g.y,
                });
                ctx.glyph_run(&block.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        if opacity < 1.0 {
            ctx.pop_layer();
        }
    }

    fn draw_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        placement: &Placement,
        img: &ImageNode,
        parent: Affine,
        opacity: f32,
    ) {
        let paint = match &img.content {
            ImageContent::Static(image) => self.static_paint(image),
            ImageContent::Sprite(anim) => self.sprite_paint(anim),
            ImageContent::Pending | ImageContent::Failed => return,
        };
        let Some((paint, iw, ih)) = paint else {
            return;
        };
        let (iw, ih) = (f64::from(iw), f64::from(ih));

        let mut boxed = *placement;
        if boxed.width <= 0.0 || boxed.height <= 0.0 {
            boxed.width = iw;
            boxed.height = ih;
        }
        let tr = parent
            * boxed.to_affine()
            * Affine::scale_non_uniform(boxed.width / iw, boxed.height / ih);

        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
    }

    fn static_paint(&mut self, image: &PreparedImage) -> Option<(vello_cpu::Image, u32, u32)> {
        self.used_images.insert(image.id);
        if let Some(p) = self.images.get(&image.id) {
            return Some((p.clone(), image.width, image.height));
        }
        if self.rejected.contains(&image.id) {
            return None;
        }
        match rgba_premul_to_image(&image.rgba8_premul, image.width, image.height) {
            Ok(p) => {
                self.images.insert(image.id, p.clone());
                Some((p, image.width, image.height))
            }
            Err(err) => {
                tracing::warn!(image = image.id, error = %err, "image cannot be drawn");
                self.rejected.insert(image.id);
                None
            }
        }
    }

    fn sprite_paint(&mut self, anim: &SpriteAnimation) -> Option<(vello_cpu::Image, u32, u32)> {
        let art = &anim.artifact;
        let frame = anim.state.frame_index % art.frame_count.max(1);
        let key = (art.strip.id, frame);
        self.used_frames.insert(key);
        if let Some(p) = self.frames.get(&key) {
            return Some((p.clone(), art.frame_width, art.frame_height));
        }
        if self.rejected.contains(&art.strip.id) {
            return None;
        }
        let bytes = art.frame_premul(frame);
        match rgba_premul_to_image(&bytes, art.frame_width, art.frame_height) {
            Ok(p) => {
                self.frames.insert(key, p.clone());
                Some((p, art.frame_width, art.frame_height))
            }
            Err(err) => {
                tracing::warn!(strip = art.strip.id, error = %err, "sprite frame cannot be drawn");
                self.rejected.insert(art.strip.id);
                None
            }
        }
    }
}

/// Outline of a circle or arc in its `2r x 2r` box; `None` when nothing would be visible.
pub fn arc_path(radius: f64, start_deg: f64, end_deg: f64) -> Option<kurbo::BezPath> {
    let sweep = arc_sweep_deg(start_deg, end_deg);
    if !(radius > 0.0) || !(sweep > 0.0) {
        return None;
    }
    let arc = kurbo::Arc {
        center: kurbo::Point::new(radius, radius),
        radii: Vec2::new(radius, radius),
        start_angle: start_deg.to_radians(),
        sweep_angle: sweep.to_radians(),
        x_rotation: 0.0,
    };
    Some(kurbo::BezPath::from_iter(arc.path_elements(PATH_TOLERANCE)))
}

/// Filled outline of `path` stroked at `width`, dashed by `dash` when it has any length.
///
/// Odd-length dash lists repeat once so on/off parity alternates per cycle.
pub fn stroke_outline(path: &kurbo::BezPath, width: f64, dash: &[f64]) -> kurbo::BezPath {
    let mut style = kurbo::Stroke::new(width)
        .with_caps(kurbo::Cap::Butt)
        .with_join(kurbo::Join::Miter);
    let mut pattern: SmallVec<[f64; 16]> = dash
        .iter()
        .copied()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .collect();
    if pattern.len() % 2 == 1 {
        let copy = pattern.clone();
        pattern.extend_from_slice(&copy);
    }
    if pattern.iter().sum::<f64>() > 0.0 {
        style = style.with_dashes(0.0, pattern);
    }
    kurbo::stroke(
        path.iter(),
        &style,
        &kurbo::StrokeOpts::default(),
        PATH_TOLERANCE,
    )
}

fn fill_and_stroke(
    ctx: &mut vello_cpu::RenderContext,
    path: &kurbo::BezPath,
    paint: &Paint,
    tr: Affine,
    opacity: f32,
) {
    let stroke = paint
        .stroke
        .filter(|_| paint.stroke_width > 0.0 && paint.stroke_width.is_finite());
    if paint.fill.is_none() && stroke.is_none() {
        return;
    }
    ctx.set_transform(affine_to_cpu(tr));
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    if let Some(fill) = paint.fill {
        ctx.set_paint(color(fill));
        ctx.fill_path(&bezpath_to_cpu(path));
    }
    if let Some(stroke) = stroke {
        let outline = stroke_outline(path, paint.stroke_width, &paint.dash);
        ctx.set_paint(color(stroke));
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

/// Scale every pixel outside the circle towards transparent, with a one-pixel soft edge.
pub fn apply_circle_clip(frame: &mut FrameRGBA, clip: CircleClip) {
    let w = frame.width as usize;
    for (i, px) in frame.data.chunks_exact_mut(4).enumerate() {
        let x = (i % w) as f64 + 0.5 - clip.cx;
        let y = (i / w) as f64 + 0.5 - clip.cy;
        let coverage = (clip.radius - (x * x + y * y).sqrt() + 0.5).clamp(0.0, 1.0);
        if coverage >= 1.0 {
            continue;
        }
        for c in px {
            *c = (f64::from(*c) * coverage).round() as u8;
        }
    }
}

fn color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ThemeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ThemeError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ThemeError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ThemeError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ThemeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
