pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color as written in scene documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Construct from channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return this color with alpha scaled by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Premultiplied channels `[r, g, b, a]`.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }

    /// True when the color paints nothing.
    pub fn is_invisible(self) -> bool {
        self.a == 0
    }
}

/// Horizontal anchor of a primitive's `left` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginX {
    /// `left` is the left edge.
    #[default]
    Left,
    /// `left` is the horizontal center.
    Center,
    /// `left` is the right edge.
    Right,
}

/// Vertical anchor of a primitive's `top` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginY {
    /// `top` is the top edge.
    #[default]
    Top,
    /// `top` is the vertical center.
    Center,
    /// `top` is the bottom edge.
    Bottom,
}

/// Placement of a primitive inside its parent (canvas or group).
///
/// The primitive's content occupies the local box `[0, width] x [0, height]`; the origin point
/// selected by `origin_x`/`origin_y` lands on `(left, top)`, and rotation/scale pivot there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Horizontal position of the origin point.
    pub left: f64,
    /// Vertical position of the origin point.
    pub top: f64,
    /// Unscaled content width.
    pub width: f64,
    /// Unscaled content height.
    pub height: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Clockwise rotation in degrees.
    pub angle_deg: f64,
    /// Horizontal anchor.
    pub origin_x: OriginX,
    /// Vertical anchor.
    pub origin_y: OriginY,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Hidden primitives are neither painted nor hit-tested.
    pub visible: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle_deg: 0.0,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
            opacity: 1.0,
            visible: true,
        }
    }
}

impl Placement {
    /// Offset of the origin point inside the local content box.
    pub fn origin_offset(&self) -> Vec2 {
        let x = match self.origin_x {
            OriginX::Left => 0.0,
            OriginX::Center => self.width / 2.0,
            OriginX::Right => self.width,
        };
        let y = match self.origin_y {
            OriginY::Top => 0.0,
            OriginY::Center => self.height / 2.0,
            OriginY::Bottom => self.height,
        };
        Vec2::new(x, y)
    }

    /// Map the local content box into parent space.
    pub fn to_affine(&self) -> Affine {
        // T(left, top) * R(angle) * S(scale) * T(-origin)
        Affine::translate(Vec2::new(self.left, self.top))
            * Affine::rotate(self.angle_deg.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(-self.origin_offset())
    }

    /// Axis-aligned bounds of the content box in parent space.
    pub fn bounds(&self) -> Rect {
        self.to_affine()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// On-screen size after scaling.
    pub fn scaled_size(&self) -> (f64, f64) {
        (
            self.width * self.scale_x.abs(),
            self.height * self.scale_y.abs(),
        )
    }
}

/// Output raster dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
