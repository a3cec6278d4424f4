use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    assets::image::PreparedImage,
    foundation::core::{Placement, Rgba8},
    sprite::player::SpriteAnimation,
};

/// Stable handle of a top-level scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Construct a handle from a raw slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fill and stroke of a vector primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Fill color; `None` paints no interior.
    pub fill: Option<Rgba8>,
    /// Stroke color; `None` paints no outline.
    pub stroke: Option<Rgba8>,
    /// Stroke width in local units.
    pub stroke_width: f64,
    /// Alternating on/off lengths along the outline; empty means solid.
    pub dash: SmallVec<[f64; 16]>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            dash: SmallVec::new(),
        }
    }
}

/// Horizontal text alignment inside the text box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Text styling.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Requested family; falls back to the default font when unknown.
    pub font_family: String,
    /// Font size in px.
    pub font_size: f64,
    /// Glyph color.
    pub fill: Rgba8,
    /// Box background, if any.
    pub background: Option<Rgba8>,
    /// Line alignment.
    pub align: TextAlign,
    /// Wrap at the stored box width (`textbox`) instead of growing with the text.
    pub wrap: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: 40.0,
            fill: Rgba8::BLACK,
            background: None,
            align: TextAlign::Left,
            wrap: false,
        }
    }
}

/// What an image node currently displays.
#[derive(Clone, Debug, Default)]
pub enum ImageContent {
    /// Nothing decoded yet.
    #[default]
    Pending,
    /// A static raster.
    Static(Arc<PreparedImage>),
    /// A sprite strip animation.
    Sprite(SpriteAnimation),
    /// The last load failed and nothing was decoded before.
    Failed,
}

/// Image primitive state including in-flight loads.
#[derive(Clone, Debug, Default)]
pub struct ImageNode {
    /// Source of the displayed content.
    pub source: String,
    /// Displayed content.
    pub content: ImageContent,
    /// Ticket of the load that will define the content.
    pub ticket: Option<u64>,
    /// Source requested by `ticket`.
    pub pending_source: Option<String>,
    /// Ticket of a placeholder preview shown until `ticket` resolves.
    pub preview_ticket: Option<u64>,
}

impl ImageNode {
    /// Unloaded image referencing `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// True while a load is outstanding.
    pub fn is_pending(&self) -> bool {
        self.ticket.is_some() || self.preview_ticket.is_some()
    }

    /// Intrinsic size of the displayed content.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match &self.content {
            ImageContent::Static(img) => Some((img.width, img.height)),
            ImageContent::Sprite(anim) => {
                Some((anim.artifact.frame_width, anim.artifact.frame_height))
            }
            ImageContent::Pending | ImageContent::Failed => None,
        }
    }
}

/// Primitive-specific payload.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Rectangle filling the placement box.
    Rect {
        /// Corner radius x.
        rx: f64,
        /// Corner radius y.
        ry: f64,
    },
    /// Circle or arc centered in a `2r x 2r` box; angles in degrees, clockwise from +x.
    Circle {
        /// Radius.
        radius: f64,
        /// Arc start.
        start_angle: f64,
        /// Arc end.
        end_angle: f64,
    },
    /// Text run.
    Text {
        /// Displayed string.
        text: String,
        /// Styling.
        style: TextStyle,
    },
    /// Raster or sprite image.
    Image(ImageNode),
    /// Children positioned relative to the group's center.
    Group {
        /// Child primitives in paint order.
        children: Vec<Node>,
    },
}

/// One visual primitive.
#[derive(Clone, Debug)]
pub struct Node {
    /// Optional editor name.
    pub name: Option<String>,
    /// Position, size and transform.
    pub placement: Placement,
    /// Fill/stroke for vector kinds.
    pub paint: Paint,
    /// Kind-specific payload.
    pub kind: NodeKind,
}

impl Node {
    /// Node of `kind` with default paint.
    pub fn new(kind: NodeKind, placement: Placement) -> Self {
        Self {
            name: None,
            placement,
            paint: Paint::default(),
            kind,
        }
    }

    /// Group children, if this is a group.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Mutable group children, if this is a group.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Image state, if this is an image.
    pub fn image(&self) -> Option<&ImageNode> {
        match &self.kind {
            NodeKind::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Mutable image state, if this is an image.
    pub fn image_mut(&mut self) -> Option<&mut ImageNode> {
        match &mut self.kind {
            NodeKind::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Displayed text, if this is a text node.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Short kind label for logs and errors.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Rect { .. } => "rect",
            NodeKind::Circle { .. } => "circle",
            NodeKind::Text { .. } => "text",
            NodeKind::Image(_) => "image",
            NodeKind::Group { .. } => "group",
        }
    }
}
