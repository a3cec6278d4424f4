use crate::{
    foundation::core::{Canvas, OriginX, Placement, Rgba8},
    scene::node::{Node, NodeKind, TextStyle},
    theme::{item::ThemeItem, locale::Translate},
};

/// Tooltip font size in px.
pub const TOOLTIP_FONT_SIZE: f64 = 14.0;
/// Distance between the tooltip and the top of the hovered node.
pub const TOOLTIP_OFFSET_Y: f64 = 20.0;

/// Label shown for a hovered item: `<sensor> - <attribute>`, both localized.
pub fn tooltip_text(item: &ThemeItem, tr: &dyn Translate) -> String {
    format!(
        "{} - {}",
        tr.translate(&format!("label.{}", item.sensor_label)),
        tr.translate(&format!("label.{}", item.attribute_label))
    )
}

/// Black text on white.
pub fn tooltip_style() -> TextStyle {
    TextStyle {
        font_size: TOOLTIP_FONT_SIZE,
        fill: Rgba8::BLACK,
        background: Some(Rgba8::WHITE),
        ..TextStyle::default()
    }
}

/// Top-left corner of a `size` tooltip for `target`, kept inside the canvas.
pub fn tooltip_position(target: &Placement, size: (f64, f64), canvas: Canvas) -> (f64, f64) {
    let shift = match target.origin_x {
        OriginX::Center => target.width / 2.0,
        _ => target.width,
    };
    let mut left = target.left - shift * target.scale_x;
    let mut top = target.top - TOOLTIP_OFFSET_Y;

    let cw = f64::from(canvas.width);
    if left + size.0 > cw {
        left = cw - size.0;
    }
    left = left.max(0.0);
    if top < 0.0 {
        top = 0.0;
    }
    (left, top)
}

/// Overlay text node for `item` hovering over `target`.
///
/// `measured` is the laid-out text size; without one the size is estimated from the font size.
pub fn build_tooltip(
    item: &ThemeItem,
    target: &Placement,
    tr: &dyn Translate,
    measured: Option<(f64, f64)>,
    canvas: Canvas,
) -> Node {
    let text = tooltip_text(item, tr);
    let style = tooltip_style();
    let size = measured.unwrap_or_else(|| {
        (
            text.chars().count() as f64 * TOOLTIP_FONT_SIZE * 0.6,
            TOOLTIP_FONT_SIZE * 1.2,
        )
    });
    let (left, top) = tooltip_position(target, size, canvas);
    let mut node = Node::new(
        NodeKind::Text { text, style },
        Placement {
            left,
            top,
            width: size.0,
            height: size.1,
            ..Placement::default()
        },
    );
    node.name = Some("tooltip".to_owned());
    node
}

#[cfg(test)]
#[path = "../../tests/unit/player/tooltip.rs"]
mod tests;
