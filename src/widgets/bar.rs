use crate::{
    foundation::error::{ThemeError, ThemeResult},
    scene::node::{Node, NodeKind},
    widgets::WidgetUpdate,
};

/// Foreground width for `value` in `[0, 1]`, clamped to the background.
pub fn bar_width(background_width: f64, value: f64) -> f64 {
    let w = background_width * value;
    if w.is_nan() {
        return 0.0;
    }
    w.clamp(0.0, background_width.max(0.0))
}

/// Resize the foreground layer (second child) against the background (first child).
pub fn update_bar(node: &mut Node, value: f64) -> ThemeResult<WidgetUpdate> {
    let kind = node.kind_name();
    let layers = node
        .children_mut()
        .filter(|c| c.len() >= 2 && c[..2].iter().all(|n| matches!(n.kind, NodeKind::Rect { .. })))
        .ok_or_else(|| {
            ThemeError::invalid_scene(format!("bar widget bound to a {kind} node"))
        })?;

    let width = bar_width(layers[0].placement.width, value);
    let fg = &mut layers[1].placement;
    if (fg.width - width).abs() < 1e-9 {
        return Ok(WidgetUpdate::Unchanged);
    }
    fg.width = width;
    Ok(WidgetUpdate::Changed)
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/bar.rs"]
mod tests;
