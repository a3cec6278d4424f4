use std::f64::consts::PI;

use smallvec::SmallVec;

use crate::{
    foundation::error::{ThemeError, ThemeResult},
    scene::node::{Node, NodeKind},
    theme::item::ThemeItem,
    widgets::WidgetUpdate,
};

/// Dash length when the item does not configure one.
pub const DEFAULT_SEGMENT_WIDTH: f64 = 5.0;
/// Gap length when the item does not configure one.
pub const DEFAULT_SEGMENT_GAP: f64 = 0.0;

/// Foreground arc of a donut for one value.
#[derive(Clone, Debug, PartialEq)]
pub struct DonutGeometry {
    /// Foreground sweep in degrees.
    pub sweep_deg: f64,
    /// Stroke dash pattern covering exactly the progress length.
    pub dash: SmallVec<[f64; 16]>,
}

/// Dash pattern `[seg, gap, seg, gap, ..., rest]` whose total equals `progress`.
pub fn donut_dash(progress: f64, segment: f64, gap: f64) -> SmallVec<[f64; 16]> {
    let mut out = SmallVec::new();
    if !(progress > 0.0) || !(segment > 0.0) {
        return out;
    }
    let gap = gap.max(0.0);
    let mut left = progress;
    while left > 0.0 {
        if left <= segment {
            out.push(left);
            break;
        }
        out.push(segment);
        out.push(gap);
        left -= segment + gap;
    }
    out
}

/// Sweep and dash pattern for `value` in `[0, 1]` on a ring of `radius` whose background spans
/// `background_sweep_deg`.
pub fn donut_geometry(
    radius: f64,
    background_sweep_deg: f64,
    value: f64,
    segment: f64,
    gap: f64,
) -> DonutGeometry {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let circumference = 2.0 * PI * radius * (background_sweep_deg / 360.0);
    DonutGeometry {
        sweep_deg: background_sweep_deg * value,
        dash: donut_dash(circumference * value, segment, gap),
    }
}

/// Clockwise sweep of an arc in degrees, in `[0, 360]`; a negative span wraps around.
pub fn arc_sweep_deg(start_angle: f64, end_angle: f64) -> f64 {
    let sweep = end_angle - start_angle;
    if sweep < 0.0 {
        (sweep % 360.0 + 360.0).min(360.0)
    } else {
        sweep.min(360.0)
    }
}

/// Re-dash the foreground arc (second child) against the background arc (first child).
pub fn update_donut(node: &mut Node, item: &ThemeItem, value: f64) -> ThemeResult<WidgetUpdate> {
    let kind = node.kind_name();
    let layers = node
        .children_mut()
        .filter(|c| {
            c.len() >= 2
                && c[..2]
                    .iter()
                    .all(|n| matches!(n.kind, NodeKind::Circle { .. }))
        })
        .ok_or_else(|| {
            ThemeError::invalid_scene(format!("donut widget bound to a {kind} node"))
        })?;

    let NodeKind::Circle {
        start_angle: bg_start,
        end_angle: bg_end,
        ..
    } = layers[0].kind
    else {
        return Ok(WidgetUpdate::Unchanged);
    };

    let segment = item
        .segment_width
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_SEGMENT_WIDTH);
    let gap = item
        .segment_gap
        .filter(|g| *g >= 0.0)
        .unwrap_or(DEFAULT_SEGMENT_GAP);

    let fg = &mut layers[1];
    let NodeKind::Circle {
        radius,
        start_angle,
        end_angle,
    } = &mut fg.kind
    else {
        return Ok(WidgetUpdate::Unchanged);
    };

    let geo = donut_geometry(*radius, arc_sweep_deg(bg_start, bg_end), value, segment, gap);
    let new_end = *start_angle + geo.sweep_deg;
    if (*end_angle - new_end).abs() < 1e-9 && fg.paint.dash == geo.dash {
        return Ok(WidgetUpdate::Unchanged);
    }
    *end_angle = new_end;
    fg.paint.dash = geo.dash;
    Ok(WidgetUpdate::Changed)
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/donut.rs"]
mod tests;
