//! Per-kind update routines for data-bound nodes.
//!
//! Each routine mutates the node in place and reports whether anything visible changed; image
//! swaps are not applied here but returned as a load request for the asset worker.

/// Horizontal progress bar.
pub mod bar;
/// Segmented ring progress.
pub mod donut;
/// Static and animated image sources.
pub mod image;
/// Formatted text output.
pub mod text;

use crate::{
    foundation::error::ThemeResult,
    scene::node::Node,
    theme::{
        item::{ItemValue, ShowType, ThemeItem},
        locale::Translate,
    },
};

/// Result of applying one value to one node.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetUpdate {
    /// The node already showed this value.
    Unchanged,
    /// Geometry or text was updated in place.
    Changed,
    /// The same source is already loading; nothing to do until it lands.
    Pending,
    /// The image must be swapped to `source`.
    Load {
        /// Resolved source string.
        source: String,
        /// Rebuild as a sprite animation instead of a static raster.
        animated: bool,
    },
}

/// Apply `value` to `node` using the routine selected by the item's [`ShowType`].
pub fn apply_widget(
    node: &mut Node,
    item: &ThemeItem,
    value: &ItemValue,
    translator: &dyn Translate,
) -> ThemeResult<WidgetUpdate> {
    match item.show_type {
        ShowType::Text => {
            let formatted = text::format_text_value(item, value, translator);
            text::update_text(node, formatted)
        }
        ShowType::BarChart => bar::update_bar(node, numeric(value)),
        ShowType::DonutChart => donut::update_donut(node, item, numeric(value)),
        ShowType::Image => match image::resolve_image_source(item, value) {
            Some(source) if matches!(value, ItemValue::Media(m) if m.is_animated()) => {
                image::update_animated_image(node, source)
            }
            Some(source) => image::update_image(node, source),
            None => Ok(WidgetUpdate::Unchanged),
        },
    }
}

fn numeric(value: &ItemValue) -> f64 {
    value.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0)
}
