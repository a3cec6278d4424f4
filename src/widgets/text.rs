use crate::{
    foundation::error::{ThemeError, ThemeResult},
    scene::node::{Node, NodeKind},
    theme::{
        item::{ItemValue, ThemeItem, WEATHER_PLACEHOLDER},
        locale::Translate,
    },
    widgets::WidgetUpdate,
};

/// Render a bound value as display text.
///
/// - `load`: fraction to integer percent.
/// - `upload_speed` / `download_speed`: bytes/s to `kb/s` (1e3) or `mb/s` (1e6), two decimals.
/// - weather text: the editor placeholder is localized and `℃` becomes `°C`.
///
/// `" <unit>"` is appended when the item asks for it.
pub fn format_text_value(item: &ThemeItem, value: &ItemValue, translator: &dyn Translate) -> String {
    let mut out = match (item.attribute.as_str(), value.as_f64()) {
        ("load", Some(v)) => format!("{}", (v * 100.0).round() as i64),
        ("upload_speed" | "download_speed", Some(v)) => {
            let div = if item.unit.as_deref() == Some("kb/s") {
                1e3
            } else {
                1e6
            };
            // Ties round away from zero.
            format!("{:.2}", (v / div * 100.0).round() / 100.0)
        }
        _ => value.to_display(),
    };

    if item.is_weather_text() {
        if out == WEATHER_PLACEHOLDER {
            out = translator.translate(&format!("label.{WEATHER_PLACEHOLDER}"));
        }
        out = out.replace('\u{2103}', "\u{b0}C");
    }

    if item.show_unit == Some(true) {
        if let Some(unit) = item.unit.as_deref().filter(|u| !u.is_empty()) {
            out.push(' ');
            out.push_str(unit);
        }
    }
    out
}

/// Replace the displayed string; no-op when it is already shown.
pub fn update_text(node: &mut Node, formatted: String) -> ThemeResult<WidgetUpdate> {
    let kind = node.kind_name();
    let NodeKind::Text { text, .. } = &mut node.kind else {
        return Err(ThemeError::invalid_scene(format!(
            "text widget bound to a {kind} node"
        )));
    };
    if *text == formatted {
        return Ok(WidgetUpdate::Unchanged);
    }
    *text = formatted;
    Ok(WidgetUpdate::Changed)
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/text.rs"]
mod tests;
