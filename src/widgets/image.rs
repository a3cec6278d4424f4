use crate::{
    foundation::error::{ThemeError, ThemeResult},
    scene::node::Node,
    theme::{
        icons::weather_icon_path,
        item::{ItemValue, ThemeItem},
    },
    widgets::WidgetUpdate,
};

/// Image source for a bound value: weather icon codes go through the icon table, everything
/// else is used as the source directly. `None` when nothing can be resolved.
pub fn resolve_image_source(item: &ThemeItem, value: &ItemValue) -> Option<String> {
    if item.is_weather_icon() {
        let code = value.to_display();
        let path = weather_icon_path(&code);
        if path.is_none() {
            tracing::warn!(code = %code, "unknown weather icon code");
        }
        return path.map(str::to_owned);
    }
    Some(value.to_display()).filter(|s| !s.trim().is_empty())
}

/// Request a swap to `source` unless it is already shown or already loading.
pub fn update_image(node: &Node, source: String) -> ThemeResult<WidgetUpdate> {
    let kind = node.kind_name();
    let img = node.image().ok_or_else(|| {
        ThemeError::invalid_scene(format!("image widget bound to a {kind} node"))
    })?;
    match img.pending_source.as_deref() {
        Some(pending) if pending == source => Ok(WidgetUpdate::Pending),
        None if img.source == source => Ok(WidgetUpdate::Unchanged),
        _ => Ok(WidgetUpdate::Load {
            animated: false,
            source,
        }),
    }
}

/// Like [`update_image`], rebuilding the source as a sprite animation.
pub fn update_animated_image(node: &Node, source: String) -> ThemeResult<WidgetUpdate> {
    Ok(match update_image(node, source)? {
        WidgetUpdate::Load { source, .. } => WidgetUpdate::Load {
            source,
            animated: true,
        },
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/image.rs"]
mod tests;
