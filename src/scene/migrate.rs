use crate::{
    scene::document::{PrimitiveDoc, SceneDocument},
    theme::icons::weather_icon_path,
};

/// Rewrite document fields saved under older conventions. Returns the number of primitives
/// changed.
///
/// Weather icon images get their `src` recomputed from the stored icon code so that themes
/// saved with a previous asset layout still resolve.
pub fn migrate_document(doc: &mut SceneDocument) -> usize {
    let Some(canvas) = doc.canvas_json.as_mut() else {
        return 0;
    };
    canvas.objects.iter_mut().map(migrate_primitive).sum()
}

fn migrate_primitive(obj: &mut PrimitiveDoc) -> usize {
    let mut changed = 0;
    if let Some(children) = obj.objects.as_mut() {
        changed += children.iter_mut().map(migrate_primitive).sum::<usize>();
    }

    let Some(data) = obj.data.as_ref().and_then(serde_json::Value::as_object) else {
        return changed;
    };
    let is_weather_icon = data.get("sensor").and_then(|v| v.as_str()) == Some("weather")
        && data.get("attribute").and_then(|v| v.as_str()) == Some("icon");
    if !is_weather_icon {
        return changed;
    }

    let Some(code) = data.get("value").and_then(|v| v.as_str()) else {
        return changed;
    };
    match weather_icon_path(code) {
        Some(path) => {
            if obj.src.as_deref() != Some(path) {
                tracing::debug!(code, from = ?obj.src, to = path, "migrated weather icon source");
                obj.src = Some(path.to_owned());
                changed += 1;
            }
        }
        None => tracing::warn!(code, "unknown weather icon code, keeping stored source"),
    }
    changed
}

#[cfg(test)]
#[path = "../../tests/unit/scene/migrate.rs"]
mod tests;
