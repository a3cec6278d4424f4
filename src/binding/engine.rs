use crate::{
    assets::loader::{LoadJob, LoadKind},
    scene::graph::Scene,
    sprite::decode::SpriteLimits,
    theme::{
        clock::{Clock, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, format_date, format_time},
        item::{ItemValue, ThemeItem},
        locale::Translate,
        snapshot::SensorSnapshot,
    },
    widgets::{WidgetUpdate, apply_widget},
};

/// Literal shown by `frontend/custom_text` nodes that store no text.
pub const DEFAULT_CUSTOM_TEXT: &str = "hello world";

/// Collaborators a tick needs besides the scene and the snapshot.
#[derive(Clone, Copy)]
pub struct BindingContext<'a> {
    /// Time source for `frontend/date` and `frontend/time`.
    pub clock: &'a dyn Clock,
    /// Localization for weather text.
    pub translator: &'a dyn Translate,
    /// Duration cap for animated image swaps.
    pub sprite_max_duration_ms: Option<f64>,
}

/// What one tick did.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Nodes handed to a widget routine.
    pub dispatched: usize,
    /// Nodes whose geometry or text changed in place.
    pub changed: usize,
    /// Nodes with no value in the snapshot.
    pub skipped_missing: usize,
    /// Nodes whose value equals the last applied one.
    pub skipped_unchanged: usize,
    /// Nodes whose widget routine failed.
    pub failed: usize,
    /// Image loads to submit.
    pub loads: Vec<LoadJob>,
    /// A single repaint of the whole scene is due.
    pub repaint_requested: bool,
}

/// Current value of a bound item: computed locally for `frontend`, read from the snapshot
/// otherwise.
pub fn resolve_value(
    item: &ThemeItem,
    snapshot: &SensorSnapshot,
    clock: &dyn Clock,
) -> Option<ItemValue> {
    if !item.is_frontend() {
        return snapshot.get(&item.sensor, &item.attribute);
    }
    match item.attribute.as_str() {
        "date" => Some(ItemValue::Text(format_date(
            clock.now(),
            item.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT),
        ))),
        "time" => Some(ItemValue::Text(format_time(
            clock.now(),
            item.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT),
        ))),
        "custom_text" => Some(
            item.value
                .clone()
                .filter(|v| !v.to_display().is_empty())
                .unwrap_or_else(|| ItemValue::from(DEFAULT_CUSTOM_TEXT)),
        ),
        _ => item.value.clone(),
    }
}

/// Apply one telemetry snapshot to every bound node.
///
/// Nodes whose value is missing keep their state; nodes whose value equals the last applied one
/// are skipped, except weather nodes which always re-run. The report requests at most one
/// repaint for the whole pass.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = scene.len()))]
pub fn apply_snapshot(
    scene: &mut Scene,
    snapshot: &SensorSnapshot,
    cx: &BindingContext<'_>,
) -> TickReport {
    let mut report = TickReport::default();
    let limits = SpriteLimits {
        max_width: Some(scene.canvas().width),
        max_height: Some(scene.canvas().height),
        max_duration_ms: cx.sprite_max_duration_ms,
    };

    for id in scene.bound_ids() {
        let Some((node, Some(item))) = scene.entry_mut(id) else {
            continue;
        };
        let Some(value) = resolve_value(item, snapshot, cx.clock) else {
            report.skipped_missing += 1;
            continue;
        };
        if !item.is_weather() && item.value.as_ref() == Some(&value) {
            report.skipped_unchanged += 1;
            continue;
        }

        report.dispatched += 1;
        match apply_widget(node, item, &value, cx.translator) {
            Ok(WidgetUpdate::Changed) => {
                report.changed += 1;
                item.value = Some(value);
            }
            Ok(WidgetUpdate::Unchanged) => item.value = Some(value),
            Ok(WidgetUpdate::Pending) => {}
            Ok(WidgetUpdate::Load { source, animated }) => {
                let kind = if animated {
                    LoadKind::Sprite(limits)
                } else {
                    LoadKind::Static { adopt_size: true }
                };
                tracing::debug!(node = id.index(), source = %source, animated, "image swap requested");
                report
                    .loads
                    .extend(scene.begin_load(id, source, kind, Some(value)));
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(node = id.index(), error = %err, "widget update failed");
            }
        }
    }

    report.repaint_requested = report.changed > 0;
    tracing::debug!(
        dispatched = report.dispatched,
        changed = report.changed,
        missing = report.skipped_missing,
        unchanged = report.skipped_unchanged,
        loads = report.loads.len(),
        "snapshot applied"
    );
    report
}

#[cfg(test)]
#[path = "../../tests/unit/binding/engine.rs"]
mod tests;
