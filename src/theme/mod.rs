//! Data model shared by the editor, the telemetry backend and the player.

/// Date/time sources and format tokens.
pub mod clock;
/// Weather icon table.
pub mod icons;
/// Bound item metadata and values.
pub mod item;
/// Localization.
pub mod locale;
/// Telemetry snapshots.
pub mod snapshot;
