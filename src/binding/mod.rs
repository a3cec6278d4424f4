/// Telemetry snapshot to node updates.
pub mod engine;
