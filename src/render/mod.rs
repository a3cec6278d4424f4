//! CPU rasterization of live scenes and the frame pipeline around it.
//!
//! The renderer repaints the whole scene on every paint; [`schedule::RenderLoop`] decides when a
//! paint is due and [`sink::FrameSink`] receives the results.

/// `vello_cpu` scene rasterizer.
pub mod canvas;
/// PNG/JPEG export of painted frames.
pub mod export;
/// Repaint cadence and the blocking host loop.
pub mod schedule;
/// Frame consumers.
pub mod sink;
/// Font registry and `parley` text layout.
pub mod text;
