//! lcdcanvas renders live, sensor-driven themes for small secondary displays.
//!
//! A theme is a persisted scene document whose primitives may be bound to telemetry values.
//! The public API is player-oriented:
//!
//! - Load a [`SceneDocument`] (or its JSON text) into a [`ThemePlayer`]
//! - Feed [`SensorSnapshot`]s as telemetry arrives
//! - Paint frames on the repaint cadence and hand them to a [`FrameSink`]
//!
//! Animated images are decoded off-thread into packed sprite strips and played back at the
//! repaint rate.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image sources, decoding and the background loader.
pub mod assets;
/// Snapshot-to-node diff engine.
pub mod binding;
/// Colors, geometry and errors.
pub mod foundation;
/// Host-facing player.
pub mod player;
/// Rasterization, export and the repaint loop.
pub mod render;
/// Scene documents and the live scene.
pub mod scene;
/// Animated image strips.
pub mod sprite;
/// Bound items, snapshots, localization and clocks.
pub mod theme;
/// Per-kind node updates.
pub mod widgets;

pub use crate::foundation::core::{Canvas, Placement, Point, Rgba8};
pub use crate::foundation::error::{ThemeError, ThemeResult};

pub use crate::assets::loader::{AssetWorker, LoadJob, LoadKind};
pub use crate::binding::engine::{BindingContext, TickReport};
pub use crate::player::ThemePlayer;
pub use crate::player::config::PlayerOpts;
pub use crate::render::canvas::{CanvasRenderer, FrameRGBA};
pub use crate::render::schedule::{PlayStats, RenderLoop, run_player};
pub use crate::render::sink::{DirectorySink, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::text::FontBook;
pub use crate::scene::document::SceneDocument;
pub use crate::scene::graph::Scene;
pub use crate::sprite::decode::{SpriteArtifact, SpriteLimits, decode_sprite};
pub use crate::theme::clock::{Clock, FixedClock, SystemClock};
pub use crate::theme::item::{ItemValue, ShowType, ThemeItem};
pub use crate::theme::locale::{Catalog, KeyEcho, Translate};
pub use crate::theme::snapshot::SensorSnapshot;
