//! Host-facing façade: owns the live scene, the asset worker and the renderer.
//!
//! A [`ThemePlayer`] is driven from one thread. Telemetry ticks, pointer events and paints are
//! plain method calls; decoding happens on the [`AssetWorker`] and lands through
//! [`ThemePlayer::poll_loads`].

/// Player options and `LCDCANVAS_*` overrides.
pub mod config;
/// Hover tooltip overlay.
pub mod tooltip;

use std::{
    collections::BTreeSet,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    assets::loader::{AssetWorker, LoadResult},
    binding::engine::{BindingContext, TickReport, apply_snapshot},
    foundation::{
        core::Rgba8,
        error::{ThemeError, ThemeResult},
    },
    player::config::PlayerOpts,
    render::{
        canvas::{CanvasRenderer, FrameRGBA},
        export,
        schedule::{RenderLoop, advance_sprites},
        text::FontBook,
    },
    scene::{
        document::SceneDocument,
        graph::{LoadOutcome, Scene},
        load::{LoadOptions, build_scene},
        migrate::migrate_document,
        node::Node,
    },
    theme::{
        clock::{Clock, SystemClock},
        locale::Translate,
        snapshot::SensorSnapshot,
    },
};

/// Live theme player for one display.
pub struct ThemePlayer {
    opts: PlayerOpts,
    translator: Arc<dyn Translate>,
    clock: Arc<dyn Clock>,
    renderer: CanvasRenderer,
    worker: AssetWorker,
    scene: Option<Scene>,
    render_loop: RenderLoop,
    tooltip: Option<Node>,
}

impl std::fmt::Debug for ThemePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePlayer")
            .field("opts", &self.opts)
            .field("scene_nodes", &self.scene.as_ref().map(Scene::len))
            .field("worker", &self.worker)
            .field("render_loop", &self.render_loop)
            .field("tooltip", &self.tooltip.is_some())
            .finish()
    }
}

impl ThemePlayer {
    /// Player with the system clock and no theme loaded.
    pub fn new(opts: PlayerOpts, translator: Arc<dyn Translate>) -> ThemeResult<Self> {
        let mut fonts = FontBook::new();
        if let Some(path) = &opts.default_font {
            fonts.set_default_from_file(path)?;
        }
        let worker = AssetWorker::new(opts.loader_threads, opts.assets_root.clone())?;
        Ok(Self {
            render_loop: RenderLoop::new(opts.repaint_interval),
            opts,
            translator,
            clock: Arc::new(SystemClock),
            renderer: CanvasRenderer::new(fonts),
            worker,
            scene: None,
            tooltip: None,
        })
    }

    /// Replace the time source used for `frontend/date` and `frontend/time`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Effective options.
    pub fn opts(&self) -> &PlayerOpts {
        &self.opts
    }

    /// Font registry, for registering fonts outside of scene documents.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        self.renderer.fonts_mut()
    }

    /// Parse, migrate and load a theme document from JSON text.
    pub fn load_document_str(&mut self, json: &str) -> ThemeResult<()> {
        self.load_owned(SceneDocument::from_json_str(json)?)
    }

    /// Migrate a copy of `doc`, validate it and make it the live scene.
    ///
    /// On error the previous scene stays live. Loads still in flight for the previous scene are
    /// discarded when they land.
    pub fn load_document(&mut self, doc: &SceneDocument) -> ThemeResult<()> {
        self.load_owned(doc.clone())
    }

    #[tracing::instrument(level = "info", skip_all)]
    fn load_owned(&mut self, mut doc: SceneDocument) -> ThemeResult<()> {
        let migrated = migrate_document(&mut doc);
        if migrated > 0 {
            tracing::debug!(migrated, "document migrated");
        }
        let loaded = build_scene(
            &doc,
            &LoadOptions {
                sprite_max_duration_ms: self.opts.sprite_max_duration_ms,
            },
        )?;

        for (family, payload) in &loaded.custom_fonts {
            if let Err(err) = self.renderer.fonts_mut().register_encoded(family, payload) {
                tracing::warn!(family = %family, error = %err, "custom font rejected");
            }
        }
        let jobs = loaded.jobs.len();
        for job in loaded.jobs {
            self.worker.submit(job);
        }

        let canvas = loaded.scene.canvas();
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            nodes = loaded.scene.len(),
            bound = loaded.scene.bound_ids().len(),
            jobs,
            "theme loaded"
        );
        self.scene = Some(loaded.scene);
        self.tooltip = None;
        self.render_loop.request_now();
        Ok(())
    }

    /// Live scene, if a theme is loaded.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Mutable live scene, for hosts that edit nodes directly.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Apply one telemetry snapshot and submit the image loads it requires.
    ///
    /// A tick that changes any node makes the next repaint due immediately.
    pub fn apply_snapshot(&mut self, snapshot: &SensorSnapshot) -> TickReport {
        let Some(scene) = self.scene.as_mut() else {
            return TickReport::default();
        };
        let cx = BindingContext {
            clock: self.clock.as_ref(),
            translator: self.translator.as_ref(),
            sprite_max_duration_ms: self.opts.sprite_max_duration_ms,
        };
        let report = apply_snapshot(scene, snapshot, &cx);
        for job in report.loads.iter().cloned() {
            self.worker.submit(job);
        }
        if report.repaint_requested {
            self.render_loop.request_now();
        }
        report
    }

    /// Apply asset completions received so far; returns how many changed a node.
    ///
    /// Landed loads make the next repaint due immediately.
    pub fn poll_loads(&mut self) -> usize {
        let results = self.worker.drain();
        self.land(results)
    }

    /// Block until outstanding loads land or `timeout` elapses; returns how many changed a node.
    pub fn wait_for_loads(&mut self, timeout: Duration) -> usize {
        let results = self.worker.wait_idle(timeout);
        self.land(results)
    }

    fn land(&mut self, results: Vec<LoadResult>) -> usize {
        let Some(scene) = self.scene.as_mut() else {
            return 0;
        };
        let applied = results
            .into_iter()
            .map(|r| scene.complete_load(r))
            .filter(|outcome| *outcome == LoadOutcome::Applied)
            .count();
        if applied > 0 {
            self.render_loop.request_now();
        }
        applied
    }

    /// Loads submitted but not yet landed.
    pub fn loads_in_flight(&self) -> usize {
        self.worker.in_flight()
    }

    /// Repaint cadence.
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// True when a theme is loaded and a repaint is due at `now`.
    pub fn repaint_due(&self, now: Instant) -> bool {
        self.scene.is_some() && self.render_loop.poll(now)
    }

    /// Advance sprite animations and repaint the whole scene, tooltip included.
    pub fn paint(&mut self, now: Instant) -> ThemeResult<FrameRGBA> {
        let scene = self
            .scene
            .as_mut()
            .ok_or_else(|| ThemeError::render("no theme loaded"))?;
        advance_sprites(scene, now);
        let frame = self.render_frame(true)?;
        self.render_loop.after_paint(now);
        Ok(frame)
    }

    /// Rasterize the current state without touching animations or the repaint cadence.
    pub fn render_frame(&mut self, with_tooltip: bool) -> ThemeResult<FrameRGBA> {
        let scene = self
            .scene
            .as_ref()
            .ok_or_else(|| ThemeError::render("no theme loaded"))?;
        let background = self.background();
        let overlay = if with_tooltip && !self.opts.hide_tooltip {
            self.tooltip.as_ref()
        } else {
            None
        };
        self.renderer.render(scene, background, overlay)
    }

    /// Current state as JPEG at the configured quality; the tooltip is never exported.
    pub fn export_jpeg(&mut self) -> ThemeResult<Vec<u8>> {
        let frame = self.render_frame(false)?;
        export::export_jpeg(&frame, self.background(), self.opts.jpeg_quality)
    }

    /// Current state as PNG; the tooltip is never exported.
    pub fn export_png(&mut self) -> ThemeResult<Vec<u8>> {
        let frame = self.render_frame(false)?;
        export::export_png(&frame)
    }

    fn background(&self) -> Rgba8 {
        self.scene
            .as_ref()
            .and_then(Scene::background)
            .unwrap_or(self.opts.background)
    }

    /// Show the tooltip for the topmost data-bound node under `point`.
    ///
    /// Returns true when a tooltip is shown.
    pub fn pointer_over(&mut self, point: kurbo::Point) -> bool {
        self.tooltip = None;
        if self.opts.hide_tooltip {
            return false;
        }
        let Some(scene) = self.scene.as_ref() else {
            return false;
        };
        let hit = scene.bound_ids().into_iter().rev().find(|id| {
            scene.get(*id).is_some_and(|node| {
                let p = &node.placement;
                if !p.visible {
                    return false;
                }
                let local = p.to_affine().inverse() * point;
                (0.0..=p.width).contains(&local.x) && (0.0..=p.height).contains(&local.y)
            })
        });
        let Some((node, item)) = hit.and_then(|id| Some((scene.get(id)?, scene.item(id)?)))
        else {
            return false;
        };

        let text = tooltip::tooltip_text(item, self.translator.as_ref());
        let measured = self
            .renderer
            .measure_text(&text, &tooltip::tooltip_style());
        self.tooltip = Some(tooltip::build_tooltip(
            item,
            &node.placement,
            self.translator.as_ref(),
            measured,
            scene.canvas(),
        ));
        true
    }

    /// Hide the tooltip.
    pub fn pointer_out(&mut self) {
        self.tooltip = None;
    }

    /// Tooltip currently shown, if any.
    pub fn tooltip(&self) -> Option<&Node> {
        self.tooltip.as_ref()
    }

    /// Distinct telemetry sensors the loaded theme reads, `frontend` excluded.
    pub fn theme_sensors(&self) -> BTreeSet<String> {
        self.scene
            .as_ref()
            .map(Scene::theme_sensors)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/mod.rs"]
mod tests;
