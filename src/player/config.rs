use std::{path::PathBuf, time::Duration};

use crate::{
    foundation::{color::parse_css_color, core::Rgba8},
    render::{export::DEFAULT_JPEG_QUALITY, schedule::DEFAULT_REPAINT_INTERVAL},
};

/// Options controlling a [`crate::player::ThemePlayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerOpts {
    /// Minimum spacing between repaints.
    pub repaint_interval: Duration,
    /// Background used when the document stores none.
    pub background: Rgba8,
    /// Root for relative asset sources such as `./weathericon/02d.png`.
    pub assets_root: PathBuf,
    /// Font used for text whose family is not registered.
    pub default_font: Option<PathBuf>,
    /// Never show the hover tooltip.
    pub hide_tooltip: bool,
    /// Cap on the total duration of rebuilt animations.
    pub sprite_max_duration_ms: Option<f64>,
    /// Quality of [`crate::player::ThemePlayer::export_jpeg`].
    pub jpeg_quality: u8,
    /// Loader worker threads; `0` runs loads inline.
    pub loader_threads: usize,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            repaint_interval: DEFAULT_REPAINT_INTERVAL,
            background: Rgba8::BLACK,
            assets_root: PathBuf::from("."),
            default_font: None,
            hide_tooltip: false,
            sprite_max_duration_ms: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            loader_threads: 2,
        }
    }
}

impl PlayerOpts {
    /// Defaults overlaid with `LCDCANVAS_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay variables read through `get`; unset or invalid values keep the current setting.
    ///
    /// Recognized keys: `LCDCANVAS_REPAINT_MS`, `LCDCANVAS_BACKGROUND`, `LCDCANVAS_ASSETS_ROOT`,
    /// `LCDCANVAS_DEFAULT_FONT`, `LCDCANVAS_HIDE_TOOLTIP`, `LCDCANVAS_SPRITE_MAX_MS`,
    /// `LCDCANVAS_JPEG_QUALITY`, `LCDCANVAS_LOADER_THREADS`.
    pub fn overlay_env(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        if let Some(ms) = var("LCDCANVAS_REPAINT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.repaint_interval = Duration::from_millis(ms);
        }
        if let Some(v) = var("LCDCANVAS_BACKGROUND") {
            match parse_css_color(&v) {
                Ok(c) => self.background = c,
                Err(e) => tracing::warn!(value = %v, error = %e, "ignoring LCDCANVAS_BACKGROUND"),
            }
        }
        if let Some(v) = var("LCDCANVAS_ASSETS_ROOT") {
            self.assets_root = PathBuf::from(v);
        }
        if let Some(v) = var("LCDCANVAS_DEFAULT_FONT") {
            self.default_font = Some(PathBuf::from(v));
        }
        if let Some(flag) = var("LCDCANVAS_HIDE_TOOLTIP").and_then(|v| parse_flag(&v)) {
            self.hide_tooltip = flag;
        }
        if let Some(ms) = var("LCDCANVAS_SPRITE_MAX_MS")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|n| n.is_finite() && *n > 0.0)
        {
            self.sprite_max_duration_ms = Some(ms);
        }
        if let Some(q) = var("LCDCANVAS_JPEG_QUALITY")
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|q| (1..=100).contains(q))
        {
            self.jpeg_quality = q;
        }
        if let Some(n) = var("LCDCANVAS_LOADER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.loader_threads = n;
        }
        self
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/config.rs"]
mod tests;
