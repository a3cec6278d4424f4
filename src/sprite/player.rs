use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::sprite::decode::SpriteArtifact;

/// Per-sprite playback state advanced by the render loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteState {
    /// Frame currently shown.
    pub frame_index: u32,
    /// When the frame index last changed; `None` until the first paint.
    pub last_advance: Option<Instant>,
}

/// A sprite strip bound to its playback state.
///
/// Advancing steps at most one frame per paint, so after a long stall the animation resumes
/// where it stopped instead of skipping ahead. The effective rate is the smaller of the paint
/// rate and `1000 / delay_ms`.
#[derive(Clone, Debug)]
pub struct SpriteAnimation {
    /// Packed frames.
    pub artifact: Arc<SpriteArtifact>,
    /// Playback state.
    pub state: SpriteState,
}

impl SpriteAnimation {
    /// Start at frame 0.
    pub fn new(artifact: Arc<SpriteArtifact>) -> Self {
        Self {
            artifact,
            state: SpriteState::default(),
        }
    }

    /// Per-frame delay.
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.artifact.delay_ms.max(0.0) / 1000.0)
    }

    /// Advance by exactly one frame when more than `delay_ms` elapsed since the last advance.
    ///
    /// Returns true when the frame index changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(last) = self.state.last_advance else {
            self.state.last_advance = Some(now);
            return false;
        };
        let count = self.artifact.frame_count.max(1);
        if now.saturating_duration_since(last) > self.delay() {
            self.state.frame_index = (self.state.frame_index + 1) % count;
            self.state.last_advance = Some(now);
            return true;
        }
        false
    }

    /// Strip rectangle `(x, y, w, h)` of the current frame.
    pub fn source_rect(&self) -> (u32, u32, u32, u32) {
        self.artifact.frame_rect(self.state.frame_index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/player.rs"]
mod tests;
