use std::{path::PathBuf, time::Duration};

use crate::{
    foundation::error::{ThemeError, ThemeResult},
    render::{canvas::FrameRGBA, export::export_png},
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Minimum spacing between frames.
    pub interval: Duration,
}

/// Consumer of painted frames, e.g. the link to the display hardware.
///
/// `push_frame` is called with strictly increasing sequence numbers.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ThemeResult<()>;
    /// Push one painted frame.
    fn push_frame(&mut self, seq: u64, frame: &FrameRGBA) -> ThemeResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ThemeResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// True once `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ThemeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, seq: u64, frame: &FrameRGBA) -> ThemeResult<()> {
        self.frames.push((seq, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ThemeResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes every frame as `frame_<seq>.png` into a directory.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
}

impl DirectorySink {
    /// Sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for DirectorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ThemeResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ThemeError::io(format!("failed to create '{}': {e}", self.dir.display()))
        })?;
        tracing::info!(dir = %self.dir.display(), width = cfg.width, height = cfg.height, "writing frames");
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, seq: u64, frame: &FrameRGBA) -> ThemeResult<()> {
        let path = self.dir.join(format!("frame_{seq:06}.png"));
        let png = export_png(frame)?;
        std::fs::write(&path, png)
            .map_err(|e| ThemeError::io(format!("failed to write '{}': {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ThemeResult<()> {
        tracing::info!(frames = self.written, "frame output finished");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
