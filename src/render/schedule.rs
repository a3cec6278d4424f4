use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    time::{Duration, Instant},
};

use crate::{
    foundation::error::{ThemeError, ThemeResult},
    player::ThemePlayer,
    render::sink::{FrameSink, SinkConfig},
    scene::{
        graph::Scene,
        node::{ImageContent, Node, NodeKind},
    },
    theme::snapshot::SensorSnapshot,
};

/// Minimum spacing between whole-scene repaints.
pub const DEFAULT_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Repaint cadence: one paint, then a fixed pause before the next one is due.
#[derive(Clone, Copy, Debug)]
pub struct RenderLoop {
    interval: Duration,
    next_due: Option<Instant>,
    painted: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(DEFAULT_REPAINT_INTERVAL)
    }
}

impl RenderLoop {
    /// Loop with the given repaint interval; the first paint is due immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            painted: 0,
        }
    }

    /// Repaint interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a repaint is due at `now`.
    pub fn poll(&self, now: Instant) -> bool {
        self.next_due.is_none_or(|due| now >= due)
    }

    /// Record a paint at `now` and schedule the next one.
    pub fn after_paint(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
        self.painted += 1;
    }

    /// Make the next poll due regardless of the interval.
    pub fn request_now(&mut self) {
        self.next_due = None;
    }

    /// Time left until the next repaint is due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or_default()
    }

    /// Paints recorded so far.
    pub fn painted(&self) -> u64 {
        self.painted
    }
}

/// Advance every sprite animation in the scene; returns how many changed frame.
pub fn advance_sprites(scene: &mut Scene, now: Instant) -> usize {
    fn visit(node: &mut Node, now: Instant) -> usize {
        match &mut node.kind {
            NodeKind::Image(img) => match &mut img.content {
                ImageContent::Sprite(anim) => usize::from(anim.advance(now)),
                _ => 0,
            },
            NodeKind::Group { children } => children.iter_mut().map(|c| visit(c, now)).sum(),
            _ => 0,
        }
    }
    scene.nodes_mut().map(|n| visit(n, now)).sum()
}

/// Counters of a [`run_player`] session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Snapshots applied.
    pub snapshots: u64,
    /// Asset completions applied.
    pub loads_applied: u64,
}

/// Blocking host loop: apply snapshots as they arrive, land asset loads, repaint on cadence and
/// push frames to `sink` until `stop` is raised or `deadline` passes.
#[tracing::instrument(level = "info", skip_all)]
pub fn run_player(
    player: &mut ThemePlayer,
    snapshots: &mpsc::Receiver<SensorSnapshot>,
    sink: &mut dyn FrameSink,
    stop: &AtomicBool,
    deadline: Option<Instant>,
) -> ThemeResult<PlayStats> {
    let canvas = player
        .scene()
        .map(Scene::canvas)
        .ok_or_else(|| ThemeError::render("no theme loaded"))?;
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        interval: player.render_loop().interval(),
    })?;

    let mut stats = PlayStats::default();
    let mut connected = true;
    loop {
        let now = Instant::now();
        if stop.load(Ordering::Relaxed) || deadline.is_some_and(|d| now >= d) {
            break;
        }

        while connected {
            match snapshots.try_recv() {
                Ok(snap) => {
                    player.apply_snapshot(&snap);
                    stats.snapshots += 1;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => connected = false,
            }
        }
        stats.loads_applied += player.poll_loads() as u64;

        if player.repaint_due(now) {
            let frame = player.paint(now)?;
            sink.push_frame(stats.frames, &frame)?;
            stats.frames += 1;
        }

        let now = Instant::now();
        let mut wait = player.render_loop().time_until_due(now);
        if let Some(d) = deadline {
            wait = wait.min(d.saturating_duration_since(now));
        }
        if wait.is_zero() {
            continue;
        }
        if connected {
            match snapshots.recv_timeout(wait) {
                Ok(snap) => {
                    player.apply_snapshot(&snap);
                    stats.snapshots += 1;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => connected = false,
            }
        } else {
            std::thread::sleep(wait);
        }
    }

    sink.end()?;
    tracing::info!(
        frames = stats.frames,
        snapshots = stats.snapshots,
        loads = stats.loads_applied,
        "player stopped"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/schedule.rs"]
mod tests;
