use std::{
    path::{Path, PathBuf},
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

use crate::{
    assets::{image::PreparedImage, source::load_source_bytes},
    foundation::error::{ThemeError, ThemeResult},
    scene::node::NodeId,
    sprite::decode::{SpriteArtifact, SpriteLimits, decode_sprite},
    theme::item::ItemValue,
};

/// How the fetched bytes are turned into node content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadKind {
    /// Static raster; `adopt_size` replaces the node's box with the image's natural size.
    Static {
        /// Resize the node to the decoded image.
        adopt_size: bool,
    },
    /// Static raster shown only until a pending rebuild resolves.
    Preview,
    /// Animated image packed into a sprite strip.
    Sprite(SpriteLimits),
}

/// A fetch+decode request for one node.
#[derive(Clone, Debug)]
pub struct LoadJob {
    /// Target node.
    pub node: NodeId,
    /// Unique ticket; completions with a ticket the node no longer expects are discarded.
    pub ticket: u64,
    /// Source string (data URL, path or URL).
    pub source: String,
    /// Decode mode.
    pub kind: LoadKind,
    /// Bound value recorded on the node's item once the load lands.
    pub raw_value: Option<ItemValue>,
}

/// Decoded payload.
#[derive(Clone, Debug)]
pub enum LoadedAsset {
    /// Static raster.
    Static(Arc<PreparedImage>),
    /// Sprite strip.
    Sprite(Arc<SpriteArtifact>),
}

/// Completion of a [`LoadJob`].
#[derive(Debug)]
pub struct LoadResult {
    /// The originating job.
    pub job: LoadJob,
    /// Decoded asset or the failure reason.
    pub outcome: ThemeResult<LoadedAsset>,
}

/// Fetch and decode one job on the calling thread.
pub fn run_load_job(assets_root: &Path, job: LoadJob) -> LoadResult {
    let outcome = load_source_bytes(&job.source, assets_root).and_then(|bytes| match job.kind {
        LoadKind::Static { .. } | LoadKind::Preview => {
            crate::assets::image::decode_image(&bytes).map(|img| LoadedAsset::Static(Arc::new(img)))
        }
        LoadKind::Sprite(limits) => {
            decode_sprite(&bytes, limits).map(|art| LoadedAsset::Sprite(Arc::new(art)))
        }
    });
    LoadResult { job, outcome }
}

/// Runs fetch/decode jobs off the host thread and hands completions back over a channel.
///
/// With zero threads jobs run inline inside [`AssetWorker::submit`]; completions are still
/// delivered through [`AssetWorker::drain`].
pub struct AssetWorker {
    pool: Option<rayon::ThreadPool>,
    assets_root: Arc<PathBuf>,
    tx: mpsc::Sender<LoadResult>,
    rx: mpsc::Receiver<LoadResult>,
    in_flight: usize,
}

impl std::fmt::Debug for AssetWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetWorker")
            .field("threads", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .field("assets_root", &self.assets_root)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl AssetWorker {
    /// Create a worker resolving relative sources under `assets_root`.
    pub fn new(threads: usize, assets_root: impl Into<PathBuf>) -> ThemeResult<Self> {
        let pool = if threads == 0 {
            None
        } else {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("lcdcanvas-loader-{i}"))
                    .build()
                    .map_err(|e| {
                        ThemeError::io(format!("failed to build loader thread pool: {e}"))
                    })?,
            )
        };
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            pool,
            assets_root: Arc::new(assets_root.into()),
            tx,
            rx,
            in_flight: 0,
        })
    }

    /// Root for relative sources.
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Queue a job.
    pub fn submit(&mut self, job: LoadJob) {
        tracing::debug!(node = job.node.index(), ticket = job.ticket, source = %short(&job.source), "submit load");
        self.in_flight += 1;
        let root = Arc::clone(&self.assets_root);
        let tx = self.tx.clone();
        match &self.pool {
            Some(pool) => pool.spawn(move || {
                let _ = tx.send(run_load_job(&root, job));
            }),
            None => {
                let _ = tx.send(run_load_job(&root, job));
            }
        }
    }

    /// Completions received so far, without blocking.
    pub fn drain(&mut self) -> Vec<LoadResult> {
        let mut out = Vec::new();
        while let Ok(r) = self.rx.try_recv() {
            out.push(r);
        }
        self.in_flight = self.in_flight.saturating_sub(out.len());
        out
    }

    /// Block until every submitted job completed or `timeout` elapsed.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<LoadResult> {
        let deadline = Instant::now() + timeout;
        let mut out = self.drain();
        while self.in_flight > 0 {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(r) => {
                    self.in_flight -= 1;
                    out.push(r);
                }
                Err(_) => break,
            }
        }
        out
    }

    /// Jobs submitted but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

fn short(source: &str) -> &str {
    if source.starts_with("data:") {
        source.split(',').next().unwrap_or("data:")
    } else {
        source
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
