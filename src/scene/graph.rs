use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    assets::loader::{LoadJob, LoadKind, LoadResult, LoadedAsset},
    foundation::core::{Canvas, Rgba8},
    scene::node::{ImageContent, Node, NodeId, NodeKind},
    sprite::player::SpriteAnimation,
    theme::item::{ItemValue, ThemeItem},
};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Circular clip of a round display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleClip {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius.
    pub radius: f64,
}

/// What happened to a load completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Content changed.
    Applied,
    /// The node no longer expects this ticket (superseded, removed or a previous scene).
    Stale,
    /// The load failed; the node keeps what it showed before.
    Failed,
}

/// Live scene: an arena of top-level nodes in paint order plus a side table of bound items.
#[derive(Clone, Debug)]
pub struct Scene {
    canvas: Canvas,
    clip: Option<CircleClip>,
    background: Option<Rgba8>,
    slots: Vec<Option<Node>>,
    items: Vec<Option<ThemeItem>>,
    order: Vec<NodeId>,
}

impl Scene {
    /// Empty scene.
    pub fn new(canvas: Canvas, clip: Option<CircleClip>) -> Self {
        Self {
            canvas,
            clip,
            background: None,
            slots: Vec::new(),
            items: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Output raster size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Circular clip, for round displays.
    pub fn clip(&self) -> Option<CircleClip> {
        self.clip
    }

    /// Background stored in the document, overriding the player default.
    pub fn background(&self) -> Option<Rgba8> {
        self.background
    }

    /// Set the document background.
    pub fn set_background(&mut self, color: Option<Rgba8>) {
        self.background = color;
    }

    /// Append a node on top of the paint order.
    pub fn insert(&mut self, node: Node, item: Option<ThemeItem>) -> NodeId {
        let id = NodeId::from_index(self.slots.len());
        self.slots.push(Some(node));
        self.items.push(item);
        self.order.push(id);
        id
    }

    /// Swap a node's primitive in place, keeping its id, item and paint position.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Option<Node> {
        let slot = self.slots.get_mut(id.index())?;
        slot.as_mut().map(|old| std::mem::replace(old, node))
    }

    /// Remove a node and its item.
    pub fn remove(&mut self, id: NodeId) -> Option<(Node, Option<ThemeItem>)> {
        let node = self.slots.get_mut(id.index())?.take()?;
        let item = self.items[id.index()].take();
        self.order.retain(|n| *n != id);
        Some((node, item))
    }

    /// Node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Bound item by id.
    pub fn item(&self, id: NodeId) -> Option<&ThemeItem> {
        self.items.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable bound item by id.
    pub fn item_mut(&mut self, id: NodeId) -> Option<&mut ThemeItem> {
        self.items.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Node and its item, borrowed together.
    pub fn entry_mut(&mut self, id: NodeId) -> Option<(&mut Node, Option<&mut ThemeItem>)> {
        let node = self.slots.get_mut(id.index())?.as_mut()?;
        let item = self.items.get_mut(id.index()).and_then(Option::as_mut);
        Some((node, item))
    }

    /// Nodes in paint order (bottom first).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(*id).map(|n| (*id, n)))
    }

    /// Live nodes in slot order, for per-frame state updates.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Ids of data-bound nodes in paint order.
    pub fn bound_ids(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.item(*id).is_some_and(ThemeItem::is_bound))
            .collect()
    }

    /// Distinct sensors read by bound nodes, `frontend` excluded.
    pub fn theme_sensors(&self) -> BTreeSet<String> {
        self.bound_ids()
            .into_iter()
            .filter_map(|id| self.item(id))
            .filter(|item| !item.is_frontend())
            .map(|item| item.sensor.clone())
            .collect()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no node is live.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register a load for an image node and return the job to run.
    ///
    /// A new [`LoadKind::Static`] or [`LoadKind::Sprite`] request supersedes any outstanding
    /// one; a [`LoadKind::Preview`] only fills in until that request lands.
    pub fn begin_load(
        &mut self,
        id: NodeId,
        source: impl Into<String>,
        kind: LoadKind,
        raw_value: Option<ItemValue>,
    ) -> Option<LoadJob> {
        let source = source.into();
        let img = self.get_mut(id)?.image_mut()?;
        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        match kind {
            LoadKind::Preview => img.preview_ticket = Some(ticket),
            LoadKind::Static { .. } | LoadKind::Sprite(_) => {
                img.ticket = Some(ticket);
                img.pending_source = Some(source.clone());
                img.preview_ticket = None;
            }
        }
        Some(LoadJob {
            node: id,
            ticket,
            source,
            kind,
            raw_value,
        })
    }

    /// Apply a completion if the node still expects it.
    pub fn complete_load(&mut self, result: LoadResult) -> LoadOutcome {
        let LoadResult { job, outcome } = result;
        let Some((node, item)) = self.entry_mut(job.node) else {
            return LoadOutcome::Stale;
        };
        let placement = &mut node.placement;
        let img = match &mut node.kind {
            NodeKind::Image(img) => img,
            _ => return LoadOutcome::Stale,
        };

        let is_main = img.ticket == Some(job.ticket);
        let is_preview = img.preview_ticket == Some(job.ticket);
        if !is_main && !is_preview {
            tracing::debug!(node = job.node.index(), ticket = job.ticket, "discarding stale load");
            return LoadOutcome::Stale;
        }

        match outcome {
            Err(err) => {
                tracing::warn!(node = job.node.index(), source = %job.source, error = %err, "image load failed");
                if is_main {
                    img.ticket = None;
                    img.pending_source = None;
                    if matches!(img.content, ImageContent::Pending) && img.preview_ticket.is_none() {
                        img.content = ImageContent::Failed;
                    }
                } else {
                    img.preview_ticket = None;
                }
                LoadOutcome::Failed
            }
            Ok(asset) if is_main => {
                match asset {
                    LoadedAsset::Static(image) => {
                        if matches!(job.kind, LoadKind::Static { adopt_size: true }) {
                            placement.width = f64::from(image.width);
                            placement.height = f64::from(image.height);
                        }
                        img.content = ImageContent::Static(image);
                    }
                    LoadedAsset::Sprite(art) => {
                        img.content = ImageContent::Sprite(SpriteAnimation::new(art));
                    }
                }
                img.source = job.source;
                img.ticket = None;
                img.pending_source = None;
                img.preview_ticket = None;
                if let (Some(item), Some(v)) = (item, job.raw_value) {
                    item.value = Some(v);
                }
                LoadOutcome::Applied
            }
            Ok(asset) => {
                img.preview_ticket = None;
                match asset {
                    LoadedAsset::Static(image)
                        if img.ticket.is_some()
                            || matches!(img.content, ImageContent::Pending | ImageContent::Failed) =>
                    {
                        img.content = ImageContent::Static(image);
                        LoadOutcome::Applied
                    }
                    _ => LoadOutcome::Stale,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
