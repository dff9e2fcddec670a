//! Panel registry: one live visual surface per diagram modality.
//!
//! The registry decides reuse-vs-recreate; the editor client owns the
//! actual surfaces and reports closure back via `interlis/panelClosed`.
//! That closure handler and `show_or_update` are the only two write paths,
//! both funneled through the `SharedPanels` lock — handlers run
//! concurrently, so admission and surface write must be atomic per apply.

pub mod generation;

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::panel::generation::LatestGate;

/// Kind of visual surface a diagram result is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    RasterImage,
    InteractiveDiagram,
}

impl Modality {
    pub fn title(&self) -> &'static str {
        match self {
            Modality::RasterImage => "INTERLIS UML",
            Modality::InteractiveDiagram => "INTERLIS UML (interactive)",
        }
    }
}

/// What the editor client should do with a panel surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelDirective {
    /// Open a fresh surface in a side view area.
    Create { id: u64 },
    /// Replace the content of the live surface and bring it to the front.
    Update { id: u64 },
}

impl PanelDirective {
    pub fn id(&self) -> u64 {
        match *self {
            PanelDirective::Create { id } | PanelDirective::Update { id } => id,
        }
    }
}

#[derive(Debug, Default)]
pub struct PanelRegistry {
    next_id: u64,
    live: HashMap<Modality, u64>,
    gates: HashMap<Modality, LatestGate>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the surface for one render result. Returns `None` when a newer
    /// invocation has already rendered into this modality; otherwise returns
    /// the directive for the client, reusing the live surface if one exists.
    pub fn show_or_update(&mut self, modality: Modality, generation: u64) -> Option<PanelDirective> {
        if !self.gates.entry(modality).or_default().admit(generation) {
            return None;
        }

        match self.live.get(&modality) {
            Some(&id) => Some(PanelDirective::Update { id }),
            None => {
                self.next_id += 1;
                self.live.insert(modality, self.next_id);
                Some(PanelDirective::Create { id: self.next_id })
            }
        }
    }

    /// Host-driven disposal: the user closed the surface. Ids are unique
    /// across modalities, so an unknown id is a no-op.
    pub fn on_closed(&mut self, id: u64) {
        self.live.retain(|_, live_id| *live_id != id);
    }

    pub fn live_panel(&self, modality: Modality) -> Option<u64> {
        self.live.get(&modality).copied()
    }
}

/// Registry behind an async lock. The lock is held from gate admission
/// through the surface write, so a render suspended mid-apply (writing the
/// temp file, sending the panel notification) cannot interleave with a
/// newer invocation targeting the same modality.
#[derive(Debug, Default)]
pub struct SharedPanels {
    inner: tokio::sync::Mutex<PanelRegistry>,
}

impl SharedPanels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `write` with the claimed directive if `generation` is admitted
    /// for this modality. Returns whether the write ran.
    pub async fn apply<F, Fut>(&self, modality: Modality, generation: u64, write: F) -> bool
    where
        F: FnOnce(PanelDirective) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut registry = self.inner.lock().await;
        let Some(directive) = registry.show_or_update(modality, generation) else {
            return false;
        };
        write(directive).await;
        true
    }

    pub async fn on_closed(&self, id: u64) {
        self.inner.lock().await.on_closed(id);
    }
}
