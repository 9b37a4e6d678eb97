//! # Builder Edit Store
//!
//! Working copy of a page document plus the builder's UI state.
//!
//! Every edit goes through `BuilderStore::apply`, which runs the operation on
//! a scratch copy and commits only on success. On failure nothing changes:
//! document, selection, history and version are exactly as before.
//!
//! ## Observation
//!
//! Listeners registered with `subscribe` are called after each state change
//! with the new state and the event that caused it. Listeners cannot reach
//! back into the store, so a notification never observes a half-applied
//! change.
//!
//! ## Saving
//!
//! ```text
//! snapshot_for_save() ──▶ (version, document) ──▶ gateway
//!                                                   │
//! acknowledge_save(version, &saved) ◀───────────────┘
//! ```
//!
//! An acknowledgement only clears `is_dirty` when no edit happened after the
//! snapshot was taken. `save_key` names this working copy for the save
//! coordinator: the page id once the page exists, a per-store session key
//! before that, so renaming an unsaved page cannot start a second create.

use crate::errors::{EditError, EditResult};
use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::ops::EditOp;
use pagecraft_blocks::{Block, BlockId, IdGenerator, PageDocument, Registry};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Builder side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Blocks,
    Properties,
    Layers,
    Settings,
}

/// Everything the builder UI renders from
#[derive(Debug, Clone)]
pub struct BuilderEditState {
    pub document: PageDocument,
    pub selected_block_id: Option<BlockId>,
    pub active_panel: Option<Panel>,
    pub history: History,
}

impl BuilderEditState {
    pub fn selected_block(&self) -> Option<&Block> {
        self.selected_block_id
            .as_ref()
            .and_then(|id| self.document.find_block(id))
    }
}

/// Notification sent to store listeners
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    DocumentChanged { version: u64, op: EditOp },
    Undo { version: u64 },
    Redo { version: u64 },
    SelectionChanged { selected: Option<BlockId> },
    PanelChanged { panel: Option<Panel> },
    Saved { version: u64 },
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&BuilderEditState, &StoreEvent)>;

/// Single-threaded edit store for one page
pub struct BuilderStore {
    state: BuilderEditState,
    registry: Registry,
    ids: IdGenerator,
    session: u64,

    /// Current version number (increments on each document change)
    version: u64,

    /// Highest version acknowledged as saved
    saved_version: u64,

    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl BuilderStore {
    /// Open `document` for editing. Fails if the document is not valid
    /// against `registry` (duplicate ids, bad properties, too deep).
    pub fn new(document: PageDocument, registry: Registry) -> EditResult<Self> {
        Self::with_history_limit(document, registry, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(
        document: PageDocument,
        registry: Registry,
        history_limit: usize,
    ) -> EditResult<Self> {
        if let Err(e) = registry.validate_document(&document) {
            warn!(slug = %document.slug, error = %e, "Rejected invalid document");
            return Err(e.into());
        }

        let key = if document.is_persisted() {
            document.id.clone()
        } else {
            document.slug.to_string()
        };

        Ok(Self {
            state: BuilderEditState {
                document,
                selected_block_id: None,
                active_panel: None,
                history: History::with_max_levels(history_limit),
            },
            registry,
            ids: IdGenerator::new(&key),
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            version: 0,
            saved_version: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn state(&self) -> &BuilderEditState {
        &self.state
    }

    pub fn document(&self) -> &PageDocument {
        &self.state.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selected_block_id(&self) -> Option<&BlockId> {
        self.state.selected_block_id.as_ref()
    }

    pub fn active_panel(&self) -> Option<Panel> {
        self.state.active_panel
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether there are edits not yet acknowledged as saved
    pub fn is_dirty(&self) -> bool {
        self.version != self.saved_version
    }

    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    /// Apply an edit operation atomically
    pub fn apply(&mut self, op: EditOp) -> EditResult<()> {
        let mut scratch = self.state.document.clone();
        let mut ids = self.ids.clone();

        let applied = match op.apply(&mut scratch, &self.registry, &mut ids) {
            Ok(applied) => applied,
            Err(e) => {
                warn!(op = op.name(), error = %e, "Rejected edit");
                return Err(e);
            }
        };

        let before = std::mem::replace(&mut self.state.document, scratch);
        self.ids = ids;
        self.state.history.record(before, op.name());
        self.version += 1;

        debug!(
            op = op.name(),
            version = self.version,
            blocks = self.state.document.block_count(),
            "Applied edit"
        );

        let selection_changed = match applied.created {
            Some(created) => {
                self.state.selected_block_id = Some(created);
                true
            }
            None => self.clear_dangling_selection(),
        };

        let version = self.version;
        self.notify(StoreEvent::DocumentChanged { version, op });
        if selection_changed {
            self.notify_selection();
        }
        Ok(())
    }

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self) {
        self.state.history.begin_batch();
    }

    pub fn end_batch(&mut self, label: Option<&str>) {
        self.state.history.end_batch(label);
    }

    /// Revert the most recent undo step. `Ok(false)` when there is none.
    pub fn undo(&mut self) -> EditResult<bool> {
        self.state.history.end_batch(None);

        let identity = Identity::of(&self.state.document);
        if !self.state.history.undo(&mut self.state.document) {
            return Ok(false);
        }
        identity.restore(&mut self.state.document);

        self.version += 1;
        debug!(version = self.version, "Undo");

        let selection_changed = self.clear_dangling_selection();
        self.notify(StoreEvent::Undo {
            version: self.version,
        });
        if selection_changed {
            self.notify_selection();
        }
        Ok(true)
    }

    /// Reapply the most recently undone step. `Ok(false)` when there is none.
    pub fn redo(&mut self) -> EditResult<bool> {
        let identity = Identity::of(&self.state.document);
        if !self.state.history.redo(&mut self.state.document) {
            return Ok(false);
        }
        identity.restore(&mut self.state.document);

        self.version += 1;
        debug!(version = self.version, "Redo");

        let selection_changed = self.clear_dangling_selection();
        self.notify(StoreEvent::Redo {
            version: self.version,
        });
        if selection_changed {
            self.notify_selection();
        }
        Ok(true)
    }

    /// Select a block (or nothing). Unknown ids are rejected.
    pub fn select(&mut self, id: Option<BlockId>) -> EditResult<()> {
        if let Some(id) = &id {
            if !self.state.document.contains(id) {
                warn!(block_id = %id, "Rejected selection of unknown block");
                return Err(EditError::BlockNotFound(id.clone()));
            }
        }

        if self.state.selected_block_id != id {
            self.state.selected_block_id = id;
            self.notify_selection();
        }
        Ok(())
    }

    pub fn set_active_panel(&mut self, panel: Option<Panel>) {
        if self.state.active_panel != panel {
            self.state.active_panel = panel;
            self.notify(StoreEvent::PanelChanged { panel });
        }
    }

    /// Key identifying this working copy to a save coordinator: `id:<id>`
    /// once created, `session:<n>` before that. Stable across slug edits.
    pub fn save_key(&self) -> String {
        if self.state.document.is_persisted() {
            format!("id:{}", self.state.document.id)
        } else {
            format!("session:{}", self.session)
        }
    }

    /// Current version and a copy of the document to send to the gateway
    pub fn snapshot_for_save(&self) -> (u64, PageDocument) {
        (self.version, self.state.document.clone())
    }

    /// Record that the snapshot taken at `version` was stored as `saved`.
    ///
    /// Server-assigned identity (id, timestamps) is adopted. Local content is
    /// never replaced, so a stale acknowledgement cannot undo newer edits.
    pub fn acknowledge_save(&mut self, version: u64, saved: &PageDocument) {
        Identity::of(saved).restore(&mut self.state.document);
        self.saved_version = self.saved_version.max(version);

        debug!(
            version,
            current = self.version,
            dirty = self.is_dirty(),
            page_id = %saved.id,
            "Save acknowledged"
        );
        self.notify(StoreEvent::Saved { version });
    }

    /// Register a listener called after every state change
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&BuilderEditState, &StoreEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn clear_dangling_selection(&mut self) -> bool {
        let dangling = self
            .state
            .selected_block_id
            .as_ref()
            .map(|id| !self.state.document.contains(id))
            .unwrap_or(false);

        if dangling {
            self.state.selected_block_id = None;
        }
        dangling
    }

    fn notify_selection(&mut self) {
        let selected = self.state.selected_block_id.clone();
        self.notify(StoreEvent::SelectionChanged { selected });
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state, &event);
        }
    }
}

/// Gateway-owned fields that survive undo/redo
struct Identity {
    id: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Identity {
    fn of(doc: &PageDocument) -> Self {
        Self {
            id: doc.id.clone(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }

    fn restore(self, doc: &mut PageDocument) {
        doc.id = self.id;
        doc.created_at = self.created_at;
        doc.updated_at = self.updated_at;
    }
}
