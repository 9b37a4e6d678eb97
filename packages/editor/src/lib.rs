//! # Pagecraft Editor
//!
//! Editing engine behind the page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ drag: palette/canvas gestures               │
//! │  - Idle → Dragging → Resolving → Idle       │
//! │  - geometry → DropTarget → EditOp           │
//! └─────────────────────────────────────────────┘
//!                     ↓ EditOp
//! ┌─────────────────────────────────────────────┐
//! │ store: BuilderStore                         │
//! │  - atomic edits on a working copy           │
//! │  - selection + side panel                   │
//! │  - snapshot undo/redo                       │
//! │  - listeners notified after each change     │
//! └─────────────────────────────────────────────┘
//!                     ↓ snapshot_for_save
//! ┌─────────────────────────────────────────────┐
//! │ gateway (pagecraft-gateway)                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One owner**: the store owns the working copy; the UI reads it through
//!    `state()` and listener callbacks
//! 2. **All or nothing**: a failed edit leaves no trace
//! 3. **Ids are stable**: moves never change ids; inserts and duplicates get
//!    fresh ids unique within the document
//! 4. **No dangling selection**: the selection always resolves or is `None`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{BuilderStore, DragCoordinator, DragSource, EditOp};
//!
//! let mut store = BuilderStore::new(document, Registry::builtin())?;
//! store.apply(EditOp::InsertBlock { block_type: BlockType::Hero, index: 0, parent_id: None })?;
//!
//! let mut drag = DragCoordinator::new();
//! drag.start(DragSource::Palette(BlockType::Text), store.document())?;
//! drag.over(store.document(), &hover)?;
//! drag.end(&mut store)?;
//!
//! store.undo()?;
//! ```

mod drag;
mod errors;
mod history;
mod ops;
mod store;

pub use drag::{
    drop_target, resolve, Axis, DragCoordinator, DragPhase, DragSource, DropOutcome, DropTarget,
    HoverTarget, Point, Rect,
};
pub use errors::{DragError, EditError, EditResult};
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use ops::{EditOp, PageSettingsPatch};
pub use store::{BuilderEditState, BuilderStore, Panel, StoreEvent, SubscriptionId};
