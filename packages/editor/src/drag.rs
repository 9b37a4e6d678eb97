//! # Drag-and-Drop Coordinator
//!
//! Turns pointer gestures over the palette and canvas into edit operations.
//!
//! ## Phases
//!
//! ```text
//!        start(source)            end(store)
//! Idle ───────────────▶ Dragging ───────────▶ Resolving ──▶ Idle
//!   ▲                      │ over(...) updates the target
//!   └──────── cancel() ────┘
//! ```
//!
//! Drop targets are slot indices in the list under the pointer: slot `i` is
//! the gap before item `i`, slot `len` the end of the list. `resolve`
//! converts them into store operations and is a pure function of the source,
//! target and document.

use crate::errors::DragError;
use crate::ops::EditOp;
use crate::store::BuilderStore;
use pagecraft_blocks::{BlockId, BlockType, PageDocument};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DragSource {
    /// A new block from the palette
    Palette(BlockType),
    /// A block already on the canvas
    Existing(BlockId),
}

/// Slot in a block list where a drop would land
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    /// Owning container (`None` for top-level sections)
    #[serde(default)]
    pub parent_id: Option<BlockId>,
    /// Slot index in the current list
    pub index: usize,
}

/// Main axis of the list a block sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HoverTarget {
    /// A rendered block
    #[serde(rename_all = "camelCase")]
    Block {
        id: BlockId,
        bounds: Rect,
        pointer: Point,
        #[serde(default)]
        axis: Axis,
    },
    /// Empty space of a list (the canvas root when `parent_id` is `None`)
    #[serde(rename_all = "camelCase")]
    Container {
        #[serde(default)]
        parent_id: Option<BlockId>,
    },
    /// Outside any drop zone
    Outside,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging {
        source: DragSource,
        target: Option<DropTarget>,
    },
    Resolving {
        source: DragSource,
        target: DropTarget,
    },
}

/// Result of ending a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The operation was applied to the store
    Applied(EditOp),
    /// No valid target; the store was not touched
    Cancelled,
    /// Dropped where it already was; the store was not touched
    Unchanged,
}

/// Fraction of a block's extent at which before/after flips
const SPLIT: f64 = 0.5;

/// Band of a container's extent that means "drop inside"
const INSIDE_BAND: (f64, f64) = (0.25, 0.75);

/// Drag state machine for one builder canvas
#[derive(Debug)]
pub struct DragCoordinator {
    phase: DragPhase,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    /// Begin a gesture
    pub fn start(&mut self, source: DragSource, doc: &PageDocument) -> Result<(), DragError> {
        if self.is_active() {
            return Err(DragError::GestureAlreadyActive);
        }
        if let DragSource::Existing(id) = &source {
            if !doc.contains(id) {
                return Err(DragError::BlockNotFound(id.clone()));
            }
        }

        debug!(?source, "Drag started");
        self.phase = DragPhase::Dragging {
            source,
            target: None,
        };
        Ok(())
    }

    /// Update the drop target from the pointer position
    pub fn over(
        &mut self,
        doc: &PageDocument,
        hover: &HoverTarget,
    ) -> Result<Option<DropTarget>, DragError> {
        match &mut self.phase {
            DragPhase::Dragging { source, target } => {
                *target = drop_target(source, hover, doc);
                Ok(target.clone())
            }
            _ => Err(DragError::NoActiveGesture),
        }
    }

    /// Finish the gesture, applying the resulting operation to `store`.
    ///
    /// The coordinator is back in `Idle` afterwards, whatever the outcome.
    pub fn end(&mut self, store: &mut BuilderStore) -> Result<DropOutcome, DragError> {
        let (source, target) = match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Dragging {
                target: None,
                ..
            } => {
                debug!("Drag ended without a target");
                return Ok(DropOutcome::Cancelled);
            }
            DragPhase::Dragging {
                source,
                target: Some(target),
            } => (source, target),
            DragPhase::Idle | DragPhase::Resolving { .. } => {
                return Err(DragError::NoActiveGesture)
            }
        };

        self.phase = DragPhase::Resolving {
            source: source.clone(),
            target: target.clone(),
        };
        let op = resolve(&source, &target, store.document());
        let result = match op {
            None => Ok(DropOutcome::Unchanged),
            Some(op) => store
                .apply(op.clone())
                .map(|_| DropOutcome::Applied(op))
                .map_err(DragError::from),
        };
        self.phase = DragPhase::Idle;

        debug!(?source, ?target, ok = result.is_ok(), "Drag resolved");
        result
    }

    /// Abandon the gesture without touching the store
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("Drag cancelled");
        }
        self.phase = DragPhase::Idle;
    }
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest valid drop target for `hover`, or `None`
pub fn drop_target(source: &DragSource, hover: &HoverTarget, doc: &PageDocument) -> Option<DropTarget> {
    let target = match hover {
        HoverTarget::Outside => return None,

        HoverTarget::Container { parent_id } => {
            let list = doc.list(parent_id.as_ref())?;
            if let Some(id) = parent_id {
                if !doc.find_block(id)?.is_container() {
                    return None;
                }
            }
            DropTarget {
                parent_id: parent_id.clone(),
                index: list.len(),
            }
        }

        HoverTarget::Block {
            id,
            bounds,
            pointer,
            axis,
        } => {
            let block = doc.find_block(id)?;
            let location = doc.locate(id)?;
            let fraction = pointer_fraction(bounds, pointer, *axis);

            if block.is_container() && (INSIDE_BAND.0..=INSIDE_BAND.1).contains(&fraction) {
                DropTarget {
                    parent_id: Some(id.clone()),
                    index: block.children().len(),
                }
            } else if fraction < SPLIT {
                DropTarget {
                    parent_id: location.parent_id,
                    index: location.index,
                }
            } else {
                DropTarget {
                    parent_id: location.parent_id,
                    index: location.index + 1,
                }
            }
        }
    };

    // A block cannot be dropped into its own subtree
    if let (DragSource::Existing(dragged), Some(parent)) = (source, &target.parent_id) {
        if doc.is_descendant(dragged, parent) {
            return None;
        }
    }

    Some(target)
}

fn pointer_fraction(bounds: &Rect, pointer: &Point, axis: Axis) -> f64 {
    let (origin, extent, position) = match axis {
        Axis::Vertical => (bounds.y, bounds.height, pointer.y),
        Axis::Horizontal => (bounds.x, bounds.width, pointer.x),
    };
    if extent <= 0.0 {
        return SPLIT;
    }
    ((position - origin) / extent).clamp(0.0, 1.0)
}

/// The store operation a drop of `source` on `target` stands for.
///
/// `None` when the drop would not change the document (an existing block
/// dropped on its own slot) or is invalid for this document.
pub fn resolve(source: &DragSource, target: &DropTarget, doc: &PageDocument) -> Option<EditOp> {
    match source {
        DragSource::Palette(block_type) => Some(EditOp::InsertBlock {
            block_type: *block_type,
            index: target.index,
            parent_id: target.parent_id.clone(),
        }),

        DragSource::Existing(id) => {
            let location = doc.locate(id)?;
            if let Some(parent) = &target.parent_id {
                if doc.is_descendant(id, parent) {
                    return None;
                }
            }

            let to_index = if location.parent_id == target.parent_id {
                // The slots either side of the block leave it where it is
                if target.index == location.index || target.index == location.index + 1 {
                    return None;
                }
                // Detaching shifts later slots down by one
                if target.index > location.index {
                    target.index - 1
                } else {
                    target.index
                }
            } else {
                target.index
            };

            Some(EditOp::MoveBlock {
                id: id.clone(),
                to_parent_id: target.parent_id.clone(),
                to_index,
            })
        }
    }
}
