//! # Undo/Redo History
//!
//! Tracks document snapshots and enables undo/redo.
//!
//! ## Design
//!
//! - Each committed edit records the document as it was before the edit
//! - Undo swaps the current document with the most recent snapshot and moves
//!   the displaced document to the redo stack
//! - Redo does the reverse
//! - New edits clear the redo stack
//! - Edits between `begin_batch` and `end_batch` form one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//!
//! let before = doc.clone();
//! edit(&mut doc);
//! history.record(before, "insert");
//!
//! history.undo(&mut doc);
//! history.redo(&mut doc);
//! ```

use pagecraft_blocks::PageDocument;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One undo step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Document state to return to
    pub snapshot: PageDocument,

    /// Name of the edit (or batch) that moved away from `snapshot`
    pub label: String,
}

/// Bounded undo/redo history for a page document
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots before each step (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Snapshots displaced by undo (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batch: the snapshot taken before its first edit, if any
    current_batch: Option<Option<HistoryEntry>>,
}

impl History {
    /// Create a history with the default limit (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record the document as it was before a committed edit
    pub fn record(&mut self, before: PageDocument, label: impl Into<String>) {
        match &mut self.current_batch {
            // Only the state before the first edit of a batch matters
            Some(Some(_)) => {}
            Some(slot @ None) => {
                *slot = Some(HistoryEntry {
                    snapshot: before,
                    label: label.into(),
                });
            }
            None => self.push_entry(HistoryEntry {
                snapshot: before,
                label: label.into(),
            }),
        }
        // New action invalidates the redo future, batched or not
        self.redo_stack.clear();
    }

    /// Start grouping edits into one undo step
    pub fn begin_batch(&mut self) {
        if self.current_batch.is_none() {
            self.current_batch = Some(None);
        }
    }

    /// Close the current batch; empty batches leave no entry
    pub fn end_batch(&mut self, label: Option<&str>) {
        if let Some(Some(mut entry)) = self.current_batch.take() {
            if let Some(label) = label {
                entry.label = label.to_string();
            }
            self.push_entry(entry);
        }
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
    }

    /// Restore the previous snapshot into `doc`. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self, doc: &mut PageDocument) -> bool {
        match self.undo_stack.pop() {
            Some(entry) => {
                let current = std::mem::replace(doc, entry.snapshot);
                self.redo_stack.push(HistoryEntry {
                    snapshot: current,
                    label: entry.label,
                });
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone step
    pub fn redo(&mut self, doc: &mut PageDocument) -> bool {
        match self.redo_stack.pop() {
            Some(entry) => {
                let current = std::mem::replace(doc, entry.snapshot);
                self.undo_stack.push(HistoryEntry {
                    snapshot: current,
                    label: entry.label,
                });
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Label of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|entry| entry.label.as_str())
    }

    /// Label of the step `redo` would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|entry| entry.label.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::Slug;

    fn doc(title: &str) -> PageDocument {
        PageDocument::blank(Slug::parse("home").unwrap(), title)
    }

    #[test]
    fn test_undo_redo_round() {
        let mut history = History::new();
        let mut current = doc("v1");
        history.record(doc("v0"), "edit");

        assert!(history.undo(&mut current));
        assert_eq!(current.title, "v0");
        assert!(history.can_redo());

        assert!(history.redo(&mut current));
        assert_eq!(current.title, "v1");
        assert!(!history.redo(&mut current));
    }

    #[test]
    fn test_empty_undo_is_noop() {
        let mut history = History::new();
        let mut current = doc("v0");
        assert!(!history.undo(&mut current));
        assert_eq!(current.title, "v0");
    }

    #[test]
    fn test_max_levels_discards_oldest() {
        let mut history = History::with_max_levels(2);
        for i in 0..3 {
            history.record(doc(&format!("v{}", i)), format!("edit-{}", i));
        }

        assert_eq!(history.undo_levels(), 2);
        let mut current = doc("v3");
        history.undo(&mut current);
        history.undo(&mut current);
        assert_eq!(current.title, "v1");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_batch_is_one_step() {
        let mut history = History::new();
        history.begin_batch();
        history.record(doc("v0"), "a");
        history.record(doc("v1"), "b");
        history.end_batch(Some("script"));

        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.undo_description(), Some("script"));

        let mut current = doc("v2");
        history.undo(&mut current);
        assert_eq!(current.title, "v0");
    }

    #[test]
    fn test_empty_batch_leaves_no_entry() {
        let mut history = History::new();
        history.begin_batch();
        history.end_batch(None);
        assert!(!history.can_undo());
        assert!(!history.in_batch());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::new();
        let mut current = doc("v1");
        history.record(doc("v0"), "a");
        history.undo(&mut current);
        history.record(doc("v0"), "b");
        assert!(!history.can_redo());
    }
}
