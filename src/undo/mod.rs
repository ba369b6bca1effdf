//! Undo/Redo history of committed transactions

use crate::document::Document;
use crate::editing::{Step, Transaction};

/// A single history entry that can be undone/redone
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Description of the operation
    pub description: String,
    /// Forward steps
    pub forward_steps: Vec<Step>,
    /// Inverse steps, in application order of the forward steps
    pub inverse_steps: Vec<Step>,
    /// Timestamp (milliseconds)
    pub timestamp: u64,
}

impl HistoryEntry {
    /// Record a committed transaction
    pub fn from_transaction(tr: &Transaction) -> Self {
        Self {
            description: tr.description().to_string(),
            forward_steps: tr.steps().to_vec(),
            inverse_steps: tr.inverses().to_vec(),
            timestamp: current_timestamp(),
        }
    }

    /// Check if this entry is empty
    pub fn is_empty(&self) -> bool {
        self.forward_steps.is_empty()
    }

    /// Transaction that reverts this entry against `document`
    pub fn undo_transaction(&self, document: &Document) -> Transaction {
        let mut tr = Transaction::new(document)
            .with_description(format!("undo {}", self.description))
            .without_history();
        for step in self.inverse_steps.iter().rev() {
            if let Err(err) = tr.step(step.clone()) {
                log::warn!("undo step at {} skipped: {}", step.path(), err);
            }
        }
        tr
    }

    /// Transaction that reapplies this entry against `document`
    pub fn redo_transaction(&self, document: &Document) -> Transaction {
        let mut tr = Transaction::new(document)
            .with_description(format!("redo {}", self.description))
            .without_history();
        for step in &self.forward_steps {
            if let Err(err) = tr.step(step.clone()) {
                log::warn!("redo step at {} skipped: {}", step.path(), err);
            }
        }
        tr
    }
}

/// Undo/Redo manager
pub struct UndoManager {
    /// Stack of undoable entries
    undo_stack: Vec<HistoryEntry>,
    /// Stack of redoable entries
    redo_stack: Vec<HistoryEntry>,
    /// Maximum history depth
    max_depth: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record a committed transaction
    pub fn record(&mut self, tr: &Transaction) {
        if !tr.add_to_history() || !tr.doc_changed() {
            return;
        }

        // Clear redo stack on new edit
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry::from_transaction(tr));

        // Enforce depth limit
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last entry and build the transaction that reverts it
    pub fn undo(&mut self, document: &Document) -> Option<Transaction> {
        let entry = self.undo_stack.pop()?;
        let tr = entry.undo_transaction(document);
        self.redo_stack.push(entry);
        Some(tr)
    }

    /// Pop the last undone entry and build the transaction that reapplies it
    pub fn redo(&mut self, document: &Document) -> Option<Transaction> {
        let entry = self.redo_stack.pop()?;
        let tr = entry.redo_transaction(document);
        self.undo_stack.push(entry);
        Some(tr)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    fn insert_tr(doc: &Document, text: &str) -> Transaction {
        let mut tr = Transaction::new(doc).with_description("insert");
        tr.insert(doc.len(), Block::paragraph(text)).unwrap();
        tr
    }

    #[test]
    fn test_undo_manager_creation() {
        let manager = UndoManager::new(100);
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_record() {
        let mut manager = UndoManager::new(100);
        let doc = Document::new();
        manager.record(&insert_tr(&doc, "Hello"));
        assert!(manager.can_undo());
        assert!(!manager.can_redo());
        assert_eq!(manager.undo_depth(), 1);
    }

    #[test]
    fn test_skips_empty_and_historyless() {
        let mut manager = UndoManager::new(100);
        let doc = Document::new();
        manager.record(&Transaction::new(&doc));
        manager.record(&insert_tr(&doc, "x").without_history());
        assert_eq!(manager.undo_depth(), 0);
    }

    #[test]
    fn test_undo_redo() {
        let mut manager = UndoManager::new(100);
        let doc = Document::from_text("a");

        let tr = insert_tr(&doc, "b");
        manager.record(&tr);
        let (doc, _, _) = tr.into_parts();
        assert_eq!(doc.text(), "a\nb");

        let (doc, _, _) = manager.undo(&doc).unwrap().into_parts();
        assert_eq!(doc.text(), "a");

        let (doc, _, _) = manager.redo(&doc).unwrap().into_parts();
        assert_eq!(doc.text(), "a\nb");
    }

    #[test]
    fn test_max_depth() {
        let mut manager = UndoManager::new(3);
        let doc = Document::new();
        for i in 0..5 {
            manager.record(&insert_tr(&doc, &format!("op {}", i)));
        }
        assert_eq!(manager.undo_depth(), 3);
    }
}
