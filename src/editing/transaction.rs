//! Transactions: batches of steps applied against a working copy

use crate::document::{Document, Node};
use crate::editing::{NodePath, Step};
use crate::error::Result;
use std::ops::Range;

/// Receives finished transactions.
///
/// Commands take an `Option<&mut dyn Dispatch>`; `None` means the caller only
/// wants to know whether the command could run.
pub trait Dispatch {
    fn dispatch(&mut self, tr: Transaction);
}

/// A batch of steps built on top of a snapshot of the document.
///
/// Steps are applied to the working copy as they are added, so later steps
/// see the effect of earlier ones. Every step is recorded together with its
/// inverse for the undo history.
#[derive(Debug, Clone)]
pub struct Transaction {
    before: Document,
    doc: Document,
    steps: Vec<Step>,
    inverses: Vec<Step>,
    description: String,
    add_to_history: bool,
    page_refresh: bool,
}

impl Transaction {
    /// Start a transaction against `doc`
    pub fn new(doc: &Document) -> Self {
        Self {
            before: doc.clone(),
            doc: doc.clone(),
            steps: Vec::new(),
            inverses: Vec::new(),
            description: String::new(),
            add_to_history: true,
            page_refresh: false,
        }
    }

    /// Document state when the transaction started
    pub fn before(&self) -> &Document {
        &self.before
    }

    /// Working copy with every step so far applied
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn inverses(&self) -> &[Step] {
        &self.inverses
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_to_history(&self) -> bool {
        self.add_to_history
    }

    /// Keep this transaction out of the undo history
    pub fn without_history(mut self) -> Self {
        self.add_to_history = false;
        self
    }

    /// Whether this is a deferred page-count recompute
    pub fn is_page_refresh(&self) -> bool {
        self.page_refresh
    }

    pub fn mark_page_refresh(mut self) -> Self {
        self.page_refresh = true;
        self
    }

    /// Apply and record one step
    pub fn step(&mut self, step: Step) -> Result<&mut Self> {
        let inverse = self.doc.compute_inverse(&step)?;
        self.doc.apply_step(step.clone())?;
        self.steps.push(step);
        self.inverses.push(inverse);
        Ok(self)
    }

    /// Insert a root-level node
    pub fn insert(&mut self, index: usize, node: impl Into<Node>) -> Result<&mut Self> {
        self.step(Step::insert(index, node))
    }

    /// Insert `node` as child `index` of the container at root `parent`
    pub fn insert_child(&mut self, parent: usize, index: usize, node: impl Into<Node>) -> Result<&mut Self> {
        self.step(Step::Insert {
            path: NodePath::child(parent, index),
            node: node.into(),
        })
    }

    /// Delete a root-level node
    pub fn delete(&mut self, index: usize) -> Result<&mut Self> {
        self.step(Step::delete(index))
    }

    /// Replace a root-level node
    pub fn replace(&mut self, index: usize, node: impl Into<Node>) -> Result<&mut Self> {
        self.step(Step::replace(index, node))
    }

    /// Delete every root-level node in `range`, last first
    pub fn delete_range(&mut self, range: Range<usize>) -> Result<&mut Self> {
        for index in range.rev() {
            self.delete(index)?;
        }
        Ok(self)
    }

    /// Insert several root-level nodes starting at `index`, as a paste would
    pub fn insert_all(&mut self, index: usize, nodes: Vec<Node>) -> Result<&mut Self> {
        for (offset, node) in nodes.into_iter().enumerate() {
            self.insert(index + offset, node)?;
        }
        Ok(self)
    }

    /// Fold a follow-up transaction built on this one's result into it
    pub fn append(&mut self, follow_up: Transaction) {
        self.doc = follow_up.doc;
        self.steps.extend(follow_up.steps);
        self.inverses.extend(follow_up.inverses);
    }

    /// Split into the final document, forward steps and inverse steps
    pub fn into_parts(self) -> (Document, Vec<Step>, Vec<Step>) {
        (self.doc, self.steps, self.inverses)
    }
}
