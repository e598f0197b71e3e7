//! Selection set with multi-select support.
//!
//! Modifier mapping follows common editor conventions:
//! - Click: Replace selection
//! - Shift+Click: Add to selection
//! - Ctrl+Click: Remove from selection
//! - Ctrl+Shift+Click: Toggle selection
//!
//! The set is read-only outside the crate; membership changes go through
//! `SelectCommand` so that every change is undoable and the objects'
//! `selected` flags stay in step.

use super::ObjectId;

/// Selection mode based on modifier keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace current selection (normal click)
    #[default]
    Replace,
    /// Add to current selection (Shift+click)
    Add,
    /// Remove from current selection (Ctrl+click)
    Remove,
    /// Toggle selection state (Ctrl+Shift+click)
    Toggle,
}

impl SelectionMode {
    /// Determine selection mode from modifier keys.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        match (shift, ctrl) {
            (true, true) => Self::Toggle,
            (true, false) => Self::Add,
            (false, true) => Self::Remove,
            (false, false) => Self::Replace,
        }
    }
}

/// The selected objects of one document, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: Vec<ObjectId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// First selected object
    pub fn primary(&self) -> Option<ObjectId> {
        self.selected.first().copied()
    }

    /// All selected objects, in selection order
    pub fn as_slice(&self) -> &[ObjectId] {
        &self.selected
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    /// Returns false if already present
    pub(crate) fn insert(&mut self, id: ObjectId) -> bool {
        if self.selected.contains(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Returns false if not present
    pub(crate) fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&s| s != id);
        self.selected.len() != before
    }
}
