//! Selection commands.
//!
//! Each constructor reduces its request to two id lists, computed once
//! against the selection at construction time:
//!
//! | operation  | add                   | remove                |
//! |------------|-----------------------|-----------------------|
//! | `select`   | objects − selection   | ∅                     |
//! | `deselect` | ∅                     | objects ∩ selection   |
//! | `set_to`   | objects − selection   | selection − objects   |
//! | `toggle`   | objects − selection   | objects ∩ selection   |

use orbit_math::Quat;

use super::{Command, Effect};
use crate::core::{Document, ObjectId, SelectionMode};

/// Change selection membership.
pub struct SelectCommand {
    add: Vec<ObjectId>,
    remove: Vec<ObjectId>,
    /// Reference to install on do; computed from the new selection if `None`
    rotation_reference: Option<Quat>,
    previous_reference: Quat,
}

impl SelectCommand {
    fn from_sets(doc: &Document, add: Vec<ObjectId>, remove: Vec<ObjectId>) -> Self {
        Self {
            add,
            remove,
            rotation_reference: None,
            previous_reference: doc.rotation_reference(),
        }
    }

    /// Add `objects` to the selection
    pub fn select(doc: &Document, objects: &[ObjectId]) -> Self {
        let add = unique_existing(doc, objects)
            .filter(|id| !doc.selection().contains(*id))
            .collect();
        Self::from_sets(doc, add, Vec::new())
    }

    /// Remove `objects` from the selection
    pub fn deselect(doc: &Document, objects: &[ObjectId]) -> Self {
        let remove = unique(objects)
            .filter(|id| doc.selection().contains(*id))
            .collect();
        Self::from_sets(doc, Vec::new(), remove)
    }

    /// Make the selection exactly `objects`
    pub fn set_to(doc: &Document, objects: &[ObjectId]) -> Self {
        let add = unique_existing(doc, objects)
            .filter(|id| !doc.selection().contains(*id))
            .collect();
        let remove = doc
            .selection()
            .iter()
            .copied()
            .filter(|id| !objects.contains(id))
            .collect();
        Self::from_sets(doc, add, remove)
    }

    /// Flip the selection state of each of `objects`
    pub fn toggle(doc: &Document, objects: &[ObjectId]) -> Self {
        let (remove, add): (Vec<_>, Vec<_>) = unique_existing(doc, objects)
            .partition(|id| doc.selection().contains(*id));
        Self::from_sets(doc, add, remove)
    }

    /// Empty the selection
    pub fn clear(doc: &Document) -> Self {
        Self::set_to(doc, &[])
    }

    /// Command for a click with the given modifier mode
    pub fn from_mode(doc: &Document, mode: SelectionMode, objects: &[ObjectId]) -> Self {
        match mode {
            SelectionMode::Replace => Self::set_to(doc, objects),
            SelectionMode::Add => Self::select(doc, objects),
            SelectionMode::Remove => Self::deselect(doc, objects),
            SelectionMode::Toggle => Self::toggle(doc, objects),
        }
    }

    /// Install this rotation reference instead of computing one.
    pub fn with_rotation_reference(mut self, rotation: Quat) -> Self {
        self.rotation_reference = Some(rotation);
        self
    }

    pub fn added(&self) -> &[ObjectId] {
        &self.add
    }

    pub fn removed(&self) -> &[ObjectId] {
        &self.remove
    }

    /// Whether doing this command would change nothing
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

impl Command for SelectCommand {
    fn description(&self) -> &str {
        match (self.add.is_empty(), self.remove.is_empty()) {
            (false, true) => "Select",
            (true, false) => "Deselect",
            _ => "Change Selection",
        }
    }

    fn on_do(&mut self, doc: &mut Document) -> Effect {
        if self.is_empty() {
            return Effect::NONE;
        }

        doc.apply_selection(&self.add, &self.remove);
        let reference = self
            .rotation_reference
            .unwrap_or_else(|| doc.compute_rotation_reference());
        doc.set_rotation_reference(reference);
        doc.recalculate_group_transform();
        Effect::TRANSIENT
    }

    fn on_undo(&mut self, doc: &mut Document) -> Effect {
        if self.is_empty() {
            return Effect::NONE;
        }

        doc.apply_selection(&self.remove, &self.add);
        doc.set_rotation_reference(self.previous_reference);
        doc.recalculate_group_transform();
        Effect::TRANSIENT
    }
}

fn unique(objects: &[ObjectId]) -> impl Iterator<Item = ObjectId> + '_ {
    objects
        .iter()
        .enumerate()
        .filter(move |(i, id)| !objects[..*i].contains(*id))
        .map(|(_, id)| *id)
}

fn unique_existing<'a>(
    doc: &'a Document,
    objects: &'a [ObjectId],
) -> impl Iterator<Item = ObjectId> + 'a {
    unique(objects).filter(move |id| doc.contains(*id))
}
