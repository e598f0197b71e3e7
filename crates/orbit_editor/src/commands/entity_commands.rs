//! Object lifecycle commands (add, remove).

use orbit_math::Quat;

use super::{Command, CommandNode, Effect, SelectCommand};
use crate::core::{Document, ObjectId, SceneObject};

/// Insert objects into the document.
///
/// The command keeps its own copy of each record; undo removes the objects
/// again, so the same ids come back on redo.
pub struct AddCommand {
    objects: Vec<SceneObject>,
}

impl AddCommand {
    pub fn new(object: SceneObject) -> Self {
        Self {
            objects: vec![object],
        }
    }

    pub fn many(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().map(|object| object.id)
    }
}

impl Command for AddCommand {
    fn description(&self) -> &str {
        if self.objects.len() == 1 {
            "Add Object"
        } else {
            "Add Objects"
        }
    }

    fn on_do(&mut self, doc: &mut Document) -> Effect {
        let mut changed = false;
        for object in &self.objects {
            match doc.insert_object(object.clone()) {
                Ok(_) => changed = true,
                Err(e) => log::warn!("Add skipped: {}", e),
            }
        }
        Effect::edit_if(changed)
    }

    fn on_undo(&mut self, doc: &mut Document) -> Effect {
        let mut changed = false;
        for object in self.objects.iter().rev() {
            changed |= doc.remove_object(object.id).is_some();
        }
        Effect::edit_if(changed)
    }
}

/// Detach objects from the document.
///
/// Records stay alive inside the command together with their former
/// positions in the object list, so undo puts them back where they were.
/// Selected objects leave the selection with their records; undo restores
/// the selection and its rotation reference as they were. Prefer
/// [`RemoveCommand`], which deselects first.
pub struct BaseRemoveCommand {
    ids: Vec<ObjectId>,
    removed: Vec<(usize, SceneObject)>,
    previous_selection: Option<(Vec<ObjectId>, Quat)>,
}

impl BaseRemoveCommand {
    pub fn new(ids: Vec<ObjectId>) -> Self {
        Self {
            ids,
            removed: Vec::new(),
            previous_selection: None,
        }
    }
}

impl Command for BaseRemoveCommand {
    fn description(&self) -> &str {
        "Remove"
    }

    fn on_do(&mut self, doc: &mut Document) -> Effect {
        let selection = doc.selection();
        self.previous_selection = self
            .ids
            .iter()
            .any(|&id| selection.contains(id))
            .then(|| (selection.as_slice().to_vec(), doc.rotation_reference()));

        self.removed = self
            .ids
            .iter()
            .filter_map(|&id| doc.remove_object(id))
            .collect();
        Effect::edit_if(!self.removed.is_empty())
    }

    fn on_undo(&mut self, doc: &mut Document) -> Effect {
        let mut changed = false;
        for (index, object) in self.removed.drain(..).rev() {
            match doc.insert_object_at(object, index) {
                Ok(_) => changed = true,
                Err(e) => log::warn!("Restore skipped: {}", e),
            }
        }

        if let Some((selection, reference)) = self.previous_selection.take() {
            doc.restore_selection(&selection);
            doc.set_rotation_reference(reference);
            doc.recalculate_group_transform();
        }
        Effect::edit_if(changed)
    }
}

/// User-facing removal: deselect, then detach.
pub struct RemoveCommand;

impl RemoveCommand {
    /// Build the composite. Undo restores the objects before reselecting
    /// them, so the selection never names an absent object.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(doc: &Document, ids: &[ObjectId]) -> CommandNode {
        let existing: Vec<ObjectId> = ids.iter().copied().filter(|&id| doc.contains(id)).collect();
        let description = if existing.len() == 1 {
            "Remove Object"
        } else {
            "Remove Objects"
        };

        CommandNode::group(description)
            .with_child(SelectCommand::deselect(doc, &existing))
            .with_child(BaseRemoveCommand::new(existing))
    }
}
