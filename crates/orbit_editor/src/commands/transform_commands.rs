//! Transform commands.

use orbit_math::{Quat, Transform};

use super::{Command, Effect};
use crate::core::{Document, ObjectId};

struct TransformEntry {
    id: ObjectId,
    old_transform: Transform,
    new_transform: Transform,
}

/// Set the committed transforms of several objects at once.
///
/// The previous transforms are read from the document when the command is
/// built, so build it before any of the targets are committed.
pub struct TransformCommand {
    entries: Vec<TransformEntry>,
    old_reference: Quat,
    new_reference: Quat,
}

impl TransformCommand {
    /// Ids missing from the document are dropped.
    pub fn new(
        doc: &Document,
        targets: Vec<(ObjectId, Transform)>,
        rotation_reference: Quat,
    ) -> Self {
        let entries = targets
            .into_iter()
            .filter_map(|(id, new_transform)| {
                let Some(object) = doc.object(id) else {
                    log::warn!("Stale reference to {}; left out of transform", id);
                    return None;
                };
                Some(TransformEntry {
                    id,
                    old_transform: object.transform(),
                    new_transform,
                })
            })
            .collect();

        Self {
            entries,
            old_reference: doc.rotation_reference(),
            new_reference: rotation_reference,
        }
    }

    /// Move a single object, keeping the current rotation reference.
    pub fn single(doc: &Document, id: ObjectId, transform: Transform) -> Self {
        Self::new(doc, vec![(id, transform)], doc.rotation_reference())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// New transform for `id`, if it is a target
    pub fn target(&self, id: ObjectId) -> Option<Transform> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.new_transform)
    }

    fn write(doc: &mut Document, entries: impl Iterator<Item = (ObjectId, Transform)>, reference: Quat) {
        for (id, transform) in entries {
            doc.set_object_transform(id, transform);
        }
        doc.set_rotation_reference(reference);
        doc.recalculate_group_transform();
    }
}

impl Command for TransformCommand {
    fn description(&self) -> &str {
        "Transform"
    }

    fn on_do(&mut self, doc: &mut Document) -> Effect {
        let entries = self.entries.iter().map(|e| (e.id, e.new_transform));
        Self::write(doc, entries, self.new_reference);
        Effect::EDIT
    }

    fn on_undo(&mut self, doc: &mut Document) -> Effect {
        let entries = self.entries.iter().rev().map(|e| (e.id, e.old_transform));
        Self::write(doc, entries, self.old_reference);
        Effect::EDIT
    }
}
