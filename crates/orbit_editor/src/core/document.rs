//! Document state - single source of truth for one open document.
//!
//! Holds the object table, the selection and the group transform. Commands
//! receive `&mut Document` and mutate it through the crate-private methods
//! here, which keep the selection set and the objects' `selected` flags in
//! step and publish notifications. Read access is public.

use std::collections::HashMap;

use orbit_event::{Event, EventBus, SubscriberId};
use orbit_math::{Aabb, Quat, Transform};

use super::{EditorPreferences, ObjectId, SceneObject, SelectionSet};
use crate::commands::TransformCommand;
use crate::error::{DocumentError, Result};
use crate::events::{
    GroupTransformChanged, ObjectsAdded, ObjectsRemoved, PreviewChanged, PropertyChanged,
    SelectionChanged, TransformChanged,
};
use crate::group::{self, GroupMember, GroupTransform};

/// Central document state.
pub struct Document {
    objects: Vec<SceneObject>,
    object_map: HashMap<ObjectId, usize>,
    selection: SelectionSet,
    group: GroupTransform,
    events: EventBus,
    min_group_extent: f32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_preferences(&EditorPreferences::default())
    }

    pub fn with_preferences(preferences: &EditorPreferences) -> Self {
        Self {
            objects: Vec::new(),
            object_map: HashMap::new(),
            selection: SelectionSet::new(),
            group: GroupTransform::new(),
            events: EventBus::new(),
            min_group_extent: preferences.min_group_extent,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Get an object by ID.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.object_map.get(&id).map(|&idx| &self.objects[idx])
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.object_map.contains_key(&id)
    }

    /// Objects in document order
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn group(&self) -> &GroupTransform {
        &self.group
    }

    /// Live preview value of the selection transform; gizmos read this.
    pub fn current_transform(&self) -> Transform {
        self.group.current_transform()
    }

    pub fn initial_transform(&self) -> Transform {
        self.group.initial_transform()
    }

    pub fn rotation_reference(&self) -> Quat {
        self.group.rotation_reference()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Register an observer. Keep the id and pass it to `unsubscribe` on teardown.
    pub fn subscribe<E: Event, F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Deliver pending notifications. Returns the number of events processed.
    pub fn process_events(&mut self) -> usize {
        self.events.process()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn publish<E: Event>(&self, event: E) {
        self.events.publish(event);
    }

    /// Drop every subscription and pending event. Also run on drop.
    pub fn shutdown(&mut self) {
        let subscribers = self.events.subscriber_count();
        if subscribers > 0 {
            log::debug!("Releasing {} document subscribers", subscribers);
        }
        self.events.clear_subscribers();
        self.events.clear();
    }

    // ------------------------------------------------------------------
    // Object table
    // ------------------------------------------------------------------

    /// Insert an object and instantiate its live representation.
    ///
    /// Used by loaders and by `AddCommand`; not recorded in history. The
    /// object always enters unselected.
    pub fn insert_object(&mut self, object: SceneObject) -> Result<ObjectId> {
        let index = self.objects.len();
        self.insert_object_at(object, index)
    }

    pub(crate) fn insert_object_at(&mut self, mut object: SceneObject, index: usize) -> Result<ObjectId> {
        let id = object.id;
        if self.object_map.contains_key(&id) {
            return Err(DocumentError::DuplicateObject(id));
        }

        object.selected = false;
        if !object.instantiate() {
            log::debug!("{} has no geometry yet; not materialized", id);
        }

        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        self.reindex_from(index);

        self.publish(ObjectsAdded { ids: vec![id] });
        Ok(id)
    }

    /// Remove an object, destroying its live representation.
    ///
    /// Returns the former index and the record (kept alive by the caller for
    /// undo). A selected object is dropped from the selection so the set
    /// never names absent objects.
    pub(crate) fn remove_object(&mut self, id: ObjectId) -> Option<(usize, SceneObject)> {
        let index = self.object_map.remove(&id)?;
        let mut object = self.objects.remove(index);
        self.reindex_from(index);

        object.live = None;
        if object.selected {
            log::debug!("{} removed while selected; dropping from selection", id);
            object.selected = false;
            self.selection.remove(id);
            self.publish_selection();
            self.recalculate_rotation_reference();
        }

        self.publish(ObjectsRemoved { ids: vec![id] });
        Some((index, object))
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, object) in self.objects.iter().enumerate().skip(start) {
            self.object_map.insert(object.id, idx);
        }
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.object_map.get(&id).map(|&idx| &mut self.objects[idx])
    }

    /// Supply geometry bounds for an object whose representation was pending
    /// (e.g. an asset bundle finished loading) and instantiate it.
    pub fn materialize(&mut self, id: ObjectId, bounds: Aabb) -> Result<()> {
        let object = self
            .object_mut(id)
            .ok_or(DocumentError::UnknownObject(id))?;

        if let super::ObjectKind::Asset { bounds: slot, .. } = &mut object.kind {
            *slot = Some(bounds);
        }
        object.live = Some(super::LiveObject {
            transform: object.transform,
            bounds,
        });
        let selected = object.selected;

        if selected {
            self.recalculate_group_transform();
        }
        Ok(())
    }

    /// Write a committed transform; the live representation follows.
    /// Returns false for unknown ids.
    pub(crate) fn set_object_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        let Some(object) = self.object_mut(id) else {
            log::warn!("Stale reference to {}; transform not applied", id);
            return false;
        };
        object.transform = transform;
        if let Some(live) = object.live.as_mut() {
            live.transform = transform;
        }
        self.publish(TransformChanged { id, transform });
        true
    }

    /// Mutate kind-specific data. The live bounds are refreshed and the group
    /// transform recalculated if the object is selected.
    pub(crate) fn update_object(
        &mut self,
        id: ObjectId,
        property: &'static str,
        update: impl FnOnce(&mut SceneObject) -> bool,
    ) -> bool {
        let Some(object) = self.object_mut(id) else {
            log::warn!("Stale reference to {}; {} not applied", id, property);
            return false;
        };
        if !update(object) {
            return false;
        }
        if object.live.is_some() || object.kind.local_bounds().is_some() {
            object.instantiate();
        }
        let selected = object.selected;

        self.publish(PropertyChanged { id, property });
        if selected {
            self.recalculate_group_transform();
        }
        true
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Remove then add, updating set membership and flags together.
    /// Unknown ids are skipped. Returns true if membership changed.
    pub(crate) fn apply_selection(&mut self, add: &[ObjectId], remove: &[ObjectId]) -> bool {
        let mut changed = false;

        for &id in remove {
            if self.selection.remove(id) {
                self.release_preview(id);
                changed = true;
            }
        }

        for &id in add {
            let Some(object) = self.object_mut(id) else {
                log::warn!("Stale reference to {}; not selected", id);
                continue;
            };
            object.selected = true;
            changed |= self.selection.insert(id);
        }

        if changed {
            self.publish_selection();
        }
        changed
    }

    /// Replace the selection with `ids` in their given order. Unknown ids
    /// are skipped. Returns true if the selection changed.
    pub(crate) fn restore_selection(&mut self, ids: &[ObjectId]) -> bool {
        let mut restored = SelectionSet::new();
        for &id in ids {
            if self.contains(id) {
                restored.insert(id);
            }
        }
        if restored == self.selection {
            return false;
        }

        let previous = std::mem::replace(&mut self.selection, restored);
        for &id in previous.iter() {
            if !self.selection.contains(id) {
                self.release_preview(id);
            }
        }
        let selected = self.selection.as_slice().to_vec();
        for id in selected {
            if let Some(object) = self.object_mut(id) {
                object.selected = true;
            }
        }
        self.publish_selection();
        true
    }

    /// Clear the selected flag and put the live pose back on the committed
    /// transform, dropping any preview left from a drag.
    fn release_preview(&mut self, id: ObjectId) {
        let Some(&idx) = self.object_map.get(&id) else {
            return;
        };
        let object = &mut self.objects[idx];
        object.selected = false;
        if let Some(live) = object.live.as_mut() {
            if live.transform != object.transform {
                live.transform = object.transform;
                self.events.publish(PreviewChanged {
                    id,
                    transform: object.transform,
                });
            }
        }
    }

    fn publish_selection(&self) {
        self.publish(SelectionChanged {
            selected: self.selection.as_slice().to_vec(),
        });
    }

    // ------------------------------------------------------------------
    // Group transform
    // ------------------------------------------------------------------

    pub(crate) fn set_rotation_reference(&mut self, rotation: Quat) {
        self.group.set_rotation_reference(rotation);
    }

    /// Rotation reference the current selection would get from scratch.
    pub fn compute_rotation_reference(&self) -> Quat {
        group::rotation_reference(
            self.selection
                .iter()
                .filter_map(|&id| self.object(id))
                .map(|object| object.transform.rotation),
        )
    }

    /// Recompute and store the rotation reference, then the group transform.
    pub fn recalculate_rotation_reference(&mut self) {
        let rotation = self.compute_rotation_reference();
        self.set_rotation_reference(rotation);
        self.recalculate_group_transform();
    }

    /// Start a manipulation session: snapshot every materialized selected
    /// object and rebuild the aggregate box. Any preview left on the members
    /// is discarded in favour of their committed transforms.
    pub fn recalculate_group_transform(&mut self) {
        let mut members = Vec::with_capacity(self.selection.len());
        for &id in self.selection.iter() {
            let Some(&idx) = self.object_map.get(&id) else {
                continue;
            };
            let object = &mut self.objects[idx];
            let Some(live) = object.live.as_mut() else {
                continue;
            };
            if live.transform != object.transform {
                live.transform = object.transform;
                self.events.publish(PreviewChanged {
                    id,
                    transform: object.transform,
                });
            }
            members.push(GroupMember {
                id,
                transform: object.transform,
                bounds: live.bounds,
            });
        }

        self.group.recalculate(&members);
        self.publish(GroupTransformChanged {
            transform: self.group.current_transform(),
        });
    }

    /// Set the live preview value. Cheap; recomputes nothing.
    pub fn set_current_transform(&mut self, transform: Transform) {
        if !transform.is_finite() {
            log::warn!("Ignoring non-finite group transform {:?}", transform);
            return;
        }
        log::trace!("Group preview {:?}", transform);
        self.group.set_current(transform);
        self.publish(GroupTransformChanged { transform });
    }

    /// Move every member's live representation to follow the current
    /// aggregate. Members that vanished since the session started are
    /// dropped. Returns the number of members moved.
    pub fn apply_to_members(&mut self) -> usize {
        let object_map = &self.object_map;
        let objects = &self.objects;
        let dropped = self.group.retain_members(|id| {
            object_map
                .get(&id)
                .map_or(false, |&idx| objects[idx].live.is_some())
        });
        if dropped > 0 {
            log::warn!("Dropped {} stale group members", dropped);
        }

        let updates = self.group.apply(self.min_group_extent);
        for (id, transform) in &updates {
            if let Some(live) = self.object_mut(*id).and_then(|o| o.live.as_mut()) {
                live.transform = *transform;
            }
            self.publish(PreviewChanged {
                id: *id,
                transform: *transform,
            });
        }
        updates.len()
    }

    /// Package the session's member poses as a command. Does not execute it.
    pub fn build_transform_command(&self) -> TransformCommand {
        let entries = self
            .group
            .members()
            .iter()
            .map(|(id, snapshot)| (*id, snapshot.current))
            .collect();
        TransformCommand::new(self, entries, self.group.current_transform().rotation)
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        self.shutdown();
    }
}
