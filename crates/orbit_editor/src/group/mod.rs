//! Group (selection) transform engine.
//!
//! Maintains one oriented bounding transform for the current selection and
//! maps edits of that aggregate back onto every member. A manipulation
//! session starts from `recalculate`, which captures each member's pose;
//! `set_current` drives the live preview and `apply` re-expresses every
//! member relative to the moved aggregate.
//!
//! The state here is a transient cache: it is rebuilt whenever the selection
//! or the rotation reference changes and is never persisted.

use orbit_math::{Aabb, Mat4, Quat, Transform, Vec3};

use crate::core::ObjectId;

/// Rotation reference for a selection.
///
/// Identity for an empty selection; otherwise the first member's rotation if
/// every member shares it exactly, else identity (a world-aligned box).
/// Equality is exact: rotations that differ only by floating point drift
/// count as different.
pub fn rotation_reference(rotations: impl IntoIterator<Item = Quat>) -> Quat {
    let mut rotations = rotations.into_iter();
    let Some(candidate) = rotations.next() else {
        return Quat::IDENTITY;
    };
    if rotations.all(|rotation| rotation == candidate) {
        candidate
    } else {
        Quat::IDENTITY
    }
}

/// A member's pose at session start and its latest previewed pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberSnapshot {
    pub initial: Transform,
    pub current: Transform,
}

/// Input to `GroupTransform::recalculate`: a materialized selected object.
#[derive(Clone, Copy, Debug)]
pub struct GroupMember {
    pub id: ObjectId,
    pub transform: Transform,
    pub bounds: Aabb,
}

/// Aggregate transform state for one document's selection.
#[derive(Clone, Debug)]
pub struct GroupTransform {
    rotation_reference: Quat,
    initial: Transform,
    current: Transform,
    members: Vec<(ObjectId, MemberSnapshot)>,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupTransform {
    pub fn new() -> Self {
        Self {
            rotation_reference: Quat::IDENTITY,
            initial: Transform::IDENTITY,
            current: Transform::IDENTITY,
            members: Vec::new(),
        }
    }

    pub fn rotation_reference(&self) -> Quat {
        self.rotation_reference
    }

    /// Aggregate transform when the session started
    pub fn initial_transform(&self) -> Transform {
        self.initial
    }

    /// Live preview value
    pub fn current_transform(&self) -> Transform {
        self.current
    }

    /// Snapshots in selection order
    pub fn members(&self) -> &[(ObjectId, MemberSnapshot)] {
        &self.members
    }

    pub fn member(&self, id: ObjectId) -> Option<&MemberSnapshot> {
        self.members
            .iter()
            .find(|(member_id, _)| *member_id == id)
            .map(|(_, snapshot)| snapshot)
    }

    /// Sticky until the next explicit change; `recalculate` does not touch it.
    pub(crate) fn set_rotation_reference(&mut self, rotation: Quat) {
        self.rotation_reference = rotation;
    }

    /// Rebuild snapshots and the aggregate box from the given members.
    ///
    /// The box is the union of every member's bounds re-expressed in the
    /// rotation reference's frame, so a shared rotation yields a tight
    /// oriented box and a single member yields exactly its own extents.
    pub(crate) fn recalculate(&mut self, members: &[GroupMember]) {
        self.members = members
            .iter()
            .map(|member| {
                (
                    member.id,
                    MemberSnapshot {
                        initial: member.transform,
                        current: member.transform,
                    },
                )
            })
            .collect();

        let probe = Transform::IDENTITY.with_rotation(self.rotation_reference);
        let world_to_probe = probe.world_to_local();

        let extents = members.iter().fold(Aabb::EMPTY, |acc, member| {
            let to_probe = world_to_probe * member.transform.local_to_world();
            acc.union(&member.bounds.transformed(&to_probe))
        });

        let aggregate = if extents.is_empty() {
            probe
        } else {
            Transform::new(
                probe.transform_point(extents.center()),
                self.rotation_reference,
                extents.size(),
            )
        };

        self.initial = aggregate;
        self.current = aggregate;
    }

    /// Preview value; no bounds are recomputed.
    pub(crate) fn set_current(&mut self, transform: Transform) {
        self.current = transform;
    }

    /// Drop snapshots for members that no longer exist or are not live.
    pub(crate) fn retain_members(&mut self, mut keep: impl FnMut(ObjectId) -> bool) -> usize {
        let before = self.members.len();
        self.members.retain(|(id, _)| keep(*id));
        before - self.members.len()
    }

    /// Re-express every member relative to the current aggregate.
    ///
    /// Each member keeps its pose relative to the aggregate at session start:
    /// `current * inverse(initial) * member_initial`. Axes where the initial
    /// aggregate is flat (extent below `min_extent`) cannot be inverted and
    /// are held at unit scale on both sides. Returns the new member poses.
    pub(crate) fn apply(&mut self, min_extent: f32) -> Vec<(ObjectId, Transform)> {
        let flat = self.initial.scale.abs().cmplt(Vec3::splat(min_extent));
        let initial = self
            .initial
            .with_scale(Vec3::select(flat, Vec3::ONE, self.initial.scale));
        let current = self
            .current
            .with_scale(Vec3::select(flat, Vec3::ONE, self.current.scale));

        let delta: Mat4 = current.local_to_world() * initial.world_to_local();

        let mut updates = Vec::with_capacity(self.members.len());
        for (id, snapshot) in &mut self.members {
            let moved = delta * snapshot.initial.local_to_world();
            match Transform::from_matrix(&moved) {
                Some(transform) => {
                    snapshot.current = transform;
                    updates.push((*id, transform));
                }
                None => log::warn!("Skipping {}: degenerate group transform", id),
            }
        }
        updates
    }
}
