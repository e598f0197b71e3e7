//! Drag session for move / rotate / scale tools.
//!
//! A tool starts a session when the pointer grabs a handle, feeds it pointer
//! updates every frame, and finishes it on release. Every update is computed
//! from the document's initial aggregate transform, so repeated updates with
//! the same input give the same member poses. If the group is rebuilt while
//! the drag is live (a member removed, an asset loaded), later updates start
//! from the rebuilt box.

use orbit_math::{radians, snap, Quat, Transform, Vec3};

use crate::commands::TransformCommand;
use crate::core::{Document, SnapSettings, UndoHistory};

/// One in-progress manipulation of the selection.
#[derive(Debug)]
pub struct ManipulationSession {
    snap: SnapSettings,
}

impl ManipulationSession {
    /// Snapshot the selection. Returns `None` when nothing selected is
    /// materialized, since there would be nothing to move.
    pub fn begin(doc: &mut Document, snap: SnapSettings) -> Option<Self> {
        doc.recalculate_group_transform();
        if doc.group().members().is_empty() {
            log::debug!("Nothing to manipulate");
            return None;
        }

        log::debug!("Manipulation started at {:?}", doc.initial_transform().position);
        Some(Self { snap })
    }

    pub fn snap_settings(&self) -> SnapSettings {
        self.snap
    }

    /// Toggle snapping mid-drag (e.g. while a modifier is held).
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap.enabled = enabled;
    }

    /// Offset the selection by `delta` from where it started.
    pub fn translate_by(&self, doc: &mut Document, delta: Vec3) {
        let delta = if self.snap.enabled {
            Vec3::new(
                snap(delta.x, self.snap.translate),
                snap(delta.y, self.snap.translate),
                snap(delta.z, self.snap.translate),
            )
        } else {
            delta
        };
        let initial = doc.initial_transform();
        self.preview(doc, initial.with_position(initial.position + delta));
    }

    /// Translate by the pointer's travel since it grabbed the handle.
    pub fn drag_to(&self, doc: &mut Document, grab_point: Vec3, pointer: Vec3) {
        self.translate_by(doc, pointer - grab_point);
    }

    /// Rotate the selection about its center by `angle` radians around a
    /// world-space `axis`.
    pub fn rotate_by(&self, doc: &mut Document, axis: Vec3, angle: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            log::warn!("Ignoring rotation about a zero axis");
            return;
        }

        let angle = if self.snap.enabled {
            snap(angle, radians(self.snap.rotate_degrees))
        } else {
            angle
        };
        let initial = doc.initial_transform();
        let rotation = (Quat::from_axis_angle(axis, angle) * initial.rotation).normalize();
        self.preview(doc, initial.with_rotation(rotation));
    }

    /// Scale the selection about its center by `factor` per local axis.
    pub fn scale_by(&self, doc: &mut Document, factor: Vec3) {
        let factor = if self.snap.enabled {
            Vec3::new(
                snap(factor.x, self.snap.scale),
                snap(factor.y, self.snap.scale),
                snap(factor.z, self.snap.scale),
            )
        } else {
            factor
        };
        let initial = doc.initial_transform();
        self.preview(doc, initial.with_scale(initial.scale * factor));
    }

    /// Preview an absolute aggregate transform, unsnapped.
    pub fn set_transform(&self, doc: &mut Document, transform: Transform) {
        self.preview(doc, transform);
    }

    fn preview(&self, doc: &mut Document, transform: Transform) {
        doc.set_current_transform(transform);
        doc.apply_to_members();
    }

    /// Whether the previewed aggregate differs from the starting one
    pub fn has_moved(&self, doc: &Document) -> bool {
        doc.current_transform() != doc.initial_transform()
    }

    /// Commit the preview as one undoable command.
    ///
    /// A session that never moved records nothing; its members are put back
    /// on their committed poses. Returns true if a command was recorded.
    pub fn finish(self, doc: &mut Document, history: &mut UndoHistory) -> bool {
        if !self.has_moved(doc) {
            self.cancel(doc);
            return false;
        }

        let command: TransformCommand = doc.build_transform_command();
        if command.is_empty() {
            self.cancel(doc);
            return false;
        }
        history.execute(doc, command)
    }

    /// Abandon the preview. The members return to their committed poses.
    pub fn cancel(self, doc: &mut Document) {
        log::debug!("Manipulation cancelled");
        doc.recalculate_group_transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SelectCommand;
    use crate::core::{ObjectId, SceneObject, ShapeType};
    use std::f32::consts::FRAC_PI_2;

    fn selected_pair() -> (Document, UndoHistory, ObjectId, ObjectId) {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        let a = doc
            .insert_object(
                SceneObject::shape("Left", ShapeType::Cube)
                    .with_transform(Transform::from_position(Vec3::new(-1.0, 0.0, 0.0))),
            )
            .unwrap();
        let b = doc
            .insert_object(
                SceneObject::shape("Right", ShapeType::Cube)
                    .with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap();
        let command = SelectCommand::select(&doc, &[a, b]);
        history.execute(&mut doc, command);
        (doc, history, a, b)
    }

    #[test]
    fn test_begin_requires_selection() {
        let mut doc = Document::new();
        assert!(ManipulationSession::begin(&mut doc, SnapSettings::default()).is_none());
    }

    #[test]
    fn test_preview_leaves_committed_transform() {
        let (mut doc, _history, a, _) = selected_pair();
        let session = ManipulationSession::begin(&mut doc, SnapSettings::default()).unwrap();
        session.translate_by(&mut doc, Vec3::Y);

        let object = doc.object(a).unwrap();
        assert!(object.display_transform().position.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
        assert_eq!(object.transform().position, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_finish_records_one_command() {
        let (mut doc, mut history, a, b) = selected_pair();
        let depth = history.undo_depth();

        let session = ManipulationSession::begin(&mut doc, SnapSettings::default()).unwrap();
        for step in 1..=5 {
            session.translate_by(&mut doc, Vec3::new(0.0, 0.0, step as f32));
        }
        assert!(session.finish(&mut doc, &mut history));
        assert_eq!(history.undo_depth(), depth + 1);
        assert!(doc.object(b).unwrap().transform().position.abs_diff_eq(Vec3::new(1.0, 0.0, 5.0), 1e-5));

        history.undo(&mut doc);
        assert_eq!(doc.object(a).unwrap().transform().position, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(doc.object(a).unwrap().display_transform().position, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_release_without_motion_records_nothing() {
        let (mut doc, mut history, _, _) = selected_pair();
        let depth = history.undo_depth();
        let session = ManipulationSession::begin(&mut doc, SnapSettings::default()).unwrap();
        assert!(!session.finish(&mut doc, &mut history));
        assert_eq!(history.undo_depth(), depth);
    }

    #[test]
    fn test_cancel_restores_live_poses() {
        let (mut doc, history, a, _) = selected_pair();
        let session = ManipulationSession::begin(&mut doc, SnapSettings::default()).unwrap();
        session.rotate_by(&mut doc, Vec3::Z, FRAC_PI_2);
        assert_ne!(doc.object(a).unwrap().display_transform(), doc.object(a).unwrap().transform());

        session.cancel(&mut doc);
        let object = doc.object(a).unwrap();
        assert_eq!(object.display_transform(), object.transform());
        assert!(!history.needs_saving());
    }

    #[test]
    fn test_snapping() {
        let (mut doc, _history, a, _) = selected_pair();
        let snap = SnapSettings {
            enabled: true,
            translate: 0.5,
            ..Default::default()
        };
        let session = ManipulationSession::begin(&mut doc, snap).unwrap();
        session.translate_by(&mut doc, Vec3::new(0.7, 0.2, 0.0));
        assert!(doc
            .object(a)
            .unwrap()
            .display_transform()
            .position
            .abs_diff_eq(Vec3::new(-0.5, 0.0, 0.0), 1e-5));

        session.rotate_by(&mut doc, Vec3::Y, radians(20.0));
        let expected = Quat::from_rotation_y(radians(15.0));
        assert!(doc.current_transform().rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_group_rebuilt_mid_drag_keeps_survivor_rigid() {
        let (mut doc, mut history, a, b) = selected_pair();
        let session = ManipulationSession::begin(&mut doc, SnapSettings::default()).unwrap();
        session.scale_by(&mut doc, Vec3::splat(2.0));

        let command = SelectCommand::deselect(&doc, &[b]);
        history.execute(&mut doc, command);
        assert_eq!(doc.object(a).unwrap().display_transform(), doc.object(a).unwrap().transform());
        assert_eq!(doc.object(b).unwrap().display_transform(), doc.object(b).unwrap().transform());

        session.translate_by(&mut doc, Vec3::Z);
        assert!(session.finish(&mut doc, &mut history));
        let t = doc.object(a).unwrap().transform();
        assert!(t.position.abs_diff_eq(Vec3::new(-1.0, 0.0, 1.0), 1e-5));
        assert!(t.scale.abs_diff_eq(Vec3::ONE, 1e-5));
        assert_eq!(doc.object(b).unwrap().transform().position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_axis_rotation_ignored() {
        let (mut doc, _history, _, _) = selected_pair();
        let session = ManipulationSession::begin(&mut doc, SnapSettings::default()).unwrap();
        session.rotate_by(&mut doc, Vec3::ZERO, 1.0);
        assert!(!session.has_moved(&doc));
    }
}
