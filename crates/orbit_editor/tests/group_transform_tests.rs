//! Group transform behaviour for orbit_editor
//!
//! Rotation tie-break, box fitting, and mapping aggregate edits back onto
//! the selected objects.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use orbit_editor::events::{GroupTransformChanged, PreviewChanged, SelectionChanged};
use orbit_editor::*;
use orbit_math::{Quat, Transform, Vec3};
use parking_lot::Mutex;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn add_cube(editor: &mut Editor, transform: Transform) -> ObjectId {
    let object = SceneObject::shape("Cube", ShapeType::Cube).with_transform(transform);
    editor.document.insert_object(object).unwrap()
}

fn select(editor: &mut Editor, ids: &[ObjectId]) {
    let command = SelectCommand::set_to(&editor.document, ids);
    editor.execute(command);
}

#[test]
fn shared_rotation_is_kept() {
    init_logging();
    let mut editor = Editor::new();
    let r = Quat::from_rotation_y(0.7);
    let a = add_cube(&mut editor, Transform::from_position_rotation(Vec3::ZERO, r));
    let b = add_cube(&mut editor, Transform::from_position_rotation(Vec3::X * 4.0, r));

    select(&mut editor, &[a, b]);
    assert_eq!(editor.document.current_transform().rotation, r);
}

#[test]
fn mixed_rotation_falls_back_to_world() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::from_position_rotation(Vec3::ZERO, Quat::from_rotation_y(0.7)));
    let b = add_cube(&mut editor, Transform::from_position_rotation(Vec3::X * 4.0, Quat::from_rotation_x(0.2)));

    select(&mut editor, &[a, b]);
    assert_eq!(editor.document.current_transform().rotation, Quat::IDENTITY);
}

#[test]
fn single_object_uses_own_rotation_and_extents() {
    init_logging();
    let mut editor = Editor::new();
    let r = Quat::from_rotation_z(1.1);
    let transform = Transform::new(Vec3::new(3.0, -2.0, 1.0), r, Vec3::new(0.5, 2.0, 3.0));
    let a = add_cube(&mut editor, transform);

    select(&mut editor, &[a]);
    let group = editor.document.current_transform();
    assert_eq!(group.rotation, r);
    assert!(group.position.abs_diff_eq(transform.position, 1e-5));
    assert!(group.scale.abs_diff_eq(transform.scale, 1e-5));
}

#[test]
fn near_equal_rotations_count_as_different() {
    init_logging();
    let mut editor = Editor::new();
    let r = Quat::from_rotation_y(0.7);
    let drifted = Quat::from_rotation_y(0.7 + 1e-6);
    assert_ne!(r, drifted);

    let a = add_cube(&mut editor, Transform::from_position_rotation(Vec3::ZERO, r));
    let b = add_cube(&mut editor, Transform::from_position_rotation(Vec3::X, drifted));
    select(&mut editor, &[a, b]);
    assert_eq!(editor.document.current_transform().rotation, Quat::IDENTITY);
}

#[test]
fn scaling_group_preserves_relative_offsets() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::from_position(Vec3::new(-1.0, 0.0, 0.0)));
    let b = add_cube(&mut editor, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
    select(&mut editor, &[a, b]);

    let group = editor.document.current_transform();
    assert!(group.scale.abs_diff_eq(Vec3::new(3.0, 1.0, 1.0), 1e-6));

    let doubled = group.with_scale(group.scale * Vec3::new(2.0, 1.0, 1.0));
    editor.document.set_current_transform(doubled);
    editor.document.apply_to_members();

    let pos = |id| editor.document.object(id).unwrap().display_transform().position;
    assert!(pos(a).abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));
    assert!(pos(b).abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
}

#[test]
fn rotating_group_orbits_members() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::from_position(Vec3::new(-1.0, 0.0, 0.0)));
    let b = add_cube(&mut editor, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
    select(&mut editor, &[a, b]);

    let group = editor.document.current_transform();
    editor
        .document
        .set_current_transform(group.with_rotation(Quat::from_rotation_z(FRAC_PI_2)));
    editor.document.apply_to_members();

    let b_now = editor.document.object(b).unwrap().display_transform();
    assert!(b_now.position.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));
    assert!(b_now.rotation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2), 1e-5)
        || b_now.rotation.abs_diff_eq(-Quat::from_rotation_z(FRAC_PI_2), 1e-5));
    let a_now = editor.document.object(a).unwrap().display_transform();
    assert!(a_now.position.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-5));
}

#[test]
fn apply_is_idempotent() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::from_position(Vec3::new(-1.0, 2.0, 0.0)));
    let b = add_cube(&mut editor, Transform::new(Vec3::X, Quat::from_rotation_y(0.3), Vec3::splat(1.5)));
    select(&mut editor, &[a, b]);

    let target = editor
        .document
        .current_transform()
        .with_position(Vec3::new(5.0, 0.0, 5.0))
        .with_rotation(Quat::from_rotation_y(0.4));
    editor.document.set_current_transform(target);
    editor.document.apply_to_members();
    let first: Vec<_> = [a, b]
        .iter()
        .map(|&id| editor.document.object(id).unwrap().display_transform())
        .collect();

    editor.document.set_current_transform(target);
    editor.document.apply_to_members();
    let second: Vec<_> = [a, b]
        .iter()
        .map(|&id| editor.document.object(id).unwrap().display_transform())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn flat_selection_stays_finite() {
    init_logging();
    let mut editor = Editor::new();
    let plane = SceneObject::shape("Floor", ShapeType::Plane);
    let id = editor.document.insert_object(plane).unwrap();
    select(&mut editor, &[id]);

    let group = editor.document.current_transform();
    assert_eq!(group.scale.y, 0.0);

    editor
        .document
        .set_current_transform(group.with_scale(Vec3::new(2.0, 0.0, 2.0)));
    editor.document.apply_to_members();
    let transform = editor.document.object(id).unwrap().display_transform();
    assert!(transform.is_finite());
    assert!(transform.scale.abs_diff_eq(Vec3::new(2.0, 1.0, 2.0), 1e-5));
}

#[test]
fn build_transform_command_commits_preview() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::from_position(Vec3::new(-1.0, 0.0, 0.0)));
    let b = add_cube(&mut editor, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
    select(&mut editor, &[a, b]);

    let moved = editor.document.current_transform().with_position(Vec3::Z);
    editor.document.set_current_transform(moved);
    editor.document.apply_to_members();

    let command = editor.document.build_transform_command();
    assert_eq!(command.len(), 2);
    assert!(editor.execute(command));

    let a_t = editor.document.object(a).unwrap().transform();
    assert!(a_t.position.abs_diff_eq(Vec3::new(-1.0, 0.0, 1.0), 1e-5));
    assert!(editor.document.current_transform().position.abs_diff_eq(Vec3::Z, 1e-5));

    editor.undo();
    assert_eq!(editor.document.object(a).unwrap().transform().position, Vec3::new(-1.0, 0.0, 0.0));
    assert!(editor.document.current_transform().position.abs_diff_eq(Vec3::ZERO, 1e-6));
}

#[test]
fn recalculate_discards_abandoned_preview() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::from_position(Vec3::X));
    select(&mut editor, &[a]);

    let moved = editor.document.current_transform().with_position(Vec3::Y * 3.0);
    editor.document.set_current_transform(moved);
    editor.document.apply_to_members();

    editor.document.recalculate_group_transform();
    let object = editor.document.object(a).unwrap();
    assert_eq!(object.display_transform(), object.transform());
    assert!(editor.document.current_transform().position.abs_diff_eq(Vec3::X, 1e-6));
}

#[test]
fn observers_see_selection_and_preview() {
    init_logging();
    let mut editor = Editor::new();
    let a = add_cube(&mut editor, Transform::IDENTITY);

    let selections = Arc::new(Mutex::new(Vec::new()));
    let previews = Arc::new(Mutex::new(0usize));
    let groups = Arc::new(Mutex::new(0usize));

    let sink = selections.clone();
    let selection_sub = editor
        .document
        .subscribe(move |e: &SelectionChanged| sink.lock().push(e.selected.clone()));
    let sink = previews.clone();
    editor
        .document
        .subscribe(move |_: &PreviewChanged| *sink.lock() += 1);
    let sink = groups.clone();
    editor
        .document
        .subscribe(move |_: &GroupTransformChanged| *sink.lock() += 1);

    select(&mut editor, &[a]);
    let moved = editor.document.current_transform().with_position(Vec3::ONE);
    editor.document.set_current_transform(moved);
    editor.document.apply_to_members();
    editor.document.process_events();

    assert_eq!(*selections.lock(), vec![vec![a]]);
    assert_eq!(*previews.lock(), 1);
    assert!(*groups.lock() >= 2);

    assert!(editor.document.unsubscribe(selection_sub));
    editor.undo();
    editor.document.process_events();
    assert_eq!(selections.lock().len(), 1);
}
