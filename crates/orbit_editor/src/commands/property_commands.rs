//! Property edit commands.
//!
//! `SetPropertyCommand<T>` sets one property on several objects. Vector
//! values are edited per component: with [`SetPropertyCommand::edited_from`]
//! only the components the user actually changed are written, so a
//! multi-object edit of one axis leaves the other axes of every target
//! alone even when targets start from different values.

use std::fmt;

use orbit_math::{Vec2, Vec3};

use super::{Command, Effect};
use crate::core::{Document, ObjectId, ObjectKind, SceneObject};

/// Per-component change flags; bit `i` is component `i`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeMask(pub u8);

impl ChangeMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u8::MAX);

    pub fn component(index: usize) -> Self {
        Self(1 << index)
    }

    pub fn contains(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn from_flags(flags: &[bool]) -> Self {
        flags
            .iter()
            .enumerate()
            .filter(|(_, changed)| **changed)
            .fold(Self::NONE, |mask, (i, _)| Self(mask.0 | 1 << i))
    }
}

/// A value a property can hold.
pub trait PropertyValue: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Components that differ between `self` and `other`.
    fn diff(&self, other: &Self) -> ChangeMask;

    /// `self` with the masked components taken from `new`.
    fn merge(self, new: Self, mask: ChangeMask) -> Self;
}

impl PropertyValue for f32 {
    fn diff(&self, other: &Self) -> ChangeMask {
        ChangeMask::from_flags(&[self != other])
    }

    fn merge(self, new: Self, mask: ChangeMask) -> Self {
        if mask.contains(0) {
            new
        } else {
            self
        }
    }
}

impl PropertyValue for Vec2 {
    fn diff(&self, other: &Self) -> ChangeMask {
        ChangeMask::from_flags(&[self.x != other.x, self.y != other.y])
    }

    fn merge(self, new: Self, mask: ChangeMask) -> Self {
        Vec2::new(
            if mask.contains(0) { new.x } else { self.x },
            if mask.contains(1) { new.y } else { self.y },
        )
    }
}

impl PropertyValue for Vec3 {
    fn diff(&self, other: &Self) -> ChangeMask {
        ChangeMask::from_flags(&[self.x != other.x, self.y != other.y, self.z != other.z])
    }

    fn merge(self, new: Self, mask: ChangeMask) -> Self {
        Vec3::new(
            if mask.contains(0) { new.x } else { self.x },
            if mask.contains(1) { new.y } else { self.y },
            if mask.contains(2) { new.z } else { self.z },
        )
    }
}

/// Typed accessor pair for one object property.
///
/// `get` returns `None` for objects whose kind lacks the property; such
/// objects are left out of an edit.
pub struct PropertyKey<T> {
    pub name: &'static str,
    pub get: fn(&SceneObject) -> Option<T>,
    pub set: fn(&mut SceneObject, T) -> bool,
}

impl<T> Clone for PropertyKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyKey<T> {}

impl<T> fmt::Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.name).finish()
    }
}

pub const COLOR: PropertyKey<Vec3> = PropertyKey {
    name: "color",
    get: get_color,
    set: set_color,
};

pub const CORNER_RADIUS: PropertyKey<f32> = PropertyKey {
    name: "corner_radius",
    get: get_corner_radius,
    set: set_corner_radius,
};

pub const SHAPE_SIZE: PropertyKey<Vec3> = PropertyKey {
    name: "size",
    get: get_shape_size,
    set: set_shape_size,
};

pub const TEXT_SIZE: PropertyKey<f32> = PropertyKey {
    name: "font_size",
    get: get_text_size,
    set: set_text_size,
};

pub const TEXT_EXTENT: PropertyKey<Vec2> = PropertyKey {
    name: "extent",
    get: get_text_extent,
    set: set_text_extent,
};

fn get_color(object: &SceneObject) -> Option<Vec3> {
    Some(object.color)
}

fn set_color(object: &mut SceneObject, value: Vec3) -> bool {
    object.color = value;
    true
}

fn get_corner_radius(object: &SceneObject) -> Option<f32> {
    match &object.kind {
        ObjectKind::Shape { corner_radius, .. } => Some(*corner_radius),
        _ => None,
    }
}

fn set_corner_radius(object: &mut SceneObject, value: f32) -> bool {
    match &mut object.kind {
        ObjectKind::Shape { corner_radius, .. } => {
            *corner_radius = value;
            true
        }
        _ => false,
    }
}

fn get_shape_size(object: &SceneObject) -> Option<Vec3> {
    match &object.kind {
        ObjectKind::Shape { size, .. } => Some(*size),
        _ => None,
    }
}

fn set_shape_size(object: &mut SceneObject, value: Vec3) -> bool {
    match &mut object.kind {
        ObjectKind::Shape { size, .. } => {
            *size = value;
            true
        }
        _ => false,
    }
}

fn get_text_size(object: &SceneObject) -> Option<f32> {
    match &object.kind {
        ObjectKind::Text { font_size, .. } => Some(*font_size),
        _ => None,
    }
}

fn set_text_size(object: &mut SceneObject, value: f32) -> bool {
    match &mut object.kind {
        ObjectKind::Text { font_size, .. } => {
            *font_size = value;
            true
        }
        _ => false,
    }
}

fn get_text_extent(object: &SceneObject) -> Option<Vec2> {
    match &object.kind {
        ObjectKind::Text { extent, .. } => Some(*extent),
        _ => None,
    }
}

fn set_text_extent(object: &mut SceneObject, value: Vec2) -> bool {
    match &mut object.kind {
        ObjectKind::Text { extent, .. } => {
            *extent = value;
            true
        }
        _ => false,
    }
}

struct Binding<T> {
    id: ObjectId,
    old: T,
    new: T,
}

/// Set a property on several objects.
pub struct SetPropertyCommand<T: PropertyValue> {
    key: PropertyKey<T>,
    value: T,
    bindings: Vec<Binding<T>>,
    description: String,
}

impl<T: PropertyValue> SetPropertyCommand<T> {
    /// Overwrite the whole value on every target that has the property.
    pub fn new(doc: &Document, key: PropertyKey<T>, ids: &[ObjectId], value: T) -> Self {
        let bindings = ids
            .iter()
            .filter_map(|&id| {
                let old = doc.object(id).and_then(key.get)?;
                Some(Binding { id, old, new: value })
            })
            .collect();

        Self {
            key,
            value,
            bindings,
            description: format!("Set {}", key.name),
        }
    }

    /// Write only the components where `value` differs from `reference`,
    /// the value the editing widget started from.
    pub fn edited_from(mut self, reference: T) -> Self {
        let mask = reference.diff(&self.value);
        for binding in &mut self.bindings {
            binding.new = binding.old.merge(self.value, mask);
        }
        self
    }

    /// Whether doing this command would change any target
    pub fn changes(&self) -> bool {
        self.bindings.iter().any(|b| b.old != b.new)
    }

    /// Value `id` will receive, if it is a target
    pub fn target(&self, id: ObjectId) -> Option<T> {
        self.bindings.iter().find(|b| b.id == id).map(|b| b.new)
    }

    fn write(&self, doc: &mut Document, pick: impl Fn(&Binding<T>) -> T) -> bool {
        let set = self.key.set;
        let mut changed = false;
        for binding in self.bindings.iter().filter(|b| b.old != b.new) {
            let value = pick(binding);
            changed |= doc.update_object(binding.id, self.key.name, |object| set(object, value));
        }
        changed
    }
}

impl<T: PropertyValue> Command for SetPropertyCommand<T> {
    fn description(&self) -> &str {
        &self.description
    }

    fn on_do(&mut self, doc: &mut Document) -> Effect {
        Effect::edit_if(self.write(doc, |b| b.new))
    }

    fn on_undo(&mut self, doc: &mut Document) -> Effect {
        Effect::edit_if(self.write(doc, |b| b.old))
    }
}
