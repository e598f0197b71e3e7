//! Notifications published on the document's event bus.
//!
//! Gizmo renderers and property panels subscribe to these; the core only
//! publishes. Delivery happens on `Document::process_events`.

use orbit_math::Transform;

use crate::core::ObjectId;

/// Objects entered the document (Add, or Undo of a Remove)
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectsAdded {
    pub ids: Vec<ObjectId>,
}

/// Objects left the document (Remove, or Undo of an Add)
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectsRemoved {
    pub ids: Vec<ObjectId>,
}

/// An object's committed transform changed
#[derive(Clone, Debug, PartialEq)]
pub struct TransformChanged {
    pub id: ObjectId,
    pub transform: Transform,
}

/// An object's live (displayed) transform moved during a manipulation
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewChanged {
    pub id: ObjectId,
    pub transform: Transform,
}

/// Selection membership changed; `selected` is the new selection in order
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionChanged {
    pub selected: Vec<ObjectId>,
}

/// The aggregate selection transform changed (recalculated or previewed)
#[derive(Clone, Debug, PartialEq)]
pub struct GroupTransformChanged {
    pub transform: Transform,
}

/// A kind-specific property of an object changed
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChanged {
    pub id: ObjectId,
    pub property: &'static str,
}

/// The undo/redo stacks changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryChanged {
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub needs_saving: bool,
}
