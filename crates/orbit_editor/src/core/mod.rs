//! Core editor types and state management.
//!
//! The `Document` owns scene objects, the selection and the group transform;
//! `UndoHistory` owns the command stacks. Both are created per open document
//! and passed explicitly to commands and tools.

pub mod document;
mod editor;
mod history;
mod object;
mod preferences;
mod selection;

pub use document::Document;
pub use editor::Editor;
pub use history::UndoHistory;
pub use object::{LiveObject, ObjectKind, SceneObject, ShapeType};
pub use preferences::{EditorPreferences, SnapSettings};
pub use selection::{SelectionMode, SelectionSet};

use uuid::Uuid;

/// Stable identifier of a scene object. Survives Remove/Undo round trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}
