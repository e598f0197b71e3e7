//! Orbit editor core
//!
//! Command, undo/redo and selection-transform engine for the Orbit spatial
//! editor. Rendering, input and persistence live elsewhere; this crate owns
//! the document model and every undoable change to it.
//!
//! ## Features
//!
//! - **Command trees**: composable `Command`s with strict do/undo ordering
//! - **Undo/Redo**: history with save tracking and transactions
//! - **Multi-Select**: Replace / Add / Remove / Toggle selection commands
//! - **Group transform**: one oriented box for the whole selection, with
//!   live preview during a drag and an atomic commit on release
//! - **Property edits**: per-component updates across many objects
//!
//! ## Architecture
//!
//! ```text
//! Pointer input → ManipulationSession → Document (preview)
//!                         ↓ release
//!               TransformCommand → UndoHistory → Document (commit) → events
//! ```
//!
//! All document modifications go through the command system for undo/redo
//! support. Observers subscribe on the document's event bus.

pub mod commands;
pub mod core;
pub mod error;
pub mod events;
pub mod group;
pub mod tools;

// Re-export commonly used types
pub use crate::core::{
    Document, Editor, EditorPreferences, LiveObject, ObjectId, ObjectKind, SceneObject,
    SelectionMode, SelectionSet, ShapeType, SnapSettings, UndoHistory,
};

pub use commands::{
    AddCommand, Command, CommandNode, Effect, RemoveCommand, SelectCommand, SetPropertyCommand,
    TransformCommand,
};

pub use error::{DocumentError, PreferencesError};
pub use group::GroupTransform;
pub use tools::ManipulationSession;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "Orbit Editor";
