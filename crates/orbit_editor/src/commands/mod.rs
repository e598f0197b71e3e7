//! Command pattern implementation for undo/redo support.
//!
//! All document modifications that should be undoable go through the
//! command system and are recorded by `UndoHistory`.

mod command;
mod entity_commands;
mod property_commands;
mod selection_commands;
mod transform_commands;

pub use command::{Command, CommandGroup, CommandNode, Effect};
pub use entity_commands::{AddCommand, BaseRemoveCommand, RemoveCommand};
pub use property_commands::{
    ChangeMask, PropertyKey, PropertyValue, SetPropertyCommand, COLOR, CORNER_RADIUS, SHAPE_SIZE,
    TEXT_EXTENT, TEXT_SIZE,
};
pub use selection_commands::SelectCommand;
pub use transform_commands::TransformCommand;
