//! Per-document editor bundle.

use super::{Document, EditorPreferences, UndoHistory};
use crate::commands::CommandNode;
use crate::tools::ManipulationSession;

/// One open document together with its history and preferences.
///
/// Construct one per document and hand it to tools; there is no global
/// editor instance.
pub struct Editor {
    pub document: Document,
    pub history: UndoHistory,
    pub preferences: EditorPreferences,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_preferences(EditorPreferences::default())
    }

    pub fn with_preferences(preferences: EditorPreferences) -> Self {
        Self {
            document: Document::with_preferences(&preferences),
            history: UndoHistory::from_preferences(&preferences),
            preferences,
        }
    }

    /// Execute a command and add it to history.
    pub fn execute(&mut self, command: impl Into<CommandNode>) -> bool {
        self.history.execute(&mut self.document, command)
    }

    /// Record an already-applied command.
    pub fn add(&mut self, command: impl Into<CommandNode>) {
        self.history.add(&self.document, command);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }

    pub fn needs_saving(&self) -> bool {
        self.history.needs_saving()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Start dragging the selection with the configured snap settings.
    pub fn begin_manipulation(&mut self) -> Option<ManipulationSession> {
        ManipulationSession::begin(&mut self.document, self.preferences.snap)
    }

    /// Commit a drag. Returns true if a command was recorded.
    pub fn finish_manipulation(&mut self, session: ManipulationSession) -> bool {
        session.finish(&mut self.document, &mut self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{AddCommand, SelectCommand};
    use crate::core::{SceneObject, ShapeType};

    #[test]
    fn test_history_limit_from_preferences() {
        let mut editor = Editor::with_preferences(EditorPreferences {
            history_limit: 2,
            ..Default::default()
        });
        for i in 0..4 {
            editor.execute(AddCommand::new(SceneObject::shape(format!("Cube {}", i), ShapeType::Cube)));
        }
        assert_eq!(editor.history.undo_depth(), 2);
        assert_eq!(editor.document.len(), 4);
    }

    #[test]
    fn test_editor_round_trip() {
        let mut editor = Editor::new();
        let object = SceneObject::shape("Cube", ShapeType::Cube);
        let id = object.id;
        editor.execute(AddCommand::new(object));
        editor.execute(SelectCommand::select(&editor.document, &[id]));
        editor.mark_saved();
        assert!(!editor.needs_saving());

        assert!(editor.undo());
        assert!(!editor.needs_saving());
        assert!(editor.undo());
        assert!(editor.needs_saving());
        assert!(!editor.document.contains(id));

        assert!(editor.redo());
        assert!(editor.redo());
        assert!(editor.document.object(id).unwrap().is_selected());
    }
}
