//! Undo/Redo history with save tracking and transaction support.
//!
//! All undoable document edits go through the history. Commands can be
//! grouped into transactions that undo as a single unit.

use super::{Document, EditorPreferences};
use crate::commands::CommandNode;
use crate::events::HistoryChanged;

/// Undo/redo stacks for one document.
pub struct UndoHistory {
    /// Commands that can be undone
    undo_stack: Vec<CommandNode>,
    /// Commands that can be redone; top is the most recently undone
    redo_stack: Vec<CommandNode>,
    /// Maximum undo depth, `None` for unlimited
    max_size: Option<usize>,
    /// Undo depth at the last save. `None` once the saved state is no
    /// longer reachable through undo/redo.
    saved_depth: Option<usize>,
    /// Root of the currently open transaction
    current_transaction: Option<CommandNode>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Default maximum history size.
    pub const DEFAULT_MAX_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Some(Self::DEFAULT_MAX_SIZE))
    }

    pub fn with_capacity(max_size: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
            saved_depth: Some(0),
            current_transaction: None,
        }
    }

    pub fn from_preferences(preferences: &EditorPreferences) -> Self {
        Self::with_capacity(preferences.history_limit())
    }

    /// Run a command and record it.
    ///
    /// A command that reports no change is discarded. Inside a transaction
    /// the command is adopted by the transaction root instead of being
    /// pushed. Returns true if the command was kept.
    pub fn execute(&mut self, doc: &mut Document, command: impl Into<CommandNode>) -> bool {
        let mut command = command.into();
        let effect = command.execute(doc);

        if !effect.changes {
            log::debug!("Discarding no-op command '{}'", command.description());
            return false;
        }

        log::debug!("Executed '{}'", command.description());
        if let Some(transaction) = self.current_transaction.as_mut() {
            transaction.add_child(command);
        } else {
            self.push(command);
            self.notify(doc);
        }
        true
    }

    /// Record a command that has already been applied.
    ///
    /// The command is not run again. Used for composites whose parts were
    /// executed while they were being assembled.
    pub fn add(&mut self, doc: &Document, command: impl Into<CommandNode>) {
        let command = command.into();
        log::debug!("Recorded '{}'", command.description());
        self.push(command);
        self.notify(doc);
    }

    fn push(&mut self, command: CommandNode) {
        self.discard_redo();
        self.undo_stack.push(command);

        // Trim if over limit
        if let Some(max_size) = self.max_size {
            while self.undo_stack.len() > max_size {
                self.undo_stack.remove(0);
                self.saved_depth = match self.saved_depth {
                    Some(0) | None => None,
                    Some(depth) => Some(depth - 1),
                };
                log::debug!("History limit {} reached; dropped oldest command", max_size);
            }
        }
    }

    /// Drop the redo branch. If the save point lies on it, keep it only when
    /// nothing discarded between here and there needed saving.
    fn discard_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        let depth = self.undo_stack.len();
        if let Some(saved) = self.saved_depth {
            if saved > depth {
                let lost = saved - depth;
                let start = self.redo_stack.len().saturating_sub(lost);
                let dirty = self.redo_stack[start..].iter().any(CommandNode::needs_saving);
                self.saved_depth = if dirty { None } else { Some(depth) };
                if dirty {
                    log::info!("Save point discarded with redo history");
                }
            }
        }
        self.redo_stack.clear();
    }

    /// Revert the most recent command. No-op on an empty stack.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        if self.in_transaction() {
            log::warn!("Undo requested while a transaction is open; ignoring");
            return false;
        }
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };

        log::debug!("Undo '{}'", command.description());
        command.undo(doc);
        self.redo_stack.push(command);
        self.notify(doc);
        true
    }

    /// Re-apply the most recently undone command. No-op on an empty stack.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        if self.in_transaction() {
            log::warn!("Redo requested while a transaction is open; ignoring");
            return false;
        }
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };

        log::debug!("Redo '{}'", command.description());
        command.execute(doc);
        self.undo_stack.push(command);
        self.notify(doc);
        true
    }

    /// Whether the document differs from its last saved state.
    ///
    /// Only the commands between the current depth and the save point are
    /// inspected, so moving across selection-only commands keeps the
    /// document clean.
    pub fn needs_saving(&self) -> bool {
        let Some(saved) = self.saved_depth else {
            return true;
        };

        let depth = self.undo_stack.len();
        if depth >= saved {
            self.undo_stack[saved..].iter().any(CommandNode::needs_saving)
        } else {
            let undone = saved - depth;
            let start = self.redo_stack.len().saturating_sub(undone);
            self.redo_stack[start..].iter().any(CommandNode::needs_saving)
        }
    }

    /// Record the current depth as the save point.
    pub fn mark_saved(&mut self) {
        self.saved_depth = Some(self.undo_stack.len());
        log::info!("Marked saved at history depth {}", self.undo_stack.len());
    }

    /// Check if there are commands to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the description of the next undo command.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get the description of the next redo command.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Begin a new transaction.
    /// Commands executed during a transaction are grouped as one undo unit.
    pub fn begin_transaction(&mut self, name: impl Into<String>) {
        if self.current_transaction.is_some() {
            log::warn!("Beginning transaction while one is already open");
        }
        self.current_transaction = Some(CommandNode::group(name));
    }

    /// Commit the current transaction. Returns true if anything was recorded.
    pub fn commit_transaction(&mut self, doc: &Document) -> bool {
        match self.current_transaction.take() {
            Some(transaction) if transaction.changes() => {
                self.add(doc, transaction);
                true
            }
            _ => false,
        }
    }

    /// Revert everything executed since `begin_transaction` and drop it.
    pub fn rollback_transaction(&mut self, doc: &mut Document) {
        if let Some(mut transaction) = self.current_transaction.take() {
            log::debug!("Rolling back transaction '{}'", transaction.description());
            transaction.undo(doc);
        }
    }

    /// Check if a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.current_transaction.is_some()
    }

    /// Clear all history. The current state becomes the save point.
    pub fn clear(&mut self, doc: &Document) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_transaction = None;
        self.saved_depth = Some(0);
        self.notify(doc);
    }

    fn notify(&self, doc: &Document) {
        doc.publish(HistoryChanged {
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
            needs_saving: self.needs_saving(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Command, Effect};

    struct TestCommand {
        name: &'static str,
        effect: Effect,
    }

    impl TestCommand {
        fn edit(name: &'static str) -> Self {
            Self {
                name,
                effect: Effect::EDIT,
            }
        }

        fn transient(name: &'static str) -> Self {
            Self {
                name,
                effect: Effect::TRANSIENT,
            }
        }
    }

    impl Command for TestCommand {
        fn description(&self) -> &str {
            self.name
        }

        fn on_do(&mut self, _doc: &mut Document) -> Effect {
            self.effect
        }

        fn on_undo(&mut self, _doc: &mut Document) -> Effect {
            self.effect
        }
    }

    #[test]
    fn test_history_basic() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();

        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));

        assert!(history.execute(&mut doc, TestCommand::edit("Move")));

        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), Some("Move"));
    }

    #[test]
    fn test_history_undo_redo() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();

        history.execute(&mut doc, TestCommand::edit("First"));
        history.execute(&mut doc, TestCommand::edit("Second"));
        assert_eq!(history.undo_depth(), 2);

        assert!(history.undo(&mut doc));
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 1);
        assert_eq!(history.redo_description(), Some("Second"));

        assert!(history.redo(&mut doc));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_noop_is_discarded() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        let noop = TestCommand {
            name: "Nothing",
            effect: Effect::NONE,
        };
        assert!(!history.execute(&mut doc, noop));
        assert_eq!(history.undo_depth(), 0);
    }

    #[test]
    fn test_add_does_not_execute() {
        struct Panics;
        impl Command for Panics {
            fn description(&self) -> &str {
                "Already applied"
            }
            fn on_do(&mut self, _doc: &mut Document) -> Effect {
                panic!("add must not run the command");
            }
        }

        let doc = Document::new();
        let mut history = UndoHistory::new();
        history.add(&doc, Panics);
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_execute_clears_redo() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.execute(&mut doc, TestCommand::edit("First"));
        history.undo(&mut doc);
        history.execute(&mut doc, TestCommand::edit("Second"));
        assert!(!history.can_redo());
        assert!(!history.redo(&mut doc));
        assert_eq!(history.undo_description(), Some("Second"));
    }

    #[test]
    fn test_needs_saving_ignores_transient_commands() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        assert!(!history.needs_saving());

        history.execute(&mut doc, TestCommand::transient("Select"));
        assert!(!history.needs_saving());

        history.execute(&mut doc, TestCommand::edit("Move"));
        assert!(history.needs_saving());

        history.mark_saved();
        assert!(!history.needs_saving());

        history.undo(&mut doc);
        assert!(history.needs_saving());
        history.redo(&mut doc);
        assert!(!history.needs_saving());
    }

    #[test]
    fn test_needs_saving_across_undo_of_selection() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.execute(&mut doc, TestCommand::edit("Move"));
        history.execute(&mut doc, TestCommand::transient("Select"));
        history.mark_saved();

        history.undo(&mut doc);
        assert!(!history.needs_saving());
        history.undo(&mut doc);
        assert!(history.needs_saving());
    }

    #[test]
    fn test_branching_below_save_point() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.execute(&mut doc, TestCommand::edit("Move"));
        history.mark_saved();
        history.undo(&mut doc);

        // The saved state is gone for good.
        history.execute(&mut doc, TestCommand::transient("Select"));
        assert!(history.needs_saving());
        history.undo(&mut doc);
        assert!(history.needs_saving());
    }

    #[test]
    fn test_branching_over_transient_keeps_save_point() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.execute(&mut doc, TestCommand::transient("Select"));
        history.mark_saved();
        history.undo(&mut doc);

        history.execute(&mut doc, TestCommand::transient("Select other"));
        assert!(!history.needs_saving());
        history.undo(&mut doc);
        assert!(!history.needs_saving());
    }

    #[test]
    fn test_history_limit() {
        let mut doc = Document::new();
        let mut history = UndoHistory::with_capacity(Some(2));
        history.mark_saved();
        history.execute(&mut doc, TestCommand::edit("One"));
        history.execute(&mut doc, TestCommand::edit("Two"));
        history.execute(&mut doc, TestCommand::edit("Three"));

        assert_eq!(history.undo_depth(), 2);
        while history.undo(&mut doc) {}
        assert_eq!(history.redo_description(), Some("Two"));
        assert!(history.needs_saving());
    }

    #[test]
    fn test_transaction_groups_commands() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();

        history.begin_transaction("Align");
        history.execute(&mut doc, TestCommand::edit("Move A"));
        history.execute(&mut doc, TestCommand::edit("Move B"));
        assert!(history.in_transaction());
        assert!(!history.undo(&mut doc));
        assert!(history.commit_transaction(&doc));

        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.undo_description(), Some("Align"));
        assert!(history.needs_saving());
    }

    #[test]
    fn test_empty_transaction_is_dropped() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.begin_transaction("Nothing");
        assert!(!history.commit_transaction(&doc));
        assert_eq!(history.undo_depth(), 0);

        history.begin_transaction("Abandoned");
        history.execute(&mut doc, TestCommand::edit("Move"));
        history.rollback_transaction(&mut doc);
        assert!(!history.in_transaction());
        assert_eq!(history.undo_depth(), 0);
    }

    #[test]
    fn test_clear() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.execute(&mut doc, TestCommand::edit("Move"));
        history.undo(&mut doc);
        history.clear(&doc);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.needs_saving());
    }

    #[test]
    fn test_notifies_observers() {
        let mut doc = Document::new();
        let mut history = UndoHistory::new();
        history.execute(&mut doc, TestCommand::edit("Move"));

        let events = doc.events().peek::<HistoryChanged>();
        assert_eq!(
            events.last(),
            Some(&HistoryChanged {
                undo_depth: 1,
                redo_depth: 0,
                needs_saving: true,
            })
        );
    }
}
