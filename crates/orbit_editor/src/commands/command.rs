//! Command trait, effect flags and the command tree.

use std::ops::{BitOr, BitOrAssign};

use crate::core::Document;

/// What a command did when applied: whether anything observable changed and
/// whether the change must be persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Effect {
    pub changes: bool,
    pub needs_saving: bool,
}

impl Effect {
    /// Nothing happened
    pub const NONE: Self = Self {
        changes: false,
        needs_saving: false,
    };

    /// Observable change that is not part of the saved document (selection)
    pub const TRANSIENT: Self = Self {
        changes: true,
        needs_saving: false,
    };

    /// Change to document content
    pub const EDIT: Self = Self {
        changes: true,
        needs_saving: true,
    };

    /// `EDIT` if `changed`, else `NONE`
    pub fn edit_if(changed: bool) -> Self {
        if changed {
            Self::EDIT
        } else {
            Self::NONE
        }
    }
}

impl BitOr for Effect {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            changes: self.changes || rhs.changes,
            needs_saving: self.needs_saving || rhs.needs_saving,
        }
    }
}

impl BitOrAssign for Effect {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// A reversible unit of document mutation.
///
/// Constructors capture arguments and snapshots of current state only; all
/// mutation happens in `on_do` / `on_undo`. Both must be functions of the
/// captured state so that Redo, which calls `on_do` again, reproduces the
/// original effect exactly.
///
/// # Example
///
/// ```ignore
/// struct RenameCommand {
///     id: ObjectId,
///     old_name: String,
///     new_name: String,
/// }
///
/// impl Command for RenameCommand {
///     fn description(&self) -> &str { "Rename" }
///
///     fn on_do(&mut self, doc: &mut Document) -> Effect {
///         Effect::edit_if(doc.rename(self.id, &self.new_name))
///     }
///
///     fn on_undo(&mut self, doc: &mut Document) -> Effect {
///         Effect::edit_if(doc.rename(self.id, &self.old_name))
///     }
/// }
/// ```
pub trait Command: Send + Sync {
    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str;

    /// Apply this command's own mutation.
    fn on_do(&mut self, _doc: &mut Document) -> Effect {
        Effect::NONE
    }

    /// Revert this command's own mutation.
    fn on_undo(&mut self, _doc: &mut Document) -> Effect {
        Effect::NONE
    }
}

/// A no-op command used as the root of composite edits.
pub struct CommandGroup {
    name: String,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Command for CommandGroup {
    fn description(&self) -> &str {
        &self.name
    }
}

/// A command plus its ordered children.
///
/// Execution runs the node's own `on_do` first, then each child in order;
/// undo runs children in reverse order, then the node's own `on_undo`. The
/// node's effect is the OR of its own and all descendants'.
pub struct CommandNode {
    command: Box<dyn Command>,
    children: Vec<CommandNode>,
    effect: Effect,
}

impl<C: Command + 'static> From<C> for CommandNode {
    fn from(command: C) -> Self {
        CommandNode::new(command)
    }
}

impl CommandNode {
    pub fn new(command: impl Command + 'static) -> Self {
        Self {
            command: Box::new(command),
            children: Vec::new(),
            effect: Effect::NONE,
        }
    }

    /// Empty composite
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(CommandGroup::new(name))
    }

    /// Builder form of `add_child`
    pub fn with_child(mut self, child: impl Into<CommandNode>) -> Self {
        self.add_child(child);
        self
    }

    /// Append a child. Its effect is folded in immediately, since the child
    /// may already have been executed on its own before being adopted.
    pub fn add_child(&mut self, child: impl Into<CommandNode>) {
        let child = child.into();
        self.effect |= child.effect;
        self.children.push(child);
    }

    /// Apply: own `on_do`, then children in list order.
    pub fn execute(&mut self, doc: &mut Document) -> Effect {
        let mut effect = self.command.on_do(doc);
        for child in &mut self.children {
            effect |= child.execute(doc);
        }
        self.effect = effect;
        effect
    }

    /// Revert: children in reverse list order, then own `on_undo`.
    pub fn undo(&mut self, doc: &mut Document) -> Effect {
        let mut effect = Effect::NONE;
        for child in self.children.iter_mut().rev() {
            effect |= child.undo(doc);
        }
        effect | self.command.on_undo(doc)
    }

    pub fn description(&self) -> &str {
        self.command.description()
    }

    /// Effect recorded by the last `execute` (or adoption of children)
    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn changes(&self) -> bool {
        self.effect.changes
    }

    pub fn needs_saving(&self) -> bool {
        self.effect.needs_saving
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }
}

impl std::fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNode")
            .field("description", &self.description())
            .field("effect", &self.effect)
            .field("children", &self.children)
            .finish()
    }
}
