use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::engine::Engine;
use crate::error::Result;
use crate::selection::SelectionSet;
use crate::traits::Editor;

/// Identifier of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    InsertBefore,
    InsertAfter,
    InsertLineStart,
    InsertLineEnd,
    InsertNewLineAbove,
    InsertNewLineBelow,
    NewLineAbove,
    NewLineBelow,
    RepeatInsert,
    SetNormalMode,
    /// Text typed through the host's own input path.
    Type,
    /// A host-defined command.
    Custom(&'static str),
}

impl CommandId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsertBefore => "insertBefore",
            Self::InsertAfter => "insertAfter",
            Self::InsertLineStart => "insertLineStart",
            Self::InsertLineEnd => "insertLineEnd",
            Self::InsertNewLineAbove => "insertNewLineAbove",
            Self::InsertNewLineBelow => "insertNewLineBelow",
            Self::NewLineAbove => "newLineAbove",
            Self::NewLineBelow => "newLineBelow",
            Self::RepeatInsert => "repeatInsert",
            Self::SetNormalMode => "setNormalMode",
            Self::Type => "type",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Capabilities a command declares when it is registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u8 {
        /// Mutates document text.
        const EDIT              = 0b0001;
        /// Mutates the selection set.
        const CHANGE_SELECTIONS = 0b0010;
        /// Leaves the editor in insert mode.
        const SWITCH_TO_INSERT  = 0b0100;
        /// Leaves the editor in normal mode.
        const SWITCH_TO_NORMAL  = 0b1000;
    }
}

/// A command's identity together with its flags, as stored in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub flags: CommandFlags,
}

impl CommandDescriptor {
    pub const fn new(id: CommandId, flags: CommandFlags) -> Self {
        Self { id, flags }
    }

    pub fn switches_to_insert(&self) -> bool {
        self.flags.contains(CommandFlags::SWITCH_TO_INSERT)
    }

    pub fn switches_to_normal(&self) -> bool {
        self.flags.contains(CommandFlags::SWITCH_TO_NORMAL)
    }
}

/// Per-execution state handed to a handler.
#[derive(Debug)]
pub struct CommandState {
    pub selection_set: SelectionSet,
    /// Numeric prefix typed before the command, if any.
    pub current_count: Option<u32>,
}

impl CommandState {
    /// The repeat count, where a missing or zero prefix means one.
    pub fn count_or_one(&self) -> u32 {
        self.current_count.filter(|&n| n > 0).unwrap_or(1)
    }
}

pub type Handler = Rc<dyn Fn(&mut Engine, &mut dyn Editor, &mut CommandState) -> Result<()>>;

#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) flags: CommandFlags,
    pub(crate) handler: Handler,
}

/// Command table keyed by identifier.
#[derive(Clone, Default)]
pub struct Registry {
    commands: HashMap<CommandId, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `id`, replacing any previous registration.
    pub fn register<F>(&mut self, id: CommandId, flags: CommandFlags, handler: F)
    where
        F: Fn(&mut Engine, &mut dyn Editor, &mut CommandState) -> Result<()> + 'static,
    {
        self.commands.insert(
            id,
            Registration {
                flags,
                handler: Rc::new(handler),
            },
        );
    }

    pub fn descriptor(&self, id: CommandId) -> Option<CommandDescriptor> {
        self.commands
            .get(&id)
            .map(|r| CommandDescriptor::new(id, r.flags))
    }

    pub(crate) fn handler(&self, id: CommandId) -> Option<Handler> {
        self.commands.get(&id).map(|r| Rc::clone(&r.handler))
    }

    pub fn contains(&self, id: CommandId) -> bool {
        self.commands.contains_key(&id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.commands.keys()).finish()
    }
}
