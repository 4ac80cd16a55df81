use tracing::{debug, warn};

use crate::command::{CommandDescriptor, CommandFlags, CommandId, CommandState, Registry};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::history::{History, HistoryStore, StateToken};
use crate::insert;
use crate::selection::SelectionSet;
use crate::traits::{DocumentId, Editor};
use crate::types::Mode;

#[derive(Debug, Default, Clone)]
struct Counts {
    current: Option<u32>,
}

impl Counts {
    fn push_digit(&mut self, d: u32) {
        let next = self
            .current
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(d);
        self.current = Some(next);
    }

    fn take(&mut self) -> Option<u32> {
        self.current.take()
    }
}

/// The command dispatcher.
///
/// Runs handlers against a host editor, appends one history entry per
/// executed command and tracks the modal state.
#[derive(Debug)]
pub struct Engine {
    mode: Mode,
    counts: Counts,
    registry: Registry,
    history: HistoryStore,
    settings: Settings,
    next_token: u64,
}

#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub pending_count: Option<u32>,
}

pub struct EngineBuilder {
    mode: Mode,
    settings: Settings,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            settings: Settings::default(),
        }
    }
}

impl EngineBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Engine {
        let mut registry = Registry::new();
        insert::register_all(&mut registry);
        registry.register(
            CommandId::SetNormalMode,
            CommandFlags::SWITCH_TO_NORMAL,
            |_, _, _| Ok(()),
        );
        Engine {
            mode: self.mode,
            counts: Counts::default(),
            registry,
            history: HistoryStore::new(self.settings.history.max_entries),
            settings: self.settings,
            next_token: 0,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            pending_count: self.counts.current,
        }
    }

    /// Accumulate one digit of the numeric prefix for the next command.
    pub fn push_count_digit(&mut self, d: u32) {
        self.counts.push_digit(d);
    }

    pub fn register<F>(&mut self, id: CommandId, flags: CommandFlags, handler: F)
    where
        F: Fn(&mut Engine, &mut dyn Editor, &mut CommandState) -> Result<()> + 'static,
    {
        self.registry.register(id, flags, handler);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn history(&self, doc: DocumentId) -> Option<&History> {
        self.history.get(doc)
    }

    /// Forget everything recorded for a closed document.
    pub fn close_document(&mut self, doc: DocumentId) {
        self.history.close(doc);
    }

    /// Look up `id` and run it.
    pub fn execute(&mut self, editor: &mut dyn Editor, id: CommandId) -> Result<()> {
        let descriptor = self
            .registry
            .descriptor(id)
            .ok_or(Error::UnknownCommand(id))?;
        self.execute_descriptor(editor, &descriptor)
    }

    /// Run a command, record it in the document's history and apply the mode
    /// transition its flags declare.
    ///
    /// A failing handler leaves no history entry and no mode change.
    pub fn execute_descriptor(
        &mut self,
        editor: &mut dyn Editor,
        descriptor: &CommandDescriptor,
    ) -> Result<()> {
        let handler = self
            .registry
            .handler(descriptor.id)
            .ok_or(Error::UnknownCommand(descriptor.id))?;
        let token = self.next_token();
        let enforce =
            self.mode == Mode::Normal && self.settings.selections.enforce_non_empty_in_normal;
        let mut state = CommandState {
            selection_set: SelectionSet::from_editor(editor, enforce),
            current_count: self.counts.take(),
        };

        debug!(
            target: "engine.dispatch",
            command = %descriptor.id,
            token = token.0,
            mode = ?self.mode,
            "execute"
        );
        if let Err(err) = (*handler)(self, &mut *editor, &mut state) {
            // whatever the host reported belongs to nothing now
            let _ = editor.take_changes();
            warn!(
                target: "engine.dispatch",
                command = %descriptor.id,
                error = %err,
                "command_failed"
            );
            return Err(err);
        }

        let changes = editor.take_changes();
        self.history
            .for_document(editor.document_id())
            .record(*descriptor, token, changes);
        self.apply_mode_flags(descriptor.flags);
        Ok(())
    }

    /// Record text the host typed outside of command dispatch.
    pub fn record_typing(&mut self, editor: &mut dyn Editor) {
        let changes = editor.take_changes();
        if changes.is_empty() {
            return;
        }
        let token = self.next_token();
        self.history.for_document(editor.document_id()).record(
            CommandDescriptor::new(CommandId::Type, CommandFlags::EDIT),
            token,
            changes,
        );
    }

    fn apply_mode_flags(&mut self, flags: CommandFlags) {
        let next = if flags.contains(CommandFlags::SWITCH_TO_INSERT) {
            Mode::Insert
        } else if flags.contains(CommandFlags::SWITCH_TO_NORMAL) {
            Mode::Normal
        } else {
            return;
        };
        if next != self.mode {
            debug!(target: "engine.dispatch", from = ?self.mode, to = ?next, "mode_switch");
            self.mode = next;
        }
    }

    fn next_token(&mut self) -> StateToken {
        self.next_token += 1;
        StateToken(self.next_token)
    }
}
