//! Per-document command log.
//!
//! Each document gets an append-only sequence of executed commands, each
//! tagged with a [`StateToken`], plus the changes that execution produced.
//! Only the dispatcher appends; everything else reads.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::command::CommandDescriptor;
use crate::traits::DocumentId;
use crate::types::Change;

/// Opaque identifier of one command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub descriptor: CommandDescriptor,
    pub token: StateToken,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    commands: Vec<HistoryEntry>,
    changes: HashMap<StateToken, Vec<Change>>,
    max_entries: Option<usize>,
}

impl History {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            commands: Vec::new(),
            changes: HashMap::new(),
            max_entries,
        }
    }

    /// Append one executed command. Changes are stored only when non-empty.
    pub fn record(
        &mut self,
        descriptor: CommandDescriptor,
        token: StateToken,
        changes: Vec<Change>,
    ) {
        trace!(
            target: "history",
            command = %descriptor.id,
            token = token.0,
            changes = changes.len(),
            "record"
        );
        self.commands.push(HistoryEntry { descriptor, token });
        if !changes.is_empty() {
            self.changes.insert(token, changes);
        }
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        let Some(max) = self.max_entries else {
            return;
        };
        if self.commands.len() <= max {
            return;
        }
        let excess = self.commands.len() - max;
        for entry in self.commands.drain(..excess) {
            self.changes.remove(&entry.token);
        }
        debug!(
            target: "history",
            evicted = excess,
            remaining = self.commands.len(),
            "evict_oldest"
        );
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.commands
    }

    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.commands.get(index)
    }

    pub fn changes_for(&self, token: StateToken) -> Option<&[Change]> {
        self.changes.get(&token).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// All open documents' histories.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    docs: HashMap<DocumentId, History>,
    max_entries: Option<usize>,
}

impl HistoryStore {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            docs: HashMap::new(),
            max_entries,
        }
    }

    /// The history of `doc`, created on first access.
    pub fn for_document(&mut self, doc: DocumentId) -> &mut History {
        let max_entries = self.max_entries;
        self.docs
            .entry(doc)
            .or_insert_with(|| History::new(max_entries))
    }

    pub fn get(&self, doc: DocumentId) -> Option<&History> {
        self.docs.get(&doc)
    }

    /// Drop the history of a closed document.
    pub fn close(&mut self, doc: DocumentId) -> bool {
        let removed = self.docs.remove(&doc).is_some();
        if removed {
            debug!(target: "history", doc = doc.0, "discard_on_close");
        }
        removed
    }
}
