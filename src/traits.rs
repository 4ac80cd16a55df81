use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

use crate::edit::EditBuilder;
use crate::error::Result;
use crate::types::{Change, LineEnding, Selection};

/// Read access to the host's text document.
pub trait TextDocument {
    fn line_count(&self) -> u32;

    /// Content of `line` without its terminator. Out-of-range lines are empty.
    fn line_text(&self, line: u32) -> Cow<'_, str>;

    fn line_ending(&self) -> LineEnding;

    // grapheme columns
    fn line_len(&self, line: u32) -> u32 {
        self.line_text(line).graphemes(true).count() as u32
    }
}

/// Opaque host primitives invoked by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    /// Open a new, indented line above each cursor's line.
    InsertLineBefore,
    /// Open a new, indented line below each cursor's line.
    InsertLineAfter,
}

impl BuiltinCommand {
    pub fn name(self) -> &'static str {
        match self {
            Self::InsertLineBefore => "editor.action.insertLineBefore",
            Self::InsertLineAfter => "editor.action.insertLineAfter",
        }
    }
}

/// A host editor view over one document.
pub trait Editor {
    /// Identity of the open document; history is keyed by it.
    fn document_id(&self) -> DocumentId;

    fn document(&self) -> &dyn TextDocument;

    /// Live selections, primary first.
    fn selections(&self) -> Vec<Selection>;

    /// Replace the live selections with `selections` in one step.
    fn set_selections(&mut self, selections: Vec<Selection>);

    /// Apply every queued operation of `edit` as one atomic document mutation.
    /// On error none of the operations may be observable.
    fn apply_edit(&mut self, edit: EditBuilder) -> Result<()>;

    fn execute_builtin(&mut self, command: BuiltinCommand) -> Result<()>;

    /// Changes applied to the document since the previous call, in order.
    fn take_changes(&mut self) -> Vec<Change>;
}

/// Host-assigned identity of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);
