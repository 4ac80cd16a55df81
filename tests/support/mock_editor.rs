use std::borrow::Cow;
use std::collections::BTreeSet;

use insert_replay::edit::EditOp;
use insert_replay::traits::{BuiltinCommand, DocumentId, Editor, TextDocument};
use insert_replay::types::{Change, LineEnding, Position, Selection};
use insert_replay::{EditBuilder, Error, Result};
use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

pub struct MockDocument {
    rope: Rope,
    eol: LineEnding,
}

impl MockDocument {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            eol: LineEnding::detect_in_text(text),
        }
    }

    fn line_str(&self, line: u32) -> String {
        if line as usize >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(line as usize).to_string();
        // Remove trailing terminator if present
        if s.ends_with('\n') {
            s.pop();
        }
        if s.ends_with('\r') {
            s.pop();
        }
        s
    }

    fn char_offset(&self, pos: Position) -> Result<usize> {
        if pos.line as usize >= self.rope.len_lines() {
            return Err(Error::InvalidPosition(pos));
        }
        let line = self.line_str(pos.line);
        let mut graphemes = line.graphemes(true);
        let mut chars = 0;
        for _ in 0..pos.col {
            let g = graphemes.next().ok_or(Error::InvalidPosition(pos))?;
            chars += g.chars().count();
        }
        Ok(self.rope.line_to_char(pos.line as usize) + chars)
    }

    fn position_at(&self, offset: usize) -> Position {
        let line = self.rope.char_to_line(offset);
        let within = offset - self.rope.line_to_char(line);
        let text = self.line_str(line as u32);
        let mut col = 0;
        let mut seen = 0;
        for g in text.graphemes(true) {
            if seen >= within {
                break;
            }
            seen += g.chars().count();
            col += 1;
        }
        Position::new(line as u32, col)
    }
}

impl TextDocument for MockDocument {
    fn line_count(&self) -> u32 {
        self.rope.len_lines() as u32
    }

    fn line_text(&self, line: u32) -> Cow<'_, str> {
        Cow::Owned(self.line_str(line))
    }

    fn line_ending(&self) -> LineEnding {
        self.eol
    }
}

/// An editor double that applies edits to a rope and records everything the
/// engine does to it.
pub struct MockEditor {
    doc: MockDocument,
    id: DocumentId,
    selections: Vec<Selection>,
    pending_changes: Vec<Change>,
    /// Every selection set written back by the engine, in order.
    pub selection_writes: Vec<Vec<Selection>>,
    /// Resolved operations of every applied edit, one entry per atomic edit.
    pub applied_edits: Vec<Vec<EditOp>>,
    pub builtin_calls: Vec<BuiltinCommand>,
    pub reject_edits: bool,
}

impl MockEditor {
    pub fn new(text: &str, selections: Vec<Selection>) -> Self {
        Self::with_id(DocumentId(1), text, selections)
    }

    pub fn with_id(id: DocumentId, text: &str, selections: Vec<Selection>) -> Self {
        Self {
            doc: MockDocument::new(text),
            id,
            selections,
            pending_changes: Vec::new(),
            selection_writes: Vec::new(),
            applied_edits: Vec::new(),
            builtin_calls: Vec::new(),
            reject_edits: false,
        }
    }

    pub fn with_cursor(text: &str, at: Position) -> Self {
        Self::new(text, vec![Selection::cursor(at)])
    }

    pub fn text(&self) -> String {
        self.doc.rope.to_string()
    }

    pub fn current_selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Place the cursors without going through the engine.
    pub fn place(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }

    /// Host typing path: replace every selection with `text` and leave
    /// collapsed cursors after it.
    pub fn type_text(&mut self, text: &str) {
        let mut builder = EditBuilder::new();
        for selection in &self.selections {
            if selection.is_empty() {
                builder.insert(selection.active, text);
            } else {
                builder.replace(selection.range(), text);
            }
        }
        self.apply_edit(builder).expect("typing applies");
        for selection in &mut self.selections {
            let end = selection.end();
            *selection = Selection::cursor(end);
        }
    }

    fn map_offset(offset: usize, ops: &[(usize, usize, usize)]) -> usize {
        let mut delta: isize = 0;
        for &(start, end, inserted) in ops {
            let change = inserted as isize - (end - start) as isize;
            if end <= offset {
                delta += change;
            } else if start < offset {
                return (start as isize + delta) as usize + inserted;
            } else {
                break;
            }
        }
        (offset as isize + delta) as usize
    }
}

impl Editor for MockEditor {
    fn document_id(&self) -> DocumentId {
        self.id
    }

    fn document(&self) -> &dyn TextDocument {
        &self.doc
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selection_writes.push(selections.clone());
        self.selections = selections;
    }

    fn apply_edit(&mut self, edit: EditBuilder) -> Result<()> {
        if self.reject_edits {
            return Err(Error::EditRejected("document closed".into()));
        }
        let ops = edit.resolve();
        // validate everything before touching the rope
        let mut spans = Vec::with_capacity(ops.len());
        for op in &ops {
            let start = self.doc.char_offset(op.range.start)?;
            let end = self.doc.char_offset(op.range.end)?;
            spans.push((start, end, op.text.chars().count()));
        }

        let anchors: Vec<(usize, usize)> = self
            .selections
            .iter()
            .map(|s| -> Result<(usize, usize)> {
                Ok((
                    self.doc.char_offset(s.anchor)?,
                    self.doc.char_offset(s.active)?,
                ))
            })
            .collect::<Result<_>>()?;

        for (op, &(start, end, _)) in ops.iter().zip(&spans).rev() {
            self.doc.rope.remove(start..end);
            self.doc.rope.insert(start, &op.text);
        }
        for (op, &(start, end, _)) in ops.iter().zip(&spans) {
            self.pending_changes.push(Change::replacement(
                op.range.start,
                (end - start) as u32,
                op.text.clone(),
            ));
        }
        self.selections = anchors
            .into_iter()
            .map(|(anchor, active)| {
                Selection::new(
                    self.doc.position_at(Self::map_offset(anchor, &spans)),
                    self.doc.position_at(Self::map_offset(active, &spans)),
                )
            })
            .collect();
        self.applied_edits.push(ops);
        Ok(())
    }

    fn execute_builtin(&mut self, command: BuiltinCommand) -> Result<()> {
        self.builtin_calls.push(command);
        if self.reject_edits {
            return Err(Error::Builtin {
                name: command.name(),
                reason: "document closed".into(),
            });
        }
        let lines: BTreeSet<u32> = self.selections.iter().map(|s| s.active.line).collect();
        let newline = self.doc.line_ending().as_str();
        let mut builder = EditBuilder::new();
        let mut indents = Vec::new();
        for &line in &lines {
            let text = self.doc.line_str(line);
            let indent: String = text.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
            indents.push(indent.graphemes(true).count() as u32);
            match command {
                BuiltinCommand::InsertLineBefore => {
                    builder.insert(Position::new(line, 0), format!("{indent}{newline}"));
                }
                BuiltinCommand::InsertLineAfter => {
                    let end = Position::new(line, self.doc.line_len(line));
                    builder.insert(end, format!("{newline}{indent}"));
                }
            }
        }
        self.apply_edit(builder)?;

        let cursors: Vec<Selection> = lines
            .iter()
            .zip(indents)
            .enumerate()
            .map(|(k, (&line, indent))| {
                let new_line = match command {
                    BuiltinCommand::InsertLineBefore => line + k as u32,
                    BuiltinCommand::InsertLineAfter => line + k as u32 + 1,
                };
                Selection::cursor(Position::new(new_line, indent))
            })
            .collect();
        self.selections = cursors;
        Ok(())
    }

    fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.pending_changes)
    }
}
