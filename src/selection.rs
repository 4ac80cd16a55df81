//! Cursor primitives and the per-command selection set.
//!
//! A [`SelectionSet`] is built from the host's live selections when a command
//! starts, mutated privately by the command, and written back with a single
//! [`SelectionSet::commit`].

use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::traits::{Editor, TextDocument};
use crate::types::{Position, Range, Selection};

impl Position {
    /// Move to the first non-whitespace column of the current line, or to the
    /// line end when the line is blank.
    pub fn to_line_first_non_whitespace(&mut self, doc: &dyn TextDocument) {
        self.col = first_non_whitespace_col(&doc.line_text(self.line));
    }

    /// Move past the last grapheme of the current line (terminator excluded).
    pub fn to_line_end(&mut self, doc: &dyn TextDocument) {
        self.col = doc.line_len(self.line);
    }

    /// Take `other`'s coordinates in place.
    pub fn inherit(&mut self, other: Position) {
        self.line = other.line;
        self.col = other.col;
    }
}

pub(crate) fn first_non_whitespace_col(line: &str) -> u32 {
    let mut col = 0;
    for g in line.graphemes(true) {
        if !g.chars().all(char::is_whitespace) {
            return col;
        }
        col += 1;
    }
    col
}

impl Selection {
    pub const fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// An empty selection at `at`.
    pub const fn cursor(at: Position) -> Self {
        Self {
            anchor: at,
            active: at,
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    pub fn is_empty(&self) -> bool {
        self.active == self.anchor
    }

    pub fn active_line(&self) -> u32 {
        self.active.line
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    /// The endpoint currently at the start of the selection.
    pub fn start_mut(&mut self) -> &mut Position {
        if self.is_reversed() {
            &mut self.active
        } else {
            &mut self.anchor
        }
    }

    /// The endpoint currently at the end of the selection.
    pub fn end_mut(&mut self) -> &mut Position {
        if self.is_reversed() {
            &mut self.anchor
        } else {
            &mut self.active
        }
    }

    /// Collapse onto the start; the end endpoint moves.
    pub fn collapse_to_start(&mut self) {
        let start = self.start();
        self.end_mut().inherit(start);
    }

    /// Collapse onto the end; the start endpoint moves.
    pub fn collapse_to_end(&mut self) {
        let end = self.end();
        self.start_mut().inherit(end);
    }

    /// Step the active endpoint one column left, wrapping to the end of the
    /// previous line at column 0. No-op at the document origin.
    pub fn move_left_or_go_up(&mut self, doc: &dyn TextDocument) {
        if self.active.col > 0 {
            self.active.col -= 1;
        } else if self.active.line > 0 {
            self.active.line -= 1;
            self.active.to_line_end(doc);
        }
    }
}

/// The ordered selections of one editor view during one command.
///
/// Index 0 is the primary selection.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    selections: Vec<Selection>,
    enforce_non_empty_selections: bool,
    dirty: bool,
}

impl SelectionSet {
    pub fn new(selections: Vec<Selection>, enforce_non_empty_selections: bool) -> Self {
        Self {
            selections,
            enforce_non_empty_selections,
            dirty: false,
        }
    }

    /// Snapshot the editor's live selections.
    pub fn from_editor(editor: &dyn Editor, enforce_non_empty_selections: bool) -> Self {
        Self::new(editor.selections(), enforce_non_empty_selections)
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Mutable access; the set is considered modified afterwards.
    pub fn selections_mut(&mut self) -> &mut [Selection] {
        self.dirty = true;
        &mut self.selections
    }

    pub fn primary(&self) -> Option<&Selection> {
        self.selections.first()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn enforce_non_empty_selections(&self) -> bool {
        self.enforce_non_empty_selections
    }

    /// Apply `f` to every selection in order, then commit.
    pub fn update_each<F>(&mut self, editor: &mut dyn Editor, mut f: F)
    where
        F: FnMut(&mut Selection, &dyn TextDocument),
    {
        {
            let doc = editor.document();
            for selection in &mut self.selections {
                f(selection, doc);
            }
        }
        self.dirty = true;
        self.commit(editor);
    }

    /// Write the selections back to the editor as its live selection set.
    pub fn commit(&mut self, editor: &mut dyn Editor) {
        if !self.dirty {
            trace!(target: "selection", count = self.selections.len(), "commit_skipped_clean");
            return;
        }
        trace!(target: "selection", count = self.selections.len(), "commit");
        editor.set_selections(self.selections.clone());
        self.dirty = false;
    }

    /// Shift forward selections whose caret sits at column 0 onto the end of
    /// the previous line, so "the cursor's line" is unambiguous for line
    /// insertion. Only applies when non-empty selections are enforced.
    pub fn normalize_for_line_insertion(&mut self, editor: &mut dyn Editor) {
        if !self.enforce_non_empty_selections() {
            return;
        }
        {
            let doc = editor.document();
            for selection in &mut self.selections {
                if selection.active.col == 0 && !selection.is_reversed() {
                    selection.move_left_or_go_up(doc);
                }
            }
        }
        self.dirty = true;
        self.commit(editor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_whitespace_skips_indent() {
        assert_eq!(first_non_whitespace_col("    let x"), 4);
        assert_eq!(first_non_whitespace_col("\tfoo"), 1);
        assert_eq!(first_non_whitespace_col("   "), 3);
        assert_eq!(first_non_whitespace_col(""), 0);
    }

    #[test]
    fn collapse_keeps_direction_endpoint() {
        let mut sel = Selection::new(Position::new(0, 5), Position::new(0, 1));
        assert!(sel.is_reversed());
        sel.collapse_to_start();
        assert_eq!(sel, Selection::cursor(Position::new(0, 1)));

        let mut sel = Selection::new(Position::new(0, 1), Position::new(2, 0));
        sel.collapse_to_end();
        assert_eq!(sel, Selection::cursor(Position::new(2, 0)));
    }
}
