//! Insertion commands and insert-session replay.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use tracing::debug;

use crate::command::{CommandFlags, CommandId, CommandState, Registry};
use crate::edit::EditBuilder;
use crate::engine::Engine;
use crate::error::Result;
use crate::history::HistoryEntry;
use crate::selection::SelectionSet;
use crate::traits::{BuiltinCommand, Editor, TextDocument};
use crate::types::{Change, Position};

pub(crate) fn register_all(registry: &mut Registry) {
    let enter_insert = CommandFlags::CHANGE_SELECTIONS | CommandFlags::SWITCH_TO_INSERT;
    registry.register(CommandId::InsertBefore, enter_insert, insert_before);
    registry.register(CommandId::InsertAfter, enter_insert, insert_after);
    registry.register(CommandId::InsertLineStart, enter_insert, insert_line_start);
    registry.register(CommandId::InsertLineEnd, enter_insert, insert_line_end);

    let open_line = CommandFlags::EDIT | CommandFlags::SWITCH_TO_INSERT;
    registry.register(CommandId::InsertNewLineAbove, open_line, insert_new_line_above);
    registry.register(CommandId::InsertNewLineBelow, open_line, insert_new_line_below);

    registry.register(CommandId::NewLineAbove, CommandFlags::EDIT, new_line_above);
    registry.register(CommandId::NewLineBelow, CommandFlags::EDIT, new_line_below);

    // Edit only, so a replay never closes a session.
    registry.register(CommandId::RepeatInsert, CommandFlags::EDIT, repeat_insert);
}

fn insert_before(_: &mut Engine, editor: &mut dyn Editor, state: &mut CommandState) -> Result<()> {
    state
        .selection_set
        .update_each(editor, |selection, _| selection.collapse_to_start());
    Ok(())
}

fn insert_after(_: &mut Engine, editor: &mut dyn Editor, state: &mut CommandState) -> Result<()> {
    state
        .selection_set
        .update_each(editor, |selection, _| selection.collapse_to_end());
    Ok(())
}

fn insert_line_start(
    _: &mut Engine,
    editor: &mut dyn Editor,
    state: &mut CommandState,
) -> Result<()> {
    state.selection_set.update_each(editor, |selection, doc| {
        selection.active.to_line_first_non_whitespace(doc);
        selection.anchor.inherit(selection.active);
    });
    Ok(())
}

fn insert_line_end(
    _: &mut Engine,
    editor: &mut dyn Editor,
    state: &mut CommandState,
) -> Result<()> {
    state.selection_set.update_each(editor, |selection, doc| {
        selection.active.to_line_end(doc);
        selection.anchor.inherit(selection.active);
    });
    Ok(())
}

fn insert_new_line_above(
    _: &mut Engine,
    editor: &mut dyn Editor,
    state: &mut CommandState,
) -> Result<()> {
    state.selection_set.normalize_for_line_insertion(editor);
    editor.execute_builtin(BuiltinCommand::InsertLineBefore)
}

fn insert_new_line_below(
    _: &mut Engine,
    editor: &mut dyn Editor,
    state: &mut CommandState,
) -> Result<()> {
    state.selection_set.normalize_for_line_insertion(editor);
    editor.execute_builtin(BuiltinCommand::InsertLineAfter)
}

fn new_line_above(_: &mut Engine, editor: &mut dyn Editor, state: &mut CommandState) -> Result<()> {
    insert_line_breaks(editor, state, |_, line| Position::new(line, 0))
}

fn new_line_below(_: &mut Engine, editor: &mut dyn Editor, state: &mut CommandState) -> Result<()> {
    insert_line_breaks(editor, state, line_break_end)
}

/// Where the text after `line`'s terminator begins; the line end when the
/// line has no terminator.
fn line_break_end(doc: &dyn TextDocument, line: u32) -> Position {
    if line + 1 < doc.line_count() {
        Position::new(line + 1, 0)
    } else {
        Position::new(line, doc.line_len(line))
    }
}

/// One terminator per distinct active line, however many cursors share it.
fn insert_line_breaks<F>(editor: &mut dyn Editor, state: &CommandState, target: F) -> Result<()>
where
    F: Fn(&dyn TextDocument, u32) -> Position,
{
    let mut builder = EditBuilder::new();
    {
        let doc = editor.document();
        let newline = doc.line_ending().as_str();
        let mut processed = HashSet::new();
        for selection in state.selection_set.selections() {
            let line = selection.active_line();
            if processed.insert(line) {
                builder.insert(target(doc, line), newline);
            }
        }
    }
    if builder.is_empty() {
        return Ok(());
    }
    editor.apply_edit(builder)
}

/// Index range of the most recent complete insert session: the last entry that
/// entered insert mode through the first entry after it that left it.
pub fn find_insert_session(entries: &[HistoryEntry]) -> Option<RangeInclusive<usize>> {
    let start = entries
        .iter()
        .rposition(|entry| entry.descriptor.switches_to_insert())?;
    let end = entries[start + 1..]
        .iter()
        .position(|entry| entry.descriptor.switches_to_normal())?
        + start
        + 1;
    Some(start..=end)
}

/// Replay the last insert session at the current cursor, `count` times.
///
/// The opening command is re-run through the dispatcher so it reacts to the
/// current selections; the changes recorded after it are then applied
/// verbatim at the primary selection, all repetitions in one edit.
fn repeat_insert(
    engine: &mut Engine,
    editor: &mut dyn Editor,
    state: &mut CommandState,
) -> Result<()> {
    let (opener, recorded) = {
        let Some(history) = engine.history(editor.document_id()) else {
            debug!(target: "replay", "no_history");
            return Ok(());
        };
        let entries = history.entries();
        let Some(session) = find_insert_session(entries) else {
            debug!(target: "replay", entries = entries.len(), "no_complete_session");
            return Ok(());
        };
        let (start, end) = session.into_inner();
        let recorded: Vec<Change> = entries[start + 1..=end]
            .iter()
            .filter_map(|entry| history.changes_for(entry.token))
            .flatten()
            .cloned()
            .collect();
        debug!(
            target: "replay",
            opener = %entries[start].descriptor.id,
            start,
            end,
            changes = recorded.len(),
            "session_found"
        );
        (entries[start].descriptor, recorded)
    };

    engine.execute_descriptor(editor, &opener)?;

    if recorded.is_empty() {
        return Ok(());
    }
    // the opener may have moved the selections
    let Some(target) = SelectionSet::from_editor(editor, false).primary().copied() else {
        return Ok(());
    };

    let mut builder = EditBuilder::new();
    for _ in 0..state.count_or_one() {
        for change in &recorded {
            if change.is_insertion() {
                builder.insert(target.active, change.text.as_str());
            } else {
                builder.replace(target.range(), change.text.as_str());
            }
        }
    }
    editor.apply_edit(builder)
}
