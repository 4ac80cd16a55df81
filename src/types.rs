/// A position within a text document.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column position in grapheme clusters.
    pub col: u32,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { line: 0, col: 0 };

    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// A range of text defined by start and end positions.
///
/// Ranges are half-open intervals [start, end), meaning the start position
/// is included but the end position is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    /// The start position (inclusive).
    pub start: Position,
    /// The end position (exclusive).
    pub end: Position,
}

impl Range {
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A cursor with an optional extent, defined by an anchor and an active endpoint.
///
/// The active endpoint is where the caret is drawn. A selection is reversed when
/// its active endpoint precedes its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// The fixed endpoint.
    pub anchor: Position,
    /// The moving endpoint (the caret).
    pub active: Position,
}

/// The current mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal mode - for navigation and operators.
    #[default]
    Normal,
    /// Insert mode - for typing text.
    Insert,
}

/// The newline sequence a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the line ending of a source text: any CRLF wins.
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// One recorded text mutation.
///
/// A zero `range_length` is a pure insertion at `range_start`; otherwise
/// `range_length` grapheme clusters starting at `range_start` were replaced
/// by `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub range_start: Position,
    pub range_length: u32,
    pub text: String,
}

impl Change {
    pub fn insertion(at: Position, text: impl Into<String>) -> Self {
        Self {
            range_start: at,
            range_length: 0,
            text: text.into(),
        }
    }

    pub fn replacement(start: Position, length: u32, text: impl Into<String>) -> Self {
        Self {
            range_start: start,
            range_length: length,
            text: text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range_length == 0
    }
}
