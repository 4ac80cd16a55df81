pub mod command;
pub mod config;
pub mod edit;
pub mod engine;
pub mod error;
pub mod history;
pub mod insert;
pub mod selection;
pub mod traits;
pub mod types;

pub use crate::command::{CommandDescriptor, CommandFlags, CommandId, CommandState, Registry};
pub use crate::config::Settings;
pub use crate::edit::{EditBuilder, EditOp};
pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::error::{Error, Result};
pub use crate::history::{History, HistoryEntry, HistoryStore, StateToken};
pub use crate::selection::SelectionSet;
pub use crate::traits::{BuiltinCommand, DocumentId, Editor, TextDocument};
pub use crate::types::{Change, LineEnding, Mode, Position, Range, Selection};
