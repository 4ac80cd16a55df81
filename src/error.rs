use std::path::PathBuf;

use thiserror::Error;

use crate::command::CommandId;
use crate::types::Position;

/// Errors surfaced to the host by command execution and configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no handler registered for command '{0}'")]
    UnknownCommand(CommandId),

    #[error("position {}:{} is outside the document", .0.line, .0.col)]
    InvalidPosition(Position),

    /// The host could not apply a batched edit; nothing from the batch was applied.
    #[error("edit rejected by host: {0}")]
    EditRejected(String),

    #[error("host command '{name}' failed: {reason}")]
    Builtin { name: &'static str, reason: String },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
