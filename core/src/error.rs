// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Errors raised while building or dispatching Fantastical requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line was well-formed for clap but semantically wrong.
    #[error("usage: {0}")]
    Usage(String),

    /// A configuration file could not be read or parsed.
    #[error("config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A spawned program exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Process { program: String, status: String },

    /// The requested action has no implementation on this platform.
    #[error("{0}")]
    Unsupported(String),

    /// The EventKit helper could not be built or returned bad output.
    #[error("eventkit helper: {0}")]
    Helper(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error should map to the usage exit code.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
