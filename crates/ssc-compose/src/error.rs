// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;
use thiserror::Error;

/// Convenient result alias for manifest generation.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Errors raised while loading fleets, generating manifests, or driving compose.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A node is missing a required field or carries an unusable value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Two services resolved to the same container name.
    #[error("Duplicate service name '{name}'")]
    DuplicateName { name: String },

    /// Reading or writing a file failed.
    #[error("Failed to {action} {path:?}: {source}")]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fleet file was readable but not valid YAML for the fleet schema.
    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Rendering YAML failed.
    #[error("Failed to serialize: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The compose binary could not be located or started.
    #[error("Cannot run '{command}': {reason}")]
    Launch { command: String, reason: String },

    /// The compose binary ran and reported failure.
    #[error("'{command}' exited with {status}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    ExternalProcess {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },
}

impl ComposeError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }
}
