// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Thin wrapper around the external compose binary
//!
//! Calls block until compose exits; there is no timeout.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::{ComposeError, Result};

/// Compose binary used when none is configured
pub const DEFAULT_COMPOSE_BIN: &str = "docker-compose";

/// Captured output of a successful compose run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone)]
pub struct ComposeRunner {
    /// Program plus leading arguments, e.g. `docker-compose` or `docker compose`
    command: Vec<String>,
    workdir: PathBuf,
    file: PathBuf,
}

impl ComposeRunner {
    /// `binary` is split shell-style, so `"docker compose"` works.
    pub fn new(binary: &str, workdir: impl Into<PathBuf>, file: impl Into<PathBuf>) -> Result<Self> {
        let command = shell_words::split(binary).map_err(|e| ComposeError::Launch {
            command: binary.to_string(),
            reason: e.to_string(),
        })?;
        if command.is_empty() {
            return Err(ComposeError::config("compose binary must not be empty"));
        }
        Ok(Self {
            command,
            workdir: workdir.into(),
            file: file.into(),
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// `<compose> -f <file> up -d`
    pub fn up(&self) -> Result<ComposeOutput> {
        self.run(&["up", "-d"])
    }

    /// `<compose> -f <file> down`
    pub fn down(&self) -> Result<ComposeOutput> {
        self.run(&["down"])
    }

    fn run(&self, action: &[&str]) -> Result<ComposeOutput> {
        let (program, leading) = self
            .command
            .split_first()
            .ok_or_else(|| ComposeError::config("compose binary must not be empty"))?;

        let mut args: Vec<String> = leading.to_vec();
        args.push("-f".to_string());
        args.push(self.file.to_string_lossy().into_owned());
        args.extend(action.iter().map(|arg| arg.to_string()));
        let command_line = format!("{} {}", program, args.join(" "));

        let resolved = which::which(program).map_err(|e| ComposeError::Launch {
            command: command_line.clone(),
            reason: e.to_string(),
        })?;
        debug!(program = %resolved.display(), workdir = %self.workdir.display(), "Running compose");

        let output = Command::new(&resolved)
            .args(&args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| ComposeError::Launch {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ComposeError::ExternalProcess {
                command: command_line,
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        info!(command = %command_line, "Compose finished");
        Ok(ComposeOutput { stdout, stderr })
    }
}
