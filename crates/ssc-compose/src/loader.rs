// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Fleet file loading and atomic writes of generated YAML

use ssc_domain_types::FleetConfig;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::manifest::Manifest;
use crate::{ComposeError, Result};

/// Read and parse a fleet definition.
pub fn load_fleet(path: impl AsRef<Path>) -> Result<FleetConfig> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).map_err(|e| ComposeError::file("read", path, e))?;
    let fleet: FleetConfig = serde_yaml::from_str(&contents).map_err(|source| {
        ComposeError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(
        path = %path.display(),
        servers = fleet.servers.len(),
        clients = fleet.clients.len(),
        "Loaded fleet"
    );
    Ok(fleet)
}

/// Write a fleet definition.
pub fn write_fleet(path: impl AsRef<Path>, fleet: &FleetConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(fleet)?;
    write_atomic(path.as_ref(), &yaml)
}

/// Write the placeholder fleet used by `init` and return it.
pub fn write_sample_fleet(path: impl AsRef<Path>) -> Result<FleetConfig> {
    let fleet = FleetConfig::sample();
    write_fleet(path, &fleet)?;
    Ok(fleet)
}

/// Render and write a manifest. Nothing touches the destination unless the
/// whole document rendered.
pub fn write_manifest(path: impl AsRef<Path>, manifest: &Manifest) -> Result<()> {
    let yaml = manifest.to_yaml()?;
    write_atomic(path.as_ref(), &yaml)
}

/// Write through a temp file in the destination directory, then rename it into
/// place, so a failed write never leaves a truncated file behind.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ComposeError::file("create directory", dir, e))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| ComposeError::file("create temp file in", dir, e))?;
    temp.write_all(contents.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| ComposeError::file("write", temp.path().to_path_buf(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))
            .map_err(|e| ComposeError::file("set permissions on", temp.path().to_path_buf(), e))?;
    }

    temp.persist(path)
        .map_err(|e| ComposeError::file("write", path, e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
