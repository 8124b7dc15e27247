// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Batch commands: `init` and `generate`

use anyhow::{Context, Result, bail};
use clap::Args;
use ssc_compose::{GeneratorSettings, fleet_manifest, load_fleet, write_manifest, write_sample_fleet};
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_FLEET_FILE: &str = "./shadowsocks.yml";
const DEFAULT_OUTPUT_FILE: &str = "docker-compose.yml";

#[derive(Args, Clone, Debug)]
pub struct InitArgs {
    /// Fleet definition to create
    #[arg(long, env = "SSC_FLEET_FILE", default_value = DEFAULT_FLEET_FILE)]
    pub config: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        if self.config.exists() && !self.force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                self.config.display()
            );
        }
        let fleet = write_sample_fleet(&self.config)
            .with_context(|| format!("init fleet definition {}", self.config.display()))?;
        info!(
            path = %self.config.display(),
            servers = fleet.servers.len(),
            clients = fleet.clients.len(),
            "Initialized fleet definition"
        );
        Ok(())
    }
}

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Fleet definition to read
    #[arg(long, env = "SSC_FLEET_FILE", default_value = DEFAULT_FLEET_FILE)]
    pub config: PathBuf,

    /// Compose file to write
    #[arg(long, short, env = "SSC_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Publish server backup ports
    #[arg(long, env = "SSC_BACKUP_PORTS")]
    pub backup_ports: bool,

    /// Fail when two services publish the same host port
    #[arg(long, env = "SSC_STRICT_PORTS")]
    pub strict_ports: bool,

    /// Print the manifest to stdout instead of writing it
    #[arg(long)]
    pub print: bool,
}

impl GenerateArgs {
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            backup_ports: self.backup_ports,
            strict_ports: self.strict_ports,
            ..Default::default()
        }
    }

    pub fn run(self) -> Result<()> {
        let fleet = load_fleet(&self.config)
            .with_context(|| format!("load fleet definition {}", self.config.display()))?;
        if fleet.is_empty() {
            warn!(path = %self.config.display(), "Fleet defines no servers or clients");
        }

        let manifest = fleet_manifest(&fleet, &self.settings())
            .with_context(|| format!("generate compose file from {}", self.config.display()))?;

        if self.print {
            print!("{}", manifest.to_yaml()?);
            return Ok(());
        }

        write_manifest(&self.output, &manifest)
            .with_context(|| format!("write compose file {}", self.output.display()))?;
        info!(
            path = %self.output.display(),
            services = manifest.services.len(),
            "Generated compose file"
        );
        Ok(())
    }
}
