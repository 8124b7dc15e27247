// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-node commands: `server` and `client`, each with `config`, `start`
//! and `stop`. Every option can also come from an `SSC_*` variable.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use ssc_compose::{
    ComposeOutput, ComposeRunner, DEFAULT_COMPOSE_BIN, GeneratorSettings, Manifest,
    client_manifest, server_manifest, write_manifest,
};
use ssc_domain_types::{ClientNode, DEFAULT_IMAGE, RemoteEndpoint, ServerNode};
use ssc_logging::redact;
use std::path::PathBuf;
use tracing::info;

use crate::endpoint::parse_endpoint;

/// Where a node's compose file lives
#[derive(Args, Clone, Debug)]
pub struct ComposeFileArgs {
    /// Directory the compose file is written to and compose runs in
    #[arg(long, env = "SSC_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Compose file name, relative to the workdir
    #[arg(long, env = "SSC_COMPOSE_FILE", default_value = "docker-compose.yml")]
    pub file: PathBuf,
}

impl ComposeFileArgs {
    pub fn manifest_path(&self) -> PathBuf {
        self.workdir.join(&self.file)
    }

    fn write(&self, manifest: &Manifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        write_manifest(&path, manifest)
            .with_context(|| format!("write compose file {}", path.display()))?;
        Ok(path)
    }
}

/// Arguments for `start` and `stop`
#[derive(Args, Clone, Debug)]
pub struct LifecycleArgs {
    #[command(flatten)]
    pub files: ComposeFileArgs,

    /// Compose executable, optionally with leading arguments ("docker compose")
    #[arg(long, env = "SSC_COMPOSE_BIN", default_value = DEFAULT_COMPOSE_BIN)]
    pub compose_bin: String,
}

impl LifecycleArgs {
    fn runner(&self) -> Result<ComposeRunner> {
        Ok(ComposeRunner::new(
            &self.compose_bin,
            &self.files.workdir,
            &self.files.file,
        )?)
    }

    pub fn start(&self) -> Result<()> {
        let runner = self.runner()?;
        let output = runner.up().with_context(|| {
            format!(
                "start services from {}",
                runner.workdir().join(runner.file()).display()
            )
        })?;
        echo(&output);
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        let runner = self.runner()?;
        let output = runner.down().with_context(|| {
            format!(
                "stop services from {}",
                runner.workdir().join(runner.file()).display()
            )
        })?;
        echo(&output);
        Ok(())
    }
}

fn echo(output: &ComposeOutput) {
    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// Write the compose file for one server
    Config(ServerConfigArgs),
    /// Run `compose up -d` for the server's compose file
    Start(LifecycleArgs),
    /// Run `compose down` for the server's compose file
    Stop(LifecycleArgs),
}

impl ServerCommands {
    pub fn run(self) -> Result<()> {
        match self {
            ServerCommands::Config(args) => args.run(),
            ServerCommands::Start(args) => args.start(),
            ServerCommands::Stop(args) => args.stop(),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ServerConfigArgs {
    /// Proxy image
    #[arg(long, env = "SSC_IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Container name; also names the node's network
    #[arg(long, env = "SSC_SERVER_NAME", default_value = "ss-server")]
    pub name: String,

    /// Host port the proxy is published on
    #[arg(long, env = "SSC_SERVER_PORT", default_value = "9000")]
    pub port: String,

    /// Extra host ports for the same proxy
    #[arg(long, env = "SSC_SERVER_BACKUP_PORTS", value_delimiter = ',')]
    pub backup_ports: Vec<String>,

    /// Shared secret
    #[arg(long, env = "SSC_KEY")]
    pub key: String,

    /// Fail when two bindings publish the same host port
    #[arg(long, env = "SSC_STRICT_PORTS")]
    pub strict_ports: bool,

    #[command(flatten)]
    pub files: ComposeFileArgs,
}

impl ServerConfigArgs {
    pub fn node(&self) -> ServerNode {
        ServerNode {
            name: self.name.clone(),
            port: self.port.clone(),
            backup_ports: self.backup_ports.clone(),
            key: self.key.clone(),
        }
    }

    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            image: self.image.clone(),
            backup_ports: !self.backup_ports.is_empty(),
            strict_ports: self.strict_ports,
        }
    }

    pub fn run(self) -> Result<()> {
        let manifest = server_manifest(&self.node(), &self.settings())
            .with_context(|| format!("configure server '{}'", self.name))?;
        let path = self.files.write(&manifest)?;
        info!(
            path = %path.display(),
            name = %self.name,
            port = %self.port,
            key = %redact(&self.key),
            "Wrote server compose file"
        );
        println!("{}", path.display());
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Write the compose file for one client and its extra endpoints
    Config(ClientConfigArgs),
    /// Run `compose up -d` for the client's compose file
    Start(LifecycleArgs),
    /// Run `compose down` for the client's compose file
    Stop(LifecycleArgs),
}

impl ClientCommands {
    pub fn run(self) -> Result<()> {
        match self {
            ClientCommands::Config(args) => args.run(),
            ClientCommands::Start(args) => args.start(),
            ClientCommands::Stop(args) => args.stop(),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ClientConfigArgs {
    /// Proxy image
    #[arg(long, env = "SSC_IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Base container name; also names the node's network
    #[arg(long, env = "SSC_CLIENT_NAME", default_value = "ss-client")]
    pub name: String,

    /// Host port of the primary local proxy
    #[arg(long, env = "SSC_CLIENT_PORT", default_value = "1080")]
    pub port: String,

    /// Route the primary remote through a local KCP tunnel
    #[arg(long, env = "SSC_CLIENT_KCP")]
    pub kcp: bool,

    /// Primary remote server address
    #[arg(long, env = "SSC_REMOTE_IP")]
    pub remote_ip: String,

    /// Primary remote server port
    #[arg(long, env = "SSC_REMOTE_PORT", default_value = "9000")]
    pub remote_port: String,

    /// Shared secret
    #[arg(long, env = "SSC_KEY")]
    pub key: String,

    /// Extra remote: provider=NAME,host=HOST,ports=P1+P2[,obfuscate=BOOL][,base=PORT]
    #[arg(
        long = "endpoint",
        env = "SSC_ENDPOINTS",
        value_delimiter = ';',
        value_parser = parse_endpoint
    )]
    pub endpoints: Vec<RemoteEndpoint>,

    /// Fail when two bindings publish the same host port
    #[arg(long, env = "SSC_STRICT_PORTS")]
    pub strict_ports: bool,

    #[command(flatten)]
    pub files: ComposeFileArgs,
}

impl ClientConfigArgs {
    pub fn node(&self) -> ClientNode {
        ClientNode {
            name: self.name.clone(),
            port: self.port.clone(),
            kcp: self.kcp,
            remote_ip: self.remote_ip.clone(),
            remote_port: self.remote_port.clone(),
            key: self.key.clone(),
            endpoints: self.endpoints.clone(),
        }
    }

    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            image: self.image.clone(),
            strict_ports: self.strict_ports,
            ..Default::default()
        }
    }

    pub fn run(self) -> Result<()> {
        let manifest = client_manifest(&self.node(), &self.settings())
            .with_context(|| format!("configure client '{}'", self.name))?;
        let path = self.files.write(&manifest)?;
        info!(
            path = %path.display(),
            name = %self.name,
            services = manifest.services.len(),
            key = %redact(&self.key),
            "Wrote client compose file"
        );
        println!("{}", path.display());
        Ok(())
    }
}
