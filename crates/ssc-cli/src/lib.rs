// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use clap::Subcommand;
use ssc_logging::CliLoggingArgs;

pub mod endpoint;
pub mod fleet_commands;
pub mod node_commands;

#[derive(clap::Parser)]
#[command(
    name = "ssc",
    about = "Generate compose files for shadowsocks/KCP proxy fleets",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample fleet definition
    Init(fleet_commands::InitArgs),
    /// Generate one compose file for a whole fleet definition
    Generate(fleet_commands::GenerateArgs),
    /// Per-node commands for a single proxy server
    Server {
        #[command(subcommand)]
        subcommand: node_commands::ServerCommands,
    },
    /// Per-node commands for a single local client
    Client {
        #[command(subcommand)]
        subcommand: node_commands::ClientCommands,
    },
}

impl Commands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Commands::Init(args) => args.run(),
            Commands::Generate(args) => args.run(),
            Commands::Server { subcommand } => subcommand.run(),
            Commands::Client { subcommand } => subcommand.run(),
        }
    }
}

pub use clap::Parser;
