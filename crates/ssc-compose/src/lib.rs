// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Compose manifest generation for shadowsocks/KCP proxy fleets.
//!
//! The pipeline is translate (one node into services), assemble (services into
//! a manifest with one network per group), then render to YAML. Loading fleet
//! files, writing manifests and driving the compose binary live at the edges.

mod assemble;
mod error;
mod loader;
mod manifest;
mod runner;
mod settings;
mod translate;

pub use assemble::{
    ManifestBuilder, PortCollision, client_manifest, fleet_manifest, server_manifest,
};
pub use error::{ComposeError, Result};
pub use loader::{load_fleet, write_fleet, write_manifest, write_sample_fleet};
pub use manifest::{BRIDGE_DRIVER, COMPOSE_VERSION, Manifest, Network, RESTART_ALWAYS, Service};
pub use runner::{ComposeOutput, ComposeRunner, DEFAULT_COMPOSE_BIN};
pub use settings::{CLIENT_GROUP, ClientNaming, GeneratorSettings, SERVER_GROUP, TranslateContext};
pub use translate::{client_services, server_service};
