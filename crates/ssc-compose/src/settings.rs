// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Explicit generation settings, passed down instead of process-wide defaults

use ssc_domain_types::DEFAULT_IMAGE;

/// Network group holding every server of a batch
pub const SERVER_GROUP: &str = "shadowsocks-server";
/// Network group holding every client of a batch
pub const CLIENT_GROUP: &str = "shadowsocks-client";

/// Knobs shared by the batch and per-node generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Image used when the input does not name one
    pub image: String,
    /// Publish each server's backup ports next to its main port
    pub backup_ports: bool,
    /// Fail instead of warn when two services publish the same host port
    pub strict_ports: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            backup_ports: false,
            strict_ports: false,
        }
    }
}

/// How the primary service of a client is named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientNaming {
    /// The node name as written (batch fleets)
    Bare,
    /// `<name>-<local port>` (per-node manifests)
    PortSuffixed,
}

/// Everything the translator needs besides the node itself
#[derive(Debug, Clone, Copy)]
pub struct TranslateContext<'a> {
    pub image: &'a str,
    pub network: &'a str,
    pub naming: ClientNaming,
    pub backup_ports: bool,
}
