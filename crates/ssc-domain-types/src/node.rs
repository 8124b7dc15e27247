// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Node-related domain types
//!
//! A server is one proxy endpoint published on the host. A client is one local
//! SOCKS entry point plus the remote server(s) it forwards to.

use serde::{Deserialize, Serialize};

use crate::port::{optional_port, port_list, port_string};

/// One proxy server endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerNode {
    /// Unique service and container name
    pub name: String,
    /// Host port published for the proxy
    #[serde(deserialize_with = "port_string")]
    pub port: String,
    /// Extra host ports mapped onto the same proxy, in publishing order
    #[serde(default, deserialize_with = "port_list", skip_serializing_if = "Vec::is_empty")]
    pub backup_ports: Vec<String>,
    /// Shared secret used by both the proxy and the KCP tunnel
    pub key: String,
}

/// One local proxy entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientNode {
    /// Base service and container name
    pub name: String,
    /// Host port the local SOCKS proxy is published on
    #[serde(deserialize_with = "port_string")]
    pub port: String,
    /// Route traffic through a local KCP tunnel before the remote
    #[serde(default)]
    pub kcp: bool,
    pub remote_ip: String,
    #[serde(deserialize_with = "port_string")]
    pub remote_port: String,
    pub key: String,
    /// Additional named remotes, each producing its own services
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<RemoteEndpoint>,
}

/// A named secondary remote a client fans out to (e.g. a second hosting provider)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    /// Provider tag, used as a container-name suffix
    pub provider: String,
    pub host: String,
    /// Remote ports; one service is generated per port
    #[serde(deserialize_with = "port_list")]
    pub ports: Vec<String>,
    #[serde(default)]
    pub obfuscate: bool,
    /// First local port for this endpoint. When absent, allocation continues
    /// right after the previously allocated local port.
    #[serde(
        default,
        deserialize_with = "optional_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub local_port_base: Option<String>,
}
