// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Fleet definition, the root of the batch generator's input

use serde::{Deserialize, Serialize};

use crate::node::{ClientNode, ServerNode};

/// Proxy image the sample fleet is generated with
pub const DEFAULT_IMAGE: &str = "mritd/shadowsocks:3.3.4-20200409";

const SAMPLE_NODE_COUNT: usize = 3;
const SAMPLE_SERVER_PORT: &str = "9000";
const SAMPLE_CLIENT_BASE_PORT: u16 = 1080;
const SAMPLE_REMOTE_IP: &str = "127.0.0.1";
const SAMPLE_KEY: &str = "12345678";

/// Declarative description of a whole fleet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ServerNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clients: Vec<ClientNode>,
}

impl FleetConfig {
    /// Placeholder fleet written by `init`: three servers sharing one port and
    /// three clients, every other one routed through KCP.
    pub fn sample() -> Self {
        let servers = (0..SAMPLE_NODE_COUNT)
            .map(|i| ServerNode {
                name: format!("server-{i}"),
                port: SAMPLE_SERVER_PORT.to_string(),
                backup_ports: Vec::new(),
                key: SAMPLE_KEY.to_string(),
            })
            .collect();

        let clients = (0..SAMPLE_NODE_COUNT)
            .map(|i| ClientNode {
                name: format!("client-{i}"),
                port: (SAMPLE_CLIENT_BASE_PORT + i as u16).to_string(),
                kcp: i % 2 == 0,
                remote_ip: SAMPLE_REMOTE_IP.to_string(),
                remote_port: SAMPLE_SERVER_PORT.to_string(),
                key: SAMPLE_KEY.to_string(),
                endpoints: Vec::new(),
            })
            .collect();

        Self {
            image: DEFAULT_IMAGE.to_string(),
            servers,
            clients,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty() && self.clients.is_empty()
    }
}
