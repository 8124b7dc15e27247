// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Manifest assembly
//!
//! Services are grouped, each non-empty group gets exactly one bridge network,
//! and the whole manifest is checked for container-name and host-port clashes
//! before anyone gets a chance to write it.

use ssc_domain_types::{ClientNode, FleetConfig, ServerNode};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::manifest::{Manifest, Network, Service};
use crate::settings::{
    CLIENT_GROUP, ClientNaming, GeneratorSettings, SERVER_GROUP, TranslateContext,
};
use crate::translate::{client_services, server_service};
use crate::{ComposeError, Result};

/// A host port published by more than one service binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCollision {
    /// `<port>/<proto>`
    pub host_port: String,
    pub first: String,
    pub second: String,
}

impl std::fmt::Display for PortCollision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "host port {} is published by both '{}' and '{}'",
            self.host_port, self.first, self.second
        )
    }
}

/// Folds translated services into a manifest.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    manifest: Manifest,
    published: BTreeMap<String, String>,
    collisions: Vec<PortCollision>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group of services sharing one network named after `group`.
    /// An empty group adds nothing, not even its network.
    pub fn add_group(&mut self, group: &str, services: Vec<Service>) -> Result<()> {
        if services.is_empty() {
            return Ok(());
        }

        for service in services {
            self.add_service(service)?;
        }
        self.manifest
            .networks
            .insert(group.to_string(), Network::for_group(group));
        Ok(())
    }

    fn add_service(&mut self, service: Service) -> Result<()> {
        let key = service.container_name.clone();
        if self.manifest.services.contains_key(&key) {
            return Err(ComposeError::DuplicateName { name: key });
        }

        for binding in &service.ports {
            let host_port = host_port_key(binding);
            match self.published.get(&host_port) {
                Some(owner) => self.collisions.push(PortCollision {
                    host_port,
                    first: owner.clone(),
                    second: key.clone(),
                }),
                None => {
                    self.published.insert(host_port, key.clone());
                }
            }
        }

        debug!(service = %key, ports = ?service.ports, "Added service");
        self.manifest.services.insert(key, service);
        Ok(())
    }

    pub fn collisions(&self) -> &[PortCollision] {
        &self.collisions
    }

    /// Finish the manifest. Host-port collisions fail the build when
    /// `strict_ports` is set and are logged otherwise.
    pub fn build(self, strict_ports: bool) -> Result<Manifest> {
        if let Some(first) = self.collisions.first() {
            if strict_ports {
                return Err(ComposeError::Config(first.to_string()));
            }
            for collision in &self.collisions {
                warn!("{collision}");
            }
        }
        Ok(self.manifest)
    }
}

/// `"9000:9000/udp"` -> `"9000/udp"`, `"1080:1080"` -> `"1080/tcp"`
fn host_port_key(binding: &str) -> String {
    let (mapping, proto) = binding.split_once('/').unwrap_or((binding, "tcp"));
    let host = mapping.split_once(':').map_or(mapping, |(host, _)| host);
    format!("{host}/{proto}")
}

/// Batch path: every server on the server network, every client on the
/// client network.
pub fn fleet_manifest(fleet: &FleetConfig, settings: &GeneratorSettings) -> Result<Manifest> {
    let image = if fleet.image.trim().is_empty() {
        settings.image.as_str()
    } else {
        fleet.image.as_str()
    };

    let server_ctx = TranslateContext {
        image,
        network: SERVER_GROUP,
        naming: ClientNaming::Bare,
        backup_ports: settings.backup_ports,
    };
    let servers = fleet
        .servers
        .iter()
        .map(|server| server_service(server, &server_ctx))
        .collect::<Result<Vec<_>>>()?;

    let client_ctx = TranslateContext {
        network: CLIENT_GROUP,
        ..server_ctx
    };
    let mut clients = Vec::new();
    for client in &fleet.clients {
        clients.extend(client_services(client, &client_ctx)?);
    }

    let server_count = servers.len();
    let client_count = clients.len();

    let mut builder = ManifestBuilder::new();
    builder.add_group(SERVER_GROUP, servers)?;
    builder.add_group(CLIENT_GROUP, clients)?;
    let manifest = builder.build(settings.strict_ports)?;

    info!(
        servers = server_count,
        clients = client_count,
        networks = manifest.networks.len(),
        "Generated fleet manifest"
    );
    Ok(manifest)
}

/// Per-node path for one server; the network is named after the node.
pub fn server_manifest(node: &ServerNode, settings: &GeneratorSettings) -> Result<Manifest> {
    let ctx = TranslateContext {
        image: &settings.image,
        network: &node.name,
        naming: ClientNaming::Bare,
        backup_ports: settings.backup_ports,
    };
    let service = server_service(node, &ctx)?;

    let mut builder = ManifestBuilder::new();
    builder.add_group(&node.name, vec![service])?;
    builder.build(settings.strict_ports)
}

/// Per-node path for one client and its fan-out; the network is named after
/// the node.
pub fn client_manifest(node: &ClientNode, settings: &GeneratorSettings) -> Result<Manifest> {
    let ctx = TranslateContext {
        image: &settings.image,
        network: &node.name,
        naming: ClientNaming::PortSuffixed,
        backup_ports: settings.backup_ports,
    };
    let services = client_services(node, &ctx)?;

    let mut builder = ManifestBuilder::new();
    builder.add_group(&node.name, services)?;
    builder.build(settings.strict_ports)
}
