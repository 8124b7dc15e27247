// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Node-to-service translation
//!
//! The launch strings below are a compatibility contract with the
//! `mritd/shadowsocks` image entrypoint: flag names, fixed internal ports and
//! cipher/tunnel modes must stay exactly as they are.

use ssc_domain_types::{ClientNode, RemoteEndpoint, ServerNode};
use std::collections::BTreeMap;

use crate::manifest::{RESTART_ALWAYS, Service};
use crate::settings::{ClientNaming, TranslateContext};
use crate::{ComposeError, Result};

/// Port the proxy server listens on inside its container
const SERVER_CONTAINER_PORT: u16 = 9000;
/// Port the local SOCKS proxy listens on inside its container
const CLIENT_CONTAINER_PORT: u16 = 1080;
/// Loopback port of the client-side KCP tunnel
const KCP_TUNNEL_PORT: u16 = 2080;
const LOOPBACK: &str = "127.0.0.1";
const CIPHER: &str = "aes-256-cfb";
const KCP_MODE: &str = "fast2";
const KCP_CRYPT: &str = "aes";

/// Translate one server into its service.
pub fn server_service(node: &ServerNode, ctx: &TranslateContext<'_>) -> Result<Service> {
    require_name("server", &node.name)?;
    require("server", "key", &node.name, &node.key)?;

    let mut host_ports = vec![parse_port(&node.name, "port", &node.port)?];
    if ctx.backup_ports {
        for backup in &node.backup_ports {
            host_ports.push(parse_port(&node.name, "backup port", backup)?);
        }
    }

    let ports = host_ports
        .iter()
        .flat_map(|port| {
            [
                format!("{port}:{SERVER_CONTAINER_PORT}"),
                format!("{port}:{SERVER_CONTAINER_PORT}/udp"),
            ]
        })
        .collect();

    Ok(Service {
        image: ctx.image.to_string(),
        container_name: node.name.clone(),
        ports,
        environment: BTreeMap::new(),
        command: Some(server_command(&node.key)),
        restart: RESTART_ALWAYS.to_string(),
        networks: vec![ctx.network.to_string()],
    })
}

/// Translate one client into its primary service followed by one service per
/// endpoint port.
pub fn client_services(node: &ClientNode, ctx: &TranslateContext<'_>) -> Result<Vec<Service>> {
    require_name("client", &node.name)?;
    require("client", "key", &node.name, &node.key)?;
    require("client", "remote_ip", &node.name, &node.remote_ip)?;
    let remote_port = parse_port(&node.name, "remote_port", &node.remote_port)?;
    let local_port = parse_port(&node.name, "port", &node.port)?;

    let container_name = match ctx.naming {
        ClientNaming::Bare => node.name.clone(),
        ClientNaming::PortSuffixed => format!("{}-{}", node.name, local_port),
    };

    let mut services = vec![client_service(
        ClientRoute {
            container_name,
            local_port,
            remote_host: &node.remote_ip,
            remote_port,
            obfuscate: node.kcp,
            key: &node.key,
        },
        ctx,
    )];

    let mut next_local = local_port.checked_add(1);
    for endpoint in &node.endpoints {
        let routes = endpoint_routes(node, endpoint, next_local)?;
        next_local = routes.last().and_then(|route| route.local_port.checked_add(1));
        services.extend(routes.into_iter().map(|route| client_service(route, ctx)));
    }

    Ok(services)
}

/// One local port bound to one remote endpoint
struct ClientRoute<'a> {
    container_name: String,
    local_port: u16,
    remote_host: &'a str,
    remote_port: u16,
    obfuscate: bool,
    key: &'a str,
}

fn endpoint_routes<'a>(
    node: &'a ClientNode,
    endpoint: &'a RemoteEndpoint,
    next_local: Option<u16>,
) -> Result<Vec<ClientRoute<'a>>> {
    let owner = format!("{}/{}", node.name, endpoint.provider);
    require("endpoint", "provider", &node.name, &endpoint.provider)?;
    require("endpoint", "host", &owner, &endpoint.host)?;
    if endpoint.ports.is_empty() {
        return Err(ComposeError::config(format!(
            "endpoint '{owner}' is missing 'ports'"
        )));
    }

    let first_local = match &endpoint.local_port_base {
        Some(base) => parse_port(&owner, "local_port_base", base)?,
        None => next_local.ok_or_else(|| local_port_overflow(&owner))?,
    };

    endpoint
        .ports
        .iter()
        .enumerate()
        .map(|(offset, remote)| -> Result<ClientRoute<'a>> {
            let remote_port = parse_port(&owner, "port", remote)?;
            let local_port = u16::try_from(offset)
                .ok()
                .and_then(|offset| first_local.checked_add(offset))
                .ok_or_else(|| local_port_overflow(&owner))?;
            Ok(ClientRoute {
                container_name: format!("{}-{}-{}", node.name, endpoint.provider, local_port),
                local_port,
                remote_host: &endpoint.host,
                remote_port,
                obfuscate: endpoint.obfuscate,
                key: &node.key,
            })
        })
        .collect()
}

fn client_service(route: ClientRoute<'_>, ctx: &TranslateContext<'_>) -> Service {
    let mut environment = BTreeMap::new();
    environment.insert("SS_MODULE".to_string(), "ss-local".to_string());

    if route.obfuscate {
        // ss-local talks to the local tunnel; only the tunnel knows the real remote.
        environment.insert(
            "SS_CONFIG".to_string(),
            ss_local_config(LOOPBACK, KCP_TUNNEL_PORT, route.key),
        );
        environment.insert("KCP_FLAG".to_string(), "true".to_string());
        environment.insert("KCP_MODULE".to_string(), "kcpclient".to_string());
        environment.insert(
            "KCP_CONFIG".to_string(),
            kcp_client_config(route.remote_host, route.remote_port, route.key),
        );
    } else {
        environment.insert(
            "SS_CONFIG".to_string(),
            ss_local_config(route.remote_host, route.remote_port, route.key),
        );
    }

    Service {
        image: ctx.image.to_string(),
        container_name: route.container_name,
        ports: vec![format!("{}:{CLIENT_CONTAINER_PORT}", route.local_port)],
        environment,
        command: None,
        restart: RESTART_ALWAYS.to_string(),
        networks: vec![ctx.network.to_string()],
    }
}

fn server_command(key: &str) -> String {
    format!(
        r#"-m "ss-server" -s "-s 0.0.0.0 -p {SERVER_CONTAINER_PORT} -m {CIPHER} -k {key} --fast-open" -x -e "kcpserver" -k "-t {LOOPBACK}:{SERVER_CONTAINER_PORT} -l :{SERVER_CONTAINER_PORT} --mode {KCP_MODE} --key {key} --crypt {KCP_CRYPT}""#
    )
}

fn ss_local_config(host: &str, port: u16, key: &str) -> String {
    format!("-s {host} -p {port} -b 0.0.0.0 -l {CLIENT_CONTAINER_PORT} -m {CIPHER} -k {key}")
}

fn kcp_client_config(host: &str, port: u16, key: &str) -> String {
    format!("-r {host}:{port} -l :{KCP_TUNNEL_PORT} --mode {KCP_MODE} --key {key} --crypt {KCP_CRYPT}")
}

fn require_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ComposeError::config(format!("{kind} entry is missing 'name'")));
    }
    Ok(())
}

fn require(kind: &str, field: &str, owner: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ComposeError::config(format!(
            "{kind} '{owner}' is missing '{field}'"
        )));
    }
    Ok(())
}

/// Parse a host or remote port, rejecting anything outside 1..=65535.
pub(crate) fn parse_port(owner: &str, field: &str, value: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ if value.trim().is_empty() => Err(ComposeError::config(format!(
            "'{owner}' is missing '{field}'"
        ))),
        _ => Err(ComposeError::config(format!(
            "'{owner}' has invalid {field} '{value}'"
        ))),
    }
}

fn local_port_overflow(owner: &str) -> ComposeError {
    ComposeError::config(format!("'{owner}' runs out of local ports above 65535"))
}
