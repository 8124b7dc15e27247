// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end properties of the batch and per-node generators.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ssc_compose::{
    CLIENT_GROUP, GeneratorSettings, SERVER_GROUP, client_manifest, fleet_manifest, load_fleet,
    server_manifest, write_manifest, write_sample_fleet,
};
use ssc_domain_types::{ClientNode, FleetConfig, ServerNode};

fn fleet_of(servers: usize, clients: usize) -> FleetConfig {
    FleetConfig {
        image: "mritd/shadowsocks:test".to_string(),
        servers: (0..servers)
            .map(|i| ServerNode {
                name: format!("server-{i}"),
                port: (20000 + i).to_string(),
                backup_ports: Vec::new(),
                key: "k".to_string(),
            })
            .collect(),
        clients: (0..clients)
            .map(|i| ClientNode {
                name: format!("client-{i}"),
                port: (30000 + i).to_string(),
                kcp: i % 2 == 0,
                remote_ip: "1.2.3.4".to_string(),
                remote_port: "9000".to_string(),
                key: "k".to_string(),
                endpoints: Vec::new(),
            })
            .collect(),
    }
}

proptest! {
    /// One service per node and one network per non-empty group.
    #[test]
    fn service_and_network_counts(servers in 0usize..8, clients in 0usize..8) {
        let settings = GeneratorSettings { strict_ports: true, ..Default::default() };
        let manifest = fleet_manifest(&fleet_of(servers, clients), &settings).unwrap();

        prop_assert_eq!(manifest.services.len(), servers + clients);
        let expected_networks = usize::from(servers > 0) + usize::from(clients > 0);
        prop_assert_eq!(manifest.networks.len(), expected_networks);
        prop_assert_eq!(manifest.networks.contains_key(SERVER_GROUP), servers > 0);
        prop_assert_eq!(manifest.networks.contains_key(CLIENT_GROUP), clients > 0);
    }

    /// Rendering is deterministic regardless of how many nodes there are.
    #[test]
    fn rendering_is_byte_stable(servers in 0usize..6, clients in 0usize..6) {
        let fleet = fleet_of(servers, clients);
        let settings = GeneratorSettings::default();
        let first = fleet_manifest(&fleet, &settings).unwrap().to_yaml().unwrap();
        let second = fleet_manifest(&fleet, &settings).unwrap().to_yaml().unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn sample_fleet_generates_expected_layout() {
    let manifest = fleet_manifest(&FleetConfig::sample(), &GeneratorSettings::default()).unwrap();
    let yaml = manifest.to_yaml().unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(doc["version"].as_str(), Some("3.5"));
    assert_eq!(
        doc["networks"]["shadowsocks-server"]["name"].as_str(),
        Some("shadowsocks-server-network")
    );
    assert_eq!(
        doc["networks"]["shadowsocks-client"]["driver"].as_str(),
        Some("bridge")
    );

    let server = &doc["services"]["server-0"];
    assert_eq!(server["container_name"].as_str(), Some("server-0"));
    assert_eq!(server["restart"].as_str(), Some("always"));
    assert!(server.get("environment").is_none());

    let plain = &doc["services"]["client-1"];
    assert!(plain.get("command").is_none());
    assert_eq!(
        plain["environment"]["SS_CONFIG"].as_str(),
        Some("-s 127.0.0.1 -p 9000 -b 0.0.0.0 -l 1080 -m aes-256-cfb -k 12345678")
    );
    assert!(plain["environment"].get("KCP_FLAG").is_none());

    let tunnelled = &doc["services"]["client-0"];
    assert_eq!(tunnelled["environment"]["KCP_FLAG"].as_str(), Some("true"));
    assert_eq!(tunnelled["ports"][0].as_str(), Some("1080:1080"));
}

#[test]
fn init_output_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shadowsocks.yml");
    let written = write_sample_fleet(&path).unwrap();
    assert_eq!(load_fleet(&path).unwrap(), written);
}

#[test]
fn written_manifest_matches_rendered_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docker-compose.yml");
    let manifest = fleet_manifest(&FleetConfig::sample(), &GeneratorSettings::default()).unwrap();
    write_manifest(&path, &manifest).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        manifest.to_yaml().unwrap()
    );
}

#[test]
fn server_backup_ports_in_input_order() {
    let node = ServerNode {
        name: "edge".to_string(),
        port: "9000".to_string(),
        backup_ports: vec!["2047".to_string(), "3047".to_string()],
        key: "k".to_string(),
    };
    let settings = GeneratorSettings {
        backup_ports: true,
        ..Default::default()
    };
    let manifest = server_manifest(&node, &settings).unwrap();
    let ports = &manifest.services["edge"].ports;
    assert_eq!(ports.len(), 6);
    assert_eq!(&ports[..2], &["9000:9000", "9000:9000/udp"]);
    assert_eq!(&ports[4..], &["3047:9000", "3047:9000/udp"]);
}

#[test]
fn tunnelled_and_direct_clients_differ_only_in_routing() {
    let mut node = ClientNode {
        name: "home".to_string(),
        port: "1080".to_string(),
        kcp: true,
        remote_ip: "1.2.3.4".to_string(),
        remote_port: "9000".to_string(),
        key: "k".to_string(),
        endpoints: Vec::new(),
    };
    let settings = GeneratorSettings::default();

    let tunnelled = client_manifest(&node, &settings).unwrap();
    let env = &tunnelled.services["home-1080"].environment;
    assert!(env["SS_CONFIG"].contains("-s 127.0.0.1 -p 2080"));
    assert!(env["KCP_CONFIG"].contains("-r 1.2.3.4:9000"));

    node.kcp = false;
    let direct = client_manifest(&node, &settings).unwrap();
    let env = &direct.services["home-1080"].environment;
    assert!(env["SS_CONFIG"].contains("-s 1.2.3.4 -p 9000"));
    assert!(env.keys().all(|key| !key.starts_with("KCP_")));
    assert_eq!(
        tunnelled.services["home-1080"].ports,
        direct.services["home-1080"].ports
    );
}
