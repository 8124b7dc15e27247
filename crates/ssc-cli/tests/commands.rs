// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Runs the `ssc` binary against temporary directories.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// `ssc` running in `dir` with no `SSC_*` variables inherited from the caller.
fn ssc(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("ssc");
    cmd.current_dir(dir.path())
        .env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default());
    cmd
}

fn read_yaml(path: &std::path::Path) -> serde_yaml::Value {
    serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn init_then_generate() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    ssc(&dir).arg("init").assert().success();
    assert!(dir.path().join("shadowsocks.yml").exists());

    ssc(&dir).arg("generate").assert().success();
    let doc = read_yaml(&dir.path().join("docker-compose.yml"));
    assert_eq!(doc["services"].as_mapping().unwrap().len(), 6);
    assert_eq!(doc["networks"].as_mapping().unwrap().len(), 2);
    Ok(())
}

#[test]
fn init_refuses_to_overwrite_without_force() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("shadowsocks.yml"), "image: mine\n")?;

    ssc(&dir).arg("init").assert().failure();
    assert_eq!(fs::read_to_string(dir.path().join("shadowsocks.yml"))?, "image: mine\n");

    ssc(&dir).args(["init", "--force"]).assert().success();
    assert!(fs::read_to_string(dir.path().join("shadowsocks.yml"))?.contains("server-0"));
    Ok(())
}

#[test]
fn generate_print_is_stable_and_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    ssc(&dir).arg("init").assert().success();

    let first = ssc(&dir)
        .args(["generate", "--print"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let second = ssc(&dir)
        .args(["generate", "--print"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(first, second);
    assert!(!dir.path().join("docker-compose.yml").exists());

    let doc: serde_yaml::Value = serde_yaml::from_slice(&first)?;
    assert_eq!(doc["version"].as_str(), Some("3.5"));
    Ok(())
}

#[test]
fn generate_strict_ports_fails_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    ssc(&dir).arg("init").assert().success();

    // The sample servers all publish port 9000.
    ssc(&dir)
        .args(["generate", "--strict-ports"])
        .assert()
        .failure();
    assert!(!dir.path().join("docker-compose.yml").exists());
    Ok(())
}

#[test]
fn generate_reports_missing_fleet_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let output = ssc(&dir)
        .arg("generate")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&output).contains("shadowsocks.yml"));
    Ok(())
}

#[test]
fn generate_empty_fleet_warns_and_writes_empty_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("shadowsocks.yml"), "image: mine\n")?;

    let stderr = ssc(&dir)
        .arg("generate")
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&stderr).contains("Fleet defines no servers or clients"));

    let doc = read_yaml(&dir.path().join("docker-compose.yml"));
    assert!(doc["services"].as_mapping().unwrap().is_empty());
    assert!(doc["networks"].as_mapping().unwrap().is_empty());
    Ok(())
}

#[test]
fn generate_rejects_client_without_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("shadowsocks.yml"),
        r#"
image: mritd/shadowsocks:3.3.4-20200409
clients:
  - name: laptop
    port: 1080
    remote_ip: 1.2.3.4
    remote_port: 9000
    key: ""
"#,
    )?;
    ssc(&dir).arg("generate").assert().failure();
    assert!(!dir.path().join("docker-compose.yml").exists());
    Ok(())
}

#[test]
fn server_config_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    ssc(&dir)
        .args(["server", "config"])
        .env("SSC_SERVER_NAME", "tokyo")
        .env("SSC_SERVER_PORT", "9443")
        .env("SSC_SERVER_BACKUP_PORTS", "2047,3047")
        .env("SSC_KEY", "s3cr3t")
        .env("SSC_WORKDIR", "tokyo")
        .assert()
        .success();

    let doc = read_yaml(&dir.path().join("tokyo").join("docker-compose.yml"));
    let service = &doc["services"]["tokyo"];
    assert_eq!(service["ports"].as_sequence().unwrap().len(), 6);
    assert_eq!(service["networks"][0].as_str(), Some("tokyo"));
    assert_eq!(
        service["command"].as_str().unwrap().matches("s3cr3t").count(),
        2
    );
    assert_eq!(doc["networks"]["tokyo"]["name"].as_str(), Some("tokyo-network"));
    Ok(())
}

#[test]
fn server_config_without_key_fails_fast() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    ssc(&dir).args(["server", "config"]).assert().failure();
    assert!(!dir.path().join("docker-compose.yml").exists());
    Ok(())
}

#[test]
fn client_config_fans_out_endpoints() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    ssc(&dir)
        .args([
            "client",
            "config",
            "--name",
            "home",
            "--remote-ip",
            "1.2.3.4",
            "--key",
            "k",
            "--kcp",
        ])
        .env(
            "SSC_ENDPOINTS",
            "provider=qingcloud,host=5.6.7.8,ports=9000;provider=linode,host=9.9.9.9,ports=2047+3047,obfuscate=true",
        )
        .assert()
        .success();

    let doc = read_yaml(&dir.path().join("docker-compose.yml"));
    let services = doc["services"].as_mapping().unwrap();
    let names: Vec<_> = services.keys().filter_map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "home-1080",
            "home-linode-1082",
            "home-linode-1083",
            "home-qingcloud-1081",
        ]
    );
    assert!(doc["services"]["home-qingcloud-1081"]["environment"]
        .get("KCP_CONFIG")
        .is_none());
    assert_eq!(
        doc["services"]["home-linode-1083"]["environment"]["KCP_CONFIG"].as_str(),
        Some("-r 9.9.9.9:3047 -l :2080 --mode fast2 --key k --crypt aes")
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn start_and_stop_invoke_compose() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new()?;
    let fake = dir.path().join("fake-compose");
    fs::write(&fake, "#!/bin/sh\necho \"compose $@\"\n")?;
    fs::set_permissions(&fake, fs::Permissions::from_mode(0o755))?;

    let out = ssc(&dir)
        .args(["server", "start", "--compose-bin"])
        .arg(&fake)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(out)?.trim(), "compose -f docker-compose.yml up -d");

    let out = ssc(&dir)
        .args(["client", "stop"])
        .env("SSC_COMPOSE_BIN", &fake)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(out)?.trim(), "compose -f docker-compose.yml down");
    Ok(())
}

#[cfg(unix)]
#[test]
fn failing_compose_surfaces_its_output() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new()?;
    let fake = dir.path().join("fake-compose");
    fs::write(&fake, "#!/bin/sh\necho 'network not found' >&2\nexit 1\n")?;
    fs::set_permissions(&fake, fs::Permissions::from_mode(0o755))?;

    let err = ssc(&dir)
        .args(["server", "stop"])
        .env("SSC_COMPOSE_BIN", &fake)
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let err = String::from_utf8_lossy(&err);
    assert!(err.contains("stop services from ./docker-compose.yml"));
    assert!(err.contains("network not found"));
    Ok(())
}
