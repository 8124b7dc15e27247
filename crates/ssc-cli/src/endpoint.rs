// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `--endpoint` values
//!
//! Format: `provider=NAME,host=HOST,ports=P1+P2[,obfuscate=BOOL][,base=PORT]`.
//! Ports are joined with `+` so the value survives the `;`-separated
//! `SSC_ENDPOINTS` variable and `,`-separated fields.

use ssc_domain_types::RemoteEndpoint;

pub fn parse_endpoint(value: &str) -> Result<RemoteEndpoint, String> {
    let mut endpoint = RemoteEndpoint::default();

    for field in value.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let (key, val) = field
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{field}'"))?;
        let val = val.trim();
        match key.trim() {
            "provider" => endpoint.provider = val.to_string(),
            "host" => endpoint.host = val.to_string(),
            "ports" => {
                endpoint.ports = val
                    .split('+')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "obfuscate" | "kcp" => endpoint.obfuscate = parse_bool(val)?,
            "base" | "local_port_base" => endpoint.local_port_base = Some(val.to_string()),
            other => return Err(format!("unknown endpoint field '{other}'")),
        }
    }

    for (name, missing) in [
        ("provider", endpoint.provider.is_empty()),
        ("host", endpoint.host.is_empty()),
        ("ports", endpoint.ports.is_empty()),
    ] {
        if missing {
            return Err(format!("endpoint is missing '{name}'"));
        }
    }

    Ok(endpoint)
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("expected a boolean, got '{value}'")),
    }
}
