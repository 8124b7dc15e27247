// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Lenient port parsing for hand-edited fleet files.
//!
//! Ports are kept as strings, but users routinely write `port: 9000`
//! without quotes. Both spellings are accepted.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Text(String),
    Number(u64),
}

impl From<RawPort> for String {
    fn from(raw: RawPort) -> Self {
        match raw {
            RawPort::Text(text) => text,
            RawPort::Number(number) => number.to_string(),
        }
    }
}

pub(crate) fn port_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawPort::deserialize(deserializer).map(String::from)
}

pub(crate) fn port_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawPort>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(String::from).collect())
}

pub(crate) fn optional_port<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPort>::deserialize(deserializer)?;
    Ok(raw.map(String::from))
}
