// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Compose manifest model
//!
//! Mappings are `BTreeMap`s so that rendering the same manifest always yields
//! the same bytes. Optional fields holding an empty value are omitted when
//! serialized.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::Result;

/// Compose file format version the generated manifests declare
pub const COMPOSE_VERSION: &str = "3.5";
/// Restart policy applied to every service
pub const RESTART_ALWAYS: &str = "always";
/// Driver applied to every network
pub const BRIDGE_DRIVER: &str = "bridge";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub version: String,
    pub services: BTreeMap<String, Service>,
    pub networks: BTreeMap<String, Network>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: COMPOSE_VERSION.to_string(),
            services: BTreeMap::new(),
            networks: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Render as compose YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub container_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub restart: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub name: String,
    pub driver: String,
}

impl Network {
    /// The network backing a group of services; everything is derived from the
    /// group name.
    pub fn for_group(group: &str) -> Self {
        Self {
            name: format!("{group}-network"),
            driver: BRIDGE_DRIVER.to_string(),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}
