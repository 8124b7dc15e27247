// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Domain types for the ss-compose tool suite
//!
//! These types describe a proxy fleet the way a user writes it down:
//! servers, clients, and the extra remote endpoints a client may fan out to.
//! They carry no generation logic and are shared by the batch and per-node
//! generators.

pub mod fleet;
pub mod node;
mod port;

// Re-export commonly used types
pub use fleet::*;
pub use node::*;
