// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use ssc_cli::{Cli, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.clone().init("ssc")?;
    cli.command.run()
}
