// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Caste - coarse hardware classification for your terminal
//!
//! Entry point for the caste CLI application.

use clap::Parser;

use caste::cli::{ClassifyArgs, Cli, Commands};
use caste::commands;
use caste::error::Result;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // Practical debug toggle: `-v` surfaces probe diagnostics without
    // requiring users to know target names up front. `RUST_LOG` still
    // takes precedence.
    if cli.verbose > 0 {
        if let Ok(directive) = "caste=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        None => commands::classify::execute(&ClassifyArgs::default(), &cli.format),
        Some(Commands::Classify(args)) => commands::classify::execute(&args, &cli.format),
        Some(Commands::Facts) => commands::facts::execute(&cli.format),
    }
}
