// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for Caste.

use clap::{Parser, Subcommand, ValueEnum};

/// Caste - coarse hardware classification for your machine
#[derive(Parser, Debug)]
#[command(name = "caste")]
#[command(version, about = "Prints a single-word hardware class for this machine")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify this machine (default when no command given)
    Classify(ClassifyArgs),

    /// Show the raw hardware facts feeding the classifier
    #[command(alias = "hw")]
    Facts,
}

/// Arguments for the classify subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ClassifyArgs {
    /// Include a short explanation of which rules fired
    #[arg(short, long)]
    pub reason: bool,
}

/// Output format for responses
#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
