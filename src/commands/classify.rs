// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Classification command

use serde::Serialize;

use crate::cli::args::{ClassifyArgs, OutputFormat};
use crate::error::Result;
use crate::hardware;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyReport {
    caste: &'static str,
    reason: String,
}

/// Execute the classify command
pub fn execute(args: &ClassifyArgs, format: &OutputFormat) -> Result<()> {
    let result = hardware::detect_caste();

    if matches!(format, OutputFormat::Json) {
        let report = ClassifyReport {
            caste: result.caste.name(),
            reason: result.reason,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.reason {
        println!("{}: {}", result.caste, result.reason);
    } else {
        println!("{}", result.caste);
    }

    Ok(())
}
