// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware facts command

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::hardware::{self, GpuMemoryModel};
use crate::utils::{format_count, format_size};

/// Execute the facts command
pub fn execute(format: &OutputFormat) -> Result<()> {
    let facts = hardware::detect_facts();

    // The serialized field names are part of the tooling surface; emit the
    // record directly rather than reshaping it.
    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&facts)?);
        return Ok(());
    }

    println!("\n=== Hardware Facts ===\n");
    println!("RAM: {}", format_size(facts.ram_bytes));
    println!(
        "CPU: {} cores / {} threads",
        format_count(facts.physical_cores),
        format_count(facts.logical_threads)
    );
    println!("GPU: {:?}", facts.gpu_memory_model);
    if facts.gpu_memory_model == GpuMemoryModel::Discrete {
        println!("VRAM: {}", format_size(facts.vram_bytes));
    }
    if facts.is_apple_silicon {
        println!("Apple Silicon: yes");
    }
    if facts.is_intel_arc_class {
        println!("Intel Arc-class GPU: yes");
    }

    Ok(())
}
