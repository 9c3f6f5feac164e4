// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! NVIDIA VRAM query via `nvidia-smi`
//!
//! The driver ships the tool on both Linux and Windows, which makes it the
//! most portable VRAM source for NVIDIA adapters.

use std::process::Command;

use tracing::debug;

/// Total VRAM of the largest NVIDIA adapter, in bytes.
pub(crate) fn query_vram_bytes() -> Option<u64> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=memory.total", "--format=csv,noheader,nounits"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("nvidia-smi is present but the memory query failed");
        return None;
    }

    parse_memory_total(&String::from_utf8_lossy(&output.stdout))
}

/// `nvidia-smi` reports MiB, one line per GPU; keep the largest.
fn parse_memory_total(output: &str) -> Option<u64> {
    output
        .lines()
        .filter_map(|line| line.trim().parse::<u64>().ok())
        .map(|mib| mib * 1024 * 1024)
        .max()
}
