// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! macOS hardware probe
//!
//! Apple Silicon is recognized from the process architecture and short-
//! circuits to unified memory. Intel Macs fall back to `system_profiler`
//! display enumeration for a best-effort discrete/integrated split.

use std::process::Command;

use tracing::debug;

use super::facts::{GpuMemoryModel, HardwareFacts};
use super::gpu::{self, GpuCandidate};

pub(crate) fn collect(facts: &mut HardwareFacts) {
    if let Some(cores) = sysctl_i32("hw.physicalcpu") {
        facts.physical_cores = cores;
    }
    if facts.logical_threads <= 0 {
        if let Some(threads) = sysctl_i32("hw.logicalcpu") {
            facts.logical_threads = threads;
        }
    }

    if std::env::consts::ARCH == "aarch64" {
        facts.is_apple_silicon = true;
        facts.gpu_memory_model = GpuMemoryModel::Unified;
        facts.has_discrete_gpu = false;
        return;
    }

    // Intel Macs: enumerate displays.
    let Some(json) = run_system_profiler() else {
        facts.gpu_memory_model = GpuMemoryModel::None;
        return;
    };

    let gpus = parse_display_profile(&json);
    match gpu::pick_best_gpu(&gpus) {
        Some(best) => gpu::apply_candidate(facts, &best),
        None => facts.gpu_memory_model = GpuMemoryModel::None,
    }
}

fn sysctl_i32(name: &str) -> Option<i32> {
    let output = Command::new("sysctl").args(["-n", name]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .ok()
        .filter(|v| *v > 0)
}

fn run_system_profiler() -> Option<String> {
    let output = Command::new("system_profiler")
        .args(["SPDisplaysDataType", "-json"])
        .output()
        .ok()?;
    if !output.status.success() {
        debug!("system_profiler display query failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `system_profiler SPDisplaysDataType -json` output into candidates.
fn parse_display_profile(json: &str) -> Vec<GpuCandidate> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        return Vec::new();
    };
    let Some(displays) = value.get("SPDisplaysDataType").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    displays
        .iter()
        .filter_map(|entry| {
            let name = entry
                .get("sppci_model")
                .or_else(|| entry.get("_name"))?
                .as_str()?
                .to_lowercase();

            let mut g = GpuCandidate::default();
            gpu::apply_name_hints(&mut g, &name);

            let vendor = entry
                .get("spdisplays_vendor")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_lowercase();
            if vendor.contains("nvidia") || name.contains("nvidia") {
                g.vendor_id = gpu::VENDOR_NVIDIA;
                g.is_discrete_hint = true;
            } else if vendor.contains("amd") || vendor.contains("ati") {
                g.vendor_id = gpu::VENDOR_AMD;
                g.is_discrete_hint = true;
            } else if vendor.contains("intel") {
                g.vendor_id = gpu::VENDOR_INTEL;
            }

            if let Some(vram) = entry
                .get("spdisplays_vram")
                .or_else(|| entry.get("spdisplays_vram_shared"))
                .and_then(|v| v.as_str())
            {
                g.vram_bytes = parse_vram_size(vram).unwrap_or(0);
            }

            Some(g)
        })
        .collect()
}

/// Sizes are reported as "8 GB" or "1536 MB".
fn parse_vram_size(raw: &str) -> Option<u64> {
    let mut parts = raw.split_whitespace();
    let value: u64 = parts.next()?.parse().ok()?;
    match parts.next()? {
        "GB" => Some(value * 1024 * 1024 * 1024),
        "MB" => Some(value * 1024 * 1024),
        _ => None,
    }
}
