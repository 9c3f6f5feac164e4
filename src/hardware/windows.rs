// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Windows hardware probe
//!
//! Adapters and core counts come from `wmic` CSV output; NVIDIA VRAM from
//! `nvidia-smi` where the driver is installed, since `AdapterRAM` is a
//! 32-bit field that truncates modern cards.

use std::process::Command;

use tracing::debug;

use super::facts::{GpuMemoryModel, HardwareFacts};
use super::gpu::{self, GpuCandidate};
use super::nvidia;

pub(crate) fn collect(facts: &mut HardwareFacts) {
    if let Some(output) = run_wmic(&["cpu", "get", "NumberOfCores", "/format:csv"]) {
        facts.physical_cores = parse_core_counts(&output);
    }

    let mut gpus = match run_wmic(&[
        "path",
        "win32_VideoController",
        "get",
        "AdapterRAM,Name,PNPDeviceID",
        "/format:csv",
    ]) {
        Some(output) => parse_video_controllers(&output),
        None => Vec::new(),
    };

    if gpus.iter().any(|g| g.vendor_id == gpu::VENDOR_NVIDIA) {
        if let Some(vram) = nvidia::query_vram_bytes() {
            for g in gpus.iter_mut().filter(|g| g.vendor_id == gpu::VENDOR_NVIDIA) {
                g.vram_bytes = g.vram_bytes.max(vram);
                g.is_discrete_hint = true;
            }
        }
    }

    match gpu::pick_best_gpu(&gpus) {
        Some(best) => gpu::apply_candidate(facts, &best),
        None => {
            debug!("no video controllers reported by wmic");
            facts.gpu_memory_model = GpuMemoryModel::None;
        }
    }
}

fn run_wmic(args: &[&str]) -> Option<String> {
    let output = Command::new("wmic").args(args).output().ok()?;
    if !output.status.success() {
        debug!("wmic query failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Sum `NumberOfCores` across sockets from `/format:csv` output.
fn parse_core_counts(csv: &str) -> i32 {
    let mut lines = csv.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return 0;
    };
    let Some(idx) = header
        .split(',')
        .position(|c| c.eq_ignore_ascii_case("NumberOfCores"))
    else {
        return 0;
    };

    lines
        .filter_map(|line| line.split(',').nth(idx)?.trim().parse::<i32>().ok())
        .sum()
}

/// Extract the hex id following a PNP segment marker such as "VEN_" or "DEV_".
fn parse_pnp_id(pnp: &str, marker: &str) -> Option<u32> {
    let start = pnp.find(marker)? + marker.len();
    let hex: String = pnp[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    u32::from_str_radix(&hex, 16).ok()
}

fn parse_video_controllers(csv: &str) -> Vec<GpuCandidate> {
    let mut lines = csv.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };

    let columns: Vec<&str> = header.split(',').collect();
    let index_of = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));
    let (Some(ram_idx), Some(name_idx), Some(pnp_idx)) = (
        index_of("AdapterRAM"),
        index_of("Name"),
        index_of("PNPDeviceID"),
    ) else {
        return Vec::new();
    };

    lines
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            let name = fields.get(name_idx)?.to_lowercase();

            let mut g = GpuCandidate::default();
            gpu::apply_name_hints(&mut g, &name);

            if let Some(pnp) = fields.get(pnp_idx) {
                if let Some(vendor_id) = parse_pnp_id(pnp, "VEN_") {
                    g.vendor_id = vendor_id;
                    g.device_id = parse_pnp_id(pnp, "DEV_").unwrap_or(0);
                    match vendor_id {
                        gpu::VENDOR_NVIDIA | gpu::VENDOR_AMD => g.is_discrete_hint = true,
                        gpu::VENDOR_INTEL => {
                            g.is_discrete_hint = false;
                            if gpu::intel_arc_device_heuristic(g.device_id) {
                                g.is_intel_arc_hint = true;
                            }
                        }
                        _ => {}
                    }
                }
            }

            if let Some(ram) = fields.get(ram_idx).and_then(|v| v.trim().parse::<u64>().ok()) {
                g.vram_bytes = g.vram_bytes.max(ram);
            }

            // Unknown vendor with dedicated memory is probably discrete.
            if !matches!(
                g.vendor_id,
                gpu::VENDOR_NVIDIA | gpu::VENDOR_AMD | gpu::VENDOR_INTEL
            ) && g.vram_bytes > 0
                && !g.is_virtual_hint
            {
                g.is_discrete_hint = true;
            }

            Some(g)
        })
        .collect()
}
