// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Linux hardware probe
//!
//! Kernel interfaces only: `/proc/cpuinfo` for physical cores and
//! `/sys/class/drm` for GPU enumeration, with `nvidia-smi` supplying VRAM
//! where the driver is installed. Works cross-distro.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::facts::{GpuMemoryModel, HardwareFacts};
use super::gpu::{self, GpuCandidate};
use super::nvidia;

pub(crate) fn collect(facts: &mut HardwareFacts) {
    if let Ok(cpuinfo) = fs::read_to_string("/proc/cpuinfo") {
        facts.physical_cores = parse_physical_cores(&cpuinfo);
    }

    let mut gpus = enumerate_drm_gpus(Path::new("/sys/class/drm"));

    // NVIDIA VRAM comes from the driver, not sysfs; attach it to every
    // NVIDIA candidate so the picker can rank them properly.
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
            debug!("no GPU candidates under /sys/class/drm");
            facts.gpu_memory_model = GpuMemoryModel::None;
        }
    }
}

/// Count unique `(physical id, core id)` pairs. Returns 0 when the fields
/// are absent (some ARM and virtualized kernels), letting the classifier
/// fall back to thread counts.
fn parse_physical_cores(cpuinfo: &str) -> i32 {
    let mut pairs: HashSet<(i32, i32)> = HashSet::new();
    let mut cur_phys: Option<i32> = None;
    let mut cur_core: Option<i32> = None;

    // Trailing empty line flushes the last processor record.
    for line in cpuinfo.lines().chain(std::iter::once("")) {
        let line = line.trim();
        if line.is_empty() {
            if let (Some(phys), Some(core)) = (cur_phys.take(), cur_core.take()) {
                pairs.insert((phys, core));
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "physical id" => cur_phys = value.trim().parse().ok(),
            "core id" => cur_core = value.trim().parse().ok(),
            _ => {}
        }
    }

    pairs.len() as i32
}

/// Match "card0", "card1", ... but not connector nodes like "card0-DP-1".
fn is_drm_card_name(name: &str) -> bool {
    name.strip_prefix("card")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse sysfs id files such as "0x10de".
fn parse_hex_id(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    u32::from_str_radix(hex, 16).ok()
}

fn read_hex_id(path: &Path) -> Option<u32> {
    parse_hex_id(&fs::read_to_string(path).ok()?)
}

fn read_u64(path: &Path) -> Option<u64> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn enumerate_drm_gpus(drm: &Path) -> Vec<GpuCandidate> {
    let mut out = Vec::new();
    let Ok(entries) = fs::read_dir(drm) else {
        return out;
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_drm_card_name(&name) {
            continue;
        }

        let device_dir = entry.path().join("device");
        let Some(vendor_id) = read_hex_id(&device_dir.join("vendor")) else {
            continue;
        };
        let device_id = read_hex_id(&device_dir.join("device")).unwrap_or(0);

        let mut g = GpuCandidate {
            vendor_id,
            device_id,
            ..Default::default()
        };

        match vendor_id {
            gpu::VENDOR_NVIDIA => {
                g.is_discrete_hint = true;
            }
            gpu::VENDOR_AMD => {
                // Discrete amdgpu exposes a VRAM total; APUs generally don't.
                if let Some(vram) = read_u64(&device_dir.join("mem_info_vram_total")) {
                    if vram > 0 {
                        g.vram_bytes = vram;
                        g.is_discrete_hint = true;
                    }
                }
            }
            gpu::VENDOR_INTEL => {
                g.is_intel_arc_hint = gpu::intel_arc_device_heuristic(device_id);
            }
            _ => {}
        }

        out.push(g);
    }

    out
}
