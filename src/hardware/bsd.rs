// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! BSD hardware probes
//!
//! RAM and CPU counts come from `sysctl -n`. GPU discovery differs per
//! flavor: `pciconf -lv` on FreeBSD/DragonFly, `pcictl pci0 list` on
//! NetBSD, and `dmesg` VGA lines on OpenBSD. All of it funnels through the
//! shared name-hint tables.

use std::process::Command;

use tracing::debug;

use super::facts::{GpuMemoryModel, HardwareFacts};
use super::gpu::{self, GpuCandidate};

pub(crate) fn collect(facts: &mut HardwareFacts) {
    if let Some(ram) = sysctl_u64("hw.physmem64").or_else(|| sysctl_u64("hw.physmem")) {
        if ram > 0 {
            facts.ram_bytes = ram;
        }
    }
    if let Some(ncpu) = sysctl_i32("hw.ncpu") {
        facts.logical_threads = ncpu;
    }

    #[cfg(target_os = "freebsd")]
    if let Some(cores) = sysctl_i32("kern.smp.cores") {
        facts.physical_cores = cores;
        if let Some(threads_per_core) = sysctl_i32("kern.smp.threads_per_core") {
            facts.logical_threads = facts.logical_threads.max(cores * threads_per_core);
        }
    }

    let gpus = enumerate_gpus();
    match gpu::pick_best_gpu(&gpus) {
        Some(best) => gpu::apply_candidate(facts, &best),
        None => {
            debug!("no GPU candidates from the platform PCI listing");
            facts.gpu_memory_model = GpuMemoryModel::None;
        }
    }
}

#[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
fn enumerate_gpus() -> Vec<GpuCandidate> {
    run_command("pciconf", &["-lv"])
        .map(|out| parse_pciconf_gpus(&out))
        .unwrap_or_default()
}

#[cfg(target_os = "netbsd")]
fn enumerate_gpus() -> Vec<GpuCandidate> {
    run_command("pcictl", &["pci0", "list"])
        .map(|out| parse_pcictl_gpus(&out))
        .unwrap_or_default()
}

#[cfg(target_os = "openbsd")]
fn enumerate_gpus() -> Vec<GpuCandidate> {
    run_command("dmesg", &[])
        .map(|out| parse_dmesg_gpus(&out))
        .unwrap_or_default()
}

#[cfg(not(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
fn enumerate_gpus() -> Vec<GpuCandidate> {
    Vec::new()
}

fn run_command(cmd: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(cmd).args(args).output().ok()?;
    if !output.status.success() {
        debug!(cmd, "probe command failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn sysctl_u64(name: &str) -> Option<u64> {
    run_command("sysctl", &["-n", name])?.trim().parse().ok()
}

fn sysctl_i32(name: &str) -> Option<i32> {
    run_command("sysctl", &["-n", name])?
        .trim()
        .parse()
        .ok()
        .filter(|v| *v > 0)
}

/// Extract a hex value following `marker` on a pciconf header line,
/// e.g. `class=0x030000`.
#[cfg(any(target_os = "freebsd", target_os = "dragonfly", test))]
fn header_hex_field(line: &str, marker: &str) -> Option<u32> {
    let start = line.find(marker)? + marker.len();
    let raw = line[start..].split_whitespace().next()?;
    let hex = raw.strip_prefix("0x").unwrap_or(raw);
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", test))]
fn candidate_from_names(
    vendor_id: u32,
    device_id: u32,
    vendor_lower: &str,
    device_lower: &str,
) -> GpuCandidate {
    let mut g = GpuCandidate {
        vendor_id,
        device_id,
        ..Default::default()
    };
    gpu::apply_vendor_device_hints(&mut g, vendor_lower, device_lower);
    if vendor_id == gpu::VENDOR_NVIDIA || vendor_id == gpu::VENDOR_AMD {
        g.is_discrete_hint = true;
    }
    if vendor_id == gpu::VENDOR_INTEL && gpu::intel_arc_device_heuristic(device_id) {
        g.is_intel_arc_hint = true;
    }
    g
}

/// Parse `pciconf -lv` records, keeping display-class devices.
///
/// ```text
/// vgapci0@pci0:0:2:0:  class=0x030000 ... vendor=0x8086 device=0x0412 ...
///     vendor     = 'Intel Corporation'
///     device     = 'Xeon E3-1200 v3 Integrated Graphics Controller'
/// ```
#[cfg(any(target_os = "freebsd", target_os = "dragonfly", test))]
fn parse_pciconf_gpus(output: &str) -> Vec<GpuCandidate> {
    let mut gpus = Vec::new();

    let mut is_gpu = false;
    let mut vendor_id = 0u32;
    let mut device_id = 0u32;
    let mut vendor_name = String::new();
    let mut device_name = String::new();

    for line in output.lines().chain(std::iter::once("")) {
        let starts_record = !line.starts_with(&[' ', '\t'][..]) || line.trim().is_empty();
        if starts_record {
            if is_gpu {
                gpus.push(candidate_from_names(
                    vendor_id,
                    device_id,
                    &vendor_name,
                    &device_name,
                ));
            }
            let header = line.trim();
            is_gpu = header_hex_field(header, "class=")
                .is_some_and(|class| class & 0xff0000 == 0x030000);
            vendor_id = header_hex_field(header, "vendor=").unwrap_or(0);
            device_id = header_hex_field(header, "device=").unwrap_or(0);
            vendor_name.clear();
            device_name.clear();
            continue;
        }

        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('\'').to_lowercase();
        match key.trim() {
            "vendor" => vendor_name = value,
            "device" => device_name = value,
            _ => {}
        }
    }

    gpus
}

/// Parse `pcictl pci0 list` lines, e.g.
/// `000:02:0: Red Hat QXL Video (VGA display, revision 0x05)`.
#[cfg(any(target_os = "netbsd", test))]
fn parse_pcictl_gpus(output: &str) -> Vec<GpuCandidate> {
    let mut gpus = Vec::new();

    for line in output.lines() {
        let line = line.trim().to_lowercase();
        if !line.contains("(vga display") {
            continue;
        }
        let Some(sep) = line.find(": ") else {
            continue;
        };
        let desc = &line[sep + 2..];
        let name = desc.split(" (").next().unwrap_or(desc);

        let mut g = GpuCandidate::default();
        gpu::apply_name_hints(&mut g, name);
        gpus.push(g);
    }

    gpus
}

/// Parse `dmesg` for attached VGA devices, e.g.
/// `vga1 at pci0 dev 2 function 0 "Red Hat QXL Video" rev 0x05`.
#[cfg(any(target_os = "openbsd", test))]
fn parse_dmesg_gpus(output: &str) -> Vec<GpuCandidate> {
    let mut gpus = Vec::new();

    for line in output.lines() {
        let line = line.trim().to_lowercase();
        if line.is_empty() || (!line.starts_with("vga") && !line.contains(" vga")) {
            continue;
        }
        let Some(open) = line.find('"') else {
            continue;
        };
        let Some(close) = line[open + 1..].find('"').map(|i| open + 1 + i) else {
            continue;
        };
        if close <= open + 1 {
            continue;
        }

        let mut g = GpuCandidate::default();
        gpu::apply_name_hints(&mut g, &line[open + 1..close]);
        gpus.push(g);
    }

    gpus
}
