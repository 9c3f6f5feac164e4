// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! GPU heuristic tables shared by the platform probes
//!
//! Vendor ids, device-id ranges, and name-substring hints are best-effort
//! pattern data. Keeping them here lets the tables evolve without touching
//! either the probes or the classifier.

use super::facts::{GpuMemoryModel, HardwareFacts};

/// PCI vendor id for NVIDIA
pub const VENDOR_NVIDIA: u32 = 0x10de;
/// PCI vendor id for AMD/ATI
pub const VENDOR_AMD: u32 = 0x1002;
/// PCI vendor id for Intel
pub const VENDOR_INTEL: u32 = 0x8086;

/// Name substrings implying a discrete adapter.
const DISCRETE_NAME_HINTS: &[&str] = &["nvidia", "amd", "radeon", "geforce", "quadro"];

/// Name substrings implying a virtualized adapter (no real GPU behind it).
const VIRTUAL_NAME_HINTS: &[&str] = &["qxl", "virtio", "vmware", "virtualbox", "bochs", "cirrus"];

/// Vendor strings that identify hypervisor display devices.
const VIRTUAL_VENDOR_HINTS: &[&str] = &["red hat", "vmware", "virtualbox", "bochs", "cirrus"];

/// One enumerated display adapter, before the best one is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuCandidate {
    /// PCI vendor id, 0 when only a name was available
    pub vendor_id: u32,
    /// PCI device id, 0 when unknown
    pub device_id: u32,
    /// Dedicated VRAM in bytes, 0 when unknown
    pub vram_bytes: u64,
    pub is_discrete_hint: bool,
    pub is_virtual_hint: bool,
    pub is_intel_arc_hint: bool,
}

/// DG2/Alchemist (Arc) device ids commonly fall in the 0x56xx/0x57xx
/// ranges. Not perfect, but good enough for a first-caste bucket.
pub fn intel_arc_device_heuristic(device_id: u32) -> bool {
    let hi = (device_id & 0xff00) >> 8;
    hi == 0x56 || hi == 0x57
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Apply hint flags derived from a lowercased adapter name.
pub fn apply_name_hints(gpu: &mut GpuCandidate, name_lower: &str) {
    if contains_any(name_lower, DISCRETE_NAME_HINTS) {
        gpu.is_discrete_hint = true;
    }
    if contains_any(name_lower, VIRTUAL_NAME_HINTS) {
        gpu.is_virtual_hint = true;
    }
    if name_lower.contains("arc") {
        gpu.is_intel_arc_hint = true;
    }
}

/// Apply hint flags from lowercased vendor and device description strings
/// (the shape `pciconf -lv` and friends report).
pub fn apply_vendor_device_hints(gpu: &mut GpuCandidate, vendor_lower: &str, device_lower: &str) {
    if vendor_lower.contains("nvidia")
        || vendor_lower.contains("advanced micro devices")
        || vendor_lower.contains("amd")
        || contains_any(device_lower, DISCRETE_NAME_HINTS)
    {
        gpu.is_discrete_hint = true;
    }

    if contains_any(vendor_lower, VIRTUAL_VENDOR_HINTS)
        || contains_any(device_lower, VIRTUAL_NAME_HINTS)
    {
        gpu.is_virtual_hint = true;
    }

    if device_lower.contains("arc") {
        gpu.is_intel_arc_hint = true;
    }
}

/// Ranking score for best-GPU selection: discrete beats everything, then
/// usable VRAM (bounded so the vendor bonus stays meaningful), then vendor
/// priority NVIDIA > AMD > Intel with an Arc bonus. Virtualized adapters
/// sink below real integrated ones.
fn score(gpu: &GpuCandidate) -> i64 {
    let mut s: i64 = 0;
    if gpu.is_discrete_hint {
        s += 1_000_000_000;
    }
    s += gpu.vram_bytes.min(999_000_000) as i64;
    match gpu.vendor_id {
        VENDOR_NVIDIA => s += 10_000,
        VENDOR_AMD => s += 5_000,
        VENDOR_INTEL => s += 1_000,
        _ => {}
    }
    if gpu.is_intel_arc_hint {
        s += 2_000;
    }
    if gpu.is_virtual_hint {
        s -= 500_000_000;
    }
    s
}

/// Pick the single adapter the fact record will describe.
pub fn pick_best_gpu(gpus: &[GpuCandidate]) -> Option<GpuCandidate> {
    gpus.iter().max_by_key(|g| score(g)).cloned()
}

/// Fold the chosen candidate into the fact record. A purely virtual
/// adapter counts as no GPU at all.
pub fn apply_candidate(facts: &mut HardwareFacts, best: &GpuCandidate) {
    facts.is_intel_arc_class = best.is_intel_arc_hint;

    if best.is_discrete_hint {
        facts.gpu_memory_model = GpuMemoryModel::Discrete;
        facts.has_discrete_gpu = true;
        // May still be 0 when no VRAM source exists (e.g. Arc dGPU without
        // a driver query path); the classifier tolerates that.
        facts.vram_bytes = best.vram_bytes;
    } else if best.is_virtual_hint {
        facts.gpu_memory_model = GpuMemoryModel::None;
        facts.has_discrete_gpu = false;
        facts.vram_bytes = 0;
    } else {
        facts.gpu_memory_model = GpuMemoryModel::Integrated;
        facts.has_discrete_gpu = false;
        // Shared memory; don't pretend it is VRAM.
        facts.vram_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== arc heuristic tests =====

    #[test]
    fn test_intel_arc_device_ranges() {
        assert!(intel_arc_device_heuristic(0x5690)); // A770M
        assert!(intel_arc_device_heuristic(0x56a0)); // A770
        assert!(intel_arc_device_heuristic(0x5700));
        assert!(!intel_arc_device_heuristic(0x4680)); // UHD 770
        assert!(!intel_arc_device_heuristic(0x9a49)); // Iris Xe
        assert!(!intel_arc_device_heuristic(0));
    }

    // ===== name hint tests =====

    #[test]
    fn test_name_hints_discrete() {
        let mut gpu = GpuCandidate::default();
        apply_name_hints(&mut gpu, "nvidia geforce rtx 4090");
        assert!(gpu.is_discrete_hint);
        assert!(!gpu.is_virtual_hint);
    }

    #[test]
    fn test_name_hints_virtual() {
        let mut gpu = GpuCandidate::default();
        apply_name_hints(&mut gpu, "red hat qxl video");
        assert!(gpu.is_virtual_hint);
        assert!(!gpu.is_discrete_hint);
    }

    #[test]
    fn test_name_hints_arc() {
        let mut gpu = GpuCandidate::default();
        apply_name_hints(&mut gpu, "intel arc a770 graphics");
        assert!(gpu.is_intel_arc_hint);
        assert!(!gpu.is_discrete_hint);
    }

    #[test]
    fn test_vendor_device_hints() {
        let mut gpu = GpuCandidate::default();
        apply_vendor_device_hints(&mut gpu, "advanced micro devices, inc.", "radeon rx 7900 xtx");
        assert!(gpu.is_discrete_hint);

        let mut vm = GpuCandidate::default();
        apply_vendor_device_hints(&mut vm, "red hat, inc.", "virtio gpu");
        assert!(vm.is_virtual_hint);
    }

    // ===== selection tests =====

    #[test]
    fn test_pick_best_prefers_discrete_over_integrated() {
        let igpu = GpuCandidate {
            vendor_id: VENDOR_INTEL,
            ..Default::default()
        };
        let dgpu = GpuCandidate {
            vendor_id: VENDOR_NVIDIA,
            is_discrete_hint: true,
            ..Default::default()
        };
        let best = pick_best_gpu(&[igpu, dgpu.clone()]).unwrap();
        assert_eq!(best, dgpu);
    }

    #[test]
    fn test_pick_best_prefers_more_vram() {
        let small = GpuCandidate {
            vendor_id: VENDOR_AMD,
            is_discrete_hint: true,
            vram_bytes: 8 * 1024 * 1024 * 1024,
            ..Default::default()
        };
        let big = GpuCandidate {
            vendor_id: VENDOR_AMD,
            is_discrete_hint: true,
            vram_bytes: 24 * 1024 * 1024 * 1024,
            ..Default::default()
        };
        let best = pick_best_gpu(&[small, big.clone()]).unwrap();
        assert_eq!(best, big);
    }

    #[test]
    fn test_pick_best_vendor_priority_when_vram_unknown() {
        let nvidia = GpuCandidate {
            vendor_id: VENDOR_NVIDIA,
            is_discrete_hint: true,
            ..Default::default()
        };
        let amd = GpuCandidate {
            vendor_id: VENDOR_AMD,
            is_discrete_hint: true,
            ..Default::default()
        };
        let best = pick_best_gpu(&[amd, nvidia.clone()]).unwrap();
        assert_eq!(best, nvidia);
    }

    #[test]
    fn test_pick_best_real_igpu_beats_virtual_adapter() {
        let virt = GpuCandidate {
            is_virtual_hint: true,
            ..Default::default()
        };
        let igpu = GpuCandidate {
            vendor_id: VENDOR_INTEL,
            ..Default::default()
        };
        let best = pick_best_gpu(&[virt, igpu.clone()]).unwrap();
        assert_eq!(best, igpu);
    }

    #[test]
    fn test_pick_best_empty() {
        assert_eq!(pick_best_gpu(&[]), None);
    }

    // ===== candidate application tests =====

    #[test]
    fn test_apply_discrete_candidate() {
        let mut facts = HardwareFacts::default();
        let best = GpuCandidate {
            vendor_id: VENDOR_NVIDIA,
            is_discrete_hint: true,
            vram_bytes: 12 * 1024 * 1024 * 1024,
            ..Default::default()
        };
        apply_candidate(&mut facts, &best);
        assert_eq!(facts.gpu_memory_model, GpuMemoryModel::Discrete);
        assert!(facts.has_discrete_gpu);
        assert_eq!(facts.vram_bytes, best.vram_bytes);
    }

    #[test]
    fn test_apply_virtual_candidate_means_no_gpu() {
        let mut facts = HardwareFacts::default();
        let best = GpuCandidate {
            is_virtual_hint: true,
            ..Default::default()
        };
        apply_candidate(&mut facts, &best);
        assert_eq!(facts.gpu_memory_model, GpuMemoryModel::None);
        assert!(!facts.has_discrete_gpu);
    }

    #[test]
    fn test_apply_integrated_candidate_zeroes_vram() {
        let mut facts = HardwareFacts::default();
        let best = GpuCandidate {
            vendor_id: VENDOR_INTEL,
            vram_bytes: 123,
            ..Default::default()
        };
        apply_candidate(&mut facts, &best);
        assert_eq!(facts.gpu_memory_model, GpuMemoryModel::Integrated);
        assert_eq!(facts.vram_bytes, 0);
    }

    #[test]
    fn test_apply_arc_candidate_sets_arc_class() {
        let mut facts = HardwareFacts::default();
        let best = GpuCandidate {
            vendor_id: VENDOR_INTEL,
            device_id: 0x56a0,
            is_intel_arc_hint: true,
            ..Default::default()
        };
        apply_candidate(&mut facts, &best);
        assert!(facts.is_intel_arc_class);
        assert_eq!(facts.gpu_memory_model, GpuMemoryModel::Integrated);
    }
}
