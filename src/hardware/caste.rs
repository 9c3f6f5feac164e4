// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Caste classification rules
//!
//! A deliberately coarse bucketing: RAM and GPU memory dominate, CPU counts
//! act as a gentle sanity clamp. The whole thing is a pure pipeline of
//! immutable intermediate values so each step is independently testable.

use serde::{Deserialize, Serialize};

use super::facts::{GpuMemoryModel, HardwareFacts};

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// Minimum RAM for the `User` caste: 8 GiB minus a 512 MiB tolerance for
/// firmware-reserved memory.
pub const RAM_USER_FLOOR_BYTES: u64 = 8 * GIB - 512 * MIB;

/// Coarse capability caste, ordered low to high.
///
/// The ordering is meaningful: classification takes min/max across it to
/// apply caps and floors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Caste {
    /// Below the RAM floor, or a machine too weak for local work
    Mini,
    /// Baseline capable machine
    User,
    /// Comfortable mid-range (6 GiB+ VRAM class)
    Developer,
    /// High-end desktop/laptop (16 GiB+ VRAM class)
    Workstation,
    /// Dedicated heavy-duty machine (24 GiB+ VRAM class)
    Rig,
}

impl Caste {
    /// All castes in ascending order.
    pub const ALL: [Caste; 5] = [
        Caste::Mini,
        Caste::User,
        Caste::Developer,
        Caste::Workstation,
        Caste::Rig,
    ];

    /// Stable display name. External tooling matches on these strings;
    /// they must never change.
    pub fn name(&self) -> &'static str {
        match self {
            Caste::Mini => "Mini",
            Caste::User => "User",
            Caste::Developer => "Developer",
            Caste::Workstation => "Workstation",
            Caste::Rig => "Rig",
        }
    }

    /// Reverse of [`Caste::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Caste::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Caste {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of a classification: the caste plus a human-readable trace of
/// which rule fired and which caps applied. The reason is diagnostic text,
/// not structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub caste: Caste,
    pub reason: String,
}

fn caste_from_vram(vram_bytes: u64) -> Caste {
    if vram_bytes >= 24 * GIB {
        Caste::Rig
    } else if vram_bytes >= 16 * GIB {
        Caste::Workstation
    } else if vram_bytes >= 6 * GIB {
        Caste::Developer
    } else if vram_bytes >= 2 * GIB {
        Caste::User
    } else {
        // dGPU with <2GB is functionally low-end
        Caste::Mini
    }
}

fn caste_from_unified_ram(ram_bytes: u64) -> Caste {
    if ram_bytes >= 64 * GIB {
        Caste::Rig
    } else if ram_bytes >= 32 * GIB {
        Caste::Workstation
    } else if ram_bytes >= 24 * GIB {
        Caste::Developer
    } else {
        Caste::User
    }
}

/// Ceiling implied by total RAM. `Rig` at 64 GiB+ is a real tier, not a
/// sentinel: that much RAM does not constrain anything.
fn ram_cap(ram_bytes: u64) -> Caste {
    if ram_bytes < RAM_USER_FLOOR_BYTES {
        Caste::Mini
    } else if ram_bytes < 24 * GIB {
        // 8-23GB: still usually "User"
        Caste::User
    } else if ram_bytes < 32 * GIB {
        Caste::Developer
    } else if ram_bytes < 64 * GIB {
        Caste::Workstation
    } else {
        Caste::Rig
    }
}

/// Gentle ceiling implied by CPU counts; `None` means unconstrained.
///
/// Physical cores are preferred; when unknown, logical threads stand in
/// with doubled thresholds (one core is roughly two threads under SMT).
fn cpu_cap(physical_cores: i32, logical_threads: i32) -> Option<Caste> {
    let cores = physical_cores.max(0);
    let threads = logical_threads;

    if (cores > 0 && cores < 4) || (cores == 0 && threads > 0 && threads < 8) {
        return Some(Caste::Mini);
    }

    if (cores > 0 && cores < 6) || (cores == 0 && threads > 0 && threads < 12) {
        return Some(Caste::User);
    }

    // 6c/12t and up can be Developer or above
    None
}

fn base_caste(facts: &HardwareFacts) -> (Caste, String) {
    if facts.has_discrete_gpu || facts.gpu_memory_model == GpuMemoryModel::Discrete {
        (
            caste_from_vram(facts.vram_bytes),
            "discrete GPU VRAM caste".to_string(),
        )
    } else if facts.is_apple_silicon || facts.gpu_memory_model == GpuMemoryModel::Unified {
        // Unified memory has no separate VRAM budget; RAM is the signal.
        (
            caste_from_unified_ram(facts.ram_bytes),
            "unified memory caste by RAM".to_string(),
        )
    } else if facts.gpu_memory_model == GpuMemoryModel::Integrated {
        (Caste::User, "integrated GPU caste".to_string())
    } else {
        // Unknown GPU state never punishes below baseline.
        (Caste::User, "no discrete GPU detected".to_string())
    }
}

/// Classify a fact snapshot into a caste.
///
/// Total and deterministic: any combination of zero/garbage facts produces
/// a valid caste. Later pipeline steps cap or restore earlier ones:
/// base rule, Arc bump, RAM cap, CPU cap, then User-floor restoration.
pub fn classify(facts: &HardwareFacts) -> ClassificationResult {
    // Absolute floor: too little RAM bypasses everything else.
    if facts.ram_bytes < RAM_USER_FLOOR_BYTES {
        return ClassificationResult {
            caste: Caste::Mini,
            reason: "RAM < ~7.5GB".to_string(),
        };
    }

    let (base, mut reason) = base_caste(facts);

    // Arc bump applies only without a discrete signal; discrete Arc is
    // already covered by VRAM tiering above.
    let has_discrete = facts.has_discrete_gpu || facts.gpu_memory_model == GpuMemoryModel::Discrete;
    let after_arc_bump = if !has_discrete && facts.is_intel_arc_class {
        if facts.ram_bytes >= 16 * GIB {
            reason.push_str("; Arc-class iGPU with >=16GB RAM => Developer floor");
            base.max(Caste::Developer)
        } else {
            reason.push_str("; Arc-class iGPU but <16GB RAM => no bump");
            base
        }
    } else {
        base
    };

    // RAM cap keeps a big dGPU on a RAM-starved box honest.
    let cap_ram = ram_cap(facts.ram_bytes);
    let after_ram_cap = after_arc_bump.min(cap_ram);

    let cap_cpu = cpu_cap(facts.physical_cores, facts.logical_threads);
    let after_cpu_cap = match cap_cpu {
        Some(cap) => after_ram_cap.min(cap),
        None => after_ram_cap,
    };

    // Enough RAM guarantees at least User, even if the caps bit harshly.
    let after_floor_restore = if facts.ram_bytes >= RAM_USER_FLOOR_BYTES {
        after_cpu_cap.max(Caste::User)
    } else {
        after_cpu_cap
    };

    // Only mention a cap that could have constrained the result.
    if cap_ram != Caste::Rig {
        reason.push_str("; RAM cap applied");
    }
    if cap_cpu.is_some() {
        reason.push_str("; CPU cap applied");
    }

    ClassificationResult {
        caste: after_floor_restore,
        reason,
    }
}
