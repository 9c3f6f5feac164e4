// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware fact record consumed by the classifier

use serde::{Deserialize, Serialize};

/// How the GPU addresses memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GpuMemoryModel {
    /// No usable GPU signal (including virtualized adapters)
    #[default]
    None,
    /// Intel UHD/Iris Xe, AMD iGPU, etc. (shared memory)
    Integrated,
    /// Apple Silicon style unified memory (shared, but fast)
    Unified,
    /// NVIDIA/AMD dGPU with dedicated VRAM
    Discrete,
}

/// Snapshot of the hardware signals the classifier consumes.
///
/// Constructed once per detection, never mutated. Zero/`None` fields mean
/// "unknown"; the classifier accepts any combination without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HardwareFacts {
    /// Total physical RAM in bytes (0 = unknown)
    pub ram_bytes: u64,
    /// Physical core count, 0 if unknown
    pub physical_cores: i32,
    /// Logical thread count, 0 if genuinely undetectable
    pub logical_threads: i32,
    /// Memory model of the best detected GPU
    pub gpu_memory_model: GpuMemoryModel,
    /// Dedicated VRAM in bytes; meaningful only for `Discrete`
    pub vram_bytes: u64,
    /// Convenience flag for legacy callers, normally agrees with
    /// `gpu_memory_model == Discrete`
    pub has_discrete_gpu: bool,
    /// macOS arm64
    pub is_apple_silicon: bool,
    /// Arc dGPU or Arc-class iGPU (detection layer decides which)
    pub is_intel_arc_class: bool,
}
