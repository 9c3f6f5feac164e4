// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use caste::{classify, Caste, GpuMemoryModel, HardwareFacts};
use proptest::prelude::*;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;
const RAM_USER_FLOOR: u64 = 8 * GIB - 512 * MIB;

fn discrete_facts(ram_gib: u64, vram_gib: u64) -> HardwareFacts {
    HardwareFacts {
        ram_bytes: ram_gib * GIB,
        physical_cores: 8,
        logical_threads: 16,
        gpu_memory_model: GpuMemoryModel::Discrete,
        vram_bytes: vram_gib * GIB,
        has_discrete_gpu: true,
        ..Default::default()
    }
}

// ===== scenario tests =====

#[test]
fn test_discrete_vram_tiers_map_to_expected_castes() {
    assert_eq!(classify(&discrete_facts(64, 2)).caste, Caste::User);
    assert_eq!(classify(&discrete_facts(64, 6)).caste, Caste::Developer);
    assert_eq!(classify(&discrete_facts(64, 16)).caste, Caste::Workstation);
    assert_eq!(classify(&discrete_facts(64, 24)).caste, Caste::Rig);
}

#[test]
fn test_ram_cap_prevents_overrating_discrete_gpus() {
    assert_eq!(classify(&discrete_facts(16, 24)).caste, Caste::User);
}

#[test]
fn test_apple_silicon_unified_memory_uses_ram_tiers() {
    let facts = HardwareFacts {
        ram_bytes: 32 * GIB,
        physical_cores: 8,
        logical_threads: 16,
        gpu_memory_model: GpuMemoryModel::Unified,
        is_apple_silicon: true,
        ..Default::default()
    };
    assert_eq!(classify(&facts).caste, Caste::Workstation);
}

#[test]
fn test_cpu_cap_is_gentle_and_floor_holds_with_enough_ram() {
    let facts = HardwareFacts {
        physical_cores: 2,
        logical_threads: 4,
        ..discrete_facts(64, 24)
    };
    assert_eq!(classify(&facts).caste, Caste::User);
}

#[test]
fn test_caste_names_are_stable() {
    assert_eq!(Caste::Mini.name(), "Mini");
    assert_eq!(Caste::User.name(), "User");
    assert_eq!(Caste::Developer.name(), "Developer");
    assert_eq!(Caste::Workstation.name(), "Workstation");
    assert_eq!(Caste::Rig.name(), "Rig");
}

#[test]
fn test_name_reverse_lookup_is_identity() {
    for caste in Caste::ALL {
        assert_eq!(Caste::from_name(caste.name()), Some(caste));
    }
}

// ===== property tests =====

fn gpu_memory_model_strategy() -> impl Strategy<Value = GpuMemoryModel> {
    prop_oneof![
        Just(GpuMemoryModel::None),
        Just(GpuMemoryModel::Integrated),
        Just(GpuMemoryModel::Unified),
        Just(GpuMemoryModel::Discrete),
    ]
}

fn facts_strategy() -> impl Strategy<Value = HardwareFacts> {
    (
        any::<u64>(),
        0i32..=256,
        0i32..=512,
        gpu_memory_model_strategy(),
        any::<u64>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(ram, cores, threads, model, vram, discrete, apple, arc)| HardwareFacts {
                ram_bytes: ram,
                physical_cores: cores,
                logical_threads: threads,
                gpu_memory_model: model,
                vram_bytes: vram,
                has_discrete_gpu: discrete,
                is_apple_silicon: apple,
                is_intel_arc_class: arc,
            },
        )
}

proptest! {
    #[test]
    fn prop_below_floor_is_always_mini(
        mut facts in facts_strategy(),
        ram in 0..RAM_USER_FLOOR,
    ) {
        facts.ram_bytes = ram;
        prop_assert_eq!(classify(&facts).caste, Caste::Mini);
    }

    #[test]
    fn prop_at_or_above_floor_is_never_mini(
        mut facts in facts_strategy(),
        ram in RAM_USER_FLOOR..=u64::MAX,
    ) {
        facts.ram_bytes = ram;
        prop_assert_ne!(classify(&facts).caste, Caste::Mini);
    }

    #[test]
    fn prop_vram_is_monotonic(
        mut facts in facts_strategy(),
        vram_a in any::<u64>(),
        vram_b in any::<u64>(),
    ) {
        facts.gpu_memory_model = GpuMemoryModel::Discrete;
        facts.has_discrete_gpu = true;

        let (lo, hi) = if vram_a <= vram_b { (vram_a, vram_b) } else { (vram_b, vram_a) };
        facts.vram_bytes = lo;
        let low = classify(&facts).caste;
        facts.vram_bytes = hi;
        let high = classify(&facts).caste;
        prop_assert!(low <= high);
    }

    #[test]
    fn prop_classify_is_pure(facts in facts_strategy()) {
        let first = classify(&facts);
        let second = classify(&facts);
        prop_assert_eq!(first.caste, second.caste);
        prop_assert_eq!(first.reason, second.reason);
    }

    #[test]
    fn prop_reason_is_never_empty(facts in facts_strategy()) {
        prop_assert!(!classify(&facts).reason.is_empty());
    }
}
