// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware detection and caste classification
//!
//! Two strictly layered halves: best-effort platform probes that produce a
//! [`HardwareFacts`] snapshot, and the pure classifier in [`caste`] that
//! maps a snapshot to a [`Caste`]. Detection never fails; unreadable
//! interfaces degrade to zeroed facts and the classifier's conservative
//! defaults absorb the gaps.

pub mod caste;
pub mod facts;
pub mod gpu;

#[cfg(any(target_os = "linux", test))]
#[cfg_attr(test, allow(dead_code))]
mod linux;

#[cfg(any(target_os = "macos", test))]
#[cfg_attr(test, allow(dead_code))]
mod macos;

#[cfg(any(target_os = "windows", test))]
#[cfg_attr(test, allow(dead_code))]
mod windows;

#[cfg(any(
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly",
    test
))]
#[cfg_attr(test, allow(dead_code))]
mod bsd;

#[cfg(any(target_os = "linux", target_os = "windows", test))]
#[cfg_attr(test, allow(dead_code))]
mod nvidia;

pub use caste::*;
pub use facts::*;

use sysinfo::System;
use tracing::debug;

/// Detect a best-effort fact snapshot for the current machine.
///
/// Never fails: on an unsupported platform or with every probe degraded,
/// the result is simply closer to `HardwareFacts::default()`.
pub fn detect_facts() -> HardwareFacts {
    let mut sys = System::new_all();
    sys.refresh_all();

    let mut facts = HardwareFacts {
        ram_bytes: sys.total_memory(),
        logical_threads: sys.cpus().len() as i32,
        ..Default::default()
    };

    #[cfg(target_os = "linux")]
    linux::collect(&mut facts);

    #[cfg(target_os = "macos")]
    macos::collect(&mut facts);

    #[cfg(target_os = "windows")]
    windows::collect(&mut facts);

    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    bsd::collect(&mut facts);

    if facts.logical_threads <= 0 {
        facts.logical_threads = std::thread::available_parallelism()
            .map(|n| n.get() as i32)
            .unwrap_or(0);
    }

    debug!(?facts, "detected hardware facts");
    facts
}

/// Detect and classify in one call.
pub fn detect_caste() -> ClassificationResult {
    caste::classify(&detect_facts())
}

/// Just the caste word, for callers that only want the bucket name.
pub fn detect_caste_word() -> &'static str {
    detect_caste().caste.name()
}
