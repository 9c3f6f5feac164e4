// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations
//!
//! Thin adapters that render detection and classification results; no
//! classification logic lives here.

pub mod classify;
pub mod facts;
