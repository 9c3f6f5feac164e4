// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Caste
//!
//! Classification itself is total and never fails; errors only arise at the
//! CLI and serialization boundary.

use thiserror::Error;

/// Main error type for Caste operations
#[derive(Error, Debug)]
pub enum CasteError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for Caste operations
pub type Result<T> = std::result::Result<T, CasteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CasteError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CasteError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn test_fn() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(test_fn().unwrap(), 42);
    }
}
