//! Effect-layer error types.
//!
//! Effect emission, aging, and rendering are total operations and never
//! return errors; saturation degrades visuals instead of failing (older
//! sparks are overwritten).  The error type below exists for the
//! configuration boundary, where a bad TOML override should be rejected
//! loudly rather than fed into the simulation.
//!
//! ## Usage
//!
//! ```rust
//! use afterglow::error::{validate_trail_length, FxResult};
//!
//! fn accept_override(len: u32) -> FxResult<u32> {
//!     validate_trail_length(len)?;
//!     Ok(len)
//! }
//!
//! assert!(accept_override(0).is_err());
//! assert!(accept_override(15).is_ok());
//! ```

use std::fmt;

/// Top-level error enum for the effects layer.
#[derive(Debug)]
pub enum FxError {
    /// A tuning value from the config file is outside its safe operating range.
    /// Returned by validation helpers; the loader keeps the compiled default.
    UnsafeTuning {
        /// Name of the setting (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// An integer setting that must be at least one was zero.
    /// Zero-length trails and zero drop frequencies produce degenerate
    /// geometry and dead-on-arrival nodes.
    UnsafeCount {
        /// Name of the setting (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: u32,
    },
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxError::UnsafeTuning {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "setting '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            FxError::UnsafeCount { name, value } => {
                write!(f, "setting '{}' = {} must be at least 1", name, value)
            }
        }
    }
}

impl std::error::Error for FxError {}

/// Convenience alias: a `Result` using `FxError` as the error type.
pub type FxResult<T> = Result<T, FxError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `blast_line_speed` is not strictly positive.
///
/// Blast line ttl is the travel time `distance / speed`; zero or negative
/// speeds divide by zero or send the ring inward.
pub fn validate_blast_line_speed(value: f32) -> FxResult<()> {
    if value <= 0.0 {
        Err(FxError::UnsafeTuning {
            name: "blast_line_speed",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `explosion_sparks_per_unit` is not strictly positive.
pub fn validate_explosion_density(value: f32) -> FxResult<()> {
    if value <= 0.0 {
        Err(FxError::UnsafeTuning {
            name: "explosion_sparks_per_unit",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `trail_drop_freq_ms` is zero.
pub fn validate_trail_drop_freq(value: u32) -> FxResult<()> {
    if value == 0 {
        Err(FxError::UnsafeCount {
            name: "trail_drop_freq_ms",
            value,
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `trail_length` is zero.
pub fn validate_trail_length(value: u32) -> FxResult<()> {
    if value == 0 {
        Err(FxError::UnsafeCount {
            name: "trail_length",
            value,
        })
    } else {
        Ok(())
    }
}
