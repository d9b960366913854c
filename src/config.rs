//! Runtime effect configuration loaded from `assets/effects.toml`.
//!
//! [`FxConfig`] is a Bevy [`Resource`] that mirrors the tunable subset of
//! [`crate::constants`].  At startup, [`load_effects_config`] reads
//! `assets/effects.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the settings you care about.
//!
//! Structural capacities (spark pool size, overwrite cursor policy, teleport
//! timing) are compile-time only and deliberately not in this struct.
//!
//! ## Usage in systems
//!
//! Add `config: Res<FxConfig>` to any system parameter list and pass it to
//! the [`crate::fx_manager::FxManager`] emit calls that take one.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/effects.toml`.
//! 2. Restart the demo — no recompilation required.
//! 3. Values that fail sanity validation are rejected as a whole file and the
//!    compiled defaults kept, so a typo cannot half-apply.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `FxConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_blast_line_speed, validate_explosion_density, validate_trail_drop_freq,
    validate_trail_length, FxResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable effect emission configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/effects.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    // ── Blast ─────────────────────────────────────────────────────────────────
    pub blast_ring_radius: f32,
    pub blast_line_speed: f32,
    pub blast_point_speed: f32,

    // ── Explosion ─────────────────────────────────────────────────────────────
    pub explosion_sparks_per_unit: f32,
    pub explosion_speed: f32,
    pub explosion_base_ttl_ms: i32,

    // ── Burst ─────────────────────────────────────────────────────────────────
    pub burst_default_count: u32,
    pub burst_speed: f32,

    // ── Text Effects ──────────────────────────────────────────────────────────
    pub text_velocity_y: f32,
    pub text_growth_rate: f32,
    pub text_ttl_ms: u32,

    // ── Trails ────────────────────────────────────────────────────────────────
    pub trail_drop_freq_ms: u32,
    pub trail_length: u32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            // Blast
            blast_ring_radius: BLAST_RING_RADIUS,
            blast_line_speed: BLAST_LINE_SPEED,
            blast_point_speed: BLAST_POINT_SPEED,
            // Explosion
            explosion_sparks_per_unit: EXPLOSION_SPARKS_PER_UNIT,
            explosion_speed: EXPLOSION_SPEED,
            explosion_base_ttl_ms: EXPLOSION_BASE_TTL_MS,
            // Burst
            burst_default_count: BURST_DEFAULT_COUNT,
            burst_speed: BURST_SPEED,
            // Text Effects
            text_velocity_y: TEXT_EFFECT_VELOCITY_Y,
            text_growth_rate: TEXT_EFFECT_GROWTH_RATE,
            text_ttl_ms: TEXT_EFFECT_TTL_MS,
            // Trails
            trail_drop_freq_ms: TRAIL_DROP_FREQ_MS,
            trail_length: TRAIL_LENGTH,
        }
    }
}

impl FxConfig {
    /// Sanity-checks the settings that can destabilise the effect layer.
    ///
    /// Only values with a failure mode worse than "looks wrong" are checked:
    /// a zero blast speed divides by zero, zero-length trails render
    /// degenerate strips, and a zero drop frequency stamps dead-on-arrival
    /// nodes.
    pub fn validate(&self) -> FxResult<()> {
        validate_blast_line_speed(self.blast_line_speed)?;
        validate_explosion_density(self.explosion_sparks_per_unit)?;
        validate_trail_drop_freq(self.trail_drop_freq_ms)?;
        validate_trail_length(self.trail_length)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/effects.toml` and overwrite the
/// `FxConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors and
/// validation failures are printed to stderr but do not abort; the compiled
/// defaults stay in place.  A missing file is informational only (defaults
/// are already in place from resource init).
pub fn load_effects_config(mut config: ResMut<FxConfig>) {
    let path = "assets/effects.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<FxConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    println!("✓ Loaded effects config from {path}");
                }
                Err(e) => {
                    eprintln!("⚠ Rejected {path}: {e}; using defaults");
                }
            },
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}
