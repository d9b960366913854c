//! Afterglow — client-side visual effects for a vector-art arcade shooter.
//!
//! Fixed-capacity spark pools, tumbling debris, floating combat text,
//! teleport rings, and motion trails, all driven by one integer-millisecond
//! `idle` tick and drawn through a backend-agnostic render sink.  The Bevy
//! plugins in [`effects`] wire the whole layer into an app; everything else
//! runs headless.

pub mod config;
pub mod constants;
pub mod debris;
pub mod effects;
pub mod error;
pub mod fx_manager;
pub mod render;
pub mod spark;
pub mod teleport;
pub mod text_effect;
pub mod trail;
