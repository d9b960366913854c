//! Floating event text: "+1 Flag!", damage numbers, level banners.
//!
//! A [`TextEffect`] drifts, grows from nothing toward a size ceiling, and
//! fades out at the end of its life.  An optional start delay holds the
//! effect invisible and frozen until its countdown clears; the tick that
//! clears the countdown applies its full duration of motion, so chained
//! delayed effects stay evenly spaced under any frame rate.
//!
//! The manager keeps two independent collections of these: world-relative
//! (following the camera) and screen-relative (fixed viewport position).
//! This module only knows about one effect at a time.

use bevy::prelude::*;

use crate::constants::{MAX_TEXT_EFFECT_SIZE, TEXT_EFFECT_FADE_MS};

/// One floating text instance.
#[derive(Debug, Clone)]
pub struct TextEffect {
    pub text: String,
    pub color: Srgba,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current visual size; grows toward [`MAX_TEXT_EFFECT_SIZE`] and clamps.
    pub size: f32,
    /// Growth rate (size units per second).
    pub growth_rate: f32,
    pub ttl: u32,
    /// Countdown (ms) before the effect becomes active.  While non-zero the
    /// effect neither moves, grows, ages, nor renders.
    pub delay: u32,
}

impl TextEffect {
    /// Age by `dt` milliseconds: burn delay first, then move, grow, and
    /// decay ttl (clamped at zero).
    pub fn idle(&mut self, dt: u32) {
        let dt_secs = dt as f32 * 0.001;

        if dt > self.delay {
            self.delay = 0;
        } else {
            self.delay -= dt;
        }
        if self.delay > 0 {
            return;
        }

        self.pos += self.vel * dt_secs;

        if self.size < MAX_TEXT_EFFECT_SIZE {
            self.size += self.growth_rate * dt_secs;
        }
        if self.size > MAX_TEXT_EFFECT_SIZE {
            self.size = MAX_TEXT_EFFECT_SIZE;
        }

        self.ttl = self.ttl.saturating_sub(dt);
    }

    /// Opaque until the final fade window, then a linear fade out.
    pub fn alpha(&self) -> f32 {
        if self.ttl < TEXT_EFFECT_FADE_MS {
            self.ttl as f32 / TEXT_EFFECT_FADE_MS as f32
        } else {
            1.0
        }
    }

    /// Render scale in `0.0..=1.0`: zero at birth, one at full size.
    pub fn scale(&self) -> f32 {
        self.size / MAX_TEXT_EFFECT_SIZE
    }
}
