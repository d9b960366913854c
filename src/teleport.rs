//! Expanding teleport-in arrival rings.
//!
//! Teleport events are rare (a handful per match), so these live in a plain
//! collection on the manager rather than a pooled store.  Arrival order is
//! irrelevant to rendering and not preserved by removal.

use bevy::prelude::*;

use crate::constants::{TELEPORT_IN_EXPAND_MS, TELEPORT_IN_RADIUS};
use crate::render::FxRenderer;

/// One expanding teleport-in ring.
#[derive(Debug, Clone, Copy)]
pub struct TeleporterEffect {
    pub pos: Vec2,
    /// Milliseconds since emission.
    pub elapsed: u32,
    /// Opaque styling tag handed straight to the render backend; unknown
    /// values degrade to the backend's default look.
    pub kind: u32,
}

impl TeleporterEffect {
    pub fn new(pos: Vec2, kind: u32) -> Self {
        Self {
            pos,
            elapsed: 0,
            kind,
        }
    }

    /// Expansion fraction of the animation, `0.0..=1.0` over its lifetime.
    pub fn radius_frac(&self) -> f32 {
        self.elapsed as f32 / TELEPORT_IN_EXPAND_MS as f32
    }

    /// Fully opaque through the first half of the expansion, then a linear
    /// fade to zero at full radius.
    pub fn alpha(&self) -> f32 {
        let radius = self.radius_frac();
        if radius > 0.5 {
            (1.0 - radius) / 0.5
        } else {
            1.0
        }
    }

    /// True once elapsed time is strictly past the expansion duration; an
    /// effect at exactly the boundary renders one last full-radius frame.
    pub fn expired(&self) -> bool {
        self.elapsed > TELEPORT_IN_EXPAND_MS
    }

    /// Submit one ring draw at the world position plus `camera_offset`.
    pub fn render<R: FxRenderer>(&self, camera_offset: Vec2, sink: &mut R) {
        sink.draw_teleport_ring(
            self.pos + camera_offset,
            self.kind,
            self.radius_frac(),
            TELEPORT_IN_RADIUS,
            self.alpha(),
        );
    }
}
