//! Tumbling polygon debris thrown off by destroyed ships and structures.
//!
//! A [`DebrisChunk`] is a closed outline in local space plus enough state to
//! fly, spin, and fade.  The chunks themselves live in a plain collection on
//! the effect manager; this module owns the per-chunk update and draw logic.

use bevy::prelude::*;

use crate::constants::DEBRIS_FADE_MS;
use crate::render::FxRenderer;

/// A polygon fragment with linear and angular motion and a lifetime.
#[derive(Debug, Clone)]
pub struct DebrisChunk {
    /// Outline vertices in local space about the chunk's origin.
    pub points: Vec<Vec2>,
    pub color: Srgba,
    pub pos: Vec2,
    pub vel: Vec2,
    pub ttl: i32,
    /// Current orientation (radians).
    pub angle: f32,
    /// Spin rate (radians/s).
    pub rotation: f32,
}

impl DebrisChunk {
    /// Integrate position and orientation and burn lifetime.
    pub fn idle(&mut self, dt: u32) {
        let dt_secs = dt as f32 * 0.001;

        self.pos += self.vel * dt_secs;
        self.angle += self.rotation * dt_secs;
        self.ttl -= dt as i32;
    }

    /// Opaque until the final quarter second, then a linear fade out.
    pub fn alpha(&self) -> f32 {
        if self.ttl < DEBRIS_FADE_MS {
            self.ttl as f32 / DEBRIS_FADE_MS as f32
        } else {
            1.0
        }
    }

    /// Submit the outline as a closed loop, rotated and translated into
    /// world space with `camera_offset` applied.
    pub fn render<R: FxRenderer>(&self, camera_offset: Vec2, sink: &mut R) {
        let rot = Vec2::from_angle(self.angle);
        let world: Vec<Vec2> = self
            .points
            .iter()
            .map(|p| rot.rotate(*p) + self.pos + camera_offset)
            .collect();

        sink.draw_line_loop(&world, self.color.with_alpha(self.alpha()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, RecordingRenderer};

    fn chunk() -> DebrisChunk {
        DebrisChunk {
            points: vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)],
            color: Srgba::WHITE,
            pos: Vec2::new(100.0, 0.0),
            vel: Vec2::new(10.0, -20.0),
            ttl: 1000,
            angle: 0.0,
            rotation: std::f32::consts::PI,
        }
    }

    #[test]
    fn idle_integrates_motion_and_spin() {
        let mut debris = chunk();
        debris.idle(500);

        assert!((debris.pos.x - 105.0).abs() < 1e-4);
        assert!((debris.pos.y + 10.0).abs() < 1e-4);
        assert!((debris.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        assert_eq!(debris.ttl, 500);
    }

    #[test]
    fn alpha_fades_over_final_quarter_second() {
        let mut debris = chunk();
        assert_eq!(debris.alpha(), 1.0);

        debris.ttl = 125;
        assert!((debris.alpha() - 0.5).abs() < 1e-4);

        debris.ttl = 0;
        assert_eq!(debris.alpha(), 0.0);
    }

    #[test]
    fn render_transforms_the_outline_into_world_space() {
        let mut debris = chunk();
        debris.angle = std::f32::consts::FRAC_PI_2;

        let mut sink = RecordingRenderer::new();
        debris.render(Vec2::new(0.0, 5.0), &mut sink);

        let DrawCall::LineLoop { points, color } = &sink.calls[0] else {
            panic!("expected a line loop");
        };
        // Local (1, 0) rotated a quarter turn becomes (0, 1), then translated.
        assert!((points[0] - Vec2::new(100.0, 6.0)).length() < 1e-4);
        assert_eq!(points.len(), 3);
        assert_eq!(color.alpha, 1.0);
    }
}
