//! The effect manager: one facade owning every transient visual effect.
//!
//! ## Design
//!
//! Game-rule code calls `emit_*` once per event; the frame driver calls
//! [`FxManager::idle`] once per tick; the renderer calls
//! [`FxManager::render`] twice (pass [`RenderPass::Under`] then
//! [`RenderPass::Over`]) plus [`FxManager::render_screen_effects`] for the
//! viewport-fixed text.  All of it is synchronous, single-threaded, and
//! total — emission never fails, saturation degrades visuals instead.
//!
//! | Operation               | Effect family      | Notes                          |
//! |-------------------------|--------------------|--------------------------------|
//! | `emit_spark`            | spark pool         | building block for the below   |
//! | `emit_blast`            | spark pool         | 360° bomb ring, point + line   |
//! | `emit_explosion`        | spark pool         | palette-sampled radial burst   |
//! | `emit_burst`            | spark pool         | two-color elliptical burst     |
//! | `emit_debris_chunk`     | debris             | tumbling polygon outline       |
//! | `emit_text_effect`      | world/screen text  | `relative` picks the collection|
//! | `emit_teleport_in_effect` | teleport rings   | drawn beneath everything else  |
//!
//! Motion trails deliberately live elsewhere (see
//! [`crate::trail::TrailRegistry`]): their owners outlive any one effect
//! frame, so they register and deregister explicitly instead of being
//! emitted.

use bevy::prelude::*;
use rand::Rng;

use crate::config::FxConfig;
use crate::constants::SCREEN_TEXT_EFFECT_SCALE;
use crate::debris::DebrisChunk;
use crate::render::{FxRenderer, RenderPass, TextDraw, TextSpace};
use crate::spark::{SparkKind, SparkPool};
use crate::teleport::TeleporterEffect;
use crate::text_effect::TextEffect;

/// Owner of all live effect state.
#[derive(Resource, Default)]
pub struct FxManager {
    sparks: SparkPool,
    debris: Vec<DebrisChunk>,
    /// World-relative floating text, offset by the camera at render time.
    text_effects: Vec<TextEffect>,
    /// Viewport-relative floating text, positioned about the screen centre.
    screen_text_effects: Vec<TextEffect>,
    teleporter_effects: Vec<TeleporterEffect>,
}

impl FxManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Emission ─────────────────────────────────────────────────────────────

    /// Emit one spark; `ttl <= 0` picks a random lifetime.
    pub fn emit_spark(&mut self, pos: Vec2, vel: Vec2, color: Srgba, ttl: i32, kind: SparkKind) {
        self.sparks.emit(pos, vel, color, ttl, kind);
    }

    /// A circular bomb ring: per degree, one yellow point spark with random
    /// outward speed and one orange line spark racing out at the configured
    /// speed, its ttl the travel time from the ring to `size` units out.
    ///
    /// A `size` inside the ring radius yields non-positive line ttls, which
    /// the pool replaces with random lifetimes — callers get a defined (if
    /// scruffy) visual rather than an error.
    pub fn emit_blast(&mut self, pos: Vec2, size: u32, config: &FxConfig) {
        let speed = config.blast_line_speed;
        let point_ttl_max = (1000.0 * (1000.0 / speed)) as i32;
        let line_ttl = (1000.0 * (size as f32 - config.blast_ring_radius) / speed) as i32;
        let mut rng = rand::thread_rng();

        for degree in 0..360 {
            let dir = Vec2::from_angle((degree as f32).to_radians());
            let ring_pos = pos + dir * config.blast_ring_radius;

            self.sparks.emit(
                ring_pos,
                dir * rng.gen::<f32>() * config.blast_point_speed,
                Srgba::new(1.0, 1.0, 0.0, 1.0),
                rng.gen_range(0..=point_ttl_max),
                SparkKind::Point,
            );
            self.sparks.emit(
                ring_pos,
                dir * speed,
                Srgba::new(1.0, 0.8, 0.45, 1.0),
                line_ttl,
                SparkKind::Line,
            );
        }
    }

    /// A dense radial explosion: `explosion_sparks_per_unit × size` point
    /// sparks, colors sampled uniformly from `palette`, speed and ttl both
    /// scaled by `size`.  Half the speeds come out negative, which folds the
    /// spray back through the origin for a hot core.
    ///
    /// An empty palette emits nothing.
    pub fn emit_explosion(&mut self, pos: Vec2, size: f32, palette: &[Srgba], config: &FxConfig) {
        if palette.is_empty() {
            return;
        }

        let count = (config.explosion_sparks_per_unit * size).ceil() as u32;
        let mut rng = rand::thread_rng();

        for _ in 0..count {
            let th = rng.gen::<f32>() * std::f32::consts::TAU;
            let f = (rng.gen::<f32>() * 2.0 - 1.0) * config.explosion_speed * size;
            let color = palette[rng.gen_range(0..palette.len())];
            let ttl = ((rng.gen_range(0..=1000) + config.explosion_base_ttl_ms) as f32 * size) as i32;

            self.sparks.emit(
                pos,
                Vec2::new(th.cos(), th.sin()) * f,
                color,
                ttl,
                SparkKind::Point,
            );
        }
    }

    /// [`Self::emit_burst_with_count`] at the configured default count.
    pub fn emit_burst(
        &mut self,
        pos: Vec2,
        scale: Vec2,
        color1: Srgba,
        color2: Srgba,
        config: &FxConfig,
    ) {
        self.emit_burst_with_count(pos, scale, color1, color2, config.burst_default_count, config);
    }

    /// An elliptical confetti burst: point sparks on random headings, each a
    /// random blend of the two colors, position and velocity scaled per axis
    /// by `scale` so pickups can squash the shape to their footprint.
    pub fn emit_burst_with_count(
        &mut self,
        pos: Vec2,
        scale: Vec2,
        color1: Srgba,
        color2: Srgba,
        count: u32,
        config: &FxConfig,
    ) {
        let mut rng = rand::thread_rng();

        for _ in 0..count {
            let th = rng.gen::<f32>() * std::f32::consts::TAU;
            let f = (rng.gen::<f32>() * 0.1 + 0.9) * config.burst_speed;
            let offset = Vec2::new(th.cos() * scale.x, th.sin() * scale.y);
            let color = color1.mix(&color2, rng.gen::<f32>());
            let ttl = (rng.gen_range(0..=1000) as f32 * scale.length() * 3.0
                + 1000.0 * scale.length()) as i32;

            self.sparks.emit(pos + offset, offset * f, color, ttl, SparkKind::Point);
        }
    }

    /// Add one tumbling debris fragment.  `points` is the outline in local
    /// space; `angle` and `rotation` are radians and radians/s.
    #[allow(clippy::too_many_arguments)]
    pub fn emit_debris_chunk(
        &mut self,
        points: Vec<Vec2>,
        color: Srgba,
        pos: Vec2,
        vel: Vec2,
        ttl: i32,
        angle: f32,
        rotation: f32,
    ) {
        self.debris.push(DebrisChunk {
            points,
            color,
            pos,
            vel,
            ttl,
            angle,
            rotation,
        });
    }

    /// Floating text with no start delay.  `relative = true` places it in
    /// the world (camera-offset at render time); `false` pins it to the
    /// viewport via [`Self::render_screen_effects`].
    pub fn emit_text_effect(
        &mut self,
        text: impl Into<String>,
        color: Srgba,
        pos: Vec2,
        relative: bool,
        config: &FxConfig,
    ) {
        self.emit_delayed_text_effect(0, text, color, pos, relative, config);
    }

    /// Floating text that stays invisible and frozen for `delay` ms first.
    /// Staggered delays are how multi-line level banners stack.
    pub fn emit_delayed_text_effect(
        &mut self,
        delay: u32,
        text: impl Into<String>,
        color: Srgba,
        pos: Vec2,
        relative: bool,
        config: &FxConfig,
    ) {
        let effect = TextEffect {
            text: text.into(),
            color,
            pos,
            vel: Vec2::new(0.0, config.text_velocity_y),
            size: 0.0,
            growth_rate: config.text_growth_rate,
            ttl: config.text_ttl_ms,
            delay,
        };

        if relative {
            self.text_effects.push(effect);
        } else {
            self.screen_text_effects.push(effect);
        }
    }

    /// Start a teleport-in ring at `pos`.  `kind` is backend styling.
    pub fn emit_teleport_in_effect(&mut self, pos: Vec2, kind: u32) {
        self.teleporter_effects.push(TeleporterEffect::new(pos, kind));
    }

    // ── Frame driving ────────────────────────────────────────────────────────

    /// Age every live effect by `dt` milliseconds and drop the expired.
    ///
    /// Debris and text check expiry against their *pre-tick* ttl, matching
    /// the spark pool's strict rule: an effect ticking to exactly zero still
    /// renders one final frame.
    pub fn idle(&mut self, dt: u32) {
        self.sparks.idle(dt);

        self.debris.retain_mut(|chunk| {
            if chunk.ttl < dt as i32 {
                false
            } else {
                chunk.idle(dt);
                true
            }
        });

        self.text_effects.retain_mut(|text| {
            if text.delay == 0 && text.ttl < dt {
                false
            } else {
                text.idle(dt);
                true
            }
        });

        self.screen_text_effects.retain_mut(|text| {
            if text.delay == 0 && text.ttl < dt {
                false
            } else {
                text.idle(dt);
                true
            }
        });

        self.teleporter_effects.retain_mut(|effect| {
            effect.elapsed += dt;
            !effect.expired()
        });
    }

    /// Draw one render pass.
    ///
    /// `Under` submits only teleport rings; `Over` submits sparks (lines
    /// beneath points), then debris outlines, then world text.  Callers must
    /// draw `Under` before `Over` each frame for correct layering, and run
    /// [`Self::idle`] before either.  `camera_offset` is added to every
    /// world-space position handed to the sink.
    pub fn render<R: FxRenderer>(&self, pass: RenderPass, camera_offset: Vec2, sink: &mut R) {
        match pass {
            RenderPass::Under => {
                for effect in &self.teleporter_effects {
                    effect.render(camera_offset, sink);
                }
            }
            RenderPass::Over => {
                self.sparks.render(camera_offset, sink);

                for chunk in &self.debris {
                    chunk.render(camera_offset, sink);
                }

                for text in &self.text_effects {
                    sink.draw_text(&TextDraw {
                        text: text.text.clone(),
                        pos: text.pos + camera_offset,
                        scale: text.scale(),
                        color: text.color.with_alpha(text.alpha()),
                        space: TextSpace::World,
                    });
                }
            }
        }
    }

    /// Draw the viewport-fixed text about `screen_center`, at the reduced
    /// screen-pass scale.
    pub fn render_screen_effects<R: FxRenderer>(&self, screen_center: Vec2, sink: &mut R) {
        for text in &self.screen_text_effects {
            sink.draw_text(&TextDraw {
                text: text.text.clone(),
                pos: screen_center + text.pos * SCREEN_TEXT_EFFECT_SCALE,
                scale: text.scale() * SCREEN_TEXT_EFFECT_SCALE,
                color: text.color.with_alpha(text.alpha()),
                space: TextSpace::Screen,
            });
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Drop every live spark; other effect families are untouched.
    pub fn clear_sparks(&mut self) {
        self.sparks.clear();
    }

    /// End-of-level sweep: sparks, debris, and both text collections are
    /// cleared.  Teleport rings are left to finish their animation — they
    /// are sub-two-seconds long and vanish on their own.
    // TODO: ask design whether teleporters should clear here too; so far
    // every caller has wanted the rings to finish.
    pub fn on_level_end(&mut self) {
        self.clear_sparks();
        self.debris.clear();
        self.text_effects.clear();
        self.screen_text_effects.clear();
    }

    // ── Introspection ────────────────────────────────────────────────────────

    /// Live slot count for a spark kind (a line spark occupies two slots).
    pub fn active_sparks(&self, kind: SparkKind) -> usize {
        self.sparks.active(kind)
    }

    pub fn debris_count(&self) -> usize {
        self.debris.len()
    }

    pub fn text_count(&self) -> usize {
        self.text_effects.len()
    }

    pub fn screen_text_count(&self) -> usize {
        self.screen_text_effects.len()
    }

    pub fn teleporter_count(&self) -> usize {
        self.teleporter_effects.len()
    }

    /// Direct pool access for tests and diagnostics.
    pub fn spark_pool(&self) -> &SparkPool {
        &self.sparks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BLAST_RING_RADIUS, TELEPORT_IN_EXPAND_MS};
    use crate::render::{DrawCall, RecordingRenderer};

    fn manager() -> (FxManager, FxConfig) {
        (FxManager::new(), FxConfig::default())
    }

    // ── Compound emissions ───────────────────────────────────────────────────

    #[test]
    fn blast_emits_one_point_and_one_line_pair_per_degree() {
        let (mut fx, config) = manager();
        fx.emit_blast(Vec2::ZERO, 100, &config);

        assert_eq!(fx.active_sparks(SparkKind::Point), 360);
        assert_eq!(fx.active_sparks(SparkKind::Line), 720, "360 line sparks, two slots each");

        // Heads are born on the ring, not at the centre.
        let head = fx.spark_pool().get(SparkKind::Line, 0).unwrap();
        assert!((head.pos.length() - BLAST_RING_RADIUS).abs() < 1e-3);

        // Line ttl is the travel time from ring to blast edge:
        // 1000 × (100 − 50) / 800 = 62 ms.
        assert_eq!(head.ttl, 62);
    }

    #[test]
    fn explosion_count_and_ttl_scale_with_size() {
        let (mut fx, config) = manager();
        let palette = [Srgba::RED, Srgba::new(1.0, 0.5, 0.0, 1.0)];

        fx.emit_explosion(Vec2::ZERO, 1.0, &palette, &config);
        assert_eq!(fx.active_sparks(SparkKind::Point), 250);

        // Base ttl window is 2000..=3000 at size 1, doubled at size 2.
        let (mut fx, config) = manager();
        fx.emit_explosion(Vec2::ZERO, 2.0, &palette, &config);
        assert_eq!(fx.active_sparks(SparkKind::Point), 500);
        for i in 0..fx.active_sparks(SparkKind::Point) {
            let ttl = fx.spark_pool().get(SparkKind::Point, i).unwrap().ttl;
            assert!((4000..=6000).contains(&ttl), "size-2 ttl {ttl} out of window");
        }
    }

    #[test]
    fn explosion_with_empty_palette_emits_nothing() {
        let (mut fx, config) = manager();
        fx.emit_explosion(Vec2::ZERO, 1.0, &[], &config);
        assert_eq!(fx.active_sparks(SparkKind::Point), 0);
    }

    #[test]
    fn burst_defaults_to_the_configured_count() {
        let (mut fx, config) = manager();
        fx.emit_burst(Vec2::ZERO, Vec2::splat(1.0), Srgba::new(0.0, 1.0, 1.0, 1.0), Srgba::BLUE, &config);
        assert_eq!(fx.active_sparks(SparkKind::Point), 250);

        let (mut fx, config) = manager();
        fx.emit_burst_with_count(
            Vec2::ZERO,
            Vec2::splat(1.0),
            Srgba::new(0.0, 1.0, 1.0, 1.0),
            Srgba::BLUE,
            40,
            &config,
        );
        assert_eq!(fx.active_sparks(SparkKind::Point), 40);
    }

    #[test]
    fn burst_scale_shapes_position_and_velocity_per_axis() {
        let (mut fx, config) = manager();
        // Flat ellipse: y axis crushed to zero.
        fx.emit_burst_with_count(
            Vec2::ZERO,
            Vec2::new(2.0, 0.0),
            Srgba::WHITE,
            Srgba::WHITE,
            50,
            &config,
        );
        for i in 0..50 {
            let spark = fx.spark_pool().get(SparkKind::Point, i).unwrap();
            assert_eq!(spark.pos.y, 0.0, "y axis scale 0 pins births to the x axis");
            assert_eq!(spark.vel.y, 0.0);
            assert!(spark.pos.x.abs() <= 2.0);
        }
    }

    // ── Text lifecycle ───────────────────────────────────────────────────────

    #[test]
    fn text_effect_expires_after_its_lifetime() {
        let (mut fx, config) = manager();
        fx.emit_text_effect("Hi", Srgba::RED, Vec2::new(10.0, 20.0), true, &config);
        assert_eq!(fx.text_count(), 1);

        fx.idle(2000); // pre-tick ttl 2000 is not < 2000: survives at zero
        assert_eq!(fx.text_count(), 1);

        fx.idle(2000);
        assert_eq!(fx.text_count(), 0, "second tick removes the spent effect");
    }

    #[test]
    fn delayed_text_survives_its_delay_window() {
        let (mut fx, config) = manager();
        fx.emit_delayed_text_effect(3000, "Later", Srgba::RED, Vec2::ZERO, true, &config);

        // Longer than the 2000 ms ttl, but the delay holds removal off.
        fx.idle(2500);
        assert_eq!(fx.text_count(), 1, "still delayed, not removable");

        fx.idle(2500); // delay cleared this tick, full 2500 ms applied
        assert_eq!(fx.text_count(), 1, "pre-tick ttl was still 2000");
        fx.idle(16);
        assert_eq!(fx.text_count(), 0);
    }

    #[test]
    fn relative_flag_routes_between_world_and_screen_collections() {
        let (mut fx, config) = manager();
        fx.emit_text_effect("world", Srgba::WHITE, Vec2::ZERO, true, &config);
        fx.emit_text_effect("screen", Srgba::WHITE, Vec2::ZERO, false, &config);

        assert_eq!(fx.text_count(), 1);
        assert_eq!(fx.screen_text_count(), 1);
    }

    // ── Teleporters ──────────────────────────────────────────────────────────

    #[test]
    fn teleporter_expires_strictly_after_the_expansion() {
        let (mut fx, _config) = manager();
        fx.emit_teleport_in_effect(Vec2::ZERO, 0);

        fx.idle(TELEPORT_IN_EXPAND_MS - 1);
        assert_eq!(fx.teleporter_count(), 1);

        let mut sink = RecordingRenderer::new();
        fx.render(RenderPass::Under, Vec2::ZERO, &mut sink);
        let DrawCall::TeleportRing { radius_frac, .. } = sink.calls[0] else {
            panic!("expected a ring");
        };
        assert!(radius_frac > 0.0 && radius_frac < 1.0);

        fx.idle(2); // total elapsed now expand + 1
        assert_eq!(fx.teleporter_count(), 0);
    }

    // ── Lifecycle sweeps ─────────────────────────────────────────────────────

    #[test]
    fn level_end_keeps_teleporters() {
        let (mut fx, config) = manager();
        fx.emit_blast(Vec2::ZERO, 100, &config);
        fx.emit_debris_chunk(vec![Vec2::X, Vec2::Y], Srgba::new(0.5, 0.5, 0.5, 1.0), Vec2::ZERO, Vec2::ZERO, 5000, 0.0, 1.0);
        fx.emit_text_effect("world", Srgba::WHITE, Vec2::ZERO, true, &config);
        fx.emit_text_effect("screen", Srgba::WHITE, Vec2::ZERO, false, &config);
        fx.emit_teleport_in_effect(Vec2::ZERO, 0);

        fx.on_level_end();

        assert_eq!(fx.active_sparks(SparkKind::Point), 0);
        assert_eq!(fx.active_sparks(SparkKind::Line), 0);
        assert_eq!(fx.debris_count(), 0);
        assert_eq!(fx.text_count(), 0);
        assert_eq!(fx.screen_text_count(), 0);
        assert_eq!(fx.teleporter_count(), 1, "teleport rings finish on their own");
    }

    #[test]
    fn debris_expires_against_pre_tick_ttl() {
        let (mut fx, _config) = manager();
        fx.emit_debris_chunk(vec![Vec2::X], Srgba::new(0.5, 0.5, 0.5, 1.0), Vec2::ZERO, Vec2::ZERO, 100, 0.0, 0.0);

        fx.idle(100); // 100 < 100 is false: survives and ticks to zero
        assert_eq!(fx.debris_count(), 1);

        fx.idle(1);
        assert_eq!(fx.debris_count(), 0);
    }

    // ── Render passes ────────────────────────────────────────────────────────

    #[test]
    fn under_pass_submits_rings_only() {
        let (mut fx, config) = manager();
        fx.emit_blast(Vec2::ZERO, 100, &config);
        fx.emit_teleport_in_effect(Vec2::ZERO, 0);

        let mut sink = RecordingRenderer::new();
        fx.render(RenderPass::Under, Vec2::ZERO, &mut sink);

        assert_eq!(sink.ring_count(), 1);
        assert_eq!(sink.calls.len(), 1, "nothing but rings in the under pass");
    }

    #[test]
    fn over_pass_orders_lines_points_debris_then_text() {
        let (mut fx, config) = manager();
        fx.emit_spark(Vec2::ZERO, Vec2::X, Srgba::WHITE, 5000, SparkKind::Line);
        fx.emit_spark(Vec2::ZERO, Vec2::ZERO, Srgba::WHITE, 5000, SparkKind::Point);
        fx.emit_debris_chunk(vec![Vec2::X, Vec2::Y], Srgba::new(0.5, 0.5, 0.5, 1.0), Vec2::ZERO, Vec2::ZERO, 5000, 0.0, 0.0);
        fx.emit_text_effect("hit", Srgba::RED, Vec2::new(3.0, 0.0), true, &config);
        fx.emit_teleport_in_effect(Vec2::ZERO, 0);

        let mut sink = RecordingRenderer::new();
        fx.render(RenderPass::Over, Vec2::new(7.0, 0.0), &mut sink);

        assert_eq!(sink.calls.len(), 4);
        assert!(matches!(sink.calls[0], DrawCall::LinePairs(_)));
        assert!(matches!(sink.calls[1], DrawCall::Points(_)));
        assert!(matches!(sink.calls[2], DrawCall::LineLoop { .. }));
        let DrawCall::Text(draw) = &sink.calls[3] else {
            panic!("expected text last");
        };
        assert_eq!(draw.pos, Vec2::new(10.0, 0.0), "camera offset applied to world text");
        assert_eq!(draw.space, TextSpace::World);
        assert_eq!(sink.ring_count(), 0, "rings belong to the under pass");
    }

    #[test]
    fn screen_effects_draw_about_the_centre_at_reduced_scale() {
        let (mut fx, config) = manager();
        fx.emit_text_effect("score", Srgba::WHITE, Vec2::new(30.0, -60.0), false, &config);

        // One second grows the text to full size (so scale is exactly the
        // pass scale) and applies one second of upward drift.
        fx.idle(1000);

        let mut sink = RecordingRenderer::new();
        fx.render_screen_effects(Vec2::new(400.0, 300.0), &mut sink);

        let drifted_y = -60.0 + config.text_velocity_y;
        let draw = sink.texts().next().expect("one screen text");
        assert_eq!(draw.space, TextSpace::Screen);
        assert!((draw.pos.x - (400.0 + 30.0 * SCREEN_TEXT_EFFECT_SCALE)).abs() < 1e-3);
        assert!((draw.pos.y - (300.0 + drifted_y * SCREEN_TEXT_EFFECT_SCALE)).abs() < 1e-3);
        assert!((draw.scale - SCREEN_TEXT_EFFECT_SCALE).abs() < 1e-4);
    }
}
