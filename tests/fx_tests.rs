//! Headless integration tests for the effect plugins.
//!
//! A bare `App` plus a hand-advanced `Time` resource drives the full
//! simulation wiring — no window, no rendering backend.  `MinimalPlugins`
//! is deliberately not used: its time plugin rewrites `Time` from the wall
//! clock every update, which would make lifetime assertions racy.
//!
//! Covered scenarios:
//! 1. Startup leaves the compiled config defaults in place when no
//!    `assets/effects.toml` exists.
//! 2. The idle systems age and remove effects on exact millisecond ticks.
//! 3. Delayed text survives its delay window through the plugin path.
//! 4. Registered trails age once per tick, one expiry per tick at most.
//! 5. Sustained emission volume stays inside the fixed pool capacity.
//! 6. A `RecordingRenderer` can snapshot live state between ticks.

use std::time::Duration;

use bevy::prelude::*;

use afterglow::config::FxConfig;
use afterglow::constants::{BLAST_LINE_SPEED, MAX_SPARKS, TRAIL_DROP_FREQ_MS};
use afterglow::effects::FxPlugin;
use afterglow::fx_manager::FxManager;
use afterglow::render::{RecordingRenderer, RenderPass};
use afterglow::spark::SparkKind;
use afterglow::trail::{TrailHandle, TrailProfile, TrailRegistry};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a headless app with the simulation plugin and a manual clock,
/// then run the startup frame (zero delta, so nothing ages).
fn fx_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(FxPlugin);
    app.update();
    app
}

/// Advance the clock by `ms` and run one frame.
fn tick(app: &mut App, ms: u64) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(ms));
    app.update();
}

/// Snapshot of the config resource for emit calls (avoids aliasing the
/// world borrow held by `resource_mut`).
fn config_of(app: &App) -> FxConfig {
    app.world().resource::<FxConfig>().clone()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// With no `assets/effects.toml` on disk, startup keeps compiled defaults.
#[test]
fn startup_keeps_compiled_defaults_without_a_config_file() {
    let app = fx_app();
    let config = app.world().resource::<FxConfig>();

    assert_eq!(config.blast_line_speed, BLAST_LINE_SPEED);
    assert_eq!(config.trail_drop_freq_ms, TRAIL_DROP_FREQ_MS);
}

/// A default text effect lives exactly its 2000 ms, counted in plugin ticks.
#[test]
fn idle_system_ages_and_removes_text_on_exact_ticks() {
    let mut app = fx_app();
    let config = config_of(&app);

    app.world_mut().resource_mut::<FxManager>().emit_text_effect(
        "+500",
        Srgba::WHITE,
        Vec2::new(40.0, 10.0),
        true,
        &config,
    );

    for _ in 0..4 {
        tick(&mut app, 500);
    }
    assert_eq!(
        app.world().resource::<FxManager>().text_count(),
        1,
        "ttl reaches zero on the 4th tick but pre-tick ttl was not below dt"
    );

    tick(&mut app, 500);
    assert_eq!(
        app.world().resource::<FxManager>().text_count(),
        0,
        "5th tick removes the spent effect"
    );
}

/// Delay gates removal and motion; the clearing tick applies its full delta.
#[test]
fn delayed_text_survives_its_delay_through_the_plugin() {
    let mut app = fx_app();
    let config = config_of(&app);

    app.world_mut()
        .resource_mut::<FxManager>()
        .emit_delayed_text_effect(1000, "Later", Srgba::WHITE, Vec2::ZERO, true, &config);

    tick(&mut app, 900);
    assert_eq!(app.world().resource::<FxManager>().text_count(), 1);

    // Delay clears inside this tick; ttl absorbs the whole 2100 ms.
    tick(&mut app, 2100);
    assert_eq!(app.world().resource::<FxManager>().text_count(), 1);

    tick(&mut app, 16);
    assert_eq!(app.world().resource::<FxManager>().text_count(), 0);
}

/// Trails age through `trail_idle_system`: the oldest node pops only once
/// its ttl runs out, and even a huge tick expires a single node.
#[test]
fn trails_age_once_per_tick_through_the_plugin() {
    let mut app = fx_app();

    let handle = {
        let mut trails = app.world_mut().resource_mut::<TrailRegistry>();
        let handle = trails.register(32, 15);
        for i in 0..5 {
            trails.update(handle, Vec2::new(i as f32 * 10.0, 0.0), TrailProfile::Ship);
        }
        handle
    };

    assert_eq!(trail_len(&app, handle), 5);

    tick(&mut app, 16); // oldest: 32 − 16 = 16, not < 16 → survives
    assert_eq!(trail_len(&app, handle), 5);

    tick(&mut app, 16); // oldest: 16 − 16 = 0, < 16 → pops
    assert_eq!(trail_len(&app, handle), 4);

    tick(&mut app, 10_000);
    assert_eq!(trail_len(&app, handle), 3, "a huge tick still pops only one node");
}

fn trail_len(app: &App, handle: TrailHandle) -> usize {
    app.world()
        .resource::<TrailRegistry>()
        .get(handle)
        .expect("trail is registered")
        .len()
}

/// 24 full blasts would overshoot both stores; occupancy must cap at the
/// pool limits (one free point slot, one free line pair).
#[test]
fn sustained_emission_caps_at_pool_capacity() {
    let mut app = fx_app();
    let config = config_of(&app);

    {
        let mut fx = app.world_mut().resource_mut::<FxManager>();
        for _ in 0..24 {
            fx.emit_blast(Vec2::ZERO, 150, &config);
        }
    }

    let fx = app.world().resource::<FxManager>();
    assert_eq!(fx.active_sparks(SparkKind::Point), MAX_SPARKS - 1);
    assert_eq!(fx.active_sparks(SparkKind::Line), MAX_SPARKS - 2);
}

/// The recording sink can snapshot a live frame for diagnostics: rings in
/// the under pass, batched geometry in the over pass.
#[test]
fn recording_renderer_snapshots_live_state_between_ticks() {
    let mut app = fx_app();
    let config = config_of(&app);

    // A frame passes, then the burst of emissions lands mid-frame.
    tick(&mut app, 16);
    {
        let mut fx = app.world_mut().resource_mut::<FxManager>();
        fx.emit_blast(Vec2::ZERO, 150, &config);
        fx.emit_teleport_in_effect(Vec2::new(50.0, 0.0), 0);
    }

    let fx = app.world().resource::<FxManager>();
    let mut sink = RecordingRenderer::new();
    fx.render(RenderPass::Under, Vec2::ZERO, &mut sink);
    assert_eq!(sink.ring_count(), 1);
    assert_eq!(sink.point_vertices(), 0, "sparks wait for the over pass");

    sink.clear();
    fx.render(RenderPass::Over, Vec2::ZERO, &mut sink);
    assert_eq!(sink.ring_count(), 0);
    assert_eq!(sink.point_vertices(), 360);
    assert_eq!(sink.line_vertices(), 720);
}
