use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

use afterglow::config::{load_effects_config, FxConfig};
use afterglow::effects::{FxPlugin, FxRenderPlugin};
use afterglow::fx_manager::FxManager;
use afterglow::trail::{TrailHandle, TrailProfile, TrailRegistry};

/// Demo ship flying a fixed figure path, towing a registered trail.
#[derive(Component)]
struct DemoShip {
    trail: TrailHandle,
}

/// Cycles through every emitter so the whole effect vocabulary is on screen
/// within a few seconds of launch.
#[derive(Resource)]
struct FxDirector {
    countdown: f32,
    step: u32,
}

impl Default for FxDirector {
    fn default() -> Self {
        Self {
            countdown: 1.0,
            step: 0,
        }
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Afterglow Effects Demo".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .init_resource::<FxDirector>()
        .add_plugins(FxPlugin)
        .add_plugins(FxRenderPlugin)
        .add_systems(
            Startup,
            (
                setup_camera,
                // Config first so the trail is registered with final tunables.
                spawn_demo_ship.after(load_effects_config),
            ),
        )
        .add_systems(
            Update,
            (ship_flight_system, director_system, demo_input_system),
        )
        .run();
}

/// Setup camera for 2D rendering.
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}

/// Spawn the demo ship mesh and register its motion trail.
fn spawn_demo_ship(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut trails: ResMut<TrailRegistry>,
    config: Res<FxConfig>,
) {
    let trail = trails.register(config.trail_drop_freq_ms, config.trail_length as usize);

    let mesh = meshes.add(filled_polygon_mesh(&ship_vertices()));
    let mat = materials.add(ColorMaterial::from_color(Color::srgb(0.10, 0.32, 0.34)));

    commands.spawn((
        DemoShip { trail },
        Mesh2d(mesh),
        MeshMaterial2d(mat),
        Transform::from_xyz(0.0, 0.0, 1.0),
    ));
    eprintln!("[SETUP] Demo ship spawned");
}

/// Fly the ship along a Lissajous figure and feed its trail every frame.
///
/// The ship "boosts" on a fixed rhythm; boosting switches the trail to the
/// turbo profile so both trail looks get exercised.
fn ship_flight_system(
    time: Res<Time>,
    mut trails: ResMut<TrailRegistry>,
    mut ships: Query<(&mut Transform, &DemoShip)>,
) {
    let t = time.elapsed_secs();
    let pos = Vec2::new(340.0 * (0.55 * t).sin(), 190.0 * (0.9 * t + 1.3).sin());
    let heading = Vec2::new(
        340.0 * 0.55 * (0.55 * t).cos(),
        190.0 * 0.9 * (0.9 * t + 1.3).cos(),
    );

    let boosting = t % 6.0 < 1.8;
    let profile = if boosting {
        TrailProfile::TurboShip
    } else {
        TrailProfile::Ship
    };

    for (mut transform, ship) in ships.iter_mut() {
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
        // Nose points along local +Y.
        transform.rotation = Quat::from_rotation_z(heading.y.atan2(heading.x) - std::f32::consts::FRAC_PI_2);

        trails.update(ship.trail, pos, profile);
    }
}

/// Fire the next showcase emission every 1.2 s, cycling through the lot.
fn director_system(
    time: Res<Time>,
    mut director: ResMut<FxDirector>,
    mut fx: ResMut<FxManager>,
    config: Res<FxConfig>,
    ships: Query<&Transform, With<DemoShip>>,
) {
    director.countdown -= time.delta_secs();
    if director.countdown > 0.0 {
        return;
    }
    director.countdown = 1.2;

    let Ok(ship) = ships.single() else {
        return;
    };

    let mut rng = rand::thread_rng();
    let at = ship.translation.truncate()
        + Vec2::new(rng.gen_range(-220.0..220.0), rng.gen_range(-150.0..150.0));

    match director.step % 8 {
        0 => fx.emit_blast(at, 150, &config),
        1 => {
            let palette = [
                Srgba::new(1.0, 0.25, 0.0, 1.0),
                Srgba::new(1.0, 0.6, 0.1, 1.0),
                Srgba::new(1.0, 1.0, 0.4, 1.0),
            ];
            fx.emit_explosion(at, 1.0, &palette, &config);
        }
        2 => fx.emit_burst(
            at,
            Vec2::new(30.0, 12.0),
            Srgba::new(0.2, 1.0, 1.0, 1.0),
            Srgba::new(0.1, 0.3, 1.0, 1.0),
            &config,
        ),
        3 => {
            // A small shower of metal shards.
            for _ in 0..6 {
                let points = vec![
                    Vec2::new(rng.gen_range(3.0..7.0), 0.0),
                    Vec2::new(rng.gen_range(-4.0..-1.0), rng.gen_range(2.0..5.0)),
                    Vec2::new(rng.gen_range(-4.0..-1.0), rng.gen_range(-5.0..-2.0)),
                ];
                let vel = Vec2::new(rng.gen_range(-90.0..90.0), rng.gen_range(-90.0..90.0));
                fx.emit_debris_chunk(
                    points,
                    Srgba::new(0.7, 0.7, 0.75, 1.0),
                    at,
                    vel,
                    rng.gen_range(2500..4500),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    rng.gen_range(-3.0..3.0),
                );
            }
        }
        4 => fx.emit_text_effect("+500", Srgba::new(1.0, 0.9, 0.3, 1.0), at, true, &config),
        5 => {
            fx.emit_text_effect("Nice shot!", Srgba::new(0.4, 1.0, 0.6, 1.0), at, true, &config);
            fx.emit_delayed_text_effect(
                400,
                "Double kill!",
                Srgba::new(1.0, 0.5, 0.3, 1.0),
                at + Vec2::new(0.0, -60.0),
                true,
                &config,
            );
        }
        // Alternate the ring tint each time around the cycle.
        6 => fx.emit_teleport_in_effect(at, (director.step / 8) % 2),
        _ => fx.emit_text_effect(
            "WAVE CLEAR",
            Srgba::new(0.35, 1.0, 0.55, 1.0),
            Vec2::new(0.0, -150.0),
            false,
            &config,
        ),
    }

    director.step = director.step.wrapping_add(1);
}

/// C wipes sparks, R runs the end-of-level sweep.
fn demo_input_system(keys: Res<ButtonInput<KeyCode>>, mut fx: ResMut<FxManager>) {
    if keys.just_pressed(KeyCode::KeyC) {
        fx.clear_sparks();
    }
    if keys.just_pressed(KeyCode::KeyR) {
        fx.on_level_end();
    }
}

// ── Ship geometry ─────────────────────────────────────────────────────────────

/// Local-space vertices of the demo ship (nose along +Y).
///
/// A dart: long nose, two swept-back fins, shallow tail notch between them.
fn ship_vertices() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 14.0),  // nose
        Vec2::new(-9.0, -9.0), // left fin tip
        Vec2::new(0.0, -5.0),  // tail notch
        Vec2::new(9.0, -9.0),  // right fin tip
    ]
}

/// Fan-triangulate a polygon into a renderable [`Mesh`].
///
/// Triangle fan from vertex 0: triangles `(0, i, i+1)`.  Fine for the dart
/// because every vertex is visible from the nose.
fn filled_polygon_mesh(vertices: &[Vec2]) -> Mesh {
    let n = vertices.len();
    debug_assert!(n >= 3, "polygon must have ≥ 3 vertices");

    let positions: Vec<[f32; 3]> = vertices.iter().map(|v| [v.x, v.y, 0.0]).collect();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];
    // Map the ±15-unit hull to a rough 0–1 UV range.
    let uvs: Vec<[f32; 2]> = vertices
        .iter()
        .map(|v| [(v.x / 30.0) + 0.5, (v.y / 30.0) + 0.5])
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity((n - 2) * 3);
    for i in 1..(n as u32 - 1) {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
