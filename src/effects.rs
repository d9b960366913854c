//! Bevy integration: resource wiring, frame driving, and a gizmo renderer.
//!
//! ## Design
//!
//! Two plugins split simulation from visuals so headless tests can run the
//! full effect lifecycle without a GPU:
//!
//! | Plugin             | Systems (Update)                                      |
//! |--------------------|-------------------------------------------------------|
//! | [`FxPlugin`]       | `fx_idle_system` → `trail_idle_system` (chained)      |
//! | [`FxRenderPlugin`] | `fx_render_system` → text visual sync (after idling)  |
//!
//! The render plugin draws sparks, debris, trails, and teleport rings as
//! immediate-mode gizmos, and mirrors the frame's text draws into pooled
//! text entities: update in place, spawn the deficit, despawn the surplus.
//! That is the particle layer's attach-visuals-later pattern applied to
//! text, with the same one-frame latency for a brand-new effect.
//!
//! All simulation time is whole milliseconds; sub-millisecond frame deltas
//! are skipped rather than rounded up.

use bevy::prelude::*;

use crate::config::{load_effects_config, FxConfig};
use crate::fx_manager::FxManager;
use crate::render::{FxRenderer, RenderPass, TextDraw, TextSpace};
use crate::trail::TrailRegistry;

/// Font size of a full-grown text effect; `TextDraw::scale` multiplies this.
const TEXT_BASE_FONT_SIZE: f32 = 120.0;

/// Half-extent of the cross drawn for one point spark.
const POINT_CROSS_HALF: f32 = 1.5;

/// Z layer for world-space text entities, above the gizmo layer's meshes.
const WORLD_TEXT_Z: f32 = 5.0;

// ── Simulation plugin ─────────────────────────────────────────────────────────

/// Headless-safe effect simulation: resources plus the idle systems.
///
/// Safe to add to a bare `App` — rendering, windowing, and assets are not
/// required.  The app must provide a `Time` resource (DefaultPlugins does;
/// headless tests insert one and advance it by hand).
pub struct FxPlugin;

impl Plugin for FxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FxManager>()
            .init_resource::<TrailRegistry>()
            .init_resource::<FxConfig>()
            .add_systems(Startup, load_effects_config)
            .add_systems(Update, (fx_idle_system, trail_idle_system).chain());
    }
}

/// Advance every managed effect by the frame delta, in whole milliseconds.
pub fn fx_idle_system(time: Res<Time>, mut fx: ResMut<FxManager>) {
    let dt = time.delta().as_millis() as u32;
    if dt == 0 {
        return;
    }
    fx.idle(dt);
}

/// Age every registered trail by the frame delta.
pub fn trail_idle_system(time: Res<Time>, mut trails: ResMut<TrailRegistry>) {
    let dt = time.delta().as_millis() as u32;
    if dt == 0 {
        return;
    }
    trails.idle(dt);
}

// ── Render plugin ─────────────────────────────────────────────────────────────

/// Visual layer for the demo: gizmo drawing plus text entity sync.
///
/// Requires [`FxPlugin`] (its systems order after the idle systems) and a
/// windowed app.  Headless tests leave this plugin out and assert against a
/// [`crate::render::RecordingRenderer`] instead.
pub struct FxRenderPlugin;

impl Plugin for FxRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameTexts>().add_systems(
            Update,
            (
                fx_render_system,
                sync_world_text_system,
                sync_screen_text_system,
            )
                .chain()
                .after(fx_idle_system)
                .after(trail_idle_system),
        );
    }
}

/// Text draws submitted by [`fx_render_system`] this frame, consumed by the
/// sync systems.  Cleared and refilled every frame.
#[derive(Resource, Default)]
pub struct FrameTexts(pub Vec<TextDraw>);

/// Marker for a pooled world-space text entity.
#[derive(Component)]
pub struct WorldTextVisual;

/// Marker for a pooled screen-space text node (text lives on its child).
#[derive(Component)]
pub struct ScreenTextVisual;

// ── Gizmo sink ────────────────────────────────────────────────────────────────

/// [`FxRenderer`] backed by Bevy's immediate-mode gizmos.
///
/// Geometry is drawn on the spot; text is only collected, because glyphs
/// need retained entities (see the sync systems).
pub struct GizmoRenderer<'w, 's> {
    pub gizmos: Gizmos<'w, 's>,
    pub texts: Vec<TextDraw>,
}

/// Ring tint per teleporter kind; unknown kinds fall back to white.
fn teleport_ring_color(kind: u32) -> Srgba {
    match kind {
        0 => Srgba::new(0.0, 0.85, 0.85, 1.0),
        1 => Srgba::new(1.0, 0.55, 0.10, 1.0),
        _ => Srgba::WHITE,
    }
}

impl FxRenderer for GizmoRenderer<'_, '_> {
    fn draw_points(&mut self, points: &[(Vec2, Srgba)]) {
        for &(pos, color) in points {
            let dx = Vec2::new(POINT_CROSS_HALF, 0.0);
            let dy = Vec2::new(0.0, POINT_CROSS_HALF);
            self.gizmos.line_2d(pos - dx, pos + dx, color);
            self.gizmos.line_2d(pos - dy, pos + dy, color);
        }
    }

    fn draw_line_pairs(&mut self, vertices: &[(Vec2, Srgba)]) {
        for pair in vertices.chunks_exact(2) {
            let (head, head_color) = pair[0];
            let (tail, tail_color) = pair[1];
            self.gizmos.line_gradient_2d(head, tail, head_color, tail_color);
        }
    }

    fn draw_line_loop(&mut self, points: &[Vec2], color: Srgba) {
        let n = points.len();
        if n < 2 {
            return;
        }
        for i in 0..n {
            self.gizmos.line_2d(points[i], points[(i + 1) % n], color);
        }
    }

    fn draw_gradient_strip(&mut self, vertices: &[(Vec2, Srgba)]) {
        self.gizmos.linestrip_gradient_2d(vertices.iter().copied());
    }

    fn draw_teleport_ring(
        &mut self,
        pos: Vec2,
        kind: u32,
        radius_frac: f32,
        max_radius: f32,
        alpha: f32,
    ) {
        let radius = radius_frac * max_radius;
        if radius <= 0.0 {
            return;
        }
        let tint = teleport_ring_color(kind);
        self.gizmos.circle_2d(pos, radius, tint.with_alpha(alpha));
        self.gizmos
            .circle_2d(pos, radius * 0.6, tint.with_alpha(alpha * 0.35));
    }

    fn draw_text(&mut self, draw: &TextDraw) {
        self.texts.push(draw.clone());
    }
}

// ── Render systems ────────────────────────────────────────────────────────────

/// Draw both effect passes, then trails, then collect screen text.
///
/// The Bevy camera owns the view transform, so world geometry is submitted
/// with a zero camera offset.  Screen text is centred on the primary
/// window's midpoint in UI coordinates (origin top-left, y down — the same
/// convention the screen-space effects were authored in).
pub fn fx_render_system(
    gizmos: Gizmos,
    fx: Res<FxManager>,
    trails: Res<TrailRegistry>,
    windows: Query<&Window>,
    mut frame_texts: ResMut<FrameTexts>,
) {
    let mut sink = GizmoRenderer {
        gizmos,
        texts: Vec::new(),
    };

    fx.render(RenderPass::Under, Vec2::ZERO, &mut sink);
    fx.render(RenderPass::Over, Vec2::ZERO, &mut sink);
    trails.render_trails(Vec2::ZERO, &mut sink);

    if let Ok(window) = windows.single() {
        let center = Vec2::new(window.width() / 2.0, window.height() / 2.0);
        fx.render_screen_effects(center, &mut sink);
    }

    frame_texts.0 = sink.texts;
}

/// Mirror this frame's world-space text draws into pooled `Text2d` entities.
///
/// Text grows via the transform scale (glyphs laid out once at the base
/// font size), so a growing effect never re-shapes its glyphs.
pub fn sync_world_text_system(
    mut commands: Commands,
    frame_texts: Res<FrameTexts>,
    mut pool: Query<
        (Entity, &mut Text2d, &mut Transform, &mut TextColor),
        With<WorldTextVisual>,
    >,
) {
    let draws: Vec<&TextDraw> = frame_texts
        .0
        .iter()
        .filter(|d| d.space == TextSpace::World && d.scale > 0.0)
        .collect();

    let mut live: Vec<_> = pool.iter_mut().collect();

    for (slot, draw) in draws.iter().enumerate() {
        if let Some((_, text, transform, color)) = live.get_mut(slot) {
            if text.0 != draw.text {
                text.0 = draw.text.clone();
            }
            transform.translation = draw.pos.extend(WORLD_TEXT_Z);
            transform.scale = Vec3::splat(draw.scale);
            color.0 = draw.color.into();
        } else {
            commands.spawn((
                WorldTextVisual,
                Text2d::new(draw.text.clone()),
                TextFont {
                    font_size: TEXT_BASE_FONT_SIZE,
                    ..default()
                },
                TextColor(draw.color.into()),
                Transform::from_translation(draw.pos.extend(WORLD_TEXT_Z))
                    .with_scale(Vec3::splat(draw.scale)),
            ));
        }
    }

    for (entity, ..) in live.iter().skip(draws.len()) {
        commands.entity(*entity).despawn();
    }
}

/// Mirror this frame's screen-space text draws into pooled UI nodes.
///
/// Each pooled node is a zero-size absolutely-positioned flex container
/// with a centred text child, so the text centres on the draw position the
/// way the world pass centres `Text2d`.
pub fn sync_screen_text_system(
    mut commands: Commands,
    frame_texts: Res<FrameTexts>,
    mut pool: Query<(Entity, &mut Node, &Children), With<ScreenTextVisual>>,
    mut text_query: Query<(&mut Text, &mut TextFont, &mut TextColor)>,
) {
    let draws: Vec<&TextDraw> = frame_texts
        .0
        .iter()
        .filter(|d| d.space == TextSpace::Screen && d.scale > 0.0)
        .collect();

    let mut live: Vec<_> = pool.iter_mut().collect();

    for (slot, draw) in draws.iter().enumerate() {
        if let Some((_, node, children)) = live.get_mut(slot) {
            node.left = Val::Px(draw.pos.x);
            node.top = Val::Px(draw.pos.y);
            for child in children.iter() {
                if let Ok((mut text, mut font, mut color)) = text_query.get_mut(child) {
                    if text.0 != draw.text {
                        text.0 = draw.text.clone();
                    }
                    font.font_size = TEXT_BASE_FONT_SIZE * draw.scale;
                    color.0 = draw.color.into();
                }
            }
        } else {
            commands
                .spawn((
                    ScreenTextVisual,
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(draw.pos.x),
                        top: Val::Px(draw.pos.y),
                        width: Val::Px(0.0),
                        height: Val::Px(0.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Text::new(draw.text.clone()),
                        TextFont {
                            font_size: TEXT_BASE_FONT_SIZE * draw.scale,
                            ..default()
                        },
                        TextColor(draw.color.into()),
                    ));
                });
        }
    }

    for (entity, ..) in live.iter().skip(draws.len()) {
        commands.entity(*entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_provides_every_effect_resource() {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.add_plugins(FxPlugin);
        app.update();

        assert!(app.world().contains_resource::<FxManager>());
        assert!(app.world().contains_resource::<TrailRegistry>());
        assert!(app.world().contains_resource::<FxConfig>());
    }

    #[test]
    fn unknown_teleporter_kinds_get_the_fallback_tint() {
        assert_eq!(teleport_ring_color(7), Srgba::WHITE);
        assert_ne!(teleport_ring_color(0), teleport_ring_color(1));
    }
}
