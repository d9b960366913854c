//! Render-sink seam between effect simulation and the drawing backend.
//!
//! The effect layer never rasterises anything itself; it hands batched,
//! already-transformed world/screen geometry to an [`FxRenderer`].  The demo
//! wires in a gizmo-backed sink (see [`crate::effects`]); headless tests use
//! [`RecordingRenderer`] to assert on exactly what would have been drawn and
//! in what order.

use bevy::prelude::*;

/// Draw-order pass selector for [`crate::fx_manager::FxManager::render`].
///
/// `Under` must be drawn before `Over` within a frame: teleport rings sit
/// beneath ships and sparks, sparks/debris/text sit on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Teleport rings only.
    Under,
    /// Sparks (lines beneath points), debris outlines, world-space text.
    Over,
}

/// Coordinate space a [`TextDraw`] position is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSpace {
    /// World units, camera offset already applied.
    World,
    /// Viewport units, relative to the screen centre the caller supplied.
    Screen,
}

/// One text draw request.
///
/// `scale` is a unitless factor in `0.0..=1.0` as the effect grows toward
/// full size; the backend multiplies it into whatever base font size it uses.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    pub pos: Vec2,
    pub scale: f32,
    pub color: Srgba,
    pub space: TextSpace,
}

/// Backend interface the effect layer draws through.
///
/// All positions are final (world positions carry the camera offset, screen
/// positions the centre offset) and all colors carry their alpha, so a
/// backend can submit each call as-is.
pub trait FxRenderer {
    /// Draw independent points, one per element.
    fn draw_points(&mut self, points: &[(Vec2, Srgba)]);

    /// Draw independent segments; consecutive element pairs `(0,1) (2,3) …`
    /// form one segment each.  The slice length is always even.
    fn draw_line_pairs(&mut self, vertices: &[(Vec2, Srgba)]);

    /// Draw a closed single-color outline through `points`.
    fn draw_line_loop(&mut self, points: &[Vec2], color: Srgba);

    /// Draw an open strip with per-vertex colors, newest vertex first.
    fn draw_gradient_strip(&mut self, vertices: &[(Vec2, Srgba)]);

    /// Draw one teleport-in ring.  `radius_frac` is the expansion fraction in
    /// `0.0..=1.0`; `kind` selects backend-owned styling and unknown values
    /// must degrade to some default look rather than fail.
    fn draw_teleport_ring(
        &mut self,
        pos: Vec2,
        kind: u32,
        radius_frac: f32,
        max_radius: f32,
        alpha: f32,
    );

    /// Draw one text effect.
    fn draw_text(&mut self, draw: &TextDraw);
}

// ── Recording sink ────────────────────────────────────────────────────────────

/// One recorded [`FxRenderer`] invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Points(Vec<(Vec2, Srgba)>),
    LinePairs(Vec<(Vec2, Srgba)>),
    LineLoop {
        points: Vec<Vec2>,
        color: Srgba,
    },
    GradientStrip(Vec<(Vec2, Srgba)>),
    TeleportRing {
        pos: Vec2,
        kind: u32,
        radius_frac: f32,
        max_radius: f32,
        alpha: f32,
    },
    Text(TextDraw),
}

/// An [`FxRenderer`] that records every call in invocation order.
///
/// The workhorse of the headless tests, and handy for diagnosing what the
/// effect layer submitted on a given frame without a window.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded gradient strips (one per rendered trail).
    pub fn strip_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::GradientStrip(_)))
            .count()
    }

    /// Number of recorded teleport rings.
    pub fn ring_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::TeleportRing { .. }))
            .count()
    }

    /// All recorded text draws, in invocation order.
    pub fn texts(&self) -> impl Iterator<Item = &TextDraw> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text(draw) => Some(draw),
            _ => None,
        })
    }

    /// Total point vertices across all recorded point batches.
    pub fn point_vertices(&self) -> usize {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Points(batch) => Some(batch.len()),
                _ => None,
            })
            .sum()
    }

    /// Total line vertices across all recorded segment batches.
    pub fn line_vertices(&self) -> usize {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::LinePairs(batch) => Some(batch.len()),
                _ => None,
            })
            .sum()
    }
}

impl FxRenderer for RecordingRenderer {
    fn draw_points(&mut self, points: &[(Vec2, Srgba)]) {
        self.calls.push(DrawCall::Points(points.to_vec()));
    }

    fn draw_line_pairs(&mut self, vertices: &[(Vec2, Srgba)]) {
        self.calls.push(DrawCall::LinePairs(vertices.to_vec()));
    }

    fn draw_line_loop(&mut self, points: &[Vec2], color: Srgba) {
        self.calls.push(DrawCall::LineLoop {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_gradient_strip(&mut self, vertices: &[(Vec2, Srgba)]) {
        self.calls.push(DrawCall::GradientStrip(vertices.to_vec()));
    }

    fn draw_teleport_ring(
        &mut self,
        pos: Vec2,
        kind: u32,
        radius_frac: f32,
        max_radius: f32,
        alpha: f32,
    ) {
        self.calls.push(DrawCall::TeleportRing {
            pos,
            kind,
            radius_frac,
            max_radius,
            alpha,
        });
    }

    fn draw_text(&mut self, draw: &TextDraw) {
        self.calls.push(DrawCall::Text(draw.clone()));
    }
}
