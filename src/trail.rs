//! Motion trails and their registry.
//!
//! ## Design
//!
//! An [`FxTrail`] is a bounded deque of position samples, newest at the
//! front.  [`FxTrail::update`] accepts a sample per call until the trail is
//! full, then overwrites the newest node in place; [`FxTrail::idle`] ages
//! only the oldest node and expires at most one node per tick, which caps
//! the shrink rate under a long frame.  Both behaviours are deliberate and
//! covered by tests (see the quirk notes on the methods).
//!
//! Trails belong to gameplay objects (ships, seekers) whose lifetimes have
//! nothing to do with the effect manager, so they live behind a
//! [`TrailRegistry`]: register on spawn, deregister on despawn, and the
//! render pass reaches every live trail through the registry without any
//! global state.  Storage is a slot vector with a free list — handles are
//! plain indices, O(1) to resolve, and slots are reused after
//! deregistration (hold a [`TrailHandle`] only as long as the trail it
//! names is registered).

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::render::FxRenderer;

// ── Profiles ──────────────────────────────────────────────────────────────────

/// Rendering profile: selects the gradient law a trail's nodes fade by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailProfile {
    /// White cooling to blue.
    Ship,
    /// Fully transparent; the strip is still submitted so backends see a
    /// stable call pattern while a ship flickers in and out of cloak.
    CloakedShip,
    /// Yellow, hard fade.
    TurboShip,
    /// Dim grey cooling toward transparency.
    Seeker,
}

impl TrailProfile {
    /// Start color and per-unit fade delta, as `[r, g, b, a]`.
    ///
    /// Fade deltas may exceed 1.0; the subtraction in [`Self::color_at`]
    /// clamps per channel, which is what bends the ship gradient through
    /// blue instead of fading straight to black.
    fn law(self) -> ([f32; 4], [f32; 4]) {
        match self {
            TrailProfile::Ship => ([1.0, 1.0, 1.0, 0.7], [2.0, 2.0, 0.0, 0.7]),
            TrailProfile::CloakedShip => ([0.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0]),
            TrailProfile::TurboShip => ([1.0, 1.0, 0.0, 1.0], [1.0, 1.0, 0.0, 1.0]),
            TrailProfile::Seeker => ([0.5, 0.5, 0.5, 0.4], [0.5, 1.0, 1.0, 0.2]),
        }
    }

    /// Gradient color at fraction `t` along the trail (0 = newest sample).
    pub fn color_at(self, t: f32) -> Srgba {
        let (start, fade) = self.law();
        Srgba::new(
            (start[0] - fade[0] * t).clamp(0.0, 1.0),
            (start[1] - fade[1] * t).clamp(0.0, 1.0),
            (start[2] - fade[2] * t).clamp(0.0, 1.0),
            (start[3] - fade[3] * t).clamp(0.0, 1.0),
        )
    }
}

// ── Trail ─────────────────────────────────────────────────────────────────────

/// One position sample in a trail.
#[derive(Debug, Clone, Copy)]
pub struct TrailNode {
    pub pos: Vec2,
    pub ttl: i32,
    pub profile: TrailProfile,
}

/// A bounded motion trail, newest sample at the front.
#[derive(Debug, Clone)]
pub struct FxTrail {
    nodes: VecDeque<TrailNode>,
    drop_freq_ms: u32,
    max_len: usize,
}

impl FxTrail {
    pub fn new(drop_freq_ms: u32, max_len: usize) -> Self {
        Self {
            nodes: VecDeque::with_capacity(max_len),
            drop_freq_ms,
            max_len,
        }
    }

    /// Accept a position sample.
    ///
    /// Below capacity this pushes a new node stamped with the drop
    /// frequency as its ttl.  At capacity the newest node's position and
    /// profile are overwritten in place *without* re-timing its ttl, so
    /// under variable frame rate the effective sample density changes
    /// subtly.  The tuned visuals depend on that quirk; keep it.
    pub fn update(&mut self, pos: Vec2, profile: TrailProfile) {
        if self.nodes.len() < self.max_len {
            self.nodes.push_front(TrailNode {
                pos,
                ttl: self.drop_freq_ms as i32,
                profile,
            });
        } else if let Some(newest) = self.nodes.front_mut() {
            newest.pos = pos;
            newest.profile = profile;
        }
    }

    /// Age the trail by `dt` milliseconds.
    ///
    /// Only the oldest node ages, and at most one node expires per call no
    /// matter how large `dt` is — a stalled frame shortens the trail by a
    /// single sample rather than wiping it.
    pub fn idle(&mut self, dt: u32) {
        let Some(oldest) = self.nodes.back_mut() else {
            return;
        };

        oldest.ttl -= dt as i32;
        if oldest.ttl < dt as i32 {
            self.nodes.pop_back();
        }
    }

    /// Submit the trail as one gradient strip, newest vertex first, with
    /// `camera_offset` applied.  Always exactly one sink call, even for a
    /// cloaked (fully transparent) or empty trail.
    pub fn render<R: FxRenderer>(&self, camera_offset: Vec2, sink: &mut R) {
        let len = self.nodes.len();
        let vertices: Vec<(Vec2, Srgba)> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let t = i as f32 / len as f32;
                (node.pos + camera_offset, node.profile.color_at(t))
            })
            .collect();

        sink.draw_gradient_strip(&vertices);
    }

    /// Drop every sample, e.g. when the owner teleports and the trail must
    /// not bridge the jump.
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Newest sample's position, or the origin for an empty trail.
    pub fn last_pos(&self) -> Vec2 {
        self.nodes.front().map(|n| n.pos).unwrap_or(Vec2::ZERO)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index` from the newest end.  Test/diagnostic aid.
    pub fn node(&self, index: usize) -> Option<&TrailNode> {
        self.nodes.get(index)
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Handle naming a registered trail.  Plain slot index; reused after the
/// trail is deregistered, so stale handles may resolve to a *different*
/// trail — callers own their handle exactly as long as they own the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailHandle(usize);

/// Owner of every live trail.
///
/// Slot-vector storage with a free list: `register` pops a free slot or
/// appends, `deregister` clears the slot and recycles its index.  All
/// whole-registry passes (`idle`, `render_trails`) skip empty slots.
#[derive(Resource, Debug, Default)]
pub struct TrailRegistry {
    slots: Vec<Option<FxTrail>>,
    free: Vec<usize>,
}

impl TrailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a trail; the returned handle is valid until the
    /// matching [`Self::deregister`].
    pub fn register(&mut self, drop_freq_ms: u32, max_len: usize) -> TrailHandle {
        let trail = FxTrail::new(drop_freq_ms, max_len);
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(trail);
                TrailHandle(index)
            }
            None => {
                self.slots.push(Some(trail));
                TrailHandle(self.slots.len() - 1)
            }
        }
    }

    /// Remove a trail and recycle its slot.  Deregistering an already-dead
    /// handle is a no-op.
    pub fn deregister(&mut self, handle: TrailHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            if slot.take().is_some() {
                self.free.push(handle.0);
            }
        }
    }

    pub fn get(&self, handle: TrailHandle) -> Option<&FxTrail> {
        self.slots.get(handle.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, handle: TrailHandle) -> Option<&mut FxTrail> {
        self.slots.get_mut(handle.0).and_then(|slot| slot.as_mut())
    }

    /// Feed a position sample to the trail behind `handle`, if live.
    pub fn update(&mut self, handle: TrailHandle, pos: Vec2, profile: TrailProfile) {
        if let Some(trail) = self.get_mut(handle) {
            trail.update(pos, profile);
        }
    }

    /// Age every live trail.
    pub fn idle(&mut self, dt: u32) {
        for trail in self.slots.iter_mut().flatten() {
            trail.idle(dt);
        }
    }

    /// Render every live trail: exactly one gradient strip per trail.
    pub fn render_trails<R: FxRenderer>(&self, camera_offset: Vec2, sink: &mut R) {
        for trail in self.slots.iter().flatten() {
            trail.render(camera_offset, sink);
        }
    }

    /// Number of live trails.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
