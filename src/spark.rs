//! Fixed-capacity spark pool: the point/line particle store at the heart of
//! the effect layer.
//!
//! ## Design
//!
//! Each [`SparkKind`] owns a flat store of up to [`MAX_SPARKS`] slots.
//! Emission bump-allocates off the end; once a store is within one emission
//! of capacity, new sparks overwrite older ones at a rotating, even-aligned
//! index instead of failing or growing.  That eviction is deliberately *not*
//! strict LRU: spreading overwrites across the pool costs O(1) and reads far
//! better on screen than chewing a hole through the single oldest effect.
//!
//! | Operation | Cost    | Notes                                         |
//! |-----------|---------|-----------------------------------------------|
//! | `emit`    | O(1)    | never fails, never allocates past capacity    |
//! | `idle`    | O(live) | swap-removes the dead in the same pass        |
//! | `clear`   | O(1)    | slots are plain data, nothing to drop         |
//! | `render`  | O(live) | two batched submissions, lines beneath points |
//!
//! Line sparks occupy an even-aligned slot *pair* — head plus a trailing
//! vertex offset backwards along the velocity with dimmed green/blue, faking
//! motion blur.  Both vertices carry the same ttl, so a pair always dies in
//! the same `idle` pass and pair alignment survives swap-removal.

use bevy::prelude::*;
use rand::Rng;

use crate::constants::*;
use crate::render::FxRenderer;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Spark category; selects slot footprint and fade curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparkKind {
    /// One slot; full alpha until the last second of life.
    Point,
    /// Two slots (head + trailing vertex); fades over the last quarter second.
    Line,
}

/// Number of spark categories, for sizing per-kind arrays.
pub const SPARK_KIND_COUNT: usize = 2;

impl SparkKind {
    fn index(self) -> usize {
        match self {
            SparkKind::Point => 0,
            SparkKind::Line => 1,
        }
    }

    /// Slots one emission of this kind consumes.
    fn slots(self) -> usize {
        match self {
            SparkKind::Point => 1,
            SparkKind::Line => 2,
        }
    }

    /// Remaining-ttl threshold (ms) below which alpha fades linearly.
    fn fade_ms(self) -> i32 {
        match self {
            SparkKind::Point => POINT_SPARK_FADE_MS,
            SparkKind::Line => LINE_SPARK_FADE_MS,
        }
    }
}

/// One live particle slot.
///
/// `alpha` is derived from remaining ttl each `idle`; the alpha channel of
/// `color` is ignored — the pool owns opacity for the spark's whole life.
#[derive(Debug, Clone, Copy)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Srgba,
    pub ttl: i32,
    pub alpha: f32,
}

// ── Pool ──────────────────────────────────────────────────────────────────────

/// Per-kind fixed-capacity spark storage.
///
/// The live prefix of each store is its occupancy; `Vec::swap_remove` gives
/// exactly the copy-last-into-hole deletion the pool wants.  Stores are
/// pre-allocated to capacity so emission never reallocates.
#[derive(Debug)]
pub struct SparkPool {
    sparks: [Vec<Spark>; SPARK_KIND_COUNT],
    /// Rotating eviction cursor per kind.  Survives `clear` on purpose: the
    /// rotation's whole job is spreading damage across *time*, not per level.
    last_overwritten: [usize; SPARK_KIND_COUNT],
}

impl Default for SparkPool {
    fn default() -> Self {
        Self::new()
    }
}

impl SparkPool {
    pub fn new() -> Self {
        Self {
            sparks: [
                Vec::with_capacity(MAX_SPARKS),
                Vec::with_capacity(MAX_SPARKS),
            ],
            last_overwritten: [SPARK_OVERWRITE_CURSOR_START; SPARK_KIND_COUNT],
        }
    }

    /// Emit one spark.  Never fails: a saturated store overwrites an older
    /// spark instead.
    ///
    /// A `ttl` of zero or less picks a random lifetime up to fifteen seconds.
    /// Line sparks also synthesise their trailing vertex here, in the pair
    /// slot, with the same ttl and a green/blue-dimmed copy of `color`.
    pub fn emit(&mut self, pos: Vec2, vel: Vec2, color: Srgba, ttl: i32, kind: SparkKind) {
        let k = kind.index();
        let slots = kind.slots();

        let index = if self.sparks[k].len() >= MAX_SPARKS - slots {
            // Out of room.  Jump the cursor by a fixed stride modulo half
            // capacity, doubled back up: the result stays even-aligned so a
            // line pair never straddles an overwrite, and consecutive
            // evictions land far apart in the pool.
            let index = (self.last_overwritten[k] + SPARK_OVERWRITE_STRIDE)
                % (MAX_SPARKS / 2 - 1)
                * 2;
            self.last_overwritten[k] = index;
            debug_assert!(index < MAX_SPARKS - slots, "spark overwrite index out of range");
            index
        } else {
            self.sparks[k].len()
        };

        let ttl = if ttl > 0 {
            ttl
        } else {
            RANDOM_SPARK_TTL_STEP_MS * rand::thread_rng().gen_range(0..=1000)
        };

        self.put(
            k,
            index,
            Spark {
                pos,
                vel,
                color,
                ttl,
                alpha: 1.0,
            },
        );

        if kind == SparkKind::Line {
            let tail_color = Srgba::new(
                color.red,
                color.green * LINE_SPARK_TAIL_DIM,
                color.blue * LINE_SPARK_TAIL_DIM,
                color.alpha,
            );
            self.put(
                k,
                index + 1,
                Spark {
                    pos: pos - vel.normalize_or_zero() * LINE_SPARK_TAIL_LEN,
                    vel,
                    color: tail_color,
                    ttl,
                    alpha: 1.0,
                },
            );
        }
    }

    /// Write `spark` at `index`, growing the live prefix when the index is
    /// the store's end (bump path) and overwriting in place otherwise.
    fn put(&mut self, k: usize, index: usize, spark: Spark) {
        if index == self.sparks[k].len() {
            self.sparks[k].push(spark);
        } else {
            self.sparks[k][index] = spark;
        }
    }

    /// Age every live spark by `dt` milliseconds.
    ///
    /// A spark whose remaining ttl is strictly below `dt` is swap-removed;
    /// the swapped-in spark is examined next, so nothing is skipped.
    /// Survivors integrate position and recompute alpha from their kind's
    /// fade threshold.
    pub fn idle(&mut self, dt: u32) {
        let dt_secs = dt as f32 * 0.001;

        for kind in [SparkKind::Point, SparkKind::Line] {
            let fade = kind.fade_ms();
            let store = &mut self.sparks[kind.index()];

            let mut i = 0;
            while i < store.len() {
                if store[i].ttl < dt as i32 {
                    store.swap_remove(i);
                } else {
                    let spark = &mut store[i];
                    spark.ttl -= dt as i32;
                    spark.pos += spark.vel * dt_secs;
                    spark.alpha = if spark.ttl > fade {
                        1.0
                    } else {
                        spark.ttl as f32 / fade as f32
                    };
                    i += 1;
                }
            }
        }
    }

    /// Drop every live spark in O(1).  The eviction cursors keep their
    /// positions; see the field note.
    pub fn clear(&mut self) {
        for store in &mut self.sparks {
            store.clear();
        }
    }

    /// Submit all live sparks to `sink`, lines first so points draw on top.
    ///
    /// `camera_offset` is added to every position; colors carry the derived
    /// alpha.  Empty stores submit nothing.
    pub fn render<R: FxRenderer>(&self, camera_offset: Vec2, sink: &mut R) {
        for kind in [SparkKind::Line, SparkKind::Point] {
            let store = &self.sparks[kind.index()];
            if store.is_empty() {
                continue;
            }

            let vertices: Vec<(Vec2, Srgba)> = store
                .iter()
                .map(|s| (s.pos + camera_offset, s.color.with_alpha(s.alpha)))
                .collect();

            match kind {
                SparkKind::Line => sink.draw_line_pairs(&vertices),
                SparkKind::Point => sink.draw_points(&vertices),
            }
        }
    }

    /// Live slot count for `kind` (a line spark counts as two).
    pub fn active(&self, kind: SparkKind) -> usize {
        self.sparks[kind.index()].len()
    }

    /// Slot contents at `index` for `kind`, if live.  Test/diagnostic aid.
    pub fn get(&self, kind: SparkKind, index: usize) -> Option<&Spark> {
        self.sparks[kind.index()].get(index)
    }
}
