//! Centralised effect-tuning constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! A subset is runtime-overridable through `assets/effects.toml`
//! (see [`crate::config`]); the constants below remain the authoritative
//! defaults.
//!
//! ## Tuning guidance
//!
//! Each constant includes the observable consequence of changing it.  Times
//! are integer milliseconds to match the engine tick; distances and speeds
//! are world units and world units per second.

// ── Spark Pool ────────────────────────────────────────────────────────────────

/// Fixed slot capacity of each per-kind spark store.
///
/// The pool never allocates past this; once occupancy reaches capacity, new
/// sparks overwrite older ones via the rotating-cursor policy below.
/// Halving this value halves peak spark memory but makes heavy explosions
/// visibly eat their own tails sooner.
pub const MAX_SPARKS: usize = 8192;

/// Initial value of each kind's overwrite rotation cursor.
///
/// Deliberately non-zero so the first saturation overwrites mid-pool rather
/// than the oldest emission site, spreading the damage away from whatever
/// effect filled the pool.
pub const SPARK_OVERWRITE_CURSOR_START: usize = 500;

/// Cursor advance per saturated emission.
///
/// The eviction slot is `(cursor + stride) % (MAX_SPARKS / 2 - 1) * 2`, which
/// keeps the result even-aligned so line sparks (which occupy a slot pair)
/// never straddle an overwrite.  Larger strides scatter overwrites more
/// widely; 100 avoids visible holes in any one effect.
pub const SPARK_OVERWRITE_STRIDE: usize = 100;

/// Multiplier for the randomised ttl picked when a spark is emitted with
/// `ttl <= 0`: the result is `RANDOM_SPARK_TTL_STEP_MS * rand(0..=1000)`,
/// i.e. zero to fifteen seconds.
pub const RANDOM_SPARK_TTL_STEP_MS: i32 = 15;

/// Distance (u) behind a line spark's head at which its trailing vertex sits,
/// along the reversed velocity direction.  Longer tails read as faster motion.
pub const LINE_SPARK_TAIL_LEN: f32 = 20.0;

/// Channel scale applied to a line spark's trailing-vertex green and blue
/// (red is kept), giving the tail its warm fade.
pub const LINE_SPARK_TAIL_DIM: f32 = 0.25;

/// Remaining ttl (ms) below which a point spark fades linearly to zero alpha.
pub const POINT_SPARK_FADE_MS: i32 = 1000;

/// Remaining ttl (ms) below which a line spark fades linearly to zero alpha.
/// Shorter than the point fade so streaks vanish crisply.
pub const LINE_SPARK_FADE_MS: i32 = 250;

// ── Blast ─────────────────────────────────────────────────────────────────────

/// Radius (u) of the ring on which blast sparks are born, one per degree.
pub const BLAST_RING_RADIUS: f32 = 50.0;

/// Outward speed (u/s) of the blast's orange line sparks.  Their ttl is the
/// travel time from the ring to the requested blast size, so raising the
/// speed shortens the visual without changing its reach.
pub const BLAST_LINE_SPEED: f32 = 800.0;

/// Upper bound of the randomised outward speed (u/s) of the blast's yellow
/// point sparks.
pub const BLAST_POINT_SPEED: f32 = 500.0;

// ── Explosion ─────────────────────────────────────────────────────────────────

/// Point sparks emitted per unit of explosion size.  250 at size 1.0 fills
/// the screen convincingly; the pool's overwrite policy absorbs the spike
/// when several explosions land on the same frame.
pub const EXPLOSION_SPARKS_PER_UNIT: f32 = 250.0;

/// Speed scale (u/s) for explosion sparks; each spark's actual speed is a
/// uniform sample of ±this × size, so half the sparks travel "backwards"
/// through the origin for a denser core.
pub const EXPLOSION_SPEED: f32 = 400.0;

/// Base ttl (ms) added to each explosion spark's random component before the
/// size multiplier is applied.
pub const EXPLOSION_BASE_TTL_MS: i32 = 2000;

// ── Burst ─────────────────────────────────────────────────────────────────────

/// Spark count used by `emit_burst` when the caller does not supply one.
pub const BURST_DEFAULT_COUNT: u32 = 250;

/// Radial speed scale (u/s) for burst sparks before the per-axis ellipse
/// scale is applied.
pub const BURST_SPEED: f32 = 200.0;

// ── Debris ────────────────────────────────────────────────────────────────────

/// Remaining ttl (ms) over which a debris chunk's outline fades to nothing.
pub const DEBRIS_FADE_MS: i32 = 250;

// ── Text Effects ──────────────────────────────────────────────────────────────

/// Visual scale ceiling a text effect grows toward.  Render scale is
/// `size / MAX_TEXT_EFFECT_SIZE`, so full size draws at scale 1.0.
pub const MAX_TEXT_EFFECT_SIZE: f32 = 10.0;

/// Remaining ttl (ms) over which a text effect fades to transparent.
pub const TEXT_EFFECT_FADE_MS: u32 = 300;

/// Default drift velocity (u/s) of emitted text, y component.  Negative y:
/// damage numbers float toward the top of an inverted-y screen.
pub const TEXT_EFFECT_VELOCITY_Y: f32 = -130.0;

/// Default growth rate (size units per second) of emitted text.  At 20.0 a
/// fresh effect reaches full size in half a second.
pub const TEXT_EFFECT_GROWTH_RATE: f32 = 20.0;

/// Default lifetime (ms) of emitted text.
pub const TEXT_EFFECT_TTL_MS: u32 = 2000;

/// Scale applied to the screen-relative text pass, positioned about the
/// screen centre.  Two thirds keeps announcement text inside a 4:3 safe
/// area on wide windows.
pub const SCREEN_TEXT_EFFECT_SCALE: f32 = 0.6667;

// ── Teleporter ────────────────────────────────────────────────────────────────

/// Duration (ms) of the teleport-in expansion.  An effect is removed once its
/// elapsed time strictly exceeds this, so a node at exactly the boundary
/// still renders one last frame at full radius.
pub const TELEPORT_IN_EXPAND_MS: u32 = 1350;

/// Full expansion radius (u) of the teleport-in ring.
pub const TELEPORT_IN_RADIUS: f32 = 75.0;

// ── Trails ────────────────────────────────────────────────────────────────────

/// Default interval (ms) between accepted trail position samples; also the
/// ttl stamped on each new node, so a full trail spans roughly
/// `TRAIL_DROP_FREQ_MS × TRAIL_LENGTH` milliseconds of motion.
pub const TRAIL_DROP_FREQ_MS: u32 = 32;

/// Default maximum node count per trail.  Once full, new samples overwrite
/// the newest node in place instead of growing the trail.
pub const TRAIL_LENGTH: u32 = 15;
