//! Afterglow is a small, headless engine for ephemeral page effects.
//!
//! It drives the decorative layer of a single-page site: a typewriter headline, a
//! twinkling star field, confetti and tile bursts on click or on a key-sequence unlock, and
//! a boot-screen intro. The host owns the clock and the canvas; the engine owns every timer,
//! frame request and particle, and hands out immutable [`FrameSnapshot`]s.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: `StageConfig` (JSON) -> [`Stage`], validated up front
//! 2. **Drive**: feed [`InputEvent`]s and host timestamps; timers fire in deadline order
//! 3. **Snapshot**: [`Stage::frame`] -> [`FrameSnapshot`] (text, intro, particles)
//! 4. **Present**: a [`RenderSurface`] draws or records the snapshot
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: all randomness is seeded, all time is virtual.
//! - **Owned lifecycles**: each effect owns its timers and frame chain; [`Mount`] tears
//!   them down on every exit path.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effects;
mod foundation;
mod pool;
mod render;
mod schedule;
mod stage;

pub use animation::ease::Ease;
pub use animation::motion::{Fade, Motion, MotionSample};
pub use effects::boot::{BootConfig, BootSequence, BootSnapshot};
pub use effects::burst::{BatchPolicy, BurstConfig, BurstKind, BurstSpawner};
pub use effects::sequence::{KONAMI, SequenceMatcher};
pub use effects::starfield::{StarField, StarFieldConfig};
pub use effects::typist::{Typist, TypistConfig, TypistPhase, TypistState, TypistTick};
pub use foundation::core::{
    Point, Rgba8, Size, Span, Vec2, Viewport, as_ms, duration_from_ms, serde_ms,
};
pub use foundation::error::{FxError, FxResult};
pub use foundation::rng::Rng64;
pub use pool::particle::{BatchId, Origin, Particle, ParticleKind, ParticleSnapshot};
pub use pool::store::ParticlePool;
pub use render::surface::{AsciiSurface, JsonLinesSurface, RecordingSurface, RenderSurface};
pub use schedule::frame::{FrameLoop, FrameTick, REFERENCE_FRAME};
pub use schedule::lifecycle::{Effect, Mount};
pub use schedule::timers::{Fired, Scheduler, TimerId};
pub use stage::config::{StageConfig, UnlockConfig};
pub use stage::input::{InputEvent, TimedInput, parse_script};
pub use stage::playback::{FrameClock, PlaybackStats, run_script};
pub use stage::{FrameSnapshot, Stage};
