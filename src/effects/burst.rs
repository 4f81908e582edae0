//! Discrete burst batches (confetti, tile assembly) with timed expiry.
//!
//! A trigger synchronously inserts exactly `count` particles into the pool as one batch and
//! arms a single cleanup timer for it. The batch lives for exactly `duration`; there is no
//! per-particle variance and no early cancellation, apart from the re-trigger policy.

use std::time::Duration;

use crate::{
    animation::{
        ease::Ease,
        motion::{Fade, Motion},
    },
    foundation::{
        core::{Point, Rgba8, Span, Vec2},
        error::{FxError, FxResult},
        rng::Rng64,
    },
    pool::{
        particle::{BatchId, Particle, ParticleKind},
        store::ParticlePool,
    },
    schedule::{
        lifecycle::Effect,
        timers::{Scheduler, TimerId},
    },
};

/// What a burst looks like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstKind {
    /// Pieces fly out from the trigger point, fall, spin and fade out.
    #[default]
    Confetti,
    /// Tiles fly in from scattered offsets and settle into a grid, one after another.
    Tile,
}

impl BurstKind {
    /// Particle kind used for this burst's particles.
    pub fn particle_kind(self) -> ParticleKind {
        match self {
            Self::Confetti => ParticleKind::Confetti,
            Self::Tile => ParticleKind::Tile,
        }
    }
}

/// What happens to live batches when a new burst is triggered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Cancel every pending cleanup, clear the live batches and start fresh.
    #[default]
    Replace,
    /// Keep older batches; each one expires on its own timer.
    Layer,
}

fn default_palette() -> Vec<Rgba8> {
    vec![
        Rgba8::rgb(0x00, 0xe5, 0xa5),
        Rgba8::rgb(0x00, 0xc8, 0xff),
        Rgba8::rgb(0xff, 0xd9, 0x7d),
        Rgba8::rgb(0xff, 0x6b, 0x6b),
    ]
}

/// Burst tuning.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Particle look and motion.
    pub kind: BurstKind,
    /// Particles per batch. Must be > 0.
    pub count: usize,
    /// Batch lifetime. Must be > 0.
    #[serde(with = "crate::foundation::core::serde_ms")]
    pub duration: Duration,
    /// Colours picked uniformly per particle. Must not be empty.
    pub palette: Vec<Rgba8>,
    /// Horizontal scatter in pixels (confetti) or fly-in distance (tiles).
    pub spread: f64,
    /// How far confetti falls over the batch lifetime, in pixels.
    pub fall_distance: f64,
    /// Edge length range in pixels. Tiles use the upper bound.
    pub size: Span,
    /// Largest total spin in degrees.
    pub spin: f64,
    /// Delay between consecutive tiles starting to settle.
    #[serde(with = "crate::foundation::core::serde_ms")]
    pub stagger: Duration,
    /// Curve for translation and spin.
    pub ease: Ease,
    /// Re-trigger behaviour.
    pub policy: BatchPolicy,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            kind: BurstKind::Confetti,
            count: 60,
            duration: Duration::from_millis(3000),
            palette: default_palette(),
            spread: 240.0,
            fall_distance: 320.0,
            size: Span::new(4.0, 10.0),
            spin: 720.0,
            stagger: Duration::from_millis(30),
            ease: Ease::OutQuad,
            policy: BatchPolicy::Replace,
        }
    }
}

impl BurstConfig {
    /// Reject configurations that could not produce a visible, expiring batch.
    pub fn validate(&self) -> FxResult<()> {
        if self.count == 0 {
            return Err(FxError::validation("burst count must be > 0"));
        }
        if self.duration.is_zero() {
            return Err(FxError::validation("burst duration must be > 0"));
        }
        if self.palette.is_empty() {
            return Err(FxError::validation("burst palette must not be empty"));
        }
        self.size.validate("burst size")?;
        for (name, v) in [
            ("spread", self.spread),
            ("fall distance", self.fall_distance),
            ("spin", self.spin),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FxError::validation(format!(
                    "burst {name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        Ok(())
    }
}

/// Cleanup timer payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Expire(BatchId);

/// A batch still in the pool. `cleanup` is `None` while the spawner is stopped; the batch
/// keeps its `deadline` and is re-armed on the next start.
#[derive(Clone, Copy, Debug)]
struct LiveBatch {
    batch: BatchId,
    deadline: Duration,
    cleanup: Option<TimerId>,
}

/// Trigger-driven batch spawner. Particles live in the caller's [`ParticlePool`].
#[derive(Clone, Debug)]
pub struct BurstSpawner {
    config: BurstConfig,
    rng: Rng64,
    timers: Scheduler<Expire>,
    live: Vec<LiveBatch>,
    armed: bool,
}

impl BurstSpawner {
    /// Validate `config` and build a spawner that accepts triggers once started.
    #[tracing::instrument(skip(config), fields(kind = ?config.kind, count = config.count))]
    pub fn new(config: BurstConfig, seed: u64) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: Rng64::new(seed),
            timers: Scheduler::new("burst"),
            live: Vec::new(),
            armed: false,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    /// Batches still in the pool, oldest first.
    pub fn live_batches(&self) -> Vec<BatchId> {
        self.live.iter().map(|l| l.batch).collect()
    }

    /// The pending cleanup timer of `batch`.
    pub fn cleanup_timer(&self, batch: BatchId) -> Option<TimerId> {
        self.live
            .iter()
            .find(|l| l.batch == batch)
            .and_then(|l| l.cleanup)
    }

    /// Spawn one batch centred on `at`.
    ///
    /// Returns `None` (and logs) if the spawner is not running or the batch does not fit
    /// the pool; nothing is inserted in that case.
    pub fn spawn(&mut self, now: Duration, at: Point, pool: &mut ParticlePool) -> Option<BatchId> {
        if !self.armed {
            tracing::debug!("burst ignored: spawner not running");
            return None;
        }
        if self.config.policy == BatchPolicy::Replace {
            self.clear(pool);
        }

        let particles = self.build(now, at);
        let batch = match pool.insert_batch(particles) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, "burst dropped");
                return None;
            }
        };
        let deadline = now + self.config.duration;
        let Some(cleanup) = self.timers.arm(deadline, Expire(batch)) else {
            pool.remove_batch(batch);
            return None;
        };
        self.live.push(LiveBatch {
            batch,
            deadline,
            cleanup: Some(cleanup),
        });
        tracing::debug!(?batch, ?cleanup, x = at.x, y = at.y, "burst spawned");
        Some(batch)
    }

    /// Remove every batch whose cleanup is due at or before `now`.
    ///
    /// Batches left over from before a `stop` have no timer; they are swept here by deadline.
    pub fn advance(&mut self, now: Duration, pool: &mut ParticlePool) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.expire(fired.event.0, pool);
        }
        let overdue: Vec<BatchId> = self
            .live
            .iter()
            .filter(|l| l.cleanup.is_none() && l.deadline <= now)
            .map(|l| l.batch)
            .collect();
        for batch in overdue {
            self.expire(batch, pool);
        }
    }

    /// Force one cleanup timer. Returns whether it was still pending.
    pub fn fire(&mut self, id: TimerId, pool: &mut ParticlePool) -> bool {
        match self.timers.take(id) {
            Some(fired) => {
                self.expire(fired.event.0, pool);
                true
            }
            None => {
                tracing::debug!(?id, "burst cleanup ignored: not pending");
                false
            }
        }
    }

    /// Cancel every pending cleanup and remove the live batches from `pool` now.
    pub fn clear(&mut self, pool: &mut ParticlePool) {
        for live in self.live.drain(..) {
            if let Some(cleanup) = live.cleanup {
                self.timers.cancel(cleanup);
            }
            pool.remove_batch(live.batch);
        }
    }

    fn expire(&mut self, batch: BatchId, pool: &mut ParticlePool) {
        self.live.retain(|l| l.batch != batch);
        let removed = pool.remove_batch(batch);
        tracing::debug!(?batch, removed, "burst expired");
    }

    fn build(&mut self, now: Duration, at: Point) -> Vec<Particle> {
        match self.config.kind {
            BurstKind::Confetti => self.confetti(now, at),
            BurstKind::Tile => self.tiles(now, at),
        }
    }

    fn pick_color(&mut self) -> Rgba8 {
        let palette = &self.config.palette;
        palette[self.rng.index(palette.len())]
    }

    fn confetti(&mut self, now: Duration, at: Point) -> Vec<Particle> {
        let cfg = self.config.clone();
        (0..cfg.count)
            .map(|_| {
                let color = self.pick_color();
                let size = cfg.size.sample(&mut self.rng);
                let to = Vec2::new(
                    self.rng.signed_unit() * cfg.spread,
                    cfg.fall_distance * self.rng.range_f64(0.6, 1.0),
                );
                let mut p = Particle::new(ParticleKind::Confetti, at, size, color, now);
                p.rotation_deg = self.rng.range_f64(0.0, 360.0);
                p.lifetime = Some(cfg.duration);
                p.motion = Some(Motion {
                    from: Vec2::ZERO,
                    to,
                    spin_deg: self.rng.signed_unit() * cfg.spin,
                    fade: Fade::Out,
                    delay: Duration::ZERO,
                    duration: cfg.duration,
                    ease: cfg.ease,
                });
                p
            })
            .collect()
    }

    fn tiles(&mut self, now: Duration, at: Point) -> Vec<Particle> {
        let cfg = self.config.clone();
        let cols = (cfg.count as f64).sqrt().ceil().max(1.0) as usize;
        let rows = cfg.count.div_ceil(cols);
        let size = cfg.size.max;
        let pitch = size * 1.2;
        let origin = at - Vec2::new((cols - 1) as f64 * pitch, (rows - 1) as f64 * pitch) * 0.5;
        let settle = cfg.duration / 4;
        let latest_start = cfg.duration.saturating_sub(settle);

        (0..cfg.count)
            .map(|i| {
                let color = self.pick_color();
                let rest = origin + Vec2::new((i % cols) as f64 * pitch, (i / cols) as f64 * pitch);
                let from = Vec2::new(
                    self.rng.signed_unit() * cfg.spread,
                    self.rng.signed_unit() * cfg.spread,
                );
                let delay = cfg
                    .stagger
                    .saturating_mul(u32::try_from(i).unwrap_or(u32::MAX))
                    .min(latest_start);
                let mut p = Particle::new(ParticleKind::Tile, rest, size, color, now);
                p.lifetime = Some(cfg.duration);
                p.motion = Some(Motion {
                    from,
                    to: Vec2::ZERO,
                    spin_deg: self.rng.signed_unit() * cfg.spin * 0.25,
                    fade: Fade::In,
                    delay,
                    duration: settle,
                    ease: cfg.ease,
                });
                p
            })
            .collect()
    }
}

impl Effect for BurstSpawner {
    /// Accept triggers again and re-arm the cleanup of every batch that outlived a `stop`
    /// at its original deadline.
    fn start(&mut self, _now: Duration) {
        self.timers.resume();
        for live in &mut self.live {
            if live.cleanup.is_none() {
                live.cleanup = self.timers.arm(live.deadline, Expire(live.batch));
            }
        }
        self.armed = true;
    }

    /// Cancels pending cleanups. Batches already in the pool stay tracked and are removed
    /// by [`BurstSpawner::advance`] once their deadline passes, or by
    /// [`BurstSpawner::clear`].
    fn stop(&mut self) {
        self.timers.stop();
        for live in &mut self.live {
            live.cleanup = None;
        }
        self.armed = false;
    }

    /// Whether the spawner accepts triggers.
    fn is_running(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/burst.rs"]
mod tests;
