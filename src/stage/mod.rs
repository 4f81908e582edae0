//! Composition root: one page's worth of effects sharing a particle pool.
//!
//! The host owns the clock. It tells the stage about inputs as they happen and asks for a
//! [`FrameSnapshot`] once per animation frame; the stage drains every timer due up to that
//! instant, runs the star field's frame and returns immutable render data.

pub(crate) mod config;
pub(crate) mod input;
pub(crate) mod playback;

use std::time::Duration;

use crate::{
    effects::{
        boot::{BootSequence, BootSnapshot},
        burst::BurstSpawner,
        sequence::SequenceMatcher,
        starfield::StarField,
        typist::Typist,
    },
    foundation::{
        core::{Point, Viewport, as_ms},
        error::FxResult,
        rng::Rng64,
    },
    pool::{
        particle::{BatchId, ParticleSnapshot},
        store::ParticlePool,
    },
    render::surface::RenderSurface,
    schedule::lifecycle::Effect,
    stage::{config::StageConfig, input::InputEvent},
};

/// Everything a surface needs to draw one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    /// Frames produced by this stage before this one.
    pub index: u64,
    /// Host time in milliseconds since mount.
    pub at_ms: f64,
    /// Viewport the frame was produced for.
    pub viewport: Viewport,
    /// Typist display string, if a typist is configured and running.
    pub text: Option<String>,
    /// Intro screen, while it is showing.
    pub boot: Option<BootSnapshot>,
    /// How many times the unlock sequence has been completed.
    pub unlocks: u64,
    /// Live particles, field first then bursts in spawn order.
    pub particles: Vec<ParticleSnapshot>,
}

const SALT_STARS: u64 = 1;
const SALT_CLICK: u64 = 2;
const SALT_UNLOCK: u64 = 3;

/// A mounted set of effects over one viewport.
#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    viewport: Viewport,
    pool: ParticlePool,
    typist: Option<Typist>,
    star_field: Option<StarField>,
    click_burst: Option<BurstSpawner>,
    unlock_burst: Option<BurstSpawner>,
    matcher: Option<SequenceMatcher>,
    boot: Option<BootSequence>,
    boot_started_at: Duration,
    running: bool,
    main_started: bool,
    last_click: Option<Point>,
    frame_index: u64,
}

impl Stage {
    /// Validate `config` and build every configured effect, stopped.
    #[tracing::instrument(skip(config), fields(seed = config.seed, capacity = config.pool_capacity))]
    pub fn new(config: StageConfig) -> FxResult<Self> {
        config.validate()?;
        let root = Rng64::new(config.seed);
        let seed_for = |salt: u64| root.fork(salt).next_u64();

        let typist = config.typist.clone().map(Typist::new).transpose()?;
        let star_field = config
            .star_field
            .clone()
            .map(|c| StarField::new(c, config.viewport, seed_for(SALT_STARS)))
            .transpose()?;
        let click_burst = config
            .burst
            .clone()
            .map(|c| BurstSpawner::new(c, seed_for(SALT_CLICK)))
            .transpose()?;
        let unlock_burst = config
            .unlock_burst()
            .map(|c| BurstSpawner::new(c, seed_for(SALT_UNLOCK)))
            .transpose()?;
        let matcher = config
            .unlock
            .as_ref()
            .map(|u| SequenceMatcher::new(u.sequence.clone()))
            .transpose()?;
        let boot = config.boot.clone().map(BootSequence::new).transpose()?;

        tracing::debug!(
            typist = typist.is_some(),
            stars = star_field.is_some(),
            burst = click_burst.is_some(),
            unlock = matcher.is_some(),
            boot = boot.is_some(),
            "stage built"
        );

        Ok(Self {
            viewport: config.viewport,
            pool: ParticlePool::with_capacity(config.pool_capacity),
            config,
            typist,
            star_field,
            click_burst,
            unlock_burst,
            matcher,
            boot,
            boot_started_at: Duration::ZERO,
            running: false,
            main_started: false,
            last_click: None,
            frame_index: 0,
        })
    }

    /// Configuration the stage was built from.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The shared particle pool.
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// The typist, if configured.
    pub fn typist(&self) -> Option<&Typist> {
        self.typist.as_ref()
    }

    /// The boot intro, if configured.
    pub fn boot(&self) -> Option<&BootSequence> {
        self.boot.as_ref()
    }

    /// The click burst spawner, if configured.
    pub fn click_burst(&self) -> Option<&BurstSpawner> {
        self.click_burst.as_ref()
    }

    /// The unlock burst spawner, if the unlock is configured.
    pub fn unlock_burst(&self) -> Option<&BurstSpawner> {
        self.unlock_burst.as_ref()
    }

    /// Whether the intro is still holding the other effects back.
    pub fn is_booting(&self) -> bool {
        self.running && !self.main_started
    }

    /// Completed unlock sequences.
    pub fn unlocks(&self) -> u64 {
        self.matcher.as_ref().map_or(0, SequenceMatcher::fired_count)
    }

    /// Update the viewport. Stars keep their positions and wrap to the new width.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(sf) = self.star_field.as_mut() {
            sf.resize(viewport);
        }
    }

    /// Pointer click. Spawns the click burst at `at` if one is configured.
    pub fn click(&mut self, now: Duration, at: Point) -> Option<BatchId> {
        self.drain(now);
        if !self.main_started {
            return None;
        }
        self.last_click = Some(at);
        self.click_burst.as_mut()?.spawn(now, at, &mut self.pool)
    }

    /// Key press. Feeds the unlock matcher and spawns the unlock burst when it completes.
    pub fn key(&mut self, now: Duration, code: &str) -> Option<BatchId> {
        self.drain(now);
        if !self.main_started {
            return None;
        }
        let matcher = self.matcher.as_mut()?;
        if !matcher.feed(code) {
            return None;
        }
        let fired = matcher.fired_count();
        let at = match (self.config.unlock.as_ref(), self.last_click) {
            (Some(u), Some(click)) if !u.burst_at_center => click,
            _ => self.viewport.center(),
        };
        tracing::debug!(unlocks = fired, x = at.x, y = at.y, "unlock sequence completed");
        self.unlock_burst.as_mut()?.spawn(now, at, &mut self.pool)
    }

    /// Route one input. Returns the spawned batch, if any.
    pub fn apply(&mut self, now: Duration, event: &InputEvent) -> Option<BatchId> {
        match event {
            InputEvent::Click { x, y } => self.click(now, Point::new(*x, *y)),
            InputEvent::Key { code } => self.key(now, code),
            InputEvent::Resize { width, height } => {
                self.resize(Viewport::new(*width, *height));
                None
            }
        }
    }

    /// Produce the frame for host time `now`.
    pub fn frame(&mut self, now: Duration) -> FrameSnapshot {
        self.drain(now);
        if let Some(sf) = self.star_field.as_mut() {
            sf.frame(now, &mut self.pool);
        }

        let index = self.frame_index;
        self.frame_index += 1;
        FrameSnapshot {
            index,
            at_ms: as_ms(now),
            viewport: self.viewport,
            text: self
                .typist
                .as_ref()
                .filter(|_| self.main_started)
                .map(|t| t.display().to_owned()),
            boot: self
                .boot
                .as_ref()
                .filter(|b| self.running && !b.is_done())
                .map(BootSequence::snapshot),
            unlocks: self.unlocks(),
            particles: self.pool.snapshots(now).collect(),
        }
    }

    /// Produce the frame for `now` and hand it to `surface`.
    ///
    /// A surface error is logged and dropped; the stage keeps running. Returns whether the
    /// surface accepted the frame.
    pub fn present(&mut self, now: Duration, surface: &mut dyn RenderSurface) -> bool {
        let frame = self.frame(now);
        match surface.present(&frame) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, index = frame.index, "surface rejected frame");
                false
            }
        }
    }

    fn drain(&mut self, now: Duration) {
        if !self.running {
            return;
        }
        if !self.main_started {
            let Some(boot) = self.boot.as_mut() else {
                return;
            };
            boot.advance(now);
            if !boot.is_done() {
                return;
            }
            let done_at = (self.boot_started_at + boot.config().total()).min(now);
            boot.stop();
            self.start_main(done_at);
        }
        if let Some(t) = self.typist.as_mut() {
            t.advance(now);
        }
        if let Some(b) = self.click_burst.as_mut() {
            b.advance(now, &mut self.pool);
        }
        if let Some(b) = self.unlock_burst.as_mut() {
            b.advance(now, &mut self.pool);
        }
    }

    fn start_main(&mut self, now: Duration) {
        if let Some(t) = self.typist.as_mut() {
            t.start(now);
        }
        if let Some(sf) = self.star_field.as_mut() {
            sf.start(now);
        }
        if let Some(b) = self.click_burst.as_mut() {
            b.start(now);
        }
        if let Some(b) = self.unlock_burst.as_mut() {
            b.start(now);
        }
        if let Some(m) = self.matcher.as_mut() {
            m.reset();
        }
        self.main_started = true;
        tracing::debug!(?now, "stage effects started");
    }

    fn stop_all(&mut self) {
        if let Some(b) = self.boot.as_mut() {
            b.stop();
        }
        if let Some(t) = self.typist.as_mut() {
            t.stop();
        }
        if let Some(sf) = self.star_field.as_mut() {
            sf.stop();
        }
        if let Some(b) = self.click_burst.as_mut() {
            b.clear(&mut self.pool);
            b.stop();
        }
        if let Some(b) = self.unlock_burst.as_mut() {
            b.clear(&mut self.pool);
            b.stop();
        }
    }
}

impl Effect for Stage {
    /// Mount every effect. With a boot intro configured, only the intro starts now and the
    /// rest follow the moment it finishes.
    fn start(&mut self, now: Duration) {
        self.stop_all();
        self.running = true;
        self.main_started = false;
        self.last_click = None;
        match self.boot.as_mut() {
            Some(boot) => {
                self.boot_started_at = now;
                boot.start(now);
            }
            None => self.start_main(now),
        }
        tracing::debug!(?now, booting = self.boot.is_some(), "stage started");
    }

    /// Stop every effect and drop live bursts. The star field keeps its stars.
    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.stop_all();
        self.running = false;
        self.main_started = false;
        tracing::debug!("stage stopped");
    }

    fn is_running(&self) -> bool {
        self.running
    }

    /// Stop everything and empty the pool, so a later mount seeds a fresh field.
    fn teardown(&mut self) {
        self.stop();
        self.pool.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/stage.rs"]
mod tests;
