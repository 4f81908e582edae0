//! Twinkling, slowly drifting star field.
//!
//! A fixed number of stars is seeded once, the first time a frame arrives with a
//! renderable viewport. From then on every frame nudges each star's opacity along a sine of
//! host time (never below the floor, never above 1) and drifts it horizontally, wrapping at
//! the viewport edges. Stars are never added or removed afterwards.

use std::time::Duration;

use crate::{
    foundation::{
        core::{Point, Rgba8, Span, Vec2, Viewport, as_ms},
        error::{FxError, FxResult},
        rng::Rng64,
    },
    pool::{
        particle::{Particle, ParticleKind},
        store::ParticlePool,
    },
    schedule::{
        frame::{FrameLoop, FrameTick},
        lifecycle::Effect,
    },
};

/// Star field tuning. Defaults reproduce the portfolio page's canvas background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    /// Number of stars. Fixed for the session.
    pub count: usize,
    /// Star radius range in pixels.
    pub radius: Span,
    /// Twinkle angular rate range, radians per millisecond of host time.
    pub twinkle_rate: Span,
    /// Opacity change per reference frame at the sine's peak.
    pub twinkle_amplitude: f64,
    /// Largest horizontal drift speed before scaling.
    pub drift: f64,
    /// Multiplier applied to drift, pixels per reference frame.
    pub drift_scale: f64,
    /// Lowest opacity any star may reach. Must be in `(0, 1]`.
    pub opacity_floor: f64,
    /// Star colour.
    pub color: Rgba8,
    /// Alpha multiplier baked into the colour.
    pub intensity: f64,
    /// Largest frame gap honoured by the drift integration.
    #[serde(with = "crate::foundation::core::serde_ms")]
    pub max_delta: Duration,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            count: 200,
            radius: Span::new(0.2, 1.5),
            twinkle_rate: Span::new(0.001, 0.006),
            twinkle_amplitude: 0.006,
            drift: 0.05,
            drift_scale: 0.15,
            opacity_floor: 0.05,
            color: Rgba8::rgb(160, 210, 255),
            intensity: 0.75,
            max_delta: Duration::from_millis(100),
        }
    }
}

impl StarFieldConfig {
    /// Reject configurations the frame update cannot honour.
    pub fn validate(&self) -> FxResult<()> {
        if self.count == 0 {
            return Err(FxError::validation("star field count must be > 0"));
        }
        self.radius.validate("star radius")?;
        self.twinkle_rate.validate("star twinkle rate")?;
        if !(self.opacity_floor > 0.0 && self.opacity_floor <= 1.0) {
            return Err(FxError::validation(format!(
                "star opacity floor must be in (0, 1] (got {})",
                self.opacity_floor
            )));
        }
        for (name, v) in [
            ("twinkle amplitude", self.twinkle_amplitude),
            ("drift", self.drift),
            ("drift scale", self.drift_scale),
            ("intensity", self.intensity),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FxError::validation(format!(
                    "star {name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        Ok(())
    }
}

/// Frame-driven star field. Particles live in the caller's [`ParticlePool`].
#[derive(Clone, Debug)]
pub struct StarField {
    config: StarFieldConfig,
    viewport: Viewport,
    rng: Rng64,
    frames: FrameLoop,
    skipping: bool,
    seed_failed: bool,
}

/// Map `x` into `[0, width)`, relocating anything past one edge to the other.
pub(crate) fn wrap_x(x: f64, width: f64) -> f64 {
    let w = x.rem_euclid(width);
    // rem_euclid can round up to `width` for tiny negative inputs.
    if w.is_finite() && w < width { w } else { 0.0 }
}

impl StarField {
    /// Validate `config` and build a stopped, unseeded field.
    #[tracing::instrument(skip(config), fields(count = config.count))]
    pub fn new(config: StarFieldConfig, viewport: Viewport, seed: u64) -> FxResult<Self> {
        config.validate()?;
        let frames = FrameLoop::new(config.max_delta);
        Ok(Self {
            config,
            viewport,
            rng: Rng64::new(seed),
            frames,
            skipping: false,
            seed_failed: false,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &StarFieldConfig {
        &self.config
    }

    /// Current wrap bounds.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the wrap bounds. Existing stars keep their positions.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!(width = viewport.width, height = viewport.height, "star field resized");
        self.viewport = viewport;
    }

    /// Run one animation frame at host time `now`.
    ///
    /// Returns the delivered tick, or `None` if the field is stopped (including any frame
    /// forced after teardown). A frame with a non-renderable viewport is skipped without
    /// touching the pool.
    pub fn frame(&mut self, now: Duration, pool: &mut ParticlePool) -> Option<FrameTick> {
        let tick = self.frames.on_frame(now)?;

        if !self.viewport.is_renderable() {
            if !self.skipping {
                tracing::warn!(
                    width = self.viewport.width,
                    height = self.viewport.height,
                    "star field frame skipped: viewport not renderable"
                );
                self.skipping = true;
            }
            return Some(tick);
        }
        self.skipping = false;

        if !pool.has_field() {
            self.seed(now, pool);
            return Some(tick);
        }

        let k = tick.reference_frames();
        let now_ms = as_ms(now);
        let width = self.viewport.width;
        let amplitude = self.config.twinkle_amplitude;
        let drift_scale = self.config.drift_scale;
        for star in pool.field_mut() {
            let twinkle = (now_ms * star.twinkle_rate).sin() * amplitude * k;
            star.set_opacity(star.opacity() + twinkle);
            let x = star.position.x + star.drift.x * drift_scale * k;
            star.position.x = wrap_x(x, width);
        }
        Some(tick)
    }

    fn seed(&mut self, now: Duration, pool: &mut ParticlePool) {
        if self.seed_failed {
            return;
        }
        let cfg = &self.config;
        let color = cfg.color.with_alpha_f(cfg.intensity);
        let (w, h) = (self.viewport.width, self.viewport.height);
        let stars: Vec<Particle> = (0..cfg.count)
            .map(|_| {
                let position = Point::new(self.rng.range_f64(0.0, w), self.rng.range_f64(0.0, h));
                let size = cfg.radius.sample(&mut self.rng);
                let opacity = self.rng.next_f64_01();
                let mut star = Particle::new(ParticleKind::Star, position, size, color, now)
                    .with_opacity_floor(cfg.opacity_floor)
                    .with_opacity(opacity);
                star.twinkle_rate = cfg.twinkle_rate.sample(&mut self.rng);
                star.drift = Vec2::new(self.rng.signed_unit() * cfg.drift, 0.0);
                star
            })
            .collect();
        match pool.seed_field(stars) {
            Ok(n) => tracing::debug!(stars = n, width = w, height = h, "star field seeded"),
            Err(err) => {
                tracing::warn!(%err, "star field could not be seeded");
                self.seed_failed = true;
            }
        }
    }
}

impl Effect for StarField {
    fn start(&mut self, _now: Duration) {
        self.frames.start();
    }

    fn stop(&mut self) {
        self.frames.stop();
    }

    fn is_running(&self) -> bool {
        self.frames.is_running()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/starfield.rs"]
mod tests;
