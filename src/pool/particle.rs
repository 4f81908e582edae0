use std::time::Duration;

use crate::{
    animation::motion::Motion,
    foundation::core::{Point, Rgba8, Vec2},
};

/// What a particle depicts. Only affects how a surface chooses to draw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Twinkling background star (filled circle).
    Star,
    /// Falling confetti piece.
    Confetti,
    /// Assembling tile.
    Tile,
}

/// Identifier of one burst batch inside a [`crate::ParticlePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct BatchId(pub(crate) u64);

/// Who put a particle into the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Continuous field seeded once per session.
    Field,
    /// Discrete burst batch.
    Batch(BatchId),
}

/// One transient visual entity, owned by the pool for its whole life.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Depicted kind.
    pub kind: ParticleKind,
    /// Owner inside the pool.
    pub origin: Origin,
    /// Rest position in viewport pixels.
    pub position: Point,
    /// Radius (stars) or edge length (confetti, tiles).
    pub size: f64,
    opacity: f64,
    /// Lowest opacity this particle may ever report.
    pub opacity_floor: f64,
    /// Angular rate of the twinkle oscillation, radians per millisecond.
    pub twinkle_rate: f64,
    /// Per-reference-frame drift.
    pub drift: Vec2,
    /// Static rotation in degrees, added to any motion spin.
    pub rotation_deg: f64,
    /// Colour chosen at creation.
    pub color: Rgba8,
    /// Host time of creation.
    pub born: Duration,
    /// Fixed lifetime, if the particle expires on its own schedule.
    pub lifetime: Option<Duration>,
    /// Declarative motion evaluated by age.
    pub motion: Option<Motion>,
}

impl Particle {
    /// A particle at rest with full opacity and no motion.
    pub fn new(kind: ParticleKind, position: Point, size: f64, color: Rgba8, born: Duration) -> Self {
        Self {
            kind,
            origin: Origin::Field,
            position,
            size,
            opacity: 1.0,
            opacity_floor: 0.0,
            twinkle_rate: 0.0,
            drift: Vec2::ZERO,
            rotation_deg: 0.0,
            color,
            born,
            lifetime: None,
            motion: None,
        }
    }

    /// Set the floor and re-clamp the current opacity against it.
    pub fn with_opacity_floor(mut self, floor: f64) -> Self {
        self.opacity_floor = floor.clamp(0.0, 1.0);
        self.set_opacity(self.opacity);
        self
    }

    /// Set the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// Current base opacity, always in `[opacity_floor, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Store `opacity` clamped to `[opacity_floor, 1]`. NaN collapses to the floor.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() {
            self.opacity_floor
        } else {
            opacity.clamp(self.opacity_floor, 1.0)
        };
    }

    /// Whether a fixed lifetime has run out at `now`.
    pub fn is_expired(&self, now: Duration) -> bool {
        self.lifetime
            .is_some_and(|life| now.saturating_sub(self.born) >= life)
    }

    /// Immutable render data at host time `now`.
    pub fn snapshot(&self, now: Duration) -> ParticleSnapshot {
        let (offset, spin, fade) = match self.motion {
            Some(m) => {
                let s = m.sample(now.saturating_sub(self.born));
                (s.offset, s.rotation_deg, s.opacity)
            }
            None => (Vec2::ZERO, 0.0, 1.0),
        };
        let opacity = (self.opacity * fade).clamp(self.opacity_floor, 1.0);
        let at = self.position + offset;
        ParticleSnapshot {
            kind: self.kind,
            x: at.x,
            y: at.y,
            size: self.size,
            opacity,
            rotation_deg: self.rotation_deg + spin,
            color: self.color,
        }
    }
}

/// What a surface needs to paint one particle.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParticleSnapshot {
    /// Depicted kind.
    pub kind: ParticleKind,
    /// Horizontal position in viewport pixels.
    pub x: f64,
    /// Vertical position in viewport pixels.
    pub y: f64,
    /// Radius or edge length.
    pub size: f64,
    /// Final opacity in `[opacity_floor, 1]`.
    pub opacity: f64,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Colour.
    pub color: Rgba8,
}

#[cfg(test)]
#[path = "../../tests/unit/pool/particle.rs"]
mod tests;
