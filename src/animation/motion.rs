use std::time::Duration;

use crate::{animation::ease::Ease, foundation::core::Vec2};

/// Opacity envelope of a [`Motion`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fade {
    /// Stay fully opaque.
    #[default]
    None,
    /// Rise from transparent to opaque over the motion.
    In,
    /// Fall from opaque to transparent over the motion.
    Out,
}

/// Declarative translate + spin + fade, sampled by particle age.
///
/// Burst particles never get per-frame updates; their look at any instant is a pure
/// function of how long ago they were spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Offset from the rest position when the motion starts.
    pub from: Vec2,
    /// Offset from the rest position when the motion ends.
    pub to: Vec2,
    /// Total rotation over the motion, in degrees.
    pub spin_deg: f64,
    /// Opacity envelope.
    pub fade: Fade,
    /// Idle time before the motion begins (used for staggered tile assembly).
    pub delay: Duration,
    /// Length of the motion after `delay`.
    pub duration: Duration,
    /// Curve applied to translation and spin.
    pub ease: Ease,
}

/// Motion state at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Offset to add to the rest position.
    pub offset: Vec2,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Opacity factor in `[0, 1]`.
    pub opacity: f64,
}

impl Motion {
    /// Raw (un-eased) progress in `[0, 1]` at `age`.
    pub fn progress(&self, age: Duration) -> f64 {
        let Some(active) = age.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (active.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Sample the motion at `age` (time since spawn).
    pub fn sample(&self, age: Duration) -> MotionSample {
        let p = self.progress(age);
        let e = self.ease.apply(p);
        let opacity = match self.fade {
            Fade::None => 1.0,
            Fade::In => p,
            Fade::Out => 1.0 - p,
        };
        MotionSample {
            offset: self.from.lerp(self.to, e),
            rotation_deg: self.spin_deg * e,
            opacity,
        }
    }

    /// Age at which the motion has fully played out.
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
