use std::time::Duration;

use crate::{
    foundation::error::{FxError, FxResult},
    render::surface::RenderSurface,
    schedule::lifecycle::Mount,
    stage::{Stage, input::TimedInput},
};

/// Fixed-rate frame clock for headless runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    interval: Duration,
}

impl FrameClock {
    /// Clock ticking `fps` times per second. `fps` must be finite and > 0.
    pub fn from_fps(fps: f64) -> FxResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(FxError::validation(format!("fps must be finite and > 0 (got {fps})")));
        }
        let nanos = (1e9 / fps).round().max(1.0) as u64;
        Ok(Self {
            interval: Duration::from_nanos(nanos),
        })
    }

    /// Time between frames.
    pub fn interval(self) -> Duration {
        self.interval
    }

    /// Frame times from 0 up to and including `until`.
    pub fn times(self, until: Duration) -> impl Iterator<Item = Duration> {
        let interval = self.interval;
        (0u32..)
            .map(move |k| interval.saturating_mul(k))
            .take_while(move |t| *t <= until)
    }
}

/// Summary of a headless run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Frames produced.
    pub frames: u64,
    /// Frames the surface rejected.
    pub rejected: u64,
    /// Inputs delivered to the stage.
    pub inputs: u64,
    /// Bursts those inputs spawned.
    pub bursts: u64,
}

/// Mount `stage` at time zero, play `script` against it and present one frame per clock
/// tick up to `until`. The stage is torn down before this returns.
///
/// `script` must be sorted by arrival time (see [`crate::parse_script`]). Each input is
/// delivered at its own timestamp, before the first frame at or after it.
#[tracing::instrument(skip_all, fields(until_ms = until.as_millis() as u64, inputs = script.len()))]
pub fn run_script(
    stage: Stage,
    script: &[TimedInput],
    until: Duration,
    clock: FrameClock,
    surface: &mut dyn RenderSurface,
) -> FxResult<PlaybackStats> {
    let mut stage = Mount::new(stage, Duration::ZERO);
    let mut stats = PlaybackStats::default();
    let mut pending = script.iter().peekable();

    for now in clock.times(until) {
        while let Some(input) = pending.next_if(|i| i.at().is_ok_and(|at| at <= now)) {
            let at = input.at()?;
            stats.inputs += 1;
            if stage.apply(at, &input.event).is_some() {
                stats.bursts += 1;
            }
        }
        stats.frames += 1;
        if !stage.present(now, surface) {
            stats.rejected += 1;
        }
    }

    tracing::debug!(?stats, "playback finished");
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/stage/playback.rs"]
mod tests;
