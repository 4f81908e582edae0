//! Render boundary: where immutable frame snapshots leave the engine.

use std::io::Write;

use crate::{
    foundation::error::{FxError, FxResult},
    pool::particle::ParticleKind,
    stage::FrameSnapshot,
};

/// Anything that can draw a [`FrameSnapshot`].
///
/// Surfaces only ever see owned snapshot data; they cannot reach back into the pool.
pub trait RenderSurface {
    /// Draw one frame.
    fn present(&mut self, frame: &FrameSnapshot) -> FxResult<()>;
}

/// Keeps every presented frame in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    frames: Vec<FrameSnapshot>,
}

impl RecordingSurface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every frame presented so far, in order.
    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }
}

impl RenderSurface for RecordingSurface {
    fn present(&mut self, frame: &FrameSnapshot) -> FxResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Writes one JSON document per frame, newline separated.
#[derive(Debug)]
pub struct JsonLinesSurface<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> JsonLinesSurface<W> {
    /// Surface writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> FxResult<W> {
        self.out
            .flush()
            .map_err(|e| FxError::render(format!("flush frame output: {e}")))?;
        Ok(self.out)
    }
}

impl<W: Write> RenderSurface for JsonLinesSurface<W> {
    fn present(&mut self, frame: &FrameSnapshot) -> FxResult<()> {
        serde_json::to_writer(&mut self.out, frame)
            .map_err(|e| FxError::render(format!("write frame {}: {e}", frame.index)))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| FxError::render(format!("write frame {}: {e}", frame.index)))?;
        self.written += 1;
        Ok(())
    }
}

/// Opacity ramp, faintest first. Index 0 is empty space.
const RAMP: [char; 5] = [' ', '.', ':', '*', '#'];

/// Rasterizes a frame into a `cols x rows` character grid.
///
/// Particles map to ramp characters by opacity (a visible particle is never blank); the
/// brightest particle in a cell wins. While the intro is showing its lines are drawn from
/// the top. The last row carries the typist text.
#[derive(Clone, Debug)]
pub struct AsciiSurface {
    cols: usize,
    rows: usize,
    last: String,
}

impl AsciiSurface {
    /// Grid of `cols x rows` characters. Both must be at least 1.
    pub fn new(cols: usize, rows: usize) -> FxResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(FxError::validation(format!(
                "ascii surface needs a non-empty grid (got {cols}x{rows})"
            )));
        }
        Ok(Self {
            cols,
            rows,
            last: String::new(),
        })
    }

    /// The most recently presented frame, rendered.
    pub fn text(&self) -> &str {
        &self.last
    }

    /// Render `frame` without storing it.
    pub fn render(&self, frame: &FrameSnapshot) -> String {
        let field_rows = self.rows.saturating_sub(1);
        let mut grid = vec![vec![0usize; self.cols]; field_rows];

        let vp = frame.viewport;
        if vp.is_renderable() && field_rows > 0 {
            for p in &frame.particles {
                if p.opacity <= 0.0 || p.x < 0.0 || p.y < 0.0 || p.x >= vp.width || p.y >= vp.height
                {
                    continue;
                }
                let col = ((p.x / vp.width) * self.cols as f64) as usize;
                let row = ((p.y / vp.height) * field_rows as f64) as usize;
                let level = match p.kind {
                    ParticleKind::Tile => RAMP.len() - 1,
                    ParticleKind::Star | ParticleKind::Confetti => {
                        1 + (p.opacity.clamp(0.0, 1.0) * 3.999) as usize
                    }
                };
                let cell = &mut grid[row.min(field_rows - 1)][col.min(self.cols - 1)];
                *cell = (*cell).max(level);
            }
        }

        let mut lines: Vec<String> = grid
            .iter()
            .map(|row| row.iter().map(|&l| RAMP[l]).collect())
            .collect();

        if let Some(boot) = &frame.boot {
            for (line, text) in lines.iter_mut().zip(&boot.lines) {
                *line = fit(text, self.cols);
            }
        }

        lines.push(fit(frame.text.as_deref().unwrap_or(""), self.cols));
        lines.join("\n")
    }
}

fn fit(text: &str, cols: usize) -> String {
    let mut s: String = text.chars().take(cols).collect();
    let len = s.chars().count();
    s.extend(std::iter::repeat_n(' ', cols - len));
    s
}

impl RenderSurface for AsciiSurface {
    fn present(&mut self, frame: &FrameSnapshot) -> FxResult<()> {
        self.last = self.render(frame);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
