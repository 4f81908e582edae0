use std::{fs::File, io::BufReader, path::Path};

use crate::{
    effects::{
        boot::BootConfig, burst::BurstConfig, sequence::KONAMI, starfield::StarFieldConfig,
        typist::TypistConfig,
    },
    foundation::{
        core::Viewport,
        error::{FxError, FxResult},
    },
};

fn default_sequence() -> Vec<String> {
    KONAMI.iter().map(|k| (*k).to_owned()).collect()
}

fn default_true() -> bool {
    true
}

/// Key-sequence unlock.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnlockConfig {
    /// Key codes to match, as `KeyboardEvent.key` values.
    #[serde(default = "default_sequence")]
    pub sequence: Vec<String>,
    /// Spawn the unlock burst at the viewport centre rather than the last click.
    #[serde(default = "default_true")]
    pub burst_at_center: bool,
    /// Burst fired on unlock. Falls back to the stage burst, then to the defaults.
    #[serde(default)]
    pub burst: Option<BurstConfig>,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            sequence: default_sequence(),
            burst_at_center: true,
            burst: None,
        }
    }
}

/// Everything a [`crate::Stage`] is built from. Absent sections disable their effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Initial viewport. May be zero; effects wait for a renderable size.
    pub viewport: Viewport,
    /// Seed for every random choice.
    pub seed: u64,
    /// Upper bound on live particles.
    pub pool_capacity: usize,
    /// Rotating headline text.
    pub typist: Option<TypistConfig>,
    /// Background star field.
    pub star_field: Option<StarFieldConfig>,
    /// Burst spawned on click.
    pub burst: Option<BurstConfig>,
    /// Key-sequence unlock.
    pub unlock: Option<UnlockConfig>,
    /// Intro shown before everything else starts.
    pub boot: Option<BootConfig>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            seed: 0,
            pool_capacity: 1024,
            typist: None,
            star_field: None,
            burst: None,
            unlock: None,
            boot: None,
        }
    }
}

impl StageConfig {
    /// Parse a stage configuration from a JSON reader. Does not validate.
    pub fn from_reader<R: std::io::Read>(r: R) -> FxResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FxError::config(format!("parse stage config JSON: {e}")))
    }

    /// Parse a stage configuration from a JSON string. Does not validate.
    pub fn from_json_str(s: &str) -> FxResult<Self> {
        serde_json::from_str(s).map_err(|e| FxError::config(format!("parse stage config JSON: {e}")))
    }

    /// Parse a stage configuration from a JSON file on disk. Does not validate.
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FxError::config(format!("open stage config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Burst used on unlock, if the unlock is enabled.
    pub fn unlock_burst(&self) -> Option<BurstConfig> {
        let unlock = self.unlock.as_ref()?;
        Some(
            unlock
                .burst
                .clone()
                .or_else(|| self.burst.clone())
                .unwrap_or_default(),
        )
    }

    /// Check every section and that the fixed populations fit the pool.
    pub fn validate(&self) -> FxResult<()> {
        let vp = self.viewport;
        if !vp.width.is_finite() || !vp.height.is_finite() || vp.width < 0.0 || vp.height < 0.0 {
            return Err(FxError::validation(format!(
                "viewport must be finite and non-negative (got {}x{})",
                vp.width, vp.height
            )));
        }
        if self.pool_capacity == 0 {
            return Err(FxError::validation("pool capacity must be > 0"));
        }
        if let Some(t) = &self.typist {
            t.validate()?;
        }
        if let Some(b) = &self.boot {
            b.validate()?;
        }
        if let Some(u) = &self.unlock
            && u.sequence.is_empty()
        {
            return Err(FxError::validation("unlock sequence must not be empty"));
        }

        let stars = match &self.star_field {
            Some(s) => {
                s.validate()?;
                s.count
            }
            None => 0,
        };
        let click = match &self.burst {
            Some(b) => {
                b.validate()?;
                b.count
            }
            None => 0,
        };
        let unlock = match self.unlock_burst() {
            Some(b) => {
                b.validate()?;
                b.count
            }
            None => 0,
        };
        // Click and unlock spawners are independent, so one batch of each can be live.
        let bursts = click + unlock;
        if stars + bursts > self.pool_capacity {
            return Err(FxError::validation(format!(
                "{stars} stars plus {bursts} burst particles exceed the pool capacity of {}",
                self.pool_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/config.rs"]
mod tests;
