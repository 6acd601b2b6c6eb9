use std::{path::Path, time::Duration};

use anyhow::Context;

use crate::foundation::{
    core::Rgba8Premul,
    error::{PixelSlideError, PixelSlideResult},
};

/// Default reveal block edge in surface pixels.
pub const DEFAULT_BLOCK_SIZE: u32 = 32;

const ENV_SEED: &str = "PIXELSLIDE_SEED";
const ENV_BLOCK_SIZE: &str = "PIXELSLIDE_BLOCK_SIZE";

/// Tuning knobs for the block reveal.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Block edge length in surface pixels.
    pub block_size: u32,
    /// Probability that a block's ordering key follows the diagonal sweep instead of noise.
    pub diagonal_bias: f64,
    /// Trailing-edge shrink applied to the content of bordered blocks.
    pub border_inset: u32,
    /// Border color of bordered blocks, straight (non-premultiplied) RGBA8.
    pub border_rgba: [u8; 4],
    /// Rotation reached by rotated blocks at progress 1.0.
    pub max_rotation_deg: f64,
    /// Duration used when a caller does not supply one.
    pub default_duration_ms: u64,
    /// Fixed seed for variant assignment and ordering; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            diagonal_bias: 0.3,
            border_inset: 2,
            border_rgba: [255, 255, 255, 128],
            max_rotation_deg: 90.0,
            default_duration_ms: 1500,
            seed: None,
        }
    }
}

impl TransitionConfig {
    pub fn from_json_str(s: &str) -> PixelSlideResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PixelSlideError::serde(format!("transition config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> PixelSlideResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read transition config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `PIXELSLIDE_SEED` / `PIXELSLIDE_BLOCK_SIZE` when set and parseable.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = std::env::var(ENV_SEED)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.seed = Some(seed);
        }
        if let Some(size) = std::env::var(ENV_BLOCK_SIZE)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.block_size = size;
        }
        self
    }

    pub fn validate(&self) -> PixelSlideResult<()> {
        if self.block_size == 0 {
            return Err(PixelSlideError::validation("block_size must be > 0"));
        }
        if !self.diagonal_bias.is_finite() || !(0.0..=1.0).contains(&self.diagonal_bias) {
            return Err(PixelSlideError::validation(
                "diagonal_bias must be within [0, 1]",
            ));
        }
        if self.border_inset >= self.block_size {
            return Err(PixelSlideError::validation(
                "border_inset must be smaller than block_size",
            ));
        }
        if !self.max_rotation_deg.is_finite() {
            return Err(PixelSlideError::validation(
                "max_rotation_deg must be finite",
            ));
        }
        Ok(())
    }

    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    pub fn border_color(&self) -> Rgba8Premul {
        let [r, g, b, a] = self.border_rgba;
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
