//! Game configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```
//! use blockfall_core::{GameConfig, Randomizer};
//!
//! let cfg = GameConfig::from_json(r#"{ "randomizer": "seven_bag", "gravity": { "floor_ms": 80 } }"#).unwrap();
//! assert_eq!(cfg.randomizer, Randomizer::SevenBag);
//! assert_eq!(cfg.gravity.floor_ms, 80);
//! assert_eq!(cfg.gravity.base_ms, 1000);
//! assert_eq!(cfg.line_clear_delay_ms, 300);
//! ```

use serde::{Deserialize, Serialize};

use crate::rng::Randomizer;
use crate::scoring::GravityCurve;
use crate::types::{FRAME_MS, LINE_CLEAR_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the piece randomizer
    pub seed: u32,
    pub randomizer: Randomizer,
    pub gravity: GravityCurve,
    /// Blink delay before full rows are removed
    pub line_clear_delay_ms: u32,
    /// Host frame interval
    pub frame_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            randomizer: Randomizer::default(),
            gravity: GravityCurve::default(),
            line_clear_delay_ms: LINE_CLEAR_DELAY_MS,
            frame_ms: FRAME_MS,
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain data with derived Serialize; this cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_randomizer(mut self, randomizer: Randomizer) -> Self {
        self.randomizer = randomizer;
        self
    }
}
