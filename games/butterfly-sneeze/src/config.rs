use bloom_engine::{LoadError, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted `particle_count`.
pub const MAX_PARTICLES: usize = 1000;

/// Holds between the steps of a sneeze sequence, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceTiming {
    /// Flower's opening line stays up before the butterfly starts to sneeze.
    pub initial_dialogue_ms: f64,
    /// Sneezing face before the droplets fly.
    pub sneeze_windup_ms: f64,
    /// Droplets in the air before the flower reacts.
    pub particle_settle_ms: f64,
    /// Flower's reaction line.
    pub reaction_ms: f64,
    /// Sad butterfly before moving on to the next flower.
    pub sad_ms: f64,
    /// Happy butterfly before the end screen.
    pub farewell_ms: f64,
    /// Lifetime of a droplet burst. Runs independently of the holds above.
    pub particle_clear_ms: f64,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self {
            initial_dialogue_ms: 2500.0,
            sneeze_windup_ms: 500.0,
            particle_settle_ms: 200.0,
            reaction_ms: 2500.0,
            sad_ms: 1500.0,
            farewell_ms: 1000.0,
            particle_clear_ms: 1000.0,
        }
    }
}

impl SequenceTiming {
    fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("initial_dialogue_ms", self.initial_dialogue_ms),
            ("sneeze_windup_ms", self.sneeze_windup_ms),
            ("particle_settle_ms", self.particle_settle_ms),
            ("reaction_ms", self.reaction_ms),
            ("sad_ms", self.sad_ms),
            ("farewell_ms", self.farewell_ms),
            ("particle_clear_ms", self.particle_clear_ms),
        ]
    }
}

/// Gameplay tuning. Every field has the reference value as its default, so a
/// JSON document only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    pub timing: SequenceTiming,
    /// Droplets per sneeze.
    pub particle_count: usize,
    /// Pointer-to-flower distance below which the flower highlights.
    pub near_radius: f32,
    /// Side of the square flower sprite; also its click box.
    pub flower_size: f32,
    pub butterfly_size: f32,
    /// Butterfly position before the first pointer move, as `[x, y]`.
    pub initial_pointer: Vec2,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            timing: SequenceTiming::default(),
            particle_count: 15,
            near_radius: 100.0,
            flower_size: 128.0,
            butterfly_size: 96.0,
            initial_pointer: Vec2::new(100.0, 100.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` is out of range (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

impl From<ConfigError> for LoadError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Json(e) => LoadError::Json(e),
            other => LoadError::Invalid(other.to_string()),
        }
    }
}

impl PlayConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("near_radius", f64::from(self.near_radius)),
            ("flower_size", f64::from(self.flower_size)),
            ("butterfly_size", f64::from(self.butterfly_size)),
        ];
        for (field, value) in self.timing.fields().into_iter().chain(sizes) {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::OutOfRange {
                field: "particle_count",
                value: self.particle_count as f64,
            });
        }
        Ok(())
    }
}
