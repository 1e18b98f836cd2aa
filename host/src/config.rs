//! Runner configuration
//!
//! Loaded in layers: defaults, then an optional JSON file, then
//! `MAZE_*` environment variables, then command-line flags.

use std::path::Path;
use std::time::Duration;

use maze_core::{Difficulty, DEFAULT_BATCH_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunnerError};

/// Viewport in pixels; the grid is sized to fill it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    /// 1 (easy) to 10 (hard); drives cell size and minimum Start/End distance
    pub difficulty: u8,

    pub viewport: Viewport,

    /// Explicit grid size; each one overrides the viewport on its own axis
    pub rows: Option<usize>,
    pub cols: Option<usize>,

    /// RNG seed; a random one is drawn when absent
    pub seed: Option<u32>,

    /// Frontier pops between generation yield points
    pub batch_size: usize,

    /// Pause at each generation yield point
    pub generation_delay_ms: u64,

    /// Pause after each solver expansion
    pub solve_delay_ms: u64,

    /// Pause between a finished carve and the solve
    pub post_generate_pause_ms: u64,

    /// Pause between a finished solve and the next carve
    pub post_solve_pause_ms: u64,

    /// Stop after this many solved cycles; unbounded when absent
    pub max_cycles: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default().level(),
            viewport: Viewport::default(),
            rows: None,
            cols: None,
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
            generation_delay_ms: 10,
            solve_delay_ms: 20,
            post_generate_pause_ms: 500,
            post_solve_pause_ms: 1000,
            max_cycles: None,
        }
    }
}

impl RunnerConfig {
    /// Defaults with every delay set to zero.
    pub fn instant() -> Self {
        Self {
            generation_delay_ms: 0,
            solve_delay_ms: 0,
            post_generate_pause_ms: 0,
            post_solve_pause_ms: 0,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RunnerConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MAZE_DIFFICULTY`, `MAZE_SEED` and `MAZE_BATCH_SIZE` from the
    /// process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MAZE_DIFFICULTY") {
            self.difficulty = parse_var("MAZE_DIFFICULTY", &value)?;
        }
        if let Some(value) = lookup("MAZE_SEED") {
            self.seed = Some(parse_var("MAZE_SEED", &value)?);
        }
        if let Some(value) = lookup("MAZE_BATCH_SIZE") {
            self.batch_size = parse_var("MAZE_BATCH_SIZE", &value)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if Difficulty::new(self.difficulty).is_none() {
            return Err(RunnerError::InvalidConfig(format!(
                "difficulty must be between {} and {}, got {}",
                Difficulty::MIN,
                Difficulty::MAX,
                self.difficulty
            )));
        }
        if self.batch_size == 0 {
            return Err(RunnerError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.rows == Some(0) || self.cols == Some(0) {
            return Err(RunnerError::InvalidConfig(
                "grid dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::clamped(self.difficulty)
    }

    /// Requested `(rows, cols)` before odd-forcing. An axis without an
    /// explicit size takes its size from the viewport.
    pub fn grid_size(&self) -> (usize, usize) {
        let (fit_rows, fit_cols) = self
            .difficulty()
            .grid_for_viewport(self.viewport.width, self.viewport.height);
        (self.rows.unwrap_or(fit_rows), self.cols.unwrap_or(fit_cols))
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    pub fn solve_delay(&self) -> Duration {
        Duration::from_millis(self.solve_delay_ms)
    }

    pub fn post_generate_pause(&self) -> Duration {
        Duration::from_millis(self.post_generate_pause_ms)
    }

    pub fn post_solve_pause(&self) -> Duration {
        Duration::from_millis(self.post_solve_pause_ms)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RunnerError::InvalidConfig(format!("{}: cannot parse '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = RunnerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.post_generate_pause(), Duration::from_millis(500));
        assert_eq!(config.post_solve_pause(), Duration::from_millis(1000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{ "difficulty": 8, "rows": 21, "cols": 31 }"#).unwrap();
        assert_eq!(config.difficulty, 8);
        assert_eq!(config.grid_size(), (21, 31));
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_grid_size_from_viewport() {
        let config = RunnerConfig {
            difficulty: 1,
            ..RunnerConfig::default()
        };
        assert_eq!(config.grid_size(), (15, 19));
    }

    #[test]
    fn test_single_explicit_axis_keeps_viewport_for_the_other() {
        let config = RunnerConfig {
            difficulty: 1,
            rows: Some(7),
            ..RunnerConfig::default()
        };
        assert_eq!(config.grid_size(), (7, 19));

        let config = RunnerConfig {
            difficulty: 1,
            cols: Some(33),
            ..RunnerConfig::default()
        };
        assert_eq!(config.grid_size(), (15, 33));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("MAZE_DIFFICULTY", "3"), ("MAZE_SEED", " 42 ")]);
        let mut config = RunnerConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.difficulty, 3);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = RunnerConfig::default();
        let err = config
            .apply_overrides(|key| (key == "MAZE_BATCH_SIZE").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, RunnerError::InvalidConfig(_)));

        let config = RunnerConfig {
            difficulty: 11,
            ..RunnerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RunnerConfig {
            batch_size: 0,
            ..RunnerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
