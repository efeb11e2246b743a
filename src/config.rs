//! Crate-wide tunables (SPEC_FULL.md §2), mirroring the teacher's own
//! `config.rs`: a plain `serde`-derived struct with sane defaults,
//! loadable from a TOML file via `toml_edit`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Row count past which `enumerate` switches on `rayon` parallelism by
/// default when the caller didn't explicitly request `parallel`.
pub const DEFAULT_PARALLEL_ROW_THRESHOLD: u64 = 20_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default `tolerance` for equality comparisons on non-integral
    /// aggregates (spec.md §6: "a small default" when inputs aren't
    /// integral or the aggregate is `mean`).
    pub default_tolerance: f64,
    /// Row count above which `enumerate` auto-parallelises.
    pub parallel_row_threshold: u64,
    /// Hard cap on the number of rows a single call may materialise.
    pub max_rows: i64,
    /// Default `rayon` pool width when the caller passes `n_threads: None`
    /// but `parallel: true`.
    pub default_n_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_tolerance: 1e-9,
            parallel_row_threshold: DEFAULT_PARALLEL_ROW_THRESHOLD,
            max_rows: i32::MAX as i64,
            default_n_threads: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml_edit::de::Error> {
        toml_edit::de::from_str(text)
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Whether `n_rows` should auto-parallelise when the caller didn't
    /// explicitly opt in or out.
    pub fn should_parallelise(&self, n_rows: u64) -> bool {
        n_rows >= self.parallel_row_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = EngineConfig::default();
        assert_eq!(config.parallel_row_threshold, 20_000);
        assert_eq!(config.max_rows, i32::MAX as i64);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EngineConfig::default();
        let text = toml_edit::ser::to_string(&config).unwrap();
        let back = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.parallel_row_threshold, back.parallel_row_threshold);
    }
}
