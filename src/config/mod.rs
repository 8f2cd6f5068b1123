//! Workbench configuration, loadable from JSON.
//!
//! Every field has a default, so `{}` is a valid document and partial files
//! only override what they name.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ForgeError, Result};
use crate::latency::LatencyRange;
use crate::panel::PanelKind;

/// Inclusive bounds on how many research entries one search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SampleRange {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub tick_interval_ms: u64,
    pub idea_latency: LatencyRange,
    pub research_latency: LatencyRange,
    pub code_latency: LatencyRange,
    pub research_sample: SampleRange,
    pub copy_ack_ms: u64,
    /// Fixed RNG seed; each panel derives its own stream from it.
    pub seed: Option<u64>,
    pub log_path: Option<PathBuf>,
    pub log_max_bytes: u64,
    /// Zero disables metrics snapshots.
    pub metrics_interval_ms: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            idea_latency: LatencyRange {
                min_ms: 800,
                max_ms: 1600,
            },
            research_latency: LatencyRange {
                min_ms: 1000,
                max_ms: 2000,
            },
            code_latency: LatencyRange {
                min_ms: 1200,
                max_ms: 2400,
            },
            research_sample: SampleRange { min: 3, max: 5 },
            copy_ack_ms: 2000,
            seed: None,
            log_path: None,
            log_max_bytes: 1024 * 1024,
            metrics_interval_ms: 5000,
        }
    }
}

/// Per-panel slice of [`ForgeConfig`] handed to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    pub latency: LatencyRange,
    pub sample: SampleRange,
    pub copy_ack: Duration,
    pub seed: Option<u64>,
}

impl ForgeConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.idea_latency.validate()?;
        self.research_latency.validate()?;
        self.code_latency.validate()?;
        if self.research_sample.min == 0 || self.research_sample.min > self.research_sample.max {
            return Err(ForgeError::Configuration(format!(
                "research sample {}..={} must be non-empty and ordered",
                self.research_sample.min, self.research_sample.max
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ForgeError::Configuration(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    pub fn panel_settings(&self, kind: PanelKind) -> PanelSettings {
        let latency = match kind {
            PanelKind::Idea => self.idea_latency,
            PanelKind::Research => self.research_latency,
            PanelKind::Code => self.code_latency,
        };
        PanelSettings {
            latency,
            sample: self.research_sample,
            copy_ack: Duration::from_millis(self.copy_ack_ms),
            seed: self.seed.map(|seed| seed.wrapping_add(kind.index() as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ForgeConfig::from_json_str("{}").unwrap();
        assert_eq!(config.copy_ack_ms, 2000);
        assert_eq!(config.research_sample, SampleRange { min: 3, max: 5 });
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = ForgeConfig::from_json_str(
            r#"{ "seed": 9, "idea_latency": { "min_ms": 10, "max_ms": 20 } }"#,
        )
        .unwrap();
        let idea = config.panel_settings(PanelKind::Idea);
        assert_eq!(idea.latency, LatencyRange { min_ms: 10, max_ms: 20 });
        assert_eq!(idea.seed, Some(9));
        assert_eq!(config.panel_settings(PanelKind::Code).seed, Some(11));
    }

    #[test]
    fn inverted_latency_is_rejected() {
        let err = ForgeConfig::from_json_str(
            r#"{ "code_latency": { "min_ms": 900, "max_ms": 100 } }"#,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_sample_is_rejected() {
        let err = ForgeConfig::from_json_str(r#"{ "research_sample": { "min": 0, "max": 0 } }"#)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn malformed_json_surfaces_serde_error() {
        let err = ForgeConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ForgeError::Serde(_)));
    }
}
