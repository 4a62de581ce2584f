//! Engine configuration and per-surface presets.
//!
//! # Responsibility
//! - Group every engine tunable (similarity, layout, echo, recency, masking).
//! - Provide named presets for the atlas, archive and echo surfaces over the
//!   same engine instead of per-surface reimplementations.
//! - Decode partial JSON configs and validate ranges.
//!
//! # Invariants
//! - Every preset passes `validate()`.
//! - Missing JSON sections or fields fall back to defaults.

use crate::layout::{LayoutOptions, LayoutPreset};
use crate::obfuscation::ObfuscationOptions;
use crate::selection::echo::EchoOptions;
use crate::selection::recency::RecencyOptions;
use crate::similarity::graph::SimilarityOptions;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Configuration decoding/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Payload is not valid JSON for `EngineConfig`.
    Parse(serde_json::Error),
    /// A field is outside its accepted range.
    Invalid { field: &'static str, reason: String },
    /// Unknown surface preset name.
    UnknownSurface(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid engine config: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
            Self::UnknownSurface(value) => write!(
                f,
                "unsupported surface preset `{value}`; expected atlas|archive|echo"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// UI surfaces with a named engine preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfacePreset {
    /// Graph-style overview of all writing.
    Atlas,
    /// Star-map archive.
    Archive,
    /// Per-article related-item panel.
    Echo,
}

impl SurfacePreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atlas => "atlas",
            Self::Archive => "archive",
            Self::Echo => "echo",
        }
    }

    pub fn config(self) -> EngineConfig {
        match self {
            Self::Atlas => EngineConfig::atlas(),
            Self::Archive => EngineConfig::archive(),
            Self::Echo => EngineConfig::echo(),
        }
    }
}

impl FromStr for SurfacePreset {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "atlas" => Ok(Self::Atlas),
            "archive" => Ok(Self::Archive),
            "echo" => Ok(Self::Echo),
            other => Err(ConfigError::UnknownSurface(other.to_string())),
        }
    }
}

/// Full set of engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub similarity: SimilarityOptions,
    pub layout: LayoutOptions,
    pub echo: EchoOptions,
    pub recency: RecencyOptions,
    pub obfuscation: ObfuscationOptions,
}

impl EngineConfig {
    /// Graph view: moderate threshold, golden spiral placement.
    pub fn atlas() -> Self {
        Self::default()
    }

    /// Star map: stricter edges, more of them, radial placement.
    pub fn archive() -> Self {
        Self {
            similarity: SimilarityOptions {
                threshold: 0.34,
                max_edges: 64,
            },
            layout: LayoutOptions {
                preset: LayoutPreset::Radial,
                base_radius: 0.12,
                radius_scale: 0.025,
                jitter: 0.08,
                size_min: 0.6,
                size_max: 2.4,
                ..LayoutOptions::default()
            },
            ..Self::default()
        }
    }

    /// Per-article echo panel.
    pub fn echo() -> Self {
        Self {
            similarity: SimilarityOptions {
                threshold: 0.2,
                max_edges: 12,
            },
            ..Self::default()
        }
    }

    /// Decodes a (possibly partial) JSON config and validates it.
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every tunable against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("similarity.threshold", self.similarity.threshold)?;
        check_unit("echo.anomaly_rate", self.echo.anomaly_rate)?;
        check_unit("obfuscation.reveal_ratio", self.obfuscation.reveal_ratio)?;

        let margin = self.layout.margin;
        if !margin.is_finite() || !(0.0..0.5).contains(&margin) {
            return Err(invalid("layout.margin", format!("{margin} not in [0, 0.5)")));
        }
        for (field, value) in [
            ("layout.base_radius", self.layout.base_radius),
            ("layout.radius_scale", self.layout.radius_scale),
            ("layout.jitter", self.layout.jitter),
            ("layout.size_min", self.layout.size_min),
            ("layout.size_max", self.layout.size_max),
            ("recency.coefficient", self.recency.coefficient),
            ("echo.weights.overlap", self.echo.weights.overlap),
            ("echo.weights.jaccard", self.echo.weights.jaccard),
            ("echo.weights.jitter", self.echo.weights.jitter),
        ] {
            check_non_negative(field, value)?;
        }
        if self.layout.size_min > self.layout.size_max {
            return Err(invalid(
                "layout.size_min",
                format!(
                    "{} exceeds size_max {}",
                    self.layout.size_min, self.layout.size_max
                ),
            ));
        }
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(invalid(field, format!("{value} not in [0, 1]")))
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(invalid(field, format!("{value} must be finite and >= 0")))
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
