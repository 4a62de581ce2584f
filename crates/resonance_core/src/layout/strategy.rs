//! Pluggable angle strategies for the layout engine.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::f64::consts::{PI, TAU};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Chooses the polar angle of the item at `index` out of `count`.
pub trait LayoutStrategy {
    fn angle(&self, index: usize, count: usize) -> f64;
}

/// Sunflower spiral: consecutive items are one golden angle apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoldenSpiral;

impl LayoutStrategy for GoldenSpiral {
    fn angle(&self, index: usize, _count: usize) -> f64 {
        index as f64 * PI * (3.0 - 5.0_f64.sqrt())
    }
}

/// Items evenly spaced around the full circle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Radial;

impl LayoutStrategy for Radial {
    fn angle(&self, index: usize, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        TAU * index as f64 / count as f64
    }
}

/// Serializable selector for the built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreset {
    #[default]
    GoldenSpiral,
    Radial,
}

impl LayoutPreset {
    pub fn strategy(self) -> &'static dyn LayoutStrategy {
        match self {
            Self::GoldenSpiral => &GoldenSpiral,
            Self::Radial => &Radial,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GoldenSpiral => "golden_spiral",
            Self::Radial => "radial",
        }
    }
}

/// Unknown layout preset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayoutPreset(pub String);

impl Display for UnknownLayoutPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported layout preset `{}`; expected golden_spiral|radial",
            self.0
        )
    }
}

impl Error for UnknownLayoutPreset {}

impl FromStr for LayoutPreset {
    type Err = UnknownLayoutPreset;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "golden_spiral" | "spiral" => Ok(Self::GoldenSpiral),
            "radial" => Ok(Self::Radial),
            other => Err(UnknownLayoutPreset(other.to_string())),
        }
    }
}
