use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CutlistError;

/// Packing strategies available to the engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Free-rectangle list scored with Best Short Side Fit.
    #[default]
    MaxRects,
    /// Bottom-left placement over a skyline profile.
    Skyline,
}

impl FromStr for Algorithm {
    type Err = CutlistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "maxrects" | "mr" => Ok(Self::MaxRects),
            "skyline" | "sky" => Ok(Self::Skyline),
            other => Err(CutlistError::InvalidConfig(format!(
                "unknown algorithm: {other}"
            ))),
        }
    }
}

/// Order in which outstanding demand is handed to the packer for each sheet.
/// Sorting is stable; `None` keeps the caller's order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    None,
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
    NameAsc,
}

impl FromStr for SortOrder {
    type Err = CutlistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "name_asc" => Ok(Self::NameAsc),
            other => Err(CutlistError::InvalidConfig(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

/// Snapshot of the settings provider. Passed in explicitly on every call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineDefaults {
    /// Saw-blade clearance added once per axis to every part.
    pub kerf: f64,
    /// Border inset from each sheet edge.
    pub margin: f64,
    /// Rotation permission for boards that do not state their own.
    pub allow_rotate: bool,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            kerf: 3.0,
            margin: 10.0,
            allow_rotate: true,
        }
    }
}

/// Per-call overrides. Unset fields fall back to [`EngineDefaults`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackOptions {
    pub kerf: Option<f64>,
    pub margin: Option<f64>,
    pub allow_rotate_default: Option<bool>,
    pub algorithm: Option<Algorithm>,
    pub sort_order: Option<SortOrder>,
}

/// Fully resolved engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub kerf: f64,
    pub margin: f64,
    pub allow_rotate_default: bool,
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::resolve(&EngineDefaults::default(), &PackOptions::default())
    }
}

fn length_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ if fallback.is_finite() && fallback >= 0.0 => fallback,
        _ => 0.0,
    }
}

impl EngineConfig {
    /// Merges per-call options over defaults. Missing, non-finite or negative lengths degrade to
    /// the default, and a broken default degrades to zero; this never fails.
    pub fn resolve(defaults: &EngineDefaults, options: &PackOptions) -> Self {
        Self {
            kerf: length_or(options.kerf, defaults.kerf),
            margin: length_or(options.margin, defaults.margin),
            allow_rotate_default: options
                .allow_rotate_default
                .unwrap_or(defaults.allow_rotate),
            algorithm: options.algorithm.unwrap_or_default(),
            sort_order: options.sort_order.unwrap_or_default(),
        }
    }

    /// Create a fluent builder for `EngineConfig`.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

/// Builder for `EngineConfig`. Lengths pass through the same fallback rules as
/// [`EngineConfig::resolve`].
#[derive(Debug, Default, Clone)]
pub struct EngineConfigBuilder {
    defaults: EngineDefaults,
    options: PackOptions,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn defaults(mut self, v: EngineDefaults) -> Self {
        self.defaults = v;
        self
    }
    pub fn kerf(mut self, v: f64) -> Self {
        self.options.kerf = Some(v);
        self
    }
    pub fn margin(mut self, v: f64) -> Self {
        self.options.margin = Some(v);
        self
    }
    pub fn allow_rotate_default(mut self, v: bool) -> Self {
        self.options.allow_rotate_default = Some(v);
        self
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.options.algorithm = Some(v);
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.options.sort_order = Some(v);
        self
    }
    pub fn build(self) -> EngineConfig {
        EngineConfig::resolve(&self.defaults, &self.options)
    }
}
