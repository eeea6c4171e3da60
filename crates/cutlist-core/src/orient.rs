//! Rotation and grain resolution.
//!
//! Grain is expressed relative to the sheet's x axis (the board's width). A grain lock always
//! wins over the rotation directive; the packer only ever sees the resulting
//! `rotation_allowed` flag and a footprint already laid out in the locked orientation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CutlistError;

/// Per-part rotation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirective {
    Never,
    Always,
    /// Use the board/material rotation permission.
    #[default]
    #[serde(alias = "inherit_from_material", alias = "inheritFromMaterial")]
    Inherit,
}

impl FromStr for RotationDirective {
    type Err = CutlistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "no" | "false" => Ok(Self::Never),
            "always" | "yes" | "true" => Ok(Self::Always),
            "inherit" | "inherit_from_material" | "inheritfrommaterial" | "" => Ok(Self::Inherit),
            other => Err(CutlistError::InvalidConfig(format!(
                "unknown rotation directive: {other}"
            ))),
        }
    }
}

/// Required grain direction of a part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grain {
    #[default]
    None,
    /// The part's width must run along the sheet's x axis.
    #[serde(alias = "alongWidthAxis")]
    AlongWidth,
    /// The part's height must run along the sheet's x axis.
    #[serde(alias = "alongLengthAxis")]
    AlongLength,
}

impl Grain {
    pub fn is_locked(self) -> bool {
        !matches!(self, Grain::None)
    }
}

impl FromStr for Grain {
    type Err = CutlistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "along_width" | "alongwidthaxis" | "width" => Ok(Self::AlongWidth),
            "along_length" | "alonglengthaxis" | "length" => Ok(Self::AlongLength),
            other => Err(CutlistError::InvalidConfig(format!("unknown grain: {other}"))),
        }
    }
}

/// Concrete orientation handed to the packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Footprint width before any packer rotation.
    pub width: f64,
    /// Footprint height before any packer rotation.
    pub height: f64,
    /// Whether the packer may try the 90° footprint.
    pub rotation_allowed: bool,
    /// The footprint was swapped up front to honor a grain lock.
    pub pre_rotated: bool,
}

impl Orientation {
    /// Final rotation flag relative to the part's nominal width/height.
    pub fn rotated(&self, packer_rotated: bool) -> bool {
        self.pre_rotated != packer_rotated
    }
}

/// Decides the orientation of one demand unit.
///
/// `material_allows_rotation` is the board's own permission, consulted only for
/// `RotationDirective::Inherit` when no grain lock is present.
pub fn resolve(
    rotation: RotationDirective,
    grain: Grain,
    material_allows_rotation: bool,
    width: f64,
    height: f64,
) -> Orientation {
    match grain {
        Grain::AlongWidth => Orientation {
            width,
            height,
            rotation_allowed: false,
            pre_rotated: false,
        },
        Grain::AlongLength => Orientation {
            width: height,
            height: width,
            rotation_allowed: false,
            pre_rotated: true,
        },
        Grain::None => Orientation {
            width,
            height,
            rotation_allowed: match rotation {
                RotationDirective::Never => false,
                RotationDirective::Always => true,
                RotationDirective::Inherit => material_allows_rotation,
            },
            pre_rotated: false,
        },
    }
}
