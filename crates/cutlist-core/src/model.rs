use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::orient::{Grain, RotationDirective};

/// Axis-aligned rectangle in the caller's length unit. `x,y` is top-left (y grows downward);
/// `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    pub fn area(&self) -> f64 {
        self.w * self.h
    }
    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
    /// True if the interiors overlap. Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || other.x >= self.right()
            || self.y >= other.bottom()
            || other.y >= self.bottom())
    }
    /// Returns true if `r` is fully inside `self` (edges may coincide).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Grows the rectangle by `by` on every side.
    pub fn inflate(&self, by: f64) -> Rect {
        Rect::new(self.x - by, self.y - by, self.w + by * 2.0, self.h + by * 2.0)
    }
}

/// How many physical copies of a board the registry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CopiesRepr", into = "CopiesOut")]
pub enum Copies {
    Finite(u32),
    /// Effectively unlimited stock, consumed one instance at a time.
    Unbounded,
}

impl Default for Copies {
    fn default() -> Self {
        Copies::Finite(1)
    }
}

impl Copies {
    /// Parses a raw copy count. Fractions are floored and negatives clamp to zero.
    pub fn from_count(raw: f64) -> Self {
        if raw.is_nan() || raw <= 0.0 {
            Copies::Finite(0)
        } else if raw.is_infinite() {
            Copies::Unbounded
        } else {
            Copies::Finite(raw.floor().min(u32::MAX as f64) as u32)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CopiesRepr {
    Count(f64),
    Word(String),
}

#[derive(Serialize)]
#[serde(untagged)]
enum CopiesOut {
    Count(u32),
    Word(&'static str),
}

impl TryFrom<CopiesRepr> for Copies {
    type Error = String;
    fn try_from(value: CopiesRepr) -> Result<Self, Self::Error> {
        match value {
            CopiesRepr::Count(n) => Ok(Copies::from_count(n)),
            CopiesRepr::Word(w) => match w.trim().to_ascii_lowercase().as_str() {
                "unbounded" | "unlimited" | "infinite" | "inf" => Ok(Copies::Unbounded),
                other => other
                    .parse::<f64>()
                    .map(Copies::from_count)
                    .map_err(|_| format!("invalid copy count: {w}")),
            },
        }
    }
}

impl From<Copies> for CopiesOut {
    fn from(value: Copies) -> Self {
        match value {
            Copies::Finite(n) => CopiesOut::Count(n),
            Copies::Unbounded => CopiesOut::Word("unbounded"),
        }
    }
}

/// Stock sheet as supplied by the material registry. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSpec {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub copies: Copies,
    #[serde(default)]
    pub material: String,
    /// Material-level rotation permission consulted by `RotationDirective::Inherit`.
    /// `None` falls back to the configured default.
    #[serde(default)]
    pub allow_rotate: Option<bool>,
}

impl BoardSpec {
    pub fn new(id: impl Into<String>, width: f64, height: f64, copies: Copies) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            copies,
            material: String::new(),
            allow_rotate: None,
        }
    }
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }
    pub fn with_allow_rotate(mut self, allow: bool) -> Self {
        self.allow_rotate = Some(allow);
        self
    }
}

fn default_quantity() -> f64 {
    1.0
}

/// A logical part in the cut list, already normalized to the shared length unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub rotation: RotationDirective,
    #[serde(default)]
    pub grain: Grain,
    #[serde(default)]
    pub material: String,
    /// Extra columns carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl PartSpec {
    pub fn new(name: impl Into<String>, width: f64, height: f64, quantity: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            width,
            height,
            quantity,
            rotation: RotationDirective::default(),
            grain: Grain::default(),
            material: String::new(),
            extra: BTreeMap::new(),
        }
    }
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }
    pub fn with_rotation(mut self, rotation: RotationDirective) -> Self {
        self.rotation = rotation;
        self
    }
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    /// Key used to count outstanding demand: the explicit id when present,
    /// otherwise `name:WxH`.
    pub fn signature(&self) -> String {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}:{}x{}", self.name, self.width, self.height),
        }
    }

    /// Number of physical copies to cut (floored, never negative).
    pub fn units(&self) -> usize {
        if self.quantity.is_nan() || self.quantity <= 0.0 {
            0
        } else {
            self.quantity.floor().min(u32::MAX as f64) as usize
        }
    }
}

/// Normalized grouping key: trimmed, inner whitespace collapsed, lowercased.
pub fn material_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One physical copy of a part awaiting placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestablePart {
    pub signature: String,
    pub id: Option<String>,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub rotation: RotationDirective,
    pub grain: Grain,
    /// Normalized material key.
    pub material: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl NestablePart {
    pub fn from_spec(spec: &PartSpec) -> Self {
        Self {
            signature: spec.signature(),
            id: spec.id.clone(),
            name: spec.name.clone(),
            width: spec.width,
            height: spec.height,
            rotation: spec.rotation,
            grain: spec.grain,
            material: material_key(&spec.material),
            extra: spec.extra.clone(),
        }
    }
}

/// A part placed on a sheet, in absolute sheet coordinates (margin included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPart {
    pub signature: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// On-sheet extent without kerf (swapped relative to the part when `rotated`).
    pub width: f64,
    pub height: f64,
    /// True if the part was turned 90° relative to its nominal width/height.
    pub rotated: bool,
    pub board_instance_index: usize,
}

impl PlacedPart {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A consumed board instance holding at least one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub board_id: String,
    pub board_instance_index: usize,
    pub width: f64,
    pub height: f64,
    pub placed: Vec<PlacedPart>,
}

impl SheetLayout {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
    /// Sum of placed part areas (kerf excluded).
    pub fn used_area(&self) -> f64 {
        self.placed.iter().map(|p| p.width * p.height).sum()
    }
    /// Used area over board area (0.0 to 1.0).
    pub fn utilization(&self) -> f64 {
        let area = self.area();
        if area > 0.0 {
            self.used_area() / area
        } else {
            0.0
        }
    }
}

/// Output of a packing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackResult {
    /// Consumed sheets per normalized material key, in consumption order.
    pub by_material: BTreeMap<String, Vec<SheetLayout>>,
    /// Demand units that found no room.
    pub unplaced: Vec<NestablePart>,
}

impl PackResult {
    /// All sheets across materials, materials in key order.
    pub fn sheets(&self) -> impl Iterator<Item = &SheetLayout> {
        self.by_material.values().flatten()
    }

    pub fn placed_count(&self) -> usize {
        self.sheets().map(|s| s.placed.len()).sum()
    }

    /// Computes sheet consumption statistics for this result.
    pub fn stats(&self) -> PackStats {
        let mut stats = PackStats {
            materials: self.by_material.len(),
            unplaced: self.unplaced.len(),
            ..Default::default()
        };
        for sheet in self.sheets() {
            stats.sheets += 1;
            stats.sheet_area += sheet.area();
            stats.used_area += sheet.used_area();
            stats.placed += sheet.placed.len();
            stats.rotated += sheet.placed.iter().filter(|p| p.rotated).count();
        }
        stats.utilization = if stats.sheet_area > 0.0 {
            stats.used_area / stats.sheet_area
        } else {
            0.0
        };
        stats
    }
}

/// Statistics about sheet consumption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackStats {
    /// Material groups that consumed at least one sheet.
    pub materials: usize,
    pub sheets: usize,
    pub placed: usize,
    pub unplaced: usize,
    pub rotated: usize,
    /// Total area of consumed sheets.
    pub sheet_area: f64,
    /// Total area of placed parts (kerf excluded).
    pub used_area: f64,
    /// used_area / sheet_area (0.0 to 1.0).
    pub utilization: f64,
}

impl PackStats {
    pub fn wasted_area(&self) -> f64 {
        (self.sheet_area - self.used_area).max(0.0)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.sheet_area > 0.0 {
            self.wasted_area() / self.sheet_area * 100.0
        } else {
            0.0
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PackStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sheets: {}, Placed: {}, Unplaced: {}, Utilization: {:.2}%, Sheet Area: {:.0}, Used Area: {:.0}, Rotated: {}",
            self.sheets,
            self.placed,
            self.unplaced,
            self.utilization * 100.0,
            self.sheet_area,
            self.used_area,
            self.rotated,
        )
    }
}
