use crate::model::Rect;

pub mod free_space;
pub mod maxrects;
pub mod skyline;

/// One footprint to place, already inflated by kerf and laid out in its resolved orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    pub width: f64,
    pub height: f64,
    pub rotation_allowed: bool,
}

impl PackItem {
    pub fn new(width: f64, height: f64, rotation_allowed: bool) -> Self {
        Self {
            width,
            height,
            rotation_allowed,
        }
    }
}

/// Where an item landed, relative to the sheet origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Placed footprint (post-rotation width/height).
    pub rect: Rect,
    /// True if the footprint was turned 90° by the packer.
    pub rotated: bool,
}

/// A packer places an ordered item list onto a single sheet.
///
/// The returned vector is index-aligned with `items`; `None` marks an item that did not fit.
/// Items are processed in the given order and placements must never overlap or leave
/// `0..sheet.w` x `0..sheet.h`. The sheet's own `x,y` are ignored.
pub trait Packer {
    fn pack(&self, sheet: &Rect, items: &[PackItem]) -> Vec<Option<Placement>>;
}
