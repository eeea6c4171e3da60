use tracing::trace;

use super::free_space::{merge, prune_contained, split};
use super::{PackItem, Packer, Placement};
use crate::model::Rect;

/// MaxRects packer scoring candidates with Best Short Side Fit.
///
/// Items are placed in input order. Each placement is carved out of the free list (optionally
/// grown by a clearance fence on every side), then the list is merged and pruned.
#[derive(Debug, Clone, Default)]
pub struct MaxRectsPacker {
    fence: f64,
}

impl MaxRectsPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `fence` units around every used rectangle. Negative or non-finite values are ignored.
    pub fn with_fence(mut self, fence: f64) -> Self {
        self.fence = if fence.is_finite() && fence > 0.0 {
            fence
        } else {
            0.0
        };
        self
    }

    pub fn fence(&self) -> f64 {
        self.fence
    }
}

impl Packer for MaxRectsPacker {
    fn pack(&self, sheet: &Rect, items: &[PackItem]) -> Vec<Option<Placement>> {
        let mut bin = MaxRectsBin::new(sheet.w, sheet.h, self.fence);
        items.iter().map(|item| bin.insert(item)).collect()
    }
}

/// Free-space state of one sheet.
#[derive(Debug, Clone)]
pub struct MaxRectsBin {
    free: Vec<Rect>,
    fence: f64,
}

impl MaxRectsBin {
    pub fn new(width: f64, height: f64, fence: f64) -> Self {
        let sheet = Rect::new(0.0, 0.0, width, height);
        Self {
            free: if sheet.is_empty() { Vec::new() } else { vec![sheet] },
            fence,
        }
    }

    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    /// Places `item` if any free rectangle admits it; free space is untouched otherwise.
    pub fn insert(&mut self, item: &PackItem) -> Option<Placement> {
        let placement = self.find_position(item)?;
        self.place_rect(&placement.rect);
        trace!(
            x = placement.rect.x,
            y = placement.rect.y,
            rotated = placement.rotated,
            free = self.free.len(),
            "maxrects placed"
        );
        Some(placement)
    }

    fn short_side_fit(fr: &Rect, w: f64, h: f64) -> f64 {
        (fr.h - h).min(fr.w - w)
    }

    fn find_position(&self, item: &PackItem) -> Option<Placement> {
        let (w, h) = (item.width, item.height);
        let mut best: Option<(f64, Placement)> = None;

        let mut consider = |fr: &Rect, w: f64, h: f64, rotated: bool| {
            if fr.w < w || fr.h < h {
                return;
            }
            let score = Self::short_side_fit(fr, w, h);
            if best.as_ref().is_none_or(|(s, _)| score < *s) {
                best = Some((
                    score,
                    Placement {
                        rect: Rect::new(fr.x, fr.y, w, h),
                        rotated,
                    },
                ));
            }
        };

        for fr in &self.free {
            consider(fr, w, h, false);
            if item.rotation_allowed {
                consider(fr, h, w, true);
            }
        }
        best.map(|(_, p)| p)
    }

    fn place_rect(&mut self, node: &Rect) {
        let fenced = node.inflate(self.fence);
        let mut new_free: Vec<Rect> = Vec::with_capacity(self.free.len() + 3);
        for fr in self.free.drain(..) {
            new_free.extend(split(fr, &fenced));
        }
        self.free = prune_contained(merge(new_free));
    }
}
