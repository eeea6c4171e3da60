use tracing::trace;

use super::{PackItem, Packer, Placement};
use crate::model::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkylineNode {
    pub x: f64,
    pub y: f64,
    pub w: f64,
}

impl SkylineNode {
    #[inline]
    fn right(&self) -> f64 {
        self.x + self.w
    }
}

/// Bottom-left skyline packer.
///
/// Each item is tried in both allowed orientations flush on top of every single segment; the
/// candidate with the lowest `y` wins, ties broken by lowest `x`.
#[derive(Debug, Clone, Default)]
pub struct SkylinePacker;

impl SkylinePacker {
    pub fn new() -> Self {
        Self
    }
}

impl Packer for SkylinePacker {
    fn pack(&self, sheet: &Rect, items: &[PackItem]) -> Vec<Option<Placement>> {
        let mut bin = SkylineBin::new(sheet.w, sheet.h);
        items.iter().map(|item| bin.insert(item)).collect()
    }
}

/// Skyline profile of one sheet.
#[derive(Debug, Clone)]
pub struct SkylineBin {
    height: f64,
    skylines: Vec<SkylineNode>,
}

impl SkylineBin {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            height,
            skylines: if width > 0.0 && height > 0.0 {
                vec![SkylineNode {
                    x: 0.0,
                    y: 0.0,
                    w: width,
                }]
            } else {
                Vec::new()
            },
        }
    }

    pub fn skylines(&self) -> &[SkylineNode] {
        &self.skylines
    }

    pub fn insert(&mut self, item: &PackItem) -> Option<Placement> {
        let placement = self.find_bottom_left(item)?;
        self.carve(&placement.rect);
        self.merge();
        trace!(
            x = placement.rect.x,
            y = placement.rect.y,
            rotated = placement.rotated,
            segments = self.skylines.len(),
            "skyline placed"
        );
        Some(placement)
    }

    fn can_put(&self, seg: &SkylineNode, w: f64, h: f64) -> Option<Rect> {
        if w > seg.w || seg.y + h > self.height {
            return None;
        }
        Some(Rect::new(seg.x, seg.y, w, h))
    }

    fn find_bottom_left(&self, item: &PackItem) -> Option<Placement> {
        let mut best: Option<Placement> = None;
        let mut consider = |candidate: Option<Rect>, rotated: bool| {
            let Some(r) = candidate else { return };
            let better = match &best {
                None => true,
                Some(b) => r.y < b.rect.y || (r.y == b.rect.y && r.x < b.rect.x),
            };
            if better {
                best = Some(Placement { rect: r, rotated });
            }
        };

        for seg in &self.skylines {
            consider(self.can_put(seg, item.width, item.height), false);
            if item.rotation_allowed {
                consider(self.can_put(seg, item.height, item.width), true);
            }
        }
        best
    }

    /// Replaces the profile under `rect`'s horizontal span with a segment at its top edge.
    fn carve(&mut self, rect: &Rect) {
        let (left, right) = (rect.x, rect.right());
        let mut next: Vec<SkylineNode> = Vec::with_capacity(self.skylines.len() + 2);
        let mut inserted = false;
        for seg in &self.skylines {
            if seg.right() <= left || seg.x >= right {
                if !inserted && seg.x >= right {
                    next.push(SkylineNode {
                        x: left,
                        y: rect.bottom(),
                        w: rect.w,
                    });
                    inserted = true;
                }
                next.push(*seg);
                continue;
            }
            if seg.x < left {
                next.push(SkylineNode {
                    x: seg.x,
                    y: seg.y,
                    w: left - seg.x,
                });
            }
            if !inserted {
                next.push(SkylineNode {
                    x: left,
                    y: rect.bottom(),
                    w: rect.w,
                });
                inserted = true;
            }
            if seg.right() > right {
                next.push(SkylineNode {
                    x: right,
                    y: seg.y,
                    w: seg.right() - right,
                });
            }
        }
        if !inserted {
            next.push(SkylineNode {
                x: left,
                y: rect.bottom(),
                w: rect.w,
            });
        }
        self.skylines = next;
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skylines.len() {
            if self.skylines[i - 1].y == self.skylines[i].y {
                let w = self.skylines[i].w;
                self.skylines[i - 1].w += w;
                self.skylines.remove(i);
            } else {
                i += 1;
            }
        }
    }
}
