//! Free-rectangle bookkeeping shared by the MaxRects packer.
//!
//! Every function takes its list by value and returns a fresh one.

use crate::model::Rect;

/// Cuts `used` out of `free` and returns the remaining slivers.
///
/// Top and bottom slivers span the full width of `free`; left and right slivers span only the
/// band covered by `used`, so the results are pairwise disjoint. Zero-area slivers are dropped.
/// A `free` rectangle that does not intersect `used` is returned unchanged.
pub fn split(free: Rect, used: &Rect) -> Vec<Rect> {
    if !free.intersects(used) {
        return vec![free];
    }
    let ix1 = free.x.max(used.x);
    let iy1 = free.y.max(used.y);
    let ix2 = free.right().min(used.right());
    let iy2 = free.bottom().min(used.bottom());

    let slivers = [
        // above
        Rect::new(free.x, free.y, free.w, iy1 - free.y),
        // below
        Rect::new(free.x, iy2, free.w, free.bottom() - iy2),
        // left
        Rect::new(free.x, iy1, ix1 - free.x, iy2 - iy1),
        // right
        Rect::new(ix2, iy1, free.right() - ix2, iy2 - iy1),
    ];
    slivers.into_iter().filter(|r| !r.is_empty()).collect()
}

fn union_if_adjacent(a: &Rect, b: &Rect) -> Option<Rect> {
    if a.y == b.y && a.h == b.h {
        if a.right() == b.x {
            return Some(Rect::new(a.x, a.y, a.w + b.w, a.h));
        }
        if b.right() == a.x {
            return Some(Rect::new(b.x, a.y, a.w + b.w, a.h));
        }
    }
    if a.x == b.x && a.w == b.w {
        if a.bottom() == b.y {
            return Some(Rect::new(a.x, a.y, a.w, a.h + b.h));
        }
        if b.bottom() == a.y {
            return Some(Rect::new(a.x, b.y, a.w, a.h + b.h));
        }
    }
    None
}

/// Coalesces rectangles sharing a full edge until no pair can be merged.
pub fn merge(mut free: Vec<Rect>) -> Vec<Rect> {
    'outer: loop {
        for i in 0..free.len() {
            for j in (i + 1)..free.len() {
                if let Some(joined) = union_if_adjacent(&free[i], &free[j]) {
                    free[i] = joined;
                    free.remove(j);
                    continue 'outer;
                }
            }
        }
        return free;
    }
}

/// Drops every rectangle wholly contained in another. Of two identical rectangles the first is kept.
pub fn prune_contained(free: Vec<Rect>) -> Vec<Rect> {
    let keep: Vec<bool> = free
        .iter()
        .enumerate()
        .map(|(i, a)| {
            !free.iter().enumerate().any(|(j, b)| {
                j != i && b.contains(a) && (!a.contains(b) || j < i)
            })
        })
        .collect();
    free.into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}
