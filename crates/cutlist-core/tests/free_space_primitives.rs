use cutlist_core::model::Rect;
use cutlist_core::packer::free_space::{merge, prune_contained, split};

#[test]
fn split_returns_free_unchanged_when_disjoint() {
    let free = Rect::new(0.0, 0.0, 10.0, 10.0);
    let used = Rect::new(20.0, 20.0, 5.0, 5.0);
    assert_eq!(split(free, &used), vec![free]);
}

#[test]
fn split_touching_edge_is_not_an_intersection() {
    let free = Rect::new(0.0, 0.0, 10.0, 10.0);
    let used = Rect::new(10.0, 0.0, 5.0, 10.0);
    assert_eq!(split(free, &used), vec![free]);
}

#[test]
fn split_center_yields_four_disjoint_slivers() {
    let free = Rect::new(0.0, 0.0, 10.0, 10.0);
    let used = Rect::new(2.0, 3.0, 4.0, 5.0);
    let out = split(free, &used);
    assert_eq!(
        out,
        vec![
            Rect::new(0.0, 0.0, 10.0, 3.0),
            Rect::new(0.0, 8.0, 10.0, 2.0),
            Rect::new(0.0, 3.0, 2.0, 5.0),
            Rect::new(6.0, 3.0, 4.0, 5.0),
        ]
    );
    let area: f64 = out.iter().map(Rect::area).sum();
    assert_eq!(area, free.area() - used.area());
    for (i, a) in out.iter().enumerate() {
        assert!(!a.intersects(&used));
        for b in &out[i + 1..] {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn split_drops_zero_area_slivers() {
    let free = Rect::new(0.0, 0.0, 10.0, 10.0);
    let used = Rect::new(0.0, 0.0, 4.0, 4.0);
    assert_eq!(
        split(free, &used),
        vec![Rect::new(0.0, 4.0, 10.0, 6.0), Rect::new(4.0, 0.0, 6.0, 4.0)]
    );
}

#[test]
fn split_with_full_cover_leaves_nothing() {
    let free = Rect::new(5.0, 5.0, 10.0, 10.0);
    let used = Rect::new(0.0, 0.0, 30.0, 30.0);
    assert!(split(free, &used).is_empty());
}

#[test]
fn split_clips_used_rect_larger_than_free() {
    // fence sticking out past the left and top of the free rect
    let free = Rect::new(10.0, 10.0, 20.0, 20.0);
    let used = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert_eq!(
        split(free, &used),
        vec![Rect::new(10.0, 15.0, 20.0, 15.0), Rect::new(15.0, 10.0, 15.0, 5.0)]
    );
}

#[test]
fn merge_joins_horizontal_neighbours() {
    let out = merge(vec![
        Rect::new(0.0, 0.0, 5.0, 10.0),
        Rect::new(5.0, 0.0, 5.0, 10.0),
    ]);
    assert_eq!(out, vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
}

#[test]
fn merge_joins_vertical_neighbours_in_either_order() {
    let out = merge(vec![
        Rect::new(0.0, 4.0, 10.0, 6.0),
        Rect::new(0.0, 0.0, 10.0, 4.0),
    ]);
    assert_eq!(out, vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
}

#[test]
fn merge_repeats_until_stable() {
    let out = merge(vec![
        Rect::new(0.0, 0.0, 3.0, 10.0),
        Rect::new(6.0, 0.0, 4.0, 10.0),
        Rect::new(3.0, 0.0, 3.0, 10.0),
    ]);
    assert_eq!(out, vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
}

#[test]
fn merge_keeps_partial_edges_apart() {
    let input = vec![
        Rect::new(0.0, 0.0, 5.0, 10.0),
        Rect::new(5.0, 0.0, 5.0, 8.0),
    ];
    assert_eq!(merge(input.clone()), input);
}

#[test]
fn prune_removes_contained_rects() {
    let out = prune_contained(vec![
        Rect::new(2.0, 2.0, 3.0, 3.0),
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(20.0, 0.0, 5.0, 5.0),
    ]);
    assert_eq!(
        out,
        vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 0.0, 5.0, 5.0)]
    );
}

#[test]
fn prune_keeps_one_of_identical_rects() {
    let r = Rect::new(1.0, 1.0, 2.0, 2.0);
    assert_eq!(prune_contained(vec![r, r, r]), vec![r]);
}

#[test]
fn prune_keeps_overlapping_but_not_contained() {
    let input = vec![
        Rect::new(0.0, 0.0, 10.0, 5.0),
        Rect::new(5.0, 0.0, 10.0, 5.0),
    ];
    assert_eq!(prune_contained(input.clone()), input);
}
