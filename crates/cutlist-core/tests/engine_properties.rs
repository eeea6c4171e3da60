use std::collections::HashMap;

use cutlist_core::prelude::*;
use rand::{Rng, SeedableRng};

const KERF: f64 = 4.0;
const MARGIN: f64 = 12.0;

fn random_job(seed: u64) -> (Vec<BoardSpec>, Vec<PartSpec>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let boards = vec![
        BoardSpec::new("oak-a", 2440.0, 1220.0, Copies::Finite(2)).with_material("Oak"),
        BoardSpec::new("oak-b", 1800.0, 900.0, Copies::Finite(1)).with_material("oak "),
        BoardSpec::new("mdf", 2800.0, 2070.0, Copies::Finite(1)).with_material("MDF"),
    ];
    let rotations = [
        RotationDirective::Never,
        RotationDirective::Always,
        RotationDirective::Inherit,
    ];
    let grains = [Grain::None, Grain::AlongWidth, Grain::AlongLength];
    let parts = (0..40)
        .map(|i| {
            PartSpec::new(
                format!("part{i}"),
                rng.gen_range(50..=700) as f64,
                rng.gen_range(50..=700) as f64,
                rng.gen_range(0..=4) as f64,
            )
            .with_id(format!("p{i}"))
            .with_material(if rng.gen_bool(0.5) { "oak" } else { "mdf" })
            .with_rotation(rotations[rng.gen_range(0..3)])
            .with_grain(grains[rng.gen_range(0..3)])
        })
        .collect();
    (boards, parts)
}

fn config(algorithm: Algorithm) -> EngineConfig {
    EngineConfig::builder()
        .kerf(KERF)
        .margin(MARGIN)
        .algorithm(algorithm)
        .build()
}

fn check_invariants(boards: &[BoardSpec], parts: &[PartSpec], result: &PackResult) {
    let board_by_id: HashMap<&str, &BoardSpec> =
        boards.iter().map(|b| (b.id.as_str(), b)).collect();
    let part_by_sig: HashMap<String, &PartSpec> =
        parts.iter().map(|p| (p.signature(), p)).collect();

    for sheet in result.sheets() {
        assert!(!sheet.placed.is_empty(), "empty sheets must be omitted");
        let board = board_by_id[sheet.board_id.as_str()];
        for (i, a) in sheet.placed.iter().enumerate() {
            assert_eq!(a.board_instance_index, sheet.board_instance_index);
            // containment within the margin-inset rectangle
            assert!(a.x >= MARGIN && a.y >= MARGIN, "{a:?}");
            assert!(a.x + a.width <= board.width - MARGIN, "{a:?}");
            assert!(a.y + a.height <= board.height - MARGIN, "{a:?}");
            // no overlap, and kerf clearance between neighbours
            for b in &sheet.placed[i + 1..] {
                assert!(!a.rect().intersects(&b.rect()), "{a:?} overlaps {b:?}");
            }
            // grain lock and rotation permission
            let spec = part_by_sig[&a.signature];
            match spec.grain {
                Grain::AlongWidth => assert!(!a.rotated),
                Grain::AlongLength => assert!(a.rotated),
                Grain::None => {
                    if spec.rotation == RotationDirective::Never {
                        assert!(!a.rotated);
                    }
                }
            }
            let (w, h) = if a.rotated {
                (spec.height, spec.width)
            } else {
                (spec.width, spec.height)
            };
            assert_eq!((a.width, a.height), (w, h));
        }
    }

    // conservation per signature
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for p in result.sheets().flat_map(|s| &s.placed) {
        *seen.entry(p.signature.as_str()).or_default() += 1;
    }
    for u in &result.unplaced {
        *seen.entry(u.signature.as_str()).or_default() += 1;
    }
    for part in parts {
        let sig = part.signature();
        assert_eq!(
            seen.get(sig.as_str()).copied().unwrap_or(0),
            part.units(),
            "conservation broken for {sig}"
        );
    }
}

#[test]
fn maxrects_engine_invariants_hold() {
    for seed in [1, 2, 3, 4, 5] {
        let (boards, parts) = random_job(seed);
        let result = pack_boards(&boards, &parts, &config(Algorithm::MaxRects));
        check_invariants(&boards, &parts, &result);
    }
}

#[test]
fn skyline_engine_invariants_hold() {
    for seed in [1, 2, 3, 4, 5] {
        let (boards, parts) = random_job(seed);
        let result = pack_boards(&boards, &parts, &config(Algorithm::Skyline));
        check_invariants(&boards, &parts, &result);
    }
}

#[test]
fn identical_calls_give_identical_results() {
    let (boards, parts) = random_job(99);
    for algorithm in [Algorithm::MaxRects, Algorithm::Skyline] {
        let a = pack_boards(&boards, &parts, &config(algorithm));
        let b = pack_boards(&boards, &parts, &config(algorithm));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

#[test]
fn kerf_separates_neighbours() {
    let boards = vec![BoardSpec::new("ply", 1000.0, 1000.0, Copies::Finite(1))];
    let parts = vec![PartSpec::new("a", 90.0, 60.0, 30.0)];
    let result = pack_boards(&boards, &parts, &config(Algorithm::MaxRects));
    let sheet = result.sheets().next().unwrap();
    for (i, a) in sheet.placed.iter().enumerate() {
        for b in &sheet.placed[i + 1..] {
            // growing by just under the kerf must still leave them apart
            let grown = Rect::new(a.x, a.y, a.width + KERF - 0.5, a.height + KERF - 0.5);
            assert!(!grown.intersects(&b.rect()), "{a:?} too close to {b:?}");
        }
    }
}
