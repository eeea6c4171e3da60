use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument, trace, warn};

use crate::config::{Algorithm, EngineConfig, EngineDefaults, PackOptions, SortOrder};
use crate::model::{
    BoardSpec, Copies, NestablePart, PackResult, PartSpec, PlacedPart, Rect, SheetLayout,
    material_key,
};
use crate::orient::{Orientation, resolve};
use crate::packer::{
    PackItem, Packer, maxrects::MaxRectsPacker, skyline::SkylinePacker,
};

/// Resolves `options` over `defaults` and packs with the configured strategy.
pub fn pack(
    boards: &[BoardSpec],
    parts: &[PartSpec],
    defaults: &EngineDefaults,
    options: &PackOptions,
) -> PackResult {
    pack_boards(boards, parts, &EngineConfig::resolve(defaults, options))
}

/// Packs `parts` onto `boards` using the strategy selected by `cfg.algorithm`.
pub fn pack_boards(boards: &[BoardSpec], parts: &[PartSpec], cfg: &EngineConfig) -> PackResult {
    match cfg.algorithm {
        Algorithm::MaxRects => pack_boards_with(&MaxRectsPacker::new(), boards, parts, cfg),
        Algorithm::Skyline => pack_boards_with(&SkylinePacker::new(), boards, parts, cfg),
    }
}

/// Outstanding demand for one part signature within a material.
struct Demand {
    unit: NestablePart,
    outstanding: usize,
}

#[derive(Default)]
struct MaterialGroup<'a> {
    demand: Vec<Demand>,
    index: HashMap<String, usize>,
    boards: Vec<&'a BoardSpec>,
}

impl MaterialGroup<'_> {
    fn outstanding(&self) -> usize {
        self.demand.iter().map(|d| d.outstanding).sum()
    }
}

#[instrument(skip_all, fields(boards = boards.len(), parts = parts.len()))]
/// Packs `parts` onto `boards` with an arbitrary packer.
///
/// Notes:
/// - Demand and stock are grouped by normalized material key and packed independently.
/// - Board instances are consumed in registry order; unbounded stock is materialized lazily.
/// - Infeasibility is never an error: every demand unit ends up either on a sheet or in
///   `PackResult::unplaced`.
pub fn pack_boards_with(
    packer: &dyn Packer,
    boards: &[BoardSpec],
    parts: &[PartSpec],
    cfg: &EngineConfig,
) -> PackResult {
    let mut groups: BTreeMap<String, MaterialGroup<'_>> = BTreeMap::new();
    for part in parts {
        let units = part.units();
        if units == 0 {
            continue;
        }
        let unit = NestablePart::from_spec(part);
        let group = groups.entry(unit.material.clone()).or_default();
        match group.index.get(&unit.signature) {
            Some(&i) => group.demand[i].outstanding += units,
            None => {
                group.index.insert(unit.signature.clone(), group.demand.len());
                group.demand.push(Demand {
                    unit,
                    outstanding: units,
                });
            }
        }
    }
    for board in boards {
        if let Some(group) = groups.get_mut(&material_key(&board.material)) {
            group.boards.push(board);
        }
    }

    let mut result = PackResult::default();
    for (material, mut group) in groups {
        debug!(
            material = %material,
            signatures = group.demand.len(),
            units = group.outstanding(),
            boards = group.boards.len(),
            "packing material"
        );
        let sheets = pack_material(packer, &mut group, cfg);
        if !sheets.is_empty() {
            result.by_material.insert(material.clone(), sheets);
        }
        for d in &group.demand {
            if d.outstanding > 0 {
                debug!(material = %material, signature = %d.unit.signature, count = d.outstanding, "unplaced");
            }
            result
                .unplaced
                .extend(std::iter::repeat_n(&d.unit, d.outstanding).cloned());
        }
    }
    result
}

fn item_order(demand: &[Demand], order: SortOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..demand.len()).collect();
    let dims = |i: &usize| (demand[*i].unit.width, demand[*i].unit.height);
    match order {
        SortOrder::None => {}
        SortOrder::AreaDesc => idx.sort_by(|a, b| {
            let (aw, ah) = dims(a);
            let (bw, bh) = dims(b);
            (bw * bh).total_cmp(&(aw * ah))
        }),
        SortOrder::MaxSideDesc => idx.sort_by(|a, b| {
            let (aw, ah) = dims(a);
            let (bw, bh) = dims(b);
            bw.max(bh).total_cmp(&aw.max(ah))
        }),
        SortOrder::HeightDesc => idx.sort_by(|a, b| dims(b).1.total_cmp(&dims(a).1)),
        SortOrder::WidthDesc => idx.sort_by(|a, b| dims(b).0.total_cmp(&dims(a).0)),
        SortOrder::NameAsc => idx.sort_by(|a, b| {
            let (ua, ub) = (&demand[*a].unit, &demand[*b].unit);
            ua.name.cmp(&ub.name).then_with(|| ua.signature.cmp(&ub.signature))
        }),
    }
    idx
}

fn pack_material(
    packer: &dyn Packer,
    group: &mut MaterialGroup<'_>,
    cfg: &EngineConfig,
) -> Vec<SheetLayout> {
    let order = item_order(&group.demand, cfg.sort_order);
    let mut sheets: Vec<SheetLayout> = Vec::new();
    let mut instance_index = 0usize;

    'boards: for board in &group.boards {
        let mut copy = 0u32;
        loop {
            if group.outstanding() == 0 {
                break 'boards;
            }
            if let Copies::Finite(n) = board.copies {
                if copy >= n {
                    break;
                }
            }
            copy += 1;
            let index = instance_index;
            instance_index += 1;
            match fill_sheet(packer, board, index, &order, &mut group.demand, cfg) {
                Some(sheet) => {
                    debug!(
                        board = %board.id,
                        instance = index,
                        placed = sheet.placed.len(),
                        utilization = sheet.utilization(),
                        "sheet filled"
                    );
                    sheets.push(sheet);
                }
                None => {
                    // Later copies of this board would see the same demand and stay empty too.
                    debug!(board = %board.id, instance = index, "no outstanding part fits; next board");
                    break;
                }
            }
        }
    }
    sheets
}

fn fill_sheet(
    packer: &dyn Packer,
    board: &BoardSpec,
    instance: usize,
    order: &[usize],
    demand: &mut [Demand],
    cfg: &EngineConfig,
) -> Option<SheetLayout> {
    let usable = Rect::new(
        0.0,
        0.0,
        (board.width - cfg.margin * 2.0).max(0.0),
        (board.height - cfg.margin * 2.0).max(0.0),
    );
    let material_allows = board.allow_rotate.unwrap_or(cfg.allow_rotate_default);

    let mut items: Vec<PackItem> = Vec::new();
    let mut owners: Vec<(usize, Orientation)> = Vec::new();
    for &di in order {
        let d = &demand[di];
        if d.outstanding == 0 {
            continue;
        }
        let o = resolve(
            d.unit.rotation,
            d.unit.grain,
            material_allows,
            d.unit.width,
            d.unit.height,
        );
        let item = PackItem::new(o.width + cfg.kerf, o.height + cfg.kerf, o.rotation_allowed);
        for _ in 0..d.outstanding {
            items.push(item);
            owners.push((di, o));
        }
    }

    let placements = packer.pack(&usable, &items);
    let mut placed: Vec<PlacedPart> = Vec::new();
    for (placement, (di, o)) in placements.into_iter().zip(owners) {
        let Some(p) = placement else { continue };
        if p.rotated && !o.rotation_allowed {
            warn!(signature = %demand[di].unit.signature, "packer rotated a rotation-locked part; placement rejected");
            continue;
        }
        if !usable.contains(&p.rect) {
            warn!(signature = %demand[di].unit.signature, "packer placed a part outside the sheet; placement rejected");
            continue;
        }
        let (width, height) = if p.rotated {
            (o.height, o.width)
        } else {
            (o.width, o.height)
        };
        let d = &mut demand[di];
        trace!(signature = %d.unit.signature, x = p.rect.x, y = p.rect.y, rotated = p.rotated, "accepted");
        placed.push(PlacedPart {
            signature: d.unit.signature.clone(),
            name: d.unit.name.clone(),
            x: cfg.margin + p.rect.x,
            y: cfg.margin + p.rect.y,
            width,
            height,
            rotated: o.rotated(p.rotated),
            board_instance_index: instance,
        });
        d.outstanding -= 1;
    }

    if placed.is_empty() {
        return None;
    }
    Some(SheetLayout {
        board_id: board.id.clone(),
        board_instance_index: instance,
        width: board.width,
        height: board.height,
        placed,
    })
}
