use crate::error::Result;
use crate::model::PackResult;
use serde_json::{Value, json};

/// Serialize a `PackResult` as `{ materials: { key: [sheet, ...] }, unplaced, stats }`.
/// Sheets keep consumption order; placements keep placement order.
pub fn to_json(result: &PackResult) -> Value {
    let mut materials = serde_json::Map::new();
    for (key, sheets) in &result.by_material {
        let sheets_val: Vec<Value> = sheets
            .iter()
            .map(|s| {
                let parts: Vec<Value> = s
                    .placed
                    .iter()
                    .map(|p| {
                        json!({
                            "signature": p.signature,
                            "name": p.name,
                            "rect": {"x": p.x, "y": p.y, "w": p.width, "h": p.height},
                            "rotated": p.rotated,
                        })
                    })
                    .collect();
                json!({
                    "boardId": s.board_id,
                    "instance": s.board_instance_index,
                    "size": {"w": s.width, "h": s.height},
                    "utilization": s.utilization(),
                    "parts": parts,
                })
            })
            .collect();
        materials.insert(key.clone(), Value::Array(sheets_val));
    }
    json!({
        "materials": materials,
        "unplaced": &result.unplaced,
        "stats": result.stats(),
    })
}

/// Flatten placements keyed by part signature, for label and print layers.
/// Shape: `{ parts: { signature: [ { material, boardId, instance, rect, rotated } ] }, unplaced: { signature: count } }`.
pub fn to_json_flat(result: &PackResult) -> Value {
    let mut parts = serde_json::Map::new();
    for (key, sheets) in &result.by_material {
        for s in sheets {
            for p in &s.placed {
                let entry = parts
                    .entry(p.signature.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(list) = entry {
                    list.push(json!({
                        "material": key,
                        "boardId": s.board_id,
                        "instance": s.board_instance_index,
                        "rect": {"x": p.x, "y": p.y, "w": p.width, "h": p.height},
                        "rotated": p.rotated,
                    }));
                }
            }
        }
    }
    let mut unplaced = serde_json::Map::new();
    for u in &result.unplaced {
        let count = unplaced
            .get(&u.signature)
            .and_then(Value::as_u64)
            .unwrap_or(0);
        unplaced.insert(u.signature.clone(), json!(count + 1));
    }
    json!({ "parts": parts, "unplaced": unplaced })
}

/// Pretty-printed `to_json` output.
pub fn to_json_string(result: &PackResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(result))?)
}
