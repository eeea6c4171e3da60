//! Ingestion-boundary checks. The engine assumes non-degenerate geometry; these helpers let
//! callers reject or drop bad rows before packing.

use crate::error::{CutlistError, Result};
use crate::model::{BoardSpec, PartSpec};

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

pub fn check_board(board: &BoardSpec) -> Result<()> {
    if positive(board.width) && positive(board.height) {
        Ok(())
    } else {
        Err(CutlistError::InvalidBoard {
            id: board.id.clone(),
            width: board.width,
            height: board.height,
        })
    }
}

pub fn check_part(part: &PartSpec) -> Result<()> {
    if positive(part.width) && positive(part.height) {
        Ok(())
    } else {
        Err(CutlistError::InvalidPart {
            signature: part.signature(),
            width: part.width,
            height: part.height,
        })
    }
}

/// Fails on the first degenerate board.
pub fn check_boards(boards: &[BoardSpec]) -> Result<()> {
    boards.iter().try_for_each(check_board)
}

/// Fails on the first degenerate part.
pub fn check_parts(parts: &[PartSpec]) -> Result<()> {
    parts.iter().try_for_each(check_part)
}

/// Input with degenerate rows removed.
#[derive(Debug, Default)]
pub struct Sanitized {
    pub boards: Vec<BoardSpec>,
    pub parts: Vec<PartSpec>,
    /// One error per dropped row, boards first.
    pub rejected: Vec<CutlistError>,
}

/// Splits input into usable rows and errors describing the dropped ones.
pub fn sanitize(boards: Vec<BoardSpec>, parts: Vec<PartSpec>) -> Sanitized {
    let mut out = Sanitized::default();
    for board in boards {
        match check_board(&board) {
            Ok(()) => out.boards.push(board),
            Err(e) => out.rejected.push(e),
        }
    }
    for part in parts {
        match check_part(&part) {
            Ok(()) => out.parts.push(part),
            Err(e) => out.rejected.push(e),
        }
    }
    out
}
