//! Core library for nesting rectangular parts onto stock sheets.
//!
//! - Algorithms: MaxRects (Best Short Side Fit, default) and Skyline (bottom-left), both behind
//!   the [`Packer`] trait
//! - Engine: `pack_boards` groups demand and stock by material, consumes board instances and
//!   reports every demand unit as either placed or unplaced
//! - Manufacturing constraints: saw kerf, sheet margin, grain lock and per-part rotation
//! - Data model is serde-serializable; JSON views are provided in [`export`].
//!
//! Quick example:
//! ```
//! use cutlist_core::prelude::*;
//!
//! let boards = vec![BoardSpec::new("ply-18", 2440.0, 1220.0, Copies::Unbounded)];
//! let parts = vec![PartSpec::new("shelf", 600.0, 400.0, 8.0)];
//! let cfg = EngineConfig::builder().kerf(3.0).margin(10.0).build();
//! let result = pack_boards(&boards, &parts, &cfg);
//! assert!(result.unplaced.is_empty());
//! println!("{}", result.stats().summary());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod orient;
pub mod packer;
pub mod validate;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use orient::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `cutlist_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        Algorithm, EngineConfig, EngineConfigBuilder, EngineDefaults, PackOptions, SortOrder,
    };
    pub use crate::engine::{pack, pack_boards, pack_boards_with};
    pub use crate::model::{
        BoardSpec, Copies, NestablePart, PackResult, PackStats, PartSpec, PlacedPart, Rect,
        SheetLayout,
    };
    pub use crate::orient::{Grain, RotationDirective};
    pub use crate::packer::{
        PackItem, Packer, Placement, maxrects::MaxRectsPacker, skyline::SkylinePacker,
    };
}
