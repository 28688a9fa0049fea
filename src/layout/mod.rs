//! Placement geometry engine
//!
//! Computes canvas extents, snaps dragged placements onto their neighbours'
//! edges, normalizes layouts to the origin and lints for defects.

pub mod bounds;
pub mod config;
pub mod lint;
pub mod snap;
pub mod types;

pub use bounds::{compute_bounds, normalize_origin, Normalization, SpanError};
pub use config::LayoutConfig;
pub use lint::{LintCategory, LintWarning};
pub use snap::snap;
pub use types::*;
