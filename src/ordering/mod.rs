//! Ordered-collection repositioning.
//!
//! Boards, groups, items and subitems each carry an integer `position` that
//! is unique among their siblings when assigned by [`append_position`].
//! Display order is ascending position. Gaps are tolerated and never
//! compacted.

mod error;
mod position;
mod reorder;

pub use error::OrderingError;
pub use position::{append_position, sort_by_position, Positioned, Scope, BASELINE_POSITION};
pub use reorder::{GroupMove, ItemMove, ReorderBatch, ReorderKind, REORDER_ACTION};
