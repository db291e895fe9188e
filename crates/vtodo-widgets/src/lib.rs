#![forbid(unsafe_code)]

//! List-side building blocks for vtodo.
//!
//! - [`VirtualizedList`] keeps scroll state and answers "which rows?"
//! - [`RowMaterializer`] turns those rows into memoized
//!   [`RenderDescriptor`]s plus a patch of what actually changed.
//!
//! Nothing here writes to the store; it only reads `TodoList` snapshots.

pub mod materializer;
pub mod row;
pub mod virtualized;

pub use materializer::{
    CacheMissReason, DEFAULT_CACHE_SLACK, MaterializedRows, MaterializerStats, RowChange,
    RowMaterializer,
};
pub use row::RenderDescriptor;
pub use virtualized::VirtualizedList;
