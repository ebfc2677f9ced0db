//! View-state layer - derived views over the entry store
//!
//! Everything here is a pure function of the entries, the expanded set and
//! the filter text, plus caches that are invalidated by index.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (LineHeight, LineOffset, ViewportDimensions)
//! - `ancestry`: AncestryIndex - cached parent back-references
//! - `filter`: Filtered view builder (expand/collapse and filter-match)
//! - `height`: Content-keyed row height estimate
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `row_layout`: RowLayout - lazily measured virtual list layout
//! - `visible_range`: VisibleRange - result of visible range calculation

pub mod ancestry;
pub mod filter;
pub mod height;
pub mod height_index;
pub mod row_layout;
pub mod types;
pub mod visible_range;

pub use ancestry::AncestryIndex;
pub use filter::{build_filtered_view, FilteredEntries, VisibleRow};
pub use row_layout::RowLayout;
