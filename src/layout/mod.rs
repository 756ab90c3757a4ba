//! Where cards go on a sheet, and the cut lines drawn around them.
//!
//! [`GridGeometry`] turns a [`LayoutConfig`](crate::LayoutConfig) into cell
//! rectangles, [`GridCursor`] walks those cells in reading order (left to right,
//! top row first) and [`CutGuides`] decorates each cell with its cutting guide.
//!
//! # Example
//!
//! ```
//! use id_card_grid::LayoutConfig;
//! use id_card_grid::layout::{Advance, GridCursor, GridGeometry};
//!
//! let config = LayoutConfig::portrait();
//! let geometry = GridGeometry::new(&config);
//! let mut cursor = GridCursor::new(geometry.columns(), geometry.rows());
//!
//! // the first card goes in the top-left cell
//! let (column, row) = cursor.position();
//! assert_eq!((column, row), (0, 2));
//! let top_left = geometry.cell(column, row);
//! assert!(top_left.y1 > geometry.cell(0, 0).y1);
//! assert_eq!(cursor.advance(), Advance::SameSheet);
//! ```

mod grid;
mod guides;

pub use grid::*;
pub use guides::*;
