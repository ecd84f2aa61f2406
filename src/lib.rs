#![recursion_limit = "1024"] // error_chain can hit the default limit

//! Generation, analysis and rendering of maze grids.
//!
//! A [`grid::Grid`] starts as a fully walled lattice of cells. The
//! algorithms in [`generators`] carve it into a maze by linking cells
//! together, [`pathing`] answers distance and shortest-path queries over the
//! carved maze, and the grid renders itself as ASCII art through its
//! `Display` impl. Grids can wrap east-west ([`grid_coordinates`]), hide
//! cells behind a [`masks::BinaryMask2D`], and be read from or written to
//! blockwise text ([`blockwise`]).

pub mod blockwise;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_coordinates;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_traits;
pub mod grids;
pub mod masks;
pub mod pathing;
pub mod units;

mod utils;
