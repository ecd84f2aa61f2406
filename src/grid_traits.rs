use std::fmt::Debug;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::units::{ColumnLength, RowLength};

/// The coordinate resolution strategy of a grid: given a cell and a compass
/// direction, which cell (if any) lies one step away. This is the single
/// point where the rectangular and cylinder/möbius topologies differ.
pub trait GridCoordinates: Copy + Clone + Debug {
    fn offset_coordinate(
        &self,
        coord: Cartesian2DCoordinate,
        dir: CompassPrimary,
        row_width: RowLength,
        column_height: ColumnLength,
    ) -> Option<Cartesian2DCoordinate>;
}

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}
