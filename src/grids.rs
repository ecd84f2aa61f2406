//! Ready-made grid type aliases and constructors.
//!
//! The index type parameter bounds how many cells a grid can address, which
//! in turn sizes the petgraph link graph's memory use. `u8` handles up to a
//! 16x16 grid, `u16` up to 256x256 and `u32` anything sane.

use petgraph::graph::IndexType;

use crate::grid::Grid;
use crate::grid_coordinates::{CylinderGridCoordinates, RectGridCoordinates};
use crate::masks::BinaryMask2D;
use crate::units::{ColumnLength, Height, RowLength, Width};

pub type SmallRectangularGrid = Grid<u8, RectGridCoordinates>;
pub type MediumRectangularGrid = Grid<u16, RectGridCoordinates>;
pub type LargeRectangularGrid = Grid<u32, RectGridCoordinates>;

pub type SmallCylinderGrid = Grid<u8, CylinderGridCoordinates>;
pub type MediumCylinderGrid = Grid<u16, CylinderGridCoordinates>;
pub type LargeCylinderGrid = Grid<u32, CylinderGridCoordinates>;

pub fn small_rect_grid(width: RowLength, height: ColumnLength) -> Option<SmallRectangularGrid> {
    rect_grid::<u8>(width, height)
}
pub fn medium_rect_grid(width: RowLength, height: ColumnLength) -> Option<MediumRectangularGrid> {
    rect_grid::<u16>(width, height)
}
pub fn large_rect_grid(width: RowLength, height: ColumnLength) -> Option<LargeRectangularGrid> {
    rect_grid::<u32>(width, height)
}

pub fn small_cylinder_grid(width: RowLength, height: ColumnLength) -> Option<SmallCylinderGrid> {
    cylinder_grid::<u8>(width, height)
}
pub fn medium_cylinder_grid(width: RowLength, height: ColumnLength) -> Option<MediumCylinderGrid> {
    cylinder_grid::<u16>(width, height)
}
pub fn large_cylinder_grid(width: RowLength, height: ColumnLength) -> Option<LargeCylinderGrid> {
    cylinder_grid::<u32>(width, height)
}

/// A Möbius strip is modelled as a cylinder with twice the requested width:
/// the second half of each row is the "underside" of the strip, reached by
/// walking the full way around.
pub fn large_mobius_grid(width: RowLength, height: ColumnLength) -> Option<LargeCylinderGrid> {
    cylinder_grid::<u32>(RowLength(width.0 * 2), height)
}

/// A rectangular grid with the cells rejected by the mask hidden from all
/// queries and iteration.
pub fn masked_rect_grid(mask: BinaryMask2D) -> Option<LargeRectangularGrid> {
    let (w, h) = (mask.width as usize, mask.height as usize);
    let mut grid = rect_grid::<u32>(RowLength(w), ColumnLength(h))?;
    grid.set_mask(Some(mask));
    Some(grid)
}

/// An unmasked binary mask sized to cover a grid's dimensions, for callers
/// that want to hide cells one by one.
pub fn mask_for_dimensions(width: RowLength, height: ColumnLength) -> BinaryMask2D {
    BinaryMask2D::new(Width(width.0), Height(height.0))
}

fn rect_grid<GridIndexType: IndexType>(width: RowLength,
                                       height: ColumnLength)
                                       -> Option<Grid<GridIndexType, RectGridCoordinates>> {
    if has_capacity_for::<GridIndexType>(width, height) {
        Some(Grid::new(width, height, RectGridCoordinates))
    } else {
        None
    }
}

fn cylinder_grid<GridIndexType: IndexType>(width: RowLength,
                                           height: ColumnLength)
                                           -> Option<Grid<GridIndexType, CylinderGridCoordinates>> {
    if has_capacity_for::<GridIndexType>(width, height) {
        Some(Grid::new(width, height, CylinderGridCoordinates))
    } else {
        None
    }
}

/// The graph's index type must be able to address every cell.
fn has_capacity_for<GridIndexType: IndexType>(width: RowLength, height: ColumnLength) -> bool {
    let max_cells = <GridIndexType as IndexType>::max().index();
    width.0.checked_mul(height.0).map_or(false, |cells| cells <= max_cells)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::{Cartesian2DCoordinate, CompassPrimary};

    #[test]
    fn index_type_bounds_grid_capacity() {
        assert!(small_rect_grid(RowLength(15), ColumnLength(15)).is_some());
        assert!(small_rect_grid(RowLength(16), ColumnLength(16)).is_none());
        assert!(medium_rect_grid(RowLength(16), ColumnLength(16)).is_some());
        assert!(medium_rect_grid(RowLength(256), ColumnLength(256)).is_none());
        assert!(large_rect_grid(RowLength(256), ColumnLength(256)).is_some());
    }

    #[test]
    fn cylinder_grid_wraps_rows() {
        let g = small_cylinder_grid(RowLength(4), ColumnLength(3)).unwrap();
        let leftmost = Cartesian2DCoordinate::new(0, 1);
        let rightmost = Cartesian2DCoordinate::new(3, 1);
        assert_eq!(g.neighbour_at_direction(leftmost, CompassPrimary::West), Some(rightmost));
        assert_eq!(g.neighbour_at_direction(rightmost, CompassPrimary::East), Some(leftmost));
        // No vertical wrapping.
        assert_eq!(g.neighbour_at_direction(Cartesian2DCoordinate::new(0, 0),
                                            CompassPrimary::North),
                   None);
    }

    #[test]
    fn mobius_grid_doubles_the_row_width() {
        let g = large_mobius_grid(RowLength(5), ColumnLength(2)).unwrap();
        assert_eq!(g.row_length(), RowLength(10));
        assert_eq!(g.size(), 20);
    }

    #[test]
    fn masked_grid_takes_dimensions_from_the_mask() {
        let mut mask = mask_for_dimensions(RowLength(3), ColumnLength(2));
        mask.hide(Cartesian2DCoordinate::new(1, 0));
        let g = masked_rect_grid(mask).unwrap();
        assert_eq!(g.size(), 6);
        assert_eq!(g.active_size(), 5);
        assert!(g.is_masked(Cartesian2DCoordinate::new(1, 0)));
    }
}
