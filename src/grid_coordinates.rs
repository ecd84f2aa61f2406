use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid_traits::GridCoordinates;
use crate::units::{ColumnLength, RowLength};

/// Plain bounds-checked resolution: walking off any edge of the grid
/// resolves to no cell at all.
#[derive(Debug, Copy, Clone, Default)]
pub struct RectGridCoordinates;

impl GridCoordinates for RectGridCoordinates {
    fn offset_coordinate(
        &self,
        coord: Cartesian2DCoordinate,
        dir: CompassPrimary,
        row_width: RowLength,
        column_height: ColumnLength,
    ) -> Option<Cartesian2DCoordinate> {
        let RowLength(width) = row_width;
        let ColumnLength(height) = column_height;
        let (dx, dy) = dir.offsets();
        let x = coord.x as isize + dx;
        let y = coord.y as isize + dy;

        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            None
        } else {
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        }
    }
}

/// Column-wrapping resolution: the column index wraps modulo the row width
/// so east of the last column is the first column, giving a tube topology.
/// Rows stay bounded exactly as on a rectangular grid.
///
/// A möbius grid is a cylinder grid with a doubled row width representing
/// two mirrored strips; the half twist is a rendering concern, so no third
/// resolution strategy is needed.
#[derive(Debug, Copy, Clone, Default)]
pub struct CylinderGridCoordinates;

impl GridCoordinates for CylinderGridCoordinates {
    fn offset_coordinate(
        &self,
        coord: Cartesian2DCoordinate,
        dir: CompassPrimary,
        row_width: RowLength,
        column_height: ColumnLength,
    ) -> Option<Cartesian2DCoordinate> {
        let RowLength(width) = row_width;
        let ColumnLength(height) = column_height;
        if width == 0 || height == 0 {
            return None;
        }

        match dir {
            // A single-column tube would wrap a cell around to itself.
            CompassPrimary::East | CompassPrimary::West if width <= 1 => None,
            CompassPrimary::East => {
                let x = (coord.x as usize + 1) % width;
                Some(Cartesian2DCoordinate::new(x as u32, coord.y))
            }
            CompassPrimary::West => {
                let x = (coord.x as usize + width - 1) % width;
                Some(Cartesian2DCoordinate::new(x as u32, coord.y))
            }
            CompassPrimary::North | CompassPrimary::South => {
                RectGridCoordinates.offset_coordinate(coord, dir, row_width, column_height)
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    const W: RowLength = RowLength(4);
    const H: ColumnLength = ColumnLength(3);

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn rect_resolution_is_bounded_on_all_sides() {
        let r = RectGridCoordinates;
        assert_eq!(r.offset_coordinate(gc(0, 0), CompassPrimary::North, W, H), None);
        assert_eq!(r.offset_coordinate(gc(0, 0), CompassPrimary::West, W, H), None);
        assert_eq!(r.offset_coordinate(gc(3, 2), CompassPrimary::East, W, H), None);
        assert_eq!(r.offset_coordinate(gc(3, 2), CompassPrimary::South, W, H), None);
        assert_eq!(r.offset_coordinate(gc(1, 1), CompassPrimary::North, W, H), Some(gc(1, 0)));
        assert_eq!(r.offset_coordinate(gc(1, 1), CompassPrimary::East, W, H), Some(gc(2, 1)));
    }

    #[test]
    fn cylinder_wraps_columns_only() {
        let c = CylinderGridCoordinates;
        assert_eq!(c.offset_coordinate(gc(3, 1), CompassPrimary::East, W, H), Some(gc(0, 1)));
        assert_eq!(c.offset_coordinate(gc(0, 1), CompassPrimary::West, W, H), Some(gc(3, 1)));
        assert_eq!(c.offset_coordinate(gc(0, 0), CompassPrimary::North, W, H), None);
        assert_eq!(c.offset_coordinate(gc(0, 2), CompassPrimary::South, W, H), None);
        assert_eq!(c.offset_coordinate(gc(2, 1), CompassPrimary::South, W, H), Some(gc(2, 2)));
    }

    #[test]
    fn single_column_cylinder_has_no_lateral_neighbours() {
        let c = CylinderGridCoordinates;
        let w1 = RowLength(1);
        assert_eq!(c.offset_coordinate(gc(0, 1), CompassPrimary::East, w1, H), None);
        assert_eq!(c.offset_coordinate(gc(0, 1), CompassPrimary::West, w1, H), None);
        assert_eq!(c.offset_coordinate(gc(0, 1), CompassPrimary::North, w1, H), Some(gc(0, 0)));
        assert_eq!(c.offset_coordinate(gc(0, 1), CompassPrimary::South, w1, H), Some(gc(0, 2)));
    }
}
