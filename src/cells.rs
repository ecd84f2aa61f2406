use std::convert::From;

use smallvec::SmallVec;

use crate::units::RowLength;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<Cartesian2DCoordinate>; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_width: RowLength) -> Cartesian2DCoordinate {
        let RowLength(width) = row_width;
        let x = index % width;
        let y = index / width;
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    #[inline]
    pub fn row_major_index(&self, row_width: RowLength) -> usize {
        let RowLength(width) = row_width;
        self.y as usize * width + self.x as usize
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// The four primary compass directions that a passage can be carved in on a
/// rectangular grid. Every direction has a total opposite.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [
        CompassPrimary::North,
        CompassPrimary::South,
        CompassPrimary::East,
        CompassPrimary::West,
    ];

    pub const VERTICAL: [CompassPrimary; 2] = [CompassPrimary::North, CompassPrimary::South];
    pub const HORIZONTAL: [CompassPrimary; 2] = [CompassPrimary::East, CompassPrimary::West];

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The (Δx, Δy) geometric offset of this direction. North is -y, West is -x.
    #[inline]
    pub fn offsets(self) -> (isize, isize) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::South => (0, 1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::West => (-1, 0),
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, CompassPrimary::North | CompassPrimary::South)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn row_major_index_round_trips() {
        let width = RowLength(5);
        for index in 0..20 {
            let coord = Cartesian2DCoordinate::from_row_major_index(index, width);
            assert_eq!(coord.row_major_index(width), index);
        }
    }

    #[test]
    fn from_row_major_index_walks_rows_first() {
        let width = RowLength(3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(0, width), gc(0, 0));
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(2, width), gc(2, 0));
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(3, width), gc(0, 1));
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(7, width), gc(1, 2));
    }

    #[test]
    fn opposites_pair_up() {
        for dir in CompassPrimary::ALL.iter() {
            assert_eq!(dir.opposite().opposite(), *dir);
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.is_vertical(), dir.opposite().is_vertical());
        }
    }

    #[test]
    fn offsets_cancel_with_opposite() {
        for dir in CompassPrimary::ALL.iter() {
            let (dx, dy) = dir.offsets();
            let (ox, oy) = dir.opposite().offsets();
            assert_eq!(dx + ox, 0);
            assert_eq!(dy + oy, 0);
        }
    }
}
