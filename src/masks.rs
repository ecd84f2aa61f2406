use bit_set::BitSet;

use crate::cells::Cartesian2DCoordinate;
use crate::units::{Height, Width};

/// A 2d bitmap of hidden grid cells. A set bit means the cell at that
/// row-major position is masked off and should be treated as absent.
#[derive(Debug, Clone)]
pub struct BinaryMask2D {
    mask: BitSet,
    pub width: u32,
    pub height: u32,
}

impl BinaryMask2D {
    /// An empty mask - nothing is hidden until `hide` is called.
    pub fn new(width: Width, height: Height) -> BinaryMask2D {
        BinaryMask2D {
            mask: BitSet::with_capacity(width.0 * height.0),
            width: width.0 as u32,
            height: height.0 as u32,
        }
    }

    /// Build a mask from rows of symbols, where `live_symbol` marks a visible
    /// cell and any other symbol a hidden one. Rows may be ragged; positions
    /// beyond a row's end are hidden.
    pub fn from_rows(rows: &[Vec<char>], live_symbol: char) -> BinaryMask2D {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut mask = BinaryMask2D::new(Width(width), Height(height));

        for (y, row) in rows.iter().enumerate() {
            for x in 0..width {
                if row.get(x).copied() != Some(live_symbol) {
                    mask.hide(Cartesian2DCoordinate::new(x as u32, y as u32));
                }
            }
        }

        mask
    }

    pub fn hide(&mut self, coord: Cartesian2DCoordinate) {
        if coord.x < self.width && coord.y < self.height {
            self.mask.insert((coord.y * self.width + coord.x) as usize);
        }
    }

    pub fn show(&mut self, coord: Cartesian2DCoordinate) {
        if coord.x < self.width && coord.y < self.height {
            self.mask.remove((coord.y * self.width + coord.x) as usize);
        }
    }

    /// Is the given coordinate masked out / turned off?
    ///
    /// A coordinate is not masked if it is outside the bounds of the masks 2d space.
    pub fn is_masked(&self, coord: Cartesian2DCoordinate) -> bool {
        if coord.x < self.width && coord.y < self.height {
            let bit_index = (coord.y * self.width + coord.x) as usize;
            self.mask.contains(bit_index)
        } else {
            false
        }
    }

    /// Calculates the number of unmasked cells within a 2d space specified by `width` and `height`.
    ///
    /// All cells in the 2d space outside of the masks' own width and height are counted as unmasked.
    pub fn count_unmasked_within_dimensions(&self, width: Width, height: Height) -> usize {
        let mut count = 0;
        for x in 0..(width.0) {
            for y in 0..(height.0) {
                if !self.is_masked(Cartesian2DCoordinate::new(x as u32, y as u32)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// The first unmasked coordinate in row-major order, if any cell is unmasked.
    pub fn first_unmasked_coordinate(&self) -> Option<Cartesian2DCoordinate> {
        let mask_size = (self.width * self.height) as usize;
        (0..mask_size)
            .position(|bit_index| !self.mask.contains(bit_index))
            .map(|i| {
                let x = i % self.width as usize;
                let y = i / self.width as usize;
                Cartesian2DCoordinate::new(x as u32, y as u32)
            })
    }
}
