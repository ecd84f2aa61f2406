//! Import and export of grids as "blockwise" text, one character block per
//! cell.
//!
//! Two formats exist. The *relaxed* format is a rectangular block of
//! characters where a chosen symbol marks a live cell, the outermost ring of
//! characters is structural wall that never becomes a cell, and any two
//! adjacent live cells are linked. The *strict* format is a
//! `(2*rows + 1) x (2*cols + 1)` block with an explicit wall-or-passage
//! character between every pair of consecutive cells, so arbitrary link
//! graphs survive a round trip.

use crate::cells::Cartesian2DCoordinate;
use crate::errors::{ErrorKind, Result};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridCoordinates;
use crate::grids::{large_rect_grid, LargeRectangularGrid};
use crate::units::{ColumnLength, RowLength};

const STRICT_WALL: char = '#';
const STRICT_OPEN: char = ' ';

/// Parse relaxed blockwise text into a grid. Cells showing `live_symbol`
/// are live and linked to any adjacent live cell; every other cell is
/// masked off.
///
/// The outer ring of characters is wall, so the block must be at least 3x3
/// and every line the same length.
pub fn parse_relaxed_block_text(text: &str, live_symbol: char) -> Result<LargeRectangularGrid> {
    let lines: Vec<&str> = text.lines().collect();
    let char_rows: Vec<Vec<char>> = lines.iter().map(|line| line.chars().collect()).collect();
    validate_uniform_row_lengths(&char_rows)?;

    let block_height = char_rows.len();
    let block_width = char_rows[0].len();
    if block_height < 3 || block_width < 3 {
        return Err(ErrorKind::BlockwiseFormat(format!("block of {} rows x {} columns is too \
                                                       small to contain any cell inside its \
                                                       wall ring",
                                                      block_height,
                                                      block_width))
            .into());
    }

    let height = block_height - 2;
    let width = block_width - 2;
    let mut grid = large_rect_grid(RowLength(width), ColumnLength(height))
        .ok_or_else(|| ErrorKind::BlockwiseFormat("block dimensions overflow the grid's cell \
                                                   index type"
            .to_owned()))?;

    let is_live = |x: usize, y: usize| char_rows[y + 1][x + 1] == live_symbol;

    for y in 0..height {
        for x in 0..width {
            if !is_live(x, y) {
                grid.hide_cell(Cartesian2DCoordinate::new(x as u32, y as u32));
            }
        }
    }
    for y in 0..height {
        for x in 0..width {
            if !is_live(x, y) {
                continue;
            }
            let here = Cartesian2DCoordinate::new(x as u32, y as u32);
            if x + 1 < width && is_live(x + 1, y) {
                grid.link(here, Cartesian2DCoordinate::new((x + 1) as u32, y as u32))
                    .expect("adjacent live cells are linkable");
            }
            if y + 1 < height && is_live(x, y + 1) {
                grid.link(here, Cartesian2DCoordinate::new(x as u32, (y + 1) as u32))
                    .expect("adjacent live cells are linkable");
            }
        }
    }

    Ok(grid)
}

/// Parse strict blockwise text into a grid. Cells sit at odd block offsets,
/// the characters between consecutive cells encode each wall (`#`) or
/// passage (` `) explicitly, and a `#` at a cell position masks that cell
/// off.
pub fn parse_strict_block_text(text: &str) -> Result<LargeRectangularGrid> {
    let lines: Vec<&str> = text.lines().collect();
    let char_rows: Vec<Vec<char>> = lines.iter().map(|line| line.chars().collect()).collect();
    validate_uniform_row_lengths(&char_rows)?;

    let block_height = char_rows.len();
    let block_width = char_rows[0].len();
    if block_height < 3 || block_width < 3 || block_height % 2 == 0 || block_width % 2 == 0 {
        return Err(ErrorKind::BlockwiseFormat(format!("strict blocks must be at least 3x3 with \
                                                       odd dimensions, got {} rows x {} columns",
                                                      block_height,
                                                      block_width))
            .into());
    }

    let height = (block_height - 1) / 2;
    let width = (block_width - 1) / 2;
    let mut grid = large_rect_grid(RowLength(width), ColumnLength(height))
        .ok_or_else(|| ErrorKind::BlockwiseFormat("block dimensions overflow the grid's cell \
                                                   index type"
            .to_owned()))?;

    for y in 0..height {
        for x in 0..width {
            if char_rows[2 * y + 1][2 * x + 1] == STRICT_WALL {
                grid.hide_cell(Cartesian2DCoordinate::new(x as u32, y as u32));
            }
        }
    }
    for y in 0..height {
        for x in 0..width {
            let here = Cartesian2DCoordinate::new(x as u32, y as u32);
            if !grid.is_valid_coordinate(here) {
                continue;
            }
            // The character to the east of the cell and the character below
            // it carry the wall state.
            if x + 1 < width && char_rows[2 * y + 1][2 * x + 2] == STRICT_OPEN {
                let east = Cartesian2DCoordinate::new((x + 1) as u32, y as u32);
                if grid.is_valid_coordinate(east) {
                    grid.link(here, east).expect("both cells are valid");
                }
            }
            if y + 1 < height && char_rows[2 * y + 2][2 * x + 1] == STRICT_OPEN {
                let south = Cartesian2DCoordinate::new(x as u32, (y + 1) as u32);
                if grid.is_valid_coordinate(south) {
                    grid.link(here, south).expect("both cells are valid");
                }
            }
        }
    }

    Ok(grid)
}

/// Write a grid as strict blockwise text. `parse_strict_block_text` on the
/// result reproduces the same link set and mask.
pub fn strict_block_text<GridIndexType, Coords>(grid: &Grid<GridIndexType, Coords>) -> String
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let width = grid.row_length().0;
    let height = grid.column_length().0;
    let block_width = 2 * width + 1;
    let block_height = 2 * height + 1;

    let mut block = vec![vec![STRICT_WALL; block_width]; block_height];

    for coord in grid.iter() {
        let (x, y) = (coord.x as usize, coord.y as usize);
        block[2 * y + 1][2 * x + 1] = STRICT_OPEN;
    }
    for (a, b) in grid.iter_links() {
        // Wrapping links of cylinder grids have no between-cell character.
        let dx = (a.x as i64 - b.x as i64).abs();
        let dy = (a.y as i64 - b.y as i64).abs();
        if dx + dy != 1 {
            continue;
        }
        let wall_x = (a.x + b.x) as usize + 1;
        let wall_y = (a.y + b.y) as usize + 1;
        block[wall_y][wall_x] = STRICT_OPEN;
    }

    let mut out = String::with_capacity((block_width + 1) * block_height);
    for row in block {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn validate_uniform_row_lengths(char_rows: &[Vec<char>]) -> Result<()> {
    if char_rows.is_empty() {
        return Err(ErrorKind::BlockwiseFormat("empty block text".to_owned()).into());
    }
    let first_length = char_rows[0].len();
    for (row_index, row) in char_rows.iter().enumerate() {
        if row.len() != first_length {
            return Err(ErrorKind::BlockwiseFormat(format!("row {} has length {} but the first \
                                                           row has length {}",
                                                          row_index,
                                                          row.len(),
                                                          first_length))
                .into());
        }
    }
    Ok(())
}
