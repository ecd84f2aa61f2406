use std::iter::ExactSizeIterator;
use std::slice;

use petgraph::graph::{Edge, IndexType};

use crate::cells::Cartesian2DCoordinate;
use crate::masks::BinaryMask2D;
use crate::units::{ColumnLength, RowLength};

/// Iterator over every unmasked cell coordinate of a grid, in row-major order.
pub struct CellIter<'a> {
    current_cell_number: usize,
    cells_count: usize,
    row_width: RowLength,
    mask: Option<&'a BinaryMask2D>,
}

impl<'a> CellIter<'a> {
    pub(crate) fn new(row_width: RowLength,
                      cells_count: usize,
                      mask: Option<&'a BinaryMask2D>)
                      -> CellIter<'a> {
        CellIter {
            current_cell_number: 0,
            cells_count,
            row_width,
            mask,
        }
    }
}

impl<'a> Iterator for CellIter<'a> {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        while self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    self.row_width);
            self.current_cell_number += 1;
            let masked = self.mask.map_or(false, |m| m.is_masked(coord));
            if !masked {
                return Some(coord);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        // Any remaining cell may yet be masked off.
        (0, Some(remaining))
    }
}

#[derive(Copy, Clone, Debug)]
enum BatchKind {
    Row,
    Column,
}

/// Iterator producing each row (or each column) of a grid as a `Vec` of
/// coordinates. Masked cells are not filtered out: callers that batch by
/// row typically need the full lattice shape.
pub struct BatchIter {
    kind: BatchKind,
    current_index: usize,
    row_width: RowLength,
    column_height: ColumnLength,
}

impl BatchIter {
    pub(crate) fn rows(row_width: RowLength, column_height: ColumnLength) -> BatchIter {
        BatchIter {
            kind: BatchKind::Row,
            current_index: 0,
            row_width,
            column_height,
        }
    }

    pub(crate) fn columns(row_width: RowLength, column_height: ColumnLength) -> BatchIter {
        BatchIter {
            kind: BatchKind::Column,
            current_index: 0,
            row_width,
            column_height,
        }
    }
}

impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let count = match self.kind {
            BatchKind::Row => self.column_height.0,
            BatchKind::Column => self.row_width.0,
        };
        if self.current_index < count {
            let coords = match self.kind {
                BatchKind::Row => {
                    let y = self.current_index as u32;
                    (0..self.row_width.0)
                        .map(|x| Cartesian2DCoordinate::new(x as u32, y))
                        .collect()
                }
                BatchKind::Column => {
                    let x = self.current_index as u32;
                    (0..self.column_height.0)
                        .map(|y| Cartesian2DCoordinate::new(x, y as u32))
                        .collect()
                }
            };
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = match self.kind {
            BatchKind::Row => self.column_height.0,
            BatchKind::Column => self.row_width.0,
        };
        let remaining = count - self.current_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BatchIter {} // default impl using size_hint()

/// Iterator over every link (passage) in a grid. Each undirected link is
/// seen exactly once, as a pair of cell coordinates.
pub struct LinksIter<'a, GridIndexType: IndexType> {
    edges: slice::Iter<'a, Edge<(), GridIndexType>>,
    row_width: RowLength,
}

impl<'a, GridIndexType: IndexType> LinksIter<'a, GridIndexType> {
    pub(crate) fn new(edges: slice::Iter<'a, Edge<(), GridIndexType>>,
                      row_width: RowLength)
                      -> LinksIter<'a, GridIndexType> {
        LinksIter { edges, row_width }
    }
}

impl<'a, GridIndexType: IndexType> Iterator for LinksIter<'a, GridIndexType> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);
    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next().map(|edge| {
            let src = Cartesian2DCoordinate::from_row_major_index(edge.source().index(),
                                                                  self.row_width);
            let dst = Cartesian2DCoordinate::from_row_major_index(edge.target().index(),
                                                                  self.row_width);
            (src, dst)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl<'a, GridIndexType: IndexType> ExactSizeIterator for LinksIter<'a, GridIndexType> {}
