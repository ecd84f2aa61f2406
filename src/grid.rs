use std::fmt;
use std::rc::Rc;

use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};
use rand::Rng;
use rand_xorshift::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateOptionSmallVec,
                   CoordinateSmallVec};
use crate::grid_coordinates::RectGridCoordinates;
use crate::grid_iterators::{BatchIter, CellIter, LinksIter};
use crate::grid_traits::{GridCoordinates, GridDisplay};
use crate::masks::BinaryMask2D;
use crate::units::{ColumnLength, ColumnsCount, Height, RowLength, RowsCount, Width};

/// A rectangular (or column-wrapped) lattice of cells together with the
/// passage graph carved between them.
///
/// Cells are not materialised objects: a cell is its row-major index into an
/// undirected petgraph graph whose edges are the links, and the geometric
/// neighbour relation is computed on demand from the grid's
/// `GridCoordinates` resolution strategy. An optional `BinaryMask2D` hides
/// cells from every query, iteration and random selection.
pub struct Grid<GridIndexType: IndexType, Coords: GridCoordinates = RectGridCoordinates> {
    graph: Graph<(), (), Undirected, GridIndexType>,
    row_width: RowLength,
    column_height: ColumnLength,
    coordinates: Coords,
    mask: Option<BinaryMask2D>,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

impl<GridIndexType: IndexType, Coords: GridCoordinates> fmt::Debug
    for Grid<GridIndexType, Coords>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: graph: {:?}, row_width: {:?}, column_height: {:?}, masked: {:?}",
               self.graph,
               self.row_width,
               self.column_height,
               self.mask.is_some())
    }
}

impl<GridIndexType: IndexType, Coords: GridCoordinates> Grid<GridIndexType, Coords> {
    pub fn new(row_width: RowLength,
               column_height: ColumnLength,
               coordinates: Coords)
               -> Grid<GridIndexType, Coords> {
        let cells_count = row_width.0 * column_height.0;
        let edges_count_hint = 2 * cells_count;

        let mut grid = Grid {
            graph: Graph::with_capacity(cells_count, edges_count_hint),
            row_width,
            column_height,
            coordinates,
            mask: None,
            grid_display: None,
        };
        for _ in 0..cells_count {
            let _ = grid.graph.add_node(());
        }

        grid
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.row_width.0 * self.column_height.0
    }

    /// The number of cells that are not hidden by the mask.
    pub fn active_size(&self) -> usize {
        match self.mask {
            Some(ref m) => {
                m.count_unmasked_within_dimensions(Width(self.row_width.0),
                                                   Height(self.column_height.0))
            }
            None => self.size(),
        }
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.column_height.0)
    }

    #[inline]
    pub fn row_length(&self) -> RowLength {
        self.row_width
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.row_width.0)
    }

    #[inline]
    pub fn column_length(&self) -> ColumnLength {
        self.column_height
    }

    #[inline]
    pub fn coordinates(&self) -> Coords {
        self.coordinates
    }

    /// A uniformly random unmasked cell, or None when every cell is masked
    /// off (or the grid has no cells at all).
    pub fn random_cell(&self, rng: &mut XorShiftRng) -> Option<Cartesian2DCoordinate> {
        if self.active_size() == 0 {
            return None;
        }
        loop {
            let index = rng.gen_range(0..self.size());
            let coord = Cartesian2DCoordinate::from_row_major_index(index, self.row_width);
            if !self.is_masked(coord) {
                return Some(coord);
            }
        }
    }

    /// Link two cells.
    ///
    /// Linking is undirected: `a` becomes traversable to `b` and vice versa.
    /// Re-linking an already linked pair is a no-op.
    pub fn link(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate)
                -> Result<(), CellLinkError> {
        if a != b {
            let a_index_opt = self.grid_coordinate_graph_index(a);
            let b_index_opt = self.grid_coordinate_graph_index(b);
            match (a_index_opt, b_index_opt) {
                (Some(a_index), Some(b_index)) => {
                    let _ = self.graph.update_edge(a_index, b_index, ());
                    Ok(())
                }
                _ => Err(CellLinkError::InvalidGridCoordinate),
            }
        } else {
            Err(CellLinkError::SelfLink)
        }
    }

    /// Link a cell to its neighbour in the given direction. When there is no
    /// neighbour that way this is a defined no-op, so generation algorithms
    /// can call it unconditionally. Returns the neighbour linked to, if any.
    pub fn link_neighbour(&mut self,
                          coord: Cartesian2DCoordinate,
                          direction: CompassPrimary)
                          -> Option<Cartesian2DCoordinate> {
        if let Some(neighbour) = self.neighbour_at_direction(coord, direction) {
            self.link(coord, neighbour).ok().map(|_| neighbour)
        } else {
            None
        }
    }

    /// Unlink two cells, if the grid coordinates are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);

        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            if let Some(edge_index) = self.graph.find_edge(a_index, b_index) {
                // This will invalidate the last edge index in the graph, which is fine as we
                // are not storing them for any reason.
                self.graph.remove_edge(edge_index);
                return true;
            }
        }

        false
    }

    /// Remove every link in the grid, preserving cell identity and the mask.
    pub fn clear(&mut self) {
        self.graph.clear_edges();
    }

    /// Cell nodes that are linked to a particular node by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.grid_coordinate_graph_index(coord).map(|graph_node_index| {
            self.graph
                .neighbors(graph_node_index)
                .map(|node_index| {
                    Cartesian2DCoordinate::from_row_major_index(node_index.index(), self.row_width)
                })
                .collect()
        })
    }

    /// Cell nodes that are to the North, South, East or West of a particular node, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Cartesian2DCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|&direction| self.neighbour_at_direction(coord, direction))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        self.coordinates
            .offset_coordinate(coord, direction, self.row_width, self.column_height)
            .filter(|&neighbour| !self.is_masked(neighbour))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Does this cell have a passage to the north or the south?
    pub fn has_vertical_passage(&self, coord: Cartesian2DCoordinate) -> bool {
        CompassPrimary::VERTICAL
            .iter()
            .any(|&dir| self.is_neighbour_linked(coord, dir))
    }

    /// Does this cell have a passage to the east or the west?
    pub fn has_horizontal_passage(&self, coord: Cartesian2DCoordinate) -> bool {
        CompassPrimary::HORIZONTAL
            .iter()
            .any(|&dir| self.is_neighbour_linked(coord, dir))
    }

    pub fn has_only_horizontal_passage(&self, coord: Cartesian2DCoordinate) -> bool {
        self.has_horizontal_passage(coord) && !self.has_vertical_passage(coord)
    }

    /// A cell with exactly two passages, one vertical and one horizontal.
    pub fn is_elbow_passage(&self, coord: Cartesian2DCoordinate) -> bool {
        let linked_dirs_count = CompassPrimary::ALL
            .iter()
            .filter(|&&dir| self.is_neighbour_linked(coord, dir))
            .count();
        linked_dirs_count == 2 && self.has_vertical_passage(coord) &&
        self.has_horizontal_passage(coord)
    }

    /// Every unmasked cell with exactly one link, in row-major order.
    pub fn dead_ends(&self) -> Vec<Cartesian2DCoordinate> {
        self.iter()
            .filter(|&coord| self.links(coord).map_or(false, |links| links.len() == 1))
            .collect()
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid (out of bounds or masked).
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row_major_index(self.row_width))
        } else {
            None
        }
    }

    /// Is the grid coordinate within the grid's dimensions and not masked off?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        self.in_bounds(coord) && !self.is_masked(coord)
    }

    #[inline]
    pub fn in_bounds(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.row_width.0 && (coord.y as usize) < self.column_height.0
    }

    #[inline]
    pub fn is_masked(&self, coord: Cartesian2DCoordinate) -> bool {
        self.mask.as_ref().map_or(false, |m| m.is_masked(coord))
    }

    pub fn mask(&self) -> Option<&BinaryMask2D> {
        self.mask.as_ref()
    }

    pub fn set_mask(&mut self, mask: Option<BinaryMask2D>) {
        self.mask = mask;
    }

    /// Hide a cell: it is removed from every neighbour query, iteration and
    /// random selection, and any links it had are severed.
    pub fn hide_cell(&mut self, coord: Cartesian2DCoordinate) {
        if !self.in_bounds(coord) || self.is_masked(coord) {
            return;
        }
        if let Some(links) = self.links(coord) {
            for linked in &*links {
                self.unlink(coord, *linked);
            }
        }
        let (w, h) = (self.row_width.0, self.column_height.0);
        self.mask
            .get_or_insert_with(|| BinaryMask2D::new(Width(w), Height(h)))
            .hide(coord);
    }

    /// Unhide a cell. Neighbour relations re-appear without any re-wiring
    /// pass because adjacency is computed, not stored.
    pub fn show_cell(&mut self, coord: Cartesian2DCoordinate) {
        if let Some(ref mut m) = self.mask {
            m.show(coord);
        }
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.row_width, self.size(), self.mask.as_ref())
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(self.row_width, self.column_height)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::columns(self.row_width, self.column_height)
    }

    pub fn iter_links(&self) -> LinksIter<GridIndexType> {
        LinksIter::new(self.graph.raw_edges().iter(), self.row_width)
    }

    /// Convert a grid coordinate into a petgraph node index.
    /// Returns None if the grid coordinate is invalid (out of the grid's dimensions or masked).
    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: Cartesian2DCoordinate)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }
}
