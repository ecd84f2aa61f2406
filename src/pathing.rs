use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::{Debug, Display};

use num::traits::{Bounded, One, Unsigned, Zero};
use num::CheckedAdd;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridCoordinates;
use crate::utils;
use crate::utils::FnvHashMap;

/// Trait **alias** for the numeric distance type of a `Distances` map.
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + CheckedAdd + Copy + Ord + Debug + Display {
}
impl<T> MaxDistance for T
    where T: Zero + One + Bounded + Unsigned + CheckedAdd + Copy + Ord + Debug + Display
{
}

/// Single-source distances from a start cell to every reachable cell of a
/// maze's link graph, computed once at construction with a breadth-first
/// search. Cells unreachable from the start have no entry.
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT: MaxDistance> Distances<MaxDistanceT> {
    /// Returns None if the start coordinate is not a valid cell of the grid.
    pub fn new<GridIndexType: IndexType, Coords: GridCoordinates>
        (grid: &Grid<GridIndexType, Coords>,
         start_coordinate: Cartesian2DCoordinate)
         -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut distances = utils::fnv_hashmap(grid.size());
        let mut max_distance: MaxDistanceT = Zero::zero();
        distances.insert(start_coordinate, max_distance);

        // Simple breadth first search walk of the linked cells, the frontier
        // being all cells at the same distance from the start.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = Vec::new();
            for cell_coord in frontier {
                let distance_to_cell = distances[&cell_coord];

                if let Some(linked_cells) = grid.links(cell_coord) {
                    for link_coordinate in &*linked_cells {
                        if !distances.contains_key(link_coordinate) {
                            // Saturate rather than overflow when the distance
                            // type is too narrow for the maze.
                            let distance: MaxDistanceT = distance_to_cell
                                .checked_add(&One::one())
                                .unwrap_or_else(Bounded::max_value);
                            if distance > max_distance {
                                max_distance = distance;
                            }
                            distances.insert(*link_coordinate, distance);
                            new_frontier.push(*link_coordinate);
                        }
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance,
        })
    }

    #[inline]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).copied()
    }

    pub fn distances(&self) -> &FnvHashMap<Cartesian2DCoordinate, MaxDistanceT> {
        &self.distances
    }

    /// All the cells which are the maximum distance from the start cell, in
    /// row-major order.
    pub fn furthest_points_on_grid(&self) -> Vec<Cartesian2DCoordinate> {
        let mut furthest: Vec<Cartesian2DCoordinate> = self.distances
            .iter()
            .filter(|&(_, &dist)| dist == self.max_distance)
            .map(|(&coord, _)| coord)
            .collect();
        furthest.sort_by_key(|coord| (coord.y, coord.x));
        furthest
    }
}

/// Positive integer traversal costs attributed to *cells*, not edges:
/// stepping into a cell costs that cell's weight. Cells default to a weight
/// of one.
pub struct CellWeights<MaxDistanceT = u32> {
    weights: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
}

impl<MaxDistanceT: MaxDistance> CellWeights<MaxDistanceT> {
    pub fn new() -> CellWeights<MaxDistanceT> {
        CellWeights { weights: FnvHashMap::default() }
    }

    pub fn set_weight(&mut self, coord: Cartesian2DCoordinate, weight: MaxDistanceT) {
        self.weights.insert(coord, weight);
    }

    #[inline]
    pub fn weight(&self, coord: Cartesian2DCoordinate) -> MaxDistanceT {
        self.weights.get(&coord).copied().unwrap_or_else(One::one)
    }
}

impl<MaxDistanceT: MaxDistance> Default for CellWeights<MaxDistanceT> {
    fn default() -> CellWeights<MaxDistanceT> {
        CellWeights::new()
    }
}

impl<MaxDistanceT: MaxDistance> Distances<MaxDistanceT> {
    /// Weighted single-source distances using a priority-ordered frontier:
    /// `distance(neighbour) = min(existing, distance(current) + weight(neighbour))`.
    /// With all weights at the default of one the result is identical to the
    /// breadth-first `new`.
    pub fn new_weighted<GridIndexType: IndexType, Coords: GridCoordinates>
        (grid: &Grid<GridIndexType, Coords>,
         start_coordinate: Cartesian2DCoordinate,
         weights: &CellWeights<MaxDistanceT>)
         -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut distances = utils::fnv_hashmap(grid.size());
        let mut max_distance: MaxDistanceT = Zero::zero();
        distances.insert(start_coordinate, max_distance);

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((Zero::zero(), start_coordinate)));

        while let Some(Reverse((cell_distance, cell_coord))) = heap.pop() {
            // An improved distance may have been found since this entry was
            // queued, making it stale.
            if cell_distance > distances[&cell_coord] {
                continue;
            }
            if cell_distance > max_distance {
                max_distance = cell_distance;
            }

            if let Some(linked_cells) = grid.links(cell_coord) {
                for link_coordinate in &*linked_cells {
                    let step_cost = weights.weight(*link_coordinate);
                    let distance: MaxDistanceT = cell_distance
                        .checked_add(&step_cost)
                        .unwrap_or_else(Bounded::max_value);
                    let improved = distances.get(link_coordinate)
                        .map_or(true, |&existing| distance < existing);
                    if improved {
                        distances.insert(*link_coordinate, distance);
                        heap.push(Reverse((distance, *link_coordinate)));
                    }
                }
            }
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance,
        })
    }
}

/// The path from the distances' start cell to the given end cell, walked
/// backwards from the end by always stepping to a linked neighbour with a
/// strictly smaller distance. Returns None when the end cell is unreachable
/// or invalid.
pub fn shortest_path<GridIndexType, MaxDistanceT, Coords>(grid: &Grid<GridIndexType, Coords>,
                                                          distances: &Distances<MaxDistanceT>,
                                                          end_coordinate: Cartesian2DCoordinate)
                                                          -> Option<Vec<Cartesian2DCoordinate>>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance,
          Coords: GridCoordinates
{
    distances.distance_from_start_to(end_coordinate)?;

    let mut path = vec![end_coordinate];
    let mut current = end_coordinate;
    while current != distances.start() {
        let current_distance = distances.distance_from_start_to(current)?;
        let closer_neighbour = grid.links(current)?
            .iter()
            .find(|&&linked| {
                distances.distance_from_start_to(linked)
                    .map_or(false, |d| d < current_distance)
            })
            .cloned()?;
        path.push(closer_neighbour);
        current = closer_neighbour;
    }

    path.reverse();
    Some(path)
}

/// As `shortest_path` but for weighted distances: the previous cell on an
/// optimal path is a linked neighbour whose distance plus the weight of the
/// current cell equals the current cell's distance.
pub fn shortest_weighted_path<GridIndexType, MaxDistanceT, Coords>
    (grid: &Grid<GridIndexType, Coords>,
     distances: &Distances<MaxDistanceT>,
     weights: &CellWeights<MaxDistanceT>,
     end_coordinate: Cartesian2DCoordinate)
     -> Option<Vec<Cartesian2DCoordinate>>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance,
          Coords: GridCoordinates
{
    distances.distance_from_start_to(end_coordinate)?;

    let mut path = vec![end_coordinate];
    let mut current = end_coordinate;
    while current != distances.start() {
        let current_distance = distances.distance_from_start_to(current)?;
        let step_cost = weights.weight(current);
        let predecessor = grid.links(current)?
            .iter()
            .find(|&&linked| {
                distances.distance_from_start_to(linked)
                    .and_then(|d| d.checked_add(&step_cost))
                    .map_or(false, |total| total == current_distance)
            })
            .cloned()?;
        path.push(predecessor);
        current = predecessor;
    }

    path.reverse();
    Some(path)
}

/// Two breadth-first searches give the longest shortest-path through the
/// maze: the first finds a cell furthest from an arbitrary start, the second
/// measures from that cell to the cell furthest from *it*, and the path
/// between that pair is the answer.
pub fn dijkstra_longest_path<GridIndexType, MaxDistanceT, Coords>
    (grid: &Grid<GridIndexType, Coords>)
     -> Option<Vec<Cartesian2DCoordinate>>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance,
          Coords: GridCoordinates
{
    let first_cell = grid.iter().next()?;
    let distances_from_arbitrary_start: Distances<MaxDistanceT> =
        Distances::new(grid, first_cell)?;

    let long_path_start = *distances_from_arbitrary_start.furthest_points_on_grid().first()?;
    let distances: Distances<MaxDistanceT> = Distances::new(grid, long_path_start)?;
    let long_path_end = *distances.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances, long_path_end)
}
