//! Maze generation algorithms.
//!
//! Every generator takes a mutable `Grid` and carves passages into it by
//! linking cells, plus a caller-seeded `XorShiftRng` so that runs are
//! reproducible. The spanning-tree algorithms (everything except
//! `recursive_division` at sub-maximal settings, `aldous_broder` below 100%
//! completion and `braid`) leave a perfect maze: every cell reachable, no
//! loops.
//!
//! The walk-based algorithms (Aldous-Broder, Wilson's, hunt-and-kill,
//! recursive backtracker, the Prim's family, growing tree) work on masked
//! grids: they carve the connected region of unmasked cells containing their
//! start cell and leave any other region untouched. The row-structured
//! algorithms (binary tree, sidewinder, Eller's, recursive division) assume
//! a full rectangular lattice and are not mask aware.

use petgraph::unionfind::UnionFind;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_xorshift::XorShiftRng;

use bit_set::BitSet;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::{ErrorKind, Result};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridCoordinates;
use crate::utils::FnvHashMap;

/// Carve a maze by visiting every cell and linking randomly either to the
/// north or east. Strongly biased: the northern row and eastern column are
/// always unbroken corridors.
pub fn binary_tree<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                          rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let cells: Vec<Cartesian2DCoordinate> = grid.iter().collect();
    for cell_coord in cells {

        // Get the neighbours perpendicular to this cell
        let perpendicular_neighbours =
            grid.neighbours_at_directions(cell_coord,
                                          &[CompassPrimary::North, CompassPrimary::East]);
        let neighbours: Vec<Cartesian2DCoordinate> =
            perpendicular_neighbours.iter().filter_map(|n| *n).collect();

        // Unless there are no neighbours, randomly choose a neighbour to link.
        if !neighbours.is_empty() {
            let link_coord = neighbours[rng.gen_range(0..neighbours.len())];
            grid.link(cell_coord, link_coord)
                .expect("binary_tree link of a neighbouring cell failed");
        }
    }
}

/// Carve row by row: walk east accumulating a "run" of cells, randomly
/// closing the run out by linking one of its members north. The top row is
/// one long eastern corridor.
pub fn sidewinder<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                         rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let rows: Vec<Vec<Cartesian2DCoordinate>> = grid.iter_row().collect();
    for row in rows {
        let mut run = Vec::new();
        for cell_coord in row {
            run.push(cell_coord);

            let at_eastern_boundary =
                grid.neighbour_at_direction(cell_coord, CompassPrimary::East).is_none();
            let at_northern_boundary =
                grid.neighbour_at_direction(cell_coord, CompassPrimary::North).is_none();
            let should_close_out = at_eastern_boundary ||
                                   (!at_northern_boundary && rng.gen::<bool>());

            if should_close_out {
                let run_member = run[rng.gen_range(0..run.len())];
                grid.link_neighbour(run_member, CompassPrimary::North);
                run.clear();
            } else {
                grid.link_neighbour(cell_coord, CompassPrimary::East);
            }
        }
    }
}

/// Carve an unbiased maze with a drunken random walk: each step into an
/// unvisited cell links it to the cell walked from. Uniform over all
/// spanning trees but potentially very slow to finish.
///
/// `completion` in [0, 1] (clamped) stops the walk once that fraction of the
/// reachable cells has been visited; anything below 1.0 leaves a partial
/// maze. A mask that splits the grid limits the walk to the region holding
/// the randomly chosen start cell, so the walk always terminates.
pub fn aldous_broder<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                            completion: f64,
                                            rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let completion = completion.clamp(0.0, 1.0);
    if completion == 0.0 {
        return;
    }
    let mut current = match grid.random_cell(rng) {
        Some(coord) => coord,
        None => return,
    };
    let region_count = reachable_region(grid, current).len();
    let target_visits = ((region_count as f64 * completion).ceil() as usize).max(1);

    let mut visited = visited_cells_tracker(grid);
    let mut visit_count = 1;
    mark_visited(&mut visited, grid, current);

    // Every cell in a region of two or more has at least one neighbour, so
    // the walk cannot get stuck before reaching the visit target.
    while visit_count < target_visits {
        let neighbours = grid.neighbours(current);
        let next = neighbours[rng.gen_range(0..neighbours.len())];

        if !is_visited(&visited, grid, next) {
            grid.link(current, next).expect("aldous_broder link of a neighbour failed");
            mark_visited(&mut visited, grid, next);
            visit_count += 1;
        }
        current = next;
    }
}

/// Carve an unbiased maze with loop-erased random walks: walk from an
/// unvisited cell until hitting the visited set, erasing any loop the walk
/// makes, then link the whole walk into the maze.
///
/// A mask that splits the grid limits the carving to the region holding the
/// randomly chosen first cell; walks never start in an unreachable region,
/// so the generator always terminates.
pub fn wilson<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                     rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let first = match grid.random_cell(rng) {
        Some(coord) => coord,
        None => return,
    };
    let region = reachable_region(grid, first);
    let region_count = region.len();

    let mut visited = visited_cells_tracker(grid);
    mark_visited(&mut visited, grid, first);
    let mut visited_count = 1;

    let row_length = grid.row_length();
    let cells: Vec<Cartesian2DCoordinate> = grid.iter().collect();
    for &walk_start in &cells {
        if visited_count == region_count {
            break;
        }
        if !region.contains(walk_start.row_major_index(row_length)) ||
           is_visited(&visited, grid, walk_start) {
            continue;
        }

        // Loop-erased random walk until we touch the visited part of the
        // maze. The walk stays inside `region`, which also holds the whole
        // visited set, so it terminates with probability one.
        let mut path = vec![walk_start];
        let mut path_positions: FnvHashMap<Cartesian2DCoordinate, usize> =
            FnvHashMap::default();
        path_positions.insert(walk_start, 0);

        let mut current = walk_start;
        loop {
            let neighbours = grid.neighbours(current);
            let next = neighbours[rng.gen_range(0..neighbours.len())];

            if let Some(&loop_start) = path_positions.get(&next) {
                // Walked into our own path: erase the loop.
                for erased in path.drain(loop_start + 1..) {
                    path_positions.remove(&erased);
                }
                current = next;
            } else if is_visited(&visited, grid, next) {
                path.push(next);
                break;
            } else {
                path_positions.insert(next, path.len());
                path.push(next);
                current = next;
            }
        }

        for pair in path.windows(2) {
            grid.link(pair[0], pair[1]).expect("wilson link of a walked neighbour failed");
        }
        for &walked in &path[..path.len() - 1] {
            mark_visited(&mut visited, grid, walked);
            visited_count += 1;
        }
    }
}

/// Random walk into unvisited cells until boxed in, then "hunt" in row-major
/// order for an unvisited cell next to a visited one and continue from there.
/// Biased towards long winding corridors.
pub fn hunt_and_kill<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                            start: Option<Cartesian2DCoordinate>,
                                            rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let mut current = match start_cell(grid, start, rng) {
        Some(coord) => coord,
        None => return,
    };

    let mut visited = visited_cells_tracker(grid);
    mark_visited(&mut visited, grid, current);

    loop {
        let unvisited_neighbours: Vec<Cartesian2DCoordinate> = grid.neighbours(current)
            .iter()
            .filter(|&&n| !is_visited(&visited, grid, n))
            .cloned()
            .collect();

        if !unvisited_neighbours.is_empty() {
            // Kill phase: keep walking.
            let next = unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())];
            grid.link(current, next).expect("hunt_and_kill link of a neighbour failed");
            mark_visited(&mut visited, grid, next);
            current = next;
        } else {
            // Hunt phase: first unvisited cell adjacent to the visited maze.
            let mut hunted = None;
            for coord in grid.iter() {
                if is_visited(&visited, grid, coord) {
                    continue;
                }
                let visited_neighbours: Vec<Cartesian2DCoordinate> = grid.neighbours(coord)
                    .iter()
                    .filter(|&&n| is_visited(&visited, grid, n))
                    .cloned()
                    .collect();
                if !visited_neighbours.is_empty() {
                    let into = visited_neighbours[rng.gen_range(0..visited_neighbours.len())];
                    hunted = Some((coord, into));
                    break;
                }
            }
            match hunted {
                Some((coord, into_maze)) => {
                    grid.link(coord, into_maze)
                        .expect("hunt_and_kill link of a hunted neighbour failed");
                    mark_visited(&mut visited, grid, coord);
                    current = coord;
                }
                None => break,
            }
        }
    }
}

/// Depth-first carving with an explicit stack: walk into random unvisited
/// neighbours, backtracking when boxed in. Long corridors, few but long dead
/// ends.
pub fn recursive_backtracker<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                                    start: Option<Cartesian2DCoordinate>,
                                                    rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let start = match start_cell(grid, start, rng) {
        Some(coord) => coord,
        None => return,
    };

    let mut visited = visited_cells_tracker(grid);
    mark_visited(&mut visited, grid, start);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let unvisited_neighbours: Vec<Cartesian2DCoordinate> = grid.neighbours(current)
            .iter()
            .filter(|&&n| !is_visited(&visited, grid, n))
            .cloned()
            .collect();

        if unvisited_neighbours.is_empty() {
            stack.pop();
        } else {
            let next = unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())];
            grid.link(current, next)
                .expect("recursive_backtracker link of a neighbour failed");
            mark_visited(&mut visited, grid, next);
            stack.push(next);
        }
    }
}

/// Randomised Kruskal's: shuffle every possible wall, knock a wall down only
/// when it joins two different connected components, tracked with a
/// union-find.
pub fn kruskal<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                      rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let mut candidate_links: Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)> = Vec::new();
    for coord in grid.iter() {
        for direction in [CompassPrimary::South, CompassPrimary::East] {
            if let Some(neighbour) = grid.neighbour_at_direction(coord, direction) {
                candidate_links.push((coord, neighbour));
            }
        }
    }
    candidate_links.shuffle(rng);

    let mut components = UnionFind::<usize>::new(grid.size());
    for (a, b) in candidate_links {
        let a_index = a.row_major_index(grid.row_length());
        let b_index = b.row_major_index(grid.row_length());
        if components.union(a_index, b_index) {
            grid.link(a, b).expect("kruskal link of a neighbouring cell failed");
        }
    }
}

/// The cell-selection strategies of the growing tree algorithm. Different
/// selections degrade the growing tree into other well known algorithms:
/// `Random` behaves like simplified Prim's, `MostRecent` like the recursive
/// backtracker.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GrowingTreeSelector {
    Random,
    MostRecent,
    Oldest,
    Median,
    /// Stick with one random cell until it has no unvisited neighbours left,
    /// then pick another at random.
    StickyRandom,
}

/// Grow a tree of cells from a random start: repeatedly select an active
/// cell per the configured strategy, link it to one random unvisited
/// neighbour, and retire it once all its neighbours are visited.
pub fn growing_tree<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                           selector: GrowingTreeSelector,
                                           rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    growing_tree_from(grid, None, selector, rng);
}

fn growing_tree_from<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                            start: Option<Cartesian2DCoordinate>,
                                            selector: GrowingTreeSelector,
                                            rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let start = match start_cell(grid, start, rng) {
        Some(coord) => coord,
        None => return,
    };

    let mut visited = visited_cells_tracker(grid);
    mark_visited(&mut visited, grid, start);
    let mut active = vec![start];
    // Index into `active` for the sticky strategy, reset whenever the stuck-to
    // cell is retired.
    let mut sticky_index: Option<usize> = None;

    while !active.is_empty() {
        let selection_index = match selector {
            GrowingTreeSelector::Random => rng.gen_range(0..active.len()),
            GrowingTreeSelector::MostRecent => active.len() - 1,
            GrowingTreeSelector::Oldest => 0,
            GrowingTreeSelector::Median => active.len() / 2,
            GrowingTreeSelector::StickyRandom => {
                match sticky_index {
                    Some(index) => index,
                    None => {
                        let index = rng.gen_range(0..active.len());
                        sticky_index = Some(index);
                        index
                    }
                }
            }
        };
        let current = active[selection_index];

        let unvisited_neighbours: Vec<Cartesian2DCoordinate> = grid.neighbours(current)
            .iter()
            .filter(|&&n| !is_visited(&visited, grid, n))
            .cloned()
            .collect();

        if unvisited_neighbours.is_empty() {
            active.remove(selection_index);
            sticky_index = None;
        } else {
            let next = unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())];
            grid.link(current, next).expect("growing_tree link of a neighbour failed");
            mark_visited(&mut visited, grid, next);
            active.push(next);
        }
    }
}

/// Prim's algorithm simplified by treating every wall as equal cost, which
/// makes it the growing tree algorithm with random selection.
pub fn simplified_prims<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                               start: Option<Cartesian2DCoordinate>,
                                               rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    growing_tree_from(grid, start, GrowingTreeSelector::Random, rng);
}

/// Prim's with a random weight pre-assigned to every cell: always grow from
/// the cheapest active cell into its cheapest unvisited neighbour.
pub fn weighted_prims<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                             start: Option<Cartesian2DCoordinate>,
                                             rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let start = match start_cell(grid, start, rng) {
        Some(coord) => coord,
        None => return,
    };

    let cell_cost = |coord: Cartesian2DCoordinate, costs: &[u32], grid: &Grid<GridIndexType, Coords>| {
        costs[coord.row_major_index(grid.row_length())]
    };
    let costs: Vec<u32> = (0..grid.size()).map(|_| rng.gen::<u32>()).collect();

    let mut visited = visited_cells_tracker(grid);
    mark_visited(&mut visited, grid, start);
    let mut active = vec![start];

    while !active.is_empty() {
        let (selection_index, _) = active.iter()
            .enumerate()
            .min_by_key(|&(_, &coord)| cell_cost(coord, &costs, grid))
            .expect("active list is non-empty");
        let current = active[selection_index];

        let cheapest_unvisited = grid.neighbours(current)
            .iter()
            .filter(|&&n| !is_visited(&visited, grid, n))
            .min_by_key(|&&n| cell_cost(n, &costs, grid))
            .cloned();

        match cheapest_unvisited {
            Some(next) => {
                grid.link(current, next).expect("weighted_prims link of a neighbour failed");
                mark_visited(&mut visited, grid, next);
                active.push(next);
            }
            None => {
                active.remove(selection_index);
            }
        }
    }
}

/// "True" Prim's in its three-set formulation: cells are in the maze, on the
/// frontier, or untouched. Each step links a random frontier cell to a
/// random in-maze neighbour and promotes the frontier cell's untouched
/// neighbours.
pub fn three_set_prims<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                              start: Option<Cartesian2DCoordinate>,
                                              rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let start = match start_cell(grid, start, rng) {
        Some(coord) => coord,
        None => return,
    };

    let mut in_maze = visited_cells_tracker(grid);
    let mut frontier: Vec<Cartesian2DCoordinate> = Vec::new();
    let mut frontier_bits = BitSet::with_capacity(grid.size());

    mark_visited(&mut in_maze, grid, start);
    for neighbour in grid.neighbours(start).iter().cloned().collect::<Vec<_>>() {
        frontier_bits.insert(neighbour.row_major_index(grid.row_length()));
        frontier.push(neighbour);
    }

    while !frontier.is_empty() {
        let frontier_index = rng.gen_range(0..frontier.len());
        let cell = frontier.swap_remove(frontier_index);
        frontier_bits.remove(cell.row_major_index(grid.row_length()));

        let in_maze_neighbours: Vec<Cartesian2DCoordinate> = grid.neighbours(cell)
            .iter()
            .filter(|&&n| is_visited(&in_maze, grid, n))
            .cloned()
            .collect();
        let into_maze = in_maze_neighbours[rng.gen_range(0..in_maze_neighbours.len())];
        grid.link(cell, into_maze).expect("three_set_prims link of a neighbour failed");
        mark_visited(&mut in_maze, grid, cell);

        for neighbour in grid.neighbours(cell).iter().cloned().collect::<Vec<_>>() {
            let index = neighbour.row_major_index(grid.row_length());
            if !is_visited(&in_maze, grid, neighbour) && !frontier_bits.contains(index) {
                frontier_bits.insert(index);
                frontier.push(neighbour);
            }
        }
    }
}

/// The textbook edge-weighted Prim's over per-wall weights is not provided;
/// `weighted_prims` and `three_set_prims` cover the practical variants.
/// Calling this always fails.
pub fn randomized_prims<GridIndexType, Coords>(_grid: &mut Grid<GridIndexType, Coords>,
                                               _rng: &mut XorShiftRng)
                                               -> Result<()>
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    Err(ErrorKind::UnsupportedGenerator("randomized_prims".to_owned()).into())
}

/// Eller's algorithm: carve one row at a time, tracking connected sets
/// within the row, merging horizontally at random and carrying at least one
/// southern passage per set down to the next row. Only one row of state is
/// live at a time.
pub fn ellers<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                     rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let rows: Vec<Vec<Cartesian2DCoordinate>> = grid.iter_row().collect();
    let rows_count = rows.len();
    if rows_count == 0 {
        return;
    }
    let row_width = rows[0].len();

    let mut next_set_id = 0;
    let mut make_set_id = || {
        let id = next_set_id;
        next_set_id += 1;
        id
    };

    let mut row_sets: Vec<usize> = (0..row_width).map(|_| make_set_id()).collect();

    for (row_index, row) in rows.iter().enumerate() {
        let last_row = row_index == rows_count - 1;

        // Horizontal merges between adjacent cells of different sets.
        for x in 1..row_width {
            if row_sets[x - 1] == row_sets[x] {
                continue;
            }
            let should_merge = last_row || rng.gen::<bool>();
            if should_merge {
                grid.link(row[x - 1], row[x]).expect("ellers horizontal link failed");
                let (absorbed, kept) = (row_sets[x], row_sets[x - 1]);
                for set in row_sets.iter_mut() {
                    if *set == absorbed {
                        *set = kept;
                    }
                }
            }
        }

        if last_row {
            break;
        }

        // Vertical passages: at least one per set, iterated in sorted set id
        // order so that identically seeded runs are identical.
        let mut cells_by_set: FnvHashMap<usize, Vec<usize>> = FnvHashMap::default();
        for (x, &set) in row_sets.iter().enumerate() {
            cells_by_set.entry(set).or_insert_with(Vec::new).push(x);
        }
        let mut set_ids: Vec<usize> = cells_by_set.keys().cloned().collect();
        set_ids.sort_unstable();

        let mut next_row_sets: Vec<usize> = (0..row_width).map(|_| make_set_id()).collect();
        for set_id in set_ids {
            let mut members = cells_by_set.remove(&set_id).expect("set id came from this map");
            let carry_downs = 1 + rng.gen_range(0..members.len());
            for _ in 0..carry_downs {
                let member_x = members.remove(rng.gen_range(0..members.len()));
                grid.link_neighbour(row[member_x], CompassPrimary::South);
                next_row_sets[member_x] = set_id;
            }
        }

        row_sets = next_row_sets;
    }
}

/// Fully link the grid then recursively divide it with walls, leaving one
/// passage per wall. Produces boxy, room-like mazes.
pub fn recursive_division<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                                 rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    grid.clear();
    let cells: Vec<Cartesian2DCoordinate> = grid.iter().collect();
    for coord in cells {
        grid.link_neighbour(coord, CompassPrimary::South);
        grid.link_neighbour(coord, CompassPrimary::East);
    }

    let (width, height) = (grid.row_length().0, grid.column_length().0);
    divide(grid, 0, 0, width, height, rng);
}

fn divide<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                 x: usize,
                                 y: usize,
                                 width: usize,
                                 height: usize,
                                 rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    if width <= 1 || height <= 1 {
        return;
    }

    let divide_horizontally = if height > width {
        true
    } else if width > height {
        false
    } else {
        rng.gen::<bool>()
    };

    if divide_horizontally {
        // Wall between row wall_y-1 and row wall_y, with one passage.
        let wall_y = y + rng.gen_range(1..height);
        let passage_x = x + rng.gen_range(0..width);
        for wall_x in x..x + width {
            if wall_x == passage_x {
                continue;
            }
            grid.unlink(Cartesian2DCoordinate::new(wall_x as u32, (wall_y - 1) as u32),
                        Cartesian2DCoordinate::new(wall_x as u32, wall_y as u32));
        }
        divide(grid, x, y, width, wall_y - y, rng);
        divide(grid, x, wall_y, width, height - (wall_y - y), rng);
    } else {
        let wall_x = x + rng.gen_range(1..width);
        let passage_y = y + rng.gen_range(0..height);
        for wall_y in y..y + height {
            if wall_y == passage_y {
                continue;
            }
            grid.unlink(Cartesian2DCoordinate::new((wall_x - 1) as u32, wall_y as u32),
                        Cartesian2DCoordinate::new(wall_x as u32, wall_y as u32));
        }
        divide(grid, x, y, wall_x - x, height, rng);
        divide(grid, wall_x, y, width - (wall_x - x), height, rng);
    }
}

/// Remove dead ends by linking them to a neighbour, preferring neighbours
/// they are not already linked to. `dead_end_fraction` in [0, 1] (clamped)
/// is the approximate fraction of dead ends removed; 1.0 braids every dead
/// end the maze has.
pub fn braid<GridIndexType, Coords>(grid: &mut Grid<GridIndexType, Coords>,
                                    dead_end_fraction: f64,
                                    rng: &mut XorShiftRng)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let dead_end_fraction = dead_end_fraction.clamp(0.0, 1.0);
    if dead_end_fraction == 0.0 {
        return;
    }

    let mut dead_ends = grid.dead_ends();
    dead_ends.shuffle(rng);

    for coord in dead_ends {
        // Braiding an earlier dead end may have already cured this one.
        let still_dead_end = grid.links(coord).map_or(false, |links| links.len() == 1);
        if !still_dead_end {
            continue;
        }
        if dead_end_fraction < 1.0 && rng.gen::<f64>() > dead_end_fraction {
            continue;
        }

        let linked = grid.links(coord).expect("dead end coordinate is valid");
        let unlinked_neighbours: Vec<Cartesian2DCoordinate> = grid.neighbours(coord)
            .iter()
            .filter(|&n| !linked.contains(n))
            .cloned()
            .collect();

        // Prefer connecting two dead ends to each other.
        let dead_end_neighbours: Vec<Cartesian2DCoordinate> = unlinked_neighbours.iter()
            .filter(|&&n| grid.links(n).map_or(false, |links| links.len() == 1))
            .cloned()
            .collect();
        let candidates = if dead_end_neighbours.is_empty() {
            &unlinked_neighbours
        } else {
            &dead_end_neighbours
        };

        if !candidates.is_empty() {
            let neighbour = candidates[rng.gen_range(0..candidates.len())];
            grid.link(coord, neighbour).expect("braid link of a neighbour failed");
        }
    }
}

/// The caller's requested start cell if it is a valid cell of the grid,
/// otherwise a random active cell. None only when every cell is masked off.
fn start_cell<GridIndexType, Coords>(grid: &Grid<GridIndexType, Coords>,
                                     start: Option<Cartesian2DCoordinate>,
                                     rng: &mut XorShiftRng)
                                     -> Option<Cartesian2DCoordinate>
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    start.filter(|&coord| grid.is_valid_coordinate(coord))
        .or_else(|| grid.random_cell(rng))
}

fn visited_cells_tracker<GridIndexType, Coords>(grid: &Grid<GridIndexType, Coords>) -> BitSet
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    BitSet::with_capacity(grid.size())
}

/// Row-major indices of every active cell reachable from `start` by walking
/// neighbour adjacency. A mask can split a grid into multiple such regions;
/// the walk-based generators only ever carve one of them.
fn reachable_region<GridIndexType, Coords>(grid: &Grid<GridIndexType, Coords>,
                                           start: Cartesian2DCoordinate)
                                           -> BitSet
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    let row_length = grid.row_length();
    let mut region = BitSet::with_capacity(grid.size());
    region.insert(start.row_major_index(row_length));

    let mut frontier = vec![start];
    while let Some(cell) = frontier.pop() {
        for &neighbour in grid.neighbours(cell).iter() {
            if region.insert(neighbour.row_major_index(row_length)) {
                frontier.push(neighbour);
            }
        }
    }
    region
}

#[inline]
fn is_visited<GridIndexType, Coords>(visited: &BitSet,
                                     grid: &Grid<GridIndexType, Coords>,
                                     coord: Cartesian2DCoordinate)
                                     -> bool
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    visited.contains(coord.row_major_index(grid.row_length()))
}

#[inline]
fn mark_visited<GridIndexType, Coords>(visited: &mut BitSet,
                                       grid: &Grid<GridIndexType, Coords>,
                                       coord: Cartesian2DCoordinate)
    where GridIndexType: IndexType,
          Coords: GridCoordinates
{
    visited.insert(coord.row_major_index(grid.row_length()));
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::grids::{large_cylinder_grid, masked_rect_grid, mask_for_dimensions,
                       medium_rect_grid, MediumRectangularGrid};
    use crate::pathing::Distances;
    use crate::units::{ColumnLength, RowLength};

    fn rect_grid(w: usize, h: usize) -> MediumRectangularGrid {
        medium_rect_grid(RowLength(w), ColumnLength(h)).expect("grid too large")
    }

    fn rng(seed: u64) -> XorShiftRng {
        XorShiftRng::seed_from_u64(seed)
    }

    /// A perfect maze is a spanning tree of the active cells: exactly
    /// active-1 links and every active cell reachable from the first.
    fn assert_spanning_tree<GridIndexType, Coords>(grid: &Grid<GridIndexType, Coords>)
        where GridIndexType: IndexType,
              Coords: GridCoordinates
    {
        let active = grid.active_size();
        assert_eq!(grid.links_count(),
                   active - 1,
                   "expected a spanning tree's link count");

        let start = grid.iter().next().expect("grid has at least one active cell");
        let distances = Distances::<u32>::new(grid, start).expect("start is a valid cell");
        assert_eq!(distances.distances().len(),
                   active,
                   "expected every active cell reachable");
    }

    #[test]
    fn binary_tree_makes_a_spanning_tree() {
        let mut g = rect_grid(12, 7);
        binary_tree(&mut g, &mut rng(1));
        assert_spanning_tree(&g);
    }

    #[test]
    fn binary_tree_on_2x2_gives_exactly_three_links() {
        let mut g = rect_grid(2, 2);
        binary_tree(&mut g, &mut rng(2));
        assert_eq!(g.links_count(), 3);
        assert_spanning_tree(&g);
    }

    #[test]
    fn sidewinder_makes_a_spanning_tree() {
        let mut g = rect_grid(12, 7);
        sidewinder(&mut g, &mut rng(3));
        assert_spanning_tree(&g);
        // The top row of a sidewinder maze is one eastern corridor.
        for x in 0..11 {
            assert!(g.is_linked(Cartesian2DCoordinate::new(x, 0),
                                Cartesian2DCoordinate::new(x + 1, 0)));
        }
    }

    #[test]
    fn aldous_broder_at_full_completion_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        aldous_broder(&mut g, 1.0, &mut rng(4));
        assert_spanning_tree(&g);
    }

    #[test]
    fn aldous_broder_completion_is_clamped() {
        let mut g = rect_grid(5, 5);
        aldous_broder(&mut g, 7.5, &mut rng(5));
        assert_spanning_tree(&g);

        let mut g2 = rect_grid(5, 5);
        aldous_broder(&mut g2, -1.0, &mut rng(5));
        assert_eq!(g2.links_count(), 0);
    }

    #[test]
    fn partial_aldous_broder_visits_a_fraction_of_the_grid() {
        let mut g = rect_grid(10, 10);
        aldous_broder(&mut g, 0.5, &mut rng(6));
        // 50 cells visited means 49 links carved.
        assert_eq!(g.links_count(), 49);
    }

    #[test]
    fn wilson_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        wilson(&mut g, &mut rng(7));
        assert_spanning_tree(&g);
    }

    #[test]
    fn hunt_and_kill_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        hunt_and_kill(&mut g, None, &mut rng(8));
        assert_spanning_tree(&g);
    }

    #[test]
    fn hunt_and_kill_accepts_a_start_cell() {
        let mut g = rect_grid(5, 5);
        hunt_and_kill(&mut g, Some(Cartesian2DCoordinate::new(2, 2)), &mut rng(9));
        assert_spanning_tree(&g);
    }

    #[test]
    fn recursive_backtracker_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        recursive_backtracker(&mut g, None, &mut rng(10));
        assert_spanning_tree(&g);
    }

    #[test]
    fn recursive_backtracker_accepts_a_start_cell() {
        let mut g = rect_grid(5, 5);
        recursive_backtracker(&mut g, Some(Cartesian2DCoordinate::new(4, 0)), &mut rng(33));
        assert_spanning_tree(&g);
    }

    #[test]
    fn kruskal_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        kruskal(&mut g, &mut rng(11));
        assert_spanning_tree(&g);
    }

    #[test]
    fn growing_tree_makes_a_spanning_tree_for_every_selector() {
        for (i, selector) in [GrowingTreeSelector::Random,
                              GrowingTreeSelector::MostRecent,
                              GrowingTreeSelector::Oldest,
                              GrowingTreeSelector::Median,
                              GrowingTreeSelector::StickyRandom]
            .iter()
            .enumerate() {
            let mut g = rect_grid(8, 8);
            growing_tree(&mut g, *selector, &mut rng(12 + i as u64));
            assert_spanning_tree(&g);
        }
    }

    #[test]
    fn simplified_prims_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        simplified_prims(&mut g, None, &mut rng(20));
        assert_spanning_tree(&g);
    }

    #[test]
    fn weighted_prims_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        weighted_prims(&mut g, None, &mut rng(21));
        assert_spanning_tree(&g);
    }

    #[test]
    fn three_set_prims_makes_a_spanning_tree() {
        let mut g = rect_grid(9, 9);
        three_set_prims(&mut g, None, &mut rng(22));
        assert_spanning_tree(&g);
    }

    #[test]
    fn randomized_prims_is_unsupported() {
        let mut g = rect_grid(3, 3);
        let result = randomized_prims(&mut g, &mut rng(23));
        assert!(result.is_err());
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn ellers_makes_a_spanning_tree() {
        let mut g = rect_grid(11, 6);
        ellers(&mut g, &mut rng(24));
        assert_spanning_tree(&g);
    }

    #[test]
    fn recursive_division_connects_every_cell() {
        let mut g = rect_grid(9, 9);
        recursive_division(&mut g, &mut rng(25));
        let start = Cartesian2DCoordinate::new(0, 0);
        let distances = Distances::<u32>::new(&g, start).unwrap();
        assert_eq!(distances.distances().len(), g.size());
    }

    #[test]
    fn braid_reduces_dead_ends() {
        let mut g = rect_grid(10, 10);
        recursive_backtracker(&mut g, None, &mut rng(26));
        let dead_ends_before = g.dead_ends().len();
        assert!(dead_ends_before > 0);

        braid(&mut g, 1.0, &mut rng(27));
        let dead_ends_after = g.dead_ends().len();
        assert!(dead_ends_after < dead_ends_before);
    }

    #[test]
    fn braid_with_zero_fraction_changes_nothing() {
        let mut g = rect_grid(10, 10);
        recursive_backtracker(&mut g, None, &mut rng(28));
        let links_before: Vec<_> = g.iter_links().sorted().collect();

        braid(&mut g, 0.0, &mut rng(29));
        let links_after: Vec<_> = g.iter_links().sorted().collect();
        assert_eq!(links_before, links_after);
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let run = |seed: u64| -> Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)> {
            let mut g = rect_grid(10, 10);
            recursive_backtracker(&mut g, None, &mut rng(seed));
            g.iter_links().sorted().collect()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn walk_based_generators_respect_masks() {
        let mut mask = mask_for_dimensions(RowLength(6), ColumnLength(6));
        mask.hide(Cartesian2DCoordinate::new(0, 0));
        mask.hide(Cartesian2DCoordinate::new(3, 3));
        mask.hide(Cartesian2DCoordinate::new(5, 5));
        let mut g = masked_rect_grid(mask).unwrap();

        recursive_backtracker(&mut g, None, &mut rng(30));
        assert_spanning_tree(&g);
        assert!(g.links(Cartesian2DCoordinate::new(3, 3)).is_none());
    }

    /// A 5x1 corridor with the middle cell hidden, leaving two separate
    /// two-cell regions.
    fn split_corridor_grid() -> crate::grids::LargeRectangularGrid {
        let mut mask = mask_for_dimensions(RowLength(5), ColumnLength(1));
        mask.hide(Cartesian2DCoordinate::new(2, 0));
        masked_rect_grid(mask).unwrap()
    }

    #[test]
    fn wilson_carves_one_region_of_a_split_grid() {
        let mut g = split_corridor_grid();
        wilson(&mut g, &mut rng(60));

        // One spanning-tree link inside whichever region held the first cell,
        // nothing in the other region.
        assert_eq!(g.links_count(), 1);
        let left_linked = g.is_neighbour_linked(Cartesian2DCoordinate::new(0, 0),
                                                CompassPrimary::East);
        let right_linked = g.is_neighbour_linked(Cartesian2DCoordinate::new(3, 0),
                                                 CompassPrimary::East);
        assert!(left_linked != right_linked);
    }

    #[test]
    fn aldous_broder_carves_one_region_of_a_split_grid() {
        let mut g = split_corridor_grid();
        aldous_broder(&mut g, 1.0, &mut rng(61));

        assert_eq!(g.links_count(), 1);
        let left_linked = g.is_neighbour_linked(Cartesian2DCoordinate::new(0, 0),
                                                CompassPrimary::East);
        let right_linked = g.is_neighbour_linked(Cartesian2DCoordinate::new(3, 0),
                                                 CompassPrimary::East);
        assert!(left_linked != right_linked);
    }

    #[test]
    fn binary_tree_handles_a_single_column_cylinder() {
        let mut g = large_cylinder_grid(RowLength(1), ColumnLength(3)).unwrap();
        binary_tree(&mut g, &mut rng(62));
        assert_spanning_tree(&g);
    }

    #[test]
    fn generators_handle_a_single_cell_grid() {
        let mut seed = 31;
        let mut check = |generate: &dyn Fn(&mut MediumRectangularGrid, &mut XorShiftRng)| {
            let mut g = rect_grid(1, 1);
            generate(&mut g, &mut rng(seed));
            seed += 1;
            assert_eq!(g.links_count(), 0);
        };
        check(&|g, r| binary_tree(g, r));
        check(&|g, r| sidewinder(g, r));
        check(&|g, r| aldous_broder(g, 1.0, r));
        check(&|g, r| wilson(g, r));
        check(&|g, r| hunt_and_kill(g, None, r));
        check(&|g, r| recursive_backtracker(g, None, r));
        check(&|g, r| kruskal(g, r));
        check(&|g, r| simplified_prims(g, None, r));
        check(&|g, r| weighted_prims(g, None, r));
        check(&|g, r| three_set_prims(g, None, r));
        check(&|g, r| ellers(g, r));
        check(&|g, r| recursive_division(g, r));
        check(&|g, r| braid(g, 1.0, r));
    }

    #[test]
    fn wilson_carves_a_cylinder_grid() {
        let mut g = large_cylinder_grid(RowLength(6), ColumnLength(4)).unwrap();
        wilson(&mut g, &mut rng(50));
        assert_spanning_tree(&g);
    }

    quickcheck! {
        fn prop_recursive_backtracker_spans_any_grid(width: u8, height: u8, seed: u64) -> TestResult {
            let (w, h) = ((width % 12) as usize, (height % 12) as usize);
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let mut g = medium_rect_grid(RowLength(w), ColumnLength(h)).unwrap();
            let mut r = XorShiftRng::seed_from_u64(seed);
            recursive_backtracker(&mut g, None, &mut r);

            let links_ok = g.links_count() == g.size() - 1;
            let start = Cartesian2DCoordinate::new(0, 0);
            let reach_ok = Distances::<u32>::new(&g, start)
                .map_or(false, |d| d.distances().len() == g.size());
            TestResult::from_bool(links_ok && reach_ok)
        }
    }
}
