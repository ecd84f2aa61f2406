use std::fmt;
use std::fmt::Display;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::{GridCoordinates, GridDisplay};
use crate::pathing::{CellWeights, Distances, MaxDistance};
use crate::utils::FnvHashSet;

/// Renders the cells on a path as ` . `, everything else blank.
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}

impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> PathDisplay {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

/// Marks a set of start points and end points, e.g. the two ends of the
/// longest path through a maze.
pub struct StartEndPointsDisplay {
    start_coordinates: Vec<Cartesian2DCoordinate>,
    end_coordinates: Vec<Cartesian2DCoordinate>,
}

impl StartEndPointsDisplay {
    pub fn new(starts: Vec<Cartesian2DCoordinate>,
               ends: Vec<Cartesian2DCoordinate>)
               -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}

impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.start_coordinates.contains(&coord) {
            String::from(" S ")
        } else if self.end_coordinates.contains(&coord) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

impl<MaxDistanceT: MaxDistance> GridDisplay for Distances<MaxDistanceT> {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        match self.distance_from_start_to(coord) {
            // {:0>3} pads the distance with zeroes on the left to a width of 3,
            // which unlike {:03} works for any Display type.
            Some(d) => format!("{:0>3}", d),
            None => String::from("   "),
        }
    }
}

impl<MaxDistanceT: MaxDistance> GridDisplay for CellWeights<MaxDistanceT> {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        format!("{:0>3}", self.weight(coord))
    }
}

impl<GridIndexType: IndexType, Coords: GridCoordinates> Display for Grid<GridIndexType, Coords> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_H: &str = "---";
        const PASSAGE_H: &str = "   ";
        const WALL_V: &str = "|";
        const PASSAGE_V: &str = " ";
        const CORNER: &str = "+";
        const DEFAULT_BODY: &str = "   ";

        let columns_count = self.columns().0;

        let mut output = String::with_capacity((columns_count * 4 + 2) * (self.rows().0 * 2 + 2));

        // Top border
        output.push_str(CORNER);
        for _ in 0..columns_count {
            output.push_str(WALL_H);
            output.push_str(CORNER);
        }
        output.push('\n');

        for row in self.iter_row() {
            let mut body_line = String::new();
            let mut floor_line = String::from(CORNER);

            for (column_index, &cell) in row.iter().enumerate() {
                if column_index == 0 {
                    // Only a wrapping grid can give the leftmost cell a
                    // western passage.
                    let west_open = self.is_neighbour_linked(cell, CompassPrimary::West);
                    body_line.push_str(if west_open { PASSAGE_V } else { WALL_V });
                }

                let body = match self.grid_display() {
                    Some(display) => display.render_cell_body(cell),
                    None => String::from(DEFAULT_BODY),
                };
                body_line.push_str(&body);
                let east_open = self.is_neighbour_linked(cell, CompassPrimary::East);
                body_line.push_str(if east_open { PASSAGE_V } else { WALL_V });

                let south_open = self.is_neighbour_linked(cell, CompassPrimary::South);
                floor_line.push_str(if south_open { PASSAGE_H } else { WALL_H });
                floor_line.push_str(CORNER);
            }

            output.push_str(&body_line);
            output.push('\n');
            output.push_str(&floor_line);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
