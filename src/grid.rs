use core::fmt;

use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;

/// Logical role of a cell, the only cell attribute the search engine
/// consults. At most one cell should be [CellRole::Start] and one
/// [CellRole::End] at a time; the editing host enforces this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    Passable,
    Start,
    End,
    Wall,
}

/// Visual marking of a cell. Written by the search engine (visited cells)
/// and the host (path cells), read only by whatever renders the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Visited,
    Path,
}

/// A single grid cell: fixed position plus its current role and highlight.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub position: Point,
    pub role: CellRole,
    pub highlight: Highlight,
}

/// [SearchGrid] owns the cells of a fixed-size rectangular board, stored in
/// a flat [Vec] indexed by `y * width + x`, and answers the 4-connected
/// neighbour queries the search engine runs on. It additionally maintains
/// connected components over the open cells in a [UnionFind] structure so
/// that hosts and tests can ask reachability questions without running a
/// search.
#[derive(Clone, Debug)]
pub struct SearchGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

/// Neighbour offsets in the fixed probe order: left, right, up, down. The
/// order is part of the contract since it decides which equally short path
/// a run discovers.
const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl SearchGrid {
    /// Creates an all-passable grid with every cell in one component.
    pub fn new(width: usize, height: usize) -> SearchGrid {
        let cells = (0..width * height)
            .map(|ix| Cell {
                position: Point::new((ix % width) as i32, (ix / width) as i32),
                role: CellRole::Passable,
                highlight: Highlight::None,
            })
            .collect();
        let mut grid = SearchGrid {
            width,
            height,
            cells,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get_ix(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get_ix_point(&self, point: &Point) -> usize {
        self.get_ix(point.x as usize, point.y as usize)
    }

    /// The cell at `point`, which must be in bounds.
    pub fn cell(&self, point: Point) -> &Cell {
        &self.cells[self.get_ix_point(&point)]
    }

    pub fn role(&self, point: Point) -> CellRole {
        self.cells[self.get_ix_point(&point)].role
    }

    /// Updates a cell's role. Newly placed walls flag the components as
    /// dirty; opened cells are joined to their open neighbours so the
    /// component structure stays usable without a full rebuild.
    pub fn set_role(&mut self, point: Point, role: CellRole) {
        let ix = self.get_ix_point(&point);
        if role == CellRole::Wall {
            if self.cells[ix].role != CellRole::Wall {
                self.components_dirty = true;
            }
        } else {
            for neighbour in self.neighbours(point) {
                self.components.union(ix, self.get_ix_point(&neighbour));
            }
        }
        self.cells[ix].role = role;
    }

    pub fn highlight(&self, point: Point) -> Highlight {
        self.cells[self.get_ix_point(&point)].highlight
    }

    pub fn set_highlight(&mut self, point: Point, highlight: Highlight) {
        let ix = self.get_ix_point(&point);
        self.cells[ix].highlight = highlight;
    }

    /// Wipes the visited/path markings of a previous run.
    pub fn clear_highlights(&mut self) {
        for cell in &mut self.cells {
            cell.highlight = Highlight::None;
        }
    }

    /// Applies [Highlight::Path] along `path`, leaving start and end cells
    /// untouched so they stay visually distinct.
    pub fn mark_path(&mut self, path: &[Point]) {
        for point in path {
            let ix = self.get_ix_point(point);
            if self.cells[ix].role == CellRole::Passable {
                self.cells[ix].highlight = Highlight::Path;
            }
        }
    }

    /// First cell carrying `role`, scanning in index order.
    pub fn find_role(&self, role: CellRole) -> Option<Point> {
        self.cells
            .iter()
            .find(|cell| cell.role == role)
            .map(|cell| cell.position)
    }

    /// Render read surface: all cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The up-to-4 in-bounds, non-wall neighbours of `point` in the fixed
    /// left, right, up, down order. Out-of-range probes simply produce no
    /// neighbour.
    pub fn neighbours(&self, point: Point) -> Vec<Point> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.in_bounds(p.x, p.y) && self.role(*p) != CellRole::Wall)
            .collect::<Vec<Point>>()
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.get_ix_point(point))
    }

    /// Checks if start and goal are on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.in_bounds(start.x, start.y) && self.in_bounds(goal.x, goal.y) {
            let start_ix = self.get_ix_point(start);
            let goal_ix = self.get_ix_point(goal);
            if self.components.equiv(start_ix, goal_ix) {
                false
            } else {
                info!("{} and {} are not equivalent components", start_ix, goal_ix);
                true
            }
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open grid
    /// neighbours to the same components. Only the right and down
    /// neighbours need to be visited to cover every 4-connected edge once.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let point = Point::new(x, y);
                if self.role(point) == CellRole::Wall {
                    continue;
                }
                let parent_ix = self.get_ix_point(&point);
                let neighbours = [Point::new(x + 1, y), Point::new(x, y + 1)]
                    .into_iter()
                    .filter(|p| self.in_bounds(p.x, p.y) && self.role(*p) != CellRole::Wall)
                    .map(|p| self.get_ix_point(&p))
                    .collect::<Vec<usize>>();
                for ix in neighbours {
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = &self.cells[self.get_ix(x, y)];
                let symbol = match cell.role {
                    CellRole::Wall => '#',
                    CellRole::Start => 'S',
                    CellRole::End => 'E',
                    CellRole::Passable => match cell.highlight {
                        Highlight::Path => 'o',
                        Highlight::Visited => '*',
                        Highlight::None => '.',
                    },
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbour_order_is_left_right_up_down() {
        let grid = SearchGrid::new(3, 3);
        let neighbours = grid.neighbours(Point::new(1, 1));
        assert_eq!(
            neighbours,
            vec![
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(1, 0),
                Point::new(1, 2)
            ]
        );
    }

    #[test]
    fn corner_has_two_neighbours() {
        let grid = SearchGrid::new(3, 3);
        let neighbours = grid.neighbours(Point::new(0, 0));
        assert_eq!(neighbours, vec![Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn walls_are_filtered_from_neighbours() {
        let mut grid = SearchGrid::new(3, 3);
        grid.set_role(Point::new(0, 1), CellRole::Wall);
        grid.set_role(Point::new(1, 0), CellRole::Wall);
        let neighbours = grid.neighbours(Point::new(1, 1));
        assert_eq!(neighbours, vec![Point::new(2, 1), Point::new(1, 2)]);
    }

    #[test]
    fn test_component_generation() {
        let mut grid = SearchGrid::new(3, 4);
        for x in 0..3 {
            grid.set_role(Point::new(x, 1), CellRole::Wall);
        }
        grid.generate_components();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(0, 2)));
        assert!(!grid.unreachable(&Point::new(0, 2), &Point::new(2, 3)));
    }

    #[test]
    fn opening_a_wall_reconnects_components() {
        let mut grid = SearchGrid::new(3, 3);
        for x in 0..3 {
            grid.set_role(Point::new(x, 1), CellRole::Wall);
        }
        grid.update();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(0, 2)));
        grid.set_role(Point::new(1, 1), CellRole::Passable);
        assert!(!grid.unreachable(&Point::new(0, 0), &Point::new(0, 2)));
    }

    #[test]
    fn out_of_bounds_is_unreachable() {
        let grid = SearchGrid::new(2, 2);
        assert!(grid.unreachable(&Point::new(-1, 0), &Point::new(1, 1)));
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn display_renders_roles_and_highlights() {
        let mut grid = SearchGrid::new(3, 2);
        grid.set_role(Point::new(0, 0), CellRole::Start);
        grid.set_role(Point::new(2, 1), CellRole::End);
        grid.set_role(Point::new(1, 0), CellRole::Wall);
        grid.set_highlight(Point::new(2, 0), Highlight::Visited);
        grid.set_highlight(Point::new(1, 1), Highlight::Path);
        assert_eq!(format!("{}", grid), "S#*\n.oE\n");
    }

    #[test]
    fn clear_highlights_resets_markings() {
        let mut grid = SearchGrid::new(2, 1);
        grid.set_highlight(Point::new(0, 0), Highlight::Visited);
        grid.set_highlight(Point::new(1, 0), Highlight::Path);
        grid.clear_highlights();
        assert_eq!(grid.highlight(Point::new(0, 0)), Highlight::None);
        assert_eq!(grid.highlight(Point::new(1, 0)), Highlight::None);
    }

    #[test]
    fn mark_path_skips_endpoint_roles() {
        let mut grid = SearchGrid::new(3, 1);
        grid.set_role(Point::new(0, 0), CellRole::Start);
        grid.set_role(Point::new(2, 0), CellRole::End);
        grid.mark_path(&[Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]);
        assert_eq!(grid.highlight(Point::new(0, 0)), Highlight::None);
        assert_eq!(grid.highlight(Point::new(1, 0)), Highlight::Path);
        assert_eq!(grid.highlight(Point::new(2, 0)), Highlight::None);
    }

    #[test]
    fn find_role_scans_in_index_order() {
        let mut grid = SearchGrid::new(2, 2);
        assert_eq!(grid.find_role(CellRole::Start), None);
        grid.set_role(Point::new(1, 1), CellRole::Start);
        assert_eq!(grid.find_role(CellRole::Start), Some(Point::new(1, 1)));
    }
}
