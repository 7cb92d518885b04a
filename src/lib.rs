//! # stepwise_pathfinding
//!
//! Incremental [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
//! and [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding on a
//! 4-connected unit-cost grid. The engine keeps its frontier, distances and
//! predecessor links alive between calls so a host render loop can drive the
//! search one expansion per tick and paint the intermediate state, instead of
//! receiving a finished path in one call.
//!
//! The host owns a [SearchGrid] of cells with logical roles (start, end,
//! wall, passable) and purely visual highlights (visited, path); the
//! [StepPathfinder] reads roles, writes highlights, and reports every closed
//! cell as it goes. Connected components are pre-computed on the grid so
//! hosts can answer reachability questions without running a search.
//!
//! ```
//! use grid_util::point::Point;
//! use stepwise_pathfinding::{Algorithm, CellRole, Heuristic, SearchGrid, StepPathfinder};
//!
//! let mut grid = SearchGrid::new(3, 3);
//! grid.set_role(Point::new(1, 1), CellRole::Wall);
//!
//! let mut engine = StepPathfinder::new();
//! engine
//!     .start(&grid, Point::new(0, 0), Point::new(2, 2), Algorithm::AStar(Heuristic::Manhattan))
//!     .unwrap();
//! while !engine.is_finished() {
//!     engine.step(&mut grid);
//! }
//! let path = engine.reconstruct_path();
//! assert_eq!(path.len(), 5);
//! ```

pub mod grid;
pub mod stepper;

pub use grid::{Cell, CellRole, Highlight, SearchGrid};
pub use stepper::{
    Algorithm, Heuristic, InvalidConfiguration, SearchOutcome, StepPathfinder, StepResult,
};
