use grid_util::point::Point;
use stepwise_pathfinding::{Algorithm, CellRole, Heuristic, SearchGrid, StepPathfinder};

// Runs Dijkstra and A* on the same 9x5 board split by a wall with a single
// gap, and prints both flooded boards. The visited markings (*) show how
// much less of the board the heuristic-guided search has to touch before
// committing to the same detour (o).

fn build_grid() -> SearchGrid {
    let mut grid = SearchGrid::new(9, 5);
    for y in 0..5 {
        if y != 3 {
            grid.set_role(Point::new(4, y), CellRole::Wall);
        }
    }
    grid.set_role(Point::new(0, 2), CellRole::Start);
    grid.set_role(Point::new(8, 2), CellRole::End);
    grid.generate_components();
    grid
}

fn main() {
    let start = Point::new(0, 2);
    let goal = Point::new(8, 2);
    for algorithm in [Algorithm::Dijkstra, Algorithm::AStar(Heuristic::Euclidean)] {
        let mut grid = build_grid();
        let mut engine = StepPathfinder::new();
        engine.start(&grid, start, goal, algorithm).unwrap();
        while !engine.is_finished() {
            engine.step(&mut grid);
        }
        let path = engine.reconstruct_path();
        grid.mark_path(&path);
        println!(
            "{}: {} cells closed, path of {} cells",
            algorithm,
            engine.closed_cells().len(),
            path.len()
        );
        println!("{}", grid);
    }
}
