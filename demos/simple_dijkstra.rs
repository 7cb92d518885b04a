use grid_util::point::Point;
use stepwise_pathfinding::{Algorithm, CellRole, SearchGrid, StepPathfinder};

// In this demo a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// The engine is stepped one expansion at a time and the board is printed
// after every step, the way a render loop would repaint it.

fn main() {
    let mut grid = SearchGrid::new(3, 3);
    grid.set_role(Point::new(1, 1), CellRole::Wall);
    grid.set_role(Point::new(0, 0), CellRole::Start);
    grid.set_role(Point::new(2, 2), CellRole::End);
    grid.generate_components();

    let start = Point::new(0, 0);
    let goal = Point::new(2, 2);
    let mut engine = StepPathfinder::new();
    engine.start(&grid, start, goal, Algorithm::Dijkstra).unwrap();

    let mut tick = 0;
    while !engine.is_finished() {
        let result = engine.step(&mut grid);
        tick += 1;
        println!("tick {tick}: {result:?}");
        println!("{}", grid);
    }

    let path = engine.reconstruct_path();
    grid.mark_path(&path);
    println!("final board:");
    println!("{}", grid);
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
}
