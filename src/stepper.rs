use core::fmt;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{info, warn};

use crate::grid::{CellRole, Highlight, SearchGrid};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Distance estimate used by [Algorithm::AStar]. Both variants are
/// admissible on a 4-connected unit-cost grid: Manhattan is exact for an
/// unobstructed board and the truncated Euclidean distance never exceeds
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
}

impl Heuristic {
    pub fn estimate(&self, a: Point, b: Point) -> i32 {
        let delta_x = (a.x - b.x).abs();
        let delta_y = (a.y - b.y).abs();
        match self {
            Heuristic::Manhattan => delta_x + delta_y,
            Heuristic::Euclidean => {
                // Truncated toward zero to stay on integer distances.
                ((delta_x as f64).powi(2) + (delta_y as f64).powi(2)).sqrt() as i32
            }
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Heuristic::Manhattan => write!(f, "Manhattan"),
            Heuristic::Euclidean => write!(f, "Euclidean"),
        }
    }
}

/// Search mode for a run: uniform-cost expansion or heuristic-guided
/// expansion. Both run through the same stepping routine; the mode only
/// decides the frontier priority key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Dijkstra,
    AStar(Heuristic),
}

impl Algorithm {
    /// The priority-key contribution beyond the known distance: zero for
    /// uniform-cost search, the heuristic estimate towards `goal` for A*.
    fn bias(&self, point: Point, goal: Point) -> i32 {
        match self {
            Algorithm::Dijkstra => 0,
            Algorithm::AStar(heuristic) => heuristic.estimate(point, goal),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Dijkstra => write!(f, "Dijkstra"),
            Algorithm::AStar(heuristic) => write!(f, "A* ({})", heuristic),
        }
    }
}

/// Rejected [StepPathfinder::start] configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidConfiguration {
    StartEqualsGoal(Point),
    OutOfBounds(Point),
    Blocked(Point),
}

impl fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidConfiguration::StartEqualsGoal(point) => {
                write!(f, "start and goal are both {}", point)
            }
            InvalidConfiguration::OutOfBounds(point) => {
                write!(f, "{} lies outside the grid", point)
            }
            InvalidConfiguration::Blocked(point) => {
                write!(f, "{} is a wall cell", point)
            }
        }
    }
}

impl std::error::Error for InvalidConfiguration {}

/// Result of a single [StepPathfinder::step] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// One cell was closed and its neighbours relaxed.
    Expanded(Point),
    /// The goal was popped from the frontier; a path exists.
    Found,
    /// The frontier ran dry; no path exists.
    Exhausted,
}

/// Terminal state of a run. Stepping a terminated run keeps returning the
/// matching [StepResult] without touching any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found,
    Exhausted,
}

impl From<SearchOutcome> for StepResult {
    fn from(outcome: SearchOutcome) -> StepResult {
        match outcome {
            SearchOutcome::Found => StepResult::Found,
            SearchOutcome::Exhausted => StepResult::Exhausted,
        }
    }
}

/// Frontier entry ordered for a min-heap on the estimated cost. Ties are
/// broken in favour of the larger known cost and then the
/// earliest-discovered cell, which together with the fixed neighbour probe
/// order makes every run fully deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    estimated_cost: i32,
    cost: i32,
    index: usize,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => match self.cost.cmp(&other.cost) {
                Ordering::Equal => other.index.cmp(&self.index),
                ordering => ordering,
            },
            ordering => ordering,
        }
    }
}

/// Per-cell search record: best-known distance from the start, the index
/// of the predecessor that produced it, and whether the cell has been
/// expanded. Absence from the node map means the distance is still
/// infinite.
#[derive(Clone, Copy, Debug)]
struct NodeState {
    parent: usize,
    distance: i32,
    closed: bool,
}

/// [StepPathfinder] runs one shortest-path search to completion across
/// repeated discrete [step](Self::step) calls, exposing the intermediate
/// state after every call so a host render loop can repaint the board as
/// the search floods it.
///
/// The host owns the [SearchGrid] and lends it to the engine per call, so
/// the board stays freely readable between ticks. A run is set up with
/// [start](Self::start), advanced one frontier expansion at a time with
/// [step](Self::step), and read back with [closed_cells](Self::closed_cells)
/// and [reconstruct_path](Self::reconstruct_path).
#[derive(Clone, Debug)]
pub struct StepPathfinder {
    algorithm: Algorithm,
    frontier: BinaryHeap<FrontierEntry>,
    nodes: FxIndexMap<Point, NodeState>,
    closed_order: Vec<Point>,
    start: Option<Point>,
    goal: Option<Point>,
    outcome: Option<SearchOutcome>,
}

impl Default for StepPathfinder {
    fn default() -> StepPathfinder {
        StepPathfinder::new()
    }
}

impl StepPathfinder {
    /// Creates an idle engine; [start](Self::start) picks the algorithm.
    pub fn new() -> StepPathfinder {
        StepPathfinder {
            algorithm: Algorithm::Dijkstra,
            frontier: BinaryHeap::new(),
            nodes: FxIndexMap::default(),
            closed_order: Vec::new(),
            start: None,
            goal: None,
            outcome: None,
        }
    }

    /// Algorithm of the current run.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Discards any in-flight run and seeds a new one from `start` to
    /// `goal`. Fails fast instead of stepping into undefined territory:
    /// both endpoints must be distinct, in bounds and not walls. On an
    /// error the previous run state is left untouched.
    pub fn start(
        &mut self,
        grid: &SearchGrid,
        start: Point,
        goal: Point,
        algorithm: Algorithm,
    ) -> Result<(), InvalidConfiguration> {
        if start == goal {
            return Err(InvalidConfiguration::StartEqualsGoal(start));
        }
        for point in [start, goal] {
            if !grid.in_bounds(point.x, point.y) {
                return Err(InvalidConfiguration::OutOfBounds(point));
            }
            if grid.role(point) == CellRole::Wall {
                return Err(InvalidConfiguration::Blocked(point));
            }
        }
        self.algorithm = algorithm;
        self.frontier.clear();
        self.nodes.clear();
        self.closed_order.clear();
        self.outcome = None;
        self.start = Some(start);
        self.goal = Some(goal);
        self.nodes.insert(
            start,
            NodeState {
                parent: usize::MAX,
                distance: 0,
                closed: false,
            },
        );
        self.frontier.push(FrontierEntry {
            estimated_cost: algorithm.bias(start, goal),
            cost: 0,
            index: 0,
        });
        info!("starting {} run from {} to {}", algorithm, start, goal);
        Ok(())
    }

    /// Performs exactly one frontier expansion: pops the minimum-priority
    /// cell, terminates if it is the goal, otherwise closes it, writes its
    /// [Highlight::Visited] marking and relaxes its unit-cost neighbours.
    /// Entries superseded by a later relaxation are discarded without
    /// counting as the expansion. Stepping a terminated (or never started)
    /// run is a no-op that reports the terminal result again.
    pub fn step(&mut self, grid: &mut SearchGrid) -> StepResult {
        if let Some(outcome) = self.outcome {
            return outcome.into();
        }
        let goal = match self.goal {
            Some(goal) => goal,
            None => {
                self.outcome = Some(SearchOutcome::Exhausted);
                return StepResult::Exhausted;
            }
        };
        loop {
            let candidate = match self.frontier.pop() {
                Some(candidate) => candidate,
                None => {
                    warn!(
                        "frontier exhausted after {} expansions, {} cannot be reached",
                        self.closed_order.len(),
                        goal
                    );
                    self.outcome = Some(SearchOutcome::Exhausted);
                    return StepResult::Exhausted;
                }
            };
            let (&current, state) = self.nodes.get_index(candidate.index).unwrap();
            // Cells may sit in the heap several times if a better way to
            // reach them was found later. Only the best entry expands.
            if state.closed || candidate.cost > state.distance {
                continue;
            }
            let current_distance = state.distance;
            if current == goal {
                info!(
                    "{} reached after {} expansions",
                    goal,
                    self.closed_order.len()
                );
                self.outcome = Some(SearchOutcome::Found);
                return StepResult::Found;
            }
            let (_, state) = self.nodes.get_index_mut(candidate.index).unwrap();
            state.closed = true;
            self.closed_order.push(current);
            if grid.role(current) == CellRole::Passable {
                grid.set_highlight(current, Highlight::Visited);
            }

            let tentative = current_distance + 1;
            for neighbour in grid.neighbours(current) {
                let h;
                let index;
                match self.nodes.entry(neighbour) {
                    Vacant(entry) => {
                        h = self.algorithm.bias(*entry.key(), goal);
                        index = entry.index();
                        entry.insert(NodeState {
                            parent: candidate.index,
                            distance: tentative,
                            closed: false,
                        });
                    }
                    Occupied(mut entry) => {
                        if entry.get().closed || entry.get().distance <= tentative {
                            continue;
                        }
                        h = self.algorithm.bias(*entry.key(), goal);
                        index = entry.index();
                        entry.insert(NodeState {
                            parent: candidate.index,
                            distance: tentative,
                            closed: false,
                        });
                    }
                }
                self.frontier.push(FrontierEntry {
                    estimated_cost: tentative + h,
                    cost: tentative,
                    index,
                });
            }
            return StepResult::Expanded(current);
        }
    }

    /// Endpoints of the current run, [None] while idle.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        self.start.zip(self.goal)
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Terminal state of the current run, [None] while still running.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.outcome
    }

    /// Cells in the order they were closed, the repaint surface for the
    /// host: the last element is the cell closed by the latest
    /// [step](Self::step).
    pub fn closed_cells(&self) -> &[Point] {
        &self.closed_order
    }

    /// Best-known distance from the start, [None] for undiscovered cells.
    /// Exact for closed cells.
    pub fn distance(&self, point: &Point) -> Option<i32> {
        self.nodes.get(point).map(|state| state.distance)
    }

    /// Walks the predecessor chain from the goal back to the start and
    /// returns it in traversal order, start first and goal last. An empty
    /// path means the goal was never discovered: no run has been started
    /// yet, or no path exists. Complete once the run terminated with
    /// [SearchOutcome::Found].
    pub fn reconstruct_path(&self) -> Vec<Point> {
        let goal_index = match self.goal.and_then(|goal| self.nodes.get_index_of(&goal)) {
            Some(index) => index,
            None => return Vec::new(),
        };
        let mut path: Vec<Point> = itertools::unfold(goal_index, |index| {
            self.nodes.get_index(*index).map(|(point, state)| {
                *index = state.parent;
                *point
            })
        })
        .collect();
        path.reverse();
        path
    }
}
