use std::{
    cmp::Reverse,
    collections::{hash_map::Entry, BinaryHeap, HashMap},
};

use crate::{grid::RiskGrid, Direction, Position};

/// Bookkeeping of one discovered position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    distance_from_start: usize,
    total_estimate: usize,
    parent: Position,
}

impl SearchNode {
    fn new(distance_from_start: usize, total_estimate: usize, parent: Position) -> Self {
        Self {
            distance_from_start,
            total_estimate,
            parent,
        }
    }

    pub fn distance_from_start(&self) -> usize {
        self.distance_from_start
    }

    pub fn total_estimate(&self) -> usize {
        self.total_estimate
    }

    pub fn parent(&self) -> Position {
        self.parent
    }
}

// Entries are never updated in the heap; a cheaper path pushes a new entry and
// the outdated one is skipped when popped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    total_estimate: usize,
    distance_from_start: usize,
    pos: Position,
}

/// A* search of the lowest total risk between two positions.
///
/// Movement is restricted to the four axis directions and every risk is at
/// least 1, so the manhattan distance never overestimates the remaining risk
/// and never drops by more than the risk of one step. Under these conditions a
/// position popped from the frontier already has its lowest risk, and it's
/// never reopened. Allowing diagonal moves would break this.
pub struct AStarSearch<'a, G: RiskGrid> {
    grid: &'a G,
    start: Position,
    target: Position,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    discovered: HashMap<Position, SearchNode>,
    finalized: HashMap<Position, SearchNode>,
}

impl<'a, G: RiskGrid> AStarSearch<'a, G> {
    pub fn new(grid: &'a G, start: Position, target: Position) -> Self {
        Self {
            grid,
            start,
            target,
            frontier: BinaryHeap::new(),
            discovered: HashMap::new(),
            finalized: HashMap::new(),
        }
    }

    /// Run the search to the end, return the lowest total risk of entering
    /// every position on the path after `start`, or `None` if `target` can't
    /// be reached.
    pub fn run(&mut self) -> Option<usize> {
        self.frontier.clear();
        self.discovered.clear();
        self.finalized.clear();
        if !self.grid.contains(&self.start) || !self.grid.contains(&self.target) {
            log::debug!(
                "Start {} or target {} is outside of the {}x{} map.",
                self.start,
                self.target,
                self.grid.width(),
                self.grid.height()
            );
            return None;
        }

        self.discover(self.start, 0, self.start);
        let lowest_risk = self.expand_until_target();
        log::debug!(
            "Search from {} to {} finalized {} position(s), lowest total risk: {:?}.",
            self.start,
            self.target,
            self.finalized.len(),
            lowest_risk
        );

        lowest_risk
    }

    /// Bookkeeping of `pos` if its lowest risk was found in the last run.
    pub fn finalized(&self, pos: &Position) -> Option<&SearchNode> {
        self.finalized.get(pos)
    }

    pub fn finalized_n(&self) -> usize {
        self.finalized.len()
    }

    fn expand_until_target(&mut self) -> Option<usize> {
        let grid = self.grid;
        while let Some(Reverse(entry)) = self.frontier.pop() {
            let cur_pos = entry.pos;
            let cur_node = match self.discovered.entry(cur_pos) {
                Entry::Occupied(o)
                    if o.get().distance_from_start == entry.distance_from_start =>
                {
                    o.remove()
                }
                _ => continue,
            };

            self.finalized.insert(cur_pos, cur_node);
            if cur_pos == self.target {
                return Some(cur_node.distance_from_start);
            }

            for next_pos in Direction::all_dirs()
                .iter()
                .filter_map(|dir| cur_pos.neighbor(*dir))
                .filter(|pos| grid.contains(pos))
            {
                if self.finalized.contains_key(&next_pos) {
                    continue;
                }

                let Ok(risk) = grid.risk(&next_pos) else {
                    unreachable!("Neighbor {} is checked to be inside of the map.", next_pos);
                };
                self.discover(next_pos, cur_node.distance_from_start + risk, cur_pos);
            }
        }

        None
    }

    fn discover(&mut self, pos: Position, distance_from_start: usize, parent: Position) {
        let total_estimate = distance_from_start.saturating_add(pos.manhattan_distance(&self.target));
        let node = SearchNode::new(distance_from_start, total_estimate, parent);
        match self.discovered.entry(pos) {
            Entry::Occupied(mut o) => {
                if total_estimate >= o.get().total_estimate {
                    return;
                }

                log::trace!(
                    "Relax {} from {} to {} via {}.",
                    pos,
                    o.get().distance_from_start,
                    distance_from_start,
                    parent
                );
                o.insert(node);
            }
            Entry::Vacant(v) => {
                v.insert(node);
            }
        }

        self.frontier.push(Reverse(FrontierEntry {
            total_estimate,
            distance_from_start,
            pos,
        }));
    }
}

/// Lowest total risk of moving from `start` to `target` in `grid`, `None` if
/// there's no such path.
pub fn find_path<G: RiskGrid>(grid: &G, start: Position, target: Position) -> Option<usize> {
    AStarSearch::new(grid, start, target).run()
}
