//! The resumable [`SearchEngine`].

use std::collections::VecDeque;

use gridpath_core::Point;

use crate::distance::manhattan;
use crate::grid::{Label, SearchGrid, SpotState};

/// The traversal strategy, fixed for the duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Breadth-first: frontier consumed oldest-enqueued-first.
    Bfs,
    /// Depth-first: frontier consumed most-recently-enqueued-first.
    Dfs,
    /// Best-first (A* with the Manhattan heuristic): open-set member with
    /// the minimum f score expands next.
    BestFirst,
}

impl Algorithm {
    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::BestFirst => "a*",
        }
    }
}

/// Outcome of one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The search advanced; the given cell was processed (or consumed as a
    /// stale frontier entry).
    Advanced(Point),
    /// The end cell was reached and the path has been marked on the grid.
    Done(Point),
    /// The frontier was already empty: no path exists. Callers that check
    /// [`exhausted`](SearchEngine::exhausted) before stepping never see
    /// this.
    Exhausted,
}

/// Drives one search run over a [`SearchGrid`], one discrete step at a time.
///
/// The engine owns only the frontier bookkeeping; all per-cell search state
/// (visited marks, predecessors, scores) lives on the grid. A run begins
/// with [`start`](Self::start) and advances via [`step`](Self::step) until
/// it returns [`Step::Done`] or [`exhausted`](Self::exhausted) turns true.
#[derive(Debug)]
pub struct SearchEngine {
    algorithm: Algorithm,
    /// BFS/DFS frontier. Popped front for BFS, back for DFS.
    queue: VecDeque<usize>,
    /// Best-first open set, kept in insertion order so that equal-f ties
    /// resolve to the earliest-inserted member (linear scan, first minimum
    /// wins — deliberately not a priority queue, see crate docs).
    open: Vec<usize>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// Create an idle engine. [`exhausted`](Self::exhausted) is true until
    /// a run is started.
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::Bfs,
            queue: VecDeque::new(),
            open: Vec::new(),
            in_open: Vec::new(),
            closed: Vec::new(),
        }
    }

    /// The algorithm of the current (or last) run.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Begin a new run: reset the grid's transient state and seed the
    /// frontier with the start cell.
    pub fn start(&mut self, grid: &mut SearchGrid, algorithm: Algorithm) {
        self.algorithm = algorithm;
        grid.reset_scores();
        self.queue.clear();
        self.open.clear();
        self.in_open.clear();
        self.in_open.resize(grid.len(), false);
        self.closed.clear();
        self.closed.resize(grid.len(), false);
        if let Some(si) = grid.start_idx() {
            self.queue.push_back(si);
            self.open.push(si);
            self.in_open[si] = true;
        }
    }

    /// Whether the relevant frontier is empty. Once true mid-run, the run
    /// has ended with a "no path" outcome.
    pub fn exhausted(&self) -> bool {
        match self.algorithm {
            Algorithm::Bfs | Algorithm::Dfs => self.queue.is_empty(),
            Algorithm::BestFirst => self.open.is_empty(),
        }
    }

    /// Advance the search by exactly one step.
    pub fn step(&mut self, grid: &mut SearchGrid) -> Step {
        match self.algorithm {
            Algorithm::Bfs | Algorithm::Dfs => self.step_queue(grid),
            Algorithm::BestFirst => self.step_best_first(grid),
        }
    }

    /// Run the current search to completion. Returns whether the end was
    /// reached.
    pub fn run_to_end(&mut self, grid: &mut SearchGrid) -> bool {
        while !self.exhausted() {
            if let Step::Done(_) = self.step(grid) {
                return true;
            }
        }
        false
    }

    // -----------------------------------------------------------------------
    // Breadth-first / depth-first
    // -----------------------------------------------------------------------

    fn step_queue(&mut self, grid: &mut SearchGrid) -> Step {
        let popped = match self.algorithm {
            Algorithm::Bfs => self.queue.pop_front(),
            _ => self.queue.pop_back(),
        };
        let Some(ci) = popped else {
            return Step::Exhausted;
        };
        let cp = grid.point(ci);

        let spot = *grid.spot(ci);
        // Walls enter the frontier and stale entries are possible in
        // principle; both are consumed here with no expansion.
        if spot.state != SpotState::Unvisited || spot.label == Label::Wall {
            return Step::Advanced(cp);
        }

        if spot.label == Label::End {
            grid.mark_chain(ci, SpotState::Path);
            return Step::Done(cp);
        }

        grid.spot_mut(ci).state = SpotState::Visited;

        for np in cp.neighbors_4() {
            let Some(ni) = grid.idx(np) else {
                continue;
            };
            let n = grid.spot(ni);
            // First writer wins: a cell already claimed by a predecessor
            // (or already processed) is not enqueued again.
            if n.state != SpotState::Unvisited || n.prev.is_some() {
                continue;
            }
            grid.spot_mut(ni).prev = Some(ci);
            self.queue.push_back(ni);
        }

        Step::Advanced(cp)
    }

    // -----------------------------------------------------------------------
    // Best-first
    // -----------------------------------------------------------------------

    fn step_best_first(&mut self, grid: &mut SearchGrid) -> Step {
        if self.open.is_empty() {
            return Step::Exhausted;
        }

        // Linear scan for the minimum f score; the first minimum found
        // wins ties, so equal-cost candidates expand in insertion order.
        let mut pos = 0;
        for i in 1..self.open.len() {
            if grid.spot(self.open[i]).f < grid.spot(self.open[pos]).f {
                pos = i;
            }
        }
        let ci = self.open[pos];
        let cp = grid.point(ci);

        if grid.spot(ci).label == Label::End {
            grid.mark_chain(ci, SpotState::Path);
            return Step::Done(cp);
        }

        // Move from open to closed. `remove` keeps the remaining open set
        // in insertion order for future tie-breaking scans.
        self.open.remove(pos);
        self.in_open[ci] = false;
        self.closed[ci] = true;
        grid.spot_mut(ci).state = SpotState::Visited;

        let current_g = grid.spot(ci).g;
        let end = grid.end();

        for np in cp.neighbors_4() {
            let Some(ni) = grid.idx(np) else {
                continue;
            };
            // Walls and finalized cells are excluded here; open-set members
            // stay eligible for score improvement.
            if grid.spot(ni).label == Label::Wall || self.closed[ni] {
                continue;
            }
            let tentative_g = current_g + 1;
            if tentative_g < grid.spot(ni).g {
                let n = grid.spot_mut(ni);
                n.prev = Some(ci);
                n.g = tentative_g;
                n.f = tentative_g + manhattan(np, end);
                if !self.in_open[ni] {
                    self.open.push(ni);
                    self.in_open[ni] = true;
                }
            }
        }

        Step::Advanced(cp)
    }
}
