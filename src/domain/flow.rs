//! Per-tick granular flow: straight fall, diagonal slide, randomized
//! left/right tie-break when the cell below is blocked.
//!
//! Every cell is evaluated against the frozen pre-tick grid and results are
//! accumulated in a working buffer that is swapped in at the end of the
//! scan. Evaluating in place would let late iterations observe early moves
//! within the same tick, double-moving some grains and losing others; the
//! double-buffer discipline is what makes the result a pure function of the
//! pre-tick state and the drawn coins, independent of scan order.

use super::{Cell, GrainColor, SandGrid};
use rand::{Rng, SeedableRng, rng, rngs::StdRng};
use rayon::prelude::*;

/// Direction a grain takes when both diagonal destinations are free.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

/// Source of the left/right coin for grains blocked straight below.
///
/// Injected into the engine instead of a global random stream so runs can
/// be seeded and tests can pin the outcome. Coins are drawn once per grain
/// per tick, in row-major order over the pre-tick grid, before any cell is
/// evaluated.
pub trait TieBreak {
    /// Pick a side for the grain at `(x, y)` this tick
    fn choose(&mut self, x: usize, y: usize) -> Side;
}

/// A fixed side is itself a (fully biased) tie-break source; handy in tests
/// where the slide direction must be forced.
impl TieBreak for Side {
    fn choose(&mut self, _x: usize, _y: usize) -> Side {
        *self
    }
}

/// Fair coin backed by a seedable RNG stream.
pub struct CoinFlip {
    rng: StdRng,
}

impl CoinFlip {
    /// A seeded source replays the same coin sequence; `None` draws a fresh
    /// seed for a nondeterministic run.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rng().random()),
        };
        Self { rng }
    }
}

impl TieBreak for CoinFlip {
    fn choose(&mut self, _x: usize, _y: usize) -> Side {
        if self.rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Scan order for the proposal pass. The committed result must not depend
/// on it; both orders exist so that property can be exercised.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ScanOrder {
    #[default]
    TopDown,
    BottomUp,
}

/// How a tick is executed. Both modes produce identical committed results
/// for the same tie-break answers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StepMode {
    #[default]
    Serial,
    Parallel,
}

impl StepMode {
    /// Get all available modes
    pub fn all() -> Vec<StepMode> {
        vec![StepMode::Serial, StepMode::Parallel]
    }

    /// Display name for UI
    pub fn name(&self) -> &'static str {
        match self {
            StepMode::Serial => "Serial",
            StepMode::Parallel => "Parallel",
        }
    }
}

/// A grain's intended move for the current tick, as flat indexes into the
/// row-major cell buffer. `to` is always exactly one row below `from`.
#[derive(Clone, Copy, Debug)]
struct Move {
    from: usize,
    to: usize,
    color: GrainColor,
}

/// FlowEngine advances a `SandGrid` by exactly one tick per call.
///
/// The engine owns the working buffer the next state is accumulated into;
/// outside of `step` the grid always holds a fully committed state, so
/// placement and rendering can interleave freely between ticks.
pub struct FlowEngine {
    working: Vec<Cell>,
    coins: Vec<Side>,
    moves: Vec<Move>,
    claims: Vec<Option<Move>>,
    scan: ScanOrder,
}

impl FlowEngine {
    pub fn new() -> Self {
        Self::with_scan(ScanOrder::default())
    }

    pub fn with_scan(scan: ScanOrder) -> Self {
        Self {
            working: Vec::new(),
            coins: Vec::new(),
            moves: Vec::new(),
            claims: Vec::new(),
            scan,
        }
    }

    /// One tick, cells evaluated one after another in the configured scan
    /// order.
    pub fn step(&mut self, grid: &mut SandGrid, tie: &mut dyn TieBreak) {
        let (w, h) = grid.dimensions();
        self.draw_coins(grid.cells(), w, tie);

        self.moves.clear();
        let cells = grid.cells();
        let rows: Vec<usize> = match self.scan {
            ScanOrder::TopDown => (0..h).collect(),
            ScanOrder::BottomUp => (0..h).rev().collect(),
        };
        for y in rows {
            for x in 0..w {
                if let Some(mv) = propose(cells, &self.coins, w, h, x, y) {
                    self.moves.push(mv);
                }
            }
        }

        self.resolve_and_commit(grid);
    }

    /// One tick with the proposal pass fanned out across rows.
    ///
    /// Safe because proposals only read the frozen pre-tick cells and the
    /// pre-drawn coins; resolution and the write-back stay sequential.
    pub fn step_parallel(&mut self, grid: &mut SandGrid, tie: &mut dyn TieBreak) {
        let (w, h) = grid.dimensions();
        self.draw_coins(grid.cells(), w, tie);

        self.moves.clear();
        let cells = grid.cells();
        let coins = &self.coins;
        self.moves.par_extend((0..h).into_par_iter().flat_map_iter(move |y| {
            (0..w).filter_map(move |x| propose(cells, coins, w, h, x, y))
        }));

        self.resolve_and_commit(grid);
    }

    /// Draw one coin per grain, row-major over the pre-tick grid. Drawing
    /// everything up front keeps the tick's outcome a function of state plus
    /// coins, whatever order cells are evaluated in afterwards.
    fn draw_coins(&mut self, cells: &[Cell], width: usize, tie: &mut dyn TieBreak) {
        self.coins.clear();
        self.coins.resize(cells.len(), Side::Left);
        for (idx, cell) in cells.iter().enumerate() {
            if cell.is_grain() {
                self.coins[idx] = tie.choose(idx % width, idx / width);
            }
        }
    }

    /// Settle competing claims on each destination and commit the tick.
    ///
    /// Two grains can want the same empty cell (a straight fall meeting a
    /// slide, or two opposite slides). The winner is decided purely by the
    /// claimants' positions, so the outcome cannot depend on proposal order;
    /// losers keep their cell for this tick.
    fn resolve_and_commit(&mut self, grid: &mut SandGrid) {
        let (w, _) = grid.dimensions();
        let cells = grid.cells();

        self.working.clear();
        self.working.extend_from_slice(cells);
        self.claims.clear();
        self.claims.resize(cells.len(), None);

        for &mv in &self.moves {
            let slot = &mut self.claims[mv.to];
            match slot {
                Some(held) if rank(*held, w) <= rank(mv, w) => {}
                _ => *slot = Some(mv),
            }
        }

        // Sources (occupied pre-tick) and destinations (empty pre-tick) are
        // disjoint sets of cells, so the writes cannot clobber each other.
        for claim in &mut self.claims {
            if let Some(mv) = claim.take() {
                self.working[mv.from] = Cell::Empty;
                self.working[mv.to] = Cell::Grain(mv.color);
            }
        }

        grid.commit(&mut self.working);
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide where the grain at `(x, y)` wants to go this tick, reading only
/// the frozen pre-tick cells. `None` means the grain stays put.
///
/// Anything outside the grid counts as occupied: the bottom row rests on a
/// solid floor and the side columns on solid walls, with no out-of-range
/// reads or writes.
fn propose(
    cells: &[Cell],
    coins: &[Side],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> Option<Move> {
    let color = cells[y * width + x].color()?;

    let blocked = |cx: isize, cy: isize| -> bool {
        if cx < 0 || cy < 0 || cx >= width as isize || cy >= height as isize {
            return true;
        }
        cells[cy as usize * width + cx as usize].is_grain()
    };

    let (xi, yi) = (x as isize, y as isize);
    let down_free = !blocked(xi, yi + 1);
    let left_free = !blocked(xi - 1, yi + 1);
    let right_free = !blocked(xi + 1, yi + 1);

    let to_x = if down_free {
        xi
    } else if left_free && right_free {
        // blocked below, both diagonals open: the coin decides, and the
        // grain never falls back to the unchosen side
        match coins[y * width + x] {
            Side::Left => xi - 1,
            Side::Right => xi + 1,
        }
    } else if right_free {
        xi + 1
    } else if left_free {
        xi - 1
    } else {
        return None;
    };

    Some(Move {
        from: y * width + x,
        to: (y + 1) * width + to_x as usize,
        color,
    })
}

/// Claim priority for one destination: a straight fall outranks a slide,
/// and a right-moving slide outranks a left-moving one. The rank depends
/// only on where the claimant sits relative to the destination.
fn rank(mv: Move, width: usize) -> u8 {
    // `to` is one row below `from`; the column offset identifies the branch
    match mv.to as isize - mv.from as isize - width as isize {
        0 => 0,
        1 => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAND: GrainColor = GrainColor::new(237, 201, 81);
    const RUST: GrainColor = GrainColor::new(178, 70, 44);

    fn occupied(grid: &SandGrid) -> Vec<(usize, usize)> {
        grid.iter_grains().map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn free_fall_moves_one_cell_down_and_keeps_color() {
        let mut grid = SandGrid::new(5, 5);
        grid.place(2, 0, RUST).unwrap();

        FlowEngine::new().step(&mut grid, &mut Side::Left);

        assert_eq!(grid.get(2, 0), Some(Cell::Empty));
        assert_eq!(grid.get(2, 1), Some(Cell::Grain(RUST)));
        assert_eq!(grid.grain_count(), 1);
    }

    #[test]
    fn grain_on_the_floor_never_moves() {
        let mut grid = SandGrid::new(5, 5);
        grid.place(2, 4, SAND).unwrap();

        let mut engine = FlowEngine::new();
        for _ in 0..10 {
            engine.step(&mut grid, &mut Side::Left);
        }
        assert_eq!(occupied(&grid), vec![(2, 4)]);
    }

    #[test]
    fn dropped_grain_reaches_the_floor_and_stops() {
        let mut grid = SandGrid::new(5, 5);
        grid.place(2, 0, SAND).unwrap();
        let mut engine = FlowEngine::new();

        engine.step(&mut grid, &mut Side::Left);
        assert_eq!(occupied(&grid), vec![(2, 1)]);

        for _ in 0..3 {
            engine.step(&mut grid, &mut Side::Left);
        }
        assert_eq!(occupied(&grid), vec![(2, 4)]);

        engine.step(&mut grid, &mut Side::Left);
        assert_eq!(occupied(&grid), vec![(2, 4)]);
    }

    #[test]
    fn grain_blocked_on_all_three_paths_stays() {
        let mut grid = SandGrid::new(3, 3);
        grid.place(1, 0, RUST).unwrap();
        grid.place(0, 1, SAND).unwrap();
        grid.place(1, 1, SAND).unwrap();
        grid.place(2, 1, SAND).unwrap();

        FlowEngine::new().step(&mut grid, &mut Side::Left);

        assert_eq!(grid.get(1, 0), Some(Cell::Grain(RUST)));
    }

    #[test]
    fn single_open_diagonal_is_taken_regardless_of_coin() {
        // below and down-left blocked; the coin says Left but only Right is open
        let mut grid = SandGrid::new(3, 2);
        grid.place(1, 0, RUST).unwrap();
        grid.place(0, 1, SAND).unwrap();
        grid.place(1, 1, SAND).unwrap();

        FlowEngine::new().step(&mut grid, &mut Side::Left);

        assert_eq!(grid.get(2, 1), Some(Cell::Grain(RUST)));
        assert_eq!(grid.get(1, 0), Some(Cell::Empty));
    }

    #[test]
    fn coin_decides_between_two_open_diagonals() {
        for (side, expected) in [(Side::Left, (0, 1)), (Side::Right, (2, 1))] {
            let mut grid = SandGrid::new(3, 2);
            grid.place(1, 0, RUST).unwrap();
            grid.place(1, 1, SAND).unwrap();

            let mut pick = side;
            FlowEngine::new().step(&mut grid, &mut pick);

            assert_eq!(
                grid.get(expected.0, expected.1),
                Some(Cell::Grain(RUST)),
                "side {side:?}"
            );
        }
    }

    #[test]
    fn side_walls_act_solid() {
        // grain in the corner column: down blocked, down-left out of range
        let mut grid = SandGrid::new(3, 2);
        grid.place(0, 0, RUST).unwrap();
        grid.place(0, 1, SAND).unwrap();

        FlowEngine::new().step(&mut grid, &mut Side::Left);

        // only the in-range diagonal was available
        assert_eq!(grid.get(1, 1), Some(Cell::Grain(RUST)));
    }

    #[test]
    fn straight_fall_wins_a_contested_destination() {
        // A falls straight into (1, 1); B is forced left toward the same
        // cell and must wait a tick
        let mut grid = SandGrid::new(3, 2);
        grid.place(1, 0, SAND).unwrap(); // A
        grid.place(2, 0, RUST).unwrap(); // B
        grid.place(2, 1, SAND).unwrap(); // blocks B straight down

        FlowEngine::new().step(&mut grid, &mut Side::Left);

        assert_eq!(grid.get(1, 1), Some(Cell::Grain(SAND)));
        assert_eq!(grid.get(2, 0), Some(Cell::Grain(RUST)));
        assert_eq!(grid.grain_count(), 3);
    }

    #[test]
    fn opposing_slides_keep_both_grains() {
        // both movers are forced toward (2, 1); the right-moving grain wins
        // and the other stays, nothing lost or duplicated
        let mut grid = SandGrid::new(5, 2);
        grid.place(1, 0, RUST).unwrap();
        grid.place(3, 0, SAND).unwrap();
        for x in [0, 1, 3, 4] {
            grid.place(x, 1, SAND).unwrap();
        }

        FlowEngine::new().step(&mut grid, &mut Side::Left);

        assert_eq!(grid.get(2, 1), Some(Cell::Grain(RUST)));
        assert_eq!(grid.get(1, 0), Some(Cell::Empty));
        assert_eq!(grid.get(3, 0), Some(Cell::Grain(SAND)));
        assert_eq!(grid.grain_count(), 6);
    }

    #[test]
    fn scan_order_does_not_change_the_result() {
        let seed = 0xD1CE;
        let mut top_down = settle_column(FlowEngine::with_scan(ScanOrder::TopDown), seed);
        let mut bottom_up = settle_column(FlowEngine::with_scan(ScanOrder::BottomUp), seed);
        assert_eq!(occupied(&top_down), occupied(&bottom_up));

        // keep ticking both and compare the full history, not just the end
        let mut a = CoinFlip::new(Some(seed));
        let mut b = CoinFlip::new(Some(seed));
        let mut eng_a = FlowEngine::with_scan(ScanOrder::TopDown);
        let mut eng_b = FlowEngine::with_scan(ScanOrder::BottomUp);
        for tick in 0..30 {
            eng_a.step(&mut top_down, &mut a);
            eng_b.step(&mut bottom_up, &mut b);
            assert_eq!(occupied(&top_down), occupied(&bottom_up), "tick {tick}");
        }
    }

    #[test]
    fn parallel_step_matches_serial_step() {
        let seed = 0xBEEF;
        let mut serial = settle_column(FlowEngine::new(), seed);
        let mut parallel = SandGrid::new(9, 9);
        seed_grid(&mut parallel);

        let mut coin = CoinFlip::new(Some(seed));
        let mut engine = FlowEngine::new();
        for _ in 0..12 {
            engine.step_parallel(&mut parallel, &mut coin);
        }
        assert_eq!(occupied(&serial), occupied(&parallel));

        let mut a = CoinFlip::new(Some(seed));
        let mut b = CoinFlip::new(Some(seed));
        let mut eng_a = FlowEngine::new();
        let mut eng_b = FlowEngine::new();
        for tick in 0..30 {
            eng_a.step(&mut serial, &mut a);
            eng_b.step_parallel(&mut parallel, &mut b);
            assert_eq!(occupied(&serial), occupied(&parallel), "tick {tick}");
        }
    }

    #[test]
    fn stepping_conserves_grain_count() {
        let mut grid = SandGrid::new(9, 9);
        seed_grid(&mut grid);
        let before = grid.grain_count();

        let mut coin = CoinFlip::new(Some(42));
        let mut engine = FlowEngine::new();
        for _ in 0..50 {
            engine.step(&mut grid, &mut coin);
            assert_eq!(grid.grain_count(), before);
        }
    }

    #[test]
    fn fully_occupied_boundary_rows_survive_a_step() {
        let mut grid = SandGrid::new(4, 4);
        for x in 0..4 {
            grid.place(x, 0, SAND).unwrap();
            grid.place(x, 3, RUST).unwrap();
        }
        for y in 0..4 {
            grid.place(0, y, SAND).unwrap();
            grid.place(3, y, RUST).unwrap();
        }
        let before = grid.grain_count();
        FlowEngine::new().step(&mut grid, &mut Side::Right);
        assert_eq!(grid.grain_count(), before);
    }

    #[test]
    fn tie_break_is_unbiased_over_many_trials() {
        let mut coin = CoinFlip::new(Some(2024));
        let trials = 1000;
        let mut lefts = 0;
        for _ in 0..trials {
            let mut grid = SandGrid::new(3, 2);
            grid.place(1, 0, SAND).unwrap();
            grid.place(1, 1, SAND).unwrap();

            FlowEngine::new().step(&mut grid, &mut coin);
            if grid.get(0, 1) == Some(Cell::Grain(SAND)) {
                lefts += 1;
            }
        }
        // a fair coin stays well inside 400..=600 out of 1000
        assert!(
            (400..=600).contains(&lefts),
            "left count {lefts} of {trials} suggests bias"
        );
    }

    /// Deterministic scattered layout used by the equivalence tests.
    fn seed_grid(grid: &mut SandGrid) {
        let (w, h) = grid.dimensions();
        for y in 0..h / 2 {
            for x in 0..w {
                // sparse, asymmetric pattern with plenty of slides
                if (x * 7 + y * 5) % 3 == 0 {
                    grid.place(x, y, SAND).unwrap();
                }
            }
        }
    }

    fn settle_column(mut engine: FlowEngine, seed: u64) -> SandGrid {
        let mut grid = SandGrid::new(9, 9);
        seed_grid(&mut grid);
        let mut coin = CoinFlip::new(Some(seed));
        for _ in 0..12 {
            engine.step(&mut grid, &mut coin);
        }
        grid
    }
}
