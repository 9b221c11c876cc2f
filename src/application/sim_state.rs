use crate::domain::{CoinFlip, FlowEngine, GrainColor, OutOfBounds, SandGrid, StepMode};

/// Ceiling on catch-up ticks after a long frame, so a stall cannot spiral
/// into an ever-growing backlog.
const MAX_TICKS_PER_FRAME: u32 = 8;

/// SimState orchestrates the simulation: it owns the grid, the engine and
/// the tie-break source, and paces ticks at a fixed cadence decoupled from
/// the frame rate. This is the application layer over the domain logic.
pub struct SimState {
    pub grid: SandGrid,
    engine: FlowEngine,
    coin: CoinFlip,
    pub mode: StepMode,
    pub is_running: bool,
    pub ticks: u64,
    pub update_timer: f32,
    pub ticks_per_second: f32,
    /// Color given to newly poured grains; owned here, not by the grid
    pub brush: GrainColor,
    pub last_step_time_ms: f32, // Step performance metric
    pub last_render_time_ms: f32, // Render performance metric
}

impl SimState {
    /// Create new simulation state with given grid dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_seed(width, height, None)
    }

    /// Seeded variant for reproducible runs (tests, benchmarks)
    pub fn with_seed(width: usize, height: usize, seed: Option<u64>) -> Self {
        Self {
            grid: SandGrid::new(width, height),
            engine: FlowEngine::new(),
            coin: CoinFlip::new(seed),
            mode: StepMode::default(),
            is_running: true,
            ticks: 0,
            update_timer: 0.0,
            ticks_per_second: 100.0,
            brush: GrainColor::new(237, 201, 81),
            last_step_time_ms: 0.0,
            last_render_time_ms: 0.0,
        }
    }

    /// Swap in a fresh grid of new dimensions
    pub fn resize_grid(&mut self, width: usize, height: usize) {
        self.grid = SandGrid::new(width, height);
        self.engine = FlowEngine::new();
        self.ticks = 0;
    }

    /// Set how ticks are executed
    pub fn set_mode(&mut self, mode: StepMode) {
        self.mode = mode;
    }

    /// Set the color used for subsequent placements
    pub fn set_brush(&mut self, brush: GrainColor) {
        self.brush = brush;
    }

    /// Pour one grain of the current brush color at grid coordinates
    pub fn place(&mut self, x: usize, y: usize) -> Result<(), OutOfBounds> {
        self.grid.place(x, y, self.brush)
    }

    /// Toggle play/pause state
    pub fn toggle_running(mut self) -> Self {
        self.is_running = !self.is_running;
        self
    }

    /// Clear the board and restart the tick counter
    pub fn clear(mut self) -> Self {
        self.grid.reset();
        self.ticks = 0;
        self
    }

    /// Adjust simulation speed
    pub fn adjust_speed(mut self, delta: f32) -> Self {
        self.ticks_per_second = (self.ticks_per_second + delta).clamp(10.0, 240.0);
        self
    }

    /// Advance the fixed-cadence clock by one frame's worth of time,
    /// stepping the simulation zero or more times. Pausing simply stops the
    /// clock; placement and rendering keep working on the committed grid.
    pub fn tick(mut self, delta_time: f32) -> Self {
        if !self.is_running {
            return self;
        }

        self.update_timer += delta_time;
        let interval = 1.0 / self.ticks_per_second;

        let mut budget = MAX_TICKS_PER_FRAME;
        while self.update_timer >= interval && budget > 0 {
            self.step_once();
            self.update_timer -= interval;
            budget -= 1;
        }
        if budget == 0 {
            // drop the backlog after a stall instead of replaying it
            self.update_timer = 0.0;
        }

        self
    }

    /// Run exactly one simulation tick
    pub fn step_once(&mut self) {
        let start = std::time::Instant::now();
        match self.mode {
            StepMode::Serial => self.engine.step(&mut self.grid, &mut self.coin),
            StepMode::Parallel => self.engine.step_parallel(&mut self.grid, &mut self.coin),
        }
        self.last_step_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_state_ignores_time() {
        let mut state = SimState::with_seed(5, 5, Some(1));
        state.is_running = false;
        state.place(2, 0).unwrap();

        let state = state.tick(10.0);
        assert_eq!(state.ticks, 0);
        assert!(state.grid.get(2, 0).unwrap().is_grain());
    }

    #[test]
    fn running_state_steps_at_the_configured_cadence() {
        let mut state = SimState::with_seed(5, 5, Some(1));
        state.ticks_per_second = 100.0;

        // two intervals of simulated time, two ticks
        let state = state.tick(0.02);
        assert_eq!(state.ticks, 2);
    }

    #[test]
    fn long_frames_do_not_spiral() {
        let mut state = SimState::with_seed(5, 5, Some(1));
        state.ticks_per_second = 240.0;

        let state = state.tick(60.0);
        assert_eq!(state.ticks, u64::from(MAX_TICKS_PER_FRAME));
        assert_eq!(state.update_timer, 0.0);
    }

    #[test]
    fn place_uses_the_selected_brush() {
        let mut state = SimState::with_seed(5, 5, Some(1));
        let moss = GrainColor::new(118, 150, 62);
        state.set_brush(moss);
        state.place(1, 1).unwrap();

        let grains: Vec<_> = state.grid.iter_grains().collect();
        assert_eq!(grains, vec![(1, 1, moss)]);
    }

    #[test]
    fn clear_empties_the_board_and_tick_counter() {
        let mut state = SimState::with_seed(5, 5, Some(1));
        state.place(2, 0).unwrap();
        state.step_once();

        let state = state.clear();
        assert_eq!(state.ticks, 0);
        assert_eq!(state.grid.grain_count(), 0);
    }

    #[test]
    fn speed_adjustment_is_clamped() {
        let state = SimState::with_seed(5, 5, Some(1));
        let state = state.adjust_speed(10_000.0);
        assert_eq!(state.ticks_per_second, 240.0);
        let state = state.adjust_speed(-10_000.0);
        assert_eq!(state.ticks_per_second, 10.0);
    }

    #[test]
    fn out_of_range_place_is_reported_not_panicked() {
        let mut state = SimState::with_seed(5, 5, Some(1));
        assert!(state.place(9, 9).is_err());
        assert_eq!(state.grid.grain_count(), 0);
    }
}
