// Domain layer - grid state and the flow rule
pub mod domain;

// Application layer - simulation orchestration
pub mod application;

// Infrastructure layer - UI, rendering, input
pub mod ui;
pub mod rendering;
pub mod input;

// Re-exports for convenience
pub use domain::{Cell, CoinFlip, FlowEngine, GrainColor, OutOfBounds, SandGrid, StepMode};
pub use application::{Camera, SimState};
pub use ui::Button;
