mod cell;
mod error;
mod flow;
mod grid;

pub use cell::{Cell, GrainColor};
pub use error::OutOfBounds;
pub use flow::{CoinFlip, FlowEngine, ScanOrder, Side, StepMode, TieBreak};
pub use grid::SandGrid;
