mod button;
mod dropdown;
mod swatch;

pub use button::Button;
pub use dropdown::Dropdown;
pub use swatch::SwatchBar;

use crate::domain::GrainColor;
use macroquad::prelude::{screen_height, screen_width};

pub const PANEL_WIDTH: f32 = 180.0;
pub const BUTTON_HEIGHT: f32 = 40.0;
pub const CELL_SIZE: f32 = 4.0;

/// Get the X position where the panel starts (right side)
pub fn panel_x() -> f32 {
    screen_width() - PANEL_WIDTH
}

/// Get the width of the simulation area
pub fn grid_area_width() -> f32 {
    screen_width() - PANEL_WIDTH
}

/// Get the height of the simulation area
pub fn grid_area_height() -> f32 {
    screen_height()
}

/// Grid size options; odd dimensions keep a center column under the pointer
pub const GRID_SIZES: &[(usize, &str)] = &[
    (81, "81×81"),
    (161, "161×161"),
    (321, "321×321"),
    (641, "641×641"),
];

/// Step mode names for the dropdown - matches StepMode::all() order
pub const STEP_MODES: &[&str] = &["Serial", "Parallel"];

/// Brush palette. Placement copies the selected entry into each grain, so
/// swapping brushes never recolors sand already on the board.
pub const PALETTE: &[(GrainColor, &str)] = &[
    (GrainColor::new(237, 201, 81), "Sand"),
    (GrainColor::new(214, 143, 58), "Amber"),
    (GrainColor::new(178, 70, 44), "Rust"),
    (GrainColor::new(118, 150, 62), "Moss"),
    (GrainColor::new(96, 110, 132), "Slate"),
    (GrainColor::new(222, 156, 170), "Rose"),
];

/// Create UI buttons with standard layout
pub fn create_buttons() -> Vec<Button> {
    let px = panel_x();
    vec![
        Button::new(px, 470.0, PANEL_WIDTH, BUTTON_HEIGHT, "Play/Pause"),
        Button::new(px, 520.0, PANEL_WIDTH, BUTTON_HEIGHT, "Clear"),
    ]
}
