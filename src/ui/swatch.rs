use macroquad::prelude::*;

use super::PALETTE;
use crate::domain::GrainColor;

const SWATCH_SIZE: f32 = 24.0;
const SWATCH_GAP: f32 = 4.0;

/// Row of clickable color swatches selecting the brush color.
///
/// The selection lives here, in the UI, and is copied into each placement;
/// the grid itself has no notion of a current color.
#[derive(Clone)]
pub struct SwatchBar {
    x: f32,
    y: f32,
    selected: usize,
}

impl SwatchBar {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, selected: 0 }
    }

    /// Currently selected palette entry
    pub fn brush(&self) -> GrainColor {
        PALETTE[self.selected].0
    }

    /// Name of the selected color, for the panel label
    pub fn brush_name(&self) -> &'static str {
        PALETTE[self.selected].1
    }

    /// Update position for responsive layout
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Handle clicks; returns true if the selection changed
    pub fn update(&mut self, mouse_pos: (f32, f32)) -> bool {
        if !is_mouse_button_pressed(MouseButton::Left) {
            return false;
        }
        for i in 0..PALETTE.len() {
            if self.hit(mouse_pos, i) && self.selected != i {
                self.selected = i;
                return true;
            }
        }
        false
    }

    /// Draw the swatch row; the selected entry gets a bright frame
    pub fn draw(&self, mouse_pos: (f32, f32)) {
        for (i, (color, _)) in PALETTE.iter().enumerate() {
            let (sx, sy) = self.slot(i);
            draw_rectangle(
                sx,
                sy,
                SWATCH_SIZE,
                SWATCH_SIZE,
                Color::from_rgba(color.r, color.g, color.b, 255),
            );

            let frame = if i == self.selected {
                WHITE
            } else if self.hit(mouse_pos, i) {
                Color::from_rgba(200, 200, 200, 255)
            } else {
                Color::from_rgba(70, 70, 70, 255)
            };
            let thickness = if i == self.selected { 3.0 } else { 1.0 };
            draw_rectangle_lines(sx, sy, SWATCH_SIZE, SWATCH_SIZE, thickness, frame);
        }
    }

    fn slot(&self, index: usize) -> (f32, f32) {
        (
            self.x + index as f32 * (SWATCH_SIZE + SWATCH_GAP),
            self.y,
        )
    }

    fn hit(&self, mouse_pos: (f32, f32), index: usize) -> bool {
        let (sx, sy) = self.slot(index);
        mouse_pos.0 >= sx
            && mouse_pos.0 <= sx + SWATCH_SIZE
            && mouse_pos.1 >= sy
            && mouse_pos.1 <= sy + SWATCH_SIZE
    }
}
