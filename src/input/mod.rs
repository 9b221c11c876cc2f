use crate::application::{Camera, SimState};
use crate::ui::{CELL_SIZE, grid_area_width};
use macroquad::prelude::*;

/// Handle zoom with mouse wheel
pub fn handle_zoom(camera: &mut Camera) {
    let wheel = mouse_wheel().1;
    if wheel > 0.0 {
        camera.zoom_in(1.1);
    } else if wheel < 0.0 {
        camera.zoom_out(1.1);
    }
}

/// Handle pan with middle mouse button drag. The anchor is the pointer
/// position of the previous frame, owned by the main loop.
pub fn handle_pan(camera: &mut Camera, anchor: &mut Option<(f32, f32)>, mouse_pos: (f32, f32)) {
    if is_mouse_button_down(MouseButton::Middle) {
        if let Some(last) = *anchor {
            camera.pan(mouse_pos.0 - last.0, mouse_pos.1 - last.1);
        }
        *anchor = Some(mouse_pos);
    } else {
        *anchor = None;
    }
}

/// Pour grains while the left button is held over the simulation area.
/// Works whether the simulation is running or paused.
pub fn handle_mouse_pour(state: &mut SimState, camera: &Camera, mouse_pos: (f32, f32)) {
    if mouse_pos.0 >= grid_area_width() || !is_mouse_button_down(MouseButton::Left) {
        return;
    }

    let (grid_x, grid_y) = camera.screen_to_grid(mouse_pos.0, mouse_pos.1, CELL_SIZE);

    let (grid_width, grid_height) = state.grid.dimensions();
    if grid_x < 0 || grid_y < 0 || grid_x >= grid_width as i32 || grid_y >= grid_height as i32 {
        return;
    }

    // coordinates validated above, so the placement cannot be rejected
    let _ = state.place(grid_x as usize, grid_y as usize);
}

/// Process keyboard input functionally
pub fn process_keyboard_input(state: SimState, camera: &mut Camera) -> SimState {
    type KeyAction = (KeyCode, fn(SimState) -> SimState);

    let actions: [KeyAction; 4] = [
        (KeyCode::Space, SimState::toggle_running),
        (KeyCode::C, SimState::clear),
        (KeyCode::Up, |s| s.adjust_speed(10.0)),
        (KeyCode::Down, |s| s.adjust_speed(-10.0)),
    ];

    let new_state = actions.iter().fold(state, |s, (key, action)| {
        if is_key_pressed(*key) { action(s) } else { s }
    });

    // Reset camera with 'H' (home)
    if is_key_pressed(KeyCode::H) {
        camera.reset();
    }

    new_state
}

/// Process button clicks functionally
pub fn process_button_clicks(
    state: SimState,
    buttons: &[crate::ui::Button],
    mouse_pos: (f32, f32),
) -> SimState {
    buttons.iter().enumerate().fold(state, |s, (idx, btn)| {
        if !btn.is_clicked(mouse_pos) {
            return s;
        }
        match idx {
            0 => s.toggle_running(),
            1 => s.clear(),
            _ => s,
        }
    })
}
