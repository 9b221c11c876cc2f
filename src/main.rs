use falling_sand::{
    SimState, Camera, StepMode,
    input, rendering,
    ui::{self, Dropdown, SwatchBar, GRID_SIZES, STEP_MODES},
};
use macroquad::prelude::*;

fn window_conf() -> Conf {
    Conf {
        window_title: "Falling Sand".to_owned(),
        window_width: 1000,
        window_height: 800,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut state = SimState::new(161, 161);
    let mut camera = Camera::new();
    let mut pan_anchor: Option<(f32, f32)> = None;

    let px = ui::panel_x();
    let grid_size_items: Vec<String> = GRID_SIZES.iter().map(|(_, name)| name.to_string()).collect();
    let mut grid_size_dropdown = Dropdown::new(px, 20.0, ui::PANEL_WIDTH, "Grid Size", grid_size_items);
    grid_size_dropdown.set_selected(1); // Start with 161x161

    let mode_items: Vec<String> = STEP_MODES.iter().map(|s| s.to_string()).collect();
    let mut mode_dropdown = Dropdown::new(px, 70.0, ui::PANEL_WIDTH, "Step Mode", mode_items);

    let mut swatches = SwatchBar::new(px, 165.0);

    loop {
        let mouse_pos = mouse_position();

        // Update UI positions for responsiveness
        let px = ui::panel_x();
        grid_size_dropdown.set_position(px, 20.0);
        mode_dropdown.set_position(px, 70.0);
        swatches.set_position(px, 165.0);

        let buttons = ui::create_buttons();

        // Dropdowns handle clicks first; only one may be open at a time
        if grid_size_dropdown.update(mouse_pos) {
            let size = GRID_SIZES[grid_size_dropdown.selected()].0;
            state.resize_grid(size, size);
            camera.reset();
        }
        if grid_size_dropdown.is_open() {
            mode_dropdown.close();
        }

        if mode_dropdown.update(mouse_pos) {
            let modes = StepMode::all();
            state.set_mode(modes[mode_dropdown.selected()]);
        }
        if mode_dropdown.is_open() {
            grid_size_dropdown.close();
        }

        if swatches.update(mouse_pos) {
            state.set_brush(swatches.brush());
        }

        // Process input
        state = input::process_button_clicks(state, &buttons, mouse_pos);
        input::handle_zoom(&mut camera);
        input::handle_pan(&mut camera, &mut pan_anchor, mouse_pos);
        if !grid_size_dropdown.is_open() && !mode_dropdown.is_open() {
            input::handle_mouse_pour(&mut state, &camera, mouse_pos);
        }
        state = input::process_keyboard_input(state, &mut camera);

        // Advance the simulation clock
        state = state.tick(get_frame_time());

        // Render (with timing)
        let render_start = std::time::Instant::now();
        clear_background(BLACK);
        rendering::draw_grid(&state.grid, &camera);
        rendering::draw_brush_preview(&state, &camera, mouse_pos);
        rendering::draw_controls(
            &state,
            &camera,
            &buttons,
            &[grid_size_dropdown.clone(), mode_dropdown.clone()],
            &swatches,
            mouse_pos,
        );
        state.last_render_time_ms = render_start.elapsed().as_secs_f32() * 1000.0;

        next_frame().await;
    }
}
