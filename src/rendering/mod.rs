use crate::application::{Camera, SimState};
use crate::domain::{GrainColor, SandGrid};
use crate::ui::{
    Button, Dropdown, SwatchBar, CELL_SIZE, PANEL_WIDTH, grid_area_height, grid_area_width,
    panel_x,
};
use macroquad::prelude::*;

/// Format large numbers with K/M suffixes
fn format_number(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

fn to_render_color(color: GrainColor) -> Color {
    Color::from_rgba(color.r, color.g, color.b, 255)
}

/// Draw the sand field: a backdrop for the whole grid, then every occupied
/// cell in its own color, culled against the viewport.
pub fn draw_grid(grid: &SandGrid, camera: &Camera) {
    let cell = CELL_SIZE * camera.zoom;
    let area_width = grid_area_width();
    let area_height = grid_area_height();

    let (grid_width, grid_height) = grid.dimensions();
    let (origin_x, origin_y) = camera.grid_to_screen(0, 0, CELL_SIZE);
    let field_w = grid_width as f32 * cell;
    let field_h = grid_height as f32 * cell;

    draw_rectangle(origin_x, origin_y, field_w, field_h, Color::from_rgba(18, 16, 14, 255));

    for (x, y, color) in grid.iter_grains() {
        let (screen_x, screen_y) = camera.grid_to_screen(x, y, CELL_SIZE);

        // Skip if outside viewport
        if screen_x + cell < 0.0
            || screen_x > area_width
            || screen_y + cell < 0.0
            || screen_y > area_height
        {
            continue;
        }

        draw_rectangle(screen_x, screen_y, cell, cell, to_render_color(color));
    }

    draw_rectangle_lines(
        origin_x,
        origin_y,
        field_w,
        field_h,
        1.0,
        Color::from_rgba(70, 64, 58, 255),
    );
}

/// Ghost of the brush at the cell under the cursor
pub fn draw_brush_preview(state: &SimState, camera: &Camera, mouse_pos: (f32, f32)) {
    if mouse_pos.0 >= grid_area_width() {
        return;
    }

    let (grid_x, grid_y) = camera.screen_to_grid(mouse_pos.0, mouse_pos.1, CELL_SIZE);
    let (grid_width, grid_height) = state.grid.dimensions();
    if grid_x < 0 || grid_y < 0 || grid_x >= grid_width as i32 || grid_y >= grid_height as i32 {
        return;
    }

    let cell = CELL_SIZE * camera.zoom;
    let (screen_x, screen_y) = camera.grid_to_screen(grid_x as usize, grid_y as usize, CELL_SIZE);
    let brush = state.brush;

    draw_rectangle(
        screen_x,
        screen_y,
        cell,
        cell,
        Color::from_rgba(brush.r, brush.g, brush.b, 140),
    );
    draw_rectangle_lines(
        screen_x,
        screen_y,
        cell,
        cell,
        1.5,
        Color::from_rgba(brush.r, brush.g, brush.b, 220),
    );
}

/// Draw control panel background
fn draw_panel_background() {
    draw_rectangle(
        panel_x(),
        0.0,
        PANEL_WIDTH,
        screen_height(),
        Color::from_rgba(30, 28, 26, 255),
    );
}

/// Draw the control panel with buttons, dropdowns, swatches, and info
pub fn draw_controls(
    state: &SimState,
    camera: &Camera,
    buttons: &[Button],
    dropdowns: &[Dropdown],
    swatches: &SwatchBar,
    mouse_pos: (f32, f32),
) {
    draw_panel_background();

    buttons.iter().for_each(|btn| btn.draw(mouse_pos));

    let px = panel_x();

    // Brush palette
    draw_text("Brush:", px, 155.0, 14.0, WHITE);
    swatches.draw(mouse_pos);
    draw_text(swatches.brush_name(), px, 205.0, 13.0, GRAY);

    // Controls help
    let controls = [
        ("Controls:", px, 240.0, 14.0, WHITE),
        ("LMB: Pour sand", px, 255.0, 12.0, GRAY),
        ("Space: Pause", px, 268.0, 12.0, GRAY),
        ("C: Clear", px, 281.0, 12.0, GRAY),
        ("Wheel: Zoom", px, 294.0, 12.0, GRAY),
        ("Mid-drag: Pan", px, 307.0, 12.0, GRAY),
        ("Up/Down: Speed", px, 320.0, 12.0, GRAY),
    ];
    controls.iter().for_each(|(text, x, y, size, color)| {
        draw_text(text, *x, *y, *size, *color);
    });

    // Grid info
    let (gw, gh) = state.grid.dimensions();
    let grid_info = format!("Grid: {}×{}", gw, gh);
    draw_text(&grid_info, px, 350.0, 12.0, Color::from_rgba(150, 150, 150, 255));
    let grain_info = format!("Grains: {}", format_number(state.grid.grain_count()));
    draw_text(&grain_info, px, 365.0, 12.0, Color::from_rgba(150, 150, 150, 255));

    // Performance metrics, color coded against frame budget
    let step_ms = state.last_step_time_ms;
    let step_color = if step_ms < 2.0 {
        Color::from_rgba(0, 255, 0, 255)
    } else if step_ms < 8.0 {
        Color::from_rgba(255, 255, 0, 255)
    } else {
        Color::from_rgba(255, 0, 0, 255)
    };
    let render_ms = state.last_render_time_ms;
    let render_color = if render_ms < 5.0 {
        Color::from_rgba(0, 255, 0, 255)
    } else if render_ms < 16.0 {
        Color::from_rgba(255, 255, 0, 255)
    } else {
        Color::from_rgba(255, 0, 0, 255)
    };

    draw_text(&format!("Step: {:.2}ms", step_ms), px, 395.0, 13.0, step_color);
    draw_text(&format!("Render: {:.1}ms", render_ms), px, 410.0, 13.0, render_color);
    draw_text(
        &format!("{} | FPS: {:.0}", state.mode.name(), get_fps()),
        px,
        425.0,
        12.0,
        GRAY,
    );

    let labels = [
        ("Speed:", px, 630.0, 16.0, WHITE),
        (
            &format!("{:.0} ticks/s", state.ticks_per_second),
            px,
            650.0,
            14.0,
            Color::from_rgba(180, 180, 180, 255),
        ),
        ("Tick:", px, 680.0, 16.0, WHITE),
        (
            &format!("{}", state.ticks),
            px,
            700.0,
            20.0,
            Color::from_rgba(237, 201, 81, 255),
        ),
        ("Status:", px, 735.0, 16.0, WHITE),
        (
            if state.is_running { "Running" } else { "Paused" },
            px,
            755.0,
            16.0,
            if state.is_running {
                Color::from_rgba(0, 255, 0, 255)
            } else {
                Color::from_rgba(255, 165, 0, 255)
            },
        ),
        ("Zoom:", px, 780.0, 14.0, WHITE),
        (
            &format!("{:.1}x", camera.zoom),
            px,
            795.0,
            14.0,
            Color::from_rgba(180, 180, 180, 255),
        ),
    ];
    labels.iter().for_each(|(text, x, y, size, color)| {
        draw_text(text, *x, *y, *size, *color);
    });

    // Draw dropdowns last; the open one goes on top of everything
    let mut open_dropdown: Option<&Dropdown> = None;
    for dropdown in dropdowns.iter() {
        if dropdown.is_open() {
            open_dropdown = Some(dropdown);
        } else {
            dropdown.draw(mouse_pos);
        }
    }
    if let Some(dd) = open_dropdown {
        dd.draw(mouse_pos);
    }
}
