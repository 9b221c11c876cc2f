/// Camera manages the viewport over the grid: pixel pan plus zoom factor.
/// The input adapter uses it to turn pointer positions into grid cells, the
/// renderer to turn cells back into screen rectangles.
pub struct Camera {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32, // 1.0 = one cell per CELL_SIZE pixels
}

const MIN_ZOOM: f32 = 0.5;
const MAX_ZOOM: f32 = 12.0;

impl Camera {
    pub fn new() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }

    /// Zoom in by factor
    pub fn zoom_in(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom out by factor
    pub fn zoom_out(&mut self, factor: f32) {
        self.zoom = (self.zoom / factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Shift the viewport by a pixel delta
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Convert screen coordinates to grid coordinates. May land outside the
    /// grid; callers bounds-check before placing.
    pub fn screen_to_grid(&self, screen_x: f32, screen_y: f32, cell_size: f32) -> (i32, i32) {
        let scale = cell_size * self.zoom;
        (
            ((screen_x - self.pan_x) / scale).floor() as i32,
            ((screen_y - self.pan_y) / scale).floor() as i32,
        )
    }

    /// Convert grid coordinates to the screen position of the cell's corner
    pub fn grid_to_screen(&self, grid_x: usize, grid_y: usize, cell_size: f32) -> (f32, f32) {
        let scale = cell_size * self.zoom;
        (
            grid_x as f32 * scale + self.pan_x,
            grid_y as f32 * scale + self.pan_y,
        )
    }

    /// Reset pan and zoom to defaults
    pub fn reset(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.zoom = 1.0;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
