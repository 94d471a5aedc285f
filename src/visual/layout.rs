use nannou::geom::{Point2, Rect};

const MARGIN: f32 = 20.0;
const BUTTON_AREA: f32 = 70.0;
const BUTTON_W: f32 = 180.0;
const BUTTON_H: f32 = 40.0;

/// Where the grid and the button sit inside the window.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    cell: f32,
    grid: Rect,
    button: Rect,
}

impl Layout {
    pub fn new(win: Rect, rows: usize, columns: usize) -> Self {
        let avail_w = (win.w() - 2.0 * MARGIN).max(0.0);
        let avail_h = (win.h() - BUTTON_AREA - 2.0 * MARGIN).max(0.0);
        let cell = (avail_w / columns.max(1) as f32)
            .min(avail_h / rows.max(1) as f32)
            .floor();

        let grid_w = cell * columns as f32;
        let grid_h = cell * rows as f32;
        let grid_top = win.top() - MARGIN;
        let grid = Rect::from_x_y_w_h(win.x(), grid_top - grid_h * 0.5, grid_w, grid_h);

        let button = Rect::from_x_y_w_h(
            win.x(),
            win.bottom() + BUTTON_AREA * 0.5,
            BUTTON_W,
            BUTTON_H,
        );

        Self {
            cell,
            grid,
            button,
        }
    }

    /// Window size that fits `rows` x `columns` cells of `cell` pixels.
    pub fn window_size(rows: usize, columns: usize, cell: f32) -> (u32, u32) {
        let w = (columns as f32 * cell + 2.0 * MARGIN).max(BUTTON_W + 2.0 * MARGIN);
        let h = rows as f32 * cell + BUTTON_AREA + 2.0 * MARGIN;
        (w.ceil() as u32, h.ceil() as u32)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell
    }

    /// Row 0 is the top row.
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let x = self.grid.left() + (col as f32 + 0.5) * self.cell;
        let y = self.grid.top() - (row as f32 + 0.5) * self.cell;
        Rect::from_x_y_w_h(x, y, self.cell, self.cell)
    }

    pub fn button_rect(&self) -> Rect {
        self.button
    }

    pub fn hits_button(&self, p: Point2) -> bool {
        self.button.contains(p)
    }
}
