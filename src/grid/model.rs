use rand::Rng;

use super::images::{ImageId, ImagePools};

/// What a cell currently looks like on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    pub image: ImageId,
    pub dimmed: bool,
}

#[derive(Clone, Debug)]
pub struct Cell {
    inactive: ImageId,
    active: ImageId,
    view: CellView,
}

impl Cell {
    pub fn inactive_image(&self) -> ImageId {
        self.inactive
    }

    pub fn active_image(&self) -> ImageId {
        self.active
    }

    pub fn view(&self) -> CellView {
        self.view
    }

    /// The view is the only record of activation.
    pub fn is_active(&self) -> bool {
        !self.view.dimmed
    }
}

/// Fixed rows x columns of cells. Row 0 is the top row; columns are
/// frequency channels, rows are magnitude levels filled from the bottom.
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Draws one inactive and one active image per cell, once, and shows
    /// every cell in its inactive state.
    pub fn assign_images<R: Rng>(
        rows: usize,
        columns: usize,
        pools: &ImagePools,
        rng: &mut R,
    ) -> Self {
        let cells = (0..rows * columns)
            .map(|_| {
                let inactive = pools.draw_inactive(rng);
                let active = pools.draw_active(rng);
                Cell {
                    inactive,
                    active,
                    view: CellView {
                        image: inactive,
                        dimmed: true,
                    },
                }
            })
            .collect();

        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Shows the cell's assigned active or inactive image; inactive cells are
    /// dimmed. Out-of-range coordinates are ignored.
    pub fn render(&mut self, row: usize, col: usize, active: bool) {
        let Some(i) = self.index(row, col) else {
            return;
        };
        let cell = &mut self.cells[i];
        cell.view = CellView {
            image: if active { cell.active } else { cell.inactive },
            dimmed: !active,
        };
    }

    pub fn reset_all(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.columns {
                self.render(row, col, false);
            }
        }
    }

    pub fn is_reset(&self) -> bool {
        self.cells.iter().all(|c| !c.is_active())
    }

    /// Cells in row-major order together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i / columns, i % columns, c))
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.columns).then(|| row * self.columns + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn grid(rows: usize, columns: usize, seed: u64) -> Grid {
        let mut rng = SmallRng::seed_from_u64(seed);
        Grid::assign_images(rows, columns, &ImagePools::default(), &mut rng)
    }

    #[test]
    fn every_cell_gets_one_image_from_each_pool() {
        let pools = ImagePools::default();
        let g = grid(32, 10, 1);
        assert_eq!(g.iter().count(), 320);
        for (_, _, cell) in g.iter() {
            assert!(matches!(cell.inactive_image(), ImageId::Inactive(_)));
            assert!(matches!(cell.active_image(), ImageId::Active(_)));
            assert!(pools.contains(cell.inactive_image()));
            assert!(pools.contains(cell.active_image()));
        }
    }

    #[test]
    fn same_seed_same_assignment() {
        let a = grid(8, 4, 42);
        let b = grid(8, 4, 42);
        for ((_, _, x), (_, _, y)) in a.iter().zip(b.iter()) {
            assert_eq!(x.inactive_image(), y.inactive_image());
            assert_eq!(x.active_image(), y.active_image());
        }
    }

    #[test]
    fn starts_in_reset_state() {
        assert!(grid(4, 3, 5).is_reset());
    }

    #[test]
    fn render_toggles_image_and_dimming() {
        let mut g = grid(2, 2, 3);
        let assigned = g.cell(1, 0).unwrap().clone();

        g.render(1, 0, true);
        let view = g.cell(1, 0).unwrap().view();
        assert_eq!(view.image, assigned.active_image());
        assert!(!view.dimmed);

        g.render(1, 0, false);
        let view = g.cell(1, 0).unwrap().view();
        assert_eq!(view.image, assigned.inactive_image());
        assert!(view.dimmed);
    }

    #[test]
    fn assignments_survive_rendering() {
        let mut g = grid(3, 3, 11);
        let before: Vec<_> = g
            .iter()
            .map(|(_, _, c)| (c.inactive_image(), c.active_image()))
            .collect();
        for round in 0..5 {
            for row in 0..3 {
                for col in 0..3 {
                    g.render(row, col, (row + col + round) % 2 == 0);
                }
            }
        }
        g.reset_all();
        let after: Vec<_> = g
            .iter()
            .map(|(_, _, c)| (c.inactive_image(), c.active_image()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reset_all_dims_every_cell() {
        for (rows, cols) in [(1, 1), (1, 7), (5, 1), (32, 10)] {
            let mut g = grid(rows, cols, 9);
            for row in 0..rows {
                for col in 0..cols {
                    g.render(row, col, true);
                }
            }
            g.reset_all();
            for (_, _, cell) in g.iter() {
                assert_eq!(cell.view().image, cell.inactive_image());
                assert!(cell.view().dimmed);
            }
        }
    }

    #[test]
    fn out_of_range_render_is_ignored() {
        let mut g = grid(2, 2, 0);
        g.render(2, 0, true);
        g.render(0, 9, true);
        assert!(g.is_reset());
        assert!(g.cell(2, 0).is_none());
    }
}
