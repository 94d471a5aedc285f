use tracing::trace;

use crate::grid::Grid;

/// First snapshot bin shown; the lowest bins are mostly inaudible rumble.
pub const START_BIN: usize = 2;
/// Bin values at or below this count as silence.
pub const THRESHOLD: u8 = 30;

#[derive(Clone, Copy, Debug)]
pub struct MapperConfig {
    pub start_bin: usize,
    pub threshold: u8,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            start_bin: START_BIN,
            threshold: THRESHOLD,
        }
    }
}

/// Number of rows, counted from the bottom, a bin value lights up.
pub fn rows_to_color(value: u8, threshold: u8, num_rows: usize) -> usize {
    let span = 255 - threshold as u32;
    if span == 0 {
        return 0;
    }
    let normalized = value.saturating_sub(threshold) as f64;
    let rows = (normalized / span as f64 * num_rows as f64).floor() as usize;
    rows.min(num_rows)
}

/// Paints every cell of the grid from one snapshot: column `c` follows bin
/// `start_bin + c` (missing bins read as 0), lit from the bottom row up.
pub fn map_to_grid(snapshot: &[u8], grid: &mut Grid, config: &MapperConfig) {
    let num_rows = grid.rows();
    for col in 0..grid.columns() {
        let value = snapshot
            .get(config.start_bin + col)
            .copied()
            .unwrap_or(0);
        let lit = rows_to_color(value, config.threshold, num_rows);
        for row in 0..num_rows {
            grid.render(row, col, row >= num_rows - lit);
        }
    }

    if !snapshot.is_empty() {
        let max = snapshot.iter().copied().max().unwrap_or(0);
        let avg = snapshot.iter().map(|&v| v as f32).sum::<f32>() / snapshot.len() as f32;
        trace!(max, avg = %format!("{avg:.2}"), "frequency snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ImagePools;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn grid(rows: usize, columns: usize) -> Grid {
        let mut rng = SmallRng::seed_from_u64(0);
        Grid::assign_images(rows, columns, &ImagePools::default(), &mut rng)
    }

    fn lit_rows(grid: &Grid, col: usize) -> usize {
        (0..grid.rows())
            .filter(|&row| grid.cell(row, col).is_some_and(|c| c.is_active()))
            .count()
    }

    #[test]
    fn reference_points() {
        assert_eq!(rows_to_color(0, 30, 32), 0);
        assert_eq!(rows_to_color(30, 30, 32), 0);
        assert_eq!(rows_to_color(255, 30, 32), 32);
        // 97 / 225 * 32 = 13.8
        assert_eq!(rows_to_color(127, 30, 32), 13);
        assert_eq!(rows_to_color(100, 255, 32), 0);
    }

    #[test]
    fn max_bin_lights_whole_column() {
        let mut g = grid(32, 10);
        let mut snapshot = vec![0u8; 256];
        snapshot[START_BIN + 3] = 255;
        map_to_grid(&snapshot, &mut g, &MapperConfig::default());

        assert_eq!(lit_rows(&g, 3), 32);
        for col in (0..10).filter(|&c| c != 3) {
            assert_eq!(lit_rows(&g, col), 0);
        }
    }

    #[test]
    fn lights_from_the_bottom() {
        let mut g = grid(10, 1);
        // (142 - 30) / 225 * 10 = 4.97
        let snapshot = [0, 0, 142];
        map_to_grid(&snapshot, &mut g, &MapperConfig::default());
        for row in 0..10 {
            assert_eq!(g.cell(row, 0).unwrap().is_active(), row >= 6, "row {row}");
        }
    }

    #[test]
    fn short_snapshot_reads_missing_bins_as_silence() {
        let mut g = grid(4, 10);
        map_to_grid(&[255, 255, 255, 255], &mut g, &MapperConfig::default());
        assert_eq!(lit_rows(&g, 0), 4);
        assert_eq!(lit_rows(&g, 1), 4);
        assert_eq!(lit_rows(&g, 2), 0);
        assert_eq!(lit_rows(&g, 9), 0);

        map_to_grid(&[], &mut g, &MapperConfig::default());
        assert!(g.is_reset());
    }

    #[test]
    fn lit_cells_show_their_active_image() {
        let mut g = grid(2, 1);
        map_to_grid(&[0, 0, 255], &mut g, &MapperConfig::default());
        for row in 0..2 {
            let cell = g.cell(row, 0).unwrap();
            assert_eq!(cell.view().image, cell.active_image());
        }
    }

    proptest! {
        #[test]
        fn quiet_snapshot_matches_reset(
            snapshot in proptest::collection::vec(0u8..=THRESHOLD, 0..64),
            rows in 1usize..40,
            cols in 1usize..16,
        ) {
            let mut g = grid(rows, cols);
            for col in 0..cols {
                g.render(rows - 1, col, true);
            }
            map_to_grid(&snapshot, &mut g, &MapperConfig::default());
            prop_assert!(g.is_reset());
        }

        #[test]
        fn rows_never_exceed_grid(value in any::<u8>(), threshold in 0u8..255, rows in 0usize..100) {
            prop_assert!(rows_to_color(value, threshold, rows) <= rows);
        }

        #[test]
        fn louder_never_lights_fewer_rows(a in any::<u8>(), b in any::<u8>(), rows in 1usize..64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rows_to_color(lo, THRESHOLD, rows) <= rows_to_color(hi, THRESHOLD, rows));
        }

        #[test]
        fn raising_one_bin_only_grows_its_column(
            snapshot in proptest::collection::vec(any::<u8>(), 12..=12),
            col in 0usize..10,
            bump in 1u8..=255,
        ) {
            let config = MapperConfig::default();
            let mut before = grid(32, 10);
            map_to_grid(&snapshot, &mut before, &config);

            let mut louder = snapshot.clone();
            louder[START_BIN + col] = louder[START_BIN + col].saturating_add(bump);
            let mut after = grid(32, 10);
            map_to_grid(&louder, &mut after, &config);

            prop_assert!(lit_rows(&after, col) >= lit_rows(&before, col));
            for other in (0..10).filter(|&c| c != col) {
                prop_assert_eq!(lit_rows(&after, other), lit_rows(&before, other));
            }
        }

        #[test]
        fn mapping_twice_changes_nothing(
            snapshot in proptest::collection::vec(any::<u8>(), 0..300),
        ) {
            let config = MapperConfig::default();
            let mut g = grid(16, 10);
            map_to_grid(&snapshot, &mut g, &config);
            let first: Vec<_> = g.iter().map(|(_, _, c)| c.view()).collect();
            map_to_grid(&snapshot, &mut g, &config);
            let second: Vec<_> = g.iter().map(|(_, _, c)| c.view()).collect();
            prop_assert_eq!(first, second);
        }
    }
}
