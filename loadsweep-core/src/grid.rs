//! Sweep Grid
//!
//! Produces the deterministic sequence of (item count, load factor)
//! configurations to measure. Item counts grow geometrically from 1 by a
//! factor of 10; for each count, every load factor is measured in list order.

/// Load factors measured for every item count, in report order.
pub const LOAD_FACTORS: [f64; 8] = [0.5, 0.75, 0.9, 1.0, 2.0, 4.0, 8.0, 16.0];

/// Largest item count in the full sweep.
pub const MAX_ITEMS: u64 = 10_000_000;

/// Size of the integer universe datasets are drawn from.
///
/// Every dataset holds distinct values from `[1, SAMPLE_UNIVERSE]`, so no
/// sweep point may ask for more items than this.
pub const SAMPLE_UNIVERSE: u64 = 100_000_000;

/// One configuration of the sweep: how many distinct items to feed the table
/// under test, and the load factor it is built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Number of distinct integers fed to the table under test.
    pub items: u64,
    /// Load factor passed to the table under test.
    pub load_factor: f64,
}

/// Iterator over the sweep grid: item counts outer, load factors inner.
///
/// The grid is lazy, finite, and restartable — cloning yields an independent
/// iterator positioned at the same point.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    items: u64,
    max_items: u64,
    factor_idx: usize,
    done: bool,
}

impl SweepGrid {
    /// The full grid: 8 item counts x 8 load factors = 64 points.
    pub fn full() -> Self {
        Self::up_to(MAX_ITEMS)
    }

    /// Grid truncated to item counts `<= max_items`; used for smoke runs.
    pub fn up_to(max_items: u64) -> Self {
        Self {
            items: 1,
            max_items,
            factor_idx: 0,
            done: max_items < 1,
        }
    }
}

impl Iterator for SweepGrid {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<SweepPoint> {
        if self.done {
            return None;
        }
        let point = SweepPoint {
            items: self.items,
            load_factor: LOAD_FACTORS[self.factor_idx],
        };
        self.factor_idx += 1;
        if self.factor_idx == LOAD_FACTORS.len() {
            self.factor_idx = 0;
            match self.items.checked_mul(10) {
                Some(next) if next <= self.max_items => self.items = next,
                _ => self.done = true,
            }
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Count remaining decades; items <= max_items holds while !done.
        let mut decades = 0usize;
        let mut n = self.items;
        while n <= self.max_items {
            decades += 1;
            match n.checked_mul(10) {
                Some(next) => n = next,
                None => break,
            }
        }
        let remaining = decades * LOAD_FACTORS.len() - self.factor_idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SweepGrid {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_grid_has_64_points() {
        let points: Vec<_> = SweepGrid::full().collect();
        assert_eq!(points.len(), 64);
        assert_eq!(SweepGrid::full().len(), 64);
    }

    #[test]
    fn items_outer_load_factor_inner() {
        let points: Vec<_> = SweepGrid::full().collect();

        // First block: items = 1 across all load factors, in list order.
        for (i, &alpha) in LOAD_FACTORS.iter().enumerate() {
            assert_eq!(points[i].items, 1);
            assert_eq!(points[i].load_factor, alpha);
        }

        // Second block starts the next decade.
        assert_eq!(points[8].items, 10);
        assert_eq!(points[8].load_factor, 0.5);

        // Last point of the sweep.
        let last = points.last().unwrap();
        assert_eq!(last.items, MAX_ITEMS);
        assert_eq!(last.load_factor, 16.0);
    }

    #[test]
    fn item_counts_are_powers_of_ten() {
        let counts: Vec<u64> = SweepGrid::full()
            .map(|p| p.items)
            .collect::<Vec<_>>()
            .chunks(LOAD_FACTORS.len())
            .map(|chunk| chunk[0])
            .collect();
        assert_eq!(counts, vec![1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000]);
    }

    #[test]
    fn grid_is_restartable() {
        let first: Vec<_> = SweepGrid::full().collect();
        let second: Vec<_> = SweepGrid::full().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn truncated_grid() {
        let points: Vec<_> = SweepGrid::up_to(10).collect();
        assert_eq!(points.len(), 16);
        assert!(points.iter().all(|p| p.items <= 10));
        assert_eq!(SweepGrid::up_to(10).len(), 16);
    }

    #[test]
    fn empty_grid_below_one() {
        assert_eq!(SweepGrid::up_to(0).count(), 0);
    }

    #[test]
    fn size_hint_tracks_position() {
        let mut grid = SweepGrid::full();
        grid.next();
        grid.next();
        assert_eq!(grid.len(), 62);
    }
}
