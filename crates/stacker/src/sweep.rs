//! Diagonal-sweep coordinate order.
//!
//! Coordinates are visited in non-decreasing order of `x + y + z`. Within one
//! layer the order is ascending `x + y`, then ascending `x`. Every coordinate
//! of the box is produced exactly once, so the sequence is finite and can be
//! restarted from any position by constructing a new sweep.

use pstack_core::BoxSize;

/// Iterator over every coordinate of a box in diagonal-sweep order.
#[derive(Debug, Clone)]
pub struct DiagonalSweep {
    extent: BoxSize,
    /// Current layer, `x + y + z`.
    s: usize,
    /// Current `x + y` within the layer.
    r: usize,
    x: usize,
    done: bool,
}

impl DiagonalSweep {
    /// Creates a sweep over `0..extent.x` × `0..extent.y` × `0..extent.z`.
    pub fn new(extent: BoxSize) -> Self {
        Self {
            extent,
            s: 0,
            r: 0,
            x: 0,
            done: extent.is_empty(),
        }
    }

    /// Number of layers, i.e. one past the largest `x + y + z`.
    pub fn layer_count(extent: BoxSize) -> usize {
        if extent.is_empty() {
            0
        } else {
            extent.x + extent.y + extent.z - 2
        }
    }

    fn r_range(&self, s: usize) -> (usize, usize) {
        let lo = s.saturating_sub(self.extent.z - 1);
        let hi = s.min(self.extent.x - 1 + self.extent.y - 1);
        (lo, hi)
    }

    fn x_range(&self, r: usize) -> (usize, usize) {
        let lo = r.saturating_sub(self.extent.y - 1);
        let hi = r.min(self.extent.x - 1);
        (lo, hi)
    }

    /// Advances to the first coordinate of layer `self.s`, or to the end.
    fn enter_layer(&mut self) {
        if self.s >= Self::layer_count(self.extent) {
            self.done = true;
            return;
        }
        self.r = self.r_range(self.s).0;
        self.x = self.x_range(self.r).0;
    }
}

impl Iterator for DiagonalSweep {
    type Item = (usize, usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = (self.x, self.r - self.x, self.s - self.r);

        if self.x < self.x_range(self.r).1 {
            self.x += 1;
        } else if self.r < self.r_range(self.s).1 {
            self.r += 1;
            self.x = self.x_range(self.r).0;
        } else {
            self.s += 1;
            self.enter_layer();
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_visits_every_cell_once() {
        let extent = BoxSize::new(3, 4, 2);
        let coords: Vec<_> = DiagonalSweep::new(extent).collect();
        assert_eq!(coords.len(), 24);

        let unique: HashSet<_> = coords.iter().copied().collect();
        assert_eq!(unique.len(), 24);
        assert!(coords
            .iter()
            .all(|&(x, y, z)| x < extent.x && y < extent.y && z < extent.z));
    }

    #[test]
    fn test_layers_non_decreasing() {
        let coords: Vec<_> = DiagonalSweep::new(BoxSize::new(5, 2, 3)).collect();
        for pair in coords.windows(2) {
            let a = pair[0].0 + pair[0].1 + pair[0].2;
            let b = pair[1].0 + pair[1].1 + pair[1].2;
            assert!(a <= b);
        }
    }

    #[test]
    fn test_order_within_layer() {
        let coords: Vec<_> = DiagonalSweep::new(BoxSize::cube(3)).take(4).collect();
        // Layer 0, then layer 1 with z descending as x + y grows.
        assert_eq!(coords, vec![(0, 0, 0), (0, 0, 1), (0, 1, 0), (1, 0, 0)]);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(DiagonalSweep::new(BoxSize::new(0, 4, 4)).count(), 0);
        assert_eq!(
            DiagonalSweep::new(BoxSize::cube(1)).collect::<Vec<_>>(),
            vec![(0, 0, 0)]
        );
        assert_eq!(DiagonalSweep::layer_count(BoxSize::cube(1)), 1);
    }
}
