//! Dense, bounds-checked 3D grids.

use crate::error::{Error, Result};
use crate::geometry::BoxSize;
use std::ops::{Index, IndexMut};

/// Dense 3D array stored in X-major order.
///
/// Used both for per-part occupancy grids (`Grid3<VariantSet>`) and for the
/// global occupied-space grid (`Grid3<bool>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3<T> {
    size: BoxSize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid3<T> {
    /// Allocates a grid filled with `T::default()`.
    ///
    /// Fails with [`Error::GridAllocation`] if the cell count overflows or
    /// the allocation is refused.
    pub fn try_new(size: BoxSize) -> Result<Self> {
        let alloc_error = || Error::GridAllocation {
            x: size.x,
            y: size.y,
            z: size.z,
        };
        let len = size
            .x
            .checked_mul(size.y)
            .and_then(|n| n.checked_mul(size.z))
            .ok_or_else(alloc_error)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| alloc_error())?;
        cells.resize(len, T::default());

        Ok(Self { size, cells })
    }

    /// Resets every cell to `T::default()`.
    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }
}

impl<T> Grid3<T> {
    /// Returns the grid extents.
    pub fn size(&self) -> BoxSize {
        self.size
    }

    /// Returns the total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.size.x && y < self.size.y && z < self.size.z {
            Some((x * self.size.y + y) * self.size.z + z)
        } else {
            None
        }
    }

    /// Returns the cell at `(x, y, z)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        self.offset(x, y, z).map(|i| &self.cells[i])
    }

    /// Returns the cell at `(x, y, z)` mutably, or `None` when out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut T> {
        self.offset(x, y, z).map(move |i| &mut self.cells[i])
    }

    /// Iterates `((x, y, z), &cell)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), &T)> + '_ {
        let (sy, sz) = (self.size.y, self.size.z);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let z = i % sz;
            let y = (i / sz) % sy;
            let x = i / (sz * sy);
            ((x, y, z), cell)
        })
    }

    /// Counts the cells matching `pred`.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c)).count()
    }
}

impl<T> Index<(usize, usize, usize)> for Grid3<T> {
    type Output = T;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &T {
        match self.offset(x, y, z) {
            Some(i) => &self.cells[i],
            None => panic!("cell ({x}, {y}, {z}) outside {} grid", self.size),
        }
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Grid3<T> {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut T {
        match self.offset(x, y, z) {
            Some(i) => &mut self.cells[i],
            None => panic!("cell ({x}, {y}, {z}) outside {} grid", self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_default_filled() {
        let grid: Grid3<u8> = Grid3::try_new(BoxSize::new(2, 3, 4)).unwrap();
        assert_eq!(grid.len(), 24);
        assert_eq!(grid.count(|&c| c == 0), 24);
    }

    #[test]
    fn test_get_and_index() {
        let mut grid: Grid3<bool> = Grid3::try_new(BoxSize::new(2, 3, 4)).unwrap();
        grid[(1, 2, 3)] = true;
        assert_eq!(grid.get(1, 2, 3), Some(&true));
        assert_eq!(grid.get(2, 0, 0), None);
        assert_eq!(grid.count(|&c| c), 1);

        let found: Vec<_> = grid.iter().filter(|(_, &c)| c).map(|(p, _)| p).collect();
        assert_eq!(found, vec![(1, 2, 3)]);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds() {
        let grid: Grid3<bool> = Grid3::try_new(BoxSize::cube(2)).unwrap();
        let _ = grid[(0, 0, 2)];
    }

    #[test]
    fn test_overflowing_size_is_an_error() {
        let result: Result<Grid3<bool>> = Grid3::try_new(BoxSize::cube(usize::MAX));
        assert!(matches!(result, Err(Error::GridAllocation { .. })));
    }

    #[test]
    fn test_clear() {
        let mut grid: Grid3<u32> = Grid3::try_new(BoxSize::cube(2)).unwrap();
        grid[(0, 1, 0)] = 7;
        grid.clear();
        assert_eq!(grid.count(|&c| c != 0), 0);
    }
}
