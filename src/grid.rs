/// A fixed-size 2D grid stored row-major, addressed by `(row, col)`.
///
/// Every grid produced by one generation run shares the same dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub height: usize,
    pub width: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(height: usize, width: usize, value: T) -> Self {
        Self {
            height,
            width,
            data: vec![value; width * height],
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.index(row, col)]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let idx = self.index(row, col);
        &mut self.data[idx]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Orthogonal neighbors inside the grid (up to 4; no wrapping).
    pub fn neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);
        if col > 0 {
            result.push((row, col - 1));
        }
        if col < self.width - 1 {
            result.push((row, col + 1));
        }
        if row > 0 {
            result.push((row - 1, col));
        }
        if row < self.height - 1 {
            result.push((row + 1, col));
        }
        result
    }

    /// Iterate over all cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let row = idx / self.width;
            let col = idx % self.width;
            (row, col, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates, row-major.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let row = idx / width;
            let col = idx % width;
            (row, col, val)
        })
    }

    /// The raw row-major cell slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut grid = Grid::new_with(2, 3, 0u8);
        grid.set(0, 2, 7);
        grid.set(1, 0, 9);
        assert_eq!(grid.as_slice(), &[0, 0, 7, 9, 0, 0]);
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = Grid::new_with(3, 3, 0u8);
        assert_eq!(grid.neighbors(0, 0).len(), 2);
        assert_eq!(grid.neighbors(0, 1).len(), 3);
        assert_eq!(grid.neighbors(1, 1).len(), 4);
        assert_eq!(grid.neighbors(2, 2).len(), 2);
    }

    #[test]
    fn test_iter_coordinates_match_get() {
        let mut grid = Grid::new_with(4, 5, 0u32);
        for (i, (row, col, _)) in grid.clone().iter().enumerate() {
            grid.set(row, col, i as u32);
        }
        for (row, col, &val) in grid.iter() {
            assert_eq!(val, (row * 5 + col) as u32);
        }
    }
}
