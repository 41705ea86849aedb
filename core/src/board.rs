use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Up to eight `(coords, value)` pairs around a cell.
pub type Neighbors<T> = SmallVec<[(Coord2, T); 8]>;

/// Fixed-size grid of cells, addressed by `(x, y)`.
///
/// The dimensions are set once at construction. Iteration through [`Board::iter`] is row-major (`y` outer, `x`
/// inner), which is the scan order every solver rule and tie-break relies on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board<T> {
    cells: Array2<T>,
    size: Coord2,
}

impl<T: Copy> Board<T> {
    pub fn filled(size: Coord2, value: T) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            cells: Array2::from_elem(size.to_nd_index(), value),
            size,
        })
    }

    pub fn from_fn(size: Coord2, mut f: impl FnMut(Coord2) -> T) -> Result<Self> {
        check_size(size)?;
        // in-bounds indices always fit back into `Coord`
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| f((x as Coord, y as Coord)));
        Ok(Self { cells, size })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn in_bounds(&self, (x, y): Coord2) -> bool {
        x < self.size.0 && y < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<T> {
        self.validate_coords(coords).map(|coords| self[coords])
    }

    pub fn set(&mut self, coords: Coord2, value: T) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self[coords] = value;
        Ok(())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    /// Adjacent cells with their values; empty when `coords` is out of bounds.
    pub fn neighbors(&self, coords: Coord2) -> Neighbors<T> {
        if !self.in_bounds(coords) {
            return SmallVec::new();
        }
        self.iter_neighbors(coords)
            .map(|pos| (pos, self[pos]))
            .collect()
    }

    pub fn count_neighbors(&self, coords: Coord2, mut pred: impl FnMut(T) -> bool) -> u8 {
        // never more than eight
        self.iter_neighbors(coords)
            .filter(|&pos| pred(self[pos]))
            .count() as u8
    }

    /// Every cell with its coordinates, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, T)> + '_ {
        let (width, height) = self.size;
        (0..height).flat_map(move |y| (0..width).map(move |x| ((x, y), self[(x, y)])))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<T> {
        let (width, height) = self.size;
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn count(&self, mut pred: impl FnMut(T) -> bool) -> CellCount {
        // bounded by total_cells, which fits
        self.cells.iter().filter(|&&cell| pred(cell)).count() as CellCount
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(T) -> U) -> Board<U> {
        Board {
            cells: self.cells.map(|&cell| f(cell)),
            size: self.size,
        }
    }

    pub fn map_indexed<U: Copy>(&self, mut f: impl FnMut(Coord2, T) -> U) -> Board<U> {
        let cells = Array2::from_shape_fn(self.size.to_nd_index(), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            f(coords, self[coords])
        });
        Board {
            cells,
            size: self.size,
        }
    }
}

fn check_size((width, height): Coord2) -> Result<()> {
    if width == 0 || height == 0 {
        Err(GameError::InvalidSize)
    } else {
        Ok(())
    }
}

impl<T> Index<Coord2> for Board<T> {
    type Output = T;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl<T> IndexMut<Coord2> for Board<T> {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(Board::filled((0, 3), 0u8), Err(GameError::InvalidSize));
        assert_eq!(Board::filled((3, 0), 0u8), Err(GameError::InvalidSize));
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut board = Board::filled((3, 2), 0u8).unwrap();

        board.set((2, 1), 7).unwrap();

        assert_eq!(board.get((2, 1)), Ok(7));
        assert_eq!(board.get((3, 1)), Err(GameError::InvalidCoords));
        assert_eq!(board.set((0, 2), 1), Err(GameError::InvalidCoords));
        assert!(board.in_bounds((2, 1)));
        assert!(!board.in_bounds((2, 2)));
    }

    #[test]
    fn neighbors_report_values() {
        let board = Board::from_fn((3, 3), |(x, y)| x + 10 * y).unwrap();

        let around = board.neighbors((0, 2));

        assert_eq!(around.as_slice(), &[((0, 1), 10), ((1, 1), 11), ((1, 2), 21)]);
        assert!(board.neighbors((5, 5)).is_empty());
    }

    #[test]
    fn iter_is_row_major() {
        let board = Board::from_fn((2, 2), |coords| coords).unwrap();

        let order: Vec<_> = board.iter().map(|(coords, _)| coords).collect();

        assert_eq!(order, [(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(board.coords().collect::<Vec<_>>(), order);
    }

    #[test]
    fn clone_is_independent() {
        let board = Board::filled((2, 2), false).unwrap();
        let mut copy = board.clone();

        copy[(1, 1)] = true;

        assert!(!board[(1, 1)]);
        assert_eq!(copy.count(|cell| cell), 1);
    }
}
