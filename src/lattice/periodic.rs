use crate::errors::{IsingError, Result};
use crate::lattice::SiteIdx;

/// Maps arbitrary integer offsets onto `[0, dimension)` with toroidal wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicIndex {
    dimension: usize,
}

impl PeriodicIndex {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 || dimension > isize::MAX as usize {
            return Err(IsingError::InvalidDimension(dimension));
        }
        Ok(PeriodicIndex { dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Mathematical modulo, so negative offsets land in the upper part of the range (-1 -> n-1).
    pub fn wrap(&self, offset: isize) -> usize {
        offset.rem_euclid(self.dimension as isize) as usize
    }

    /// The four nearest neighbours of `(row, col)` in the order north, west, south, east.
    pub fn neighbours(&self, row: usize, col: usize) -> [SiteIdx; 4] {
        let (row, col) = (row as isize, col as isize);
        [
            (self.wrap(row - 1), col as usize),
            (row as usize, self.wrap(col - 1)),
            (self.wrap(row + 1), col as usize),
            (row as usize, self.wrap(col + 1)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn periodic_index_rejects_zero_dimension() {
        assert!(matches!(
            PeriodicIndex::new(0),
            Err(IsingError::InvalidDimension(0))
        ));
    }

    #[test]
    fn periodic_index_wraps_minus_one() {
        let index = PeriodicIndex::new(100).unwrap();
        assert_eq!(index.wrap(-1), 99);
        assert_eq!(index.wrap(100), 0);
        assert_eq!(index.wrap(0), 0);
        assert_eq!(index.wrap(42), 42);
    }

    #[test]
    fn periodic_index_stays_in_range() {
        for dimension in [1, 2, 3, 7, 100] {
            let index = PeriodicIndex::new(dimension).unwrap();
            for offset in [
                isize::MIN,
                isize::MIN + 1,
                -1_000_003,
                -101,
                -1,
                0,
                1,
                99,
                1_000_003,
                isize::MAX,
            ] {
                let wrapped = index.wrap(offset);
                assert!(
                    wrapped < dimension,
                    "wrap({offset}) = {wrapped} not below {dimension}"
                );
            }
        }
    }

    #[test]
    fn periodic_index_is_periodic() {
        for dimension in [2usize, 5, 16] {
            let index = PeriodicIndex::new(dimension).unwrap();
            let n = dimension as isize;
            for offset in -40..40 {
                for k in -5..5 {
                    assert_eq!(
                        index.wrap(offset),
                        index.wrap(offset + k * n),
                        "Periodicity broken for offset {offset}, k {k}, n {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn periodic_index_neighbours_of_corner() {
        let index = PeriodicIndex::new(3).unwrap();
        assert_eq!(index.neighbours(0, 0), [(2, 0), (0, 2), (1, 0), (0, 1)]);
        assert_eq!(index.neighbours(2, 2), [(1, 2), (2, 1), (0, 2), (2, 0)]);
    }

    #[test]
    fn periodic_index_two_by_two_neighbours_repeat() {
        // on a 2x2 torus north and south (and west and east) coincide
        let index = PeriodicIndex::new(2).unwrap();
        let neighbours = index.neighbours(0, 1);
        assert_eq!(neighbours[0], neighbours[2]);
        assert_eq!(neighbours[1], neighbours[3]);
        let distinct: HashSet<SiteIdx> = HashSet::from_iter(neighbours);
        assert_eq!(distinct, HashSet::from([(1, 1), (0, 0)]));
    }
}
