use crate::errors::{IsingError, Result};
use crate::lattice::periodic::PeriodicIndex;
use crate::lattice::{is_valid_spin, SiteIdx, SPIN_DOWN, SPIN_UP};
use itertools::iproduct;
use rand::distr::{Distribution, Uniform};
use std::fmt;

/// N x N grid of Ising spins with periodic boundaries in both directions.
#[derive(Debug, Clone)]
pub struct SquareLattice {
    width: usize,
    sites: Vec<Vec<i8>>,
    index: PeriodicIndex,
    uniform_dist: Uniform<usize>,
}

impl SquareLattice {
    /// Every spin is drawn independently from a fair coin.
    pub fn new<R: rand::Rng + ?Sized>(width: usize, rng: &mut R) -> Result<Self> {
        let mut lattice = Self::new_with_ones(width)?;
        for row in lattice.sites.iter_mut() {
            for spin in row.iter_mut() {
                *spin = if rng.random_bool(0.5) {
                    SPIN_UP
                } else {
                    SPIN_DOWN
                };
            }
        }
        Ok(lattice)
    }

    pub fn new_with_ones(width: usize) -> Result<Self> {
        if width < 2 {
            return Err(IsingError::LatticeTooSmall(width));
        }
        Ok(SquareLattice {
            width,
            sites: vec![vec![SPIN_UP; width]; width],
            index: PeriodicIndex::new(width)?,
            uniform_dist: Uniform::new(0, width)
                .map_err(|_| IsingError::LatticeTooSmall(width))?,
        })
    }

    /// spin(i, j) = +1 if i + j is even, -1 otherwise.
    pub fn checkerboard(width: usize) -> Result<Self> {
        let mut lattice = Self::new_with_ones(width)?;
        for (i, j) in lattice.get_all_indices() {
            if (i + j) % 2 == 1 {
                lattice.sites[i][j] = SPIN_DOWN;
            }
        }
        Ok(lattice)
    }

    pub fn from_rows(rows: Vec<Vec<i8>>) -> Result<Self> {
        let width = rows.len();
        let mut lattice = Self::new_with_ones(width)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(IsingError::NotSquare {
                    row,
                    len: values.len(),
                    width,
                });
            }
            let invalid = values.iter().enumerate().find(|(_, s)| !is_valid_spin(**s));
            if let Some((col, value)) = invalid {
                return Err(IsingError::InvalidSpin {
                    row,
                    col,
                    value: *value,
                });
            }
        }
        lattice.sites = rows;
        Ok(lattice)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn number_sites(&self) -> usize {
        self.width
            .checked_pow(2)
            .expect("Overflow when calculating the number of lattice sites for square lattice.")
    }

    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.sites[row][col]
    }

    pub fn flip(&mut self, row: usize, col: usize) {
        self.sites[row][col] *= -1;
        debug_assert!(is_valid_spin(self.sites[row][col]));
    }

    pub fn get_all_neighbour_values(&self, row: usize, col: usize) -> [i8; 4] {
        self.index
            .neighbours(row, col)
            .map(|(i, j)| self.sites[i][j])
    }

    pub fn sum_neighbouring_spins(&self, row: usize, col: usize) -> i64 {
        self.get_all_neighbour_values(row, col)
            .iter()
            .map(|s| *s as i64)
            .sum::<i64>()
    }

    pub fn get_all_indices(&self) -> Vec<SiteIdx> {
        iproduct!(0..self.width, 0..self.width).collect()
    }

    /// Row first, then column, each uniform over `[0, width)`.
    pub fn draw_random_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> SiteIdx {
        let row = self.uniform_dist.sample(rng);
        let col = self.uniform_dist.sample(rng);
        (row, col)
    }

    pub fn get_sum_of_spins(&self) -> i64 {
        self.sites
            .iter()
            .map(|v| v.iter().map(|s| *s as i64).sum::<i64>())
            .sum::<i64>()
    }

    /// Mean spin per site.
    pub fn get_magnetisation(&self) -> f64 {
        (self.get_sum_of_spins() as f64) / (self.number_sites() as f64)
    }

    pub fn all_spins_valid(&self) -> bool {
        self.sites.iter().flatten().all(|s| is_valid_spin(*s))
    }

    pub fn is_state_equal(&self, other: &Self) -> bool {
        self.sites == other.sites
    }

    pub fn flip_all(&mut self) {
        for (i, j) in self.get_all_indices() {
            self.flip(i, j);
        }
    }

    /// Read-only view of the grid, one `Vec` per row.
    pub fn rows(&self) -> &[Vec<i8>] {
        &self.sites
    }

    pub fn describe(&self) -> String {
        Self::description_for(self.width)
    }

    pub fn description_for(width: usize) -> String {
        format!(
            "{}x{} periodic square lattice with unit nearest neighbour coupling",
            width, width
        )
    }
}

/// Whitespace separated spins, one line per row.
impl fmt::Display for SquareLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.sites {
            let line = row
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
