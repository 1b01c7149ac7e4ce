pub mod energy;
pub mod periodic;
pub mod square_lattice;

pub const SPIN_UP: i8 = 1;
pub const SPIN_DOWN: i8 = -1;

/// Row and column of a lattice site.
pub type SiteIdx = (usize, usize);

pub fn is_valid_spin(spin: i8) -> bool {
    spin == SPIN_UP || spin == SPIN_DOWN
}
