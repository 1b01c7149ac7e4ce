use crate::lattice::square_lattice::SquareLattice;

/// Nearest neighbour Ising energy with unit ferromagnetic coupling, E = -sum_<ij> s_i s_j.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsingEnergy;

impl IsingEnergy {
    /// Each site contributes `-s * (sum of its 4 neighbours)`; every bond is seen from both
    /// ends, hence the halving. O(N^2), meant for initialisation and diagnostics.
    pub fn total_energy(&self, lattice: &SquareLattice) -> i64 {
        let double_counted = lattice
            .get_all_indices()
            .into_iter()
            .map(|(i, j)| lattice.get(i, j) as i64 * lattice.sum_neighbouring_spins(i, j))
            .sum::<i64>();
        -double_counted / 2
    }

    /// Energy change if the spin at `(row, col)` were flipped. The lattice is not touched.
    pub fn flip_energy_delta(&self, lattice: &SquareLattice, row: usize, col: usize) -> i64 {
        2 * lattice.get(row, col) as i64 * lattice.sum_neighbouring_spins(row, col)
    }

    pub fn total_energy_per_site(&self, lattice: &SquareLattice) -> f64 {
        self.total_energy(lattice) as f64 / lattice.number_sites() as f64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    //  1, -1,  1
    //  1,  1,  1
    // -1, -1,  1
    fn build_square_test_lattice() -> SquareLattice {
        SquareLattice::from_rows(vec![vec![1, -1, 1], vec![1, 1, 1], vec![-1, -1, 1]]).unwrap()
    }

    fn build_4x4_test_lattice() -> SquareLattice {
        SquareLattice::from_rows(vec![
            vec![1, 1, -1, 1],
            vec![-1, 1, 1, 1],
            vec![-1, -1, 1, -1],
            vec![1, -1, -1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn energy_of_test_lattice() {
        assert_eq!(IsingEnergy.total_energy(&build_square_test_lattice()), -2);
    }

    #[test]
    fn energy_two_by_two_all_up() {
        // every site sees 4 aligned neighbours: 4 * -4 / 2
        let lattice = SquareLattice::new_with_ones(2).unwrap();
        assert_eq!(IsingEnergy.total_energy(&lattice), -8);
    }

    #[test]
    fn energy_checkerboard_4x4() {
        // all 32 bonds anti-aligned: -(16 * -4) / 2
        let lattice = SquareLattice::checkerboard(4).unwrap();
        assert_eq!(IsingEnergy.total_energy(&lattice), 32);
    }

    #[test]
    fn energy_all_up_is_ground_state() {
        let lattice = SquareLattice::new_with_ones(10).unwrap();
        assert_eq!(IsingEnergy.total_energy(&lattice), -200);
        approx::assert_relative_eq!(
            IsingEnergy.total_energy_per_site(&lattice),
            -2.,
            epsilon = f64::EPSILON
        );
    }

    #[test]
    fn energy_is_flip_symmetric() {
        let mut lattice = build_4x4_test_lattice();
        let before = IsingEnergy.total_energy(&lattice);
        lattice.flip_all();
        assert_eq!(IsingEnergy.total_energy(&lattice), before);
    }

    #[test]
    fn energy_is_idempotent() {
        let lattice = SquareLattice::new(8, &mut SmallRng::seed_from_u64(9)).unwrap();
        let first = IsingEnergy.total_energy(&lattice);
        let second = IsingEnergy.total_energy(&lattice);
        assert_eq!(first, second);
    }

    #[test]
    fn flip_energy_delta_of_test_lattice() {
        let lattice = build_square_test_lattice();

        assert_eq!(IsingEnergy.flip_energy_delta(&lattice, 0, 0), 0);
        assert_eq!(IsingEnergy.flip_energy_delta(&lattice, 0, 2), 4);
        assert_eq!(IsingEnergy.flip_energy_delta(&lattice, 1, 2), 8);
        assert_eq!(IsingEnergy.flip_energy_delta(&lattice, 0, 1), -4);
    }

    #[test]
    fn flip_energy_delta_matches_brute_force() {
        let lattice = build_4x4_test_lattice();
        let before = IsingEnergy.total_energy(&lattice);

        for (i, j) in lattice.get_all_indices() {
            let delta = IsingEnergy.flip_energy_delta(&lattice, i, j);
            let mut flipped = lattice.clone();
            flipped.flip(i, j);
            let after = IsingEnergy.total_energy(&flipped);

            assert_eq!(
                delta,
                after - before,
                "Energy delta of flipping ({i}, {j}) not matching brute force."
            );
        }
    }

    #[test]
    fn flip_energy_delta_is_bounded() {
        let lattice = SquareLattice::new(12, &mut SmallRng::seed_from_u64(21)).unwrap();
        for (i, j) in lattice.get_all_indices() {
            let delta = IsingEnergy.flip_energy_delta(&lattice, i, j);
            assert!(
                [-8, -4, 0, 4, 8].contains(&delta),
                "Unexpected delta {delta} at ({i}, {j})"
            );
        }
    }

    #[test]
    fn flip_energy_delta_does_not_mutate() {
        let lattice = build_4x4_test_lattice();
        let copy = lattice.clone();
        for (i, j) in lattice.get_all_indices() {
            IsingEnergy.flip_energy_delta(&lattice, i, j);
        }
        assert!(lattice.is_state_equal(&copy));
    }
}
