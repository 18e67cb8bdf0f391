use rand::Rng;

/// One of the two mutually unbiased bases BB84 uses.
///
/// `Rectilinear` is the computational (Z) basis {|0>, |1>},
/// `Diagonal` is the Hadamard (X) basis {|+>, |->}.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    Rectilinear,
    Diagonal,
}

impl Basis {
    /// Draws a basis uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }
}

/// The encoding of one classical bit under one basis.
///
/// A `QubitState` always carries exactly one basis and one value; no
/// superposition of bases is representable. The four reachable states are
/// Rectilinear/false ≡ |0>, Rectilinear/true ≡ |1>, Diagonal/false ≡ |+>
/// and Diagonal/true ≡ |->. States are plain value objects: copying one
/// yields an independent qubit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QubitState {
    pub basis: Basis,
    pub value: bool,
}

impl QubitState {
    /// Prepares a qubit carrying `bit` in `basis`. Deterministic.
    pub fn encode(bit: bool, basis: Basis) -> Self {
        Self { basis, value: bit }
    }

    /// Returns the state with its value flipped within its own basis.
    ///
    /// A bit-flip disturbance acts identically regardless of preparation
    /// basis, so the basis field is preserved.
    pub fn flipped(self) -> Self {
        Self {
            basis: self.basis,
            value: !self.value,
        }
    }

    /// Measures the qubit in `observe`, collapsing it.
    ///
    /// Matching basis reveals the encoded value with certainty. A
    /// mismatched basis projects onto an unbiased basis and yields a fair
    /// coin, independent of the encoded value. Takes the state by value:
    /// measurement is destructive and a state is measured at most once.
    pub fn measure<R: Rng>(self, observe: Basis, rng: &mut R) -> bool {
        if observe == self.basis {
            self.value
        } else {
            rng.random_bool(0.5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn encode_is_identity_on_its_fields() {
        for basis in [Basis::Rectilinear, Basis::Diagonal] {
            for bit in [false, true] {
                let state = QubitState::encode(bit, basis);
                assert_eq!(state.basis, basis);
                assert_eq!(state.value, bit);
            }
        }
    }

    #[test]
    fn matching_basis_measurement_is_certain() {
        let mut rng = StdRng::seed_from_u64(1);
        for basis in [Basis::Rectilinear, Basis::Diagonal] {
            for bit in [false, true] {
                for _ in 0..100 {
                    let state = QubitState::encode(bit, basis);
                    assert_eq!(state.measure(basis, &mut rng), bit);
                }
            }
        }
    }

    #[test]
    fn mismatched_basis_measurement_is_uniform() {
        let mut rng = StdRng::seed_from_u64(2);
        let trials = 10_000;

        let mut ones = 0;
        for _ in 0..trials {
            let state = QubitState::encode(false, Basis::Rectilinear);
            if state.measure(Basis::Diagonal, &mut rng) {
                ones += 1;
            }
        }

        let freq = ones as f64 / trials as f64;
        assert!(
            (freq - 0.5).abs() < 0.05,
            "outcome frequency {freq} not close to 0.5"
        );
    }

    #[test]
    fn flip_preserves_basis() {
        let state = QubitState::encode(true, Basis::Diagonal);
        let flipped = state.flipped();
        assert_eq!(flipped.basis, Basis::Diagonal);
        assert!(!flipped.value);
        assert_eq!(flipped.flipped(), state);
    }
}
