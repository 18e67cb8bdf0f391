use crate::core::errors::ChannelError;
use crate::core::state::QubitState;
use rand::Rng;

/// A classical bit-flip channel acting on transmitted qubits.
///
/// Each qubit is disturbed independently: with probability `error_rate`
/// its value is flipped within whichever basis it currently occupies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitFlipChannel {
    error_rate: f64,
}

impl BitFlipChannel {
    pub fn new(error_rate: f64) -> Result<Self, ChannelError> {
        validate_prob(error_rate)?;
        Ok(Self { error_rate })
    }

    /// A channel that passes every qubit through untouched.
    pub fn noiseless() -> Self {
        Self { error_rate: 0.0 }
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Disturbs a single qubit, consuming one uniform draw.
    pub fn disturb<R: Rng>(&self, state: QubitState, rng: &mut R) -> QubitState {
        if rng.random::<f64>() < self.error_rate {
            state.flipped()
        } else {
            state
        }
    }

    /// Sends a sequence through the channel, one independent draw per slot
    /// in ascending index order.
    ///
    /// The input is left untouched so callers can keep the pre-noise
    /// sequence for bookkeeping.
    pub fn transmit<R: Rng>(&self, states: &[QubitState], rng: &mut R) -> Vec<QubitState> {
        states.iter().map(|&s| self.disturb(s, rng)).collect()
    }
}

/// Validate probability parameter
fn validate_prob(p: f64) -> Result<(), ChannelError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ChannelError::InvalidProbability(p));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Basis;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rejects_out_of_range_rates() {
        assert_eq!(
            BitFlipChannel::new(-0.1),
            Err(ChannelError::InvalidProbability(-0.1))
        );
        assert_eq!(
            BitFlipChannel::new(1.5),
            Err(ChannelError::InvalidProbability(1.5))
        );
        assert!(BitFlipChannel::new(0.0).is_ok());
        assert!(BitFlipChannel::new(1.0).is_ok());
    }

    #[test]
    fn zero_rate_passes_through() {
        let mut rng = StdRng::seed_from_u64(3);
        let channel = BitFlipChannel::noiseless();
        let states: Vec<_> = (0..64)
            .map(|i| QubitState::encode(i % 2 == 0, Basis::Rectilinear))
            .collect();

        assert_eq!(channel.transmit(&states, &mut rng), states);
    }

    #[test]
    fn unit_rate_flips_every_value() {
        let mut rng = StdRng::seed_from_u64(4);
        let channel = BitFlipChannel::new(1.0).unwrap();
        let states = vec![
            QubitState::encode(false, Basis::Rectilinear),
            QubitState::encode(true, Basis::Diagonal),
        ];

        let sent = channel.transmit(&states, &mut rng);
        assert_eq!(sent[0], QubitState::encode(true, Basis::Rectilinear));
        assert_eq!(sent[1], QubitState::encode(false, Basis::Diagonal));
    }

    #[test]
    fn disturbance_never_touches_the_basis() {
        let mut rng = StdRng::seed_from_u64(5);
        let channel = BitFlipChannel::new(0.5).unwrap();
        let states: Vec<_> = (0..256)
            .map(|i| {
                let basis = if i % 2 == 0 {
                    Basis::Rectilinear
                } else {
                    Basis::Diagonal
                };
                QubitState::encode(i % 3 == 0, basis)
            })
            .collect();

        let sent = channel.transmit(&states, &mut rng);
        for (before, after) in states.iter().zip(&sent) {
            assert_eq!(before.basis, after.basis);
        }
    }
}
