use crate::protocols::qkd::bb84;
use crate::{BitFlipChannel, errors::ProtocolError};
use rand::Rng;

/// Repeats whole protocol runs and aggregates their sifted-key statistics.
///
/// The `Sampler` is the statistical counterpart of a single [`bb84::run`]:
/// it executes the exchange many times, with an optional channel and an
/// optional eavesdropper, and accumulates how many sifted bits diverged.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    /// Optional transmission channel; `None` means a noiseless exchange.
    pub channel: Option<BitFlipChannel>,
    /// Eve's equipment channel, if every qubit is intercepted.
    pub eavesdropper: Option<BitFlipChannel>,
}

/// Aggregate outcome of a batch of protocol runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleStats {
    /// Number of protocol runs executed.
    pub shots: usize,
    /// Total sifted bits across all runs.
    pub sifted_bits: usize,
    /// Total divergent sifted bits across all runs.
    pub mismatched_bits: usize,
}

impl SampleStats {
    /// Empirical quantum bit error rate over the batch, in percent.
    pub fn qber(&self) -> f64 {
        if self.sifted_bits == 0 {
            0.0
        } else {
            (self.mismatched_bits as f64 / self.sifted_bits as f64) * 100.0
        }
    }
}

impl Sampler {
    /// Creates a sampler for a noiseless, eavesdropper-free exchange.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transmission channel.
    pub fn with_channel(mut self, channel: BitFlipChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Routes every run through an eavesdropper with the given equipment
    /// channel.
    pub fn with_eavesdropper(mut self, eve_channel: BitFlipChannel) -> Self {
        self.eavesdropper = Some(eve_channel);
        self
    }

    /// Runs the protocol `num_shots` times with `num_qubits` per run,
    /// accumulating sifted-bit mismatch counts.
    pub fn run<R: Rng>(
        &self,
        num_qubits: usize,
        num_shots: usize,
        rng: &mut R,
    ) -> Result<SampleStats, ProtocolError> {
        let mut sifted_bits = 0;
        let mut mismatched_bits = 0;

        for _ in 0..num_shots {
            let comparison = match &self.eavesdropper {
                Some(eve_channel) => {
                    bb84::run_with_eavesdropper(num_qubits, eve_channel, rng)?
                        .run
                        .comparison
                }
                None => {
                    let channel = self.channel.unwrap_or_else(BitFlipChannel::noiseless);
                    bb84::run(num_qubits, &channel, rng)?.comparison
                }
            };

            sifted_bits += comparison.len_a;
            mismatched_bits += comparison.mismatches;
        }

        Ok(SampleStats {
            shots: num_shots,
            sifted_bits,
            mismatched_bits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn noiseless_batch_has_zero_qber() {
        let mut rng = StdRng::seed_from_u64(20);
        let stats = Sampler::new().run(64, 50, &mut rng).unwrap();

        assert_eq!(stats.shots, 50);
        assert!(stats.sifted_bits > 0);
        assert_eq!(stats.mismatched_bits, 0);
        assert_eq!(stats.qber(), 0.0);
    }

    #[test]
    fn qber_is_monotone_in_the_channel_error_rate() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut previous = 0.0;

        for rate in [0.0, 0.075, 0.2, 0.4] {
            let channel = BitFlipChannel::new(rate).unwrap();
            let stats = Sampler::new()
                .with_channel(channel)
                .run(128, 100, &mut rng)
                .unwrap();

            assert!(
                stats.qber() >= previous,
                "qber {} at rate {rate} below {previous}",
                stats.qber()
            );
            previous = stats.qber();
        }
    }

    #[test]
    fn eavesdropping_raises_qber_above_a_quiet_channel() {
        let mut rng = StdRng::seed_from_u64(22);

        let quiet = Sampler::new().run(128, 100, &mut rng).unwrap();
        let tapped = Sampler::new()
            .with_eavesdropper(BitFlipChannel::noiseless())
            .run(128, 100, &mut rng)
            .unwrap();

        assert!(tapped.qber() > quiet.qber());
        // Intercept-resend converges toward 25% on sifted bits.
        assert!(
            (tapped.qber() - 25.0).abs() < 3.0,
            "eavesdropped qber {} far from 25%",
            tapped.qber()
        );
    }
}
