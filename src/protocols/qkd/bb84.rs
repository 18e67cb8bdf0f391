//! BB84 Quantum Key Distribution Protocol.
//!
//! Alice encodes random bits in randomly chosen bases, the qubits cross a
//! noisy channel (optionally intercepted by Eve), Bob measures in his own
//! random bases, and both sides keep only the slots where bases agree.
//! Comparing the sifted keys reveals channel errors or an eavesdropper.

use crate::{Basis, BitFlipChannel, QubitState, errors::ProtocolError};
use rand::Rng;

/// The result of a BB84 run over a noisy channel.
pub struct RunResult {
    /// The number of qubits transmitted.
    pub raw_length: usize,
    /// Alice's random bits.
    pub alice_bits: Vec<bool>,
    /// Alice's encoding bases.
    pub alice_bases: Vec<Basis>,
    /// Bob's measurement bases.
    pub bob_bases: Vec<Basis>,
    /// Bob's measurement outcomes.
    pub bob_results: Vec<bool>,
    /// Alice's sifted key.
    pub alice_key: Vec<bool>,
    /// Bob's sifted key.
    pub bob_key: Vec<bool>,
    /// Comparison of the two sifted keys.
    pub comparison: KeyComparison,
}

/// The result of a BB84 run with an intercept-resend eavesdropper.
pub struct EveRunResult {
    /// The legitimate parties' view of the run.
    pub run: RunResult,
    /// Eve's measurement bases.
    pub eve_bases: Vec<Basis>,
    /// Eve's measurement outcomes. Diagnostic only, never available to
    /// Alice or Bob.
    pub eve_results: Vec<bool>,
}

/// Element-wise comparison of two equal-length sifted keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyComparison {
    pub equal: bool,
    pub len_a: usize,
    pub len_b: usize,
    /// Number of positions where the keys diverge.
    pub mismatches: usize,
}

impl KeyComparison {
    /// Quantum bit error rate over the compared bits, in percent.
    pub fn qber(&self) -> f64 {
        if self.len_a == 0 {
            0.0
        } else {
            (self.mismatches as f64 / self.len_a as f64) * 100.0
        }
    }
}

/// Eve's side of an interception: what she forwards and what she saw.
pub struct Intercept {
    /// The re-encoded qubits that continue to Bob.
    pub states: Vec<QubitState>,
    /// Eve's measurement outcome per slot.
    pub results: Vec<bool>,
}

/// Draws `n` uniform random bits.
pub fn random_bits<R: Rng>(n: usize, rng: &mut R) -> Vec<bool> {
    (0..n).map(|_| rng.random_bool(0.5)).collect()
}

/// Draws `n` uniform random basis choices.
pub fn random_bases<R: Rng>(n: usize, rng: &mut R) -> Vec<Basis> {
    (0..n).map(|_| Basis::random(rng)).collect()
}

/// Encodes each bit in the corresponding basis. Deterministic.
pub fn encode_message(bits: &[bool], bases: &[Basis]) -> Result<Vec<QubitState>, ProtocolError> {
    check_length("bases", bits.len(), bases.len())?;

    Ok(bits
        .iter()
        .zip(bases)
        .map(|(&bit, &basis)| QubitState::encode(bit, basis))
        .collect())
}

/// Measures each qubit in the corresponding basis, consuming the sequence.
pub fn measure_message<R: Rng>(
    states: Vec<QubitState>,
    bases: &[Basis],
    rng: &mut R,
) -> Result<Vec<bool>, ProtocolError> {
    check_length("bases", states.len(), bases.len())?;

    Ok(states
        .into_iter()
        .zip(bases)
        .map(|(state, &basis)| state.measure(basis, rng))
        .collect())
}

/// Simulates Eve measuring every qubit in flight and resending her own.
///
/// Per slot, strictly in order: measure an independent copy of the
/// original qubit in Eve's basis (the original slot stays unobserved for
/// audit logging), re-encode a fresh qubit from her result in her basis,
/// then pass it through her equipment's bit-flip channel. Whenever her
/// basis differs from Alice's, the forwarded qubit carries a basis
/// unrelated to the sender's, which is what makes the post-sift key
/// comparison reveal the interception statistically.
pub fn intercept<R: Rng>(
    states: &[QubitState],
    eve_bases: &[Basis],
    eve_channel: &BitFlipChannel,
    rng: &mut R,
) -> Result<Intercept, ProtocolError> {
    check_length("eve_bases", states.len(), eve_bases.len())?;

    let mut forwarded = Vec::with_capacity(states.len());
    let mut results = Vec::with_capacity(states.len());

    for (&state, &basis) in states.iter().zip(eve_bases) {
        // QubitState is a value object, so the binding above is already an
        // independent copy of the transmitted qubit.
        let result = state.measure(basis, rng);
        let resent = QubitState::encode(result, basis);

        forwarded.push(eve_channel.disturb(resent, rng));
        results.push(result);
    }

    Ok(Intercept {
        states: forwarded,
        results,
    })
}

/// Keeps `bits[i]`, in ascending index order, for every slot where the
/// two basis choices agree.
pub fn sift(
    bases_a: &[Basis],
    bases_b: &[Basis],
    bits: &[bool],
) -> Result<Vec<bool>, ProtocolError> {
    check_length("bases_b", bases_a.len(), bases_b.len())?;
    check_length("bits", bases_a.len(), bits.len())?;

    Ok(bases_a
        .iter()
        .zip(bases_b)
        .zip(bits)
        .filter(|((a, b), _)| a == b)
        .map(|(_, &bit)| bit)
        .collect())
}

/// Compares two sifted keys element-wise.
///
/// Both keys derive from the same sift mask, so unequal lengths are a
/// caller bug rather than a run outcome.
pub fn compare_keys(key_a: &[bool], key_b: &[bool]) -> Result<KeyComparison, ProtocolError> {
    check_length("key_b", key_a.len(), key_b.len())?;

    let mismatches = key_a.iter().zip(key_b).filter(|(a, b)| a != b).count();

    Ok(KeyComparison {
        equal: mismatches == 0,
        len_a: key_a.len(),
        len_b: key_b.len(),
        mismatches,
    })
}

/// Runs one BB84 exchange over `channel` with no eavesdropper.
pub fn run<R: Rng>(
    num_qubits: usize,
    channel: &BitFlipChannel,
    rng: &mut R,
) -> Result<RunResult, ProtocolError> {
    let alice_bits = random_bits(num_qubits, rng);
    let alice_bases = random_bases(num_qubits, rng);

    let message = encode_message(&alice_bits, &alice_bases)?;
    let message = channel.transmit(&message, rng);

    let bob_bases = random_bases(num_qubits, rng);
    let bob_results = measure_message(message, &bob_bases, rng)?;

    finish_run(
        alice_bits,
        alice_bases,
        bob_bases,
        bob_results,
        num_qubits,
    )
}

/// Runs one BB84 exchange with Eve intercepting every qubit.
///
/// Alice's bits and bases, Eve's bases and Bob's bases are four
/// independently drawn sequences. Eve's equipment channel is the only
/// disturbance source in this mode; there is no separate transmission
/// noise stage.
pub fn run_with_eavesdropper<R: Rng>(
    num_qubits: usize,
    eve_channel: &BitFlipChannel,
    rng: &mut R,
) -> Result<EveRunResult, ProtocolError> {
    let alice_bits = random_bits(num_qubits, rng);
    let alice_bases = random_bases(num_qubits, rng);

    let message = encode_message(&alice_bits, &alice_bases)?;

    let eve_bases = random_bases(num_qubits, rng);
    let interception = intercept(&message, &eve_bases, eve_channel, rng)?;

    let bob_bases = random_bases(num_qubits, rng);
    let bob_results = measure_message(interception.states, &bob_bases, rng)?;

    let run = finish_run(
        alice_bits,
        alice_bases,
        bob_bases,
        bob_results,
        num_qubits,
    )?;

    Ok(EveRunResult {
        run,
        eve_bases,
        eve_results: interception.results,
    })
}

/// Sifting and comparison stage shared by both run modes.
fn finish_run(
    alice_bits: Vec<bool>,
    alice_bases: Vec<Basis>,
    bob_bases: Vec<Basis>,
    bob_results: Vec<bool>,
    num_qubits: usize,
) -> Result<RunResult, ProtocolError> {
    let alice_key = sift(&alice_bases, &bob_bases, &alice_bits)?;
    let bob_key = sift(&alice_bases, &bob_bases, &bob_results)?;
    let comparison = compare_keys(&alice_key, &bob_key)?;

    Ok(RunResult {
        raw_length: num_qubits,
        alice_bits,
        alice_bases,
        bob_bases,
        bob_results,
        alice_key,
        bob_key,
        comparison,
    })
}

fn check_length(name: &'static str, expected: usize, got: usize) -> Result<(), ProtocolError> {
    if expected != got {
        return Err(ProtocolError::LengthMismatch {
            name,
            expected,
            got,
        });
    }
    Ok(())
}
