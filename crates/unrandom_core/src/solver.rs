//! Incremental state reconstruction for the reference generator
//!
//! The generator's state obeys `s_i = s_{i-3} + s_{i-31} (mod 2^32)` while
//! its outputs are `o_i = s_i >> 1`. Carrying the recurrence down to the
//! outputs gives
//!
//! ```text
//! o_i = o_{i-3} + o_{i-31} + (s_{i-3} mod 2) * (s_{i-31} mod 2)  (mod 2^31)
//! ```
//!
//! so whenever an observed output exceeds the additive prediction by one,
//! both source words must have been odd. Every state parity is a fixed
//! GF(2) combination of the 31 initial parities, so each such carry event
//! yields two linear equations over those unknowns. Once 31 independent
//! equations have accumulated, the initial parities are solved, projected
//! forward onto the 31 most recent outputs, and the full 32-bit state words
//! are reassembled.

use crate::generator::{ReferenceGenerator, StateTable, RAW_OUTPUT_OFFSET, STATE_WORDS};
use crate::matrix::BitMatrix32;
use crate::queue::CyclicQueue;

/// Rank at which the initial-parity system becomes uniquely solvable.
const SOLVABLE_RANK: u32 = 31;

/// Reconstructs a [`ReferenceGenerator`] from its output stream.
///
/// Feed outputs in the exact order the target generator produced them; the
/// solver has no way to detect gaps or reordering. On the feed that
/// completes the equation system, [`Solver::feed`] returns a generator
/// whose state table equals the target's and whose future outputs match it
/// bit for bit. The solver is not meant to be reused afterwards.
///
/// Driving the solver on values that did not come from a TYPE_3 generator
/// violates its invariants; debug builds assert, release builds may return
/// an arbitrary generator.
#[derive(Debug, Clone)]
pub struct Solver {
    /// The 31 most recent observed outputs.
    history: CyclicQueue<u32, STATE_WORDS>,
    /// Symbolic parities of the current-generation state words, each a
    /// GF(2) selector over the 31 initial parities.
    parity: CyclicQueue<u32, STATE_WORDS>,
    matrix: BitMatrix32,
    rank: u32,
}

impl Solver {
    /// A solver ready to be fed output.
    ///
    /// The parity window is rolled forward through the seed-extension and
    /// warm-up schedule of the reference generator, so its 31 slots line up
    /// with the state words a freshly seeded target actually retains.
    pub fn new() -> Self {
        let mut parity: CyclicQueue<u32, STATE_WORDS> = CyclicQueue::new();
        for k in 0..STATE_WORDS {
            parity.push(1 << k);
        }
        for _ in STATE_WORDS..34 {
            let oldest = parity.front();
            parity.pop_and_push(oldest);
        }
        for _ in 34..RAW_OUTPUT_OFFSET {
            let next = parity.get(-3) ^ parity.get(-31);
            parity.pop_and_push(next);
        }

        Self {
            history: CyclicQueue::new(),
            parity,
            matrix: BitMatrix32::new(),
            rank: 0,
        }
    }

    /// Consume one generator output.
    ///
    /// Returns the reconstructed generator on the call that completes the
    /// equation system, `None` before that.
    pub fn feed(&mut self, value: u32) -> Option<ReferenceGenerator> {
        debug_assert!(value <= ReferenceGenerator::MAX);

        if self.history.len() < STATE_WORDS {
            // Warm-up: fill the output window, keeping the parity window in
            // lockstep with the states behind the observed values.
            self.history.push(value);
            let next = self.parity.get(-3) ^ self.parity.get(-31);
            self.parity.pop_and_push(next);
            return None;
        }

        let o3 = self.history.get(-3);
        let o31 = self.history.get(-31);
        let q3 = self.parity.get(-3);
        let q31 = self.parity.get(-31);

        self.history.pop_and_push(value);
        self.parity.pop_and_push(q3 ^ q31);

        let expected = o3.wrapping_add(o31) & ReferenceGenerator::MAX;
        if value != expected {
            // The only other possibility on genuine output is a carry out
            // of the discarded low bits, which pins both source parities.
            debug_assert_eq!(value, expected.wrapping_add(1) & ReferenceGenerator::MAX);

            if self.push_equation(q3, true) || self.push_equation(q31, true) {
                return Some(self.solve());
            }
        }

        None
    }

    /// Record the equation "the XOR of the initial parities selected by
    /// `coefficients` equals `parity`". Returns `true` once the system is
    /// solvable.
    fn push_equation(&mut self, coefficients: u32, parity: bool) -> bool {
        let row = coefficients | (u32::from(parity) << 31);
        self.rank += u32::from(self.matrix.push_row(row));
        self.rank == SOLVABLE_RANK
    }

    /// Rebuild the target generator from the solved system.
    fn solve(&self) -> ReferenceGenerator {
        debug_assert_eq!(self.rank, SOLVABLE_RANK);

        let mut parity_bits = self.solve_parities();
        let mut table = StateTable::new();
        for output in self.history.iter() {
            table.push((output << 1) | (parity_bits & 1));
            parity_bits >>= 1;
        }

        ReferenceGenerator::from_table(table)
    }

    /// Parities of the current-generation state words, oldest in the LSB.
    fn solve_parities(&self) -> u32 {
        debug_assert_eq!(self.rank, SOLVABLE_RANK);

        // At rank 31 each pivot row is fully reduced to its own diagonal
        // bit plus the affine bit, so the solution reads straight off
        // column 31.
        let mut initial = 0u32;
        for k in 0..BitMatrix32::SIZE {
            let row = self.matrix.row(k);
            debug_assert!(row.count_ones() <= 2);
            initial |= (row >> 31) << k;
        }

        let mut current = 0u32;
        for (i, coefficients) in self.parity.iter().enumerate() {
            current |= ((coefficients & initial).count_ones() & 1) << i;
        }
        current
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}
