//! Reference model of glibc's default `random()` generator
//!
//! The default glibc configuration (TYPE_3) is an additive lagged-Fibonacci
//! register over 31 words of 32-bit state:
//!
//! ```text
//! s_i = s_{i-3} + s_{i-31}  (mod 2^32)
//! ```
//!
//! seeded by a Park–Miller multiplicative step, extended by three copies,
//! and advanced 310 steps before any output is emitted. Each output is the
//! freshly generated state word with its low bit discarded, which is the
//! property the solver exploits.

use rand_core::{impls, RngCore};
use thiserror::Error;

use crate::queue::CyclicQueue;

/// Number of 32-bit words of generator state.
pub const STATE_WORDS: usize = 31;

/// The generator's cyclic state table.
pub type StateTable = CyclicQueue<u32, STATE_WORDS>;

/// Index into the conceptual additive sequence at which a freshly seeded
/// generator emits its first output.
pub const RAW_OUTPUT_OFFSET: usize = 344;

/// Park–Miller multiplier used during seed expansion.
const SEED_MULTIPLIER: i64 = 16807;

/// Park–Miller modulus (2^31 - 1) used during seed expansion.
const SEED_MODULUS: i64 = 2_147_483_647;

/// Errors from constructing a generator out of runtime data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("state table requires exactly {expected} words, got {actual}")]
    TableLength { expected: usize, actual: usize },
}

/// A faithful model of the glibc TYPE_3 `random()` generator.
///
/// Outputs are in `[0, 2^31)`; the internal state words span the full
/// 32-bit range. Seed 0 is unsupported: the Park–Miller expansion collapses
/// to the all-zero table and the output sequence degenerates (glibc itself
/// never selects it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceGenerator {
    table: StateTable,
}

impl ReferenceGenerator {
    /// Smallest possible output.
    pub const MIN: u32 = 0;

    /// Largest possible output, `2^31 - 1`.
    pub const MAX: u32 = u32::MAX >> 1;

    /// Construct from a nonzero seed, expanding and warming up the state
    /// the way glibc's `srandom()` does.
    pub fn from_seed(seed: u32) -> Self {
        let mut gen = Self {
            table: Self::table_from_seed(seed),
        };
        // Discard the first 310 states so the emitted sequence does not
        // reveal the seed words directly.
        for _ in 34..RAW_OUTPUT_OFFSET {
            gen.advance();
        }
        gen
    }

    /// Adopt a 31-word state table verbatim, with no warm-up.
    pub fn from_table(table: StateTable) -> Self {
        Self { table }
    }

    /// The next state word, without advancing.
    pub fn peek_state(&self) -> u32 {
        self.table.get(-3).wrapping_add(self.table.get(-31))
    }

    /// The next output, without advancing.
    pub fn peek_output(&self) -> u32 {
        self.peek_state() >> 1
    }

    /// Generate the next output, advancing the state by one word.
    pub fn advance(&mut self) -> u32 {
        let state = self.peek_state();
        self.table.pop_and_push(state);
        state >> 1
    }

    /// The internal state table, oldest word first.
    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// Seed expansion: Park–Miller from the seed word, then three copies
    /// that slide the window forward so the recurrence can take over.
    fn table_from_seed(seed: u32) -> StateTable {
        let mut table = StateTable::new();
        table.push(seed);
        for _ in 1..STATE_WORDS {
            // The previous word is reinterpreted as signed; seeds with the
            // high bit set produce negative remainders that must be fixed up.
            let prev = table.back() as i32 as i64;
            let mut value = (SEED_MULTIPLIER * prev) % SEED_MODULUS;
            if value < 0 {
                value += SEED_MODULUS;
            }
            table.push(value as u32);
        }
        for _ in 31..34 {
            let oldest = table.front();
            table.pop_and_push(oldest);
        }
        table
    }
}

impl TryFrom<&[u32]> for ReferenceGenerator {
    type Error = GeneratorError;

    fn try_from(words: &[u32]) -> Result<Self, Self::Error> {
        let words: [u32; STATE_WORDS] =
            words
                .try_into()
                .map_err(|_| GeneratorError::TableLength {
                    expected: STATE_WORDS,
                    actual: words.len(),
                })?;
        Ok(Self::from_table(StateTable::from(words)))
    }
}

impl RngCore for ReferenceGenerator {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The first `len` words of the conceptual additive sequence for `seed`:
/// Park–Miller expansion for words 0..31, the three-copy extension for
/// words 31..34, then the additive recurrence.
///
/// A freshly seeded [`ReferenceGenerator`] retains words
/// `RAW_OUTPUT_OFFSET - 31 .. RAW_OUTPUT_OFFSET` and its first output is
/// word `RAW_OUTPUT_OFFSET` shifted right by one.
pub fn raw_sequence(seed: u32, len: usize) -> Vec<u32> {
    let mut seq = Vec::with_capacity(len);
    if len == 0 {
        return seq;
    }
    seq.push(seed);
    for i in 1..len {
        let word = if i < 31 {
            let prev = seq[i - 1] as i32 as i64;
            let mut value = (SEED_MULTIPLIER * prev) % SEED_MODULUS;
            if value < 0 {
                value += SEED_MODULUS;
            }
            value as u32
        } else if i < 34 {
            seq[i - 31]
        } else {
            seq[i - 3].wrapping_add(seq[i - 31])
        };
        seq.push(word);
    }
    seq
}
