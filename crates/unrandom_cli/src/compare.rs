//! Reference-sequence comparison
//!
//! Checks the stepped generator against the independently computed raw
//! additive sequence, printing the first few peeked states and their
//! parities for inspection. A mismatch anywhere is a modeling bug.

use std::process::ExitCode;
use unrandom_core::{raw_sequence, ReferenceGenerator, RAW_OUTPUT_OFFSET};

pub fn run(seed: u32, count: u64) -> ExitCode {
    if seed == 0 {
        println!("Please provide a non-zero seed");
        return ExitCode::FAILURE;
    }

    let raw = raw_sequence(seed, count as usize + RAW_OUTPUT_OFFSET);
    let mut gen = ReferenceGenerator::from_seed(seed);

    for i in 0..count {
        if i < 64 {
            let state = gen.peek_state();
            println!("[{i:02}] = {state:010} | {}", state % 2);
        }

        let expected = raw[i as usize + RAW_OUTPUT_OFFSET] >> 1;
        let generated = gen.advance();
        if generated != expected {
            println!("Mismatch from [{i}]: got {generated}, expected {expected}");
            return ExitCode::FAILURE;
        }
    }

    println!("All tested values matched the raw additive sequence");
    ExitCode::SUCCESS
}
