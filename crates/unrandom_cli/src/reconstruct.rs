//! Reconstruction tester
//!
//! Seeds a reference generator, feeds the solver its outputs until a
//! generator comes back, and prints both state tables side by side for
//! manual verification. Exits nonzero if the reconstruction diverges from
//! the source.

use std::process::ExitCode;
use unrandom_core::{ReferenceGenerator, Solver};

pub fn run(seed: u32) -> ExitCode {
    if seed == 0 {
        println!("Please provide a non-zero seed");
        return ExitCode::FAILURE;
    }

    println!("testing seed: {seed}");

    let mut gen = ReferenceGenerator::from_seed(seed);
    let (samples, solved) = reconstruct(&mut gen);

    let matched = solved == gen;
    println!(
        "{} generator from seed {}",
        if matched {
            "reconstructed"
        } else {
            "failed to reconstruct"
        },
        seed
    );
    println!("from {samples} samples");

    println!("{:>3} {:>8} {:>8}", "pos", "source", "solved");
    let source_table = gen.table();
    let solved_table = solved.table();
    for i in 0..31isize {
        let pos = i - 30;
        println!(
            "{:>3} {:08X} {:08X}",
            pos,
            source_table.get(pos),
            solved_table.get(pos)
        );
    }

    if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Drive a fresh solver off `gen` until it yields a generator, counting the
/// samples consumed.
pub fn reconstruct(gen: &mut ReferenceGenerator) -> (u64, ReferenceGenerator) {
    let mut solver = Solver::new();
    let mut samples = 0u64;
    loop {
        samples += 1;
        if let Some(solved) = solver.feed(gen.advance()) {
            return (samples, solved);
        }
    }
}
