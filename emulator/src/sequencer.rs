//! Control register sequencing.
//!
//! The machine has no incrementing program counter. After each non-branching
//! instruction the control register is advanced by an 8-bit Galois LFSR,
//! which visits the 255 nonzero states in a fixed cyclic order.

use crate::constants::{Address, POLYNOMIAL};

/// Compute the state following `state`.
///
/// `0` maps to itself and is never reached from a nonzero state.
#[must_use]
pub const fn next(state: u8) -> u8 {
    let feedback = state & 1 != 0;
    let shifted = state >> 1;
    if feedback {
        shifted ^ POLYNOMIAL
    } else {
        shifted
    }
}

/// Implicit advance of the control register.
///
/// Only the low 8 bits survive: a control value set by an explicit jump to a
/// wider address is narrowed before the feedback step.
#[must_use]
pub const fn advance(control: Address) -> Address {
    #[allow(clippy::cast_possible_truncation)]
    let state = control as u8;
    next(state) as Address
}

/// Iterator over the states visited from a seed, starting with the seed itself.
#[derive(Debug, Clone)]
pub struct Sequence {
    state: u8,
}

impl Iterator for Sequence {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.state;
        self.state = next(current);
        Some(current)
    }
}

/// Walk the orbit of `seed`
#[must_use]
pub const fn orbit(seed: u8) -> Sequence {
    Sequence { state: seed }
}

/// Number of steps needed to get back to `seed`.
///
/// The fixed point `0` has a period of 0.
#[must_use]
pub fn period(seed: u8) -> usize {
    if seed == 0 {
        return 0;
    }

    orbit(seed)
        .skip(1)
        .position(|state| state == seed)
        .map_or(0, |steps| steps + 1)
}
