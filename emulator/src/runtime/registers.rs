use crate::constants::{Address, Word};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// The only general purpose register
    pub accumulator: Word,

    /// Address of the next instruction
    pub control: Address,
}

impl Registers {
    #[must_use]
    pub const fn new(start: Address) -> Self {
        // The accumulator starts out holding the entry address
        Self {
            accumulator: start,
            control: start,
        }
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "%a = {:#06x} | %pc = {:#06x}",
            self.accumulator, self.control
        )
    }
}
