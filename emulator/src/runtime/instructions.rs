use parse_display::Display;
use tracing::debug;

use crate::constants::{
    Address, Word, MODE_INDIRECT, OPCODE_MASK, OPCODE_SHIFT, OPERAND_MASK,
};

use super::{Computer, Input, Output, ProcessorError, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum Opcode {
    /// Bitwise `and` with the accumulator
    And,

    /// Bitwise `xor` with the accumulator
    Xor,

    /// Shift the accumulator one bit to the left
    Shl,

    /// Shift the accumulator one bit to the right
    Shr,

    /// Load the accumulator from an address
    Ld,

    /// Store the accumulator at an address
    St,

    /// Unconditional jump, halts when jumping on itself
    Jmp,

    /// Jump if the accumulator is zero
    Jz,
}

impl Opcode {
    const fn from_bits(bits: Word) -> Self {
        match bits & OPCODE_MASK {
            0 => Self::And,
            1 => Self::Xor,
            2 => Self::Shl,
            3 => Self::Shr,
            4 => Self::Ld,
            5 => Self::St,
            6 => Self::Jmp,
            _ => Self::Jz,
        }
    }

    const fn bits(self) -> Word {
        self as Word
    }
}

/// Operand field of an instruction, tagged with its addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The field is the value itself
    Imm(Word),

    /// The field is the address of the value
    Ind(Address),
}

impl Operand {
    const fn field(self) -> Word {
        match self {
            Self::Imm(v) | Self::Ind(v) => v & OPERAND_MASK,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imm(x) => write!(f, "{x:#05x}"),
            Self::Ind(x) => write!(f, "[{x:#05x}]"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{opcode} {operand}")]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
}

impl Instruction {
    #[must_use]
    pub const fn new(opcode: Opcode, operand: Operand) -> Self {
        Self { opcode, operand }
    }

    /// Split a memory word into its fields.
    ///
    /// Every word decodes to an instruction.
    #[must_use]
    pub const fn decode(word: Word) -> Self {
        let field = word & OPERAND_MASK;
        let operand = if word & MODE_INDIRECT == 0 {
            Operand::Imm(field)
        } else {
            Operand::Ind(field)
        };

        Self {
            opcode: Opcode::from_bits(word >> OPCODE_SHIFT),
            operand,
        }
    }

    #[must_use]
    pub const fn encode(&self) -> Word {
        let mode = match self.operand {
            Operand::Imm(_) => 0,
            Operand::Ind(_) => MODE_INDIRECT,
        };
        mode | (self.opcode.bits() << OPCODE_SHIFT) | self.operand.field()
    }

    /// Execute the instruction
    ///
    /// `operand` is the resolved effective operand and `next` the control
    /// value proposed by the sequencer.
    #[tracing::instrument(skip(computer))]
    pub(crate) fn execute<I: Input, O: Output>(
        &self,
        computer: &mut Computer<I, O>,
        operand: Word,
        next: Address,
    ) -> Result<Status, ProcessorError> {
        let registers = &mut computer.registers;
        match self.opcode {
            Opcode::And => {
                let res = registers.accumulator & operand;
                debug!("{:#06x} & {:#06x} = {:#06x}", registers.accumulator, operand, res);
                registers.accumulator = res;
                registers.control = next;
            }

            Opcode::Xor => {
                let res = registers.accumulator ^ operand;
                debug!("{:#06x} ^ {:#06x} = {:#06x}", registers.accumulator, operand, res);
                registers.accumulator = res;
                registers.control = next;
            }

            Opcode::Shl => {
                registers.accumulator <<= 1;
                registers.control = next;
            }

            Opcode::Shr => {
                registers.accumulator >>= 1;
                registers.control = next;
            }

            Opcode::Ld => {
                computer.registers.accumulator = computer.load(operand)?;
                computer.registers.control = next;
            }

            Opcode::St => {
                let value = computer.registers.accumulator;
                computer.store(operand, value)?;
                computer.registers.control = next;
            }

            Opcode::Jmp => {
                if operand == registers.control {
                    debug!(address = operand, "Jump on itself, halting");
                    return Ok(Status::Halted);
                }
                debug!("Jumping to address {:#06x}", operand);
                registers.control = operand;
            }

            Opcode::Jz => {
                registers.control = if registers.accumulator == 0 {
                    debug!("Accumulator is zero, jumping to address {:#06x}", operand);
                    operand
                } else {
                    next
                };
            }
        }

        Ok(Status::Running)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_test() {
        assert_eq!(
            Instruction::decode(0x4005),
            Instruction::new(Opcode::Ld, Operand::Imm(5))
        );
        assert_eq!(
            Instruction::decode(0xD123),
            Instruction::new(Opcode::St, Operand::Ind(0x123))
        );
        assert_eq!(
            Instruction::decode(0x0000),
            Instruction::new(Opcode::And, Operand::Imm(0))
        );
        assert_eq!(
            Instruction::decode(0xFFFF),
            Instruction::new(Opcode::Jz, Operand::Ind(0xFFF))
        );
    }

    #[test]
    fn every_word_is_stable_test() {
        for word in 0..=Word::MAX {
            assert_eq!(Instruction::decode(word).encode(), word);
        }
    }

    #[test]
    fn opcode_order_test() {
        let opcodes: Vec<_> = (0..8).map(|bits| Opcode::from_bits(bits).to_string()).collect();
        assert_eq!(
            opcodes,
            ["and", "xor", "shl", "shr", "ld", "st", "jmp", "jz"]
        );
    }

    #[test]
    fn display_test() {
        assert_eq!(Instruction::decode(0x4005).to_string(), "ld 0x005");
        assert_eq!(Instruction::decode(0xD123).to_string(), "st [0x123]");
        assert_eq!(Instruction::decode(0x6FFF).to_string(), "jmp 0xfff");
    }
}
