pub type Address = u16;
pub type Word = u16;

/// Total size of the computer memory
pub const MEMORY_SIZE: usize = 0x2000;

/// Feedback mask of the sequencer, maximal over 8-bit states
pub const POLYNOMIAL: u8 = 0xB8;

/// Number of distinct states visited by the sequencer before it loops
pub const PERIOD: usize = 255;

/// Address bit selecting the I/O channel instead of memory
pub const IO_SELECT: Address = 0x8000;

/// Instruction bit selecting an indirect operand
pub(crate) const MODE_INDIRECT: Word = 0x8000;

pub(crate) const OPCODE_SHIFT: u32 = 12;
pub(crate) const OPCODE_MASK: Word = 0x7;
pub(crate) const OPERAND_MASK: Word = 0x0FFF;

/// Control value a program starts from when none is given
pub const DEFAULT_START: Address = 1;
