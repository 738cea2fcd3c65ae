use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::constants::{Address, Word, IO_SELECT};
use crate::sequencer;

mod instructions;
pub mod io;
mod memory;
mod registers;
mod trace;

pub use self::instructions::{Instruction, Opcode, Operand};
pub use self::io::{ByteReader, ByteWriter, ChannelError, Input, Output};
pub use self::memory::Memory;
pub use self::registers::Registers;
pub use self::trace::{Trace, TraceRecord, TraceWriter};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("could not read from the input channel")]
    Input(#[source] ChannelError),

    #[error("could not write to the output channel")]
    Output(#[source] ChannelError),

    #[error("could not write trace record")]
    Trace(#[source] std::io::Error),
}

type Result<T> = std::result::Result<T, ProcessorError>;

/// Whether the computer can keep going after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

pub struct Computer<I, O> {
    pub registers: Registers,
    pub memory: Memory,
    pub cycles: usize,
    input: I,
    output: O,
    trace: Option<Box<dyn Trace>>,
}

impl<I, O> std::fmt::Debug for Computer<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Computer {{ registers: {:?}, cycles: {}, memory: [...] }}",
            self.registers, self.cycles
        )
    }
}

impl<I: Input, O: Output> Computer<I, O> {
    /// Build a computer ready to execute from `config.start`.
    ///
    /// When `config.trace` is set, every step is recorded on stderr.
    #[must_use]
    pub fn new(config: &Config, memory: Memory, input: I, output: O) -> Self {
        let trace: Option<Box<dyn Trace>> = if config.trace {
            Some(Box::new(TraceWriter::new(std::io::stderr())))
        } else {
            None
        };

        Self {
            registers: Registers::new(config.start),
            memory,
            cycles: 0,
            input,
            output,
            trace,
        }
    }

    /// Replace the trace sink
    #[must_use]
    pub fn with_trace(mut self, trace: Box<dyn Trace>) -> Self {
        self.trace = Some(trace);
        self
    }

    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    #[must_use]
    pub fn into_parts(self) -> (Registers, Memory, I, O) {
        (self.registers, self.memory, self.input, self.output)
    }

    /// Read a word, either from memory or from the input channel
    pub(crate) fn load(&mut self, address: Address) -> Result<Word> {
        if address & IO_SELECT == 0 {
            Ok(self.memory.get(address))
        } else {
            let value = self.input.get().map_err(ProcessorError::Input)?;
            debug!(value, "Read from input channel");
            Ok(value)
        }
    }

    /// Write a word, either to memory or to the output channel
    pub(crate) fn store(&mut self, address: Address, value: Word) -> Result<()> {
        if address & IO_SELECT == 0 {
            self.memory.set(address, value);
        } else {
            let [unit, _] = value.to_le_bytes();
            debug!(unit, "Write to output channel");
            self.output.put(unit).map_err(ProcessorError::Output)?;
        }
        Ok(())
    }

    /// Resolve the value an instruction operates on
    #[must_use]
    pub fn operand(&self, instruction: &Instruction) -> Word {
        match instruction.operand {
            Operand::Imm(value) => value,
            Operand::Ind(address) => self.memory.get(address),
        }
    }

    /// Fetch, decode and execute one instruction
    ///
    /// # Errors
    ///
    /// Fails if an I/O channel or the trace sink fails. The run cannot be
    /// resumed afterwards.
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn step(&mut self) -> Result<Status> {
        let address = self.registers.control;
        let word = self.memory.get(address);
        let instruction = Instruction::decode(word);
        let next = sequencer::advance(address);
        let operand = self.operand(&instruction);

        trace!(
            address,
            accumulator = self.registers.accumulator,
            "Executing instruction \"{}\"",
            instruction
        );

        if let Some(sink) = self.trace.as_mut() {
            let record = TraceRecord {
                address,
                word,
                accumulator: self.registers.accumulator,
                instruction,
            };
            sink.record(&record).map_err(ProcessorError::Trace)?;
        }

        let status = instruction.execute(self, operand, next)?;
        self.cycles += 1;
        Ok(status)
    }

    /// Run until the program jumps on itself
    ///
    /// # Errors
    ///
    /// See [`Computer::step`]
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self) -> Result<()> {
        while self.step()? == Status::Running {}
        info!(cycles = self.cycles, "Halted");
        Ok(())
    }

    /// Run at most `limit` steps
    ///
    /// # Errors
    ///
    /// See [`Computer::step`]
    pub fn run_for(&mut self, limit: usize) -> Result<Status> {
        for _ in 0..limit {
            if self.step()? == Status::Halted {
                return Ok(Status::Halted);
            }
        }
        Ok(Status::Running)
    }
}
