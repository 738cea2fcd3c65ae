//! Per-step diagnostics.

use std::io::Write;

use crate::constants::{Address, Word};

use super::Instruction;

/// What the machine was about to execute at one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub address: Address,
    pub word: Word,
    pub accumulator: Word,
    pub instruction: Instruction,
}

impl std::fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04x}:{:04X} {:04X} {}",
            self.address, self.word, self.accumulator, self.instruction
        )
    }
}

/// Receives one record per executed step
pub trait Trace {
    /// # Errors
    ///
    /// A failing sink aborts the run.
    fn record(&mut self, record: &TraceRecord) -> std::io::Result<()>;
}

impl Trace for Vec<TraceRecord> {
    fn record(&mut self, record: &TraceRecord) -> std::io::Result<()> {
        self.push(*record);
        Ok(())
    }
}

/// Writes records as text, one per line
#[derive(Debug)]
pub struct TraceWriter<W> {
    inner: W,
}

impl<W: Write> TraceWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Trace for TraceWriter<W> {
    fn record(&mut self, record: &TraceRecord) -> std::io::Result<()> {
        writeln!(self.inner, "{record}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_writer_test() {
        let record = TraceRecord {
            address: 0xb8,
            word: 0x1003,
            accumulator: 0x0005,
            instruction: Instruction::decode(0x1003),
        };

        let mut buf = Vec::new();
        TraceWriter::new(&mut buf).record(&record).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "00b8:1003 0005 xor 0x003\n");
    }
}
