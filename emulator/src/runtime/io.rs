//! Memory-mapped I/O channels.
//!
//! Loads and stores on an address with [`IO_SELECT`](crate::constants::IO_SELECT)
//! set never touch the memory. They pull a unit from an [`Input`] or push one
//! to an [`Output`] instead.

use std::io::{ErrorKind, Read, Write};

use thiserror::Error;

use crate::constants::Word;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("end of input")]
    EndOfInput,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Source of units for loads on the I/O range
pub trait Input {
    /// Block until the next unit is available
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::EndOfInput`] once the source is exhausted.
    fn get(&mut self) -> Result<Word, ChannelError>;
}

/// Sink for units stored on the I/O range
pub trait Output {
    /// Push one unit out
    ///
    /// # Errors
    ///
    /// Fails if the underlying sink cannot be written or flushed.
    fn put(&mut self, unit: u8) -> Result<(), ChannelError>;
}

impl<T: Input + ?Sized> Input for &mut T {
    fn get(&mut self) -> Result<Word, ChannelError> {
        (**self).get()
    }
}

impl<T: Output + ?Sized> Output for &mut T {
    fn put(&mut self, unit: u8) -> Result<(), ChannelError> {
        (**self).put(unit)
    }
}

/// Reads one byte per unit, zero-extended
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Input for ByteReader<R> {
    fn get(&mut self) -> Result<Word, ChannelError> {
        let mut buf = [0; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Err(ChannelError::EndOfInput),
                Ok(_) => return Ok(Word::from(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Writes one byte per unit, flushing after each one
#[derive(Debug)]
pub struct ByteWriter<W> {
    inner: W,
}

impl<W: Write> ByteWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Output for ByteWriter<W> {
    fn put(&mut self, unit: u8) -> Result<(), ChannelError> {
        self.inner.write_all(&[unit])?;
        self.inner.flush()?;
        Ok(())
    }
}

/// Channels bound to the process standard streams
#[must_use]
pub fn stdio() -> (
    ByteReader<std::io::StdinLock<'static>>,
    ByteWriter<std::io::StdoutLock<'static>>,
) {
    (
        ByteReader::new(std::io::stdin().lock()),
        ByteWriter::new(std::io::stdout().lock()),
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn byte_reader_test() {
        let mut input = ByteReader::new(Cursor::new(vec![0x41, 0xFF]));
        assert_eq!(input.get().unwrap(), 0x41);
        assert_eq!(input.get().unwrap(), 0x00FF); // Zero-extended
        assert!(matches!(input.get(), Err(ChannelError::EndOfInput)));
        assert_eq!(input.into_inner().position(), 2);
    }

    #[test]
    fn byte_writer_test() {
        let mut output = ByteWriter::new(Vec::new());
        output.put(b'h').unwrap();
        output.put(b'i').unwrap();
        assert_eq!(output.get_ref(), b"hi");
        assert_eq!(output.into_inner(), b"hi");
    }

    #[test]
    fn byte_writer_failure_test() {
        let mut output = ByteWriter::new(BrokenPipe);
        assert!(matches!(output.put(0), Err(ChannelError::Io(_))));
    }
}
