use camino::Utf8PathBuf;
use clap::{Parser, ValueHint};
use thiserror::Error;
use tracing::{debug, info, warn};

use lfsr_vm::runtime::{io::stdio, Memory};
use lfsr_vm::{load, Computer, Config};

/// Exit code for a program file that could not be read
const EXIT_UNREADABLE: i32 = 2;

#[derive(Error, Debug)]
#[error("unable to open file `{path}` for reading")]
pub struct ReadError {
    path: Utf8PathBuf,
    #[source]
    source: std::io::Error,
}

#[derive(Parser, Debug)]
pub struct RunOpt {
    /// Program listing, hexadecimal words separated by commas
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    pub(crate) input: Utf8PathBuf,
}

impl RunOpt {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = Config::from_env();
        debug!(?config, "Resolved configuration");

        info!(path = %self.input, "Reading program");
        let bytes = std::fs::read(&self.input).map_err(|source| ReadError {
            path: self.input.clone(),
            source,
        })?;

        let mut memory = Memory::default();
        let count = load(&mut memory, listing_text(&bytes));
        debug!(count, "Building computer");

        let (input, output) = stdio();
        let mut computer = Computer::new(&config, memory, input, output);

        info!("Running program");
        computer.run()?;

        info!(registers = %computer.registers, cycles = computer.cycles, "End of program");

        Ok(())
    }
}

/// Longest valid UTF-8 prefix of a listing.
///
/// Invalid bytes are just another malformed token: loading stops there.
fn listing_text(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(offset = e.valid_up_to(), "Listing is not valid UTF-8");
            // The prefix up to `valid_up_to` is valid by definition
            std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()
        }
    }
}

/// Process exit code for a failed run
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if error.is::<ReadError>() {
        EXIT_UNREADABLE
    } else {
        1
    }
}
