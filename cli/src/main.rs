use std::io::IsTerminal;
use std::process::exit;

use clap::{ArgAction, ArgGroup, Parser};
use tracing::error;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

mod run;

use crate::run::RunOpt;

#[derive(Parser)]
#[clap(version, author, about, group = ArgGroup::new("format"))]
struct Opt {
    /// Increase the level of verbosity. Can be used multiple times.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Force colored output. Default is to check if stderr is a tty
    #[clap(short = 'c', long, group = "format")]
    color: bool,

    /// Force non-colored output. Default is to check if stderr is a tty
    #[clap(short = 'C', long, group = "format")]
    no_color: bool,

    /// Use JSON output for log messages
    #[clap(short, long, group = "format")]
    json: bool,

    #[clap(flatten)]
    run: RunOpt,
}

impl Opt {
    const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "lfsr_vm=info,lfsr_vm_cli=info,warn",
            2 => "lfsr_vm=debug,lfsr_vm_cli=debug,info",
            3 => "lfsr_vm=trace,lfsr_vm_cli=trace,info",
            4..=u8::MAX => "trace",
        }
    }

    fn should_use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            std::io::stderr().is_terminal()
        }
    }

    fn filter_layer(&self) -> EnvFilter {
        // Parse log level from env
        EnvFilter::try_from_default_env()
            // or infer from args
            .unwrap_or_else(|_| EnvFilter::new(self.log_filter()))
    }
}

fn main() {
    // First, parse the arguments. Usage errors exit with 1, help and version with 0
    let opt = Opt::try_parse().unwrap_or_else(|e| {
        let code = i32::from(e.use_stderr());
        let _ = e.print();
        exit(code);
    });

    // Then, setup the tracing formatter. Everything goes to stderr, stdout
    // belongs to the program being run
    let registry = tracing_subscriber::Registry::default().with(opt.filter_layer());

    if opt.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .without_time()
            .with_ansi(opt.should_use_colors())
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }

    // And run the program
    if let Err(e) = opt.run.exec() {
        error!("{:#}", e);
        exit(run::exit_code(&e));
    }
}
