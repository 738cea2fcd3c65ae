pub mod config;
pub mod constants;
pub mod loader;
pub mod runtime;
pub mod sequencer;

pub use self::config::Config;
pub use self::loader::load;
pub use self::runtime::Computer;
