// Discriminator hex tooling: layer weight expansion and Q8.8 golden references
pub mod config;
pub mod error;
pub mod expand;
pub mod golden;
pub mod hex;

pub use error::{HexError, Result};

/// Logger for the command-line tools: `info` by default, stdout, `RUST_LOG` overrides.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .init();
}
