//! SLI command-line driver.
//!
//! Turns command-line arguments into a [`Config`], builds an interpreter from
//! it and evaluates the requested inputs in order:
//!
//! ```text
//! args ──► parse_args() ──► Config ──► run() ──► exit code
//!                                        │
//!                     files / -c code / stdin / interactive loop
//! ```

mod cli;
mod driver;
mod tracing_setup;

pub use cli::{parse_args, Command, Config, ConfigError, Input};
pub use driver::{execute, interpreter_builder, repl, run, DriverError, CONTINUATION, PROMPT};
pub use tracing_setup::init_tracing;
