//! Command-line parsing.
//!
//! Hand-rolled over `std::env::args()`. Inputs are evaluated in the order
//! they appear, so `-c` snippets and script files may be interleaved.

use std::path::PathBuf;

use sli_eval::message::{level_from_name, LEVELS, M_INFO};

/// Something to evaluate, in command-line order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    /// `-`: read a script from standard input.
    Stdin,
    /// `-c <code>`
    Code(String),
}

/// Settings for one `sli` run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub debug: bool,
    pub verbosity: i32,
    pub cycle_guard: Option<u64>,
    pub record_stacks: bool,
    pub catch_errors: bool,
    /// Empty means interactive (or piped) standard input.
    pub inputs: Vec<Input>,
    /// Published as `statusdict/argv`, including anything after `--`.
    pub argv: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            verbosity: M_INFO,
            cycle_guard: None,
            record_stacks: false,
            catch_errors: false,
            inputs: Vec::new(),
            argv: Vec::new(),
        }
    }
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("`{0}` expects a value")]
    MissingValue(&'static str),
    #[error("unknown verbosity level `{0}`; expected one of {levels}", levels = level_names())]
    BadVerbosity(String),
    #[error("`--guard` expects a positive cycle count, found `{0}`")]
    BadGuard(String),
}

fn level_names() -> String {
    LEVELS
        .iter()
        .map(|(label, _)| *label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse the arguments after the program name.
///
/// `env_verbosity` is the value of `SLI_VERBOSITY`, if set; a
/// `--verbosity=` flag overrides it.
pub fn parse_args(args: &[String], env_verbosity: Option<&str>) -> Result<Command, ConfigError> {
    let mut config = Config {
        argv: args.to_vec(),
        ..Config::default()
    };
    if let Some(level) = env_verbosity {
        config.verbosity = parse_verbosity(level)?;
    }

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-d" | "--debug" => config.debug = true,
            "--record-stacks" => config.record_stacks = true,
            "--catch-errors" => config.catch_errors = true,
            "-" => config.inputs.push(Input::Stdin),
            "-c" => {
                let code = iter.next().ok_or(ConfigError::MissingValue("-c"))?;
                config.inputs.push(Input::Code(code.clone()));
            }
            // The rest belongs to the script.
            "--" => break,
            other => {
                if let Some(level) = other.strip_prefix("--verbosity=") {
                    config.verbosity = parse_verbosity(level)?;
                } else if let Some(cycles) = other.strip_prefix("--guard=") {
                    config.cycle_guard = Some(parse_guard(cycles)?);
                } else if other.starts_with('-') {
                    return Err(ConfigError::UnknownOption(other.to_string()));
                } else {
                    config.inputs.push(Input::File(PathBuf::from(other)));
                }
            }
        }
    }
    Ok(Command::Run(config))
}

fn parse_verbosity(text: &str) -> Result<i32, ConfigError> {
    level_from_name(text).ok_or_else(|| ConfigError::BadVerbosity(text.to_string()))
}

fn parse_guard(text: &str) -> Result<u64, ConfigError> {
    text.parse::<u64>()
        .ok()
        .filter(|cycles| *cycles > 0)
        .ok_or_else(|| ConfigError::BadGuard(text.to_string()))
}
