//! `sli`: run SLI scripts or an interactive session.

use slic::{init_tracing, parse_args, run, Command};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let env_verbosity = std::env::var("SLI_VERBOSITY").ok();

    match parse_args(&args, env_verbosity.as_deref()) {
        Ok(Command::Run(config)) => std::process::exit(run(&config)),
        Ok(Command::Help) => print_usage(),
        Ok(Command::Version) => println!("sli {}", env!("CARGO_PKG_VERSION")),
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("Run `sli --help` for usage.");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("SLI interpreter");
    println!();
    println!("Usage: sli [options] [script.sli | -c <code> | -]... [-- args...]");
    println!();
    println!("Without inputs, reads standard input (interactively on a terminal).");
    println!();
    println!("Options:");
    println!("  -c <code>            Evaluate <code>");
    println!("  -                    Read a script from standard input");
    println!("  -d, --debug          Debug mode: step with `stepmode`, show all messages");
    println!("  --verbosity=<level>  ALL, DEBUG, STATUS, INFO, DEPRECATED, WARNING,");
    println!("                       ERROR, FATAL or QUIET (default: INFO)");
    println!("  --guard=<cycles>     Abort with /CycleGuard after <cycles> cycles");
    println!("  --record-stacks      Keep stack snapshots in the error record");
    println!("  --catch-errors       Enter the debugger on uncaught errors");
    println!("  -h, --help           Show this help message");
    println!("  -V, --version        Show version information");
    println!();
    println!("Environment:");
    println!("  SLI_VERBOSITY        Default for --verbosity");
    println!("  RUST_LOG             Enable diagnostic tracing (e.g. sli_eval=debug)");
    println!("  SLI_LOG_TREE         Show tracing output as an indented span tree");
}
