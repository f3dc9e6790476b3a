// SPDX-License-Identifier: MIT

//! `railrna`: the pipeline driver binary. Parses the CLI, wires up
//! tracing, runs the chosen backend, and maps the result onto a process
//! exit code.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cli;
mod config;
mod error;
mod exit_error;
mod logging;
mod pipeline_file;
mod run;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init(&cli.log_level, cli.log_json);

    if let Err(err) = run::run(cli).await {
        let exit = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<exit_error::ExitError>())
            .copied()
            .unwrap_or(exit_error::EXECUTION_ERROR);

        if !exit.message.is_empty() {
            eprintln!("Error: {}", error::format_error(&err));
        }
        std::process::exit(exit.code);
    }
}
