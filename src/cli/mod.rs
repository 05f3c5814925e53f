//! Command-line layer: argument parsing, command dispatch and human-readable output.

use std::process::ExitCode;

use anyhow::Result;

pub mod args;
mod commands;
mod exit_status;
mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match args.command {
        Some(Command::Nls(args)) => commands::nls::nls(args)?,
        Some(Command::Postprocess(args)) => commands::postprocess::postprocess(args)?,
        Some(Command::Mangle(args)) => commands::mangle::mangle(args)?,
        Some(Command::Init) => commands::init::init()?,
        None => ExitStatus::Success,
    };

    Ok(status.into())
}
