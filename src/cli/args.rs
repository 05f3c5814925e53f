//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `nls`: replace localize keys with placeholders and write the message index
//! - `postprocess`: replace placeholders in compiled outputs with message indices
//! - `mangle`: rename private class members in compiled outputs
//! - `init`: write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Nls(args)) => args.common.verbose,
            Some(Command::Postprocess(args)) => args.common.verbose,
            Some(Command::Mangle(args)) => args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root; config discovery starts here (defaults to the current directory)
    #[arg(long, env = "NLSMANGLE_ROOT")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct NlsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Source root module ids are derived from (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Output directory for transformed sources and artifacts (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Additional directory receiving the artifacts
    /// Can be specified multiple times: --extra-out-dir a --extra-out-dir b
    #[arg(long)]
    pub extra_out_dir: Vec<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct PostprocessArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory of compiled outputs to rewrite (defaults to the configured outDir)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Directory holding nls.placeholders.json (defaults to the configured outDir)
    #[arg(long)]
    pub index_dir: Option<PathBuf>,

    /// Keep English messages next to the indices
    #[arg(long)]
    pub preserve_english: bool,
}

#[derive(Debug, Parser)]
pub struct MangleArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory of compiled outputs to rewrite (defaults to the configured outDir)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Glob of outputs to leave untouched, added to the configured excludes
    #[arg(long)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace localize keys with placeholders and write the message index
    Nls(NlsArgs),
    /// Replace placeholders in compiled outputs with message indices
    Postprocess(PostprocessArgs),
    /// Rename private class members in compiled outputs
    Mangle(MangleArgs),
    /// Initialize a configuration file
    Init,
}
