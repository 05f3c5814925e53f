use anyhow::Result;

use super::context::ProjectContext;
use crate::cli::args::MangleArgs;
use crate::cli::exit_status::ExitStatus;
use crate::cli::report;
use crate::core::pipeline::{MangleOptions, run_mangle};

pub fn mangle(args: MangleArgs) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&args.common)?;

    if !ctx.config.mangle.enabled {
        report::print_mangle_disabled();
        return Ok(ExitStatus::Success);
    }

    let dir = match &args.dir {
        Some(dir) => ctx.resolve(dir),
        None => ctx.out_dir(),
    };
    let excludes: Vec<String> = ctx
        .config
        .mangle
        .excludes
        .iter()
        .chain(&args.exclude)
        .cloned()
        .collect();

    let stats = run_mangle(&MangleOptions {
        dir: &dir,
        excludes: &excludes,
        verbose: ctx.verbose,
    })?;

    report::print_mangle(&stats, ctx.verbose);
    Ok(ExitStatus::from_error_count(stats.errors.len()))
}
