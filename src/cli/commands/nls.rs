use anyhow::Result;

use super::context::ProjectContext;
use crate::cli::args::NlsArgs;
use crate::cli::exit_status::ExitStatus;
use crate::cli::report;
use crate::core::pipeline::{NlsOptions, run_nls};

pub fn nls(args: NlsArgs) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&args.common)?;
    let config = &ctx.config;

    let source_root = match &args.source_root {
        Some(dir) => ctx.resolve(dir),
        None => ctx.resolve(&config.source_root),
    };
    let out_dir = match &args.out_dir {
        Some(dir) => ctx.resolve(dir),
        None => ctx.out_dir(),
    };
    let extra_out_dirs: Vec<_> = config
        .extra_out_dirs
        .iter()
        .map(|dir| ctx.resolve(dir))
        .chain(args.extra_out_dir.iter().map(|dir| ctx.resolve(dir)))
        .collect();

    let stats = run_nls(&NlsOptions {
        source_root: &source_root,
        out_dir: &out_dir,
        extra_out_dirs: &extra_out_dirs,
        includes: &config.includes,
        ignores: &config.ignores,
        nls_global: &config.nls_global,
        verbose: ctx.verbose,
    })?;

    report::print_nls(&stats, &out_dir);
    Ok(ExitStatus::Success)
}
