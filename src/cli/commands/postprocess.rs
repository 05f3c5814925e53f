use anyhow::Result;

use super::context::ProjectContext;
use crate::cli::args::PostprocessArgs;
use crate::cli::exit_status::ExitStatus;
use crate::cli::report;
use crate::core::nls::PostprocessMode;
use crate::core::pipeline::{PostprocessOptions, run_postprocess};

pub fn postprocess(args: PostprocessArgs) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&args.common)?;

    let dir = match &args.dir {
        Some(dir) => ctx.resolve(dir),
        None => ctx.out_dir(),
    };
    let index_dir = match &args.index_dir {
        Some(dir) => ctx.resolve(dir),
        None => ctx.out_dir(),
    };
    let mode = PostprocessMode::from_preserve_english(
        args.preserve_english || ctx.config.preserve_english,
    );

    let stats = run_postprocess(&PostprocessOptions {
        dir: &dir,
        index_dir: &index_dir,
        mode,
        verbose: ctx.verbose,
    })?;

    report::print_postprocess(&stats, ctx.verbose);
    Ok(ExitStatus::from_error_count(stats.errors.len()))
}
