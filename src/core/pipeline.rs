//! Directory-level runs of the three passes.
//!
//! - [`run_nls`]: transform every source under the source root, write the results to the
//!   output directory and finalize the message index once all files are done.
//! - [`run_postprocess`]: replace placeholders in compiled outputs with message indices.
//! - [`run_mangle`]: rename private class members in compiled outputs.
//!
//! Per-file work runs on rayon; each `collect()` is the join point before results merge.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context as _, Result, anyhow};
use glob::Pattern;
use rayon::prelude::*;

use crate::core::{
    file_scanner::{OUTPUT_EXTENSIONS, SOURCE_EXTENSIONS, scan_files},
    mangle::{ConvertResult, convert_with_kind},
    nls::{
        NlsCollector, PostprocessMode, finalize, load_placeholder_index, module_id_for,
        postprocess_nls, transform_nls,
    },
    parsers::source::SourceKind,
};
use crate::utils::{slash_path, write_file};

/// A file that could not be processed, with the reason.
#[derive(Debug, Clone)]
pub struct FileError {
    pub file_path: PathBuf,
    pub error: String,
}

impl FileError {
    fn new(file_path: &Path, error: anyhow::Error) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            error: format!("{:#}", error),
        }
    }
}

// ============================================================
// NLS
// ============================================================

pub struct NlsOptions<'a> {
    pub source_root: &'a Path,
    pub out_dir: &'a Path,
    pub extra_out_dirs: &'a [PathBuf],
    pub includes: &'a [String],
    pub ignores: &'a [String],
    pub nls_global: &'a str,
    pub verbose: bool,
}

#[derive(Debug, Default)]
pub struct NlsStats {
    pub files_scanned: usize,
    /// Files with at least one localize call.
    pub files_transformed: usize,
    /// Localize calls found across all files.
    pub entries: usize,
    /// Messages in the finalized index.
    pub messages: usize,
    pub elapsed: Duration,
}

/// Transform all sources and write the NLS artifacts.
///
/// Fails on the first file that cannot be read, parsed or transformed; the index is
/// finalized only when every file succeeded.
pub fn run_nls(options: &NlsOptions) -> Result<NlsStats> {
    let start = Instant::now();

    let scan = scan_files(
        options.source_root,
        options.includes,
        options.ignores,
        SOURCE_EXTENSIONS,
        options.verbose,
    );

    let collector = NlsCollector::new();

    let results: Vec<_> = scan
        .files
        .par_iter()
        .map(|file_path| {
            let result = transform_nls_file(file_path, options, &collector);
            (file_path, result)
        })
        .collect();

    let mut stats = NlsStats {
        files_scanned: scan.files.len(),
        ..Default::default()
    };
    for (file_path, result) in results {
        let entries =
            result.with_context(|| format!("NLS transform failed for {}", file_path.display()))?;
        if entries > 0 {
            stats.files_transformed += 1;
            stats.entries += entries;
        }
    }

    let extra_out_dirs: Vec<&Path> = options
        .extra_out_dirs
        .iter()
        .map(PathBuf::as_path)
        .collect();
    let index = finalize(collector, options.out_dir, &extra_out_dirs, options.nls_global)?;

    stats.messages = index.len();
    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// Transform one source file into the output directory. Returns the number of entries found.
fn transform_nls_file(
    file_path: &Path,
    options: &NlsOptions,
    collector: &NlsCollector,
) -> Result<usize> {
    let code = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

    let module_id = module_id_for(file_path, options.source_root).ok_or_else(|| {
        anyhow!(
            "{} is not under the source root {}",
            file_path.display(),
            options.source_root.display()
        )
    })?;

    let display_name = file_path.display().to_string();
    let result = transform_nls(
        &code,
        &display_name,
        &module_id,
        SourceKind::from_path(file_path),
    )?;

    let relative = file_path
        .strip_prefix(options.source_root)
        .with_context(|| format!("Failed to relativize {}", display_name))?;
    write_file(&options.out_dir.join(relative), &result.code)?;

    let count = result.entries.len();
    collector.add_all(result.entries);
    Ok(count)
}

// ============================================================
// Post-processing
// ============================================================

pub struct PostprocessOptions<'a> {
    /// Directory of compiled outputs, rewritten in place.
    pub dir: &'a Path,
    /// Directory holding the placeholder index written by [`run_nls`].
    pub index_dir: &'a Path,
    pub mode: PostprocessMode,
    pub verbose: bool,
}

#[derive(Debug, Default)]
pub struct PostprocessStats {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub replaced: usize,
    pub blanked: usize,
    /// Placeholders with no index entry, deduplicated and sorted.
    pub missing: Vec<String>,
    pub errors: Vec<FileError>,
    pub elapsed: Duration,
}

/// Rewrite placeholders in every compiled output under `options.dir`.
///
/// Files that fail are recorded in [`PostprocessStats::errors`]; the rest are still processed.
pub fn run_postprocess(options: &PostprocessOptions) -> Result<PostprocessStats> {
    let start = Instant::now();
    let index = load_placeholder_index(options.index_dir)?;

    let scan = scan_files(options.dir, &[], &[], OUTPUT_EXTENSIONS, options.verbose);

    let results: Vec<_> = scan
        .files
        .par_iter()
        .map(|file_path| {
            let result = fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read file: {}", file_path.display()))
                .and_then(|code| {
                    let result = postprocess_nls(&code, &index, options.mode);
                    if result.replaced > 0 {
                        write_file(file_path, &result.code)?;
                    }
                    Ok(result)
                });
            (file_path, result)
        })
        .collect();

    let mut stats = PostprocessStats {
        files_scanned: scan.files.len(),
        ..Default::default()
    };
    for (file_path, result) in results {
        match result {
            Ok(result) => {
                if result.replaced > 0 {
                    stats.files_changed += 1;
                }
                stats.replaced += result.replaced;
                stats.blanked += result.blanked;
                stats.missing.extend(result.missing);
            }
            Err(e) => stats.errors.push(FileError::new(file_path, e)),
        }
    }
    stats.missing.sort();
    stats.missing.dedup();
    stats.elapsed = start.elapsed();

    Ok(stats)
}

// ============================================================
// Mangling
// ============================================================

pub struct MangleOptions<'a> {
    /// Directory of compiled outputs, rewritten in place.
    pub dir: &'a Path,
    /// Globs, relative to `dir`, of files left untouched.
    pub excludes: &'a [String],
    pub verbose: bool,
}

#[derive(Debug, Default)]
pub struct MangleStats {
    pub files_scanned: usize,
    pub files_converted: usize,
    pub files_excluded: usize,
    pub classes: usize,
    pub fields: usize,
    pub edits: usize,
    pub errors: Vec<FileError>,
    pub elapsed: Duration,
}

/// Rename private members in every compiled output under `options.dir`.
pub fn run_mangle(options: &MangleOptions) -> Result<MangleStats> {
    let start = Instant::now();

    let excludes = options
        .excludes
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern: \"{}\"", p)))
        .collect::<Result<Vec<_>>>()?;

    let scan = scan_files(options.dir, &[], &[], OUTPUT_EXTENSIONS, options.verbose);
    let (excluded, files): (Vec<_>, Vec<_>) = scan
        .files
        .iter()
        .partition(|file_path| is_excluded(file_path, options.dir, &excludes));

    let results: Vec<_> = files
        .par_iter()
        .map(|file_path| (*file_path, mangle_file(file_path)))
        .collect();

    let mut stats = MangleStats {
        files_scanned: scan.files.len(),
        files_excluded: excluded.len(),
        ..Default::default()
    };
    for (file_path, result) in results {
        match result {
            Ok(result) => {
                if result.edit_count > 0 {
                    stats.files_converted += 1;
                }
                stats.classes += result.class_count;
                stats.fields += result.field_count;
                stats.edits += result.edit_count;
            }
            Err(e) => stats.errors.push(FileError::new(file_path, e)),
        }
    }
    stats.elapsed = start.elapsed();

    Ok(stats)
}

fn mangle_file(file_path: &Path) -> Result<ConvertResult> {
    let code = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
    let result = convert_with_kind(
        &code,
        &file_path.display().to_string(),
        SourceKind::from_path(file_path),
    )?;
    if result.edit_count > 0 {
        write_file(file_path, &result.code)?;
    }
    Ok(result)
}

fn is_excluded(file_path: &Path, base_dir: &Path, excludes: &[Pattern]) -> bool {
    let Ok(relative) = file_path.strip_prefix(base_dir) else {
        return false;
    };
    let relative = slash_path(relative);
    excludes.iter().any(|pattern| pattern.matches(&relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nls::collector::{KEYS_FILE, MESSAGES_FILE, PLACEHOLDERS_FILE};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(root: &Path, path: &str, content: &str) {
        write_file(&root.join(path), content).unwrap();
    }

    fn read(root: &Path, path: &str) -> String {
        fs::read_to_string(root.join(path)).unwrap()
    }

    fn nls_options<'a>(src: &'a Path, out: &'a Path, extra: &'a [PathBuf]) -> NlsOptions<'a> {
        NlsOptions {
            source_root: src,
            out_dir: out,
            extra_out_dirs: extra,
            includes: &[],
            ignores: &[],
            nls_global: "_NLS_MESSAGES",
            verbose: false,
        }
    }

    #[test]
    fn test_run_nls_writes_sources_and_artifacts() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        let extra = vec![dir.path().join("dist")];

        write(
            &src,
            "vs/b.ts",
            "import * as nls from '../nls';\nnls.localize('z', \"Zed\");\n",
        );
        write(
            &src,
            "vs/a.ts",
            "import { localize } from '../nls';\nlocalize('y', \"Why\");\nlocalize('x', \"Ex\");\n",
        );
        write(&src, "nls.ts", "export function localize() {}\n");

        let stats = run_nls(&nls_options(&src, &out, &extra)).unwrap();

        assert_eq!(stats.files_scanned, 3);
        assert_eq!(stats.files_transformed, 2);
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.messages, 3);

        assert_eq!(
            read(&out, "vs/a.ts"),
            "import { localize } from '../nls';\nlocalize(\"%%NLS:vs/a#y%%\", \"Why\");\nlocalize(\"%%NLS:vs/a#x%%\", \"Ex\");\n"
        );
        assert_eq!(read(&out, "nls.ts"), "export function localize() {}\n");

        insta::assert_snapshot!(read(&out, MESSAGES_FILE), @r#"["Ex","Why","Zed"]"#);
        insta::assert_snapshot!(read(&out, KEYS_FILE), @r#"[["vs/a",["x","y"]],["vs/b",["z"]]]"#);
        assert_eq!(read(&out, MESSAGES_FILE), read(&extra[0], MESSAGES_FILE));
    }

    #[test]
    fn test_run_nls_fails_without_writing_artifacts() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");

        write(
            &src,
            "ok.ts",
            "import { localize } from './nls';\nlocalize('a', 'A');\n",
        );
        write(
            &src,
            "bad.ts",
            "import { localize } from './nls';\nlocalize(key, 'B');\n",
        );

        let err = run_nls(&nls_options(&src, &out, &[])).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.ts"));
        assert!(!out.join(MESSAGES_FILE).exists());
    }

    #[test]
    fn test_run_nls_without_calls_writes_no_artifacts() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        write(&src, "plain.ts", "export const x = 1;\n");

        let stats = run_nls(&nls_options(&src, &out, &[])).unwrap();
        assert_eq!(stats.messages, 0);
        assert!(out.join("plain.ts").exists());
        assert!(!out.join(MESSAGES_FILE).exists());
    }

    #[test]
    fn test_postprocess_after_nls() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        write(
            &src,
            "vs/a.ts",
            "import { localize, localize2 } from '../nls';\nlocalize('hello', \"Hello\");\nlocalize2('title', 'Title');\n",
        );
        run_nls(&nls_options(&src, &out, &[])).unwrap();

        // Stand-in for the compiler: the transformed source is already valid JavaScript.
        let compiled = read(&out, "vs/a.ts").replace(
            "import { localize, localize2 } from '../nls';\n",
            "",
        );
        write(&out, "vs/a.js", &compiled);

        let stats = run_postprocess(&PostprocessOptions {
            dir: &out,
            index_dir: &out,
            mode: PostprocessMode::Production,
            verbose: false,
        })
        .unwrap();

        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.replaced, 2);
        assert_eq!(stats.blanked, 1);
        assert!(stats.missing.is_empty());
        assert_eq!(
            read(&out, "vs/a.js"),
            "localize(0, null);\nlocalize2(1, 'Title');\n"
        );
    }

    #[test]
    fn test_postprocess_after_nls_with_quotes_and_backslashes_in_keys() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        write(
            &src,
            "vs/a.ts",
            r#"import { localize } from '../nls';
localize('say "hi"', 'Hi');
localize('back\\slash', 'B');
"#,
        );
        run_nls(&nls_options(&src, &out, &[])).unwrap();

        let transformed = read(&out, "vs/a.ts");
        assert!(transformed.contains(r#"localize("%%NLS:vs/a#say \"hi\"%%", 'Hi');"#));

        let compiled = transformed.replace("import { localize } from '../nls';\n", "");
        write(&out, "vs/a.js", &compiled);

        let stats = run_postprocess(&PostprocessOptions {
            dir: &out,
            index_dir: &out,
            mode: PostprocessMode::Production,
            verbose: false,
        })
        .unwrap();

        assert_eq!(stats.replaced, 2);
        assert!(stats.missing.is_empty());
        assert_eq!(read(&out, "vs/a.js"), "localize(1, null);\nlocalize(0, null);\n");
    }

    #[test]
    fn test_postprocess_requires_index() {
        let dir = tempdir().unwrap();
        let result = run_postprocess(&PostprocessOptions {
            dir: dir.path(),
            index_dir: dir.path(),
            mode: PostprocessMode::Production,
            verbose: false,
        });
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains(PLACEHOLDERS_FILE));
    }

    #[test]
    fn test_run_mangle_honours_excludes_and_counts_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "vs/a.js",
            "class A { #x = 1; get() { return this.#x; } }\n",
        );
        write(root, "vendor/lib.js", "class V { #y = 1; }\n");
        write(root, "vs/broken.js", "class B { #z = ; }\n");

        let stats = run_mangle(&MangleOptions {
            dir: root,
            excludes: &["vendor/**".to_string()],
            verbose: false,
        })
        .unwrap();

        assert_eq!(stats.files_scanned, 3);
        assert_eq!(stats.files_excluded, 1);
        assert_eq!(stats.files_converted, 1);
        assert_eq!(stats.classes, 1);
        assert_eq!(stats.fields, 1);
        assert_eq!(stats.edits, 2);
        assert_eq!(stats.errors.len(), 1);
        assert!(stats.errors[0].file_path.ends_with("vs/broken.js"));

        assert_eq!(
            read(root, "vs/a.js"),
            "class A { $a = 1; get() { return this.$a; } }\n"
        );
        assert_eq!(read(root, "vendor/lib.js"), "class V { #y = 1; }\n");
        assert_eq!(read(root, "vs/broken.js"), "class B { #z = ; }\n");
    }
}
