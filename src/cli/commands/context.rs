use std::{
    env,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::args::CommonArgs;
use crate::config::{Config, load_config};

/// Project root plus the configuration discovered from it.
///
/// Relative paths, from the config file or the command line, resolve against `root_dir`.
pub struct ProjectContext {
    pub root_dir: PathBuf,
    pub config: Config,
    pub verbose: bool,
}

impl ProjectContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let root_dir = match &args.root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Failed to read the current directory")?,
        };

        let loaded = load_config(&root_dir)?;
        debug!(
            root = %root_dir.display(),
            from_file = loaded.from_file,
            "loaded configuration"
        );

        Ok(Self {
            root_dir,
            config: loaded.config,
            verbose: args.verbose,
        })
    }

    /// `path` joined onto the root, with `.` segments dropped.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let mut resolved = self.root_dir.clone();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                other => resolved.push(other),
            }
        }
        resolved
    }

    pub fn out_dir(&self) -> PathBuf {
        self.resolve(&self.config.out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context(root: &str) -> ProjectContext {
        ProjectContext {
            root_dir: PathBuf::from(root),
            config: Config::default(),
            verbose: false,
        }
    }

    #[test]
    fn test_resolve_drops_current_dir_segments() {
        let ctx = context("/project");
        assert_eq!(ctx.resolve("./src"), PathBuf::from("/project/src"));
        assert_eq!(ctx.resolve("out/./build"), PathBuf::from("/project/out/build"));
        assert_eq!(ctx.out_dir(), PathBuf::from("/project/out-build"));
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let ctx = context("/project");
        assert_eq!(ctx.resolve("/elsewhere"), PathBuf::from("/elsewhere"));
    }
}
