use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".nlsmanglerc.json";

/// `nlsGlobal` is emitted as `globalThis.<name>`, so it must be a plain identifier.
static JS_IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Root that module ids are derived from.
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Receives transformed sources and the NLS artifacts.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    /// Additional directories that receive a copy of the NLS artifacts.
    #[serde(default)]
    pub extra_out_dirs: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub preserve_english: bool,
    #[serde(default = "default_nls_global")]
    pub nls_global: String,
    #[serde(default)]
    pub mangle: MangleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MangleConfig {
    #[serde(default = "default_mangle_enabled")]
    pub enabled: bool,
    /// Globs (relative to the converted directory) of outputs left untouched.
    #[serde(default)]
    pub excludes: Vec<String>,
}

fn default_source_root() -> String {
    "./src".to_string()
}

fn default_out_dir() -> String {
    "./out-build".to_string()
}

fn default_nls_global() -> String {
    "_NLS_MESSAGES".to_string()
}

fn default_mangle_enabled() -> bool {
    true
}

impl Default for MangleConfig {
    fn default() -> Self {
        Self {
            enabled: default_mangle_enabled(),
            excludes: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            out_dir: default_out_dir(),
            extra_out_dirs: Vec::new(),
            includes: Vec::new(),
            ignores: Vec::new(),
            preserve_english: false,
            nls_global: default_nls_global(),
            mangle: MangleConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns and an `nlsGlobal` that is not a JS identifier.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal directories.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for pattern in &self.mangle.excludes {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'mangle.excludes': \"{}\"", pattern)
            })?;
        }

        if self.nls_global.trim().is_empty() {
            bail!("'nlsGlobal' must not be empty");
        }
        if !JS_IDENTIFIER_REGEX.is_match(&self.nls_global) {
            bail!(
                "'nlsGlobal' must be a JavaScript identifier: \"{}\"",
                self.nls_global
            );
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
