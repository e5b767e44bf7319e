//! CLI command implementations.
//!
//! Settings are resolved as command-line flag, then config file, then
//! default. Paths are made absolute (lexically, without following symlinks)
//! so queries can name files relative to the current directory.

mod display;

pub mod build;
pub mod stats;
pub mod who_uses;

use std::path::{Path, PathBuf};

use incdeps::config::default_output;
use incdeps::{Config, ConfigFile};

/// Options shared by every command.
pub struct GlobalOptions {
    /// YAML configuration file
    pub config: Option<PathBuf>,
    /// Scan root flag
    pub scan_path: Option<PathBuf>,
    /// Artifact location flag
    pub output: Option<PathBuf>,
}

/// Options only `build` accepts.
#[derive(Default)]
pub struct BuildOverrides {
    /// `-I/--include` roots, in order
    pub include_roots: Vec<PathBuf>,
    /// `--extension` suffixes
    pub extensions: Vec<String>,
    /// `--blacklist` patterns
    pub blacklist: Vec<String>,
}

/// Load the config file (if any) and merge it with the flags.
pub async fn resolve_config(
    global: &GlobalOptions,
    overrides: BuildOverrides,
) -> incdeps::Result<Config> {
    let file = match &global.config {
        Some(path) => ConfigFile::load(path).await?,
        None => ConfigFile::default(),
    };
    let cwd = std::env::current_dir()?;
    Ok(merge(global, file, overrides, &cwd))
}

fn merge(
    global: &GlobalOptions,
    file: ConfigFile,
    overrides: BuildOverrides,
    cwd: &Path,
) -> Config {
    let scan_path = absolute(
        global
            .scan_path
            .clone()
            .or(file.scan_path)
            .unwrap_or_else(|| cwd.to_path_buf()),
        cwd,
    );

    let output = match global.output.clone().or(file.output) {
        Some(output) => absolute(output, cwd),
        None => default_output(&scan_path),
    };

    let include_roots = if !overrides.include_roots.is_empty() {
        overrides.include_roots
    } else if !file.include_roots.is_empty() {
        file.include_roots
    } else {
        vec![scan_path.clone()]
    };
    let include_roots: Vec<PathBuf> = include_roots
        .into_iter()
        .map(|root| absolute(root, cwd))
        .collect();

    let blacklist = if overrides.blacklist.is_empty() {
        file.blacklist
    } else {
        overrides.blacklist
    };

    let mut config = Config::new(scan_path, output)
        .with_include_roots(include_roots)
        .with_blacklist(blacklist);
    if !overrides.extensions.is_empty() {
        config = config.with_extensions(overrides.extensions);
    } else if let Some(extensions) = file.extensions {
        config = config.with_extensions(extensions);
    }
    config
}

/// Anchor a relative path at `cwd`; absolute paths pass through unchanged.
pub fn absolute(path: PathBuf, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
            .components()
            .filter(|c| !matches!(c, std::path::Component::CurDir))
            .collect()
    }
}
