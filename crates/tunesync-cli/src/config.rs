//! Config-file defaults and settings resolution
//!
//! A TOML file can supply defaults for anything the command line leaves
//! out; explicit arguments always win. Without `--config-file` the
//! defaults come from `~/.tunesync.toml` when that exists.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use tunesync_core::{SyncConfig, SyncMode};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Default config file name inside the home directory.
const DEFAULT_CONFIG_NAME: &str = ".tunesync.toml";

/// Default worker count when neither CLI nor config file set one.
const DEFAULT_JOBS: usize = 4;

/// Defaults read from the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileDefaults {
    pub audio_src: Option<PathBuf>,
    pub audio_dest: Option<PathBuf>,
    pub playlist_src: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub mode: Option<String>,
}

/// Load defaults from `path`, or from the home-directory config when no
/// path is given.
///
/// An explicitly named file must exist and parse; the implicit default
/// file is allowed to be absent.
pub fn load_defaults(path: Option<&Path>) -> Result<FileDefaults> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match dirs::home_dir() {
            Some(home) => (home.join(DEFAULT_CONFIG_NAME), false),
            None => return Ok(FileDefaults::default()),
        },
    };

    if !path.exists() {
        if explicit {
            return Err(CliError::user(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(FileDefaults::default());
    }

    debug!(path = %path.display(), "Reading config file");
    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(|e| CliError::Config {
        path,
        message: e.to_string(),
    })
}

/// Merge CLI arguments over file defaults into a validated [`SyncConfig`].
pub fn resolve(cli: &Cli, defaults: FileDefaults) -> Result<SyncConfig> {
    let audio_src = cli
        .audio_src
        .clone()
        .or(defaults.audio_src)
        .ok_or_else(|| CliError::user("audio-src is required (argument or config file)"))?;
    let audio_dest = cli
        .audio_dest
        .clone()
        .or(defaults.audio_dest)
        .ok_or_else(|| CliError::user("audio-dest is required (argument or config file)"))?;
    let playlist_src = cli.playlist_src.clone().or(defaults.playlist_src);

    require_directory("audio-src", &audio_src)?;
    require_directory("audio-dest", &audio_dest)?;
    if let Some(playlist_src) = &playlist_src {
        require_directory("playlist-src", playlist_src)?;
    }

    let mode = match cli.mode {
        Some(mode) => mode.into(),
        None => match &defaults.mode {
            Some(mode) => mode
                .parse::<SyncMode>()
                .map_err(CliError::user)?,
            None => SyncMode::default(),
        },
    };

    Ok(SyncConfig {
        audio_src,
        audio_dest,
        playlist_src,
        jobs: cli.jobs.or(defaults.jobs).unwrap_or(DEFAULT_JOBS).max(1),
        force: cli.force,
        batch: cli.batch,
        mode,
        hacks: cli.tag_hacks(),
    })
}

fn require_directory(name: &str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(CliError::user(format!(
            "{} is not an accessible directory: {}",
            name,
            path.display()
        )));
    }
    Ok(())
}
