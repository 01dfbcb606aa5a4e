//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tunesync_actions::TagHacks;
use tunesync_core::SyncMode;

/// tunesync - Sync music library to external device
#[derive(Parser, Debug)]
#[command(name = "tunesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file with default settings
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Folder containing the audio sources
    #[arg(long, value_name = "DIR")]
    pub audio_src: Option<PathBuf>,

    /// Target directory for converted audio files
    #[arg(long, value_name = "DIR")]
    pub audio_dest: Option<PathBuf>,

    /// Folder containing the source playlists
    #[arg(long, value_name = "DIR")]
    pub playlist_src: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Rerun actions even if the files have not changed
    #[arg(short, long)]
    pub force: bool,

    /// Batch mode, no user input
    #[arg(short, long)]
    pub batch: bool,

    /// How media files are carried into the destination
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hack: write the album artist into the artist field
    #[arg(long)]
    pub albumartist_artist_hack: bool,

    /// Hack: write the album artist into the composer field
    #[arg(long)]
    pub albumartist_composer_hack: bool,

    /// Hack: write the artist into the album artist field
    #[arg(long)]
    pub artist_albumartist_hack: bool,

    /// Hack: extend the album field by the disc number
    #[arg(long)]
    pub discnumber_hack: bool,

    /// Hack: remove the track total from the track number
    #[arg(long)]
    pub tracknumber_hack: bool,
}

impl Cli {
    pub fn tag_hacks(&self) -> TagHacks {
        TagHacks {
            albumartist_artist: self.albumartist_artist_hack,
            albumartist_composer: self.albumartist_composer_hack,
            artist_albumartist: self.artist_albumartist_hack,
            discnumber: self.discnumber_hack,
            tracknumber: self.tracknumber_hack,
        }
    }
}

/// `--mode` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Transcode everything except files already in the target format
    Auto,
    /// Transcode everything
    Transcode,
    /// Transcode with per-track ReplayGain volume baked in
    Replaygain,
    /// Transcode with per-album ReplayGain volume baked in
    ReplaygainAlbum,
    /// Copy files unmodified
    Copy,
}

impl From<ModeArg> for SyncMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => SyncMode::Auto,
            ModeArg::Transcode => SyncMode::Transcode,
            ModeArg::Replaygain => SyncMode::ReplayGain,
            ModeArg::ReplaygainAlbum => SyncMode::ReplayGainAlbum,
            ModeArg::Copy => SyncMode::Copy,
        }
    }
}
