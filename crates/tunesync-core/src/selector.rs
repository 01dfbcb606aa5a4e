//! Action selection
//!
//! Pure decision table mapping a source path and the sync mode to the
//! ordered action pipeline for that file.

use std::str::FromStr;
use std::sync::Arc;

use tunesync_actions::{Action, CopyAction, GainMode, TagCopy, TagHacks, Transcode};
use tunesync_actions::tags::COVER_ART_NAME;
use tunesync_fs::RelPath;

/// Extensions the transform pipeline accepts as input.
pub const MEDIA_EXTENSIONS: &[&str] = &["flac", "ogg", "mp3", "m4a"];

/// Extension the transform pipeline produces.
pub const TARGET_EXTENSION: &str = "mp3";

/// How media files are carried into the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Transcode everything except files already in the target format
    #[default]
    Auto,
    /// Transcode everything, including files already in the target format
    Transcode,
    /// Transcode and bake per-track ReplayGain volume into the audio
    ReplayGain,
    /// Transcode and bake per-album ReplayGain volume into the audio
    ReplayGainAlbum,
    /// Copy files unmodified
    Copy,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Transcode => "transcode",
            Self::ReplayGain => "replaygain",
            Self::ReplayGainAlbum => "replaygain-album",
            Self::Copy => "copy",
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "transcode" => Ok(Self::Transcode),
            "replaygain" => Ok(Self::ReplayGain),
            "replaygain-album" => Ok(Self::ReplayGainAlbum),
            "copy" => Ok(Self::Copy),
            other => Err(format!("unknown sync mode: {other}")),
        }
    }
}

/// Assigns each enumerated file its action pipeline.
///
/// The actions themselves are built once and shared across tasks; they
/// carry no per-file state.
pub struct ActionSelector {
    mode: SyncMode,
    copy: Arc<dyn Action>,
    transform: Vec<Arc<dyn Action>>,
}

impl ActionSelector {
    pub fn new(mode: SyncMode, hacks: TagHacks) -> Self {
        let gain_mode = match mode {
            SyncMode::ReplayGain => GainMode::Track,
            SyncMode::ReplayGainAlbum => GainMode::Album,
            _ => GainMode::None,
        };
        // Once the volume is baked into the audio, the tags must not
        // advertise ReplayGain a second time.
        let keep_replaygain = gain_mode == GainMode::None;

        Self {
            mode,
            copy: Arc::new(CopyAction),
            transform: vec![
                Arc::new(Transcode::new(gain_mode)),
                Arc::new(TagCopy::new(hacks, keep_replaygain)),
            ],
        }
    }

    /// Ordered action pipeline for one source path; empty means skip.
    pub fn select(&self, source: &RelPath) -> Vec<Arc<dyn Action>> {
        // Cover art is carried through unmodified in every mode.
        if source.file_name().ends_with(COVER_ART_NAME) {
            return vec![self.copy.clone()];
        }

        let Some(extension) = source.extension() else {
            return Vec::new();
        };
        let extension = extension.to_ascii_lowercase();
        if !MEDIA_EXTENSIONS.contains(&extension.as_str()) {
            return Vec::new();
        }

        match self.mode {
            SyncMode::Copy => vec![self.copy.clone()],
            SyncMode::Auto if extension == TARGET_EXTENSION => vec![self.copy.clone()],
            _ => self.transform.clone(),
        }
    }
}
