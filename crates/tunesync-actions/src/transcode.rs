//! Transcode action
//!
//! Converts audio to MP3 by invoking an external `ffmpeg` binary. When a
//! ReplayGain mode is active, the volume adjustment is applied during the
//! encode so the output plays at the right level on players that ignore
//! ReplayGain tags.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};
use tunesync_fs::RelPath;

use crate::replaygain::ReplayGain;
use crate::{Action, ActionError};

/// LAME VBR quality passed to ffmpeg (`-qscale:a`; 0 best, 9 fastest).
const MP3_QUALITY: &str = "2";

/// Which ReplayGain values, if any, to bake into the encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainMode {
    /// Plain transcode, tags carry ReplayGain through unchanged
    None,
    /// Apply per-track gain
    Track,
    /// Apply per-album gain
    Album,
}

/// Transcodes audio files to MP3 via `ffmpeg`.
#[derive(Debug)]
pub struct Transcode {
    gain_mode: GainMode,
}

impl Transcode {
    pub fn new(gain_mode: GainMode) -> Self {
        Self { gain_mode }
    }

    /// Volume multiplier for the current gain mode, if the source carries
    /// usable ReplayGain tags.
    fn volume_for(&self, source: &Path) -> Option<f64> {
        let album = match self.gain_mode {
            GainMode::None => return None,
            GainMode::Track => false,
            GainMode::Album => true,
        };
        match ReplayGain::from_tags(source, album) {
            Some(info) => Some(info.volume_multiplier()),
            None => {
                warn!(
                    source = %source.display(),
                    "No ReplayGain information, transcoding without volume adjustment"
                );
                None
            }
        }
    }

    fn build_command(&self, source: &Path, dest: &Path, volume: Option<f64>) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-hide_banner")
            .arg("-nostdin")
            .arg("-y")
            .arg("-i")
            .arg(source);
        if let Some(multiplier) = volume {
            cmd.arg("-af").arg(format!("volume={multiplier:.6}"));
        }
        cmd.arg("-codec:a")
            .arg("libmp3lame")
            .arg("-qscale:a")
            .arg(MP3_QUALITY)
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Action for Transcode {
    fn name(&self) -> &'static str {
        "transcode"
    }

    fn destination_name(&self, source: &RelPath) -> Option<RelPath> {
        Some(source.with_extension("mp3"))
    }

    fn apply(&self, source: &Path, dest: &Path) -> Result<(), ActionError> {
        debug!(source = %source.display(), dest = %dest.display(), "Transcoding");

        let volume = self.volume_for(source);
        let output = self
            .build_command(source, dest, volume)
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    ActionError::fatal("ffmpeg not found, install it and retry")
                } else {
                    ActionError::io(format!("failed to run ffmpeg: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ActionError::io(format!(
                "ffmpeg failed on {} ({}): {}",
                source.display(),
                output.status,
                stderr.lines().last().unwrap_or("no output")
            )));
        }

        Ok(())
    }
}
