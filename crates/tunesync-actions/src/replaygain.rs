//! ReplayGain information
//!
//! Reads ReplayGain v2 gain/peak pairs from source tags and converts them
//! into the linear volume multiplier the transcoder bakes into the output.

use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;
use tracing::debug;

/// ReplayGain gain/peak pair for one track or album.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayGain {
    /// Suggested gain adjustment in dB (negative for loud material)
    pub gain_db: f64,
    /// Highest sample value as a linear fraction of full scale
    pub peak: f64,
}

impl ReplayGain {
    /// Convert the gain into a linear volume multiplier, clamped so the
    /// stored peak cannot clip after amplification.
    pub fn volume_multiplier(&self) -> f64 {
        let multiplier = 10f64.powf(self.gain_db / 20.0);
        if self.peak > 0.0 {
            multiplier.min(1.0 / self.peak)
        } else {
            multiplier
        }
    }

    /// Read ReplayGain info from a file's tags.
    ///
    /// Returns `None` when the file has no tags, the tags carry no
    /// ReplayGain fields, or the values do not parse.
    pub fn from_tags(path: &Path, album: bool) -> Option<Self> {
        let tagged = lofty::read_from_path(path).ok()?;
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;

        let (gain_key, peak_key) = if album {
            (ItemKey::ReplayGainAlbumGain, ItemKey::ReplayGainAlbumPeak)
        } else {
            (ItemKey::ReplayGainTrackGain, ItemKey::ReplayGainTrackPeak)
        };

        let gain_db = parse_db(tag.get_string(&gain_key)?)?;
        let peak: f64 = tag.get_string(&peak_key)?.trim().parse().ok()?;

        let info = Self { gain_db, peak };
        debug!(path = %path.display(), gain_db, peak, "Read ReplayGain tags");
        Some(info)
    }
}

/// Parse a `"-8.25 dB"`-style tag value into a float.
fn parse_db(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("dB").trim().parse().ok()
}
