//! Tag conversion action
//!
//! Rebuilds the destination MP3's ID3v2 tag from the source file's tags:
//! text fields, MusicBrainz identifiers, ReplayGain values and embedded
//! pictures, with a `folder.jpg` fallback cover. A handful of player
//! compatibility hacks can rewrite fields on the way through.

use std::fs;
use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use tracing::debug;
use tunesync_fs::RelPath;

use crate::{Action, ActionError};

/// Album art file carried alongside the tracks of an album.
pub const COVER_ART_NAME: &str = "folder.jpg";

/// Artist substituted when a hack needs a value that the tags lack.
const VARIOUS_ARTISTS: &str = "Various Artists";

/// Tag fields carried from the source to the destination.
const COPIED_KEYS: &[ItemKey] = &[
    ItemKey::TrackTitle,
    ItemKey::TrackArtist,
    ItemKey::AlbumTitle,
    ItemKey::AlbumArtist,
    ItemKey::Genre,
    ItemKey::RecordingDate,
    ItemKey::TrackNumber,
    ItemKey::TrackTotal,
    ItemKey::DiscNumber,
    ItemKey::DiscTotal,
    ItemKey::Composer,
    ItemKey::MusicBrainzRecordingId,
    ItemKey::MusicBrainzTrackId,
    ItemKey::MusicBrainzArtistId,
    ItemKey::MusicBrainzReleaseId,
    ItemKey::MusicBrainzReleaseArtistId,
    ItemKey::MusicBrainzReleaseGroupId,
    ItemKey::ReplayGainTrackGain,
    ItemKey::ReplayGainTrackPeak,
    ItemKey::ReplayGainAlbumGain,
    ItemKey::ReplayGainAlbumPeak,
];

const REPLAYGAIN_KEYS: &[ItemKey] = &[
    ItemKey::ReplayGainTrackGain,
    ItemKey::ReplayGainTrackPeak,
    ItemKey::ReplayGainAlbumGain,
    ItemKey::ReplayGainAlbumPeak,
];

/// Player compatibility hacks applied after tag conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagHacks {
    /// Write the album artist into the artist field
    pub albumartist_artist: bool,
    /// Write the album artist into the composer field
    pub albumartist_composer: bool,
    /// Write the artist into the album artist field
    pub artist_albumartist: bool,
    /// Extend the album field by the disc number
    pub discnumber: bool,
    /// Remove the track total from the track number
    pub tracknumber: bool,
}

/// Converts source tags into an ID3v2 tag on the destination MP3.
#[derive(Debug)]
pub struct TagCopy {
    hacks: TagHacks,
    /// When the transcode already baked the ReplayGain volume into the
    /// audio, the tags must not advertise it a second time.
    keep_replaygain: bool,
}

impl TagCopy {
    pub fn new(hacks: TagHacks, keep_replaygain: bool) -> Self {
        Self {
            hacks,
            keep_replaygain,
        }
    }
}

impl Action for TagCopy {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn destination_name(&self, source: &RelPath) -> Option<RelPath> {
        Some(source.with_extension("mp3"))
    }

    fn apply(&self, source: &Path, dest: &Path) -> Result<(), ActionError> {
        debug!(source = %source.display(), dest = %dest.display(), "Converting tags");

        let tagged = lofty::read_from_path(source).map_err(|e| {
            ActionError::io(format!(
                "failed to read tags from {}: {}",
                source.display(),
                e
            ))
        })?;

        let mut dest_tag = Tag::new(TagType::Id3v2);
        if let Some(src_tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            copy_items(src_tag, &mut dest_tag);
            copy_pictures(src_tag, &mut dest_tag);
        }
        embed_folder_cover(source, &mut dest_tag)?;
        apply_hacks(&self.hacks, &mut dest_tag);
        if !self.keep_replaygain {
            strip_replaygain(&mut dest_tag);
        }

        dest_tag
            .save_to_path(dest, WriteOptions::default())
            .map_err(|e| {
                ActionError::io(format!(
                    "failed to write tags to {}: {}",
                    dest.display(),
                    e
                ))
            })?;
        Ok(())
    }
}

/// Carry the supported text fields over, whatever tag format they came from.
fn copy_items(src: &Tag, dest: &mut Tag) {
    for key in COPIED_KEYS {
        if let Some(value) = src.get_string(key) {
            let value = value.to_string();
            dest.insert_text(key.clone(), value);
        }
    }
}

fn copy_pictures(src: &Tag, dest: &mut Tag) {
    for picture in src.pictures() {
        dest.push_picture(picture.clone());
    }
}

/// Embed `folder.jpg` from the source directory when the tags carry no art.
fn embed_folder_cover(source: &Path, dest: &mut Tag) -> Result<(), ActionError> {
    if !dest.pictures().is_empty() {
        return Ok(());
    }
    let Some(dir) = source.parent() else {
        return Ok(());
    };
    let cover = dir.join(COVER_ART_NAME);
    if !cover.exists() {
        return Ok(());
    }

    let data = fs::read(&cover)
        .map_err(|e| ActionError::io(format!("failed to read {}: {}", cover.display(), e)))?;
    dest.push_picture(Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::Jpeg),
        None,
        data,
    ));
    Ok(())
}

fn apply_hacks(hacks: &TagHacks, tag: &mut Tag) {
    if hacks.albumartist_artist {
        let artist = tag
            .get_string(&ItemKey::AlbumArtist)
            .unwrap_or(VARIOUS_ARTISTS)
            .to_string();
        tag.set_artist(artist);
    }
    if hacks.albumartist_composer {
        if let Some(albumartist) = tag.get_string(&ItemKey::AlbumArtist).map(str::to_string) {
            tag.insert_text(ItemKey::Composer, albumartist);
        }
    }
    if hacks.artist_albumartist {
        let albumartist = tag
            .artist()
            .map(|a| a.to_string())
            .unwrap_or_else(|| VARIOUS_ARTISTS.to_string());
        tag.insert_text(ItemKey::AlbumArtist, albumartist);
    }
    if hacks.discnumber {
        if let (Some(album), Some(disc)) = (tag.album().map(|a| a.to_string()), tag.disk()) {
            if disc > 1 {
                tag.set_album(format!("{album} - {disc}"));
            }
        }
    }
    if hacks.tracknumber {
        tag.take(&ItemKey::TrackTotal).for_each(drop);
    }
}

fn strip_replaygain(tag: &mut Tag) {
    for key in REPLAYGAIN_KEYS {
        tag.take(key).for_each(drop);
    }
}
