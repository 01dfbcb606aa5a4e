//! Playlist rewriting
//!
//! Rewrites M3U playlists so their entries point at the transformed files
//! in the destination tree. Lookups go through the committed fingerprint
//! store; entries the store does not know are dropped with a warning.
//!
//! Device players expect Windows conventions: Windows-1252 encoding, CRLF
//! line endings and backslash separators.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::{error, info, warn};
use tunesync_fs::{Error, RelPath, enumerate_files};

use crate::store::StoreRecord;

/// Playlist file extension.
pub const PLAYLIST_EXTENSION: &str = "m3u";

/// Lines starting with this pass through unchanged.
const COMMENT_MARKER: char = '#';

/// Rewrites playlists against the committed store records.
pub struct PlaylistRewriter<'a> {
    playlist_root: &'a Path,
    dest_root: &'a Path,
    records: &'a HashMap<String, StoreRecord>,
}

impl<'a> PlaylistRewriter<'a> {
    pub fn new(
        playlist_root: &'a Path,
        dest_root: &'a Path,
        records: &'a HashMap<String, StoreRecord>,
    ) -> Self {
        Self {
            playlist_root,
            dest_root,
            records,
        }
    }

    /// Rewrite every playlist under the playlist root.
    ///
    /// A failure on one playlist is logged and does not stop the rest.
    pub fn rewrite_all(&self) {
        let playlists = match enumerate_files(self.playlist_root) {
            Ok(files) => files,
            Err(e) => {
                error!(
                    "Failed to list playlists under {}: {}",
                    self.playlist_root.display(),
                    e
                );
                return;
            }
        };

        for playlist in playlists
            .into_iter()
            .filter(|p| p.extension() == Some(PLAYLIST_EXTENSION))
        {
            if let Err(e) = self.rewrite_one(&playlist) {
                error!("Failed to sync playlist {}: {}", playlist, e);
            }
        }
    }

    fn rewrite_one(&self, playlist: &RelPath) -> tunesync_fs::Result<()> {
        info!("Syncing playlist {}", playlist);

        let source_abs = playlist.resolve(self.playlist_root);
        let dest_abs = playlist.sanitize().resolve(self.dest_root);

        let bytes = fs::read(&source_abs).map_err(|e| Error::io(&source_abs, e))?;
        let (text, _, _) = WINDOWS_1252.decode(&bytes);

        let mut output = String::new();
        for line in text.lines() {
            if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
                output.push_str(line);
            } else if let Some(dest) = self.resolve_entry(line) {
                output.push_str(&dest.to_backslash());
            } else {
                warn!("File does not exist, dropping playlist entry: {}", line);
                continue;
            }
            output.push_str("\r\n");
        }

        // Replace the previous playlist wholesale; there are no merge
        // semantics.
        if dest_abs.exists() {
            fs::remove_file(&dest_abs).map_err(|e| Error::io(&dest_abs, e))?;
        }
        if let Some(parent) = dest_abs.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let (encoded, _, _) = WINDOWS_1252.encode(&output);
        fs::write(&dest_abs, encoded.as_ref()).map_err(|e| Error::io(&dest_abs, e))?;
        Ok(())
    }

    /// Resolve one playlist entry through the store.
    ///
    /// Entries authored against a different mount prefix are handled by
    /// stripping leading path segments until the store recognizes the
    /// remainder.
    fn resolve_entry(&self, line: &str) -> Option<RelPath> {
        let mut candidate = RelPath::new(line.trim().replace('\\', "/"));
        loop {
            if let Some(record) = self.records.get(candidate.as_str()) {
                return Some(RelPath::new(&record.dest));
            }
            candidate = candidate.strip_first_segment()?;
        }
    }
}
