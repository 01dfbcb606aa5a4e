//! Shared test fixtures for the tunesync workspace.
//!
//! Provides [`TestLibrary`], a tempdir-backed source/destination/playlist
//! tree builder used by unit and integration tests. Dev-dependency only —
//! never published.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A temporary music library with source, destination and playlist roots.
///
/// # Example
///
/// ```rust,no_run
/// use tunesync_test_utils::TestLibrary;
///
/// let library = TestLibrary::new();
/// library.add_source("Artist/Album/01 Song.flac", b"flac bytes");
/// library.add_playlist("mix.m3u", b"Artist/Album/01 Song.flac\r\n");
/// assert!(library.source_root().join("Artist/Album/01 Song.flac").exists());
/// ```
pub struct TestLibrary {
    source: TempDir,
    dest: TempDir,
    playlists: TempDir,
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLibrary {
    /// Create three empty temporary roots.
    pub fn new() -> Self {
        Self {
            source: TempDir::new().expect("TestLibrary: failed to create source root"),
            dest: TempDir::new().expect("TestLibrary: failed to create dest root"),
            playlists: TempDir::new().expect("TestLibrary: failed to create playlist root"),
        }
    }

    pub fn source_root(&self) -> &Path {
        self.source.path()
    }

    pub fn dest_root(&self) -> &Path {
        self.dest.path()
    }

    pub fn playlist_root(&self) -> &Path {
        self.playlists.path()
    }

    /// Write a file under the source root, creating parent directories.
    pub fn add_source(&self, rel: &str, contents: &[u8]) {
        Self::write(self.source.path(), rel, contents);
    }

    /// Write a file under the destination root, creating parent directories.
    pub fn add_dest(&self, rel: &str, contents: &[u8]) {
        Self::write(self.dest.path(), rel, contents);
    }

    /// Write a playlist under the playlist root.
    pub fn add_playlist(&self, rel: &str, contents: &[u8]) {
        Self::write(self.playlists.path(), rel, contents);
    }

    /// Read a file under the destination root.
    pub fn read_dest(&self, rel: &str) -> Vec<u8> {
        fs::read(self.dest.path().join(rel)).expect("TestLibrary: failed to read dest file")
    }

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("TestLibrary: failed to create parent directory");
        }
        fs::write(path, contents).expect("TestLibrary: failed to write file");
    }
}
