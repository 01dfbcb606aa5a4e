//! Library enumeration
//!
//! Lists every non-hidden file under a root as root-relative paths. A file
//! is hidden when its own name, or any directory name between it and the
//! root, starts with a dot.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::path::RelPath;
use crate::{Error, Result};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Enumerate all non-hidden files under `root` as relative paths.
///
/// Traversal is sorted by file name so successive runs see the same order.
/// Each call walks the tree from scratch.
///
/// # Errors
///
/// Returns an error if a directory cannot be read during traversal.
pub fn enumerate_files(root: &Path) -> Result<Vec<RelPath>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker.filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|e| Error::Walk {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).map_err(|e| Error::Walk {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;
        files.push(RelPath::from_components(relative));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn lists_nested_files_with_forward_slashes() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Artist/Album/01 Song.flac"));
        touch(&dir.path().join("Artist/Album/folder.jpg"));
        touch(&dir.path().join("single.mp3"));

        let files = enumerate_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|p| p.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Artist/Album/01 Song.flac",
                "Artist/Album/folder.jpg",
                "single.mp3",
            ]
        );
    }

    #[test]
    fn skips_hidden_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("visible.mp3"));
        touch(&dir.path().join(".hidden.mp3"));
        touch(&dir.path().join(".hidden/inside.mp3"));
        touch(&dir.path().join("Artist/.cache/track.mp3"));

        let files = enumerate_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|p| p.as_str()).collect();

        assert_eq!(names, vec!["visible.mp3"]);
    }

    #[test]
    fn hidden_root_is_still_walked() {
        // Temp dirs frequently start with a dot; only names below the root
        // count as hidden.
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join(".library");
        touch(&root.join("song.mp3"));

        let files = enumerate_files(&root).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = enumerate_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.mp3"));
        touch(&dir.path().join("a.mp3"));

        let first = enumerate_files(dir.path()).unwrap();
        let second = enumerate_files(dir.path()).unwrap();
        assert_eq!(first, second);
    }
}
