//! Root-relative path handling for library files
//!
//! Library paths are stored with forward slashes regardless of platform and
//! converted to native form only at I/O boundaries. Destination names are
//! additionally sanitized for FAT32-class filesystems, the most restrictive
//! target a portable player is likely to use.

use std::path::{Path, PathBuf};

/// Characters FAT32 cannot represent in a file name.
const FAT32_FORBIDDEN: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

/// A root-relative path normalized to forward slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl RelPath {
    /// Create a new `RelPath` from a forward-slash-separated string.
    ///
    /// Leading `./` and surrounding slashes are stripped. Backslashes are
    /// kept verbatim: on Unix they are legal name characters, and
    /// [`sanitize`](Self::sanitize) rewrites them for the destination.
    pub fn new(path: impl AsRef<str>) -> Self {
        let trimmed = path
            .as_ref()
            .trim_start_matches("./")
            .trim_matches('/')
            .to_string();
        Self { inner: trimmed }
    }

    /// Build a `RelPath` from a native path, joining its components with `/`.
    pub fn from_components(path: &Path) -> Self {
        let joined = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self::new(joined)
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Resolve this path against a root directory for I/O.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(PathBuf::from(&self.inner))
    }

    /// Get the final path component.
    pub fn file_name(&self) -> &str {
        self.inner.rsplit('/').next().unwrap_or(&self.inner)
    }

    /// Get the extension of the final component, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Replace (or append) the extension of the final component.
    pub fn with_extension(&self, extension: &str) -> Self {
        let stem_len = match self.file_name().rfind('.') {
            Some(0) | None => self.inner.len(),
            Some(idx) => self.inner.len() - (self.file_name().len() - idx),
        };
        Self {
            inner: format!("{}.{}", &self.inner[..stem_len], extension),
        }
    }

    /// Rewrite characters FAT32 cannot represent to `_`.
    ///
    /// Applied to destination names only; `/` separators are untouched.
    pub fn sanitize(&self) -> Self {
        let sanitized = self
            .inner
            .chars()
            .map(|c| if FAT32_FORBIDDEN.contains(&c) { '_' } else { c })
            .collect();
        Self { inner: sanitized }
    }

    /// Drop the first path segment, if there is more than one.
    ///
    /// Playlists authored against a different mount prefix resolve by
    /// repeatedly stripping leading segments until the store recognizes the
    /// remainder.
    pub fn strip_first_segment(&self) -> Option<Self> {
        self.inner
            .split_once('/')
            .map(|(_, rest)| Self::new(rest))
    }

    /// Render with backslash separators for device playlists.
    pub fn to_backslash(&self) -> String {
        self.inner.replace('/', "\\")
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for RelPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
