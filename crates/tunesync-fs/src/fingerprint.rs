//! Bounded-prefix content fingerprinting
//!
//! Fingerprints use a single canonical format (`sha256:<hex>`) computed over
//! the first [`FINGERPRINT_PREFIX_LEN`] bytes of a file. Hashing only a
//! prefix keeps a full-library pass cheap, at the cost of missing edits that
//! occur entirely past the prefix. Tag and header rewrites land at the front
//! of every supported container, which is what the sync engine needs to
//! detect.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Number of bytes hashed from the start of each file.
pub const FINGERPRINT_PREFIX_LEN: u64 = 64 * 1024;

/// Compute the bounded-prefix fingerprint of a file.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut prefix = Vec::new();
    file.take(FINGERPRINT_PREFIX_LEN)
        .read_to_end(&mut prefix)
        .map_err(|e| Error::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&prefix);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}
