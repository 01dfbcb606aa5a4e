//! Filesystem primitives for tunesync
//!
//! Provides relative-path handling, bounded-prefix content fingerprinting
//! and hidden-aware library enumeration.

pub mod error;
pub mod fingerprint;
pub mod path;
pub mod walk;

pub use error::{Error, Result};
pub use fingerprint::fingerprint_file;
pub use path::RelPath;
pub use walk::enumerate_files;
