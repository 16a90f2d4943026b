//! Error types for the md2txt library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for md2txt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for md2txt library.
///
/// Structural problems in a document (malformed front matter, unterminated
/// inline markup) never surface here; they degrade to literal text so a
/// best-effort conversion is always produced. Only missing referenced
/// content and bad plugin lookups are fatal.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An include chain re-entered a file that is still being expanded.
    #[error("circular include detected for '{}'", .0.display())]
    IncludeCycle(PathBuf),

    /// An include directive referenced a file that does not exist.
    #[error("included file '{}' was not found", .0.display())]
    MissingInclude(PathBuf),

    /// An art directive referenced a file that could not be loaded.
    #[error("art file '{}' was not found", .0.display())]
    ArtLoad(PathBuf),

    /// A parser or renderer name was not found in the registry.
    #[error("{kind} plugin '{name}' is not registered")]
    UnknownPlugin { kind: &'static str, name: String },

    /// A parser or renderer name was registered twice.
    #[error("{kind} plugin '{name}' is already registered")]
    DuplicatePlugin { kind: &'static str, name: String },
}
