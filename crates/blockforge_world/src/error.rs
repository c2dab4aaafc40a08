//! # World Error Types
//!
//! All errors the world storage layer can surface.

use thiserror::Error;

/// Errors raised while loading a binary world file.
///
/// Out-of-bounds edits are deliberately NOT here: they are silent no-ops
/// by contract, never errors.
#[derive(Error, Debug)]
pub enum WorldLoadError {
    /// The first four bytes were not the world magic.
    #[error("bad world magic: expected \"VXW1\", got {found:?}")]
    BadMagic {
        /// The four bytes actually found.
        found: [u8; 4],
    },

    /// The header version is not one this build understands.
    #[error("unsupported world version {0}")]
    BadVersion(u32),

    /// The stream ended before a complete header or chunk record.
    #[error("truncated world stream")]
    Truncated,

    /// The stream length does not match the declared chunk count.
    #[error("world stream size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Byte count the header implies.
        expected: u64,
        /// Byte count actually present.
        actual: u64,
    },

    /// An underlying filesystem error.
    #[error("world file io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for world persistence operations.
pub type WorldResult<T> = Result<T, WorldLoadError>;
