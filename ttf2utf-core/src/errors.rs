//! errors.rs - Custom error types for the ttf2utf-core library.
//!
//! Every failure a caller may want to react to differently has its own variant,
//! so front ends can print a specific message (or ask for another font) per kind.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// This enum represents all possible error types in the `ttf2utf-core` library.
///
/// Marked `#[non_exhaustive]` so new kinds can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Ttf2UtfError {
    /// The rule definition file could not be opened or read.
    #[error("Mapping definition file '{}' cannot be opened: {source}", path.display())]
    MapFileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule definition was readable but is not a valid map definition.
    #[error("Invalid mapping definition: {0}")]
    InvalidMapDefinition(String),

    /// No rule set is registered for the requested origin font.
    #[error("The mapping for origin font '{0}' does not exist")]
    NoMapForOrigin(String),

    /// No reverse transcoder exists for the requested output font.
    #[error("Cannot map to output font '{0}'")]
    UnsupportedTarget(String),

    /// Font auto-detection was requested from a collaborator that cannot do it.
    #[error("Font auto-detection is not supported for {0}")]
    AutoDetectUnsupported(String),

    /// A document package could not be read or is missing required parts.
    #[error("Improper document '{}': {reason}", path.display())]
    BadDocument { path: PathBuf, reason: String },

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = Ttf2UtfError> = std::result::Result<T, E>;
