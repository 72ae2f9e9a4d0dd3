//! # owlcheck store
//!
//! Saves resolved ontologies and ingested data graphs to disk so later runs
//! can skip resolution and ingestion. Every file starts with an 8-byte kind
//! marker and a JSON metadata block recording the format version and a
//! fingerprint of the source it was built from. Loading rejects a file of
//! the wrong kind or with a different format version.

pub mod format;
pub mod hash;

pub use format::{
    describe, load, read_marker, read_metadata, save, Metadata, Persist, StoredKind, CASEDATA_FORMAT_VERSION,
    ONTOLOGY_FORMAT_VERSION,
};
pub use hash::{hash_bytes, hash_source, SourceHash};

use std::path::PathBuf;
use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot walk {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },

    #[error("{} is not an owlcheck file", .path.display())]
    NotOwlcheckFile { path: PathBuf },

    #[error("{} holds {found} data, expected {expected}", .path.display())]
    WrongKind {
        path: PathBuf,
        expected: StoredKind,
        found: StoredKind,
    },

    #[error("{} has format version {found}, this build reads {expected}", .path.display())]
    VersionMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}
