//! SHA-256 fingerprints of source files and directories

use crate::PersistenceError;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Fingerprint of a source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHash {
    /// Hex digest of the file, or of the directory's files concatenated in name order
    pub hash: String,
    /// Relative file name → hex digest; directories only
    pub manifest: Option<BTreeMap<String, String>>,
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hash a source file, or every non-hidden file below a source directory
pub fn hash_source<P: AsRef<Path>>(path: P) -> Result<SourceHash, PersistenceError> {
    let path = path.as_ref();
    if !path.is_dir() {
        let bytes = read(path)?;
        return Ok(SourceHash {
            hash: hash_bytes(&bytes),
            manifest: None,
        });
    }

    let mut combined = Sha256::new();
    let mut manifest = BTreeMap::new();
    for file in source_files(path)? {
        let bytes = read(&file)?;
        combined.update(&bytes);
        let name = file.strip_prefix(path).unwrap_or(file.as_path()).to_string_lossy().into_owned();
        manifest.insert(name, hash_bytes(&bytes));
    }
    Ok(SourceHash {
        hash: format!("{:x}", combined.finalize()),
        manifest: Some(manifest),
    })
}

/// Regular, non-hidden files below `dir`, sorted by path
fn source_files(dir: &Path) -> Result<Vec<PathBuf>, PersistenceError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry.map_err(|err| PersistenceError::Walk {
            path: dir.to_path_buf(),
            message: err.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read(path: &Path) -> Result<Vec<u8>, PersistenceError> {
    fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
