//! File layout: an 8-byte marker, a length-prefixed JSON metadata block and a
//! length-prefixed bincode body. Lengths are little-endian `u64`.

use crate::hash::hash_source;
use crate::PersistenceError;
use chrono::{DateTime, Utc};
use owlcheck_core::DataGraph;
use owlcheck_owl::ResolvedOntology;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MARKER_LEN: usize = 8;
pub const ONTOLOGY_MARKER: &[u8; MARKER_LEN] = b"ontology";
pub const CASEDATA_MARKER: &[u8; MARKER_LEN] = b"casedata";

/// Format version written by and expected from this build for ontologies
pub const ONTOLOGY_FORMAT_VERSION: &str = "1.0";
/// Format version written by and expected from this build for data graphs
pub const CASEDATA_FORMAT_VERSION: &str = "1.1";

/// What a stored file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredKind {
    Ontology,
    CaseData,
}

impl StoredKind {
    pub fn marker(self) -> &'static [u8; MARKER_LEN] {
        match self {
            StoredKind::Ontology => ONTOLOGY_MARKER,
            StoredKind::CaseData => CASEDATA_MARKER,
        }
    }

    pub fn format_version(self) -> &'static str {
        match self {
            StoredKind::Ontology => ONTOLOGY_FORMAT_VERSION,
            StoredKind::CaseData => CASEDATA_FORMAT_VERSION,
        }
    }

    pub fn from_marker(marker: &[u8]) -> Option<Self> {
        [StoredKind::Ontology, StoredKind::CaseData]
            .into_iter()
            .find(|kind| kind.marker().as_slice() == marker)
    }
}

impl fmt::Display for StoredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredKind::Ontology => f.write_str("ontology"),
            StoredKind::CaseData => f.write_str("casedata"),
        }
    }
}

/// Values that can be stored
pub trait Persist: Serialize + DeserializeOwned {
    const KIND: StoredKind;
}

impl Persist for ResolvedOntology {
    const KIND: StoredKind = StoredKind::Ontology;
}

impl Persist for DataGraph {
    const KIND: StoredKind = StoredKind::CaseData;
}

/// Metadata block stored ahead of the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    /// Absolute path of the source the body was built from
    pub path: Option<PathBuf>,
    /// SHA-256 hex digest of the source
    pub hash: Option<String>,
    /// File name → digest, for directory sources
    pub manifest: Option<BTreeMap<String, String>>,
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
}

impl Metadata {
    /// Metadata without a source, stamped now
    pub fn new(kind: StoredKind) -> Self {
        Self {
            version: kind.format_version().to_string(),
            path: None,
            hash: None,
            manifest: None,
            timestamp: Utc::now(),
            comment: None,
        }
    }

    /// Metadata for a body built from `source`, which is hashed now
    pub fn for_source<P: AsRef<Path>>(kind: StoredKind, source: P) -> Result<Self, PersistenceError> {
        let source = source.as_ref();
        let path = source.canonicalize().map_err(|err| PersistenceError::Io {
            path: source.to_path_buf(),
            source: err,
        })?;
        let hashed = hash_source(&path)?;
        Ok(Self {
            path: Some(path),
            hash: Some(hashed.hash),
            manifest: hashed.manifest,
            ..Self::new(kind)
        })
    }

    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Write `value` and its metadata to `path`
pub fn save<T: Persist, P: AsRef<Path>>(value: &T, metadata: &Metadata, path: P) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let io_error = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let header = serde_json::to_vec(metadata)?;
    let body = bincode::serialize(value)?;

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    writer.write_all(T::KIND.marker()).map_err(io_error)?;
    write_block(&mut writer, &header).map_err(io_error)?;
    write_block(&mut writer, &body).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    let kind = T::KIND;
    info!(path = %path.display(), kind = %kind, bytes = body.len(), "saved");
    Ok(())
}

/// Read a value of the expected kind back, rejecting other kinds and versions
pub fn load<T: Persist, P: AsRef<Path>>(path: P) -> Result<(T, Metadata), PersistenceError> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let kind = read_kind(&mut reader, path)?;
    if kind != T::KIND {
        return Err(PersistenceError::WrongKind {
            path: path.to_path_buf(),
            expected: T::KIND,
            found: kind,
        });
    }
    let metadata = read_metadata_block(&mut reader, path)?;
    if metadata.version != kind.format_version() {
        return Err(PersistenceError::VersionMismatch {
            path: path.to_path_buf(),
            expected: kind.format_version().to_string(),
            found: metadata.version,
        });
    }

    let body = read_block(&mut reader).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = bincode::deserialize(&body)?;
    info!(path = %path.display(), kind = %kind, "loaded");
    Ok((value, metadata))
}

/// Kind of a stored file, from its marker alone
pub fn read_marker<P: AsRef<Path>>(path: P) -> Result<StoredKind, PersistenceError> {
    let path = path.as_ref();
    read_kind(&mut open(path)?, path)
}

/// Kind and metadata of a stored file; the body is not decoded
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<(StoredKind, Metadata), PersistenceError> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let kind = read_kind(&mut reader, path)?;
    let metadata = read_metadata_block(&mut reader, path)?;
    Ok((kind, metadata))
}

/// Plain-text summary of a stored file's metadata
pub fn describe<P: AsRef<Path>>(path: P) -> Result<String, PersistenceError> {
    let (kind, metadata) = read_metadata(path)?;
    let mut lines = vec![
        format!("Kind:      {}", kind),
        format!("Version:   {}", metadata.version),
        format!("Timestamp: {}", metadata.timestamp.to_rfc3339()),
    ];
    if let Some(source) = &metadata.path {
        lines.push(format!("Source:    {}", source.display()));
    }
    if let Some(hash) = &metadata.hash {
        lines.push(format!("SHA-256:   {}", hash));
    }
    if let Some(comment) = &metadata.comment {
        lines.push(format!("Comment:   {}", comment));
    }
    if let Some(manifest) = &metadata.manifest {
        lines.push(format!("Manifest:  {} files", manifest.len()));
        lines.extend(manifest.iter().map(|(name, hash)| format!("  {}  {}", hash, name)));
    }
    Ok(lines.join("\n"))
}

fn open(path: &Path) -> Result<BufReader<File>, PersistenceError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn read_kind<R: Read>(reader: &mut R, path: &Path) -> Result<StoredKind, PersistenceError> {
    let mut marker = [0u8; MARKER_LEN];
    if reader.read_exact(&mut marker).is_err() {
        return Err(PersistenceError::NotOwlcheckFile { path: path.to_path_buf() });
    }
    let kind = StoredKind::from_marker(&marker).ok_or_else(|| PersistenceError::NotOwlcheckFile {
        path: path.to_path_buf(),
    })?;
    debug!(path = %path.display(), kind = %kind, "read marker");
    Ok(kind)
}

fn read_metadata_block<R: Read>(reader: &mut R, path: &Path) -> Result<Metadata, PersistenceError> {
    let block = read_block(reader).map_err(|_| PersistenceError::NotOwlcheckFile { path: path.to_path_buf() })?;
    Ok(serde_json::from_slice(&block)?)
}

fn write_block<W: Write>(writer: &mut W, block: &[u8]) -> std::io::Result<()> {
    writer.write_all(&(block.len() as u64).to_le_bytes())?;
    writer.write_all(block)
}

fn read_block<R: Read>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut len = [0u8; 8];
    reader.read_exact(&mut len)?;
    let len = u64::from_le_bytes(len);
    let mut block = Vec::new();
    reader.take(len).read_to_end(&mut block)?;
    if block.len() as u64 != len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated block",
        ));
    }
    Ok(block)
}
