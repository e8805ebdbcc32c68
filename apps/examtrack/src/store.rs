//! # Roster Store
//!
//! The persistence collaborator: one JSON file holding the whole roster.
//! File I/O lives here, in the app layer; the core only ever sees values.
//!
//! The store is read-modify-write per command, which matches the engine's
//! single-writer assumption.

use examtrack_core::{Roster, TrackerError};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size for the JSON store file (32 MB).
///
/// Prevents memory exhaustion from a corrupted or accidental file.
const MAX_STORE_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Maximum size for imported snapshot files (32 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrackerError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrackerError::IoError(format!("cannot read file metadata: {e}")))?;

    if metadata.len() > max_size {
        return Err(TrackerError::SerializationError(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving ".." and symlinks) and ensures it is
/// a regular file, so a mistyped path fails with a clear error instead of
/// a parse error further down.
pub fn validate_input_path(path: &Path) -> Result<PathBuf, TrackerError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| TrackerError::IoError(format!("invalid file path '{}': {e}", path.display())))?;

    if !canonical.is_file() {
        return Err(TrackerError::IoError(format!(
            "path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

/// Load the roster from `path`, or start a fresh one when the file does
/// not exist yet.
pub fn load_or_create(path: &Path) -> Result<Roster, TrackerError> {
    if !path.exists() {
        return Ok(Roster::new());
    }

    validate_file_size(path, MAX_STORE_FILE_SIZE)?;
    let data = std::fs::read(path)
        .map_err(|e| TrackerError::IoError(format!("read store: {e}")))?;

    serde_json::from_slice(&data)
        .map_err(|e| TrackerError::SerializationError(format!("could not parse store file: {e}")))
}

/// Save the roster to `path` as pretty-printed JSON.
pub fn save(path: &Path, roster: &Roster) -> Result<(), TrackerError> {
    let data = serde_json::to_vec_pretty(roster)
        .map_err(|e| TrackerError::SerializationError(e.to_string()))?;
    std::fs::write(path, &data).map_err(|e| TrackerError::IoError(format!("write store: {e}")))
}

// =============================================================================
// SNAPSHOT IMPORT
// =============================================================================

/// Read and decode a binary snapshot file.
pub fn read_snapshot(path: &Path) -> Result<Roster, TrackerError> {
    let validated = validate_input_path(path)?;
    validate_file_size(&validated, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated)
        .map_err(|e| TrackerError::IoError(format!("read snapshot: {e}")))?;
    examtrack_core::roster_from_bytes(&data)
}

// =============================================================================
// TESTS
// =============================================================================
