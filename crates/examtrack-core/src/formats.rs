//! # Snapshot Format
//!
//! Binary serialization for roster snapshots.
//!
//! Format: Header (5 bytes) + postcard-serialized roster data.
//! - 4 bytes: Magic ("EXTK")
//! - 1 byte: Version
//!
//! This module is pure transformation; file I/O lives in the app layer.
//! The header and the payload size are validated BEFORE deserialization so
//! corrupted or hostile input fails fast instead of allocating.

use crate::limits::{FORMAT_VERSION, MAGIC_BYTES, MAX_SNAPSHOT_PAYLOAD_SIZE};
use crate::roster::Roster;
use crate::types::TrackerError;

/// Minimum valid snapshot size (header only).
const MIN_SNAPSHOT_SIZE: usize = 5;

// =============================================================================
// SNAPSHOT HEADER
// =============================================================================

/// The snapshot header precedes all roster data.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    /// Magic bytes identifying the format.
    pub magic: [u8; 4],
    /// Format version.
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if &self.magic != MAGIC_BYTES {
            return Err(TrackerError::SerializationError(
                "invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(TrackerError::SerializationError(format!(
                "unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrackerError> {
        if bytes.len() < MIN_SNAPSHOT_SIZE {
            return Err(TrackerError::SerializationError(
                "header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a roster to bytes (header + payload).
pub fn roster_to_bytes(roster: &Roster) -> Result<Vec<u8>, TrackerError> {
    let header = SnapshotHeader::new();
    let payload = postcard::to_stdvec(roster)
        .map_err(|e| TrackerError::SerializationError(e.to_string()))?;

    if payload.len() > MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(TrackerError::SerializationError(format!(
            "payload size {} exceeds maximum {}",
            payload.len(),
            MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }

    let mut bytes = Vec::with_capacity(MIN_SNAPSHOT_SIZE + payload.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Deserialize a roster from bytes, validating header and size first.
pub fn roster_from_bytes(bytes: &[u8]) -> Result<Roster, TrackerError> {
    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_SNAPSHOT_SIZE..];
    if payload.len() > MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(TrackerError::SerializationError(format!(
            "payload size {} exceeds maximum {}",
            payload.len(),
            MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }

    postcard::from_bytes(payload).map_err(|e| TrackerError::SerializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
