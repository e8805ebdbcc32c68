//! # Engine Limits
//!
//! Hardcoded runtime constants for the examtrack engine.
//!
//! The tracker starts with zero data but fixed rules. These limits are
//! compiled into the binary and are immutable at runtime.

/// Minimum number of stages in an application.
///
/// Every application has at least its final stage; the last stage can
/// never be removed.
pub const MIN_STAGES: usize = 1;

/// Maximum number of stages in an application.
///
/// Keeps every per-stage operation trivially bounded.
pub const MAX_STAGES: usize = 5;

/// Magic bytes for the examtrack binary snapshot header.
///
/// - File Header = Magic Bytes ("EXTK") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"EXTK";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for application and stage names.
///
/// Names longer than this are rejected at draft validation.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length for free-text notes.
///
/// Notes longer than this (4 KB) are rejected before mutation.
pub const MAX_NOTES_LENGTH: usize = 4096;

/// Maximum length for the free-text score field.
pub const MAX_SCORE_LENGTH: usize = 64;

/// Maximum allowed payload size for the snapshot format (16 MB).
///
/// Validated BEFORE attempting deserialization so a corrupted or malicious
/// snapshot cannot trigger an oversized allocation.
pub const MAX_SNAPSHOT_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;
