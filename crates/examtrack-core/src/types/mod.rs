//! # Core Type Definitions
//!
//! This module contains all core types for the examtrack stage engine:
//! - Application identifier (`ApplicationId`)
//! - Stage vocabulary (`StageStatus`, `StageRole`, `Stage`)
//! - Derived outcome (`FinalStatus`) and payment state (`PaymentStatus`)
//! - Error types (`TrackerError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Are plain serializable values with no interior mutability
//! - Implement `Ord` where deterministic ordering matters
//! - Carry no derived state that could drift from the stage list

use crate::editability::EditBlock;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// APPLICATION IDENTIFIER
// =============================================================================

/// Unique identifier for an exam application within a roster.
///
/// Ids are assigned sequentially by the roster and are never reused,
/// including across archive and delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// STAGE ROLE
// =============================================================================

/// Role of a stage within the progression.
///
/// Exactly one stage per application is `Final`. The role is an explicit,
/// stored flag: it is assigned once when the stage list is built and is not
/// re-derived from the stage name afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum StageRole {
    /// An intermediate stage (Prelims, Mains, Interview, ...).
    #[default]
    Regular,
    /// The terminal stage. Irremovable; restricted status vocabulary.
    Final,
}

impl StageRole {
    /// Check whether this is the final (terminal) role.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, StageRole::Final)
    }

    /// Human-readable role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StageRole::Regular => "regular",
            StageRole::Final => "final",
        }
    }
}

impl std::fmt::Display for StageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STAGE STATUS
// =============================================================================

/// Status of a single stage.
///
/// The full enum covers both vocabularies; which subset a stage may hold
/// depends on its [`StageRole`] (see [`StageStatus::allowed_for`]):
///
/// | Role    | Allowed statuses                   |
/// |---------|------------------------------------|
/// | Regular | pending, cleared, not-cleared, n/a |
/// | Final   | pending, selected, not-selected    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageStatus {
    /// Not yet attempted or awaiting a result.
    Pending,
    /// Passed a regular stage; progression advances.
    Cleared,
    /// Failed a regular stage; progression ends.
    NotCleared,
    /// Stage was skipped or waived for this candidate.
    #[serde(rename = "n/a")]
    NotApplicable,
    /// Positive terminal outcome of the final stage.
    Selected,
    /// Negative terminal outcome of the final stage.
    NotSelected,
}

impl StageStatus {
    /// Wire/display name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Cleared => "cleared",
            StageStatus::NotCleared => "not-cleared",
            StageStatus::NotApplicable => "n/a",
            StageStatus::Selected => "selected",
            StageStatus::NotSelected => "not-selected",
        }
    }

    /// Statuses that leave the progression parked at this stage.
    ///
    /// The current stage is the first stage holding one of these. Note that
    /// the negative outcomes count as unresolved here on purpose: a failed
    /// stage remains the current stage so the failure stays front and center.
    #[must_use]
    pub const fn is_unresolved(self) -> bool {
        matches!(
            self,
            StageStatus::Pending | StageStatus::NotCleared | StageStatus::NotSelected
        )
    }

    /// Statuses that end the process: every later stage is locked forever.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, StageStatus::NotCleared | StageStatus::NotSelected)
    }

    /// Terminal per-stage outcomes. Setting one of these resolves the stage
    /// and produces a [`crate::StageResolved`] event.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(
            self,
            StageStatus::Cleared
                | StageStatus::NotCleared
                | StageStatus::Selected
                | StageStatus::NotSelected
        )
    }

    /// Check vocabulary membership for a stage role.
    #[must_use]
    pub const fn allowed_for(self, role: StageRole) -> bool {
        match role {
            StageRole::Regular => matches!(
                self,
                StageStatus::Pending
                    | StageStatus::Cleared
                    | StageStatus::NotCleared
                    | StageStatus::NotApplicable
            ),
            StageRole::Final => matches!(
                self,
                StageStatus::Pending | StageStatus::Selected | StageStatus::NotSelected
            ),
        }
    }

    /// The full allowed vocabulary for a role, in display order.
    #[must_use]
    pub const fn vocabulary(role: StageRole) -> &'static [StageStatus] {
        match role {
            StageRole::Regular => &[
                StageStatus::Pending,
                StageStatus::Cleared,
                StageStatus::NotCleared,
                StageStatus::NotApplicable,
            ],
            StageRole::Final => &[
                StageStatus::Pending,
                StageStatus::Selected,
                StageStatus::NotSelected,
            ],
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// One step of a multi-stage recruitment process.
///
/// A stage has no identity of its own: it is owned by exactly one
/// application and addressed by its position in the stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Display name ("Prelims", "Mains", ...). Free text.
    pub name: String,
    /// Explicit role flag; see [`StageRole`].
    #[serde(default)]
    pub role: StageRole,
    /// Current status; vocabulary constrained by `role`.
    pub status: StageStatus,
    /// Scheduled or actual date of the stage, if known.
    pub date: Option<NaiveDate>,
    /// Free-text score ("78/100"). Only meaningful once the stage is
    /// resolved; display gating is a presentation concern.
    pub score: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl Stage {
    /// Create a pending stage with no date, score, or notes.
    #[must_use]
    pub fn pending(name: impl Into<String>, role: StageRole) -> Self {
        Self {
            name: name.into(),
            role,
            status: StageStatus::Pending,
            date: None,
            score: None,
            notes: None,
        }
    }

    /// Check whether this stage carries the final role.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.role.is_final()
    }
}

// =============================================================================
// PAYMENT STATUS
// =============================================================================

/// Payment state of the application fee.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Fee paid.
    Paid,
    /// Fee due.
    #[default]
    Pending,
    /// No fee for this application.
    Free,
}

impl PaymentStatus {
    /// Wire/display name of the payment state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Free => "free",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// FINAL STATUS
// =============================================================================

/// Overall outcome of an application, derived from the final stage.
///
/// Never stored: recomputed from the stage list on every read so it cannot
/// drift (see [`crate::ExamApplication::final_status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalStatus {
    /// Final stage not yet resolved.
    Pending,
    /// Candidate selected.
    Selected,
    /// Candidate not selected.
    NotSelected,
}

impl FinalStatus {
    /// Wire/display name of the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FinalStatus::Pending => "pending",
            FinalStatus::Selected => "selected",
            FinalStatus::NotSelected => "not-selected",
        }
    }
}

impl std::fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the examtrack engine.
///
/// - No silent failures
/// - Use `Result<T, TrackerError>` for fallible operations
/// - The engine never panics; every error is recoverable and every failing
///   operation leaves its input unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The targeted stage is locked, blocked, or not the current stage.
    #[error("stage is not editable: {0}")]
    StageNotEditable(EditBlock),

    /// The requested status is outside the stage's vocabulary.
    #[error("status '{status}' is not allowed for a {role} stage")]
    InvalidStatusForRole {
        /// The rejected status.
        status: StageStatus,
        /// The role whose vocabulary rejected it.
        role: StageRole,
    },

    /// Stage add/remove would violate the 1..=5 count bounds or remove the
    /// final stage.
    #[error("invalid stage count: {0}")]
    InvalidStageCount(String),

    /// Stage index beyond the end of the stage list.
    #[error("stage index {index} out of bounds (len {len})")]
    StageOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the stage list.
        len: usize,
    },

    /// Roster lookup miss.
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),

    /// Archive attempted before the final stage resolved positively.
    #[error("application cannot be archived before final selection")]
    NotYetSelected,

    /// A draft or edit field failed validation.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred (app layer storage).
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
