//! # Stage Mutation Engine
//!
//! The single write path for stage progression edits.
//!
//! All mutations are:
//! - Validated completely before any field is touched (a failing update
//!   leaves the application unchanged)
//! - Deterministic single-step state transitions
//! - Reported back through an explicit [`StageResolved`] event value
//!   instead of an implicit side effect, so the engine stays testable
//!   without any presentation dependency

use crate::application::ExamApplication;
use crate::editability;
use crate::limits::{MAX_NOTES_LENGTH, MAX_SCORE_LENGTH};
use crate::types::{StageStatus, TrackerError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE PATCH
// =============================================================================

/// A partial edit to one stage. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePatch {
    /// New status, checked against the stage's vocabulary.
    pub status: Option<StageStatus>,
    /// New stage date.
    pub date: Option<NaiveDate>,
    /// New free-text score. Accepted regardless of status; display gating
    /// on terminal outcomes is a presentation concern.
    pub score: Option<String>,
    /// New free-text notes.
    pub notes: Option<String>,
}

impl StagePatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status field.
    #[must_use]
    pub fn with_status(mut self, status: StageStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the date field.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the score field.
    #[must_use]
    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    /// Set the notes field.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.date.is_none() && self.score.is_none() && self.notes.is_none()
    }

    fn validate(&self) -> Result<(), TrackerError> {
        if let Some(score) = &self.score
            && score.len() > MAX_SCORE_LENGTH
        {
            return Err(TrackerError::InvalidField(format!(
                "score exceeds {MAX_SCORE_LENGTH} bytes"
            )));
        }
        if let Some(notes) = &self.notes
            && notes.len() > MAX_NOTES_LENGTH
        {
            return Err(TrackerError::InvalidField(format!(
                "notes exceed {MAX_NOTES_LENGTH} bytes"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// STAGE RESOLVED EVENT
// =============================================================================

/// Fire-and-forget signal emitted when an update resolves a stage.
///
/// Consumed by presentation collaborators (congratulations or motivation
/// copy); the engine has no further obligation once it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResolved {
    /// Name of the resolved stage.
    pub stage_name: String,
    /// The terminal status that resolved it.
    pub status: StageStatus,
    /// Whether the resolved stage was the final stage.
    pub is_final: bool,
    /// Score on the stage after the update, if any.
    pub score: Option<String>,
}

impl StageResolved {
    /// Whether the outcome is positive (cleared or selected).
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        matches!(self.status, StageStatus::Cleared | StageStatus::Selected)
    }
}

// =============================================================================
// STAGE ENGINE
// =============================================================================

/// The StageEngine consolidates all progression mutations.
///
/// Editability and vocabulary rules are delegated to
/// [`crate::editability`] and [`StageStatus::allowed_for`]; this engine
/// sequences the checks and applies the patch.
pub struct StageEngine;

impl StageEngine {
    /// Apply `patch` to the stage at `index`.
    ///
    /// Validation order: bounds, editability, status vocabulary, field
    /// limits. Any failure returns before the first write.
    ///
    /// A date written to stage 0 is immediately visible as the
    /// application's first exam date, because that value is derived from
    /// stage 0 rather than stored twice.
    ///
    /// Returns `Some(StageResolved)` when the patch set a terminal status.
    pub fn update_stage(
        app: &mut ExamApplication,
        index: usize,
        patch: StagePatch,
    ) -> Result<Option<StageResolved>, TrackerError> {
        let len = app.stage_count();
        let Some(stage) = app.stage(index) else {
            return Err(TrackerError::StageOutOfBounds { index, len });
        };

        editability::assess(app.stages(), index).map_err(TrackerError::StageNotEditable)?;

        if let Some(status) = patch.status
            && !status.allowed_for(stage.role)
        {
            return Err(TrackerError::InvalidStatusForRole {
                status,
                role: stage.role,
            });
        }
        patch.validate()?;

        let Some(stage) = app.stage_mut(index) else {
            return Err(TrackerError::StageOutOfBounds { index, len });
        };
        if let Some(status) = patch.status {
            stage.status = status;
        }
        if let Some(date) = patch.date {
            stage.date = Some(date);
        }
        if let Some(score) = patch.score {
            stage.score = Some(score);
        }
        if let Some(notes) = patch.notes {
            stage.notes = Some(notes);
        }

        let resolved = patch
            .status
            .filter(|status| status.is_resolved())
            .map(|status| StageResolved {
                stage_name: stage.name.clone(),
                status,
                is_final: stage.is_final(),
                score: stage.score.clone(),
            });
        Ok(resolved)
    }

    /// Set the application-level first exam date.
    ///
    /// Writes stage 0's date, the single source of truth the derived
    /// accessor reads back. Top-level metadata edit; not gated on
    /// editability.
    pub fn set_first_exam_date(
        app: &mut ExamApplication,
        date: NaiveDate,
    ) -> Result<(), TrackerError> {
        match app.stage_mut(0) {
            Some(stage) => {
                stage.date = Some(date);
                Ok(())
            }
            None => Err(TrackerError::StageOutOfBounds { index: 0, len: 0 }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
