//! # Application Aggregate
//!
//! [`ExamApplication`] owns an ordered list of 1..=5 stages plus the
//! top-level metadata of one exam application. The aggregate keeps its
//! stage list private so the count bounds and the single-final-stage
//! invariant can only be touched through the authoring operations here
//! and the mutation engine in [`crate::mutation`].
//!
//! Derived values are never stored:
//! - the overall outcome is recomputed from the final stage on every read
//! - the first exam date IS the first stage's date, so the two can never
//!   diverge

use crate::catalog::TemplateCatalog;
use crate::limits::{MAX_NAME_LENGTH, MAX_NOTES_LENGTH, MAX_STAGES, MIN_STAGES};
use crate::types::{
    ApplicationId, FinalStatus, PaymentStatus, Stage, StageRole, StageStatus, TrackerError,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// FINAL-STAGE CLASSIFICATION (legacy rule)
// =============================================================================

/// Classify which of `names` is the final stage: the first name containing
/// "final" (case-insensitive), or the last index when none does.
///
/// This is the historical rule for user-supplied stage lists, kept so
/// custom drafts and imported legacy records classify the way they always
/// did. The substring match also hits names like "Semifinal Round"; the
/// explicit [`StageRole`] flag exists so natively created data never
/// depends on this scan again.
#[must_use]
pub fn classify_final_index(names: &[&str]) -> usize {
    names
        .iter()
        .position(|name| name.to_ascii_lowercase().contains("final"))
        .unwrap_or_else(|| names.len().saturating_sub(1))
}

// =============================================================================
// APPLICATION DRAFT
// =============================================================================

/// Input for creating an application.
///
/// The draft carries everything the caller decides, including the creation
/// timestamp, so the engine itself never reads a clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    /// Application display name ("IBPS PO 2026").
    pub name: String,
    /// Category key; selects the stage template unless `custom_stages`
    /// is present.
    pub category: String,
    /// Exam fee in whole currency units.
    pub exam_fee: u32,
    /// Payment state of the fee.
    pub payment_status: PaymentStatus,
    /// Exam center or city.
    pub place_of_exam: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// User-defined stage names, overriding the category template.
    pub custom_stages: Option<Vec<String>>,
    /// Date of the first stage, if already known.
    pub first_exam_date: Option<NaiveDate>,
    /// Creation timestamp, supplied by the caller.
    pub created_at: DateTime<Utc>,
}

impl ApplicationDraft {
    /// Validate the draft's free-text fields and custom stage list.
    fn validate(&self) -> Result<(), TrackerError> {
        validate_name("application name", &self.name)?;
        if let Some(notes) = &self.notes
            && notes.len() > MAX_NOTES_LENGTH
        {
            return Err(TrackerError::InvalidField(format!(
                "notes exceed {MAX_NOTES_LENGTH} bytes"
            )));
        }
        if let Some(stages) = &self.custom_stages {
            if stages.len() < MIN_STAGES || stages.len() > MAX_STAGES {
                return Err(TrackerError::InvalidStageCount(format!(
                    "an application must have {MIN_STAGES} to {MAX_STAGES} stages, got {}",
                    stages.len()
                )));
            }
            for name in stages {
                validate_name("stage name", name)?;
            }
        }
        Ok(())
    }
}

fn validate_name(field: &str, name: &str) -> Result<(), TrackerError> {
    if name.trim().is_empty() {
        return Err(TrackerError::InvalidField(format!("{field} is empty")));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(TrackerError::InvalidField(format!(
            "{field} exceeds {MAX_NAME_LENGTH} bytes"
        )));
    }
    Ok(())
}

// =============================================================================
// EXAM APPLICATION
// =============================================================================

/// One tracked exam application: metadata plus its ordered stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamApplication {
    id: ApplicationId,
    /// Application display name.
    pub name: String,
    /// Category key the stage list was built from.
    pub category: String,
    /// Exam fee in whole currency units.
    pub exam_fee: u32,
    /// Payment state of the fee.
    pub payment_status: PaymentStatus,
    /// Exam center or city.
    pub place_of_exam: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
    stages: Vec<Stage>,
    is_archived: bool,
    created_at: DateTime<Utc>,
}

impl ExamApplication {
    /// Create an application from a draft.
    ///
    /// The stage list comes from `draft.custom_stages` (final role assigned
    /// by [`classify_final_index`]) or from the catalog template for the
    /// draft's category. A known first exam date lands on stage 0.
    pub fn create(
        id: ApplicationId,
        catalog: &TemplateCatalog,
        draft: ApplicationDraft,
    ) -> Result<Self, TrackerError> {
        draft.validate()?;

        let mut stages = match &draft.custom_stages {
            Some(names) => {
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let final_index = classify_final_index(&refs);
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let role = if i == final_index {
                            StageRole::Final
                        } else {
                            StageRole::Regular
                        };
                        Stage::pending(name.clone(), role)
                    })
                    .collect()
            }
            None => catalog.templates_for(&draft.category),
        };
        if let Some(date) = draft.first_exam_date
            && let Some(first) = stages.first_mut()
        {
            first.date = Some(date);
        }

        Ok(Self {
            id,
            name: draft.name,
            category: draft.category,
            exam_fee: draft.exam_fee,
            payment_status: draft.payment_status,
            place_of_exam: draft.place_of_exam,
            notes: draft.notes,
            stages,
            is_archived: false,
            created_at: draft.created_at,
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The application's identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// The ordered stage list.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The stage at `index`, if in range.
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Mutable stage access, restricted to the crate so every external
    /// status edit goes through the mutation engine.
    pub(crate) fn stage_mut(&mut self, index: usize) -> Option<&mut Stage> {
        self.stages.get_mut(index)
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Whether this application has been archived into history.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub(crate) fn mark_archived(&mut self) {
        self.is_archived = true;
    }

    /// Immutable creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // =========================================================================
    // DERIVED STATE
    // =========================================================================

    /// Index of the final stage.
    ///
    /// Exactly one stage carries the final role by construction; if a
    /// hand-edited record violates that, the last stage stands in.
    #[must_use]
    pub fn final_stage_index(&self) -> usize {
        self.stages
            .iter()
            .position(Stage::is_final)
            .unwrap_or_else(|| self.stages.len().saturating_sub(1))
    }

    /// The final stage.
    #[must_use]
    pub fn final_stage(&self) -> Option<&Stage> {
        self.stages.get(self.final_stage_index())
    }

    /// Overall outcome, derived from the final stage's status.
    #[must_use]
    pub fn final_status(&self) -> FinalStatus {
        match self.final_stage().map(|s| s.status) {
            Some(StageStatus::Selected) => FinalStatus::Selected,
            Some(StageStatus::NotSelected) => FinalStatus::NotSelected,
            _ => FinalStatus::Pending,
        }
    }

    /// Date of the first stage.
    ///
    /// This IS the application-level first exam date; it has no storage of
    /// its own, so it can never disagree with stage 0.
    #[must_use]
    pub fn first_exam_date(&self) -> Option<NaiveDate> {
        self.stages.first().and_then(|s| s.date)
    }

    /// Whether the archive operation is currently permitted.
    #[must_use]
    pub fn can_archive(&self) -> bool {
        self.final_status() == FinalStatus::Selected
    }

    // =========================================================================
    // AUTHORING OPERATIONS
    // =========================================================================

    /// Insert a new pending stage immediately before the final stage.
    ///
    /// Permitted only while the stage count is below the maximum. The
    /// default name is "Stage N" for the inserted position. Returns the
    /// index of the new stage.
    pub fn add_stage(&mut self, name: Option<String>) -> Result<usize, TrackerError> {
        if self.stages.len() >= MAX_STAGES {
            return Err(TrackerError::InvalidStageCount(format!(
                "an application cannot have more than {MAX_STAGES} stages"
            )));
        }
        let index = self.final_stage_index();
        let name = match name {
            Some(name) => {
                validate_name("stage name", &name)?;
                name
            }
            None => format!("Stage {}", index + 1),
        };
        self.stages.insert(index, Stage::pending(name, StageRole::Regular));
        Ok(index)
    }

    /// Remove the stage at `index`.
    ///
    /// The final stage can never be removed, and the list never shrinks
    /// below one stage.
    pub fn remove_stage(&mut self, index: usize) -> Result<Stage, TrackerError> {
        if index >= self.stages.len() {
            return Err(TrackerError::StageOutOfBounds {
                index,
                len: self.stages.len(),
            });
        }
        if self.stages.len() <= MIN_STAGES {
            return Err(TrackerError::InvalidStageCount(format!(
                "an application must keep at least {MIN_STAGES} stage"
            )));
        }
        if index == self.final_stage_index() {
            return Err(TrackerError::InvalidStageCount(
                "the final stage cannot be removed".to_string(),
            ));
        }
        Ok(self.stages.remove(index))
    }

    /// Rename the stage at `index`. Names stay free text; the role flag is
    /// untouched, so renaming never reclassifies the final stage.
    pub fn rename_stage(&mut self, index: usize, name: String) -> Result<(), TrackerError> {
        validate_name("stage name", &name)?;
        match self.stage_mut(index) {
            Some(stage) => {
                stage.name = name;
                Ok(())
            }
            None => Err(TrackerError::StageOutOfBounds {
                index,
                len: self.stage_count(),
            }),
        }
    }

    /// Replace the whole stage list with the template for `category`.
    ///
    /// An authoring-time operation: any in-progress status data is
    /// discarded. The application's category field follows the template.
    pub fn apply_template(&mut self, catalog: &TemplateCatalog, category: &str) {
        self.stages = catalog.templates_for(category);
        self.category = category.trim().to_ascii_lowercase();
    }
}

// =============================================================================
// TESTS
// =============================================================================
