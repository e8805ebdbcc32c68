//! # Editability Rule Engine
//!
//! Decides which stage of an application is currently open for editing.
//!
//! The rules:
//! 1. The current stage is the FIRST stage whose status is unresolved
//!    (pending, not-cleared, not-selected). If every stage is resolved,
//!    the last stage remains the current one so the outcome stays
//!    inspectable.
//! 2. A stage is editable iff it is the current stage AND no earlier stage
//!    holds a blocking status (not-cleared / not-selected). A blocking
//!    status ends the process: every later stage is locked forever.
//! 3. There is no stored cursor. Advancement is recomputed from the stage
//!    list on every read, so the same list always yields the same answer
//!    and the state stays trivially serializable.
//!
//! All functions are total: an index past the end of the list is reported
//! as not editable rather than panicking.

use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// EDIT BLOCK REASONS
// =============================================================================

/// Why a stage is not currently editable.
///
/// The variants are the contract; the message strings are presentation
/// defaults that UI layers may rephrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditBlock {
    /// A stage before this one is still unresolved.
    PriorStageUnresolved,
    /// An earlier stage holds a blocking status; the process is over.
    ProcessEnded,
    /// The stage is already resolved and sits behind the current stage.
    NotCurrentStage,
}

impl EditBlock {
    /// Default user-facing message for this reason.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            EditBlock::PriorStageUnresolved => "prior stage not yet resolved",
            EditBlock::ProcessEnded => "a previous stage was not cleared; the process has ended",
            EditBlock::NotCurrentStage => "not the current active stage",
        }
    }
}

impl std::fmt::Display for EditBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// CURRENT STAGE DERIVATION
// =============================================================================

/// Index of the current stage: the first unresolved stage, or the last
/// stage when the whole list is resolved.
///
/// Pure function of the stage list; see the module docs for why there is
/// no stored cursor. Returns 0 for an empty list (the aggregate guarantees
/// at least one stage, but this function stays total).
#[must_use]
pub fn find_current_index(stages: &[Stage]) -> usize {
    stages
        .iter()
        .position(|stage| stage.status.is_unresolved())
        .unwrap_or_else(|| stages.len().saturating_sub(1))
}

// =============================================================================
// EDITABILITY ASSESSMENT
// =============================================================================

/// Assess whether the stage at `index` may currently be edited.
///
/// Returns `Ok(())` when editable, or the [`EditBlock`] reason when not.
/// A blocking status anywhere before `index` takes precedence over the
/// positional reasons.
pub fn assess(stages: &[Stage], index: usize) -> Result<(), EditBlock> {
    let upto = index.min(stages.len());
    if stages[..upto].iter().any(|s| s.status.is_blocking()) {
        return Err(EditBlock::ProcessEnded);
    }

    let current = find_current_index(stages);
    match index.cmp(&current) {
        Ordering::Greater => Err(EditBlock::PriorStageUnresolved),
        Ordering::Less => Err(EditBlock::NotCurrentStage),
        Ordering::Equal => Ok(()),
    }
}

/// Check editability without the reason.
#[must_use]
pub fn is_editable(stages: &[Stage], index: usize) -> bool {
    assess(stages, index).is_ok()
}

/// The reason the stage at `index` is not editable, if any.
#[must_use]
pub fn reason_if_not_editable(stages: &[Stage], index: usize) -> Option<EditBlock> {
    assess(stages, index).err()
}

// =============================================================================
// TESTS
// =============================================================================
