//! # examtrack-core
//!
//! The deterministic stage-tracking engine for examtrack - THE LOGIC.
//!
//! This crate models a multi-stage recruitment process (Prelims → Mains →
//! Interview → Final Selection, or custom variants) and enforces its rules:
//! ordering, irreversibility, and per-stage status vocabularies.
//!
//! ## Architectural Constraints
//!
//! The engine:
//! - Holds no shared mutable state; callers own every value it touches
//! - Derives "current stage" and "final status" on demand instead of
//!   storing cursors that could drift from the stage list
//! - Has NO async, NO network dependencies, and reads no clock
//! - Returns the "stage resolved" signal as a plain value; presentation
//!   is someone else's job

// =============================================================================
// MODULES
// =============================================================================

pub mod application;
pub mod catalog;
pub mod editability;
pub mod formats;
pub mod limits;
pub mod mutation;
pub mod roster;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ApplicationId, FinalStatus, PaymentStatus, Stage, StageRole, StageStatus, TrackerError,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use application::{ApplicationDraft, ExamApplication, classify_final_index};
pub use catalog::TemplateCatalog;
pub use editability::{EditBlock, assess, find_current_index, is_editable, reason_if_not_editable};
pub use mutation::{StageEngine, StagePatch, StageResolved};
pub use roster::Roster;

// =============================================================================
// RE-EXPORTS: Formats (snapshot serialization)
// =============================================================================

pub use formats::{SnapshotHeader, roster_from_bytes, roster_to_bytes};
