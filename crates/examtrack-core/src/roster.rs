//! # Roster
//!
//! The collection of tracked applications: the active list plus the
//! archived history. This is the unit the store file holds and the unit
//! the snapshot format serializes.
//!
//! The roster assigns identifiers sequentially and never reuses them,
//! so references in notes or exported files stay unambiguous.

use crate::application::{ApplicationDraft, ExamApplication};
use crate::catalog::TemplateCatalog;
use crate::types::{ApplicationId, TrackerError};
use serde::{Deserialize, Serialize};

/// All tracked applications, active and archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    next_id: u64,
    active: Vec<ExamApplication>,
    archived: Vec<ExamApplication>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active: Vec::new(),
            archived: Vec::new(),
        }
    }

    /// Create an application from a draft and add it to the active list.
    ///
    /// Returns the assigned id.
    pub fn create(
        &mut self,
        catalog: &TemplateCatalog,
        draft: ApplicationDraft,
    ) -> Result<ApplicationId, TrackerError> {
        let id = ApplicationId(self.next_id);
        let app = ExamApplication::create(id, catalog, draft)?;
        // Only consume the id once creation has succeeded.
        self.next_id = self.next_id.saturating_add(1);
        self.active.push(app);
        Ok(id)
    }

    /// Look up an active application.
    #[must_use]
    pub fn get(&self, id: ApplicationId) -> Option<&ExamApplication> {
        self.active.iter().find(|app| app.id() == id)
    }

    /// Mutable lookup of an active application.
    #[must_use]
    pub fn get_mut(&mut self, id: ApplicationId) -> Option<&mut ExamApplication> {
        self.active.iter_mut().find(|app| app.id() == id)
    }

    /// Mutable lookup that fails with [`TrackerError::ApplicationNotFound`].
    pub fn require_mut(&mut self, id: ApplicationId) -> Result<&mut ExamApplication, TrackerError> {
        self.get_mut(id).ok_or(TrackerError::ApplicationNotFound(id))
    }

    /// The active applications, in creation order.
    #[must_use]
    pub fn active(&self) -> &[ExamApplication] {
        &self.active
    }

    /// The archived history, in archive order.
    #[must_use]
    pub fn archived(&self) -> &[ExamApplication] {
        &self.archived
    }

    /// Number of active applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether there are no active applications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Move an application into history.
    ///
    /// Permitted only after its final stage resolved positively; the
    /// milestone is the user's to declare, the precondition is ours to
    /// enforce.
    pub fn archive(&mut self, id: ApplicationId) -> Result<(), TrackerError> {
        let position = self
            .active
            .iter()
            .position(|app| app.id() == id)
            .ok_or(TrackerError::ApplicationNotFound(id))?;
        if !self.active[position].can_archive() {
            return Err(TrackerError::NotYetSelected);
        }
        let mut app = self.active.remove(position);
        app.mark_archived();
        self.archived.push(app);
        Ok(())
    }

    /// Delete an application from either list. Returns the removed value.
    pub fn delete(&mut self, id: ApplicationId) -> Result<ExamApplication, TrackerError> {
        if let Some(position) = self.active.iter().position(|app| app.id() == id) {
            return Ok(self.active.remove(position));
        }
        if let Some(position) = self.archived.iter().position(|app| app.id() == id) {
            return Ok(self.archived.remove(position));
        }
        Err(TrackerError::ApplicationNotFound(id))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{StageEngine, StagePatch};
    use crate::types::{FinalStatus, PaymentStatus, StageStatus};
    use chrono::{TimeZone, Utc};

    fn draft(name: &str) -> ApplicationDraft {
        ApplicationDraft {
            name: name.to_string(),
            category: "banking".to_string(),
            exam_fee: 850,
            payment_status: PaymentStatus::Pending,
            place_of_exam: "Pune".to_string(),
            notes: None,
            custom_stages: None,
            first_exam_date: None,
            created_at: Utc
                .with_ymd_and_hms(2026, 2, 1, 8, 30, 0)
                .single()
                .expect("timestamp"),
        }
    }

    fn select_all_stages(roster: &mut Roster, id: ApplicationId) {
        let app = roster.require_mut(id).expect("app");
        for index in 0..app.stage_count() {
            let status = if app.stages()[index].is_final() {
                StageStatus::Selected
            } else {
                StageStatus::Cleared
            };
            StageEngine::update_stage(app, index, StagePatch::new().with_status(status))
                .expect("update");
        }
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let catalog = TemplateCatalog::standard();
        let mut roster = Roster::new();

        let a = roster.create(&catalog, draft("A")).expect("create");
        let b = roster.create(&catalog, draft("B")).expect("create");
        assert_eq!(a, ApplicationId(1));
        assert_eq!(b, ApplicationId(2));

        roster.delete(a).expect("delete");
        let c = roster.create(&catalog, draft("C")).expect("create");
        assert_eq!(c, ApplicationId(3));
    }

    #[test]
    fn failed_create_does_not_consume_an_id() {
        let catalog = TemplateCatalog::standard();
        let mut roster = Roster::new();

        let mut bad = draft("");
        bad.name = "  ".to_string();
        assert!(roster.create(&catalog, bad).is_err());

        let id = roster.create(&catalog, draft("A")).expect("create");
        assert_eq!(id, ApplicationId(1));
    }

    #[test]
    fn archive_requires_final_selection() {
        let catalog = TemplateCatalog::standard();
        let mut roster = Roster::new();
        let id = roster.create(&catalog, draft("A")).expect("create");

        assert_eq!(roster.archive(id), Err(TrackerError::NotYetSelected));
        assert_eq!(roster.len(), 1);

        select_all_stages(&mut roster, id);
        roster.archive(id).expect("archive");

        assert!(roster.is_empty());
        assert_eq!(roster.archived().len(), 1);
        assert!(roster.archived()[0].is_archived());
        assert_eq!(roster.archived()[0].final_status(), FinalStatus::Selected);
        // Archived applications leave the active lookup path.
        assert!(roster.get(id).is_none());
    }

    #[test]
    fn delete_reaches_both_lists() {
        let catalog = TemplateCatalog::standard();
        let mut roster = Roster::new();
        let keep = roster.create(&catalog, draft("Keep")).expect("create");
        let gone = roster.create(&catalog, draft("Gone")).expect("create");

        select_all_stages(&mut roster, keep);
        roster.archive(keep).expect("archive");

        let removed = roster.delete(gone).expect("delete active");
        assert_eq!(removed.name, "Gone");
        let removed = roster.delete(keep).expect("delete archived");
        assert_eq!(removed.name, "Keep");

        assert_eq!(
            roster.delete(keep),
            Err(TrackerError::ApplicationNotFound(keep))
        );
    }

    #[test]
    fn require_mut_reports_missing_ids() {
        let mut roster = Roster::new();
        assert_eq!(
            roster.require_mut(ApplicationId(7)).err(),
            Some(TrackerError::ApplicationNotFound(ApplicationId(7)))
        );
    }

    #[test]
    fn serde_round_trip_preserves_the_roster() {
        let catalog = TemplateCatalog::standard();
        let mut roster = Roster::new();
        let id = roster.create(&catalog, draft("A")).expect("create");
        select_all_stages(&mut roster, id);
        roster.archive(id).expect("archive");
        roster.create(&catalog, draft("B")).expect("create");

        let json = serde_json::to_string(&roster).expect("serialize");
        let back: Roster = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(roster, back);
    }
}
