//! # Property-Based Tests
//!
//! Verification tests using proptest.
//!
//! These tests ensure determinism and the progression invariants across
//! arbitrary stage lists and edit sequences.

use chrono::{NaiveDate, TimeZone, Utc};
use examtrack_core::{
    ApplicationDraft, ApplicationId, ExamApplication, PaymentStatus, Stage, StageEngine,
    StagePatch, StageRole, StageStatus, TemplateCatalog, is_editable, reason_if_not_editable,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn regular_status() -> impl Strategy<Value = StageStatus> {
    prop_oneof![
        Just(StageStatus::Pending),
        Just(StageStatus::Cleared),
        Just(StageStatus::NotCleared),
        Just(StageStatus::NotApplicable),
    ]
}

fn final_status() -> impl Strategy<Value = StageStatus> {
    prop_oneof![
        Just(StageStatus::Pending),
        Just(StageStatus::Selected),
        Just(StageStatus::NotSelected),
    ]
}

/// A stage list respecting the role vocabularies: 0..=4 regular stages
/// followed by one final stage.
fn stage_list() -> impl Strategy<Value = Vec<Stage>> {
    (vec(regular_status(), 0..=4), final_status()).prop_map(|(regulars, fin)| {
        let mut stages: Vec<Stage> = regulars
            .into_iter()
            .enumerate()
            .map(|(i, status)| {
                let mut stage = Stage::pending(format!("Stage {}", i + 1), StageRole::Regular);
                stage.status = status;
                stage
            })
            .collect();
        let mut last = Stage::pending("Final Selection", StageRole::Final);
        last.status = fin;
        stages.push(last);
        stages
    })
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    })
}

fn make_app(category: &str) -> ExamApplication {
    let catalog = TemplateCatalog::standard();
    let draft = ApplicationDraft {
        name: "Prop App".to_string(),
        category: category.to_string(),
        exam_fee: 100,
        payment_status: PaymentStatus::Pending,
        place_of_exam: "Delhi".to_string(),
        notes: None,
        custom_stages: None,
        first_exam_date: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp"),
    };
    ExamApplication::create(ApplicationId(1), &catalog, draft).expect("create")
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Exactly one stage is editable in every non-empty list: the first
    /// unresolved stage, or the last stage when everything is resolved.
    #[test]
    fn exactly_one_editable_stage(stages in stage_list()) {
        let editable: Vec<usize> = (0..stages.len())
            .filter(|&i| is_editable(&stages, i))
            .collect();
        prop_assert_eq!(editable.len(), 1);
    }

    /// Once any stage holds a blocking status, every later stage is locked,
    /// whatever else the list contains.
    #[test]
    fn blocking_status_locks_every_later_stage(stages in stage_list()) {
        if let Some(first_block) = stages.iter().position(|s| s.status.is_blocking()) {
            for index in first_block + 1..stages.len() {
                prop_assert!(!is_editable(&stages, index));
            }
        }
    }

    /// Editability is a pure recomputation: asking twice never disagrees.
    #[test]
    fn editability_recomputation_is_idempotent(stages in stage_list()) {
        for index in 0..stages.len() + 2 {
            prop_assert_eq!(
                reason_if_not_editable(&stages, index),
                reason_if_not_editable(&stages, index)
            );
        }
    }

    /// A rejected update leaves the application bit-identical.
    #[test]
    fn rejected_updates_mutate_nothing(
        index in 0usize..8,
        status in prop_oneof![regular_status(), final_status()],
    ) {
        let mut app = make_app("banking");
        let before = app.clone();
        let patch = StagePatch::new().with_status(status);

        if StageEngine::update_stage(&mut app, index, patch).is_err() {
            prop_assert_eq!(app, before);
        }
    }

    /// Driving an application through arbitrary edit attempts preserves the
    /// aggregate invariants: stage count, a single final stage, and the
    /// derived first exam date.
    #[test]
    fn engine_preserves_aggregate_invariants(
        ops in vec((0usize..6, prop_oneof![regular_status(), final_status()]), 0..24)
    ) {
        let mut app = make_app("upsc");
        let count = app.stage_count();

        for (index, status) in ops {
            let _ = StageEngine::update_stage(
                &mut app,
                index,
                StagePatch::new().with_status(status),
            );

            prop_assert_eq!(app.stage_count(), count);
            prop_assert_eq!(
                app.stages().iter().filter(|s| s.is_final()).count(),
                1
            );
            prop_assert_eq!(app.first_exam_date(), app.stages()[0].date);

            let editable: Vec<usize> = (0..count)
                .filter(|&i| is_editable(app.stages(), i))
                .collect();
            prop_assert_eq!(editable.len(), 1);
        }
    }

    /// Setting the first exam date from either direction converges on the
    /// same value, and repeating it changes nothing further.
    #[test]
    fn first_exam_date_sync_is_idempotent(date in any_date()) {
        let mut via_stage = make_app("ssc");
        StageEngine::update_stage(&mut via_stage, 0, StagePatch::new().with_date(date))
            .expect("update");

        let mut via_app = make_app("ssc");
        StageEngine::set_first_exam_date(&mut via_app, date).expect("set");

        prop_assert_eq!(via_stage.first_exam_date(), Some(date));
        prop_assert_eq!(via_app.first_exam_date(), Some(date));
        prop_assert_eq!(&via_stage, &via_app);

        let before = via_app.clone();
        StageEngine::set_first_exam_date(&mut via_app, date).expect("set again");
        prop_assert_eq!(via_app, before);
    }

    /// Template lookup is total and well-formed for any category string.
    #[test]
    fn templates_are_well_formed_for_any_category(category in ".{0,40}") {
        let catalog = TemplateCatalog::standard();
        let stages = catalog.templates_for(&category);

        prop_assert!(stages.len() >= 2);
        prop_assert!(stages.len() <= 4);
        prop_assert_eq!(stages.iter().filter(|s| s.is_final()).count(), 1);
        prop_assert!(stages.iter().all(|s| s.status == StageStatus::Pending));

        // Same input, same output.
        prop_assert_eq!(stages, catalog.templates_for(&category));
    }
}
