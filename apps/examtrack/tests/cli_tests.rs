//! # CLI Command Tests
//!
//! Drives the command implementations end to end against a temporary
//! store file, the same load-modify-save path the binary takes.

use examtrack::cli::{
    cmd_add_stage, cmd_archive, cmd_create, cmd_delete, cmd_export, cmd_import, cmd_list,
    cmd_remove_stage, cmd_set_date, cmd_show, cmd_templates, cmd_update,
};
use examtrack::store;
use examtrack_core::{ApplicationId, FinalStatus, StageStatus, TrackerError};
use std::path::{Path, PathBuf};

fn temp_store(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("roster.json")
}

fn create_banking_app(store_path: &Path) {
    cmd_create(
        store_path,
        false,
        "IBPS PO 2026".to_string(),
        "banking".to_string(),
        850,
        "paid",
        "Mumbai".to_string(),
        None,
        Some("2026-06-14".to_string()),
        None,
    )
    .expect("create");
}

#[test]
fn create_then_progress_to_selection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);

    // Clear the three regular stages, then select the final one.
    for stage in 1..=3 {
        cmd_update(
            &store_path,
            false,
            1,
            stage,
            Some("cleared".to_string()),
            None,
            Some("80/100".to_string()),
            None,
        )
        .expect("clear stage");
    }
    cmd_update(
        &store_path,
        false,
        1,
        4,
        Some("selected".to_string()),
        None,
        None,
        None,
    )
    .expect("select");

    let roster = store::load_or_create(&store_path).expect("load");
    let app = roster.get(ApplicationId(1)).expect("app");
    assert_eq!(app.final_status(), FinalStatus::Selected);
}

#[test]
fn out_of_order_update_is_rejected_and_store_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);
    let before = store::load_or_create(&store_path).expect("load");

    let result = cmd_update(
        &store_path,
        false,
        1,
        3,
        Some("cleared".to_string()),
        None,
        None,
        None,
    );

    assert!(matches!(result, Err(TrackerError::StageNotEditable(_))));
    let after = store::load_or_create(&store_path).expect("load");
    assert_eq!(before, after);
}

#[test]
fn set_date_flows_through_to_stage_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);

    cmd_set_date(&store_path, false, 1, "2026-07-02").expect("set date");

    let roster = store::load_or_create(&store_path).expect("load");
    let app = roster.get(ApplicationId(1)).expect("app");
    assert_eq!(
        app.first_exam_date().map(|d| d.to_string()),
        Some("2026-07-02".to_string())
    );
    assert_eq!(app.stages()[0].date, app.first_exam_date());
}

#[test]
fn authoring_commands_respect_stage_bounds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);

    // Four stages from the template; one more is allowed, a sixth is not.
    cmd_add_stage(&store_path, false, 1, Some("Document Check".to_string())).expect("add");
    let result = cmd_add_stage(&store_path, false, 1, None);
    assert!(matches!(result, Err(TrackerError::InvalidStageCount(_))));

    // The final stage (now number 5) cannot be removed.
    let result = cmd_remove_stage(&store_path, false, 1, 5);
    assert!(matches!(result, Err(TrackerError::InvalidStageCount(_))));

    cmd_remove_stage(&store_path, false, 1, 4).expect("remove regular stage");
    let roster = store::load_or_create(&store_path).expect("load");
    assert_eq!(roster.get(ApplicationId(1)).expect("app").stage_count(), 4);
}

#[test]
fn archive_requires_selection_then_moves_to_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);

    let result = cmd_archive(&store_path, false, 1);
    assert!(matches!(result, Err(TrackerError::NotYetSelected)));

    for stage in 1..=3 {
        cmd_update(
            &store_path,
            false,
            1,
            stage,
            Some("cleared".to_string()),
            None,
            None,
            None,
        )
        .expect("clear");
    }
    cmd_update(
        &store_path,
        false,
        1,
        4,
        Some("selected".to_string()),
        None,
        None,
        None,
    )
    .expect("select");

    cmd_archive(&store_path, false, 1).expect("archive");

    let roster = store::load_or_create(&store_path).expect("load");
    assert!(roster.is_empty());
    assert_eq!(roster.archived().len(), 1);

    // Archived applications still show and can be deleted.
    cmd_show(&store_path, false, 1).expect("show archived");
    cmd_delete(&store_path, false, 1).expect("delete");
    let roster = store::load_or_create(&store_path).expect("load");
    assert!(roster.archived().is_empty());
}

#[test]
fn export_import_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    let snapshot = dir.path().join("backup.extk");
    create_banking_app(&store_path);
    let original = store::load_or_create(&store_path).expect("load");

    cmd_export(&store_path, &snapshot, "canonical").expect("export");

    let second_store = dir.path().join("restored.json");
    cmd_import(&second_store, &snapshot).expect("import");

    let restored = store::load_or_create(&second_store).expect("load");
    assert_eq!(original, restored);
}

#[test]
fn export_rejects_unknown_formats() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);

    let result = cmd_export(&store_path, &dir.path().join("x"), "yaml");
    assert!(matches!(result, Err(TrackerError::SerializationError(_))));
}

#[test]
fn unknown_ids_surface_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);

    let result = cmd_show(&store_path, false, 42);
    assert_eq!(
        result,
        Err(TrackerError::ApplicationNotFound(ApplicationId(42)))
    );
}

#[test]
fn invalid_status_text_is_rejected_before_the_engine_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);
    create_banking_app(&store_path);

    let result = cmd_update(
        &store_path,
        false,
        1,
        1,
        Some("passed".to_string()),
        None,
        None,
        None,
    );
    assert!(matches!(result, Err(TrackerError::InvalidField(_))));

    // Wrong vocabulary for the role is the engine's call.
    let result = cmd_update(
        &store_path,
        false,
        1,
        1,
        Some("selected".to_string()),
        None,
        None,
        None,
    );
    assert!(matches!(
        result,
        Err(TrackerError::InvalidStatusForRole {
            status: StageStatus::Selected,
            ..
        })
    ));
}

#[test]
fn list_and_templates_render_without_a_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = temp_store(&dir);

    cmd_list(&store_path, false, false).expect("empty list");
    cmd_list(&store_path, true, true).expect("empty archived json");
    cmd_templates(false, None).expect("all templates");
    cmd_templates(true, Some("banking")).expect("banking json");
}
