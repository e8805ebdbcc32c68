//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command is a load-modify-save cycle over the JSON store; the
//! engine in `examtrack-core` makes the decisions, this module renders
//! them.

use crate::feedback;
use crate::store;
use chrono::{NaiveDate, Utc};
use examtrack_core::{
    ApplicationDraft, ApplicationId, ExamApplication, FinalStatus, PaymentStatus, StageEngine,
    StagePatch, StageResolved, StageStatus, TemplateCatalog, TrackerError, find_current_index,
    is_editable, reason_if_not_editable, roster_to_bytes,
};
use std::path::Path;

// =============================================================================
// INPUT PARSING HELPERS
// =============================================================================

/// Parse a status argument ("pending", "cleared", "not-cleared", "n/a",
/// "selected", "not-selected").
pub fn parse_status(input: &str) -> Result<StageStatus, TrackerError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "pending" => Ok(StageStatus::Pending),
        "cleared" => Ok(StageStatus::Cleared),
        "not-cleared" => Ok(StageStatus::NotCleared),
        "n/a" | "na" => Ok(StageStatus::NotApplicable),
        "selected" => Ok(StageStatus::Selected),
        "not-selected" => Ok(StageStatus::NotSelected),
        other => Err(TrackerError::InvalidField(format!(
            "unknown status '{other}'; use pending, cleared, not-cleared, n/a, selected, or not-selected"
        ))),
    }
}

/// Parse a payment-status argument ("paid", "pending", "free").
pub fn parse_payment(input: &str) -> Result<PaymentStatus, TrackerError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "paid" => Ok(PaymentStatus::Paid),
        "pending" => Ok(PaymentStatus::Pending),
        "free" => Ok(PaymentStatus::Free),
        other => Err(TrackerError::InvalidField(format!(
            "unknown payment status '{other}'; use paid, pending, or free"
        ))),
    }
}

/// Parse a YYYY-MM-DD date argument.
pub fn parse_date(input: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        TrackerError::InvalidField(format!("invalid date '{input}' (expected YYYY-MM-DD): {e}"))
    })
}

/// Convert a 1-based CLI stage number to a 0-based index.
pub fn stage_index(number: usize) -> Result<usize, TrackerError> {
    number
        .checked_sub(1)
        .ok_or_else(|| TrackerError::InvalidField("stage numbers start at 1".to_string()))
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// JSON view of an application, including the derived fields the store
/// never holds.
fn app_json(app: &ExamApplication) -> serde_json::Value {
    let current = find_current_index(app.stages());
    serde_json::json!({
        "id": app.id().0,
        "name": app.name,
        "category": app.category,
        "exam_fee": app.exam_fee,
        "payment_status": app.payment_status.as_str(),
        "place_of_exam": app.place_of_exam,
        "notes": app.notes,
        "first_exam_date": app.first_exam_date().map(|d| d.to_string()),
        "final_status": app.final_status().as_str(),
        "is_archived": app.is_archived(),
        "created_at": app.created_at().to_rfc3339(),
        "current_stage": current + 1,
        "stages": app.stages().iter().enumerate().map(|(i, s)| serde_json::json!({
            "number": i + 1,
            "name": s.name,
            "role": s.role.as_str(),
            "status": s.status.as_str(),
            "date": s.date.map(|d| d.to_string()),
            "score": s.score,
            "notes": s.notes,
            "editable": is_editable(app.stages(), i),
        })).collect::<Vec<_>>(),
    })
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn event_json(event: &StageResolved) -> serde_json::Value {
    serde_json::json!({
        "stage": event.stage_name,
        "status": event.status.as_str(),
        "is_final": event.is_final,
        "score": event.score,
        "message": feedback::message_for(event),
    })
}

/// Print the feedback copy for a resolved stage.
fn print_feedback(event: &StageResolved) {
    println!();
    println!("{}", feedback::message_for(event));
    if feedback::show_score(event)
        && let Some(score) = &event.score
    {
        println!("Recorded score: {score}");
    }
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List active applications, or the archived history.
pub fn cmd_list(store_path: &Path, json_mode: bool, archived: bool) -> Result<(), TrackerError> {
    let roster = store::load_or_create(store_path)?;
    let apps = if archived {
        roster.archived()
    } else {
        roster.active()
    };

    if json_mode {
        let out: Vec<_> = apps.iter().map(app_json).collect();
        print_json(&serde_json::Value::Array(out));
        return Ok(());
    }

    if apps.is_empty() {
        if archived {
            println!("No archived applications.");
        } else {
            println!("No applications yet. Create one with: examtrack create");
        }
        return Ok(());
    }

    println!(
        "{:<5} {:<28} {:<11} {:<13} CURRENT STAGE",
        "ID", "NAME", "CATEGORY", "OUTCOME"
    );
    for app in apps {
        let current = find_current_index(app.stages());
        let current_name = app
            .stages()
            .get(current)
            .map_or("-", |s| s.name.as_str());
        println!(
            "{:<5} {:<28} {:<11} {:<13} {}",
            app.id(),
            app.name,
            app.category,
            app.final_status(),
            current_name
        );
    }

    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one application with its stage progression.
pub fn cmd_show(store_path: &Path, json_mode: bool, id: u64) -> Result<(), TrackerError> {
    let roster = store::load_or_create(store_path)?;
    let id = ApplicationId(id);
    let app = roster
        .get(id)
        .or_else(|| roster.archived().iter().find(|a| a.id() == id))
        .ok_or(TrackerError::ApplicationNotFound(id))?;

    if json_mode {
        print_json(&app_json(app));
        return Ok(());
    }

    let title = format!("Application #{}: {}", app.id(), app.name);
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!("Category:   {}", app.category);
    println!("Fee:        {} ({})", app.exam_fee, app.payment_status);
    if !app.place_of_exam.is_empty() {
        println!("Place:      {}", app.place_of_exam);
    }
    println!("Created:    {}", app.created_at().format("%Y-%m-%d %H:%M UTC"));
    match app.first_exam_date() {
        Some(date) => println!("First exam: {date}"),
        None => println!("First exam: not scheduled"),
    }
    println!("Outcome:    {}", app.final_status());
    if app.is_archived() {
        println!("Archived:   yes");
    }
    if let Some(notes) = &app.notes {
        println!("Notes:      {notes}");
    }
    println!();
    println!("Stages:");
    for (i, stage) in app.stages().iter().enumerate() {
        let marker = if is_editable(app.stages(), i) {
            "->"
        } else {
            "  "
        };
        let mut line = format!(
            "{marker} {}. {:<24} {:<13}",
            i + 1,
            stage.name,
            stage.status.to_string()
        );
        if let Some(date) = stage.date {
            line.push_str(&format!(" {date}"));
        }
        // Score is only shown once the stage has a terminal outcome.
        if stage.status.is_resolved()
            && let Some(score) = &stage.score
        {
            line.push_str(&format!("  score {score}"));
        }
        println!("{}", line.trim_end());
        if let Some(notes) = &stage.notes {
            println!("       {notes}");
        }
    }

    if let Some(reason) = reason_if_not_editable(app.stages(), app.final_stage_index())
        && app.final_status() == FinalStatus::Pending
    {
        println!();
        println!("Final stage locked: {reason}");
    }

    Ok(())
}

// =============================================================================
// CREATE COMMAND
// =============================================================================

/// Create a new application and print its assigned id.
pub fn cmd_create(
    store_path: &Path,
    json_mode: bool,
    name: String,
    category: String,
    fee: u32,
    payment: &str,
    place: String,
    notes: Option<String>,
    date: Option<String>,
    stages: Option<Vec<String>>,
) -> Result<(), TrackerError> {
    let catalog = TemplateCatalog::standard();
    let mut roster = store::load_or_create(store_path)?;

    let draft = ApplicationDraft {
        name,
        category,
        exam_fee: fee,
        payment_status: parse_payment(payment)?,
        place_of_exam: place,
        notes,
        custom_stages: stages,
        first_exam_date: date.as_deref().map(parse_date).transpose()?,
        created_at: Utc::now(),
    };

    let id = roster.create(&catalog, draft)?;
    store::save(store_path, &roster)?;

    tracing::info!("created application {id}");

    if json_mode {
        let app = roster.get(id).ok_or(TrackerError::ApplicationNotFound(id))?;
        print_json(&app_json(app));
        return Ok(());
    }

    let app = roster.get(id).ok_or(TrackerError::ApplicationNotFound(id))?;
    println!("Created application #{id}: {}", app.name);
    println!("Stages:");
    for (i, stage) in app.stages().iter().enumerate() {
        println!("  {}. {}", i + 1, stage.name);
    }

    Ok(())
}

// =============================================================================
// UPDATE COMMAND
// =============================================================================

/// Edit one stage of an application.
pub fn cmd_update(
    store_path: &Path,
    json_mode: bool,
    id: u64,
    stage: usize,
    status: Option<String>,
    date: Option<String>,
    score: Option<String>,
    notes: Option<String>,
) -> Result<(), TrackerError> {
    let index = stage_index(stage)?;
    let mut roster = store::load_or_create(store_path)?;

    let patch = StagePatch {
        status: status.as_deref().map(parse_status).transpose()?,
        date: date.as_deref().map(parse_date).transpose()?,
        score,
        notes,
    };

    let app = roster.require_mut(ApplicationId(id))?;
    let event = StageEngine::update_stage(app, index, patch)?;
    let stage_name = app
        .stage(index)
        .map_or_else(String::new, |s| s.name.clone());
    let outcome = app.final_status();

    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({
            "id": id,
            "stage": stage,
            "stage_name": stage_name,
            "final_status": outcome.as_str(),
            "resolved": event.as_ref().map(event_json),
        }));
        return Ok(());
    }

    println!("Updated stage {stage} ({stage_name}) of application #{id}");
    if let Some(event) = &event {
        print_feedback(event);
    }

    Ok(())
}

// =============================================================================
// SET-DATE COMMAND
// =============================================================================

/// Set the first exam date (stage 1's date).
pub fn cmd_set_date(
    store_path: &Path,
    json_mode: bool,
    id: u64,
    date: &str,
) -> Result<(), TrackerError> {
    let date = parse_date(date)?;
    let mut roster = store::load_or_create(store_path)?;

    let app = roster.require_mut(ApplicationId(id))?;
    StageEngine::set_first_exam_date(app, date)?;
    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({ "id": id, "first_exam_date": date.to_string() }));
        return Ok(());
    }
    println!("First exam date of application #{id} set to {date}");
    Ok(())
}

// =============================================================================
// STAGE AUTHORING COMMANDS
// =============================================================================

/// Insert a stage before the final stage.
pub fn cmd_add_stage(
    store_path: &Path,
    json_mode: bool,
    id: u64,
    name: Option<String>,
) -> Result<(), TrackerError> {
    let mut roster = store::load_or_create(store_path)?;

    let app = roster.require_mut(ApplicationId(id))?;
    let index = app.add_stage(name)?;
    let stage_name = app
        .stage(index)
        .map_or_else(String::new, |s| s.name.clone());
    let count = app.stage_count();

    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({
            "id": id,
            "added_stage": index + 1,
            "name": stage_name,
            "stage_count": count,
        }));
        return Ok(());
    }
    println!("Added stage {} ({stage_name}); {count} stages total", index + 1);
    Ok(())
}

/// Remove a stage.
pub fn cmd_remove_stage(
    store_path: &Path,
    json_mode: bool,
    id: u64,
    stage: usize,
) -> Result<(), TrackerError> {
    let index = stage_index(stage)?;
    let mut roster = store::load_or_create(store_path)?;

    let app = roster.require_mut(ApplicationId(id))?;
    let removed = app.remove_stage(index)?;
    let count = app.stage_count();

    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({
            "id": id,
            "removed_stage": stage,
            "name": removed.name,
            "stage_count": count,
        }));
        return Ok(());
    }
    println!("Removed stage {stage} ({}); {count} stages remain", removed.name);
    Ok(())
}

/// Rename a stage.
pub fn cmd_rename_stage(
    store_path: &Path,
    json_mode: bool,
    id: u64,
    stage: usize,
    name: String,
) -> Result<(), TrackerError> {
    let index = stage_index(stage)?;
    let mut roster = store::load_or_create(store_path)?;

    let app = roster.require_mut(ApplicationId(id))?;
    app.rename_stage(index, name.clone())?;

    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({ "id": id, "stage": stage, "name": name }));
        return Ok(());
    }
    println!("Renamed stage {stage} to {name}");
    Ok(())
}

/// Replace the stage list from a category template.
pub fn cmd_apply_template(
    store_path: &Path,
    json_mode: bool,
    id: u64,
    category: &str,
) -> Result<(), TrackerError> {
    let catalog = TemplateCatalog::standard();
    let mut roster = store::load_or_create(store_path)?;

    let app = roster.require_mut(ApplicationId(id))?;
    app.apply_template(&catalog, category);
    let count = app.stage_count();

    store::save(store_path, &roster)?;

    if json_mode {
        let app = roster
            .get(ApplicationId(id))
            .ok_or(TrackerError::ApplicationNotFound(ApplicationId(id)))?;
        print_json(&app_json(app));
        return Ok(());
    }
    println!("Applied template '{category}' to application #{id} ({count} stages)");
    Ok(())
}

// =============================================================================
// ARCHIVE / DELETE COMMANDS
// =============================================================================

/// Move a selected application into history.
pub fn cmd_archive(store_path: &Path, json_mode: bool, id: u64) -> Result<(), TrackerError> {
    let mut roster = store::load_or_create(store_path)?;

    roster.archive(ApplicationId(id))?;
    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({ "id": id, "archived": true }));
        return Ok(());
    }
    println!("Application #{id} archived. Congratulations on the selection!");
    Ok(())
}

/// Delete an application.
pub fn cmd_delete(store_path: &Path, json_mode: bool, id: u64) -> Result<(), TrackerError> {
    let mut roster = store::load_or_create(store_path)?;

    let removed = roster.delete(ApplicationId(id))?;
    store::save(store_path, &roster)?;

    if json_mode {
        print_json(&serde_json::json!({ "id": id, "deleted": true, "name": removed.name }));
        return Ok(());
    }
    println!("Deleted application #{id} ({})", removed.name);
    Ok(())
}

// =============================================================================
// TEMPLATES COMMAND
// =============================================================================

/// List the known category templates.
pub fn cmd_templates(json_mode: bool, category: Option<&str>) -> Result<(), TrackerError> {
    let catalog = TemplateCatalog::standard();

    if let Some(category) = category {
        let stages = catalog.templates_for(category);
        if json_mode {
            let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
            print_json(&serde_json::json!({ "category": category, "stages": names }));
            return Ok(());
        }
        if !catalog.contains(category) {
            println!("Unknown category '{category}'; showing the generic template.");
        }
        println!("{category}:");
        for (i, stage) in stages.iter().enumerate() {
            println!("  {}. {}", i + 1, stage.name);
        }
        return Ok(());
    }

    if json_mode {
        let out: Vec<_> = catalog
            .categories()
            .map(|key| {
                let names: Vec<String> = catalog
                    .templates_for(key)
                    .into_iter()
                    .map(|s| s.name)
                    .collect();
                serde_json::json!({ "category": key, "stages": names })
            })
            .collect();
        print_json(&serde_json::Value::Array(out));
        return Ok(());
    }

    println!("Known categories:");
    for key in catalog.categories() {
        let names: Vec<String> = catalog
            .templates_for(key)
            .into_iter()
            .map(|s| s.name)
            .collect();
        println!("  {key:<10} {}", names.join(" > "));
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export the roster snapshot.
pub fn cmd_export(store_path: &Path, output: &Path, format: &str) -> Result<(), TrackerError> {
    let roster = store::load_or_create(store_path)?;

    let data = match format {
        "canonical" => roster_to_bytes(&roster)?,
        "json" => serde_json::to_vec_pretty(&roster)
            .map_err(|e| TrackerError::SerializationError(e.to_string()))?,
        _ => {
            return Err(TrackerError::SerializationError(format!(
                "unknown format: {format}. Use: canonical, json"
            )));
        }
    };

    std::fs::write(output, &data)
        .map_err(|e| TrackerError::IoError(format!("write file: {e}")))?;

    println!("Exported {} bytes to {:?}", data.len(), output);
    Ok(())
}

/// Import a roster snapshot, replacing the store.
pub fn cmd_import(store_path: &Path, input: &Path) -> Result<(), TrackerError> {
    let roster = store::read_snapshot(input)?;
    store::save(store_path, &roster)?;

    tracing::info!("imported roster from {:?}", input);

    println!(
        "Imported roster: {} active, {} archived",
        roster.len(),
        roster.archived().len()
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_accepts_the_full_vocabulary() {
        assert_eq!(parse_status("pending"), Ok(StageStatus::Pending));
        assert_eq!(parse_status("Cleared"), Ok(StageStatus::Cleared));
        assert_eq!(parse_status("not-cleared"), Ok(StageStatus::NotCleared));
        assert_eq!(parse_status("n/a"), Ok(StageStatus::NotApplicable));
        assert_eq!(parse_status("na"), Ok(StageStatus::NotApplicable));
        assert_eq!(parse_status(" selected "), Ok(StageStatus::Selected));
        assert_eq!(parse_status("not-selected"), Ok(StageStatus::NotSelected));
        assert!(parse_status("passed").is_err());
    }

    #[test]
    fn parse_payment_accepts_known_values() {
        assert_eq!(parse_payment("paid"), Ok(PaymentStatus::Paid));
        assert_eq!(parse_payment("FREE"), Ok(PaymentStatus::Free));
        assert!(parse_payment("card").is_err());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert!(parse_date("2026-06-14").is_ok());
        assert!(parse_date("14/06/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn stage_numbers_are_one_based() {
        assert_eq!(stage_index(1), Ok(0));
        assert_eq!(stage_index(5), Ok(4));
        assert!(stage_index(0).is_err());
    }
}
