//! # Stage Feedback
//!
//! Chooses the message shown when a stage resolves. The engine returns a
//! [`StageResolved`] value and forgets about it; what the user reads is
//! decided here, in the presentation layer.

use examtrack_core::StageResolved;

/// The message for a resolved stage.
///
/// Positive final outcomes congratulate; everything else keeps the
/// candidate moving.
#[must_use]
pub fn message_for(event: &StageResolved) -> &'static str {
    match (event.is_final, event.is_positive()) {
        (true, true) => "Congratulations! Final selection achieved. This milestone is yours.",
        (true, false) => {
            "Not this time. The preparation stays with you, and the next notification is near."
        }
        (false, true) => "Stage cleared! Carry the momentum into the next round.",
        (false, false) => "This stage did not go your way. Review, regroup, and plan the next attempt.",
    }
}

/// Whether the score should be shown alongside the message.
///
/// Scores are stored unconditionally but displayed only for terminal
/// outcomes.
#[must_use]
pub fn show_score(event: &StageResolved) -> bool {
    event.status.is_resolved() && event.score.is_some()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use examtrack_core::StageStatus;

    fn event(status: StageStatus, is_final: bool) -> StageResolved {
        StageResolved {
            stage_name: "Mains".to_string(),
            status,
            is_final,
            score: Some("82/100".to_string()),
        }
    }

    #[test]
    fn final_selection_gets_congratulations() {
        let msg = message_for(&event(StageStatus::Selected, true));
        assert!(msg.starts_with("Congratulations"));
    }

    #[test]
    fn cleared_stage_gets_momentum_message() {
        let msg = message_for(&event(StageStatus::Cleared, false));
        assert!(msg.contains("momentum"));
    }

    #[test]
    fn negative_outcomes_get_motivation() {
        assert!(message_for(&event(StageStatus::NotCleared, false)).contains("next attempt"));
        assert!(message_for(&event(StageStatus::NotSelected, true)).contains("Not this time"));
    }

    #[test]
    fn score_shown_only_when_present() {
        assert!(show_score(&event(StageStatus::Cleared, false)));

        let mut no_score = event(StageStatus::Cleared, false);
        no_score.score = None;
        assert!(!show_score(&no_score));
    }
}
