//! # Stage Template Catalog
//!
//! Curated default stage lists per exam category, plus the generic
//! fallback for categories the catalog does not know.
//!
//! The catalog is an immutable value constructed once and passed by
//! reference into the operations that need it. It is deliberately NOT a
//! module-level global: callers that want extra templates build their own
//! catalog with [`TemplateCatalog::register`].

use crate::application::classify_final_index;
use crate::limits::{MAX_STAGES, MIN_STAGES};
use crate::types::{Stage, StageRole, TrackerError};
use std::collections::BTreeMap;

// =============================================================================
// CURATED TEMPLATES
// =============================================================================

/// The built-in category templates. Every curated list ends in a stage
/// literally named "Final Selection".
const STANDARD_TEMPLATES: &[(&str, &[&str])] = &[
    ("banking", &["Prelims", "Mains", "Interview", "Final Selection"]),
    ("ssc", &["Tier 1", "Tier 2", "Skill Test", "Final Selection"]),
    (
        "railway",
        &["CBT 1", "CBT 2", "Document Verification", "Final Selection"],
    ),
    ("upsc", &["Prelims", "Mains", "Interview", "Final Selection"]),
    (
        "state-psc",
        &["Prelims", "Mains", "Interview", "Final Selection"],
    ),
    (
        "judicial",
        &["Prelims", "Mains", "Viva Voce", "Final Selection"],
    ),
    (
        "defence",
        &["Written Exam", "SSB Interview", "Medical Examination", "Final Selection"],
    ),
];

/// Template used for categories the catalog does not know.
const FALLBACK_TEMPLATE: &[&str] = &["Stage 1", "Final Selection"];

// =============================================================================
// TEMPLATE CATALOG
// =============================================================================

/// Immutable map from category key to an ordered default stage-name list.
///
/// Keys are matched case-insensitively (lookups lowercase and trim the
/// requested key). Uses `BTreeMap` so [`TemplateCatalog::categories`]
/// iterates in a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Vec<String>>,
}

impl TemplateCatalog {
    /// Build the catalog of curated standard templates.
    #[must_use]
    pub fn standard() -> Self {
        let templates = STANDARD_TEMPLATES
            .iter()
            .map(|(key, names)| {
                let names = names.iter().map(|n| (*n).to_string()).collect();
                ((*key).to_string(), names)
            })
            .collect();
        Self { templates }
    }

    /// Register a user-defined template under `key`.
    ///
    /// The name list must respect the stage count bounds. Registering an
    /// existing key replaces its template.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        names: Vec<String>,
    ) -> Result<(), TrackerError> {
        if names.len() < MIN_STAGES || names.len() > MAX_STAGES {
            return Err(TrackerError::InvalidStageCount(format!(
                "template must have {MIN_STAGES} to {MAX_STAGES} stages, got {}",
                names.len()
            )));
        }
        self.templates.insert(normalize_key(&key.into()), names);
        Ok(())
    }

    /// The ordered default stage list for `category`, every stage pending.
    ///
    /// Unknown categories fall back to the generic two-stage template.
    /// Pure function of its input; no side effects.
    #[must_use]
    pub fn templates_for(&self, category: &str) -> Vec<Stage> {
        let key = normalize_key(category);
        match self.templates.get(&key) {
            Some(names) => build_stages(names.iter().map(String::as_str)),
            None => build_stages(FALLBACK_TEMPLATE.iter().copied()),
        }
    }

    /// Check whether `category` has a curated or registered template.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.templates.contains_key(&normalize_key(category))
    }

    /// Known category keys, in deterministic order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercase + trim, so "Banking " and "banking" hit the same template.
fn normalize_key(category: &str) -> String {
    category.trim().to_ascii_lowercase()
}

/// Materialize pending stages from a name list, assigning the final role
/// via the same classifier used for custom drafts.
fn build_stages<'a>(names: impl Iterator<Item = &'a str>) -> Vec<Stage> {
    let names: Vec<&str> = names.collect();
    let final_index = classify_final_index(&names);
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let role = if i == final_index {
                StageRole::Final
            } else {
                StageRole::Regular
            };
            Stage::pending(*name, role)
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StageStatus;

    #[test]
    fn banking_template_has_four_stages_ending_in_final_selection() {
        let catalog = TemplateCatalog::standard();
        let stages = catalog.templates_for("banking");

        assert_eq!(stages.len(), 4);
        assert_eq!(stages[0].name, "Prelims");
        assert_eq!(stages[3].name, "Final Selection");
        assert!(stages[3].is_final());
        assert!(stages.iter().all(|s| s.status == StageStatus::Pending));
    }

    #[test]
    fn every_curated_template_ends_in_final_selection() {
        let catalog = TemplateCatalog::standard();
        for category in catalog.categories() {
            let stages = catalog.templates_for(category);
            assert!(stages.len() >= 3, "category {category}");
            assert!(stages.len() <= 4, "category {category}");
            let last = stages.last().expect("non-empty template");
            assert_eq!(last.name, "Final Selection", "category {category}");
            assert!(last.is_final(), "category {category}");
            // Exactly one final stage per template.
            assert_eq!(stages.iter().filter(|s| s.is_final()).count(), 1);
        }
    }

    #[test]
    fn unknown_category_falls_back_to_generic_template() {
        let catalog = TemplateCatalog::standard();
        let stages = catalog.templates_for("astronaut-corps");

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].name, "Stage 1");
        assert_eq!(stages[1].name, "Final Selection");
        assert!(stages[1].is_final());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = TemplateCatalog::standard();
        assert_eq!(
            catalog.templates_for("Banking"),
            catalog.templates_for("banking")
        );
        assert_eq!(
            catalog.templates_for("  UPSC "),
            catalog.templates_for("upsc")
        );
    }

    #[test]
    fn register_adds_a_custom_template() {
        let mut catalog = TemplateCatalog::standard();
        catalog
            .register(
                "campus",
                vec!["Aptitude Test".to_string(), "Final Selection".to_string()],
            )
            .expect("register");

        assert!(catalog.contains("campus"));
        let stages = catalog.templates_for("campus");
        assert_eq!(stages.len(), 2);
        assert!(stages[1].is_final());
    }

    #[test]
    fn register_rejects_out_of_bounds_counts() {
        let mut catalog = TemplateCatalog::standard();

        let result = catalog.register("empty", Vec::new());
        assert!(matches!(result, Err(TrackerError::InvalidStageCount(_))));

        let six = (1..=6).map(|i| format!("Stage {i}")).collect();
        let result = catalog.register("six", six);
        assert!(matches!(result, Err(TrackerError::InvalidStageCount(_))));
    }

    #[test]
    fn templates_for_is_pure() {
        let catalog = TemplateCatalog::standard();
        assert_eq!(
            catalog.templates_for("railway"),
            catalog.templates_for("railway")
        );
    }
}
