//! Catalog of breathing techniques.
//!
//! This module provides the built-in techniques and merges user-defined ones
//! from configuration.

use crate::{BreathingTechnique, Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Ordered, read-only collection of techniques
#[derive(Clone, Debug)]
pub struct Catalog {
    techniques: Vec<BreathingTechnique>,
}

fn technique(
    id: &str,
    name: &str,
    description: &str,
    [inhale, hold, exhale, rest]: [u32; 4],
    cycles: u32,
) -> BreathingTechnique {
    BreathingTechnique {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        inhale,
        hold,
        exhale,
        rest,
        cycles,
    }
}

/// Builds the catalog of built-in techniques
///
/// Prefer `get_default_catalog()` outside of tests.
pub fn build_default_catalog() -> Catalog {
    Catalog {
        techniques: vec![
            technique(
                "box",
                "Box Breathing",
                "Equal counts in, hold, out and rest. Steadies focus under pressure.",
                [4, 4, 4, 4],
                4,
            ),
            technique(
                "relaxing",
                "4-7-8 Breathing",
                "A long hold and slower exhale to wind down before sleep.",
                [4, 7, 8, 0],
                4,
            ),
            technique(
                "energizing",
                "Energizing Breath",
                "Quick, even breaths to lift alertness.",
                [2, 0, 2, 0],
                10,
            ),
            technique(
                "coherent",
                "Coherent Breathing",
                "Slow five-second breaths for heart-rate coherence.",
                [5, 0, 5, 0],
                6,
            ),
        ],
    }
}

impl Catalog {
    /// Look up a technique by id
    pub fn get(&self, id: &str) -> Option<&BreathingTechnique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    /// All techniques in display order
    pub fn list(&self) -> &[BreathingTechnique] {
        &self.techniques
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Copy of this catalog with user-defined techniques appended
    ///
    /// Custom techniques must satisfy the technique invariants and may not
    /// reuse an existing id.
    pub fn with_custom(&self, custom: &[BreathingTechnique]) -> Result<Catalog> {
        let mut merged = self.clone();

        for t in custom {
            let problems = t.validate();
            if !problems.is_empty() {
                return Err(Error::CatalogValidation(problems.join("; ")));
            }
            if merged.get(&t.id).is_some() {
                return Err(Error::CatalogValidation(format!(
                    "Custom technique '{}' duplicates an existing id",
                    t.id
                )));
            }
            tracing::debug!("Added custom technique {}", t.id);
            merged.techniques.push(t.clone());
        }

        Ok(merged)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        if self.techniques.is_empty() {
            errors.push("Catalog has no techniques".to_string());
        }

        for t in &self.techniques {
            if !seen.insert(t.id.as_str()) {
                errors.push(format!("Duplicate technique ID '{}'", t.id));
            }
            errors.extend(t.validate());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.list()[0].id, "box");
    }

    #[test]
    fn test_default_catalog_validates() {
        let errors = get_default_catalog().validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_lookup_known_techniques() {
        let catalog = get_default_catalog();

        let box_breathing = catalog.get("box").unwrap();
        assert_eq!(box_breathing.cycle_seconds(), 16);
        assert_eq!(box_breathing.pattern(), "4-4-4-4");

        let relaxing = catalog.get("relaxing").unwrap();
        assert_eq!(relaxing.total_seconds(), 76);
        assert_eq!(relaxing.pattern(), "4-7-8");

        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_with_custom_appends() {
        let custom = technique("triangle", "Triangle", "", [3, 3, 3, 0], 5);
        let catalog = build_default_catalog().with_custom(&[custom]).unwrap();

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get("triangle").unwrap().pattern(), "3-3-3");
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn test_with_custom_rejects_duplicate_id() {
        let custom = technique("box", "Another box", "", [4, 4, 4, 4], 2);
        let result = build_default_catalog().with_custom(&[custom]);
        assert!(matches!(result, Err(Error::CatalogValidation(_))));
    }

    #[test]
    fn test_with_custom_rejects_invalid_technique() {
        let no_exhale = technique("broken", "Broken", "", [4, 0, 0, 0], 3);
        let result = build_default_catalog().with_custom(&[no_exhale]);
        assert!(matches!(result, Err(Error::CatalogValidation(_))));

        let no_cycles = technique("empty", "Empty", "", [4, 0, 4, 0], 0);
        let result = build_default_catalog().with_custom(&[no_cycles]);
        assert!(matches!(result, Err(Error::CatalogValidation(_))));
    }

    #[test]
    fn test_maximal_custom_technique_saturates() {
        let marathon = technique(
            "marathon",
            "Marathon",
            "",
            [u32::MAX, u32::MAX, 4, 4],
            u32::MAX,
        );
        let catalog = build_default_catalog().with_custom(&[marathon]).unwrap();
        let marathon = catalog.get("marathon").unwrap();

        assert_eq!(marathon.cycle_seconds(), u32::MAX);
        assert_eq!(marathon.total_seconds(), u32::MAX);
        assert_eq!(marathon.pattern(), format!("{0}-{0}-4-4", u32::MAX));

        let mut timer = crate::SessionTimer::new(marathon.clone());
        timer.start();
        timer.tick();
        assert!(timer.progress() > 0.0 && timer.progress() < 1.0);
    }

    #[test]
    fn test_validate_reports_duplicates() {
        let mut catalog = build_default_catalog();
        catalog.techniques.push(catalog.techniques[0].clone());
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate")));
    }
}
