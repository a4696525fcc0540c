//! Draft validation.
//!
//! [`validate`] is a pure function over a draft. It runs on every field change (through
//! [`DraftForm`](crate::draft::DraftForm)) so errors are reported per field as soon as they
//! appear, and submission stays blocked until the map is empty.

use crate::draft::{EditMode, SurvivorDraft};
use crate::field::validated_specs;
use datamonster_types::SurvivorName;
use std::collections::BTreeMap;
use std::fmt;

/// Per-field validation messages, keyed by wire field name (`name`, `survival`, `disorder2`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// `true` when the draft may be submitted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for one field.
    ///
    /// # Arguments
    ///
    /// * `field` - Wire field name, e.g. `survival` or `disorder2`
    ///
    /// # Returns
    ///
    /// The first message recorded for `field`, or `None` if it is valid.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `(field, message)` pairs ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates `draft` for the given mode.
///
/// - every numeric stat, birth included, must lie in its declared range;
/// - the name is checked (1 to 50 characters) only when creating, as existing names are not
///   editable;
/// - a disorder may occupy only one slot.
///
/// Status needs no check here: [`SurvivorStatus`](crate::survivor::SurvivorStatus) is a closed
/// enum and free-text input is rejected when it is parsed.
pub fn validate(draft: &SurvivorDraft, mode: EditMode) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if mode == EditMode::Create {
        if let Err(e) = SurvivorName::new(&draft.name) {
            errors.insert("name", e.to_string());
        }
    }

    for spec in validated_specs() {
        let value = draft.stats.get(spec.stat);
        if !spec.accepts(value) {
            errors.insert(
                spec.wire_key(),
                format!("{} must be {}", spec.stat.label(), spec.describe_range()),
            );
        }
    }

    for slot in draft.disorders.duplicate_slots() {
        errors.insert(
            format!("disorder{}", slot + 1),
            "disorder is already selected in another slot",
        );
    }

    errors
}
