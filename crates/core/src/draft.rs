//! Local edit state for survivors.
//!
//! A [`SurvivorDraft`] is an immutable value; every edit produces a new draft. [`DraftForm`]
//! pairs a draft with the result of running [`validate`](crate::validation::validate) on it and
//! re-validates after each [`FieldChange`], which is what gates the submit control.
//!
//! Only a [`ValidDraft`] can be handed to the submission layer, so an invalid draft never
//! reaches the diff engine.

use crate::constants::{DISORDER_SLOTS, NEW_SURVIVOR_NAME};
use crate::survivor::{Gender, NewSurvivor, Stat, StatBlock, Survivor, SurvivorSnapshot, SurvivorStatus};
use crate::field::is_patchable;
use crate::validation::{validate, ValidationErrors};
use crate::{CoreError, CoreResult};
use std::collections::BTreeSet;
use std::ops::Deref;

/// Whether a draft describes a new survivor or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit,
}

/// Ordered disorder slots.
///
/// Each slot is edited independently and may be empty. Uniqueness across slots is a rule for
/// whoever fills the slots (see [`Glossary::selectable_disorders`](crate::glossary::Glossary::selectable_disorders));
/// this type stores whatever it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisorderSlots([Option<String>; DISORDER_SLOTS]);

impl DisorderSlots {
    /// Fills slots from a plain list in order. Entries beyond the slot count are dropped.
    pub fn from_list(list: &[String]) -> Self {
        let mut slots: [Option<String>; DISORDER_SLOTS] = Default::default();
        for (slot, id) in slots.iter_mut().zip(list) {
            *slot = Some(id.clone());
        }
        Self(slots)
    }

    /// Disorder id in `slot`, if filled.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).and_then(|s| s.as_deref())
    }

    /// Every slot in order, empty ones as `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|s| s.as_deref())
    }

    /// Returns a copy with `slot` set to `value`. Blank ids clear the slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::SlotOutOfRange` if `slot` is not below the slot count.
    pub fn with_slot(&self, slot: usize, value: Option<String>) -> CoreResult<Self> {
        if slot >= DISORDER_SLOTS {
            return Err(CoreError::SlotOutOfRange {
                slot,
                max: DISORDER_SLOTS,
            });
        }
        let mut next = self.clone();
        next.0[slot] = value.filter(|v| !v.trim().is_empty());
        Ok(next)
    }

    /// Filled slots in slot order, empties removed. This is the transmitted form.
    pub fn collapse(&self) -> Vec<String> {
        self.0.iter().flatten().cloned().collect()
    }

    /// True when both collapse to the same set of ids, regardless of slot position.
    pub fn same_members(&self, other: &DisorderSlots) -> bool {
        let mine: BTreeSet<&str> = self.0.iter().flatten().map(String::as_str).collect();
        let theirs: BTreeSet<&str> = other.0.iter().flatten().map(String::as_str).collect();
        mine == theirs
    }

    /// Slots (by index) whose value already appears in an earlier slot.
    pub fn duplicate_slots(&self) -> Vec<usize> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for (slot, value) in self.0.iter().enumerate() {
            if let Some(id) = value {
                if !seen.insert(id.as_str()) {
                    duplicates.push(slot);
                }
            }
        }
        duplicates
    }
}

/// Edited survivor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurvivorDraft {
    pub name: String,
    pub gender: Gender,
    pub status: SurvivorStatus,
    pub stats: StatBlock,
    pub disorders: DisorderSlots,
}

impl SurvivorDraft {
    /// Draft for a brand new survivor, pre-filled from the sheet template.
    pub fn template() -> Self {
        Self {
            name: NEW_SURVIVOR_NAME.to_owned(),
            gender: Gender::M,
            status: SurvivorStatus::Alive,
            stats: StatBlock::default(),
            disorders: DisorderSlots::default(),
        }
    }

    /// Draft seeded from a server record, used as the starting point of an edit.
    pub fn from_baseline(baseline: &Survivor) -> Self {
        Self {
            name: baseline.name.clone(),
            gender: baseline.gender,
            status: baseline.status,
            stats: baseline.stats,
            disorders: baseline.disorder_slots(),
        }
    }

    /// Applies one field change and returns the new draft.
    pub fn apply(&self, change: FieldChange) -> CoreResult<Self> {
        let mut next = self.clone();
        match change {
            FieldChange::Name(name) => next.name = name,
            FieldChange::Gender(gender) => next.gender = gender,
            FieldChange::Status(status) => next.status = status,
            FieldChange::Stat(stat, value) => next.stats = next.stats.with(stat, value),
            FieldChange::Disorder { slot, value } => {
                next.disorders = next.disorders.with_slot(slot, value)?
            }
        }
        Ok(next)
    }
}

impl SurvivorSnapshot for SurvivorDraft {
    fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }

    fn status(&self) -> SurvivorStatus {
        self.status
    }

    fn disorder_slots(&self) -> DisorderSlots {
        self.disorders.clone()
    }
}

/// A single edit made on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Gender(Gender),
    Status(SurvivorStatus),
    Stat(Stat, i32),
    Disorder { slot: usize, value: Option<String> },
}

/// A draft together with its current validation state.
#[derive(Debug, Clone)]
pub struct DraftForm {
    mode: EditMode,
    draft: SurvivorDraft,
    errors: ValidationErrors,
}

impl DraftForm {
    /// Wraps `draft` and validates it for `mode`.
    pub fn new(mode: EditMode, draft: SurvivorDraft) -> Self {
        let errors = validate(&draft, mode);
        Self {
            mode,
            draft,
            errors,
        }
    }

    /// Create form pre-filled from the new-survivor template.
    pub fn create() -> Self {
        Self::new(EditMode::Create, SurvivorDraft::template())
    }

    /// Edit form seeded from `baseline`.
    pub fn edit(baseline: &Survivor) -> Self {
        Self::new(EditMode::Edit, SurvivorDraft::from_baseline(baseline))
    }

    /// Applies `change` and re-runs validation on the result.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotEditable` when an edit form is asked to change a field that a
    /// patch cannot carry (name, gender, birth), and `CoreError::SlotOutOfRange` for a bad
    /// disorder slot.
    pub fn apply(self, change: FieldChange) -> CoreResult<Self> {
        if self.mode == EditMode::Edit {
            match &change {
                FieldChange::Name(_) => return Err(CoreError::NotEditable("Name".into())),
                FieldChange::Gender(_) => return Err(CoreError::NotEditable("Gender".into())),
                FieldChange::Stat(stat, _) if !is_patchable(*stat) => {
                    return Err(CoreError::NotEditable(stat.label().to_owned()))
                }
                _ => {}
            }
        }
        let draft = self.draft.apply(change)?;
        Ok(Self::new(self.mode, draft))
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &SurvivorDraft {
        &self.draft
    }

    /// Errors for the current draft, refreshed on every change.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validation half of the submit gate; the in-flight half lives in
    /// [`SubmitGate`](crate::gate::SubmitGate).
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }

    /// Hands the draft on for submission.
    ///
    /// # Returns
    ///
    /// The [`ValidDraft`] if validation passed, otherwise the current errors.
    pub fn into_valid(self) -> Result<ValidDraft, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(ValidDraft {
                mode: self.mode,
                draft: self.draft,
            })
        } else {
            Err(self.errors)
        }
    }
}

/// A draft that passed validation for a given mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    mode: EditMode,
    draft: SurvivorDraft,
}

impl ValidDraft {
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Creation body for this draft.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::WrongMode` when the draft was validated for editing, since the name
    /// has not been checked in that case.
    pub fn create_request(&self, settlement_id: &str) -> CoreResult<NewSurvivor> {
        if self.mode != EditMode::Create {
            return Err(CoreError::WrongMode {
                expected: EditMode::Create,
                actual: self.mode,
            });
        }
        Ok(NewSurvivor::new(
            settlement_id,
            self.draft.name.trim(),
            self.draft.gender,
            &self.draft.stats,
            self.draft.disorders.collapse(),
        ))
    }

    /// Local stand-in record shown while a create is in flight.
    pub fn provisional_survivor(&self, settlement_id: &str) -> Survivor {
        Survivor {
            id: String::new(),
            settlement_id: settlement_id.to_owned(),
            name: self.draft.name.trim().to_owned(),
            gender: self.draft.gender,
            status: self.draft.status,
            stats: self.draft.stats,
            disorders: self.draft.disorders.collapse(),
        }
    }
}

impl Deref for ValidDraft {
    type Target = SurvivorDraft;

    fn deref(&self) -> &SurvivorDraft {
        &self.draft
    }
}

impl SurvivorSnapshot for ValidDraft {
    fn stat(&self, stat: Stat) -> i32 {
        self.draft.stat(stat)
    }

    fn status(&self) -> SurvivorStatus {
        self.draft.status
    }

    fn disorder_slots(&self) -> DisorderSlots {
        self.draft.disorders.clone()
    }
}
