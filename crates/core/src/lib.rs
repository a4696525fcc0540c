//! # Datamonster Core
//!
//! Domain logic for editing settlements and survivors:
//! - Survivor and settlement models matching the settlement API's JSON
//! - Draft form state with validation re-run on every change
//! - The diff engine that turns a validated draft into a minimal patch
//! - Optimistic reconciliation of locally held collections
//! - The submit gate that keeps one request in flight per session
//!
//! **No I/O**: HTTP transport, sessions and configuration belong in `datamonster-client`.

pub mod constants;
pub mod diff;
pub mod draft;
pub mod error;
pub mod field;
pub mod gate;
pub mod glossary;
pub mod reconcile;
pub mod settlement;
pub mod survivor;
pub mod validation;

pub use constants::DISORDER_SLOTS;
pub use diff::{diff, PatchPayload};
pub use draft::{DisorderSlots, DraftForm, EditMode, FieldChange, SurvivorDraft, ValidDraft};
pub use error::{CoreError, CoreResult};
pub use field::{FieldSpec, SURVIVOR_EDIT_SPECS};
pub use gate::{InFlight, SubmitGate};
pub use glossary::{Disorder, FightingArt, Glossary};
pub use reconcile::{Collection, CommitResult, Entry, Keyed, TempId};
pub use settlement::{NewSettlement, Settlement};
pub use survivor::{Gender, NewSurvivor, Stat, StatBlock, Survivor, SurvivorSnapshot, SurvivorStatus};
pub use validation::{validate, ValidationErrors};
