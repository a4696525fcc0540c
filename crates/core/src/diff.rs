//! Survivor diff engine.
//!
//! Computes the smallest [`PatchPayload`] that turns a baseline into a draft. An empty payload
//! means there is nothing to send and the edit can be closed as-is.
//!
//! ## Disorders
//! Slots are compared by membership, not position: `[A, -, B]` and `[B, A, -]` hold the same
//! disorders and produce no patch. When membership does change, the collapsed draft list (slot
//! order, empties removed) is sent whole, and an empty list clears every slot.

use crate::field::FieldSpec;
use crate::survivor::{SurvivorSnapshot, SurvivorStatus};
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse update body for `PATCH /api/settlements/{settlementId}/survivors/{survivorId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPayload {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stat_updates: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_update: Option<SurvivorStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disorders: Option<Vec<String>>,
}

impl PatchPayload {
    /// `true` when nothing changed; such a patch is never sent.
    pub fn is_empty(&self) -> bool {
        self.stat_updates.is_empty() && self.status_update.is_none() && self.disorders.is_none()
    }

    /// Request body for the PATCH call. Absent sections are omitted, not sent as `null`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if serde rejects the payload.
    pub fn to_json(&self) -> CoreResult<serde_json::Value> {
        serde_json::to_value(self).map_err(CoreError::Serialization)
    }
}

/// Diffs `draft` against `baseline` over the numeric fields in `specs`, the status and the
/// disorder slots.
///
/// # Panics
/// In debug builds, if `specs` names the same stat twice.
pub fn diff<B, D>(baseline: &B, draft: &D, specs: &[FieldSpec]) -> PatchPayload
where
    B: SurvivorSnapshot + ?Sized,
    D: SurvivorSnapshot + ?Sized,
{
    debug_assert!(
        specs
            .iter()
            .enumerate()
            .all(|(i, spec)| specs[..i].iter().all(|earlier| earlier.stat != spec.stat)),
        "field specs must not repeat a stat"
    );

    let stat_updates = specs
        .iter()
        .filter_map(|spec| {
            let value = draft.stat(spec.stat);
            (value != baseline.stat(spec.stat)).then(|| (spec.wire_key().to_owned(), value))
        })
        .collect();

    let status_update = (draft.status() != baseline.status()).then(|| draft.status());

    let before = baseline.disorder_slots();
    let after = draft.disorder_slots();
    let disorders = (!after.same_members(&before)).then(|| after.collapse());

    PatchPayload {
        stat_updates,
        status_update,
        disorders,
    }
}
