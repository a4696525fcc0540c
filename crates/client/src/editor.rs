//! Submission orchestration for survivor and settlement editing sessions.
//!
//! Creates are optimistic: a provisional entry is shown at once and either committed with the
//! server record or rolled back. Edits are confirm-then-reload: nothing changes locally until
//! the server accepts the patch, after which the survivor list is fetched again.
//!
//! Each editor owns a [`SubmitGate`]; while one submission is in flight any other returns
//! [`EditOutcome::Busy`] without dispatching a request.

use crate::api::DatamonsterApi;
use crate::transport::Transport;
use crate::ClientResult;
use datamonster_core::{
    diff, Collection, CoreError, DraftForm, EditMode, NewSettlement, Settlement, SubmitGate,
    Survivor, SURVIVOR_EDIT_SPECS,
};
use datamonster_types::SettlementName;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How a submission ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome<E = Survivor> {
    /// The draft matched the baseline; nothing was sent.
    NoChanges,
    /// Another submission from this session is still in flight; nothing was sent.
    Busy,
    /// The server accepted the patch.
    Updated,
    /// The server created this record.
    Created(E),
}

fn lock<E>(collection: &Mutex<Collection<E>>) -> MutexGuard<'_, Collection<E>> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Editing session for the survivors of one settlement.
pub struct SurvivorEditor<'a, T> {
    api: &'a DatamonsterApi<T>,
    settlement_id: String,
    survivors: Mutex<Collection<Survivor>>,
    gate: SubmitGate,
}

impl<'a, T: Transport> SurvivorEditor<'a, T> {
    /// Creates an editor with an empty survivor list.
    pub fn new(api: &'a DatamonsterApi<T>, settlement_id: impl Into<String>) -> Self {
        Self::with_survivors(api, settlement_id, Vec::new())
    }

    /// Creates an editor seeded with survivors already fetched from the server.
    ///
    /// # Arguments
    ///
    /// * `api` - Client used for every submission and reload
    /// * `settlement_id` - Settlement the survivors belong to
    /// * `survivors` - Confirmed records, in display order
    pub fn with_survivors(
        api: &'a DatamonsterApi<T>,
        settlement_id: impl Into<String>,
        survivors: Vec<Survivor>,
    ) -> Self {
        Self {
            api,
            settlement_id: settlement_id.into(),
            survivors: Mutex::new(Collection::from_server(survivors)),
            gate: SubmitGate::new(),
        }
    }

    /// Opens a session seeded with the settlement's current survivors.
    pub async fn load(api: &'a DatamonsterApi<T>, settlement_id: &str) -> ClientResult<Self> {
        let survivors = api.list_survivors(settlement_id).await?;
        Ok(Self::with_survivors(api, settlement_id, survivors))
    }

    pub fn settlement_id(&self) -> &str {
        &self.settlement_id
    }

    /// Copy of the current list, pending entries included.
    pub fn survivors(&self) -> Collection<Survivor> {
        lock(&self.survivors).clone()
    }

    /// Confirmed survivor with the given id.
    pub fn survivor(&self, id: &str) -> Option<Survivor> {
        lock(&self.survivors).get(id).cloned()
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.gate.is_in_flight()
    }

    /// Replaces the local list with the server's, pending entries included.
    ///
    /// # Errors
    ///
    /// Any error from [`DatamonsterApi::list_survivors`]; the local list is left as it was.
    pub async fn reload(&self) -> ClientResult<()> {
        let fresh = self.api.list_survivors(&self.settlement_id).await?;
        lock(&self.survivors).replace_all(fresh);
        Ok(())
    }

    /// Submits an edit of `baseline`.
    ///
    /// Only fields that differ from `baseline` are sent. On success the survivor list is
    /// reloaded; on failure nothing local changes and the form can be submitted again.
    ///
    /// Once the server has accepted the patch the outcome is [`EditOutcome::Updated`] even if
    /// the reload fails; the local list then keeps its previous contents until the next
    /// successful [`reload`](Self::reload).
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` if the form has errors, `ClientError::Core` if it is not an
    /// edit form, and any transport or server error from the patch.
    pub async fn submit_edit(
        &self,
        baseline: &Survivor,
        form: DraftForm,
    ) -> ClientResult<EditOutcome> {
        let draft = form.into_valid()?;
        if draft.mode() != EditMode::Edit {
            return Err(CoreError::WrongMode {
                expected: EditMode::Edit,
                actual: draft.mode(),
            }
            .into());
        }

        let Some(_in_flight) = self.gate.try_begin() else {
            tracing::debug!("edit of survivor {} ignored: submission in flight", baseline.id);
            return Ok(EditOutcome::Busy);
        };

        let patch = diff(baseline, &draft, &SURVIVOR_EDIT_SPECS);
        if patch.is_empty() {
            tracing::debug!("edit of survivor {} has no changes", baseline.id);
            return Ok(EditOutcome::NoChanges);
        }

        tracing::info!("updating survivor {} in settlement {}", baseline.id, self.settlement_id);
        tracing::debug!("patch: {:?}", patch);
        if let Err(e) = self
            .api
            .update_survivor(&self.settlement_id, &baseline.id, &patch)
            .await
        {
            tracing::warn!("update of survivor {} failed: {}", baseline.id, e);
            return Err(e);
        }

        tracing::info!("survivor {} updated", baseline.id);
        if let Err(e) = self.reload().await {
            tracing::warn!("survivor {} saved but reload failed: {}", baseline.id, e);
        }
        Ok(EditOutcome::Updated)
    }

    /// Submits a new survivor.
    ///
    /// A provisional entry is added before the request is sent and is replaced by the
    /// server's record on success or removed again on failure.
    ///
    /// # Returns
    ///
    /// [`EditOutcome::Created`] with the server's record, or [`EditOutcome::Busy`] if another
    /// submission is in flight.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` if the form has errors, `ClientError::Core` if it is not a
    /// create form, and any transport or server error from the create call. The list is
    /// restored before the error is returned.
    pub async fn submit_create(&self, form: DraftForm) -> ClientResult<EditOutcome> {
        let draft = form.into_valid()?;
        let request = draft.create_request(&self.settlement_id)?;

        let Some(_in_flight) = self.gate.try_begin() else {
            tracing::debug!("create in settlement {} ignored: submission in flight", self.settlement_id);
            return Ok(EditOutcome::Busy);
        };

        let temp_id =
            lock(&self.survivors).apply_optimistic(draft.provisional_survivor(&self.settlement_id));
        tracing::info!("creating survivor {:?} as {}", request.name, temp_id);

        match self.api.create_survivor(&request).await {
            Ok(created) => {
                lock(&self.survivors).commit(temp_id, created.clone());
                tracing::info!("survivor {} created", created.id);
                Ok(EditOutcome::Created(created))
            }
            Err(e) => {
                lock(&self.survivors).rollback(temp_id);
                tracing::warn!("create of survivor {:?} failed: {}", request.name, e);
                Err(e)
            }
        }
    }
}

/// Editing session for the settlement list.
pub struct SettlementEditor<'a, T> {
    api: &'a DatamonsterApi<T>,
    settlements: Mutex<Collection<Settlement>>,
    gate: SubmitGate,
}

impl<'a, T: Transport> SettlementEditor<'a, T> {
    /// Creates an editor with an empty settlement list.
    pub fn new(api: &'a DatamonsterApi<T>) -> Self {
        Self::with_settlements(api, Vec::new())
    }

    /// Creates an editor seeded with settlements already fetched from the server.
    pub fn with_settlements(api: &'a DatamonsterApi<T>, settlements: Vec<Settlement>) -> Self {
        Self {
            api,
            settlements: Mutex::new(Collection::from_server(settlements)),
            gate: SubmitGate::new(),
        }
    }

    /// Opens a session seeded with the current settlement list.
    pub async fn load(api: &'a DatamonsterApi<T>) -> ClientResult<Self> {
        let settlements = api.list_settlements().await?;
        Ok(Self::with_settlements(api, settlements))
    }

    /// Copy of the current list, pending entries included.
    pub fn settlements(&self) -> Collection<Settlement> {
        lock(&self.settlements).clone()
    }

    /// Replaces the local list with the server's.
    pub async fn reload(&self) -> ClientResult<()> {
        let fresh = self.api.list_settlements().await?;
        lock(&self.settlements).replace_all(fresh);
        Ok(())
    }

    /// Creates a settlement optimistically.
    ///
    /// The provisional entry is committed with the server's record or rolled back on failure.
    pub async fn create(&self, name: SettlementName) -> ClientResult<EditOutcome<Settlement>> {
        let Some(_in_flight) = self.gate.try_begin() else {
            return Ok(EditOutcome::Busy);
        };

        let temp_id = lock(&self.settlements).apply_optimistic(Settlement::provisional(&name));
        tracing::info!("creating settlement {:?} as {}", name.as_str(), temp_id);

        match self.api.create_settlement(&NewSettlement { name }).await {
            Ok(created) => {
                lock(&self.settlements).commit(temp_id, created.clone());
                tracing::info!("settlement {} created", created.id);
                Ok(EditOutcome::Created(created))
            }
            Err(e) => {
                lock(&self.settlements).rollback(temp_id);
                tracing::warn!("create of settlement failed: {}", e);
                Err(e)
            }
        }
    }
}
