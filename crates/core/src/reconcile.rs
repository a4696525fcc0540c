//! Optimistic reconciliation of locally held collections.
//!
//! Creates are shown immediately: [`Collection::apply_optimistic`] appends a pending entry under
//! a client-generated [`TempId`]. When the server answers, [`Collection::commit`] swaps in the
//! authoritative record, or [`Collection::rollback`] removes the entry again.
//!
//! Edits take the other path: nothing is changed locally until the server confirms, after which
//! the caller reloads and hands the fresh list to [`Collection::replace_all`]. A reload always
//! wins over local state, pending entries included.

use std::fmt;
use uuid::Uuid;

/// Entities addressable by their server identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Client-generated placeholder identifier for an entity the server has not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempId(Uuid);

impl TempId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TempId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending-{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<E> {
    Confirmed(E),
    Pending { temp_id: TempId, entity: E },
}

impl<E> Entry<E> {
    pub fn entity(&self) -> &E {
        match self {
            Entry::Confirmed(entity) | Entry::Pending { entity, .. } => entity,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Entry::Pending { .. })
    }

    fn has_temp_id(&self, id: TempId) -> bool {
        matches!(self, Entry::Pending { temp_id, .. } if *temp_id == id)
    }
}

/// What [`Collection::commit`] did with the server record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    /// The pending entry was replaced in place.
    Replaced,
    /// The pending entry was gone (a reload ran in between) and the record was appended.
    Appended,
    /// The pending entry was gone and a reload already delivered the record.
    AlreadyPresent,
}

/// An ordered, in-memory list of entities, some of which may be awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<E> {
    entries: Vec<Entry<E>>,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Keyed> Collection<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection holding exactly what the server returned.
    pub fn from_server(entities: Vec<E>) -> Self {
        Self {
            entries: entities.into_iter().map(Entry::Confirmed).collect(),
        }
    }

    /// Number of entries, pending ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order with their confirmation state.
    pub fn entries(&self) -> &[Entry<E>] {
        &self.entries
    }

    /// All entities in display order, pending ones included.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(Entry::entity)
    }

    /// Confirmed entity with the given server id.
    pub fn get(&self, key: &str) -> Option<&E> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Confirmed(entity) if entity.key() == key => Some(entity),
            _ => None,
        })
    }

    /// Entity still waiting for confirmation under `temp_id`.
    pub fn pending(&self, temp_id: TempId) -> Option<&E> {
        self.entries
            .iter()
            .find(|entry| entry.has_temp_id(temp_id))
            .map(Entry::entity)
    }

    /// Number of entries the server has not confirmed yet.
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Appends `entity` as pending.
    ///
    /// # Arguments
    ///
    /// * `entity` - Locally built stand-in; its own id is ignored while pending
    ///
    /// # Returns
    ///
    /// The temporary id to pass to [`commit`](Self::commit) or [`rollback`](Self::rollback).
    pub fn apply_optimistic(&mut self, entity: E) -> TempId {
        let temp_id = TempId::new();
        self.entries.push(Entry::Pending { temp_id, entity });
        tracing::debug!("optimistic entry {} added", temp_id);
        temp_id
    }

    /// Replaces the pending entry `temp_id` with the server's record.
    ///
    /// If a reload already dropped the pending entry, the record is appended unless an entry
    /// with the same server id is present.
    ///
    /// # Returns
    ///
    /// Which of those three cases applied.
    pub fn commit(&mut self, temp_id: TempId, server_entity: E) -> CommitResult {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.has_temp_id(temp_id)) {
            *entry = Entry::Confirmed(server_entity);
            return CommitResult::Replaced;
        }

        if self.get(server_entity.key()).is_some() {
            tracing::debug!("commit {}: record already present after reload", temp_id);
            return CommitResult::AlreadyPresent;
        }

        tracing::debug!("commit {}: pending entry missing, appending record", temp_id);
        self.entries.push(Entry::Confirmed(server_entity));
        CommitResult::Appended
    }

    /// Removes the pending entry `temp_id`, returning the discarded entity if it was present.
    pub fn rollback(&mut self, temp_id: TempId) -> Option<E> {
        let index = self.entries.iter().position(|e| e.has_temp_id(temp_id))?;
        tracing::debug!("optimistic entry {} rolled back", temp_id);
        Some(match self.entries.remove(index) {
            Entry::Confirmed(entity) | Entry::Pending { entity, .. } => entity,
        })
    }

    /// Overwrites everything with a fresh server listing.
    pub fn replace_all(&mut self, entities: Vec<E>) {
        let dropped = self.pending_count();
        if dropped > 0 {
            tracing::debug!("reload discarded {} pending entries", dropped);
        }
        *self = Self::from_server(entities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        id: String,
        label: &'static str,
    }

    impl Keyed for Item {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, label: &'static str) -> Item {
        Item {
            id: id.to_owned(),
            label,
        }
    }

    fn seeded() -> Collection<Item> {
        Collection::from_server(vec![item("1", "first"), item("2", "second")])
    }

    #[test]
    fn test_optimistic_entry_is_visible_immediately() {
        let mut collection = seeded();
        let temp = collection.apply_optimistic(item("", "new"));

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.pending(temp).map(|i| i.label), Some("new"));
        assert_eq!(collection.pending_count(), 1);
    }

    #[test]
    fn test_commit_replaces_pending_with_server_record() {
        let mut collection = seeded();
        let temp = collection.apply_optimistic(item("", "new"));

        let result = collection.commit(temp, item("3", "new"));

        assert_eq!(result, CommitResult::Replaced);
        assert_eq!(collection.len(), 3);
        assert!(collection.pending(temp).is_none());
        assert_eq!(collection.pending_count(), 0);
        assert_eq!(collection.iter().filter(|i| i.id == "3").count(), 1);
        assert_eq!(collection.iter().last().map(|i| i.id.as_str()), Some("3"));
    }

    #[test]
    fn test_rollback_restores_previous_contents() {
        let mut collection = seeded();
        let before = collection.clone();

        let temp = collection.apply_optimistic(item("", "doomed"));
        let removed = collection.rollback(temp);

        assert_eq!(removed.map(|i| i.label), Some("doomed"));
        assert_eq!(collection, before);
    }

    #[test]
    fn test_rollback_of_unknown_id_is_a_noop() {
        let mut collection = seeded();
        assert!(collection.rollback(TempId::new()).is_none());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_rollback_only_touches_its_own_entry() {
        let mut collection = seeded();
        let keep = collection.apply_optimistic(item("", "keep"));
        let drop = collection.apply_optimistic(item("", "drop"));

        collection.rollback(drop);

        assert!(collection.pending(keep).is_some());
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_reload_overwrites_pending_entries() {
        let mut collection = seeded();
        let temp = collection.apply_optimistic(item("", "new"));

        collection.replace_all(vec![item("1", "first")]);

        assert_eq!(collection.len(), 1);
        assert!(collection.pending(temp).is_none());
    }

    #[test]
    fn test_commit_after_reload_that_included_record() {
        let mut collection = seeded();
        let temp = collection.apply_optimistic(item("", "new"));
        collection.replace_all(vec![item("1", "first"), item("3", "new")]);

        assert_eq!(
            collection.commit(temp, item("3", "new")),
            CommitResult::AlreadyPresent
        );
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_commit_after_reload_that_missed_record() {
        let mut collection = seeded();
        let temp = collection.apply_optimistic(item("", "new"));
        collection.replace_all(vec![item("1", "first")]);

        assert_eq!(collection.commit(temp, item("3", "new")), CommitResult::Appended);
        assert!(collection.get("3").is_some());
    }

    #[test]
    fn test_get_ignores_pending_entries() {
        let mut collection = Collection::new();
        collection.apply_optimistic(item("9", "pending"));
        assert!(collection.get("9").is_none());
    }

    #[test]
    fn test_temp_id_display() {
        let text = TempId::new().to_string();
        assert!(text.starts_with("pending-"));
        assert_eq!(text.len(), "pending-".len() + 32);
    }
}
