use crate::id::{AccountId, BasketId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Baskets currently held by one address
///
/// Same arena shape as the token list: ordered ids plus a reverse map so that
/// removal is swap-delete in O(1). Order is not stable across removals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OwnerRecord {
    ids: Vec<BasketId>,
    pos: HashMap<BasketId, usize>,
}

impl OwnerRecord {
    fn append(&mut self, id: BasketId) {
        debug_assert!(!self.pos.contains_key(&id));
        self.pos.insert(id, self.ids.len());
        self.ids.push(id);
    }

    fn swap_remove(&mut self, id: BasketId) -> bool {
        let Some(ptr) = self.pos.remove(&id) else {
            return false;
        };
        let last = self.ids.len() - 1;
        if ptr != last {
            let moved = self.ids[last];
            self.ids[ptr] = moved;
            self.pos.insert(moved, ptr);
        }
        self.ids.truncate(last);
        true
    }
}

/// Registry-wide index from owner to held baskets
///
/// A basket id appears in exactly one owner's record at a time; the registry
/// moves it between records on transfer and drops it on burn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerIndex {
    records: HashMap<AccountId, OwnerRecord>,
}

impl OwnerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `owner` now holds `id`
    pub(crate) fn append(&mut self, owner: AccountId, id: BasketId) {
        self.records.entry(owner).or_default().append(id);
    }

    /// Record that `owner` no longer holds `id`; returns false if it never did
    pub(crate) fn remove(&mut self, owner: &AccountId, id: BasketId) -> bool {
        let Some(record) = self.records.get_mut(owner) else {
            return false;
        };
        let removed = record.swap_remove(id);
        if record.ids.is_empty() {
            self.records.remove(owner);
        }
        removed
    }

    /// Ids of the baskets `owner` currently holds
    ///
    /// Order reflects append and swap-delete history, nothing more.
    pub fn baskets_of(&self, owner: &AccountId) -> &[BasketId] {
        self.records
            .get(owner)
            .map(|r| r.ids.as_slice())
            .unwrap_or(&[])
    }

    /// Number of baskets `owner` currently holds
    pub fn count_of(&self, owner: &AccountId) -> usize {
        self.records.get(owner).map(|r| r.ids.len()).unwrap_or(0)
    }

    /// Assert the pointer-cache invariant holds for every record
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for record in self.records.values() {
            assert!(!record.ids.is_empty(), "empty records must be dropped");
            assert_eq!(record.ids.len(), record.pos.len());
            for (i, id) in record.ids.iter().enumerate() {
                assert_eq!(record.pos.get(id), Some(&i));
            }
        }
    }
}
