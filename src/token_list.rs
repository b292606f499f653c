use crate::basket::TokenRef;
use crate::id::{AccountId, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-basket arena of asset references
///
/// A contiguous growable array plus a reverse index from
/// `(asset_source, asset_id)` to position. Append and removal are both O(1);
/// removal is swap-delete, so it does not preserve insertion order. The
/// structural invariant is that every entry's cached `list_ptr` equals its
/// actual index and the reverse index holds exactly the live entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenList {
    entries: Vec<TokenRef>,
    index: HashMap<(AccountId, AssetId), usize>,
}

/// Record of one swap-delete, with enough information to undo it exactly
#[derive(Debug, Clone)]
pub(crate) struct SwapRemoval {
    /// The removed entry, `list_ptr` still naming the slot it occupied
    pub(crate) removed: TokenRef,
    /// Whether the former tail entry was relocated into the freed slot
    moved_tail: bool,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of the arena
    pub fn entries(&self) -> &[TokenRef] {
        &self.entries
    }

    /// Whether the arena holds the given asset reference
    pub fn contains(&self, source: &AccountId, asset_id: AssetId) -> bool {
        self.index.contains_key(&(*source, asset_id))
    }

    /// Current position of the given asset reference, if present
    pub fn position(&self, source: &AccountId, asset_id: AssetId) -> Option<usize> {
        self.index.get(&(*source, asset_id)).copied()
    }

    /// Append a new reference at the tail; returns its position
    ///
    /// The caller guarantees the key is not already present (the registry
    /// rejects duplicate adds upstream, at the custody-ownership check).
    pub(crate) fn push(&mut self, source: AccountId, asset_id: AssetId) -> usize {
        debug_assert!(!self.contains(&source, asset_id));
        let ptr = self.entries.len();
        self.entries.push(TokenRef {
            asset_source: source,
            asset_id,
            list_ptr: ptr,
        });
        self.index.insert((source, asset_id), ptr);
        ptr
    }

    /// Undo the most recent `push` of the given key
    pub(crate) fn undo_push(&mut self, source: &AccountId, asset_id: AssetId) {
        let tail = self.entries.pop();
        debug_assert!(matches!(
            tail,
            Some(ref t) if t.asset_source == *source && t.asset_id == asset_id
        ));
        let _ = tail;
        self.index.remove(&(*source, asset_id));
    }

    /// Swap-delete the given reference
    ///
    /// Overwrites the freed slot with the tail entry (updating the moved
    /// entry's cached pointer in both the arena and the reverse index),
    /// truncates, and drops the removed key. Returns `None` if the key is
    /// absent.
    pub(crate) fn swap_remove(
        &mut self,
        source: &AccountId,
        asset_id: AssetId,
    ) -> Option<SwapRemoval> {
        let ptr = self.index.remove(&(*source, asset_id))?;
        let last = self.entries.len() - 1;

        let removed = self.entries[ptr];
        let moved_tail = ptr != last;
        if moved_tail {
            let mut moved = self.entries[last];
            moved.list_ptr = ptr;
            self.entries[ptr] = moved;
            self.index
                .insert((moved.asset_source, moved.asset_id), ptr);
        }
        self.entries.truncate(last);

        Some(SwapRemoval { removed, moved_tail })
    }

    /// Restore the arena to its exact layout before a `swap_remove`
    pub(crate) fn undo_swap_remove(&mut self, removal: SwapRemoval) {
        let SwapRemoval { removed, moved_tail } = removal;
        let tail = self.entries.len();

        if moved_tail {
            // The entry now sitting in the freed slot was the old tail; send
            // it back and put the removed entry where it was.
            let mut moved = self.entries[removed.list_ptr];
            moved.list_ptr = tail;
            self.entries.push(moved);
            self.index
                .insert((moved.asset_source, moved.asset_id), tail);

            self.entries[removed.list_ptr] = removed;
        } else {
            debug_assert_eq!(removed.list_ptr, tail);
            self.entries.push(removed);
        }
        self.index
            .insert((removed.asset_source, removed.asset_id), removed.list_ptr);
    }

    /// Assert the pointer-cache and reverse-index invariants hold
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.index.len());
        for (i, entry) in self.entries.iter().enumerate() {
            assert_eq!(entry.list_ptr, i, "cached pointer must equal index");
            assert_eq!(
                self.index.get(&(entry.asset_source, entry.asset_id)),
                Some(&i),
                "reverse index must agree with the arena"
            );
        }
    }
}
