use crate::id::{AccountId, AssetId, BasketId};
use crate::token_list::TokenList;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a basket
///
/// A basket starts `Open`, alternates between `Open` and `Closed` under the
/// cooldown rules, and ends `Burned`. `Burned` is terminal: the record is kept
/// for state queries but no further mutation is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasketState {
    /// Contents may be mutated; the basket cannot be transferred
    Open,
    /// Contents are frozen; the basket may be transferred or burned
    Closed,
    /// Terminal state after burn
    Burned,
}

impl BasketState {
    pub fn is_open(&self) -> bool {
        matches!(self, BasketState::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, BasketState::Closed)
    }

    pub fn is_burned(&self) -> bool {
        matches!(self, BasketState::Burned)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            BasketState::Open => "open",
            BasketState::Closed => "closed",
            BasketState::Burned => "burned",
        }
    }
}

impl fmt::Display for BasketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One externally-held asset referenced by a basket
///
/// `list_ptr` caches the entry's index within its basket's token arena. It is
/// not independent truth: every swap-delete updates it so that it always
/// equals the entry's actual position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    /// Account of the external registry that holds the asset
    pub asset_source: AccountId,

    /// Identifier of the asset within its registry
    pub asset_id: AssetId,

    /// Cached index of this entry in the basket's token arena
    pub list_ptr: usize,
}

/// A single basket record
///
/// Owned exclusively by the registry; callers only ever see shared views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Registry-allocated identifier
    pub(crate) id: BasketId,

    /// Current holder
    pub(crate) owner: AccountId,

    /// Lifecycle state
    pub(crate) state: BasketState,

    /// Unix seconds of creation or the last open transition; the close
    /// cooldown is measured from here
    pub(crate) opened_at: u64,

    /// Opaque metadata reference supplied at mint (URI fragment)
    pub(crate) metadata_ref: String,

    /// Referenced external assets
    pub(crate) tokens: TokenList,
}

impl Basket {
    /// Create a freshly minted basket in the `Open` state
    pub(crate) fn new(id: BasketId, owner: AccountId, opened_at: u64, metadata_ref: String) -> Self {
        Self {
            id,
            owner,
            state: BasketState::Open,
            opened_at,
            metadata_ref,
            tokens: TokenList::new(),
        }
    }

    pub fn id(&self) -> BasketId {
        self.id
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn state(&self) -> BasketState {
        self.state
    }

    /// Unix seconds of creation or the last open transition
    pub fn opened_at(&self) -> u64 {
        self.opened_at
    }

    pub fn metadata_ref(&self) -> &str {
        &self.metadata_ref
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Whether the basket references the given asset
    pub fn references(&self, source: &AccountId, asset_id: AssetId) -> bool {
        self.tokens.contains(source, asset_id)
    }
}
