use crate::id::{AccountId, AssetId, BasketId};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Lifecycle notification emitted after an operation commits
///
/// Events are observational only: indexers and UIs consume them, the core
/// never reads them back. Each carries the accounts an observer needs to
/// attribute the change without replaying registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// A basket was created
    Minted {
        basket: BasketId,
        to: AccountId,
        metadata_ref: String,
    },
    /// A closed basket was reopened
    Opened { basket: BasketId, owner: AccountId },
    /// An open basket was closed
    Closed { basket: BasketId, owner: AccountId },
    /// A basket reached its terminal state
    Burned { basket: BasketId, owner: AccountId },
    /// An asset reference was appended to a basket
    AssetAdded {
        basket: BasketId,
        source: AccountId,
        asset_id: AssetId,
        owner: AccountId,
    },
    /// Custody of an asset landed with the registry
    AssetReceived {
        source: AccountId,
        asset_id: AssetId,
        from: AccountId,
    },
    /// An asset reference was removed and custody returned to the owner
    AssetRemoved {
        basket: BasketId,
        source: AccountId,
        asset_id: AssetId,
        owner: AccountId,
    },
    /// A basket changed hands
    OwnershipTransferred {
        basket: BasketId,
        from: AccountId,
        to: AccountId,
    },
    /// The single-basket transfer approval changed
    ApprovalChanged {
        basket: BasketId,
        owner: AccountId,
        approved: Option<AccountId>,
    },
    /// An operator grant over an owner's whole portfolio changed
    OperatorApprovalChanged {
        owner: AccountId,
        operator: AccountId,
        approved: bool,
    },
}

/// Consumer of lifecycle notifications
///
/// Publishing happens strictly after the operation's state mutations commit,
/// so a sink never observes state that a failed operation rolled back.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: LifecycleEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: LifecycleEvent) {}
}

/// In-memory sink that records events in publish order
///
/// Useful in tests and for embedders that drain notifications in batches.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Drain the log, returning the recorded events
    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.lock().expect("event log poisoned"))
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("event log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemoryEventLog {
    fn publish(&self, event: LifecycleEvent) {
        self.events.lock().expect("event log poisoned").push(event);
    }
}
