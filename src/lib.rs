//! Custody registry for composite digital asset baskets.
//!
//! A basket is itself a transferable token that references assets held by
//! external registries. The crate provides the basket lifecycle state machine
//! (open / closed / burned with a close cooldown), O(1) swap-delete index
//! management for basket contents and per-owner holdings, and the transfer
//! gate that requires an owner's whole portfolio to be closed before any
//! ownership-changing operation.

pub mod basket;
pub mod clock;
pub mod config;
pub mod custody;
pub mod error;
pub mod events;
pub mod id;
pub mod mock;
pub mod owner_index;
pub mod registry;
pub mod token_list;

// Re-export the main types for convenience
pub use basket::{Basket, BasketState, TokenRef};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use custody::{AssetCapability, AssetCustody, CustodyError, MintAuthority, OpenMintPolicy};
pub use error::{AssetRejection, RegistryError};
pub use events::{EventSink, LifecycleEvent, MemoryEventLog, NullSink};
pub use id::{AccountId, AssetId, BasketId};
pub use owner_index::OwnerIndex;
pub use registry::BasketRegistry;
pub use token_list::TokenList;
