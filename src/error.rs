use crate::id::{AccountId, AssetId, BasketId};
use thiserror::Error;

/// Reason an external asset was rejected by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRejection {
    /// The asset source is the zero account or the registry itself
    ZeroOrRegistry,
    /// The asset source does not satisfy the required capability contract
    Unsupported,
    /// The asset source does not know the asset
    NotFound,
    /// The asset is not held by the account the operation expects
    WrongHolder,
    /// The registry is not approved to take custody of the asset
    CustodyNotApproved,
}

impl std::fmt::Display for AssetRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            AssetRejection::ZeroOrRegistry => "source is zero or the registry itself",
            AssetRejection::Unsupported => "source does not support custody transfer",
            AssetRejection::NotFound => "asset not found at source",
            AssetRejection::WrongHolder => "asset not held by the expected account",
            AssetRejection::CustodyNotApproved => "registry not approved for custody",
        };
        write!(f, "{}", reason)
    }
}

/// Represents all possible errors reported by the basket registry
///
/// Every variant is a well-defined rejection of a specific precondition and
/// carries the ids needed to act on it. Nothing is retried internally; a
/// failed operation leaves no partial effects behind.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The basket id is unknown, or names a burned basket queried as if live
    #[error("{0} does not exist")]
    NotFound(BasketId),

    /// The operation is invalid for the basket's current lifecycle state
    #[error("{basket} is {actual}, operation requires {required}")]
    WrongState {
        basket: BasketId,
        required: &'static str,
        actual: &'static str,
    },

    /// The caller does not own the basket
    #[error("{caller} is not the owner of {basket}")]
    NotOwner { basket: BasketId, caller: AccountId },

    /// The caller holds no authorization for the attempted operation
    #[error("{caller} is not authorized for {basket}")]
    NotAuthorized { basket: BasketId, caller: AccountId },

    /// The caller may not mint baskets
    #[error("{0} is not an authorized minter")]
    NotMinter(AccountId),

    /// The external asset failed a precondition of `add`
    #[error("asset {asset_id} at {source_account}: {reason}")]
    InvalidAsset {
        source_account: AccountId,
        asset_id: AssetId,
        reason: AssetRejection,
    },

    /// The (source, asset) pair is not referenced by the basket
    #[error("asset {asset_id} at {source_account} is not in {basket}")]
    TokenNotInBasket {
        basket: BasketId,
        source_account: AccountId,
        asset_id: AssetId,
    },

    /// Removal was attempted on a basket that references no assets
    #[error("{0} is empty")]
    BasketEmpty(BasketId),

    /// Burn was attempted while the basket still references assets
    #[error("{basket} still references {remaining} asset(s)")]
    BasketNotEmpty { basket: BasketId, remaining: usize },

    /// Close was attempted before the open cooldown elapsed
    #[error("{basket} cooldown not elapsed, {remaining}s remaining")]
    CooldownNotElapsed { basket: BasketId, remaining: u64 },

    /// A transfer-class operation was attempted while the owner still holds
    /// at least one basket that is not closed
    #[error("not all baskets of {owner} are closed ({open_basket} is open)")]
    NotAllClosed {
        owner: AccountId,
        open_basket: BasketId,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Anyhow error wrapper for error context
    #[error(transparent)]
    Context(#[from] anyhow::Error),
}

impl From<bincode::Error> for RegistryError {
    fn from(err: bincode::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
