use crate::id::{AccountId, AssetId};
use thiserror::Error;

/// Capability the registry requires of an external asset source before it
/// will reference assets held there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCapability {
    /// The source can report ownership and honor custody transfers
    Transfer,
}

/// Errors reported by an external asset custody collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// The asset does not exist at the source
    #[error("asset {asset_id} not found at {source_account}")]
    AssetNotFound {
        source_account: AccountId,
        asset_id: AssetId,
    },

    /// The `from` account of a custody transfer does not own the asset
    #[error("asset {asset_id} at {source_account} is not owned by {holder}")]
    NotOwnerOfAsset {
        source_account: AccountId,
        asset_id: AssetId,
        holder: AccountId,
    },

    /// The custodian is not approved to move the asset
    #[error("{custodian} is not approved to move asset {asset_id} at {source_account}")]
    NotApprovedForCustody {
        source_account: AccountId,
        asset_id: AssetId,
        custodian: AccountId,
    },
}

/// External asset custody collaborator
///
/// The registry never mutates external asset state directly: it queries
/// ownership and capabilities through this trait and requests custody
/// hand-offs through `transfer_custody`. Implementations are expected to be
/// interior-mutable, since the registry holds them behind a shared handle.
pub trait AssetCustody: Send + Sync {
    /// Probe whether an asset source satisfies a capability contract
    ///
    /// # Parameters
    /// * `source` - The account of the external asset registry
    /// * `capability` - The contract the registry requires
    ///
    /// # Returns
    /// * `true` - The source implements the capability
    /// * `false` - The source is unknown or does not implement it
    fn supports(&self, source: &AccountId, capability: AssetCapability) -> bool;

    /// Report the current owner of an asset
    ///
    /// # Parameters
    /// * `source` - The account of the external asset registry
    /// * `asset_id` - The asset within that registry
    ///
    /// # Returns
    /// * `Ok(owner)` - The asset exists and is held by `owner`
    /// * `Err(AssetNotFound)` - The source does not know the asset
    fn asset_owner(&self, source: &AccountId, asset_id: AssetId)
        -> Result<AccountId, CustodyError>;

    /// Check whether `custodian` may move the asset on its owner's behalf
    ///
    /// # Parameters
    /// * `source` - The account of the external asset registry
    /// * `asset_id` - The asset within that registry
    /// * `custodian` - The account asking to move the asset
    ///
    /// # Returns
    /// * `Ok(true)` - The custodian is approved
    /// * `Ok(false)` - The custodian is not approved
    /// * `Err(AssetNotFound)` - The source does not know the asset
    fn is_custody_approved(
        &self,
        source: &AccountId,
        asset_id: AssetId,
        custodian: &AccountId,
    ) -> Result<bool, CustodyError>;

    /// Hand custody of an asset from one account to another
    ///
    /// # Parameters
    /// * `source` - The account of the external asset registry
    /// * `asset_id` - The asset within that registry
    /// * `from` - The account custody moves away from
    /// * `to` - The account custody moves to
    ///
    /// # Returns
    /// * `Ok(())` - Custody changed hands
    /// * `Err` - The asset is unknown, `from` does not hold it, or the caller
    ///           is not approved; no custody change happened
    fn transfer_custody(
        &self,
        source: &AccountId,
        asset_id: AssetId,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), CustodyError>;
}

/// Mint authorization collaborator, consulted before every mint
pub trait MintAuthority: Send + Sync {
    /// Whether `caller` may mint new baskets
    fn is_authorized_minter(&self, caller: &AccountId) -> bool;
}

/// Mint policy that lets any account mint
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenMintPolicy;

impl MintAuthority for OpenMintPolicy {
    fn is_authorized_minter(&self, _caller: &AccountId) -> bool {
        true
    }
}
