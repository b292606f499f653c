//! Mock collaborators for testing registries without a real asset backend.

use crate::custody::{AssetCapability, AssetCustody, CustodyError, MintAuthority};
use crate::id::{AccountId, AssetId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct VaultState {
    /// Registered asset sources and whether they honor custody transfer
    sources: HashMap<AccountId, bool>,
    /// Current holder of each (source, asset)
    owners: HashMap<(AccountId, AssetId), AccountId>,
    /// (source, holder, custodian) operator grants
    approvals: HashSet<(AccountId, AccountId, AccountId)>,
}

/// Mock implementation of the AssetCustody trait for testing purposes
///
/// Keeps asset ownership and custody approvals in memory behind a mutex, so a
/// single vault can be shared between a registry and the test body that
/// inspects it.
#[derive(Debug, Default)]
pub struct MockAssetVault {
    state: Mutex<VaultState>,
}

impl MockAssetVault {
    /// Create an empty vault with no registered sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset source; `transferable` controls the capability probe
    pub fn register_source(&self, source: AccountId, transferable: bool) {
        self.lock().sources.insert(source, transferable);
    }

    /// Mint an asset at `source` held by `owner`
    pub fn mint_asset(&self, source: AccountId, asset_id: AssetId, owner: AccountId) {
        self.lock().owners.insert((source, asset_id), owner);
    }

    /// Destroy an asset, wherever it is held
    pub fn burn_asset(&self, source: &AccountId, asset_id: AssetId) {
        self.lock().owners.remove(&(*source, asset_id));
    }

    /// Grant or revoke `custodian`'s right to move `holder`'s assets at `source`
    pub fn set_custody_approval(
        &self,
        source: AccountId,
        holder: AccountId,
        custodian: AccountId,
        approved: bool,
    ) {
        let key = (source, holder, custodian);
        let mut state = self.lock();
        if approved {
            state.approvals.insert(key);
        } else {
            state.approvals.remove(&key);
        }
    }

    /// Current holder of an asset, if it exists
    pub fn holder_of(&self, source: &AccountId, asset_id: AssetId) -> Option<AccountId> {
        self.lock().owners.get(&(*source, asset_id)).copied()
    }

    /// Number of assets `holder` currently holds at `source`
    pub fn held_count(&self, source: &AccountId, holder: &AccountId) -> usize {
        self.lock()
            .owners
            .iter()
            .filter(|((s, _), h)| s == source && *h == holder)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VaultState> {
        self.state.lock().expect("mock vault poisoned")
    }
}

impl AssetCustody for MockAssetVault {
    fn supports(&self, source: &AccountId, capability: AssetCapability) -> bool {
        match capability {
            AssetCapability::Transfer => self.lock().sources.get(source).copied().unwrap_or(false),
        }
    }

    fn asset_owner(
        &self,
        source: &AccountId,
        asset_id: AssetId,
    ) -> Result<AccountId, CustodyError> {
        self.lock()
            .owners
            .get(&(*source, asset_id))
            .copied()
            .ok_or(CustodyError::AssetNotFound {
                source_account: *source,
                asset_id,
            })
    }

    fn is_custody_approved(
        &self,
        source: &AccountId,
        asset_id: AssetId,
        custodian: &AccountId,
    ) -> Result<bool, CustodyError> {
        let state = self.lock();
        let holder =
            state
                .owners
                .get(&(*source, asset_id))
                .copied()
                .ok_or(CustodyError::AssetNotFound {
                    source_account: *source,
                    asset_id,
                })?;
        Ok(holder == *custodian || state.approvals.contains(&(*source, holder, *custodian)))
    }

    fn transfer_custody(
        &self,
        source: &AccountId,
        asset_id: AssetId,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), CustodyError> {
        let mut state = self.lock();
        let holder =
            state
                .owners
                .get(&(*source, asset_id))
                .copied()
                .ok_or(CustodyError::AssetNotFound {
                    source_account: *source,
                    asset_id,
                })?;
        if holder != *from {
            return Err(CustodyError::NotOwnerOfAsset {
                source_account: *source,
                asset_id,
                holder: *from,
            });
        }
        state.owners.insert((*source, asset_id), *to);
        Ok(())
    }
}

/// Mint policy that refuses a fixed set of callers, for authorization tests
#[derive(Debug, Default)]
pub struct AllowListMinters {
    allowed: Mutex<HashSet<AccountId>>,
}

impl AllowListMinters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant minting rights to `account`
    pub fn allow(&self, account: AccountId) {
        self.allowed
            .lock()
            .expect("minter list poisoned")
            .insert(account);
    }

    /// Revoke minting rights from `account`
    pub fn revoke(&self, account: &AccountId) {
        self.allowed
            .lock()
            .expect("minter list poisoned")
            .remove(account);
    }
}

impl MintAuthority for AllowListMinters {
    fn is_authorized_minter(&self, caller: &AccountId) -> bool {
        self.allowed
            .lock()
            .expect("minter list poisoned")
            .contains(caller)
    }
}
