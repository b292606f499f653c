use crate::basket::{Basket, BasketState, TokenRef};
use crate::clock::Clock;
use crate::config::RegistryConfig;
use crate::custody::{AssetCapability, AssetCustody, CustodyError, MintAuthority};
use crate::error::{AssetRejection, RegistryError};
use crate::events::{EventSink, LifecycleEvent};
use crate::id::{AccountId, AssetId, BasketId};
use crate::owner_index::OwnerIndex;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The basket custody registry
///
/// Owns the basket-id space, every basket record, the per-owner index, and
/// the approval tables. External concerns are injected: asset custody, mint
/// authorization, the clock, and the event sink.
///
/// Every mutating operation takes `&mut self` and runs to completion, so a
/// custody collaborator cannot re-enter the registry mid-operation. Internal
/// state is brought to its final values before the custody call is issued;
/// when that call fails, the already-applied index mutations are undone, so
/// no observable intermediate state survives a failed operation.
pub struct BasketRegistry {
    /// The registry's own custody account
    account: AccountId,
    config: RegistryConfig,

    baskets: HashMap<BasketId, Basket>,
    next_id: BasketId,
    owners: OwnerIndex,

    /// Single-basket transfer approvals
    approvals: HashMap<BasketId, AccountId>,
    /// owner -> operators approved for the owner's whole portfolio
    operators: HashMap<AccountId, HashSet<AccountId>>,

    custody: Arc<dyn AssetCustody>,
    minter: Arc<dyn MintAuthority>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

/// Serialized registry state, without the injected collaborators
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot {
    account: AccountId,
    config: RegistryConfig,
    baskets: HashMap<BasketId, Basket>,
    next_id: BasketId,
    owners: OwnerIndex,
    approvals: HashMap<BasketId, AccountId>,
    operators: HashMap<AccountId, HashSet<AccountId>>,
}

impl BasketRegistry {
    /// Create an empty registry
    ///
    /// `account` is the identity under which the registry takes custody of
    /// external assets; asset sources must approve it as a custodian before
    /// `add` can succeed.
    pub fn new(
        account: AccountId,
        config: RegistryConfig,
        custody: Arc<dyn AssetCustody>,
        minter: Arc<dyn MintAuthority>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            account,
            config,
            baskets: HashMap::new(),
            next_id: BasketId(0),
            owners: OwnerIndex::new(),
            approvals: HashMap::new(),
            operators: HashMap::new(),
            custody,
            minter,
            clock,
            events,
        }
    }

    // ---- Lifecycle operations ----

    /// Mint a new basket for `to`
    ///
    /// The basket starts `Open` with a fresh cooldown; the id is allocated
    /// from the registry's counter and never reused.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        to: AccountId,
        metadata_ref: impl Into<String>,
    ) -> Result<BasketId, RegistryError> {
        if !self.minter.is_authorized_minter(caller) {
            return Err(RegistryError::NotMinter(*caller));
        }

        let id = self.next_id;
        self.next_id = id.next();

        let metadata_ref = metadata_ref.into();
        let basket = Basket::new(id, to, self.clock.unix_now(), metadata_ref.clone());
        self.baskets.insert(id, basket);
        self.owners.append(to, id);

        debug!("minted {} for {}", id, to);
        self.events.publish(LifecycleEvent::Minted {
            basket: id,
            to,
            metadata_ref,
        });
        Ok(id)
    }

    /// Reopen a closed basket
    ///
    /// Resets `opened_at`, so the basket cannot be closed again until a full
    /// cooldown has elapsed.
    pub fn open(&mut self, caller: &AccountId, id: BasketId) -> Result<(), RegistryError> {
        let now = self.clock.unix_now();
        let basket = self.live_mut(id)?;
        require_owner(basket, caller)?;
        require_state(basket, BasketState::Closed)?;

        basket.state = BasketState::Open;
        basket.opened_at = now;

        debug!("{} opened by {}", id, caller);
        self.events.publish(LifecycleEvent::Opened {
            basket: id,
            owner: *caller,
        });
        Ok(())
    }

    /// Close an open basket once its cooldown has elapsed
    pub fn close(&mut self, caller: &AccountId, id: BasketId) -> Result<(), RegistryError> {
        let now = self.clock.unix_now();
        let cooldown = self.config.open_cooldown_secs;
        let basket = self.live_mut(id)?;
        require_owner(basket, caller)?;
        require_state(basket, BasketState::Open)?;

        let closable_at = basket.opened_at.saturating_add(cooldown);
        if now < closable_at {
            return Err(RegistryError::CooldownNotElapsed {
                basket: id,
                remaining: closable_at - now,
            });
        }

        basket.state = BasketState::Closed;

        debug!("{} closed by {}", id, caller);
        self.events.publish(LifecycleEvent::Closed {
            basket: id,
            owner: *caller,
        });
        Ok(())
    }

    /// Burn a closed, empty basket
    ///
    /// The record is kept so `state_of` keeps answering `Burned`, but the id
    /// leaves the owner's index and every live-entry query reports
    /// `NotFound` from here on.
    pub fn burn(&mut self, caller: &AccountId, id: BasketId) -> Result<(), RegistryError> {
        let basket = self.live_mut(id)?;
        require_owner(basket, caller)?;
        require_state(basket, BasketState::Closed)?;

        let remaining = basket.tokens.len();
        if remaining > 0 {
            return Err(RegistryError::BasketNotEmpty {
                basket: id,
                remaining,
            });
        }

        basket.state = BasketState::Burned;
        let owner = basket.owner;
        self.owners.remove(&owner, id);
        self.approvals.remove(&id);

        debug!("{} burned by {}", id, caller);
        self.events.publish(LifecycleEvent::Burned {
            basket: id,
            owner,
        });
        Ok(())
    }

    // ---- Content operations ----

    /// Reference an external asset from an open basket
    ///
    /// The asset must live at a non-zero, non-registry source that passes the
    /// capability probe, must be held by the basket's owner, and the registry
    /// must be approved to take custody. Index mutations are applied first;
    /// if the custody hand-off then fails they are rolled back completely.
    pub fn add(
        &mut self,
        caller: &AccountId,
        id: BasketId,
        source: AccountId,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        let registry_account = self.account;
        let basket = self.live(id)?;
        require_state(basket, BasketState::Open)?;
        let owner = basket.owner;

        let reject = |reason| RegistryError::InvalidAsset {
            source_account: source,
            asset_id,
            reason,
        };

        if source.is_zero() || source == registry_account {
            return Err(reject(AssetRejection::ZeroOrRegistry));
        }
        if !self.custody.supports(&source, AssetCapability::Transfer) {
            return Err(reject(AssetRejection::Unsupported));
        }

        let holder = self
            .custody
            .asset_owner(&source, asset_id)
            .map_err(|e| map_custody_error(source, asset_id, e))?;
        if holder != owner {
            return Err(reject(AssetRejection::WrongHolder));
        }
        if !self
            .custody
            .is_custody_approved(&source, asset_id, &registry_account)
            .map_err(|e| map_custody_error(source, asset_id, e))?
        {
            return Err(reject(AssetRejection::CustodyNotApproved));
        }

        // Effects before the external call
        let basket = self.baskets.get_mut(&id).expect("checked live above");
        basket.tokens.push(source, asset_id);

        if let Err(err) = self
            .custody
            .transfer_custody(&source, asset_id, &owner, &registry_account)
        {
            let basket = self.baskets.get_mut(&id).expect("checked live above");
            basket.tokens.undo_push(&source, asset_id);
            return Err(map_custody_error(source, asset_id, err));
        }

        debug!("asset {}/{} added to {} by {}", source, asset_id, id, caller);
        self.events.publish(LifecycleEvent::AssetAdded {
            basket: id,
            source,
            asset_id,
            owner,
        });
        self.events.publish(LifecycleEvent::AssetReceived {
            source,
            asset_id,
            from: owner,
        });
        Ok(())
    }

    /// Release an asset reference from an open basket back to its owner
    ///
    /// Swap-delete: the freed slot is overwritten by the tail entry, whose
    /// cached pointer is updated, so removal is O(1) and order-non-preserving.
    pub fn remove(
        &mut self,
        caller: &AccountId,
        id: BasketId,
        source: AccountId,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        let registry_account = self.account;
        let basket = self.live_mut(id)?;
        require_state(basket, BasketState::Open)?;
        require_owner(basket, caller)?;
        let owner = basket.owner;

        if basket.tokens.is_empty() {
            return Err(RegistryError::BasketEmpty(id));
        }

        // Effects before the external call
        let removal =
            basket
                .tokens
                .swap_remove(&source, asset_id)
                .ok_or(RegistryError::TokenNotInBasket {
                    basket: id,
                    source_account: source,
                    asset_id,
                })?;

        if let Err(err) = self
            .custody
            .transfer_custody(&source, asset_id, &registry_account, &owner)
        {
            let basket = self.baskets.get_mut(&id).expect("checked live above");
            basket.tokens.undo_swap_remove(removal);
            return Err(map_custody_error(source, asset_id, err));
        }

        debug!(
            "asset {}/{} removed from {} by {}",
            source, asset_id, id, caller
        );
        self.events.publish(LifecycleEvent::AssetRemoved {
            basket: id,
            source,
            asset_id,
            owner,
        });
        Ok(())
    }

    // ---- Transfer-class operations ----

    /// Transfer basket ownership
    ///
    /// `from` must be the current owner; the caller must be the owner, the
    /// approved account for this basket, or an operator of the owner; and
    /// every basket the owner holds must be closed.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        from: AccountId,
        to: AccountId,
        id: BasketId,
    ) -> Result<(), RegistryError> {
        let basket = self.live(id)?;
        let owner = basket.owner;
        if owner != from {
            return Err(RegistryError::NotOwner {
                basket: id,
                caller: from,
            });
        }

        let approved = self.approvals.get(&id) == Some(caller);
        let operator = self
            .operators
            .get(&owner)
            .is_some_and(|ops| ops.contains(caller));
        if *caller != owner && !approved && !operator {
            return Err(RegistryError::NotAuthorized {
                basket: id,
                caller: *caller,
            });
        }

        self.require_all_closed(&owner)?;

        self.owners.remove(&owner, id);
        self.owners.append(to, id);
        self.baskets.get_mut(&id).expect("checked live above").owner = to;
        // A transfer consumes the single-basket approval
        self.approvals.remove(&id);

        debug!("{} transferred {} -> {}", id, from, to);
        self.events.publish(LifecycleEvent::OwnershipTransferred {
            basket: id,
            from,
            to,
        });
        Ok(())
    }

    /// Set or clear the approved account for one basket
    ///
    /// Transfer-class: requires the owner's whole portfolio to be closed.
    pub fn approve(
        &mut self,
        caller: &AccountId,
        id: BasketId,
        approved: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        let basket = self.live(id)?;
        let owner = basket.owner;

        let operator = self
            .operators
            .get(&owner)
            .is_some_and(|ops| ops.contains(caller));
        if *caller != owner && !operator {
            return Err(RegistryError::NotAuthorized {
                basket: id,
                caller: *caller,
            });
        }

        self.require_all_closed(&owner)?;

        match approved {
            Some(account) => self.approvals.insert(id, account),
            None => self.approvals.remove(&id),
        };

        self.events.publish(LifecycleEvent::ApprovalChanged {
            basket: id,
            owner,
            approved,
        });
        Ok(())
    }

    /// Grant or revoke an operator over the caller's whole portfolio
    ///
    /// Transfer-class: requires the caller's whole portfolio to be closed.
    pub fn set_approval_for_all(
        &mut self,
        caller: &AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<(), RegistryError> {
        self.require_all_closed(caller)?;

        if approved {
            self.operators.entry(*caller).or_default().insert(operator);
        } else if let Some(ops) = self.operators.get_mut(caller) {
            ops.remove(&operator);
            if ops.is_empty() {
                self.operators.remove(caller);
            }
        }

        self.events.publish(LifecycleEvent::OperatorApprovalChanged {
            owner: *caller,
            operator,
            approved,
        });
        Ok(())
    }

    // ---- Queries ----

    /// Current owner of a live basket
    pub fn owner_of(&self, id: BasketId) -> Result<AccountId, RegistryError> {
        Ok(self.live(id)?.owner)
    }

    /// Lifecycle state; keeps answering for burned ids
    pub fn state_of(&self, id: BasketId) -> Result<BasketState, RegistryError> {
        self.baskets
            .get(&id)
            .map(|b| b.state)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Asset references currently held by a basket
    ///
    /// Only contiguity and pointer correctness are guaranteed; insertion
    /// order is not preserved across removals.
    pub fn tokens_in(&self, id: BasketId) -> Result<&[TokenRef], RegistryError> {
        self.baskets
            .get(&id)
            .map(|b| b.tokens.entries())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Whether a basket references the given asset; false for unknown
    /// baskets, empty baskets, and absent assets alike
    pub fn is_in_basket(&self, id: BasketId, source: &AccountId, asset_id: AssetId) -> bool {
        self.baskets
            .get(&id)
            .is_some_and(|b| b.references(source, asset_id))
    }

    /// Ids of the baskets `owner` currently holds
    pub fn baskets_of(&self, owner: &AccountId) -> &[BasketId] {
        self.owners.baskets_of(owner)
    }

    /// Number of baskets `owner` currently holds
    pub fn basket_count_of(&self, owner: &AccountId) -> usize {
        self.owners.count_of(owner)
    }

    /// The next basket id to be allocated
    pub fn cur_basket_id(&self) -> BasketId {
        self.next_id
    }

    /// Approved account for a basket, masked while the owner's portfolio is
    /// not all-closed
    pub fn approved_of(&self, id: BasketId) -> Result<Option<AccountId>, RegistryError> {
        let basket = self.live(id)?;
        if !self.all_closed(&basket.owner) {
            return Ok(None);
        }
        Ok(self.approvals.get(&id).copied())
    }

    /// Whether `operator` may act on all of `owner`'s baskets, masked while
    /// the owner's portfolio is not all-closed
    pub fn is_approved_for_all(&self, owner: &AccountId, operator: &AccountId) -> bool {
        if !self.all_closed(owner) {
            return false;
        }
        self.operators
            .get(owner)
            .is_some_and(|ops| ops.contains(operator))
    }

    /// Metadata URI of a live basket: base URI plus the mint-time reference
    pub fn token_uri(&self, id: BasketId) -> Result<String, RegistryError> {
        let basket = self.live(id)?;
        Ok(format!(
            "{}{}",
            self.config.base_token_uri, basket.metadata_ref
        ))
    }

    /// URI describing the registry collection
    pub fn contract_uri(&self) -> &str {
        &self.config.contract_uri
    }

    /// The registry's own custody account
    pub fn registry_account(&self) -> &AccountId {
        &self.account
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ---- Snapshot / restore ----

    /// Serialize the registry's pure state
    pub fn snapshot(&self) -> Result<Vec<u8>, RegistryError> {
        let snapshot = RegistrySnapshot {
            account: self.account,
            config: self.config.clone(),
            baskets: self.baskets.clone(),
            next_id: self.next_id,
            owners: self.owners.clone(),
            approvals: self.approvals.clone(),
            operators: self.operators.clone(),
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Rebuild a registry from a snapshot around fresh collaborators
    pub fn restore(
        bytes: &[u8],
        custody: Arc<dyn AssetCustody>,
        minter: Arc<dyn MintAuthority>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, RegistryError> {
        let snapshot: RegistrySnapshot = bincode::deserialize(bytes)?;
        Ok(Self {
            account: snapshot.account,
            config: snapshot.config,
            baskets: snapshot.baskets,
            next_id: snapshot.next_id,
            owners: snapshot.owners,
            approvals: snapshot.approvals,
            operators: snapshot.operators,
            custody,
            minter,
            clock,
            events,
        })
    }

    // ---- Internal helpers ----

    /// Look up a basket that must still be live
    fn live(&self, id: BasketId) -> Result<&Basket, RegistryError> {
        self.baskets
            .get(&id)
            .filter(|b| !b.state.is_burned())
            .ok_or(RegistryError::NotFound(id))
    }

    fn live_mut(&mut self, id: BasketId) -> Result<&mut Basket, RegistryError> {
        self.baskets
            .get_mut(&id)
            .filter(|b| !b.state.is_burned())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Whether every basket `owner` holds is closed; vacuously true for an
    /// empty portfolio. O(baskets held), which stays small in practice.
    fn all_closed(&self, owner: &AccountId) -> bool {
        self.first_open(owner).is_none()
    }

    fn first_open(&self, owner: &AccountId) -> Option<BasketId> {
        self.owners
            .baskets_of(owner)
            .iter()
            .copied()
            .find(|id| !self.baskets[id].state.is_closed())
    }

    fn require_all_closed(&self, owner: &AccountId) -> Result<(), RegistryError> {
        match self.first_open(owner) {
            None => Ok(()),
            Some(open_basket) => Err(RegistryError::NotAllClosed {
                owner: *owner,
                open_basket,
            }),
        }
    }
}

fn require_owner(basket: &Basket, caller: &AccountId) -> Result<(), RegistryError> {
    if basket.owner != *caller {
        return Err(RegistryError::NotOwner {
            basket: basket.id,
            caller: *caller,
        });
    }
    Ok(())
}

fn require_state(basket: &Basket, required: BasketState) -> Result<(), RegistryError> {
    if basket.state != required {
        return Err(RegistryError::WrongState {
            basket: basket.id,
            required: required.as_str(),
            actual: basket.state.as_str(),
        });
    }
    Ok(())
}

/// Map a custody-side failure into the registry's asset-rejection taxonomy
fn map_custody_error(source: AccountId, asset_id: AssetId, err: CustodyError) -> RegistryError {
    let reason = match err {
        CustodyError::AssetNotFound { .. } => AssetRejection::NotFound,
        CustodyError::NotOwnerOfAsset { .. } => AssetRejection::WrongHolder,
        CustodyError::NotApprovedForCustody { .. } => AssetRejection::CustodyNotApproved,
    };
    RegistryError::InvalidAsset {
        source_account: source,
        asset_id,
        reason,
    }
}
