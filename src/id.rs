use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::Deref;

// AccountId identifies a participant in the registry: a basket holder, an
// external asset registry, or the basket registry itself. It is a 32 byte
// long unique identifier, resembling a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format as a hex string with a prefix of the first 6 bytes
        let prefix = hex::encode(&self.0[0..6]);
        write!(f, "acct:{}", prefix)
    }
}

impl Ord for AccountId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for AccountId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        AccountId([0; 32])
    }
}

impl Deref for AccountId {
    type Target = [u8; 32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AccountId {
    pub fn new(uid: [u8; 32]) -> Self {
        AccountId(uid)
    }

    /// Create an AccountId from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    /// Get a reference to the internal bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// The all-zero account, used as the "nobody" sentinel for asset sources
    pub fn zero() -> Self {
        AccountId([0; 32])
    }

    /// Check whether this is the all-zero account
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Derive an AccountId from a list of seeds
    ///
    /// The derivation is deterministic: the same seeds always produce the
    /// same account.
    pub fn derive(seeds: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();

        // Domain separator
        hasher.update(b"BASKET_Account");

        for seed in seeds {
            hasher.update(seed);
        }

        AccountId(hasher.finalize().into())
    }

    /// Generate a unique AccountId for testing purposes - exposed for use in
    /// downstream test suites
    pub fn unique_id_for_tests() -> Self {
        // Use current timestamp as basis for uniqueness
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos()
            .to_le_bytes();

        Self::derive(&[&timestamp, &[1, 2, 3, 4]])
    }
}

/// Monotonically increasing identifier of a basket.
///
/// Ids are allocated by the registry's own counter, starting at 0; an id is
/// never reused, even after the basket it named is burned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct BasketId(pub u64);

impl fmt::Display for BasketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "basket:{}", self.0)
    }
}

impl From<u64> for BasketId {
    fn from(raw: u64) -> Self {
        BasketId(raw)
    }
}

impl BasketId {
    /// The id that follows this one in allocation order
    pub fn next(self) -> Self {
        BasketId(self.0 + 1)
    }
}

/// Identifier of an asset within its external registry
pub type AssetId = u64;
