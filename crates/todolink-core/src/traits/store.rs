//! Credential store trait.

use crate::Result;
use crate::store::StorageKey;
use crate::tokens::{AccessToken, RefreshToken, TokenPair};

/// Durable key/value persistence for tokens and preferences.
///
/// Implementations must be safe for concurrent readers and writers and must
/// serialize writes. [`CredentialStore::write_batch`] is applied atomically
/// and [`CredentialStore::get_many`] reads under the same guard, so a reader
/// of several keys observes either none or all of a concurrent batch. Single
/// `get` calls carry no such guarantee across keys.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: StorageKey) -> Option<String>;

    /// Returns the values for `keys`, in order, from one consistent snapshot.
    fn get_many(&self, keys: &[StorageKey]) -> Vec<Option<String>>;

    /// Applies a set of writes atomically. `None` deletes the key.
    fn write_batch(&self, writes: &[(StorageKey, Option<&str>)]) -> Result<()>;

    /// Stores `value` under `key`.
    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.write_batch(&[(key, Some(value))])
    }

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&self, key: StorageKey) -> Result<()> {
        self.write_batch(&[(key, None)])
    }

    /// Returns the stored access token, if any.
    fn access_token(&self) -> Option<AccessToken> {
        self.get(StorageKey::AccessToken).map(AccessToken::new)
    }

    /// Returns the stored refresh token, if any.
    fn refresh_token(&self) -> Option<RefreshToken> {
        self.get(StorageKey::RefreshToken).map(RefreshToken::new)
    }

    /// Returns both tokens if both are stored, read from one snapshot.
    fn token_pair(&self) -> Option<TokenPair> {
        let mut values = self
            .get_many(&[StorageKey::AccessToken, StorageKey::RefreshToken])
            .into_iter();
        let access = values.next().flatten()?;
        let refresh = values.next().flatten()?;
        Some(TokenPair::new(access, refresh))
    }

    /// Persists both tokens in one atomic write.
    fn save_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.write_batch(&[
            (StorageKey::AccessToken, Some(tokens.access.as_str())),
            (StorageKey::RefreshToken, Some(tokens.refresh.as_str())),
        ])
    }

    /// Removes both tokens in one atomic write.
    fn clear_tokens(&self) -> Result<()> {
        self.write_batch(&[
            (StorageKey::AccessToken, None),
            (StorageKey::RefreshToken, None),
        ])
    }
}
