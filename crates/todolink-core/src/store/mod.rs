//! Storage keys and the in-memory credential store.

mod memory;

pub use memory::MemoryStore;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// The fixed set of keys a [`CredentialStore`](crate::CredentialStore) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageKey {
    #[serde(rename = "auth.token.access")]
    AccessToken,
    #[serde(rename = "auth.token.refresh")]
    RefreshToken,
    #[serde(rename = "settings.apptheme")]
    AppTheme,
    #[serde(rename = "settings.selectedlang")]
    SelectedLanguage,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::AppTheme,
        StorageKey::SelectedLanguage,
    ];

    /// Returns the persisted name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AccessToken => "auth.token.access",
            StorageKey::RefreshToken => "auth.token.refresh",
            StorageKey::AppTheme => "settings.apptheme",
            StorageKey::SelectedLanguage => "settings.selectedlang",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::Other {
                    message: format!("unknown storage key '{}'", s),
                }
                .into()
            })
    }
}
