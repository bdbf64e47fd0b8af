//! User preferences kept alongside the tokens.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::store::StorageKey;
use crate::traits::CredentialStore;

/// App theme. Persisted as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Unspecified,
}

impl Theme {
    pub fn ordinal(self) -> u8 {
        match self {
            Theme::Light => 1,
            Theme::Dark => 2,
            Theme::Unspecified => 99,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(Theme::Light),
            2 => Some(Theme::Dark),
            99 => Some(Theme::Unspecified),
            _ => None,
        }
    }

    /// Lenient name lookup: anything but `light`/`dark` is unspecified.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    It,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::It];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::It => "it",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = s.to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| {
                InvalidInputError::Language {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// Typed access to the preference keys of a [`CredentialStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn CredentialStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// The saved theme; unset or unreadable values are unspecified.
    pub fn theme(&self) -> Theme {
        self.store
            .get(StorageKey::AppTheme)
            .and_then(|raw| raw.parse::<u8>().ok())
            .and_then(Theme::from_ordinal)
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        info!(%theme, "Saving app theme");
        self.store
            .set(StorageKey::AppTheme, &theme.ordinal().to_string())
    }

    /// The saved language, falling back to English.
    pub fn language(&self) -> Language {
        self.store
            .get(StorageKey::SelectedLanguage)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.store
            .set(StorageKey::SelectedLanguage, language.code())
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("theme", &self.theme())
            .field("language", &self.language())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn theme_names_are_case_insensitive() {
        assert_eq!(Theme::from_name("DARK"), Theme::Dark);
        assert_eq!(Theme::from_name("Light"), Theme::Light);
        assert_eq!(Theme::from_name("sepia"), Theme::Unspecified);
    }

    #[test]
    fn theme_persists_as_ordinal() {
        let store = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store.clone());
        assert_eq!(prefs.theme(), Theme::Unspecified);

        prefs.set_theme(Theme::Dark).unwrap();
        assert_eq!(store.get(StorageKey::AppTheme).as_deref(), Some("2"));
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn garbage_theme_reads_as_unspecified() {
        let store = Arc::new(MemoryStore::with_values([(StorageKey::AppTheme, "dark")]));
        assert_eq!(Preferences::new(store).theme(), Theme::Unspecified);
    }

    #[test]
    fn language_defaults_to_english() {
        let store = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store.clone());
        assert_eq!(prefs.language(), Language::En);

        prefs.set_language(Language::It).unwrap();
        assert_eq!(store.get(StorageKey::SelectedLanguage).as_deref(), Some("it"));
        assert_eq!(prefs.language(), Language::It);
    }

    #[test]
    fn unknown_language_code_is_rejected() {
        assert!("fr".parse::<Language>().is_err());
        assert_eq!("IT".parse::<Language>().unwrap(), Language::It);
    }
}
