//! Settings subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use todolink_core::{Language, Preferences, Theme};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SettingsSubcommand {
    /// Show or set the app theme
    Theme {
        /// New theme
        value: Option<ThemeArg>,
    },

    /// Show or set the app language
    Language {
        /// New language code (en, it)
        value: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ThemeArg {
    Light,
    Dark,
    Unspecified,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Unspecified => Theme::Unspecified,
        }
    }
}

pub fn handle(cmd: SettingsCommand, globals: &GlobalArgs) -> Result<()> {
    let store = storage::open_store(globals.store.as_deref())?;
    let preferences = Preferences::new(store);

    match cmd.command {
        SettingsSubcommand::Theme { value: None } => {
            output::field("Theme", preferences.theme().as_str());
        }
        SettingsSubcommand::Theme { value: Some(value) } => {
            let theme = Theme::from(value);
            preferences
                .set_theme(theme)
                .context("Failed to save theme")?;
            output::success(&format!("Theme set to {}", theme));
        }
        SettingsSubcommand::Language { value: None } => {
            output::field("Language", preferences.language().code());
        }
        SettingsSubcommand::Language { value: Some(value) } => {
            let language: Language = value.parse().context("Unsupported language")?;
            preferences
                .set_language(language)
                .context("Failed to save language")?;
            output::success(&format!("Language set to {}", language));
        }
    }

    Ok(())
}
