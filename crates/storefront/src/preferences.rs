//! Theme and language preferences.
//!
//! Both live in durable storage as bare strings: `darkMode` holds `"true"`
//! or `"false"`, `selectedLanguage` holds a language code. Anything missing
//! or unrecognised reads as the default.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::storage::{Storage, StorageError, keys};

/// Colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored value of the `darkMode` key.
    #[must_use]
    pub const fn as_stored(self) -> &'static str {
        match self {
            Self::Light => "false",
            Self::Dark => "true",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Read the saved theme.
    #[must_use]
    pub fn load(storage: &dyn Storage) -> Self {
        match read_raw(storage, keys::DARK_MODE).as_deref() {
            Some("true") => Self::Dark,
            _ => Self::Light,
        }
    }

    /// Save this theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save(self, storage: &dyn Storage) -> Result<(), StorageError> {
        storage.set(keys::DARK_MODE, self.as_stored())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// Unrecognised preference value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownPreference {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Theme {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownPreference {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    English,
    French,
    Kinyarwanda,
    Swahili,
}

impl Language {
    pub const ALL: [Self; 4] = [Self::English, Self::French, Self::Kinyarwanda, Self::Swahili];

    /// Two-letter code used in storage and translation file names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::Kinyarwanda => "rw",
            Self::Swahili => "sw",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "Français",
            Self::Kinyarwanda => "Kinyarwanda",
            Self::Swahili => "Kiswahili",
        }
    }

    /// Read the saved language.
    #[must_use]
    pub fn load(storage: &dyn Storage) -> Self {
        read_raw(storage, keys::LANGUAGE)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }

    /// Save this language.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save(self, storage: &dyn Storage) -> Result<(), StorageError> {
        storage.set(keys::LANGUAGE, self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| UnknownPreference {
                kind: "language",
                value: s.to_string(),
            })
    }
}

fn read_raw(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value.map(|v| v.trim().trim_matches('"').to_string()),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read preference");
            None
        }
    }
}
