//! Japanese-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All tuning constants from `libwnn_core::Config` (flattened via serde)
//! - The romaji table the letter converter writes with
//! - The dictionary the engine starts with
//!
//! # Example
//!
//! ```rust
//! use libjajp::{JaJpConfig, RomajiTable};
//!
//! let config = JaJpConfig::from_toml_str("romaji_table = \"full_katakana\"\npredict_limit = 20\n").unwrap();
//! assert_eq!(config.romaji_table, RomajiTable::FullKatakana);
//! assert_eq!(config.base.predict_limit, 20);
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::DictionaryKind;
use crate::romaji_table::RomajiTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JaJpConfig {
    /// Base tuning constants (clause cost, score bands, limits).
    #[serde(flatten)]
    pub base: libwnn_core::Config,

    /// Output script of romaji conversion.
    pub romaji_table: RomajiTable,

    /// Dictionary the engine starts with.
    pub dictionary_kind: DictionaryKind,
}

impl JaJpConfig {
    /// Convert into the base Config (for use with the clause converter and dictionary).
    pub fn into_base(self) -> libwnn_core::Config {
        self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parse config {}", path.display()))
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).with_context(|| format!("write config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
