//! Import configuration.
//!
//! Everything the walk needs to know about file layout and annotation names
//! lives in one [`ImportConfig`] value handed to the resolver and walker.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do with a descriptor whose content handler is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum UnknownHandlerPolicy {
    /// Abort the walk with [`Error::UnknownContentHandler`].
    #[default]
    Fail,
    /// Annotate the item `DO_NOT_IMPORT` and keep going.
    DoNotImport,
    /// Leave the item unannotated and keep going.
    Skip,
}

/// Layout and annotation settings for one import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Root of the extracted export package.
    pub working_dir: PathBuf,
    /// Manifest file name, relative to `working_dir`.
    pub manifest_name: String,
    /// Suffix appended to an `identifierref` to find its descriptor.
    pub descriptor_extension: String,
    /// Attribute written onto items with their Canvas type.
    pub import_type_attr: String,
    /// Attribute written onto nested items with their depth.
    pub indent_level_attr: String,
    pub unknown_handler: UnknownHandlerPolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            manifest_name: "imsmanifest.xml".to_string(),
            descriptor_extension: ".dat".to_string(),
            import_type_attr: "import-type".to_string(),
            indent_level_attr: "indent-level".to_string(),
            unknown_handler: UnknownHandlerPolicy::default(),
        }
    }
}

impl ImportConfig {
    /// Default configuration rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    /// Load a TOML configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_unknown_handler(mut self, policy: UnknownHandlerPolicy) -> Self {
        self.unknown_handler = policy;
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.working_dir.join(&self.manifest_name)
    }

    /// `<working_dir>/<identifier><descriptor_extension>`.
    pub fn descriptor_path(&self, identifier: &str) -> PathBuf {
        self.working_dir
            .join(format!("{identifier}{}", self.descriptor_extension))
    }

    /// Reject settings that would make every lookup fail.
    pub fn validate(&self) -> Result<()> {
        if self.manifest_name.trim().is_empty() {
            return Err(Error::Config("manifest_name must not be empty".to_string()));
        }
        for (key, value) in [
            ("import_type_attr", &self.import_type_attr),
            ("indent_level_attr", &self.indent_level_attr),
        ] {
            if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c.is_ascii_uppercase()) {
                return Err(Error::Config(format!(
                    "{key} must be a non-empty lowercase attribute name, got {value:?}"
                )));
            }
        }
        if self.import_type_attr == self.indent_level_attr {
            return Err(Error::Config(
                "import_type_attr and indent_level_attr must differ".to_string(),
            ));
        }
        Ok(())
    }
}
