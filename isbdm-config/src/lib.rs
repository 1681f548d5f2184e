//! Shared configuration loader for the isbdm toolchain.
//!
//! `defaults/isbdm.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`IsbdmConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use isbdm_babel::{SectionSpec, TranspileOptions};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/isbdm.default.toml");

/// Name of the optional per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "isbdm.toml";

/// Top-level configuration consumed by isbdm applications.
#[derive(Debug, Clone, Deserialize)]
pub struct IsbdmConfig {
    pub paths: PathsConfig,
    pub convert: ConvertConfig,
    pub sidebar: SidebarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub source_html_root: String,
    pub target_mdx_root: String,
}

/// Page conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub site_prefix: String,
    pub docs_prefix: String,
    pub element_uri_base: String,
    pub log_file: String,
    pub extension: String,
}

impl From<&ConvertConfig> for TranspileOptions {
    fn from(config: &ConvertConfig) -> Self {
        TranspileOptions {
            site_prefix: config.site_prefix.clone(),
            docs_prefix: config.docs_prefix.clone(),
            element_uri_base: config.element_uri_base.clone(),
        }
    }
}

/// Sidebar front-matter generation.
#[derive(Debug, Clone, Deserialize)]
pub struct SidebarConfig {
    pub category_class: String,
    pub log_file: String,
    pub main_category_pages: Vec<String>,
    pub sections: Vec<SectionConfig>,
}

impl SidebarConfig {
    /// Main category pages as document keys (`intro/index`).
    pub fn main_category_keys(&self) -> HashSet<String> {
        self.main_category_pages
            .iter()
            .map(|page| {
                let page = page.trim_start_matches("./");
                page.rsplit_once('.')
                    .filter(|(_, ext)| !ext.contains('/'))
                    .map(|(stem, _)| stem)
                    .unwrap_or(page)
                    .to_string()
            })
            .collect()
    }

    pub fn section_specs(&self) -> Vec<SectionSpec> {
        self.sections.iter().map(SectionSpec::from).collect()
    }
}

/// One logical sidebar section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    pub key: String,
    pub sources: Vec<String>,
    pub index_document_depth: i64,
    pub children_base_depth: i64,
    #[serde(default)]
    pub key_context: Option<String>,
    #[serde(default)]
    pub remap_stem: Option<String>,
}

impl From<&SectionConfig> for SectionSpec {
    fn from(config: &SectionConfig) -> Self {
        SectionSpec {
            key: config.key.clone(),
            sources: config.sources.clone(),
            index_document_depth: config.index_document_depth,
            children_base_depth: config.children_base_depth,
            key_context: config.key_context.clone(),
            remap_stem: config.remap_stem.clone(),
        }
    }
}

impl IsbdmConfig {
    /// Reject configurations no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for section in &self.sidebar.sections {
            if section.key.trim().is_empty() {
                return Err(ConfigError::Message(
                    "sidebar section with an empty key".to_string(),
                ));
            }
            if !seen.insert(section.key.as_str()) {
                return Err(ConfigError::Message(format!(
                    "duplicate sidebar section '{}'",
                    section.key
                )));
            }
            if section.sources.is_empty() {
                return Err(ConfigError::Message(format!(
                    "sidebar section '{}' has no sources",
                    section.key
                )));
            }
            if section.index_document_depth < 1 || section.children_base_depth < 1 {
                return Err(ConfigError::Message(format!(
                    "sidebar section '{}': depths start at 1 (index {}, children {})",
                    section.key, section.index_document_depth, section.children_base_depth
                )));
            }
        }
        Ok(())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the resulting configuration.
    pub fn build(self) -> Result<IsbdmConfig, ConfigError> {
        let config: IsbdmConfig = self.builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<IsbdmConfig, ConfigError> {
    Loader::new().build()
}
