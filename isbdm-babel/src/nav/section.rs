//! Logical sections: one or more source pages combined into one sidebar tree.

use super::{hierarchy, parse_sidebar_nav, NavEntry, RawNavEntry};
use crate::error::BabelError;
use crate::text::KeyContext;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Where a section's sidebar comes from and where it sits in the site tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    /// Key under which the section is cached, usually the target directory (`attributes`).
    pub key: String,
    /// Source pages relative to the HTML root, in declaration order.
    pub sources: Vec<String>,
    /// Depth of the section's own index document.
    pub index_document_depth: i64,
    /// Depth of rows without indent icons.
    pub children_base_depth: i64,
    /// Key directory relative hrefs resolve against. Defaults to each source's directory.
    pub key_context: Option<String>,
    /// Stem marker remapped into the key context (see [`KeyContext::remap_stem`]).
    pub remap_stem: Option<String>,
}

impl SectionSpec {
    pub fn new(key: impl Into<String>, sources: Vec<String>, index_depth: i64, base: i64) -> Self {
        Self {
            key: key.into(),
            sources,
            index_document_depth: index_depth,
            children_base_depth: base,
            key_context: None,
            remap_stem: None,
        }
    }

    fn context_for<'a>(&'a self, source: &'a str) -> &'a str {
        match &self.key_context {
            Some(context) => context,
            None => source.rsplit_once('/').map(|(dir, _)| dir).unwrap_or(""),
        }
    }
}

/// Reads source pages by their location relative to the HTML root.
pub trait SourceLoader {
    fn load(&self, location: &str) -> Result<String, BabelError>;
}

/// Loads sources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceLoader for DirectoryLoader {
    fn load(&self, location: &str) -> Result<String, BabelError> {
        let path = self.root.join(location);
        std::fs::read_to_string(&path).map_err(|source| BabelError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// In-memory sources keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    pages: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, location: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(location.into(), html.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, location: &str) -> Result<String, BabelError> {
        self.pages
            .get(location)
            .cloned()
            .ok_or_else(|| BabelError::Io {
                path: location.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such page"),
            })
    }
}

/// Build the reconstructed sidebar of one section.
///
/// Unreadable or unparseable sources are logged and contribute nothing. When several sources are
/// combined, duplicate keys keep their first occurrence and positions are renumbered `1..n`.
/// Only an invalid depth is an error.
pub fn build_section(
    spec: &SectionSpec,
    loader: &dyn SourceLoader,
    site_prefix: &str,
) -> Result<Vec<NavEntry>, BabelError> {
    let mut combined: Vec<RawNavEntry> = Vec::new();

    for source in &spec.sources {
        let html = match loader.load(source) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Sidebar source for section '{}' unavailable: {}", spec.key, e);
                continue;
            }
        };
        let ctx = KeyContext::new(spec.context_for(source), site_prefix)
            .with_remap_stem(spec.remap_stem.as_deref());
        match parse_sidebar_nav(&html, source, &ctx) {
            Ok(rows) => {
                tracing::info!(
                    "Parsed {} rows from {} for section '{}'",
                    rows.len(),
                    source,
                    spec.key
                );
                combined.extend(rows);
            }
            Err(e) => tracing::error!("Failed to parse {}: {}", source, e),
        }
    }

    if spec.sources.len() > 1 {
        combined = dedupe_and_renumber(combined, &spec.key);
    }
    combined.sort_by_key(|entry| entry.position);

    hierarchy::reconstruct(combined, spec.children_base_depth).map_err(|e| match e {
        BabelError::InvalidDepth { depth, .. } => BabelError::InvalidDepth {
            section: spec.key.clone(),
            depth,
        },
        other => other,
    })
}

fn dedupe_and_renumber(entries: Vec<RawNavEntry>, section: &str) -> Vec<RawNavEntry> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(entry.normalized_key.clone()) {
            kept.push(entry);
        } else {
            tracing::debug!(
                "Dropping duplicate key '{}' ({}) in section '{}'",
                entry.normalized_key,
                entry.source_reference,
                section
            );
        }
    }
    for (index, entry) in kept.iter_mut().enumerate() {
        entry.position = index + 1;
    }
    kept
}
