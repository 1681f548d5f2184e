//! Per-run cache of reconstructed sections and document lookup.

use super::section::{build_section, SectionSpec, SourceLoader};
use super::NavEntry;
use crate::error::BabelError;
use crate::text;
use std::path::Path;

/// Section key used for the site's root `index` document.
pub const ROOT_SECTION: &str = "root_index";

#[derive(Debug, Clone)]
struct CachedSection {
    key: String,
    index_document_depth: i64,
    entries: Vec<NavEntry>,
}

/// All reconstructed sections of a run, in declaration order.
///
/// Built once before any document is processed and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct SectionCache {
    sections: Vec<CachedSection>,
}

/// A target document matched to its sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarMatch<'a> {
    pub section: &'a str,
    pub index_document_depth: i64,
    pub entry: &'a NavEntry,
    /// The matched target file, when the lookup started from one.
    pub document: Option<&'a Path>,
}

impl SectionCache {
    /// Build every section in declaration order. Sections without entries are not cached.
    pub fn build(
        specs: &[SectionSpec],
        loader: &dyn SourceLoader,
        site_prefix: &str,
    ) -> Result<Self, BabelError> {
        let mut cache = Self::default();
        for spec in specs {
            tracing::info!("Building sidebar section '{}'", spec.key);
            let entries = build_section(spec, loader, site_prefix)?;
            if entries.is_empty() {
                tracing::info!("No sidebar entries for section '{}'", spec.key);
                continue;
            }
            tracing::debug!("Cached {} entries for '{}'", entries.len(), spec.key);
            cache.insert(spec.key.clone(), spec.index_document_depth, entries);
        }
        Ok(cache)
    }

    /// Add (or replace) a section.
    pub fn insert(&mut self, key: String, index_document_depth: i64, entries: Vec<NavEntry>) {
        let section = CachedSection {
            key,
            index_document_depth,
            entries,
        };
        match self.sections.iter_mut().find(|s| s.key == section.key) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[NavEntry]> {
        self.section(key).map(|s| s.entries.as_slice())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.section(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Configured index depth of a cached section.
    pub fn index_document_depth(&self, key: &str) -> Option<i64> {
        self.section(key).map(|s| s.index_document_depth)
    }

    /// Section a document key belongs to.
    ///
    /// `index` maps to the root section. Otherwise the first path segment wins when cached, then
    /// the first two segments joined, falling back to the first segment.
    pub fn infer_section(&self, document_key: &str) -> String {
        if document_key == "index" {
            return ROOT_SECTION.to_string();
        }
        let segments: Vec<&str> = document_key.split('/').collect();
        let first = segments[0];
        if self.contains(first) || segments.len() < 2 {
            return first.to_string();
        }
        let two = segments[..2].join("/");
        if self.contains(&two) {
            two
        } else {
            first.to_string()
        }
    }

    /// Find the sidebar entry for a document key.
    pub fn lookup(&self, document_key: &str) -> Option<SidebarMatch<'_>> {
        let section_key = self.infer_section(document_key);
        let Some(section) = self.section(&section_key) else {
            tracing::debug!(
                "No cached section '{}' for document '{}'",
                section_key,
                document_key
            );
            return None;
        };
        let found = section
            .entries
            .iter()
            .find(|entry| entry.normalized_key == document_key);
        if found.is_none() {
            tracing::debug!(
                "No entry for '{}' among {} entries of '{}'",
                document_key,
                section.entries.len(),
                section.key
            );
        }
        found.map(|entry| SidebarMatch {
            section: &section.key,
            index_document_depth: section.index_document_depth,
            entry,
            document: None,
        })
    }

    /// Find the sidebar entry for a target file under `root`.
    pub fn lookup_document<'a>(&'a self, path: &'a Path, root: &Path) -> Option<SidebarMatch<'a>> {
        let key = text::document_key(path, root)?;
        self.lookup(&key).map(|found| SidebarMatch {
            document: Some(path),
            ..found
        })
    }

    fn section(&self, key: &str) -> Option<&CachedSection> {
        self.sections.iter().find(|s| s.key == key)
    }
}
