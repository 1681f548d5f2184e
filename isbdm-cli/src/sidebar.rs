//! `isbdm sidebar`: write sidebar metadata into the front matter of target documents.
//!
//! The section cache is built from the source HTML once, then every `.mdx` document under the
//! target root is matched against it by its relative key. Documents without a sidebar entry lose
//! any stale sidebar keys.

use crate::batch::{self, Outcome, Summary};
use anyhow::{bail, Context, Result};
use isbdm_babel::nav::SidebarMatch;
use isbdm_babel::text::document_key;
use isbdm_babel::{
    apply_sidebar_metadata, frontmatter, DirectoryLoader, SectionCache, SectionSpec,
    SidebarMetadata,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of one sidebar run.
#[derive(Debug, Clone)]
pub struct SidebarRun {
    pub source_html_root: PathBuf,
    pub target_mdx_root: PathBuf,
    pub single_dir: Option<String>,
    pub dry_run: bool,
    pub dry_run_output: Option<PathBuf>,
    pub site_prefix: String,
    pub category_class: String,
    pub main_category_keys: HashSet<String>,
    pub sections: Vec<SectionSpec>,
}

impl SidebarRun {
    pub fn build_cache(&self) -> Result<SectionCache> {
        let loader = DirectoryLoader::new(&self.source_html_root);
        let cache = SectionCache::build(&self.sections, &loader, &self.site_prefix)
            .context("Failed to reconstruct sidebar sections")?;
        if cache.is_empty() {
            tracing::warn!(
                "No sidebar sections found under {}",
                self.source_html_root.display()
            );
        }
        Ok(cache)
    }

    pub fn execute(&self) -> Result<Summary> {
        tracing::info!("Source HTML root: {}", self.source_html_root.display());
        tracing::info!("Target MDX root: {}", self.target_mdx_root.display());

        let walk_root = match &self.single_dir {
            Some(dir) => {
                let path = self.target_mdx_root.join(dir);
                if !path.is_dir() {
                    bail!("Single directory not found: {}", path.display());
                }
                tracing::info!("Processing single target directory: {}", dir);
                path
            }
            None => self.target_mdx_root.clone(),
        };

        let cache = self.build_cache()?;
        let dry_run_output = self.prepare_dry_run_output()?;

        let documents = batch::find_files(&walk_root, "mdx", true)?;
        let outcomes = batch::run(&documents, 1, |document| {
            if self.dry_run && dry_run_output.is_none() {
                tracing::info!("[dry run] Would process {}", document.display());
                return Outcome::Processed;
            }
            match self.update_document(document, &cache, dry_run_output.as_deref()) {
                Ok(()) => Outcome::Processed,
                Err(err) => {
                    tracing::error!("Failed to update {}: {:#}", document.display(), err);
                    Outcome::Failed
                }
            }
        })?;
        Ok(Summary::from_outcomes(&outcomes))
    }

    fn prepare_dry_run_output(&self) -> Result<Option<PathBuf>> {
        let Some(output) = self.dry_run_output.as_ref().filter(|_| self.dry_run) else {
            return Ok(None);
        };
        if output.exists() {
            fs::remove_dir_all(output)
                .with_context(|| format!("Failed to clear {}", output.display()))?;
        }
        fs::create_dir_all(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        tracing::info!("[dry run] Writing modified documents to {}", output.display());
        Ok(Some(output.clone()))
    }

    fn update_document(
        &self,
        document: &Path,
        cache: &SectionCache,
        dry_run_output: Option<&Path>,
    ) -> Result<()> {
        tracing::info!("Processing {}", document.display());
        let content = fs::read_to_string(document)
            .with_context(|| format!("Failed to read {}", document.display()))?;
        let (mut front_matter, body) = frontmatter::split(&content);

        let found = cache.lookup_document(document, &self.target_mdx_root);
        if let Some(found) = &found {
            tracing::debug!(
                "Matched {} to '{}' in section '{}'",
                found.document.unwrap_or(document).display(),
                found.entry.normalized_key,
                found.section
            );
        }
        let metadata = found.as_ref().map(|found| self.metadata_for(document, found));
        if metadata.is_none() {
            tracing::debug!(
                "No sidebar entry for {}, clearing sidebar keys",
                document.display()
            );
        }
        apply_sidebar_metadata(&mut front_matter, metadata.as_ref(), &self.category_class);
        let rendered = frontmatter::render(&front_matter, &body)?;

        let destination = match dry_run_output {
            Some(output) => {
                let relative = document
                    .strip_prefix(&self.target_mdx_root)
                    .unwrap_or(document);
                let destination = output.join(relative);
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                tracing::info!("[dry run] Would write {}", document.display());
                destination
            }
            None => document.to_path_buf(),
        };
        fs::write(&destination, rendered)
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        Ok(())
    }

    fn metadata_for(&self, document: &Path, found: &SidebarMatch<'_>) -> SidebarMetadata {
        let is_main_category = document_key(document, &self.target_mdx_root)
            .is_some_and(|key| self.main_category_keys.contains(&key));
        SidebarMetadata::for_match(found, is_main_category, &self.category_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIDEBAR: &str = r#"<html><body>
<nav class="navISBDMSection">
  <div class="d-flex"><a href="index.html">Attributes</a></div>
  <div class="d-flex"><i class="bi-arrow-return-right"></i><a href="1025.html">has title</a></div>
</nav>
</body></html>"#;

    fn run_in(dir: &Path, dry_run: bool, dry_run_output: Option<PathBuf>) -> SidebarRun {
        SidebarRun {
            source_html_root: dir.join("html"),
            target_mdx_root: dir.join("docs"),
            single_dir: None,
            dry_run,
            dry_run_output,
            site_prefix: "/ISBDM/docs/".to_string(),
            category_class: "sidebar-main-category".to_string(),
            main_category_keys: HashSet::from(["attributes/index".to_string()]),
            sections: vec![SectionSpec::new(
                "attributes",
                vec!["attributes/index.html".to_string()],
                1,
                1,
            )],
        }
    }

    fn front_matter_of(path: &Path) -> (serde_yaml::Mapping, String) {
        frontmatter::split(&fs::read_to_string(path).unwrap())
    }

    fn seed(dir: &Path) {
        fs::create_dir_all(dir.join("html/attributes")).unwrap();
        fs::write(dir.join("html/attributes/index.html"), SIDEBAR).unwrap();
        fs::create_dir_all(dir.join("docs/attributes")).unwrap();
        fs::write(
            dir.join("docs/attributes/1025.mdx"),
            "---\ntitle: has title\n---\n# has title\n",
        )
        .unwrap();
        fs::write(dir.join("docs/attributes/index.mdx"), "# Attributes\n").unwrap();
        fs::write(
            dir.join("docs/stale.mdx"),
            "---\nsidebar_label: Old\ncustomProps:\n  sidebar_prefix: x\n---\nBody\n",
        )
        .unwrap();
    }

    #[test]
    fn writes_sidebar_keys_and_clears_stale_ones() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let summary = run_in(dir.path(), false, None).execute().unwrap();
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.errors_or_skipped(), 0);

        let (child, _) = front_matter_of(&dir.path().join("docs/attributes/1025.mdx"));
        let keys: Vec<&str> = child.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["title", "sidebar_label", "sidebar_level", "sidebar_position", "customProps"]
        );
        assert_eq!(child["sidebar_label"].as_str(), Some("has title"));
        assert_eq!(child["sidebar_level"].as_u64(), Some(2));
        assert_eq!(child["sidebar_position"].as_u64(), Some(2));
        assert_eq!(child["customProps"]["sidebar_prefix"].as_str(), Some("└─ "));

        let (index, body) = front_matter_of(&dir.path().join("docs/attributes/index.mdx"));
        assert_eq!(
            index["sidebar_class_name"].as_str(),
            Some("sidebar-main-category")
        );
        assert_eq!(index["sidebar_level"].as_u64(), Some(1));
        assert!(!index.contains_key("customProps"));
        assert_eq!(body, "# Attributes\n");

        let stale = fs::read_to_string(dir.path().join("docs/stale.mdx")).unwrap();
        assert_eq!(stale, "Body\n");
    }

    #[test]
    fn dry_run_without_output_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let summary = run_in(dir.path(), true, None).execute().unwrap();
        assert_eq!(summary.processed, 3);
        let child = fs::read_to_string(dir.path().join("docs/attributes/1025.mdx")).unwrap();
        assert_eq!(child, "---\ntitle: has title\n---\n# has title\n");
    }

    #[test]
    fn dry_run_output_mirrors_documents() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let output = dir.path().join("preview");
        run_in(dir.path(), true, Some(output.clone())).execute().unwrap();
        let (preview, _) = front_matter_of(&output.join("attributes/1025.mdx"));
        assert_eq!(preview["sidebar_label"].as_str(), Some("has title"));
        let original = fs::read_to_string(dir.path().join("docs/attributes/1025.mdx")).unwrap();
        assert!(!original.contains("sidebar_label"));
    }

    #[test]
    fn missing_single_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let mut run = run_in(dir.path(), false, None);
        run.single_dir = Some("nowhere".to_string());
        assert!(run.execute().is_err());
    }
}
