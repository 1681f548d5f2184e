//! `isbdm convert`: transpile a tree of HTML pages into MDX documents.

use crate::batch::{self, Outcome, Summary};
use anyhow::{Context, Result};
use isbdm_babel::{transpile, DocumentContext, TranspileOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertRun {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub recursive: bool,
    pub jobs: usize,
    pub extension: String,
    pub options: TranspileOptions,
}

impl ConvertRun {
    /// Convert every page. Only an uncreatable destination root is an error.
    pub fn execute(&self) -> Result<Summary> {
        fs::create_dir_all(&self.dest_root).with_context(|| {
            format!(
                "Failed to create destination directory {}",
                self.dest_root.display()
            )
        })?;
        if !self.source_root.is_dir() {
            tracing::warn!(
                "Source directory {} does not exist",
                self.source_root.display()
            );
        }

        let pages = batch::find_files(&self.source_root, "html", self.recursive)?;
        tracing::info!(
            "Converting {} pages from {} to {}",
            pages.len(),
            self.source_root.display(),
            self.dest_root.display()
        );
        let outcomes = batch::run(&pages, self.jobs, |page| self.convert_page(page))?;
        Ok(Summary::from_outcomes(&outcomes))
    }

    fn convert_page(&self, page: &Path) -> Outcome {
        tracing::info!("Processing {}", page.display());
        let html = match fs::read(page) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::error!("Failed to read {}: {}", page.display(), err);
                return Outcome::Failed;
            }
        };
        let document = document_context(page, &self.source_root);
        let converted = match transpile(&html, &document, &self.options) {
            Ok(converted) => converted,
            Err(err) => {
                tracing::error!("Failed to convert {}: {}", page.display(), err);
                return Outcome::Failed;
            }
        };

        let target = target_path(page, &self.source_root, &self.dest_root, &self.extension);
        if let Some(parent) = target.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::error!("Failed to create {}: {}", parent.display(), err);
                return Outcome::Failed;
            }
        }
        match fs::write(&target, converted.text) {
            Ok(()) => {
                tracing::debug!("Wrote {}", target.display());
                Outcome::Processed
            }
            Err(err) => {
                tracing::error!("Failed to write {}: {}", target.display(), err);
                Outcome::Failed
            }
        }
    }
}

/// File name and subdirectory of a page relative to the source root.
pub fn document_context(page: &Path, source_root: &Path) -> DocumentContext {
    let file_name = page
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let subdirectory = page
        .strip_prefix(source_root)
        .ok()
        .and_then(Path::parent)
        .map(slash_path);
    DocumentContext::new(file_name, subdirectory)
}

/// `dest_root/<relative path>` with the extension replaced.
pub fn target_path(page: &Path, source_root: &Path, dest_root: &Path, extension: &str) -> PathBuf {
    let relative = page
        .strip_prefix(source_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| page.file_name().map(PathBuf::from).unwrap_or_default());
    dest_root.join(relative).with_extension(extension)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_of_nested_page() {
        let context = document_context(
            Path::new("/site/docs/attributes/1025.html"),
            Path::new("/site/docs"),
        );
        assert_eq!(
            context,
            DocumentContext::new("1025.html", Some("attributes".to_string()))
        );
    }

    #[test]
    fn context_of_root_page_has_no_subdirectory() {
        let context = document_context(Path::new("/site/docs/index.html"), Path::new("/site/docs"));
        assert_eq!(context, DocumentContext::new("index.html", None));
    }

    #[test]
    fn target_mirrors_relative_path() {
        let target = target_path(
            Path::new("/site/docs/statements/1234.HTML"),
            Path::new("/site/docs"),
            Path::new("/out"),
            "mdx",
        );
        assert_eq!(target, PathBuf::from("/out/statements/1234.mdx"));
    }
}
