//! Sections read from disk, combined sources and document lookup.

use crate::common::sidebar_page;
use isbdm_babel::{
    apply_sidebar_metadata, build_section, DirectoryLoader, MemoryLoader, SectionCache,
    SectionSpec, SidebarMetadata,
};
use std::fs;
use std::path::Path;

const SITE: &str = "/ISBDM/docs/";

fn seed_html(root: &Path) {
    fs::create_dir_all(root.join("intro")).unwrap();
    fs::write(
        root.join("index.html"),
        sidebar_page(&[("index.html", 0), ("intro/index.html", 0)]),
    )
    .unwrap();
    fs::write(
        root.join("intro/index.html"),
        sidebar_page(&[("index.html", 0), ("i001.html", 1), ("i002.html", 1)]),
    )
    .unwrap();
}

fn specs() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new("root_index", vec!["index.html".into()], 1, 1),
        SectionSpec::new("intro", vec!["intro/index.html".into()], 2, 2),
        SectionSpec::new("values", vec!["values/index.html".into()], 2, 2),
    ]
}

#[test]
fn test_cache_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    seed_html(dir.path());
    let cache = SectionCache::build(&specs(), &DirectoryLoader::new(dir.path()), SITE).unwrap();

    let keys: Vec<&str> = cache.keys().collect();
    assert_eq!(keys, vec!["root_index", "intro"]);
    assert!(!cache.contains("values"));
    assert_eq!(cache.index_document_depth("intro"), Some(2));

    let intro = cache.get("intro").unwrap();
    assert_eq!(intro[0].normalized_key, "intro/index");
    assert_eq!(intro[0].absolute_depth, 2);
    assert!(intro[0].has_children);
    assert_eq!(intro[2].absolute_depth, 3);
    assert_eq!(intro[2].prefix().as_deref(), Some("   └─ "));
}

#[test]
fn test_lookup_target_documents() {
    let dir = tempfile::tempdir().unwrap();
    seed_html(dir.path());
    let cache = SectionCache::build(&specs(), &DirectoryLoader::new(dir.path()), SITE).unwrap();
    let docs = dir.path().join("docs");

    let index = docs.join("index.mdx");
    let root = cache.lookup_document(&index, &docs).unwrap();
    assert_eq!(root.section, "root_index");
    assert_eq!(root.entry.position, 1);

    let scope = docs.join("intro").join("i001.mdx");
    let page = cache.lookup_document(&scope, &docs).unwrap();
    assert_eq!(page.section, "intro");
    assert_eq!(page.document, Some(scope.as_path()));
    assert_eq!(page.entry.absolute_depth, 3);
    assert_eq!(page.entry.position, 2);

    assert!(cache
        .lookup_document(&docs.join("intro").join("i999.mdx"), &docs)
        .is_none());
    assert!(cache
        .lookup_document(&docs.join("values").join("v1.mdx"), &docs)
        .is_none());
}

#[test]
fn test_absolute_hrefs_shared_between_sources() {
    let loader = MemoryLoader::new()
        .with_page(
            "a/index.html",
            sidebar_page(&[("x.html", 0), ("/ISBDM/docs/shared/y.html", 0)]),
        )
        .with_page(
            "b/index.html",
            sidebar_page(&[("/ISBDM/docs/shared/y.html", 0), ("z.html", 0)]),
        );
    let spec = SectionSpec::new(
        "combined",
        vec!["a/index.html".into(), "b/index.html".into()],
        1,
        1,
    );
    let entries = build_section(&spec, &loader, SITE).unwrap();

    let keys: Vec<&str> = entries.iter().map(|e| e.normalized_key.as_str()).collect();
    assert_eq!(keys, vec!["a/x", "shared/y", "b/z"]);
    let positions: Vec<usize> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert!(entries[2].is_last_sibling);
    assert!(!entries[1].is_last_sibling);
}

#[test]
fn test_matched_metadata_into_front_matter() {
    let dir = tempfile::tempdir().unwrap();
    seed_html(dir.path());
    let cache = SectionCache::build(&specs(), &DirectoryLoader::new(dir.path()), SITE).unwrap();

    let found = cache.lookup("intro/i002").unwrap();
    let metadata = SidebarMetadata::for_match(&found, false, "main");
    assert_eq!(metadata.level, 3);
    assert_eq!(metadata.position, 3);
    assert_eq!(metadata.prefix.as_deref(), Some("   └─ "));

    let mut front_matter = serde_yaml::Mapping::new();
    front_matter.insert("title".into(), "Structure".into());
    apply_sidebar_metadata(&mut front_matter, Some(&metadata), "main");
    assert_eq!(front_matter["sidebar_label"].as_str(), Some("i002.html"));
    assert_eq!(front_matter["sidebar_level"].as_u64(), Some(3));
    assert_eq!(
        front_matter["customProps"]["sidebar_prefix"].as_str(),
        Some("   └─ ")
    );

    let index = cache.lookup("intro/index").unwrap();
    let metadata = SidebarMetadata::for_match(&index, true, "main");
    assert_eq!(metadata.class_name.as_deref(), Some("main"));
    assert_eq!(metadata.prefix, None);
}
