//! Sidebar display metadata and its front-matter keys.

use super::cache::SidebarMatch;
use super::NavEntry;
use serde_yaml::{Mapping, Number, Value};

pub const SIDEBAR_LABEL: &str = "sidebar_label";
pub const SIDEBAR_LEVEL: &str = "sidebar_level";
pub const SIDEBAR_POSITION: &str = "sidebar_position";
pub const SIDEBAR_CLASS_NAME: &str = "sidebar_class_name";
pub const CUSTOM_PROPS: &str = "customProps";
pub const SIDEBAR_PREFIX: &str = "sidebar_prefix";

/// Display metadata derived from one sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarMetadata {
    pub label: String,
    pub level: usize,
    pub position: usize,
    pub class_name: Option<String>,
    pub prefix: Option<String>,
}

impl SidebarMetadata {
    /// Metadata for `entry`. Main category pages carry `category_class` and never a prefix.
    pub fn for_entry(entry: &NavEntry, is_main_category: bool, category_class: &str) -> Self {
        let prefix = if !is_main_category && entry.absolute_depth >= 2 {
            entry.prefix()
        } else {
            None
        };
        Self {
            label: entry.label.clone(),
            level: entry.absolute_depth,
            position: entry.position,
            class_name: is_main_category.then(|| category_class.to_string()),
            prefix,
        }
    }

    /// Metadata for a matched document, warning when a main category page sits at a depth other
    /// than its section's configured index depth.
    pub fn for_match(found: &SidebarMatch<'_>, is_main_category: bool, category_class: &str) -> Self {
        if is_main_category
            && i64::try_from(found.entry.absolute_depth).ok() != Some(found.index_document_depth)
        {
            tracing::warn!(
                "Main category '{}' has depth {} but section '{}' expects {}",
                found.entry.normalized_key,
                found.entry.absolute_depth,
                found.section,
                found.index_document_depth
            );
        }
        Self::for_entry(found.entry, is_main_category, category_class)
    }
}

/// Update the sidebar keys of a front-matter map.
///
/// With metadata, the label, level and position are set, and the class name and prefix are set or
/// removed. A class name is only removed when it equals `category_class`. Without metadata, every
/// managed key is removed. An emptied `customProps` map is dropped.
pub fn apply_sidebar_metadata(
    front_matter: &mut Mapping,
    metadata: Option<&SidebarMetadata>,
    category_class: &str,
) {
    match metadata {
        Some(meta) => {
            front_matter.insert(key(SIDEBAR_LABEL), Value::String(meta.label.clone()));
            front_matter.insert(key(SIDEBAR_LEVEL), number(meta.level));
            front_matter.insert(key(SIDEBAR_POSITION), number(meta.position));

            match &meta.class_name {
                Some(class) => {
                    front_matter.insert(key(SIDEBAR_CLASS_NAME), Value::String(class.clone()));
                }
                None => {
                    let is_category = front_matter
                        .get(SIDEBAR_CLASS_NAME)
                        .and_then(Value::as_str)
                        .is_some_and(|class| class == category_class);
                    if is_category {
                        front_matter.shift_remove(SIDEBAR_CLASS_NAME);
                    }
                }
            }

            if !front_matter.get(CUSTOM_PROPS).is_some_and(Value::is_mapping) {
                front_matter.insert(key(CUSTOM_PROPS), Value::Mapping(Mapping::new()));
            }
            if let Some(Value::Mapping(props)) = front_matter.get_mut(CUSTOM_PROPS) {
                match &meta.prefix {
                    Some(prefix) => {
                        props.insert(key(SIDEBAR_PREFIX), Value::String(prefix.clone()));
                    }
                    None => {
                        props.shift_remove(SIDEBAR_PREFIX);
                    }
                }
            }
        }
        None => {
            for managed in [
                SIDEBAR_LABEL,
                SIDEBAR_LEVEL,
                SIDEBAR_POSITION,
                SIDEBAR_CLASS_NAME,
            ] {
                front_matter.shift_remove(managed);
            }
            if let Some(Value::Mapping(props)) = front_matter.get_mut(CUSTOM_PROPS) {
                props.shift_remove(SIDEBAR_PREFIX);
            }
        }
    }

    let empty_props = front_matter
        .get(CUSTOM_PROPS)
        .and_then(Value::as_mapping)
        .is_some_and(Mapping::is_empty);
    if empty_props {
        front_matter.shift_remove(CUSTOM_PROPS);
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn number(value: usize) -> Value {
    Value::Number(Number::from(value as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY: &str = "menu-item--sidebar-category-page";

    fn entry(depth: usize, is_last: bool, ancestors: Vec<bool>) -> NavEntry {
        NavEntry {
            source_reference: "attributes/index.html#3".into(),
            normalized_key: "attributes/1022".into(),
            label: "has extent".into(),
            original_href: "1022.html".into(),
            absolute_depth: depth,
            position: 3,
            is_last_sibling: is_last,
            ancestor_is_last: ancestors,
            has_children: false,
        }
    }

    fn yaml(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_for_entry_prefix_rules() {
        let nested = entry(3, true, vec![false, true]);
        let meta = SidebarMetadata::for_entry(&nested, false, CATEGORY);
        assert_eq!(meta.prefix.as_deref(), Some("│  └─ "));
        assert_eq!(meta.class_name, None);

        let category = SidebarMetadata::for_entry(&nested, true, CATEGORY);
        assert_eq!(category.prefix, None);
        assert_eq!(category.class_name.as_deref(), Some(CATEGORY));

        let top = SidebarMetadata::for_entry(&entry(1, true, vec![]), false, CATEGORY);
        assert_eq!(top.prefix, None);
    }

    #[test]
    fn test_apply_sets_keys_and_keeps_others() {
        let mut fm = yaml("title: Extent\ncustomProps:\n  other: 1\n");
        let meta = SidebarMetadata::for_entry(&entry(2, false, vec![true]), false, CATEGORY);
        apply_sidebar_metadata(&mut fm, Some(&meta), CATEGORY);

        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Extent"));
        assert_eq!(fm.get(SIDEBAR_LABEL).and_then(Value::as_str), Some("has extent"));
        assert_eq!(fm.get(SIDEBAR_LEVEL).and_then(Value::as_u64), Some(2));
        assert_eq!(fm.get(SIDEBAR_POSITION).and_then(Value::as_u64), Some(3));
        let props = fm.get(CUSTOM_PROPS).and_then(Value::as_mapping).unwrap();
        assert_eq!(props.get(SIDEBAR_PREFIX).and_then(Value::as_str), Some("├─ "));
        assert_eq!(props.get("other").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn test_apply_removes_stale_category_class_only() {
        let meta = SidebarMetadata::for_entry(&entry(1, true, vec![]), false, CATEGORY);

        let mut stale = yaml(&format!("sidebar_class_name: {CATEGORY}\n"));
        apply_sidebar_metadata(&mut stale, Some(&meta), CATEGORY);
        assert!(stale.get(SIDEBAR_CLASS_NAME).is_none());
        assert!(stale.get(CUSTOM_PROPS).is_none());

        let mut custom = yaml("sidebar_class_name: my-own-class\n");
        apply_sidebar_metadata(&mut custom, Some(&meta), CATEGORY);
        assert_eq!(
            custom.get(SIDEBAR_CLASS_NAME).and_then(Value::as_str),
            Some("my-own-class")
        );
    }

    #[test]
    fn test_apply_without_match_clears_managed_keys() {
        let mut fm = yaml(
            "title: Extent\nsidebar_label: x\nsidebar_level: 2\nsidebar_position: 1\n\
             sidebar_class_name: y\ncustomProps:\n  sidebar_prefix: '└─ '\n",
        );
        apply_sidebar_metadata(&mut fm, None, CATEGORY);
        assert_eq!(fm.len(), 1);
        assert!(fm.get("title").is_some());
    }
}
