use crate::common::raw_rows;
use isbdm_babel::{reconstruct, render_prefix, BabelError};

#[test]
fn test_middle_sibling_with_child() {
    let entries = reconstruct(
        raw_rows(&[
            ("parent", 0),
            ("first", 1),
            ("middle", 1),
            ("child", 2),
            ("last", 1),
        ]),
        1,
    )
    .unwrap();

    let siblings: Vec<bool> = [1, 2, 4].iter().map(|&i| entries[i].is_last_sibling).collect();
    assert_eq!(siblings, vec![false, false, true]);
    assert!(entries[2].has_children);
    assert!(!entries[1].has_children);

    let child = &entries[3];
    assert_eq!(child.absolute_depth, 3);
    assert_eq!(child.ancestor_is_last, vec![entries[0].is_last_sibling, false]);
    assert_eq!(child.ancestor_is_last[1], entries[2].is_last_sibling);
    assert!(child.is_last_sibling);
}

#[test]
fn test_prefixes_of_a_section() {
    let entries = reconstruct(
        raw_rows(&[("index", 0), ("a", 1), ("a1", 2), ("a2", 2), ("b", 1)]),
        1,
    )
    .unwrap();
    let prefixes: Vec<Option<String>> = entries.iter().map(|e| e.prefix()).collect();
    assert_eq!(
        prefixes,
        vec![
            None,
            Some("├─ ".to_string()),
            Some("   ├─ ".to_string()),
            Some("   └─ ".to_string()),
            Some("└─ ".to_string()),
        ]
    );
}

#[test]
fn test_prefix_edge_cases() {
    assert_eq!(render_prefix(1, true, &[]), None);
    assert_eq!(render_prefix(2, true, &[]), Some("└─ ".to_string()));
    assert_eq!(render_prefix(3, false, &[false]), Some("│  ├─ ".to_string()));
    assert_eq!(render_prefix(3, true, &[]), Some("   └─ ".to_string()));
}

#[test]
fn test_base_depth_shifts_every_entry() {
    let entries = reconstruct(raw_rows(&[("a", 0), ("b", 1)]), 2).unwrap();
    assert_eq!(entries[0].absolute_depth, 2);
    assert_eq!(entries[1].absolute_depth, 3);
    assert_eq!(entries[1].ancestor_is_last.len(), 2);
}

#[test]
fn test_zero_depth_is_rejected() {
    let result = reconstruct(raw_rows(&[("a", 0)]), 0);
    assert!(matches!(result, Err(BabelError::InvalidDepth { depth: 0, .. })));
}

#[test]
fn test_empty_section() {
    assert!(reconstruct(Vec::new(), 1).unwrap().is_empty());
}
