//! Tests for the filtered view builder.

use super::*;
use crate::model::{EntryId, EntryKind};
use proptest::prelude::*;

// ===== Test Helpers =====

fn e(id: &str, level: usize) -> LogEntry {
    LogEntry::new(EntryId::new(id).unwrap(), level, EntryKind::Element).with_field("name", id)
}

fn id(s: &str) -> EntryId {
    EntryId::new(s).unwrap()
}

fn expanded(ids: &[&str]) -> ExpandedSet {
    ids.iter().map(|s| id(s)).collect()
}

fn abc() -> Arc<Vec<LogEntry>> {
    Arc::new(vec![e("A", 0), e("B", 1), e("C", 1)])
}

/// A two-level tree:
/// ```text
/// run
///   task1
///     click
///     type_text
///   task2
///     click
/// other
/// ```
fn task_tree() -> Arc<Vec<LogEntry>> {
    Arc::new(vec![
        e("run", 0),
        e("task1", 1),
        e("click-1", 2),
        e("type_text", 2),
        e("task2", 1),
        e("click-2", 2),
        e("other", 0),
    ])
}

fn view(entries: &Arc<Vec<LogEntry>>, exp: &ExpandedSet, filter: &str) -> Vec<String> {
    let ancestry = AncestryIndex::build(entries);
    build_filtered_view(entries, &ancestry, exp, filter)
        .ids()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ===== Unfiltered =====

#[test]
fn empty_entries_give_empty_view() {
    let entries = Arc::new(Vec::new());
    assert!(view(&entries, &ExpandedSet::new(), "").is_empty());
    assert!(view(&entries, &ExpandedSet::new(), "x").is_empty());
}

#[test]
fn nothing_expanded_shows_only_roots() {
    assert_eq!(view(&abc(), &ExpandedSet::new(), ""), vec!["A"]);
}

#[test]
fn expanding_root_shows_children() {
    assert_eq!(view(&abc(), &expanded(&["A"]), ""), vec!["A", "B", "C"]);
}

#[test]
fn collapse_is_sticky_over_descendant_state() {
    // task1 is expanded but run is not: task1's children stay hidden.
    let entries = task_tree();
    assert_eq!(
        view(&entries, &expanded(&["task1", "task2"]), ""),
        vec!["run", "other"]
    );
}

#[test]
fn nested_expansion_reveals_only_expanded_branches() {
    let entries = task_tree();
    assert_eq!(
        view(&entries, &expanded(&["run", "task2"]), ""),
        vec!["run", "task1", "task2", "click-2", "other"]
    );
}

#[test]
fn rows_report_children_and_expand_state() {
    let entries = abc();
    let ancestry = AncestryIndex::build(&entries);
    let result = build_filtered_view(&entries, &ancestry, &expanded(&["A"]), "");
    let rows = result.rows();
    assert!(rows[0].has_children);
    assert!(rows[0].expanded);
    assert!(!rows[1].has_children);
    assert!(!rows[2].expanded);
}

#[test]
fn unknown_expanded_ids_are_ignored() {
    assert_eq!(view(&abc(), &expanded(&["nope"]), ""), vec!["A"]);
}

// ===== Filtered =====

#[test]
fn filter_shows_match_and_forces_ancestors() {
    assert_eq!(view(&abc(), &ExpandedSet::new(), "C"), vec!["A", "C"]);
}

#[test]
fn filter_forces_deep_ancestor_chain_without_mutating_expanded() {
    let entries = task_tree();
    let exp = ExpandedSet::new();
    assert_eq!(
        view(&entries, &exp, "type_"),
        vec!["run", "task1", "type_text"]
    );
    assert!(exp.is_empty(), "Filtering must not alter the expanded set");
}

#[test]
fn filter_with_multiple_matches_shares_ancestors() {
    let entries = task_tree();
    assert_eq!(
        view(&entries, &ExpandedSet::new(), "click"),
        vec!["run", "task1", "click-1", "task2", "click-2"]
    );
}

#[test]
fn filter_match_on_ancestor_does_not_show_nonmatching_children() {
    let entries = task_tree();
    assert_eq!(
        view(&entries, &expanded(&["run", "task1"]), "task1"),
        vec!["run", "task1"]
    );
}

#[test]
fn filter_without_matches_is_empty() {
    assert!(view(&task_tree(), &ExpandedSet::new(), "zzz").is_empty());
}

#[test]
fn filter_is_case_sensitive() {
    assert!(view(&abc(), &ExpandedSet::new(), "c").is_empty());
}

#[test]
fn forced_ancestors_report_expanded() {
    let entries = abc();
    let ancestry = AncestryIndex::build(&entries);
    let result = build_filtered_view(&entries, &ancestry, &ExpandedSet::new(), "C");
    assert!(result.rows()[0].expanded, "Ancestor of a match is shown open");
    assert!(!result.rows()[1].expanded);
}

#[test]
fn stale_ancestry_fails_open() {
    // Ancestry built for a shorter sequence: unknown entries behave like roots.
    let entries = task_tree();
    let ancestry = AncestryIndex::build(&entries[..2]);
    let result = leave_only_filtered_expanded_entries(&entries, &ancestry, &ExpandedSet::new(), "click");
    assert_eq!(result.ids(), vec!["click-1", "click-2"]);
}

#[test]
fn first_row_at_or_after_maps_source_index_to_row() {
    let entries = task_tree();
    let result = leave_only_expanded_entries(&entries, &expanded(&["run"]));
    // rows: run(0) task1(1) task2(4) other(6)
    assert_eq!(result.first_row_at_or_after(0), 0);
    assert_eq!(result.first_row_at_or_after(2), 2);
    assert_eq!(result.first_row_at_or_after(5), 3);
    assert_eq!(result.first_row_at_or_after(7), 4);
}

// ===== Property-based tests =====

/// Reference ancestor computation straight from the definition.
fn naive_ancestors(entries: &[LogEntry], i: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut level = entries[i].level();
    for j in (0..i).rev() {
        if entries[j].level() < level {
            out.push(j);
            level = entries[j].level();
        }
    }
    out
}

fn arb_tree() -> impl Strategy<Value = (Vec<LogEntry>, Vec<bool>, Vec<bool>)> {
    prop::collection::vec(0usize..5, 0..40).prop_flat_map(|levels| {
        let n = levels.len();
        (
            Just(levels),
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec(prop::bool::weighted(0.2), n),
        )
            .prop_map(|(levels, expand, hit)| {
                let entries = levels
                    .iter()
                    .enumerate()
                    .map(|(i, &l)| {
                        let name = if hit[i] { format!("hit-{i}") } else { format!("e-{i}") };
                        LogEntry::new(id(&format!("id{i}")), l, EntryKind::Element)
                            .with_field("name", name)
                    })
                    .collect();
                (entries, expand, hit)
            })
    })
}

proptest! {
    #[test]
    fn prop_unfiltered_visible_iff_all_ancestors_expanded((entries, expand, _) in arb_tree()) {
        let exp: ExpandedSet = entries
            .iter()
            .zip(&expand)
            .filter(|(_, x)| **x)
            .map(|(e, _)| e.id().clone())
            .collect();
        let entries = Arc::new(entries);
        let ancestry = AncestryIndex::build(&entries);
        let result = build_filtered_view(&entries, &ancestry, &exp, "");
        let shown: Vec<usize> = result.rows().iter().map(|r| r.source_index).collect();

        let expected: Vec<usize> = (0..entries.len())
            .filter(|&i| naive_ancestors(&entries, i).iter().all(|&a| expand[a]))
            .collect();
        prop_assert_eq!(shown, expected);
    }

    #[test]
    fn prop_filtered_rows_match_or_have_matching_descendant((entries, expand, hit) in arb_tree()) {
        let exp: ExpandedSet = entries
            .iter()
            .zip(&expand)
            .filter(|(_, x)| **x)
            .map(|(e, _)| e.id().clone())
            .collect();
        let entries = Arc::new(entries);
        let ancestry = AncestryIndex::build(&entries);
        let result = build_filtered_view(&entries, &ancestry, &exp, "hit-");
        let shown: Vec<usize> = result.rows().iter().map(|r| r.source_index).collect();

        let expected: Vec<usize> = (0..entries.len())
            .filter(|&i| {
                hit[i] || (0..entries.len()).any(|j| hit[j] && naive_ancestors(&entries, j).contains(&i))
            })
            .collect();
        prop_assert_eq!(shown, expected);
    }

    #[test]
    fn prop_appending_keeps_unfiltered_prefix(
        (entries, expand, _) in arb_tree(),
        cut in 0usize..40,
    ) {
        let cut = cut.min(entries.len());
        let exp: ExpandedSet = entries
            .iter()
            .zip(&expand)
            .filter(|(_, x)| **x)
            .map(|(e, _)| e.id().clone())
            .collect();
        let before = Arc::new(entries[..cut].to_vec());
        let after = Arc::new(entries);

        let old = leave_only_expanded_entries(&before, &exp);
        let new = leave_only_expanded_entries(&after, &exp);
        let old_rows: Vec<usize> = old.rows().iter().map(|r| r.source_index).collect();
        let new_prefix: Vec<usize> = new
            .rows()
            .iter()
            .map(|r| r.source_index)
            .filter(|&i| i < cut)
            .collect();
        prop_assert_eq!(old_rows, new_prefix);
    }
}
