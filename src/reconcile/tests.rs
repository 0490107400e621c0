use serde_json::json;

use super::*;
use crate::core::element::props;
use crate::core::{Action, Element, Op, Props, Target};
use crate::error::Error;

fn el(key: &str) -> Element {
    Element::new("text", key, props([("text", json!(key))]))
}

fn el_with(key: &str, text: &str) -> Element {
    Element::new("text", key, props([("text", json!(text))]))
}

fn parent(key: &str, children: Vec<Element>) -> Element {
    Element::new("container", key, Props::new()).with_children(children)
}

fn list(keys: &[&str]) -> Vec<Element> {
    keys.iter().map(|k| el(k)).collect()
}

fn summary(actions: &[Action]) -> Vec<(String, Vec<usize>, String)> {
    actions
        .iter()
        .map(|a| {
            (
                a.kind().to_string(),
                a.address.clone(),
                a.key().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

fn s(kind: &str, address: &[usize], key: &str) -> (String, Vec<usize>, String) {
    (kind.to_string(), address.to_vec(), key.to_string())
}

/// Replaying the diff on `old` must yield `new`.
fn assert_converges(old: &[Element], new: &[Element]) {
    let actions = reconcile(old, new, Target::App, &[]);
    let mut client = old.to_vec();
    apply(&mut client, &actions).unwrap();
    assert_eq!(client, new, "actions: {:#?}", summary(&actions));
}

// =============================================================================
// Diff
// =============================================================================

#[test]
fn test_identical_lists_produce_no_actions() {
    let tree = vec![el("a"), parent("p", vec![el("c1"), el("c2")]), el("b")];
    assert!(reconcile(&tree, &tree, Target::App, &[]).is_empty());
    assert!(reconcile(&[], &[], Target::App, &[]).is_empty());
}

#[test]
fn test_removals_run_right_to_left() {
    let actions = reconcile(&list(&["a", "b", "c"]), &[], Target::App, &[]);
    assert_eq!(
        summary(&actions),
        [s("remove", &[2], "c"), s("remove", &[1], "b"), s("remove", &[0], "a")]
    );
}

#[test]
fn test_add_only() {
    let actions = reconcile(&[], &[el("e1")], Target::App, &[]);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0], Action::add(vec![0], el("e1"), Target::App));
}

#[test]
fn test_swap_is_remove_then_add() {
    let actions = reconcile(&list(&["a", "b"]), &list(&["b", "a"]), Target::App, &[]);
    assert_eq!(summary(&actions), [s("remove", &[1], "b"), s("add", &[0], "b")]);
}

#[test]
fn test_update_only_when_props_differ() {
    let old = vec![Element::new("x", "k", props([("c", json!("x"))]))];
    let new = vec![Element::new("x", "k", props([("c", json!("y"))]))];
    let actions = reconcile(&old, &new, Target::App, &[]);

    assert_eq!(actions.len(), 1);
    match &actions[0].op {
        Op::Update { props, key } => {
            assert_eq!(key, "k");
            assert_eq!(props.get("c"), Some(&json!("y")));
        }
        other => panic!("expected update, got {other:?}"),
    }
}

#[test]
fn test_prop_order_does_not_trigger_update() {
    let old = vec![Element::new("x", "k", props([("a", json!(1)), ("b", json!(2))]))];
    let new = vec![Element::new("x", "k", props([("b", json!(2)), ("a", json!(1))]))];
    assert!(reconcile(&old, &new, Target::App, &[]).is_empty());
}

#[test]
fn test_insert_after_nearest_preceding_key() {
    let actions = reconcile(&list(&["a", "c"]), &list(&["a", "b", "c"]), Target::App, &[]);
    assert_eq!(summary(&actions), [s("add", &[1], "b")]);

    let actions = reconcile(&list(&["c"]), &list(&["x", "c"]), Target::App, &[]);
    assert_eq!(summary(&actions), [s("add", &[0], "x")]);
}

#[test]
fn test_removals_precede_placement() {
    let actions = reconcile(&list(&["a", "b", "c", "d"]), &list(&["d", "x", "b", "a"]), Target::App, &[]);
    assert_eq!(
        summary(&actions),
        [
            s("remove", &[2], "c"),
            s("remove", &[2], "d"),
            s("add", &[0], "d"),
            s("add", &[1], "x"),
            s("remove", &[3], "b"),
            s("add", &[2], "b"),
        ]
    );
}

#[test]
fn test_nested_add_uses_parent_address() {
    let old = vec![el("a"), parent("p", vec![el("c1")])];
    let new = vec![el("a"), parent("p", vec![el("c1"), el("c2")])];
    let actions = reconcile(&old, &new, Target::App, &[]);
    assert_eq!(summary(&actions), [s("add", &[1, 1], "c2")]);
}

#[test]
fn test_moved_parent_is_not_recursed() {
    let old = vec![el("a"), parent("p", vec![el("c1")])];
    let new = vec![parent("p", vec![el("c2")]), el("a")];
    let actions = reconcile(&old, &new, Target::App, &[]);
    // The re-added parent carries its new children; no nested actions follow
    assert_eq!(summary(&actions), [s("remove", &[1], "p"), s("add", &[0], "p")]);
}

#[test]
fn test_recursion_follows_new_list_order() {
    let old = vec![
        parent("p", vec![el_with("x", "1")]),
        parent("q", vec![el_with("y", "1")]),
    ];
    let new = vec![
        parent("p", vec![el_with("x", "2")]),
        parent("q", vec![el_with("y", "2")]),
    ];
    let actions = reconcile(&old, &new, Target::App, &[]);
    assert_eq!(summary(&actions), [s("update", &[0, 0], "x"), s("update", &[1, 0], "y")]);
}

#[test]
fn test_prefix_and_target_are_applied() {
    let actions = reconcile(&[el("a")], &[el_with("a", "b")], Target::Fragment, &[2, 0]);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].address, vec![2, 0, 0]);
    assert_eq!(actions[0].target, Target::Fragment);
}

// =============================================================================
// Replay convergence
// =============================================================================

#[test]
fn test_replay_converges_on_reorders() {
    assert_converges(&list(&["a", "b", "c", "d"]), &list(&["d", "x", "b", "a"]));
    assert_converges(&list(&["a", "b", "c"]), &list(&["c", "b", "a"]));
    assert_converges(&list(&["a", "b", "c"]), &list(&["b", "c", "a", "z"]));
    assert_converges(&list(&["a"]), &list(&["x", "y", "a", "z"]));
    assert_converges(&list(&["a", "b"]), &[]);
}

#[test]
fn test_replay_converges_on_nested_changes() {
    let old = vec![
        el("title"),
        parent("form", vec![el("name"), el("email"), parent("row", vec![el("ok")])]),
        el("footer"),
    ];
    let new = vec![
        el_with("title", "Edited"),
        parent(
            "form",
            vec![el("email"), el("name"), parent("row", vec![el("cancel"), el("ok")])],
        ),
        parent("extra", vec![el("e1")]),
    ];
    assert_converges(&old, &new);
}

// =============================================================================
// Key checks and patch errors
// =============================================================================

#[test]
fn test_check_unique_keys() {
    let ok = vec![el("a"), parent("p", vec![el("a")])];
    assert!(check_unique_keys(&ok, &[]).is_ok());

    let bad = vec![el("a"), parent("p", vec![el("c"), el("c")])];
    match check_unique_keys(&bad, &[]) {
        Err(Error::DuplicateKey { key, address }) => {
            assert_eq!(key, "c");
            assert_eq!(address, vec![1]);
        }
        other => panic!("expected duplicate key, got {other:?}"),
    }
}

#[test]
fn test_patch_rejects_key_mismatch() {
    let mut tree = list(&["a", "b"]);
    let err = apply(&mut tree, &[Action::remove(vec![0], "b", Target::App)]).unwrap_err();
    assert!(matches!(err, PatchError::KeyMismatch { .. }));
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_patch_rejects_bad_addresses() {
    let mut tree = list(&["a"]);
    let err = apply(&mut tree, &[Action::add(vec![5], el("x"), Target::App)]).unwrap_err();
    assert_eq!(
        err,
        PatchError::OutOfRange {
            address: vec![5],
            index: 5,
            len: 1
        }
    );

    let err = apply(&mut tree, &[Action::update(vec![3, 0], Props::new(), "x", Target::App)]).unwrap_err();
    assert_eq!(err, PatchError::Unresolved(vec![3, 0]));

    let err = apply(&mut tree, &[Action::remove(vec![], "a", Target::App)]).unwrap_err();
    assert_eq!(err, PatchError::EmptyAddress { kind: "remove" });
}

#[test]
fn test_patch_set_and_markers() {
    let mut tree = list(&["a"]);
    let actions = [
        Action::marker(Op::FreshBoundary, Target::App),
        Action::set(vec![0], el_with("b", "new"), Target::App),
        Action::marker(Op::Last, Target::App),
    ];
    apply(&mut tree, &actions).unwrap();
    assert_eq!(tree, vec![el_with("b", "new")]);
}
