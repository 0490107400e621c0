//! Key-based tree diff.
//!
//! # Phases (per level)
//!
//! | Phase     | Visits                          | Emits                              |
//! |-----------|---------------------------------|------------------------------------|
//! | removal   | old-only keys, descending index | `Remove` at simulated index        |
//! | placement | new keys in new-list order      | `Remove`+`Add` (moved), `Update`, `Add` |
//! | recursion | carried keys not moved          | child actions at `address + [idx]` |
//!
//! Moves are never a dedicated action: a carried key at the wrong index is
//! removed and re-added with its new element, children included, which is
//! why moved keys are skipped during recursion.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::address::child;
use crate::core::{Action, Element, Target};
use crate::error::{Error, Result};

/// Actions turning `old` into `new` at `address`.
///
/// Both lists must have unique sibling keys; see [`check_unique_keys`].
pub fn reconcile(old: &[Element], new: &[Element], target: Target, address: &[usize]) -> Vec<Action> {
    let mut actions = Vec::new();
    diff_level(old, new, target, address, &mut actions);
    actions
}

fn diff_level(old: &[Element], new: &[Element], target: Target, address: &[usize], actions: &mut Vec<Action>) {
    let old_map: FxHashMap<&str, (usize, &Element)> =
        old.iter().enumerate().map(|(i, e)| (e.key.as_str(), (i, e))).collect();
    let new_keys: FxHashSet<&str> = new.iter().map(|e| e.key.as_str()).collect();

    // Simulated key order of the client list
    let mut current: Vec<&str> = old.iter().map(|e| e.key.as_str()).collect();

    // Phase 1: removals, right to left
    let mut removed: Vec<(usize, &str)> = old_map
        .iter()
        .filter(|(key, _)| !new_keys.contains(*key))
        .map(|(key, (idx, _))| (*idx, *key))
        .collect();
    removed.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    for (_, key) in removed {
        if let Some(idx) = position(&current, key) {
            actions.push(Action::remove(child(address, idx), key, target));
            current.remove(idx);
        }
    }

    // Phase 2: placement in new-list order
    let mut moved: FxHashSet<&str> = FxHashSet::default();
    for (target_idx, new_el) in new.iter().enumerate() {
        let key = new_el.key.as_str();
        match old_map.get(key) {
            Some(&(_, old_el)) => {
                let Some(current_idx) = position(&current, key) else {
                    continue;
                };
                let expected = target_idx.min(current.len());
                if current_idx != expected {
                    current.remove(current_idx);
                    current.insert(expected.min(current.len()), key);
                    actions.push(Action::remove(child(address, current_idx), key, target));
                    actions.push(Action::add(child(address, expected), new_el.clone(), target));
                    moved.insert(key);
                } else if old_el.props != new_el.props {
                    actions.push(Action::update(
                        child(address, current_idx),
                        new_el.props.clone(),
                        key,
                        target,
                    ));
                }
            }
            None => {
                let insert_at = new[..target_idx]
                    .iter()
                    .rev()
                    .find_map(|prev| position(&current, &prev.key))
                    .map_or(0, |idx| idx + 1);
                actions.push(Action::add(child(address, insert_at), new_el.clone(), target));
                current.insert(insert_at, key);
            }
        }
    }

    // Phase 3: recurse into carried, unmoved keys
    for new_el in new {
        let key = new_el.key.as_str();
        if moved.contains(key) {
            continue;
        }
        let Some(&(_, old_el)) = old_map.get(key) else {
            continue;
        };
        if let Some(idx) = position(&current, key) {
            diff_level(
                old_el.children(),
                new_el.children(),
                target,
                &child(address, idx),
                actions,
            );
        }
    }
}

#[inline]
fn position(current: &[&str], key: &str) -> Option<usize> {
    current.iter().position(|k| *k == key)
}

/// Fail on the first pair of siblings sharing a key, depth first.
pub fn check_unique_keys(elements: &[Element], address: &[usize]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for element in elements {
        if !seen.insert(element.key.as_str()) {
            return Err(Error::DuplicateKey {
                key: element.key.clone(),
                address: address.to_vec(),
            });
        }
    }
    for (idx, element) in elements.iter().enumerate() {
        check_unique_keys(element.children(), &child(address, idx))?;
    }
    Ok(())
}
