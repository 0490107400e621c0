//! Child-index paths into element trees.
//!
//! An address is the list of child indices from the top-level list down to a
//! node: `[]` names the top-level list itself, `[2]` its third element,
//! `[2, 0]` the first child of that element, and so on. Every lookup is
//! bounds-checked; a stale address yields `None` rather than a panic.

use super::Element;

/// Root-to-node path of child indices.
pub type Address = Vec<usize>;

/// Node at `address`, or `None` when the address is empty or out of range.
pub fn element_at<'a>(tree: &'a [Element], address: &[usize]) -> Option<&'a Element> {
    let (&first, rest) = address.split_first()?;
    let mut node = tree.get(first)?;
    for &idx in rest {
        node = node.children().get(idx)?;
    }
    Some(node)
}

/// Mutable node at `address`.
pub fn element_at_mut<'a>(tree: &'a mut [Element], address: &[usize]) -> Option<&'a mut Element> {
    let (&first, rest) = address.split_first()?;
    let mut node = tree.get_mut(first)?;
    for &idx in rest {
        node = node.children.as_mut()?.get_mut(idx)?;
    }
    Some(node)
}

/// Child list designated by `address`: the top-level list for `[]`,
/// otherwise the children of the node at `address` (empty when it has none).
pub fn children_at<'a>(tree: &'a [Element], address: &[usize]) -> Option<&'a [Element]> {
    if address.is_empty() {
        return Some(tree);
    }
    element_at(tree, address).map(Element::children)
}

/// Mutable child list designated by `address`, created on demand.
pub fn children_at_mut<'a>(tree: &'a mut Vec<Element>, address: &[usize]) -> Option<&'a mut Vec<Element>> {
    if address.is_empty() {
        return Some(tree);
    }
    element_at_mut(tree, address).map(Element::children_mut)
}

/// Replace the children of the node at `address`.
///
/// Returns `false` when the address does not resolve.
pub fn splice_children(tree: &mut Vec<Element>, address: &[usize], children: Vec<Element>) -> bool {
    match children_at_mut(tree, address) {
        Some(slot) => {
            *slot = children;
            true
        }
        None => false,
    }
}

/// Address of child `index` under `parent`.
#[inline]
pub fn child(parent: &[usize], index: usize) -> Address {
    let mut addr = Vec::with_capacity(parent.len() + 1);
    addr.extend_from_slice(parent);
    addr.push(index);
    addr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Props;

    fn leaf(key: &str) -> Element {
        Element::new("text", key, Props::new())
    }

    fn sample() -> Vec<Element> {
        vec![
            leaf("a"),
            Element::new("fragment", "f", Props::new()).with_children(vec![
                leaf("f1"),
                Element::new("form", "g", Props::new()).with_children(vec![leaf("g1")]),
            ]),
        ]
    }

    #[test]
    fn test_element_at_walks_path() {
        let tree = sample();
        assert_eq!(element_at(&tree, &[0]).map(|e| e.key.as_str()), Some("a"));
        assert_eq!(element_at(&tree, &[1, 1, 0]).map(|e| e.key.as_str()), Some("g1"));
    }

    #[test]
    fn test_element_at_out_of_range() {
        let tree = sample();
        assert!(element_at(&tree, &[]).is_none());
        assert!(element_at(&tree, &[5]).is_none());
        assert!(element_at(&tree, &[0, 0]).is_none());
        assert!(element_at(&tree, &[1, 9]).is_none());
    }

    #[test]
    fn test_children_at_root_and_leaf() {
        let tree = sample();
        assert_eq!(children_at(&tree, &[]).map(<[Element]>::len), Some(2));
        assert_eq!(children_at(&tree, &[0]).map(<[Element]>::len), Some(0));
        assert_eq!(children_at(&tree, &[1]).map(<[Element]>::len), Some(2));
        assert!(children_at(&tree, &[3]).is_none());
    }

    #[test]
    fn test_splice_children() {
        let mut tree = sample();
        assert!(splice_children(&mut tree, &[1], vec![leaf("new")]));
        let keys: Vec<_> = tree[1].children().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["new"]);

        assert!(!splice_children(&mut tree, &[7], vec![]));
    }

    #[test]
    fn test_child_address() {
        assert_eq!(child(&[], 3), vec![3]);
        assert_eq!(child(&[1, 2], 0), vec![1, 2, 0]);
    }
}
