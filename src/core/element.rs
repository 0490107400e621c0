//! Element tree nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Address;

/// Ordered property map (insertion order preserved, equality is structural).
pub type Props = serde_json::Map<String, Value>;

/// One node of the server-computed UI tree.
///
/// Invariants:
/// - `key` is unique among siblings
/// - `address`, when present, is the node's child-index path in the tree
///   it was recorded against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default)]
    pub props: Props,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Element {
    pub fn new(name: impl Into<String>, key: impl Into<String>, props: Props) -> Self {
        Self {
            name: name.into(),
            props,
            key: key.into(),
            children: None,
            address: None,
        }
    }

    /// Attach children.
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = Some(children);
        self
    }

    /// Attach the recorded address.
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Children as a slice (empty when none).
    #[inline]
    pub fn children(&self) -> &[Element] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Mutable child list, created on first use.
    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        self.children.get_or_insert_with(Vec::new)
    }

    /// Get a single prop.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }
}

/// Build a `Props` map from `(name, value)` pairs.
///
/// ```ignore
/// let props = props([("text", json!("hi")), ("open", json!(true))]);
/// ```
pub fn props<I, K>(pairs: I) -> Props
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_serializes_without_empty_optionals() {
        let el = Element::new("text", "t1", props([("text", json!("hello"))]));
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(
            json,
            json!({"name": "text", "props": {"text": "hello"}, "key": "t1"})
        );
    }

    #[test]
    fn test_element_roundtrip_keeps_children_and_address() {
        let child = Element::new("text", "c", Props::new());
        let el = Element::new("fragment", "f", props([("id", json!("f"))]))
            .with_children(vec![child])
            .with_address(vec![0, 3]);
        let json = serde_json::to_string(&el).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
        assert_eq!(back.children().len(), 1);
    }

    #[test]
    fn test_props_preserve_insertion_order() {
        let p = props([("z", json!(1)), ("a", json!(2)), ("m", json!(3))]);
        let keys: Vec<_> = p.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_props_equality_is_order_insensitive() {
        let a = props([("x", json!(1)), ("y", json!({"n": [1, 2]}))]);
        let b = props([("y", json!({"n": [1, 2]})), ("x", json!(1))]);
        assert_eq!(a, b);
    }
}
