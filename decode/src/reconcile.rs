//! Conversion of index-keyed branches into ordered sequences.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use nested_form_core::Node;

use crate::error::{DecodeError, Result};
use crate::path::is_index;

/// Recursively resolves the list/object ambiguity in a built tree.
///
/// A non-empty branch whose keys are all decimal digits becomes an array in
/// ascending index order; any other branch stays an object with its
/// insertion order intact. Sequences pass through element-wise (an already
/// reconciled tree reconciles to itself), and structured leaf values carried
/// in from pre-populated defaults are normalized under the same rules, so
/// arbitrarily deep object/list combinations resolve in one pass.
///
/// Fails with [`DecodeError::AmbiguousStructure`] when sibling keys mix
/// indexes and names, and with [`DecodeError::IndexGap`] when indexes are
/// not contiguous from zero.
///
/// # Examples
///
/// ```
/// use nested_form_decode::{DecodeOptions, TreeBuilder, reconcile};
/// use serde_json::json;
///
/// let options = DecodeOptions::new();
/// let mut builder = TreeBuilder::new(&options);
/// builder.insert("root[hobbies][1]", json!("reading")).unwrap();
/// builder.insert("root[hobbies][0]", json!("walking")).unwrap();
///
/// let tree = reconcile(builder.finish()).unwrap();
/// assert_eq!(tree, json!({"hobbies": ["walking", "reading"]}));
/// ```
pub fn reconcile(node: Node) -> Result<Value> {
    reconcile_node(node, &mut Vec::new())
}

fn reconcile_node(node: Node, path: &mut Vec<String>) -> Result<Value> {
    match node {
        Node::Leaf(value) => match value {
            // Structured defaults get the same index-keyed normalization
            // as built branches.
            structured @ (Value::Array(_) | Value::Object(_)) => {
                reconcile_node(Node::from_value(structured), path)
            }
            scalar => Ok(scalar),
        },
        Node::Seq(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                path.push(index.to_string());
                out.push(reconcile_node(item, path)?);
                path.pop();
            }
            Ok(Value::Array(out))
        }
        Node::Branch(children) => {
            if !children.is_empty() && children.keys().all(|key| is_index(key)) {
                reconcile_indexed(children, path)
            } else if children.keys().any(|key| is_index(key)) {
                Err(DecodeError::AmbiguousStructure {
                    path: path.join("."),
                })
            } else {
                let mut out = Map::new();
                for (key, child) in children {
                    path.push(key.clone());
                    let value = reconcile_node(child, path)?;
                    path.pop();
                    out.insert(key, value);
                }
                Ok(Value::Object(out))
            }
        }
    }
}

/// Reconciles an all-digit-keyed branch into an array.
fn reconcile_indexed(children: IndexMap<String, Node>, path: &mut Vec<String>) -> Result<Value> {
    let mut entries = Vec::with_capacity(children.len());
    for (key, child) in children {
        let index: usize = key.parse().map_err(|_| DecodeError::MalformedIndex {
            path: path.join("."),
            segment: key.clone(),
        })?;
        entries.push((index, child));
    }
    entries.sort_by_key(|(index, _)| *index);

    let mut out = Vec::with_capacity(entries.len());
    for (expected, (index, child)) in entries.into_iter().enumerate() {
        if index != expected {
            return Err(DecodeError::IndexGap {
                path: path.join("."),
                expected,
                found: index,
            });
        }
        path.push(index.to_string());
        out.push(reconcile_node(child, path)?);
        path.pop();
    }
    Ok(Value::Array(out))
}
