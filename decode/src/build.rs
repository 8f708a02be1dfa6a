//! Incremental construction of the submission tree.

use serde_json::{Map, Value, json};
use tracing::debug;

use nested_form_core::Node;

use crate::error::{DecodeError, Result};
use crate::path::{DecodeOptions, is_index, parse_key};

/// Builds the intermediate [`Node`] tree from one submission's flat fields.
///
/// Fields are applied in input order; segments within one key are applied
/// in order. Missing intermediate levels are created as empty branches on
/// first access. A field whose value is a pre-populated default list is
/// normalized to a sequence the moment a later key addresses an index into
/// it, growing with empty placeholders until the index is reachable.
///
/// Submitting the same path twice keeps the last value — a client-data
/// anomaly, logged but not fatal.
///
/// # Examples
///
/// ```
/// use nested_form_decode::{DecodeOptions, TreeBuilder};
/// use serde_json::json;
///
/// let options = DecodeOptions::new();
/// let mut builder = TreeBuilder::new(&options);
/// builder.insert("root[address][city]", json!("New York")).unwrap();
/// builder.insert("name", json!("John Doe")).unwrap();
///
/// let root = builder.finish();
/// let children = root.as_branch().unwrap();
/// assert!(children.contains_key("address"));
/// assert!(children.contains_key("name"));
/// ```
pub struct TreeBuilder<'a> {
    options: &'a DecodeOptions,
    root: Node,
}

impl<'a> TreeBuilder<'a> {
    /// Creates a builder with an empty root branch.
    pub fn new(options: &'a DecodeOptions) -> Self {
        Self {
            options,
            root: Node::branch(),
        }
    }

    /// Applies one submitted field to the tree.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<()> {
        let segments = parse_key(key, self.options)?;
        let Some((last, walk)) = segments.split_last() else {
            return Ok(());
        };

        let mut node = &mut self.root;
        for (depth, segment) in walk.iter().enumerate() {
            let following = walk.get(depth + 1).unwrap_or(last);
            node = step(node, segment, is_index(following), &segments[..depth])?;
        }
        place(node, last, value, walk)
    }

    /// Consumes the builder and returns the root branch.
    pub fn finish(self) -> Node {
        self.root
    }
}

/// Descends one segment, creating the child if missing.
fn step<'n>(
    node: &'n mut Node,
    segment: &str,
    following_is_index: bool,
    walked: &[String],
) -> Result<&'n mut Node> {
    promote(node);
    match node {
        Node::Branch(children) => Ok(children
            .entry(segment.to_string())
            .or_insert_with(Node::branch)),
        Node::Seq(items) => {
            let index = parse_list_index(segment, walked)?;
            while items.len() <= index {
                // Grown slots take the shape the rest of the path implies.
                items.push(if following_is_index {
                    Node::seq()
                } else {
                    Node::branch()
                });
            }
            Ok(&mut items[index])
        }
        Node::Leaf(_) => unreachable!("leaves are promoted to containers before descent"),
    }
}

/// Sets the terminal segment to a leaf holding `value`.
fn place(node: &mut Node, segment: &str, value: Value, walked: &[String]) -> Result<()> {
    promote(node);
    match node {
        Node::Branch(children) => {
            if children
                .insert(segment.to_string(), Node::Leaf(value))
                .is_some()
            {
                debug!(segment, "duplicate path in submission; keeping the last value");
            }
            Ok(())
        }
        Node::Seq(items) => {
            let index = parse_list_index(segment, walked)?;
            while items.len() <= index {
                items.push(Node::Leaf(empty_like(&value)));
            }
            items[index] = Node::Leaf(value);
            Ok(())
        }
        Node::Leaf(_) => unreachable!("leaves are promoted to containers before placement"),
    }
}

/// Turns a leaf into the container the walk needs to continue through it.
///
/// Structured values (pre-populated defaults) keep their content; a scalar
/// in the way of a deeper path loses to the later write, consistent with
/// the exact-path duplicate rule.
fn promote(node: &mut Node) {
    if let Node::Leaf(value) = node {
        *node = match std::mem::take(value) {
            structured @ (Value::Array(_) | Value::Object(_)) => Node::from_value(structured),
            previous => {
                debug!(%previous, "descending through a scalar leaf; replacing it with an object");
                Node::branch()
            }
        };
    }
}

fn parse_list_index(segment: &str, walked: &[String]) -> Result<usize> {
    if !is_index(segment) {
        return Err(DecodeError::MalformedIndex {
            path: walked.join("."),
            segment: segment.to_string(),
        });
    }
    segment.parse().map_err(|_| DecodeError::MalformedIndex {
        path: walked.join("."),
        segment: segment.to_string(),
    })
}

/// An empty value of the same JSON type, used to pad grown list slots.
fn empty_like(value: &Value) -> Value {
    match value {
        Value::String(_) => Value::String(String::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
        Value::Number(number) if number.is_f64() => json!(0.0),
        Value::Number(_) => json!(0),
        Value::Bool(_) => Value::Bool(false),
        Value::Null => Value::Null,
    }
}
