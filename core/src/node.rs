//! The intermediate tree built from a flat form submission.

use indexmap::IndexMap;
use serde_json::Value;

/// A node in the tree a submission decodes into.
///
/// The builder only ever produces branches and leaves; sequences appear when
/// a pre-populated default list is normalized during building, or when
/// reconciliation converts an index-keyed branch. Branch children keep
/// first-insertion order, which survives all the way into the final
/// [`serde_json::Value`] output.
///
/// # Examples
///
/// ```
/// use nested_form_core::Node;
/// use serde_json::json;
///
/// let mut root = Node::branch();
/// if let Node::Branch(children) = &mut root {
///     children.insert("name".to_string(), Node::leaf(json!("Al")));
/// }
/// assert!(root.as_branch().is_some_and(|c| c.contains_key("name")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered mapping from path segment to child node.
    Branch(IndexMap<String, Node>),
    /// Ordered list of children, produced by normalization/reconciliation.
    Seq(Vec<Node>),
    /// A scalar or pre-structured value taken directly from a submitted field.
    Leaf(Value),
}

impl Node {
    /// Creates an empty branch.
    pub fn branch() -> Self {
        Node::Branch(IndexMap::new())
    }

    /// Creates an empty sequence.
    pub fn seq() -> Self {
        Node::Seq(Vec::new())
    }

    /// Creates a leaf holding `value`.
    pub fn leaf(value: impl Into<Value>) -> Self {
        Node::Leaf(value.into())
    }

    /// Converts a structured value into the equivalent node tree.
    ///
    /// Objects become branches (order preserved), arrays become sequences,
    /// and everything else becomes a leaf. Used to normalize pre-populated
    /// defaults so they reconcile under the same rules as built branches.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_form_core::Node;
    /// use serde_json::json;
    ///
    /// let node = Node::from_value(json!({"hobbies": ["chess"]}));
    /// let children = node.as_branch().unwrap();
    /// assert!(matches!(children["hobbies"], Node::Seq(_)));
    /// ```
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Branch(
                map.into_iter()
                    .map(|(key, child)| (key, Node::from_value(child)))
                    .collect(),
            ),
            Value::Array(items) => Node::Seq(items.into_iter().map(Node::from_value).collect()),
            other => Node::Leaf(other),
        }
    }

    /// Returns the branch children, if this node is a branch.
    pub fn as_branch(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Branch(children) => Some(children),
            _ => None,
        }
    }

    /// Returns the sequence items, if this node is a sequence.
    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the leaf value, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Leaf(value) => Some(value),
            _ => None,
        }
    }
}
