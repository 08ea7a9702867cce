//! Result Tree
//!
//! Benchmark results form a tree: a [`Group`] maps names to child nodes in
//! insertion order, a leaf holds the samples of one benchmark.
//!
//! Trees are usually loaded from JSON, where an object is a group and an array
//! of numbers is a leaf. Result files written by older runners use flat keys
//! such as `"benchmarks/Loop/Sum"`; [`Group::unflatten`] turns those into
//! nested groups.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Separator between path segments in flat benchmark names
pub const PATH_SEPARATOR: char = '/';

/// Errors from building or reshaping trees
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// The same path is used both as a benchmark and as a group, or twice as a
    /// benchmark.
    #[error("Conflicting entries for path '{path}'")]
    PathConflict {
        /// Path where the conflict was found
        path: String,
    },

    /// A flat key had no non-empty segment.
    #[error("Benchmark name '{key}' has no usable path segment")]
    EmptyPath {
        /// The offending key
        key: String,
    },
}

/// Kind of a tree node, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A benchmark with samples
    Leaf,
    /// A named collection of nodes
    Group,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "benchmark"),
            NodeKind::Group => write!(f, "group"),
        }
    }
}

/// A node of the result tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Samples of one benchmark, in run order
    Leaf(Vec<f64>),
    /// Named children
    Group(Group),
}

impl Node {
    /// Kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Group(_) => NodeKind::Group,
        }
    }

    /// Number of leaves in this subtree (a leaf counts itself)
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Group(group) => group.leaf_count(),
        }
    }
}

impl From<Vec<f64>> for Node {
    fn from(samples: Vec<f64>) -> Self {
        Node::Leaf(samples)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

/// Insertion-ordered mapping from name to node.
///
/// The root of a result tree is a `Group`. Names are unique within a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    entries: Vec<(String, Node)>,
}

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(name, node);
        self
    }

    /// Insert or replace a child.
    ///
    /// A replaced child keeps its original position. Returns the previous node.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let name = name.into();
        let node = node.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, node)),
            None => {
                self.entries.push((name, node));
                None
            }
        }
    }

    /// Look up a direct child
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group has no children
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of leaves beneath this group
    pub fn leaf_count(&self) -> usize {
        self.entries.iter().map(|(_, node)| node.leaf_count()).sum()
    }

    /// Split every name containing `/` into nested groups.
    ///
    /// Groups reached through different keys are merged, so
    /// `{"a/x": [..], "a": {"y": [..]}}` becomes `a -> {x, y}`.
    pub fn unflatten(&self) -> Result<Self, TreeError> {
        let mut root = Group::new();
        for (name, node) in &self.entries {
            let node = match node {
                Node::Leaf(samples) => Node::Leaf(samples.clone()),
                Node::Group(group) => Node::Group(group.unflatten()?),
            };
            let segments = split_path(name)?;
            root.insert_path(&segments, node, name)?;
        }
        Ok(root)
    }

    /// Every leaf as a `(path, samples)` pair, in tree order.
    pub fn flatten(&self) -> Vec<(String, &[f64])> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a [f64])>) {
        for (name, node) in &self.entries {
            let path = join_path(prefix, name);
            match node {
                Node::Leaf(samples) => out.push((path, samples.as_slice())),
                Node::Group(group) => group.flatten_into(&path, out),
            }
        }
    }

    fn insert_path(&mut self, segments: &[&str], node: Node, key: &str) -> Result<(), TreeError> {
        let conflict = || TreeError::PathConflict {
            path: key.to_string(),
        };

        let Some((first, rest)) = segments.split_first() else {
            return Err(TreeError::EmptyPath {
                key: key.to_string(),
            });
        };

        if rest.is_empty() {
            return match (self.get_mut(first), node) {
                (None, node) => {
                    self.entries.push((first.to_string(), node));
                    Ok(())
                }
                (Some(Node::Group(existing)), Node::Group(incoming)) => {
                    for (name, child) in incoming.entries {
                        existing.insert_path(&[name.as_str()], child, key)?;
                    }
                    Ok(())
                }
                _ => Err(conflict()),
            };
        }

        if self.get(first).is_none() {
            self.entries
                .push((first.to_string(), Node::Group(Group::new())));
        }
        match self.get_mut(first) {
            Some(Node::Group(child)) => child.insert_path(rest, node, key),
            _ => Err(conflict()),
        }
    }
}

/// Join a parent path and a child name
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, name)
    }
}

fn split_path(key: &str) -> Result<Vec<&str>, TreeError> {
    let segments: Vec<&str> = key
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return Err(TreeError::EmptyPath {
            key: key.to_string(),
        });
    }
    Ok(segments)
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(samples) => samples.serialize(serializer),
            Node::Group(group) => group.serialize(serializer),
        }
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of samples or a map of benchmark names")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut samples = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<f64>()? {
            samples.push(value);
        }
        Ok(Node::Leaf(samples))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Node, A::Error> {
        group_from_map(map).map(Node::Group)
    }
}

fn group_from_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<Group, A::Error> {
    let mut group = Group::new();
    while let Some((name, node)) = map.next_entry::<String, Node>()? {
        if group.get(&name).is_some() {
            return Err(de::Error::custom(format!(
                "duplicate benchmark name '{}'",
                name
            )));
        }
        group.entries.push((name, node));
    }
    Ok(group)
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct GroupVisitor;

impl<'de> Visitor<'de> for GroupVisitor {
    type Value = Group;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of benchmark names")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Group, A::Error> {
        group_from_map(map)
    }
}

impl<'de> Deserialize<'de> for Group {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Group {
        Group::new()
            .with(
                "suite",
                Group::new()
                    .with("A", vec![1.0, 2.0])
                    .with("B", vec![3.0]),
            )
            .with("C", vec![4.0])
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let tree = Group::new()
            .with("zeta", vec![1.0])
            .with("alpha", vec![2.0])
            .with("mid", vec![3.0]);

        let names: Vec<_> = tree.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut tree = Group::new().with("a", vec![1.0]).with("b", vec![2.0]);
        let previous = tree.insert("a", vec![9.0]);

        assert_eq!(previous, Some(Node::Leaf(vec![1.0])));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().next(), Some(("a", &Node::Leaf(vec![9.0]))));
    }

    #[test]
    fn test_leaf_count() {
        assert_eq!(sample_tree().leaf_count(), 3);
        assert_eq!(Group::new().leaf_count(), 0);
    }

    #[test]
    fn test_unflatten_flat_keys() {
        let tree = Group::new()
            .with("benchmarks/Loop/Sum", vec![1.0])
            .with("benchmarks/Loop/Mul", vec![2.0])
            .with("benchmarks/Prime/Sieve", vec![3.0])
            .unflatten()
            .unwrap();

        let Some(Node::Group(benchmarks)) = tree.get("benchmarks") else {
            panic!("expected a group");
        };
        assert_eq!(benchmarks.len(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_unflatten_conflict() {
        let err = Group::new()
            .with("a/b", vec![1.0])
            .with("a/b/c", vec![2.0])
            .unflatten()
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::PathConflict {
                path: "a/b/c".to_string()
            }
        );

        let err = Group::new()
            .with("a/b", vec![1.0])
            .with("a", Group::new().with("b", vec![2.0]))
            .unflatten()
            .unwrap_err();
        assert!(matches!(err, TreeError::PathConflict { .. }));
    }

    #[test]
    fn test_unflatten_empty_key() {
        let err = Group::new().with("//", vec![1.0]).unflatten().unwrap_err();
        assert!(matches!(err, TreeError::EmptyPath { .. }));
    }

    #[test]
    fn test_unflatten_merges_groups() {
        let tree = Group::new()
            .with("a/x", vec![1.0])
            .with("a", Group::new().with("y", vec![2.0]));

        let unflattened = tree.unflatten().unwrap();
        let Some(Node::Group(a)) = unflattened.get("a") else {
            panic!("expected a group");
        };
        let names: Vec<_> = a.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_flatten_roundtrip() {
        let tree = sample_tree();
        let flat = tree
            .flatten()
            .into_iter()
            .fold(Group::new(), |group, (path, samples)| {
                group.with(path, samples.to_vec())
            });

        let paths: Vec<_> = flat.iter().map(|(name, _)| name).collect();
        assert_eq!(paths[0], "suite/A");
        assert_eq!(paths[2], "C");
        assert_eq!(flat.unflatten().unwrap(), tree);
    }

    #[test]
    fn test_json_preserves_document_order() {
        let json = r#"{"zeta": [1.0, 2.0], "alpha": {"inner": [3]}, "beta": []}"#;
        let tree: Group = serde_json::from_str(json).unwrap();

        let names: Vec<_> = tree.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "beta"]);
        assert_eq!(tree.get("beta"), Some(&Node::Leaf(vec![])));
        assert_eq!(tree.get("alpha").map(Node::kind), Some(NodeKind::Group));
    }

    #[test]
    fn test_json_rejects_duplicates_and_scalars() {
        assert!(serde_json::from_str::<Group>(r#"{"a": [1], "a": [2]}"#).is_err());
        assert!(serde_json::from_str::<Group>(r#"{"a": 1.0}"#).is_err());
        assert!(serde_json::from_str::<Group>(r#"[1.0]"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let tree = sample_tree();
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"{"suite":{"A":[1.0,2.0],"B":[3.0]},"C":[4.0]}"#);
        assert_eq!(serde_json::from_str::<Group>(&json).unwrap(), tree);
    }
}
