//! Per-node property bag

use super::ast::NodeId;
use std::sync::Arc;

/// Keys a node can carry. One value per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    SourceName,
    EndLine,
    /// Label name on a Label node, or on a jump that names one
    Label,
    /// Statement a break or continue transfers to
    Target,
    /// Jumps that transfer to this statement
    Jumps,
    Cases,
    Default,
    EnclosingFunction,
    Functions,
    Vars,
    Uses,
    LocalCount,
    IsNumber,
    DirectCall,
    SpecialCall,
    Postfix,
    Comments,
    TrailingComments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Str(Arc<str>),
    Node(NodeId),
    Nodes(Arc<[NodeId]>),
    Strings(Arc<[String]>),
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(Arc::from(v))
    }
}

impl From<NodeId> for PropValue {
    fn from(v: NodeId) -> Self {
        PropValue::Node(v)
    }
}

impl From<Vec<NodeId>> for PropValue {
    fn from(v: Vec<NodeId>) -> Self {
        PropValue::Nodes(Arc::from(v))
    }
}

impl From<Vec<String>> for PropValue {
    fn from(v: Vec<String>) -> Self {
        PropValue::Strings(Arc::from(v))
    }
}

/// Insertion-ordered map from [`PropKind`] to [`PropValue`].
///
/// Cloning copies the entries; list payloads are shared slices and are
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyContainer {
    entries: Vec<(PropKind, PropValue)>,
}

impl PropertyContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `kind`, replacing any previous value
    pub fn put(&mut self, kind: PropKind, value: impl Into<PropValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((kind, value)),
        }
    }

    pub fn get(&self, kind: PropKind) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| *k == kind).map(|(_, v)| v)
    }

    pub fn contains(&self, kind: PropKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn remove(&mut self, kind: PropKind) -> Option<PropValue> {
        let idx = self.entries.iter().position(|(k, _)| *k == kind)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropKind, &PropValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_bool(&self, kind: PropKind) -> bool {
        matches!(self.get(kind), Some(PropValue::Bool(true)))
    }

    pub fn get_int(&self, kind: PropKind) -> Option<i64> {
        match self.get(kind)? {
            PropValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, kind: PropKind) -> Option<&str> {
        match self.get(kind)? {
            PropValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_node(&self, kind: PropKind) -> Option<NodeId> {
        match self.get(kind)? {
            PropValue::Node(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_nodes(&self, kind: PropKind) -> &[NodeId] {
        match self.get(kind) {
            Some(PropValue::Nodes(v)) => v,
            _ => &[],
        }
    }

    pub fn get_strings(&self, kind: PropKind) -> &[String] {
        match self.get(kind) {
            Some(PropValue::Strings(v)) => v,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut props = PropertyContainer::new();
        props.put(PropKind::LocalCount, 3i64);
        assert_eq!(props.get_int(PropKind::LocalCount), Some(3));

        props.put(PropKind::LocalCount, 5i64);
        assert_eq!(props.get_int(PropKind::LocalCount), Some(5));
        assert_eq!(props.len(), 1);

        assert_eq!(props.remove(PropKind::LocalCount), Some(PropValue::Int(5)));
        assert!(props.get(PropKind::LocalCount).is_none());
        assert!(props.remove(PropKind::LocalCount).is_none());
    }

    #[test]
    fn test_enumerates_each_key_once() {
        let mut props = PropertyContainer::new();
        props.put(PropKind::IsNumber, true);
        props.put(PropKind::SourceName, "a.js");
        props.put(PropKind::IsNumber, false);
        props.put(PropKind::Vars, vec!["x".to_string()]);

        let keys: Vec<PropKind> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![PropKind::IsNumber, PropKind::SourceName, PropKind::Vars]);
        assert!(!props.get_bool(PropKind::IsNumber));
    }

    #[test]
    fn test_clone_shares_lists() {
        let mut props = PropertyContainer::new();
        props.put(PropKind::Uses, vec!["a".to_string(), "b".to_string()]);
        let mut copy = props.clone();
        copy.put(PropKind::Postfix, true);

        assert_eq!(copy.get_strings(PropKind::Uses), props.get_strings(PropKind::Uses));
        assert!(!props.contains(PropKind::Postfix));
        match (props.get(PropKind::Uses), copy.get(PropKind::Uses)) {
            (Some(PropValue::Strings(a)), Some(PropValue::Strings(b))) => {
                assert!(Arc::ptr_eq(a, b))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_typed_getters_ignore_other_types() {
        let mut props = PropertyContainer::new();
        props.put(PropKind::Label, "outer");
        assert_eq!(props.get_str(PropKind::Label), Some("outer"));
        assert_eq!(props.get_int(PropKind::Label), None);
        assert!(props.get_nodes(PropKind::Jumps).is_empty());
    }
}
