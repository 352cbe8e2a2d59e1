//! Syntax tree
//!
//! Nodes live in a [`NodeArena`] and link to their children through
//! `first`/`last` and to their following sibling through `next`. There is
//! no parent link; a node belongs to at most one child list.

use super::props::{PropKind, PropValue, PropertyContainer};
use super::token::TokenType;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a function appears in its enclosing code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRole {
    Statement,
    Expression,
    /// A named function expression standing where a statement is expected
    ExpressionStatement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionData {
    pub name: Option<String>,
    pub role: FunctionRole,
    pub params: Vec<String>,
    /// The body uses `eval`, `arguments` or `with`
    pub requires_activation: bool,
    /// The body refers to `this`
    pub check_this: bool,
}

impl FunctionData {
    pub fn new(name: Option<String>, role: FunctionRole) -> Self {
        Self {
            name,
            role,
            params: Vec::new(),
            requires_activation: false,
            check_this: false,
        }
    }
}

/// Payload carried by a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Generic,
    /// Raw literal text of a number
    Number(String),
    /// Identifier name, or raw text of a string or regexp literal
    String(String),
    Function(Box<FunctionData>),
}

#[derive(Debug, Clone)]
pub struct Node {
    ty: TokenType,
    pub datum: Option<TokenType>,
    pub line: u32,
    pub kind: NodeKind,
    first: Option<NodeId>,
    last: Option<NodeId>,
    next: Option<NodeId>,
    pub props: PropertyContainer,
}

impl Node {
    pub fn new(ty: TokenType, line: u32) -> Self {
        Self::with_kind(ty, None, line, NodeKind::Generic)
    }

    pub fn with_datum(ty: TokenType, datum: Option<TokenType>, line: u32) -> Self {
        Self::with_kind(ty, datum, line, NodeKind::Generic)
    }

    pub fn with_kind(ty: TokenType, datum: Option<TokenType>, line: u32, kind: NodeKind) -> Self {
        Self {
            ty,
            datum,
            line,
            kind,
            first: None,
            last: None,
            next: None,
            props: PropertyContainer::new(),
        }
    }

    pub fn ty(&self) -> TokenType {
        self.ty
    }

    /// Datum when present, otherwise the type
    pub fn op(&self) -> TokenType {
        self.datum.unwrap_or(self.ty)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    pub fn last(&self) -> Option<NodeId> {
        self.last
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn has_children(&self) -> bool {
        self.first.is_some()
    }

    /// Literal text or identifier name
    pub fn data(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Number(s) | NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn function(&self) -> Option<&FunctionData> {
        match &self.kind {
            NodeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionData> {
        match &mut self.kind {
            NodeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn put_prop(&mut self, kind: PropKind, value: impl Into<PropValue>) {
        self.props.put(kind, value);
    }
}

/// Storage for every node of one tree
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            arena: self,
            next: self.get(parent).first,
        }
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).count()
    }

    /// The `n`th child of `parent`
    pub fn child(&self, parent: NodeId, n: usize) -> Option<NodeId> {
        self.children(parent).nth(n)
    }

    pub fn add_child_to_back(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.get(child).next.is_none());
        match self.get(parent).last {
            Some(last) => self.get_mut(last).next = Some(child),
            None => self.get_mut(parent).first = Some(child),
        }
        self.get_mut(parent).last = Some(child);
    }

    pub fn add_child_to_front(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.get(child).next.is_none());
        let first = self.get(parent).first;
        self.get_mut(child).next = first;
        let node = self.get_mut(parent);
        node.first = Some(child);
        if node.last.is_none() {
            node.last = Some(child);
        }
    }

    /// Insert `child` directly after `after`, which must be a child of `parent`
    pub fn add_child_after(&mut self, parent: NodeId, child: NodeId, after: NodeId) {
        debug_assert!(self.get(child).next.is_none());
        let next = self.get(after).next;
        self.get_mut(child).next = next;
        self.get_mut(after).next = Some(child);
        if self.get(parent).last == Some(after) {
            self.get_mut(parent).last = Some(child);
        }
    }

    fn child_before(&self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let mut prev = None;
        for id in self.children(parent) {
            if id == child {
                return prev;
            }
            prev = Some(id);
        }
        None
    }

    /// Unlink `child` from `parent`. Returns false when it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.children(parent).any(|id| id == child) {
            return false;
        }
        let next = self.get(child).next;
        let prev = self.child_before(parent, child);
        match prev {
            Some(prev) => self.get_mut(prev).next = next,
            None => self.get_mut(parent).first = next,
        }
        if self.get(parent).last == Some(child) {
            self.get_mut(parent).last = prev;
        }
        self.get_mut(child).next = None;
        true
    }

    /// Put `new_child` in the place of `old`. Returns false when `old` was not a child.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new_child: NodeId) -> bool {
        if !self.children(parent).any(|id| id == old) {
            return false;
        }
        let prev = self.child_before(parent, old);
        let next = self.get(old).next;
        self.get_mut(new_child).next = next;
        match prev {
            Some(prev) => self.get_mut(prev).next = Some(new_child),
            None => self.get_mut(parent).first = Some(new_child),
        }
        if self.get(parent).last == Some(old) {
            self.get_mut(parent).last = Some(new_child);
        }
        self.get_mut(old).next = None;
        true
    }

    /// Copy a single node: type, datum, line, payload and properties.
    /// The copy has no children and no sibling.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let src = self.get(id);
        let copy = Node {
            ty: src.ty,
            datum: src.datum,
            line: src.line,
            kind: src.kind.clone(),
            first: None,
            last: None,
            next: None,
            props: src.props.clone(),
        };
        self.alloc(copy)
    }

    /// Indented dump of the tree shape: types, data and function names.
    ///
    /// Lines and properties are left out so two parses of equivalent text
    /// compare equal.
    pub fn to_string_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.dump(root, 0, &mut out);
        out
    }

    fn dump(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.get(id);
        let _ = write!(out, "{}{}", "  ".repeat(depth), node.ty.name());
        if let Some(datum) = node.datum {
            let _ = write!(out, " {}", datum.name());
        }
        match &node.kind {
            NodeKind::Generic => {}
            NodeKind::Number(text) | NodeKind::String(text) => {
                let _ = write!(out, " {text}");
            }
            NodeKind::Function(f) => {
                let _ = write!(
                    out,
                    " {}({})",
                    f.name.as_deref().unwrap_or(""),
                    f.params.join(",")
                );
            }
        }
        out.push('\n');
        for child in self.children(id) {
            self.dump(child, depth + 1, out);
        }
    }
}

/// Iterator over a node's children in order
pub struct Children<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.arena.get(id).next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(arena: &mut NodeArena, text: &str) -> NodeId {
        arena.alloc(Node::with_kind(TokenType::Name, None, 1, NodeKind::String(text.into())))
    }

    #[test]
    fn test_append_updates_last() {
        let mut arena = NodeArena::new();
        let block = arena.alloc(Node::new(TokenType::Block, 1));
        let a = name(&mut arena, "a");
        let b = name(&mut arena, "b");

        arena.add_child_to_back(block, a);
        assert_eq!(arena.get(block).first(), Some(a));
        assert_eq!(arena.get(block).last(), Some(a));

        arena.add_child_to_back(block, b);
        assert_eq!(arena.get(block).last(), Some(b));
        assert_eq!(arena.get(a).next(), Some(b));
        assert_eq!(arena.get(b).next(), None);
    }

    #[test]
    fn test_remove_first_promotes_next() {
        let mut arena = NodeArena::new();
        let block = arena.alloc(Node::new(TokenType::Block, 1));
        let ids: Vec<NodeId> = ["a", "b", "c"].iter().map(|t| name(&mut arena, t)).collect();
        for id in &ids {
            arena.add_child_to_back(block, *id);
        }

        assert!(arena.remove_child(block, ids[0]));
        assert_eq!(arena.get(block).first(), Some(ids[1]));
        assert_eq!(arena.get(ids[0]).next(), None);

        assert!(arena.remove_child(block, ids[2]));
        assert_eq!(arena.get(block).last(), Some(ids[1]));
        assert_eq!(arena.get(ids[1]).next(), None);

        assert!(!arena.remove_child(block, ids[2]));
        assert!(arena.remove_child(block, ids[1]));
        assert_eq!(arena.get(block).first(), None);
        assert_eq!(arena.get(block).last(), None);
    }

    #[test]
    fn test_front_after_and_replace() {
        let mut arena = NodeArena::new();
        let block = arena.alloc(Node::new(TokenType::Block, 1));
        let a = name(&mut arena, "a");
        let b = name(&mut arena, "b");
        let c = name(&mut arena, "c");
        let d = name(&mut arena, "d");

        arena.add_child_to_front(block, b);
        arena.add_child_to_front(block, a);
        arena.add_child_after(block, c, b);
        assert_eq!(arena.children(block).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(arena.get(block).last(), Some(c));

        assert!(arena.replace_child(block, c, d));
        assert_eq!(arena.get(block).last(), Some(d));
        assert!(arena.replace_child(block, a, c));
        assert_eq!(arena.children(block).collect::<Vec<_>>(), vec![c, b, d]);
    }

    #[test]
    fn test_clone_is_shallow() {
        let mut arena = NodeArena::new();
        let block = arena.alloc(Node::new(TokenType::Block, 4));
        let a = name(&mut arena, "a");
        arena.add_child_to_back(block, a);
        arena.get_mut(block).put_prop(PropKind::EndLine, 9i64);

        let copy = arena.clone_node(block);
        assert_eq!(arena.get(copy).ty(), TokenType::Block);
        assert_eq!(arena.get(copy).line, 4);
        assert_eq!(arena.get(copy).first(), None);
        assert_eq!(arena.get(copy).props.get_int(PropKind::EndLine), Some(9));

        arena.get_mut(copy).put_prop(PropKind::EndLine, 10i64);
        assert_eq!(arena.get(block).props.get_int(PropKind::EndLine), Some(9));
    }

    #[test]
    fn test_tree_dump() {
        let mut arena = NodeArena::new();
        let script = arena.alloc(Node::new(TokenType::Script, 1));
        let stmt = arena.alloc(Node::new(TokenType::ExprStatement, 1));
        let a = name(&mut arena, "a");
        arena.add_child_to_back(stmt, a);
        arena.add_child_to_back(script, stmt);
        assert_eq!(arena.to_string_tree(script), "SCRIPT\n  EXPR_STATEMENT\n    NAME a\n");
    }
}
