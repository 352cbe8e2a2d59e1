//! Tree construction
//!
//! The parser builds every node through [`IrBuilder`], which attaches
//! literal payloads and the annotations later passes read back.

use super::ast::{FunctionData, Node, NodeArena, NodeId, NodeKind};
use super::props::PropKind;
use super::token::TokenType;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct IrBuilder {
    arena: NodeArena,
    jumps: BTreeMap<NodeId, Vec<NodeId>>,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Write the collected `Jumps` lists and hand over the tree
    pub fn finish(mut self) -> NodeArena {
        for (target, jumps) in std::mem::take(&mut self.jumps) {
            self.arena.get_mut(target).put_prop(PropKind::Jumps, jumps);
        }
        self.arena
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.arena.add_child_to_back(parent, child);
    }

    pub fn create_leaf(&mut self, ty: TokenType, line: u32) -> NodeId {
        self.arena.alloc(Node::new(ty, line))
    }

    pub fn create_node(
        &mut self,
        ty: TokenType,
        datum: Option<TokenType>,
        line: u32,
        children: &[NodeId],
    ) -> NodeId {
        let id = self.arena.alloc(Node::with_datum(ty, datum, line));
        for &child in children {
            self.arena.add_child_to_back(id, child);
        }
        id
    }

    pub fn create_name(&mut self, name: &str, line: u32) -> NodeId {
        self.arena.alloc(Node::with_kind(
            TokenType::Name,
            None,
            line,
            NodeKind::String(name.to_string()),
        ))
    }

    pub fn create_number(&mut self, text: &str, line: u32) -> NodeId {
        let id = self.arena.alloc(Node::with_kind(
            TokenType::Number,
            None,
            line,
            NodeKind::Number(text.to_string()),
        ));
        self.mark_number(id);
        id
    }

    /// String literal; `text` keeps its quotes and escapes
    pub fn create_string(&mut self, text: &str, line: u32) -> NodeId {
        self.arena.alloc(Node::with_kind(
            TokenType::String,
            None,
            line,
            NodeKind::String(text.to_string()),
        ))
    }

    pub fn create_regexp(&mut self, text: &str, line: u32) -> NodeId {
        self.arena.alloc(Node::with_kind(
            TokenType::RegExp,
            None,
            line,
            NodeKind::String(text.to_string()),
        ))
    }

    pub fn create_primary(&mut self, datum: TokenType, line: u32) -> NodeId {
        self.arena.alloc(Node::with_datum(TokenType::Primary, Some(datum), line))
    }

    pub fn create_script(&mut self, source_name: &str, line: u32) -> NodeId {
        let id = self.create_leaf(TokenType::Script, line);
        self.arena.get_mut(id).put_prop(PropKind::SourceName, source_name);
        id
    }

    pub fn create_function(&mut self, data: FunctionData, line: u32) -> NodeId {
        self.arena.alloc(Node::with_kind(
            TokenType::Function,
            None,
            line,
            NodeKind::Function(Box::new(data)),
        ))
    }

    pub fn function_mut(&mut self, id: NodeId) -> Option<&mut FunctionData> {
        self.arena.get_mut(id).function_mut()
    }

    pub fn is_number(&self, id: NodeId) -> bool {
        self.arena.get(id).props.get_bool(PropKind::IsNumber)
    }

    fn mark_number(&mut self, id: NodeId) {
        self.arena.get_mut(id).put_prop(PropKind::IsNumber, true);
    }

    pub fn create_unary(&mut self, op: TokenType, operand: NodeId, line: u32) -> NodeId {
        let id = self.create_node(TokenType::UnaryOp, Some(op), line, &[operand]);
        if matches!(op, TokenType::Neg | TokenType::Pos | TokenType::BitNot) {
            self.mark_number(id);
        }
        id
    }

    /// `++`/`--`, prefix or postfix
    pub fn create_inc_dec(&mut self, ty: TokenType, operand: NodeId, postfix: bool, line: u32) -> NodeId {
        let id = self.create_node(ty, None, line, &[operand]);
        self.mark_number(id);
        if postfix {
            self.arena.get_mut(id).put_prop(PropKind::Postfix, true);
        }
        id
    }

    pub fn create_binary(
        &mut self,
        ty: TokenType,
        datum: Option<TokenType>,
        left: NodeId,
        right: NodeId,
        line: u32,
    ) -> NodeId {
        let numeric = match ty {
            TokenType::Sub
            | TokenType::Mul
            | TokenType::Div
            | TokenType::Mod
            | TokenType::BitOr
            | TokenType::BitXor
            | TokenType::BitAnd
            | TokenType::ShOp => true,
            TokenType::Add => self.is_number(left) && self.is_number(right),
            _ => false,
        };
        let id = self.create_node(ty, datum, line, &[left, right]);
        if numeric {
            self.mark_number(id);
        }
        id
    }

    /// Plain `=` when `op` is `None`, otherwise a compound assignment
    pub fn create_assign(&mut self, op: Option<TokenType>, target: NodeId, value: NodeId, line: u32) -> NodeId {
        let numeric = match op {
            Some(TokenType::Add) => self.is_number(target) && self.is_number(value),
            Some(_) => true,
            None => self.is_number(value),
        };
        let id = self.create_node(TokenType::Assign, op, line, &[target, value]);
        if numeric {
            self.mark_number(id);
        }
        id
    }

    pub fn create_hook(&mut self, cond: NodeId, then: NodeId, otherwise: NodeId, line: u32) -> NodeId {
        self.create_node(TokenType::Hook, None, line, &[cond, then, otherwise])
    }

    /// `Call` or `New`; calls through a plain name are marked, and
    /// `eval(...)` additionally as a special call
    pub fn create_call(&mut self, ty: TokenType, callee: NodeId, args: &[NodeId], line: u32) -> NodeId {
        let callee_name = match self.arena.get(callee) {
            node if node.ty() == TokenType::Name => node.data().map(str::to_owned),
            _ => None,
        };
        let id = self.create_node(ty, None, line, &[callee]);
        for &arg in args {
            self.arena.add_child_to_back(id, arg);
        }
        if ty == TokenType::Call {
            if let Some(name) = callee_name {
                let node = self.arena.get_mut(id);
                node.put_prop(PropKind::DirectCall, true);
                if name == "eval" {
                    node.put_prop(PropKind::SpecialCall, true);
                }
            }
        }
        id
    }

    pub fn create_prop_get(&mut self, object: NodeId, name: &str, line: u32) -> NodeId {
        let name = self.create_name(name, line);
        self.create_node(TokenType::GetProp, None, line, &[object, name])
    }

    pub fn create_elem_get(&mut self, object: NodeId, index: NodeId, line: u32) -> NodeId {
        self.create_node(TokenType::GetElem, None, line, &[object, index])
    }

    /// `break` or `continue` bound to `target`
    pub fn create_jump(&mut self, ty: TokenType, label: Option<&str>, target: NodeId, line: u32) -> NodeId {
        let id = self.create_leaf(ty, line);
        if let Some(label) = label {
            let name = self.create_name(label, line);
            self.arena.add_child_to_back(id, name);
            self.arena.get_mut(id).put_prop(PropKind::Label, label);
        }
        self.arena.get_mut(id).put_prop(PropKind::Target, target);
        self.jumps.entry(target).or_default().push(id);
        id
    }

    pub fn create_label(&mut self, name: &str, line: u32) -> NodeId {
        let id = self.create_leaf(TokenType::Label, line);
        let name_node = self.create_name(name, line);
        self.arena.add_child_to_back(id, name_node);
        self.arena.get_mut(id).put_prop(PropKind::Label, name);
        id
    }

    /// Record the case list and default clause on a finished switch
    pub fn close_switch(&mut self, switch: NodeId) {
        let mut cases = Vec::new();
        let mut default = None;
        for child in self.arena.children(switch).skip(1) {
            match self.arena.get(child).ty() {
                TokenType::Case => cases.push(child),
                TokenType::Default => default = Some(child),
                _ => {}
            }
        }
        let node = self.arena.get_mut(switch);
        node.put_prop(PropKind::Cases, cases);
        if let Some(default) = default {
            node.put_prop(PropKind::Default, default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_annotations() {
        let mut ir = IrBuilder::new();
        let one = ir.create_number("1", 1);
        let two = ir.create_number("2", 1);
        let sum = ir.create_binary(TokenType::Add, None, one, two, 1);
        assert!(ir.is_number(sum));

        let s = ir.create_string("'a'", 1);
        let concat = ir.create_binary(TokenType::Add, None, sum, s, 1);
        assert!(!ir.is_number(concat));

        let x = ir.create_name("x", 1);
        let neg = ir.create_unary(TokenType::Neg, x, 1);
        assert!(ir.is_number(neg));
    }

    #[test]
    fn test_call_annotations() {
        let mut ir = IrBuilder::new();
        let eval = ir.create_name("eval", 1);
        let arg = ir.create_string("'1'", 1);
        let call = ir.create_call(TokenType::Call, eval, &[arg], 1);
        let props = &ir.node(call).props;
        assert!(props.get_bool(PropKind::DirectCall));
        assert!(props.get_bool(PropKind::SpecialCall));
        assert_eq!(ir.arena().child_count(call), 2);

        let obj = ir.create_name("o", 1);
        let callee = ir.create_prop_get(obj, "f", 1);
        let call = ir.create_call(TokenType::Call, callee, &[], 1);
        assert!(!ir.node(call).props.get_bool(PropKind::DirectCall));
    }

    #[test]
    fn test_jumps_collected_on_finish() {
        let mut ir = IrBuilder::new();
        let lp = ir.create_leaf(TokenType::While, 1);
        let brk = ir.create_jump(TokenType::Break, None, lp, 2);
        let cont = ir.create_jump(TokenType::Continue, None, lp, 3);
        let arena = ir.finish();
        assert_eq!(arena.get(lp).props.get_nodes(PropKind::Jumps), &[brk, cont]);
        assert_eq!(arena.get(brk).props.get_node(PropKind::Target), Some(lp));
    }
}
