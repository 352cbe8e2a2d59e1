//! Source regeneration
//!
//! Walks a tree and writes JavaScript back out, either compact (no comments,
//! minimal whitespace) or expanded with the configured layout. Parentheses
//! are derived from operator precedence, not copied from the source.

mod writer;

pub use writer::SourceWriter;

use super::ast::{NodeArena, NodeId};
use super::lexer::is_line_terminator;
use super::parser::ScriptTree;
use super::props::PropKind;
use super::token::TokenType;
use jscrunch_core::LayoutOptions;
use std::borrow::Cow;

/// How to render a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompileOptions {
    pub compact: bool,
    pub layout: LayoutOptions,
    /// Write comments attached to the tree (expanded mode only)
    pub comments: bool,
}

impl DecompileOptions {
    pub fn compact() -> Self {
        Self {
            compact: true,
            layout: LayoutOptions::flat(),
            comments: false,
        }
    }

    pub fn expanded(layout: LayoutOptions) -> Self {
        Self {
            compact: false,
            layout,
            comments: false,
        }
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}

/// Render a whole script
pub fn decompile(tree: &ScriptTree, options: &DecompileOptions) -> String {
    let mut d = Decompiler::new(&tree.arena, options);
    d.statements(tree.root, 0);
    d.trailing_comments(tree.root);
    d.finish()
}

mod prec {
    pub const COMMA: u8 = 1;
    pub const ASSIGN: u8 = 2;
    pub const HOOK: u8 = 3;
    pub const OR: u8 = 4;
    pub const AND: u8 = 5;
    pub const BIT_OR: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const UNARY: u8 = 14;
    pub const POSTFIX: u8 = 15;
    pub const MEMBER: u8 = 16;
    pub const PRIMARY: u8 = 18;
}

pub(crate) struct Decompiler<'t> {
    arena: &'t NodeArena,
    w: SourceWriter,
    comments: bool,
    blank_line_before_label: bool,
    /// Inside a for-loop initializer, where a bare `in` would end it
    no_in: bool,
    /// Leftmost operand of an expression statement that must not start it
    force_paren: Option<NodeId>,
}

impl<'t> Decompiler<'t> {
    pub(crate) fn new(arena: &'t NodeArena, options: &DecompileOptions) -> Self {
        Self {
            arena,
            w: SourceWriter::new(options.layout, options.compact),
            comments: options.comments && !options.compact,
            blank_line_before_label: options.layout.blank_line_before_label,
            no_in: false,
            force_paren: None,
        }
    }

    pub(crate) fn finish(self) -> String {
        self.w.finish()
    }

    fn compact(&self) -> bool {
        self.w.is_compact()
    }

    fn ty(&self, id: NodeId) -> TokenType {
        self.arena.get(id).ty()
    }

    fn data(&self, id: NodeId) -> &'t str {
        self.arena.get(id).data().unwrap_or_default()
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.arena.children(id).collect()
    }

    // Statements

    /// Render the children of `parent` from index `skip` on as statements
    pub(crate) fn statements(&mut self, parent: NodeId, skip: usize) {
        for (i, stmt) in self.children(parent).into_iter().skip(skip).enumerate() {
            self.statement(stmt, i == 0);
        }
    }

    pub(crate) fn trailing_comments(&mut self, id: NodeId) {
        if !self.comments {
            return;
        }
        for text in self.arena.get(id).props.get_strings(PropKind::TrailingComments) {
            self.w.comment(text);
        }
    }

    fn leading_comments(&mut self, id: NodeId) {
        if !self.comments {
            return;
        }
        for text in self.arena.get(id).props.get_strings(PropKind::Comments) {
            self.w.comment(text);
        }
    }

    fn statement(&mut self, id: NodeId, first: bool) {
        self.w.newline();
        let ty = self.ty(id);
        if ty == TokenType::Label && self.blank_line_before_label && !first {
            self.w.blank_line();
        }
        self.leading_comments(id);

        match ty {
            TokenType::Function => {
                self.function(id);
                self.w.newline();
            }
            TokenType::Block => {
                self.block(id);
                self.w.newline();
            }
            TokenType::Var => {
                self.var_declarations(id);
                self.w.semicolon();
            }
            TokenType::ExprStatement => {
                if let Some(expr) = self.arena.get(id).first() {
                    let leftmost = self.leftmost(expr);
                    if matches!(self.ty(leftmost), TokenType::Function | TokenType::ObjectLit) {
                        self.force_paren = Some(leftmost);
                    }
                    self.expr(expr, prec::COMMA);
                    self.force_paren = None;
                }
                self.w.semicolon();
            }
            TokenType::Empty => self.w.hard_semicolon(),
            TokenType::If => self.if_statement(id),
            TokenType::While => {
                let parts = self.children(id);
                self.keyword_paren("while");
                self.expr(parts[0], prec::COMMA);
                self.w.token(")");
                self.body(parts[1]);
            }
            TokenType::Do => {
                let parts = self.children(id);
                self.w.token("do");
                let block = self.body(parts[0]);
                if block {
                    self.w.space();
                } else {
                    self.w.newline();
                }
                self.keyword_paren("while");
                self.expr(parts[1], prec::COMMA);
                self.w.token(")");
                self.w.semicolon();
            }
            TokenType::For => self.for_statement(id),
            TokenType::ForIn => {
                let parts = self.children(id);
                self.keyword_paren("for");
                self.for_init(parts[0]);
                self.w.token("in");
                self.expr(parts[1], prec::COMMA);
                self.w.token(")");
                self.body(parts[2]);
            }
            TokenType::Return | TokenType::Throw => {
                self.w.token(ty.text());
                if let Some(value) = self.arena.get(id).first() {
                    self.expr(value, prec::COMMA);
                }
                self.w.semicolon();
            }
            TokenType::Break | TokenType::Continue => {
                self.w.token(ty.text());
                if let Some(label) = self.arena.get(id).first() {
                    self.w.token(self.data(label));
                }
                self.w.semicolon();
            }
            TokenType::With => {
                let parts = self.children(id);
                self.keyword_paren("with");
                self.expr(parts[0], prec::COMMA);
                self.w.token(")");
                self.body(parts[1]);
            }
            TokenType::Switch => self.switch_statement(id),
            TokenType::Try => self.try_statement(id),
            TokenType::Label => {
                let parts = self.children(id);
                self.w.setback_next_line();
                self.w.token(self.data(parts[0]));
                self.w.token(":");
                self.w.newline();
                if let Some(&stmt) = parts.get(1) {
                    self.statement(stmt, true);
                }
            }
            _ => {
                // Bare expression where a statement was expected
                self.expr(id, prec::COMMA);
                self.w.semicolon();
            }
        }
    }

    /// `keyword (` with the expanded-mode space
    fn keyword_paren(&mut self, keyword: &str) {
        self.w.token(keyword);
        self.w.space();
        self.w.token("(");
    }

    fn block(&mut self, id: NodeId) {
        self.w.token("{");
        self.w.indent();
        self.block_contents(id);
    }

    /// Block in body position. Comments that preceded its `{` go inside.
    fn body_block(&mut self, id: NodeId) {
        self.w.token("{");
        self.w.indent();
        self.leading_comments(id);
        self.block_contents(id);
    }

    fn block_contents(&mut self, id: NodeId) {
        self.statements(id, 0);
        self.trailing_comments(id);
        self.w.outdent();
        self.w.newline();
        self.w.token("}");
    }

    /// Body of a compound statement. Returns true when it was a block.
    fn body(&mut self, id: NodeId) -> bool {
        if self.ty(id) == TokenType::Block {
            self.w.space();
            self.body_block(id);
            true
        } else {
            self.w.indent();
            self.statement(id, true);
            self.w.outdent();
            false
        }
    }

    fn if_statement(&mut self, id: NodeId) {
        let parts = self.children(id);
        self.keyword_paren("if");
        self.expr(parts[0], prec::COMMA);
        self.w.token(")");
        let block = self.body(parts[1]);
        if let Some(&otherwise) = parts.get(2) {
            if block {
                self.w.space();
            } else {
                self.w.newline();
            }
            self.w.token("else");
            if self.ty(otherwise) == TokenType::If {
                self.leading_comments(otherwise);
                self.w.space();
                self.if_statement(otherwise);
            } else {
                self.body(otherwise);
            }
        }
    }

    fn var_declarations(&mut self, id: NodeId) {
        self.w.token("var");
        for (i, name) in self.children(id).into_iter().enumerate() {
            if i > 0 {
                self.w.token(",");
                self.w.space();
            }
            self.w.token(self.data(name));
            if let Some(init) = self.arena.get(name).first() {
                self.w.space();
                self.w.token("=");
                self.w.space();
                self.expr(init, prec::ASSIGN);
            }
        }
    }

    /// First clause of `for` and `for-in`, where `in` must not appear bare
    fn for_init(&mut self, id: NodeId) {
        let saved = std::mem::replace(&mut self.no_in, true);
        match self.ty(id) {
            TokenType::Empty => {}
            TokenType::Var => self.var_declarations(id),
            _ => self.expr(id, prec::COMMA),
        }
        self.no_in = saved;
    }

    fn for_statement(&mut self, id: NodeId) {
        let parts = self.children(id);
        self.keyword_paren("for");
        self.for_init(parts[0]);
        for part in [parts[1], parts[2]] {
            self.w.token(";");
            if self.ty(part) != TokenType::Empty {
                self.w.space();
                self.expr(part, prec::COMMA);
            }
        }
        self.w.token(")");
        self.body(parts[3]);
    }

    fn switch_statement(&mut self, id: NodeId) {
        let parts = self.children(id);
        self.keyword_paren("switch");
        self.expr(parts[0], prec::COMMA);
        self.w.token(")");
        self.w.space();
        self.w.token("{");
        self.w.indent();
        for (i, &clause) in parts.iter().skip(1).enumerate() {
            self.w.newline();
            if self.blank_line_before_label && i > 0 {
                self.w.blank_line();
            }
            self.leading_comments(clause);
            self.w.setback_next_line();
            if self.ty(clause) == TokenType::Case {
                self.w.token("case");
                if let Some(test) = self.arena.get(clause).first() {
                    self.expr(test, prec::COMMA);
                }
                self.w.token(":");
                self.statements(clause, 1);
            } else {
                self.w.token("default");
                self.w.token(":");
                self.statements(clause, 0);
            }
        }
        self.trailing_comments(id);
        self.w.outdent();
        self.w.newline();
        self.w.token("}");
    }

    fn try_statement(&mut self, id: NodeId) {
        let parts = self.children(id);
        self.w.token("try");
        self.w.space();
        self.block(parts[0]);
        for &clause in &parts[1..] {
            self.w.space();
            if self.ty(clause) == TokenType::Catch {
                let catch = self.children(clause);
                self.keyword_paren("catch");
                self.w.token(self.data(catch[0]));
                if catch.len() == 3 {
                    self.w.token("if");
                    self.expr(catch[1], prec::COMMA);
                }
                self.w.token(")");
                self.w.space();
                if let Some(&handler) = catch.last() {
                    self.block(handler);
                }
            } else {
                self.w.token("finally");
                self.w.space();
                if let Some(block) = self.arena.get(clause).first() {
                    self.block(block);
                }
            }
        }
    }

    /// `function name(params) {...}` for statements and expressions alike
    pub(crate) fn function(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        let Some(data) = node.function() else {
            return;
        };
        self.w.token("function");
        match &data.name {
            Some(name) => self.w.token(name),
            None => self.w.space(),
        }
        self.w.token("(");
        for (i, param) in data.params.iter().enumerate() {
            if i > 0 {
                self.w.token(",");
                self.w.space();
            }
            self.w.token(param);
        }
        self.w.token(")");
        self.w.space();

        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let saved_force = self.force_paren.take();
        match node.first() {
            Some(body) => self.block(body),
            None => {
                self.w.token("{");
                self.w.token("}");
            }
        }
        self.no_in = saved_no_in;
        self.force_paren = saved_force;
    }

    // Expressions

    /// Render `id`, parenthesized when it binds looser than `min`
    fn expr(&mut self, id: NodeId, min: u8) {
        let node = self.arena.get(id);
        let is_in = node.ty() == TokenType::RelOp && node.datum == Some(TokenType::In);
        let paren = precedence(self.arena, id) < min
            || self.force_paren == Some(id)
            || (self.no_in && is_in);
        if paren {
            let saved = std::mem::replace(&mut self.no_in, false);
            self.w.token("(");
            self.expr_inner(id);
            self.w.token(")");
            self.no_in = saved;
        } else {
            self.expr_inner(id);
        }
    }

    fn expr_inner(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        let ty = node.ty();
        match ty {
            TokenType::Name => self.w.token(self.data(id)),
            TokenType::Number => self.w.number(self.data(id)),
            TokenType::String => {
                let text = self.data(id);
                if self.compact() {
                    self.w.token(&strip_line_continuations(text));
                } else {
                    self.w.token(text);
                }
            }
            TokenType::RegExp => self.w.regexp(self.data(id)),
            TokenType::Primary => self.w.token(node.op().text()),
            TokenType::Function => self.function(id),
            TokenType::ArrayLit => self.array_literal(id),
            TokenType::ObjectLit => self.object_literal(id),
            TokenType::UnaryOp => {
                self.w.token(node.op().text());
                if let Some(operand) = node.first() {
                    self.expr(operand, prec::UNARY);
                }
            }
            TokenType::Inc | TokenType::Dec => {
                let Some(operand) = node.first() else {
                    return;
                };
                if node.props.get_bool(PropKind::Postfix) {
                    self.expr(operand, prec::MEMBER);
                    self.w.token(ty.text());
                } else {
                    self.w.token(ty.text());
                    self.expr(operand, prec::MEMBER);
                }
            }
            TokenType::Assign => {
                let parts = self.children(id);
                self.expr(parts[0], prec::MEMBER);
                self.w.space();
                match node.datum {
                    Some(op) => self.w.token(&format!("{}=", op.text())),
                    None => self.w.token("="),
                }
                self.w.space();
                self.expr(parts[1], prec::ASSIGN);
            }
            TokenType::Hook => {
                let parts = self.children(id);
                self.expr(parts[0], prec::OR);
                self.w.space();
                self.w.token("?");
                self.w.space();
                self.expr(parts[1], prec::ASSIGN);
                self.w.space();
                self.w.token(":");
                self.w.space();
                self.expr(parts[2], prec::ASSIGN);
            }
            TokenType::Comma => {
                let parts = self.children(id);
                self.expr(parts[0], prec::COMMA);
                self.w.token(",");
                self.w.space();
                self.expr(parts[1], prec::ASSIGN);
            }
            TokenType::Call => {
                let parts = self.children(id);
                self.member_object(parts[0]);
                self.arguments(&parts[1..]);
            }
            TokenType::New => self.new_expr(id, false),
            TokenType::GetProp => {
                let parts = self.children(id);
                self.member_object(parts[0]);
                self.w.token(".");
                self.w.token(self.data(parts[1]));
            }
            TokenType::GetElem => {
                let parts = self.children(id);
                self.member_object(parts[0]);
                let saved = std::mem::replace(&mut self.no_in, false);
                self.w.token("[");
                self.expr(parts[1], prec::COMMA);
                self.w.token("]");
                self.no_in = saved;
            }
            _ => {
                let Some(p) = binary_precedence(ty) else {
                    return;
                };
                let parts = self.children(id);
                self.expr(parts[0], p);
                self.w.space();
                self.w.token(node.op().text());
                self.w.space();
                self.expr(parts[1], p + 1);
            }
        }
    }

    /// Object of a member access or callee of a call
    fn member_object(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        match node.ty() {
            TokenType::Number if self.data(id).bytes().all(|b| b.is_ascii_digit()) => {
                self.w.token("(");
                self.w.token(self.data(id));
                self.w.token(")");
            }
            TokenType::New if self.force_paren != Some(id) => self.new_expr(id, true),
            _ => self.expr(id, prec::MEMBER),
        }
    }

    /// `new callee(args)`. The argument list is written even when empty if
    /// `with_parens` is set, so a following member access stays outside.
    fn new_expr(&mut self, id: NodeId, with_parens: bool) {
        let parts = self.children(id);
        self.w.token("new");
        let callee = parts[0];
        if contains_call(self.arena, callee) || precedence(self.arena, callee) < prec::MEMBER {
            let saved = std::mem::replace(&mut self.no_in, false);
            self.w.token("(");
            self.expr_inner(callee);
            self.w.token(")");
            self.no_in = saved;
        } else if self.ty(callee) == TokenType::New {
            self.new_expr(callee, true);
        } else {
            self.member_object(callee);
        }
        if parts.len() > 1 || with_parens {
            self.arguments(&parts[1..]);
        }
    }

    fn arguments(&mut self, args: &[NodeId]) {
        let saved = std::mem::replace(&mut self.no_in, false);
        self.w.token("(");
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.w.token(",");
                self.w.space();
            }
            self.expr(arg, prec::ASSIGN);
        }
        self.w.token(")");
        self.no_in = saved;
    }

    fn array_literal(&mut self, id: NodeId) {
        let elements = self.children(id);
        let saved = std::mem::replace(&mut self.no_in, false);
        self.w.token("[");
        for (i, &element) in elements.iter().enumerate() {
            if i > 0 {
                self.w.token(",");
                if self.ty(element) != TokenType::Empty {
                    self.w.space();
                }
            }
            if self.ty(element) != TokenType::Empty {
                self.expr(element, prec::ASSIGN);
            }
        }
        if elements.last().is_some_and(|&e| self.ty(e) == TokenType::Empty) {
            self.w.token(",");
        }
        self.w.token("]");
        self.no_in = saved;
    }

    fn object_literal(&mut self, id: NodeId) {
        let parts = self.children(id);
        let saved = std::mem::replace(&mut self.no_in, false);
        self.w.token("{");
        for (i, pair) in parts.chunks(2).enumerate() {
            if i > 0 {
                self.w.token(",");
                self.w.space();
            }
            self.w.token(self.data(pair[0]));
            self.w.token(":");
            self.w.space();
            if let Some(&value) = pair.get(1) {
                self.expr(value, prec::ASSIGN);
            }
        }
        self.w.token("}");
        self.no_in = saved;
    }

    /// The node whose text starts the rendering of `id`
    fn leftmost(&self, id: NodeId) -> NodeId {
        let node = self.arena.get(id);
        let descend = match node.ty() {
            TokenType::Inc | TokenType::Dec => node.props.get_bool(PropKind::Postfix),
            ty => binary_precedence(ty).is_some()
                || matches!(
                    ty,
                    TokenType::Comma
                        | TokenType::Assign
                        | TokenType::Hook
                        | TokenType::Call
                        | TokenType::GetProp
                        | TokenType::GetElem
                ),
        };
        match node.first() {
            Some(first) if descend => self.leftmost(first),
            _ => id,
        }
    }
}

fn binary_precedence(ty: TokenType) -> Option<u8> {
    let p = match ty {
        TokenType::Or => prec::OR,
        TokenType::And => prec::AND,
        TokenType::BitOr => prec::BIT_OR,
        TokenType::BitXor => prec::BIT_XOR,
        TokenType::BitAnd => prec::BIT_AND,
        TokenType::EqOp => prec::EQUALITY,
        TokenType::RelOp => prec::RELATIONAL,
        TokenType::ShOp => prec::SHIFT,
        TokenType::Add | TokenType::Sub => prec::ADDITIVE,
        TokenType::Mul | TokenType::Div | TokenType::Mod => prec::MULTIPLICATIVE,
        _ => return None,
    };
    Some(p)
}

fn precedence(arena: &NodeArena, id: NodeId) -> u8 {
    let node = arena.get(id);
    match node.ty() {
        TokenType::Comma => prec::COMMA,
        TokenType::Assign => prec::ASSIGN,
        TokenType::Hook => prec::HOOK,
        TokenType::UnaryOp => prec::UNARY,
        TokenType::Inc | TokenType::Dec => {
            if node.props.get_bool(PropKind::Postfix) {
                prec::POSTFIX
            } else {
                prec::UNARY
            }
        }
        TokenType::Call | TokenType::New | TokenType::GetProp | TokenType::GetElem => prec::MEMBER,
        ty => binary_precedence(ty).unwrap_or(prec::PRIMARY),
    }
}

/// True when the member chain of a `new` callee holds a call, which would
/// otherwise take the `new`'s argument list
fn contains_call(arena: &NodeArena, id: NodeId) -> bool {
    let node = arena.get(id);
    match node.ty() {
        TokenType::Call => true,
        TokenType::GetProp | TokenType::GetElem => {
            node.first().is_some_and(|object| contains_call(arena, object))
        }
        _ => false,
    }
}

/// Drop backslash-newline pairs from a string literal
fn strip_line_continuations(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(next) if is_line_terminator(next) => {}
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::parser::{parse, ParseOptions};
    use pretty_assertions::assert_eq;

    fn tree(src: &str) -> ScriptTree {
        parse(src, &ParseOptions::default()).unwrap().tree
    }

    fn crunch(src: &str) -> String {
        decompile(&tree(src), &DecompileOptions::compact())
    }

    fn format(src: &str) -> String {
        decompile(&tree(src), &DecompileOptions::expanded(LayoutOptions::default()))
    }

    #[test]
    fn test_crunch_function() {
        assert_eq!(
            crunch("function foo( a , b ) {\n return a+b;\n}"),
            "function foo(a,b){return a+b}"
        );
    }

    #[test]
    fn test_crunch_statements() {
        assert_eq!(crunch("var a = 1;\nvar b = 2;"), "var a=1;var b=2");
        assert_eq!(crunch("if (a) { b(); } else { c(); }"), "if(a){b()}else{c()}");
        assert_eq!(crunch("if (a) b(); else c();"), "if(a)b();else c()");
        assert_eq!(crunch("while (x) ;"), "while(x);");
        assert_eq!(crunch("for (;;) {}"), "for(;;){}");
        assert_eq!(crunch("do x(); while (y)"), "do x();while(y)");
        assert_eq!(crunch("for (var k in o) f(k);"), "for(var k in o)f(k)");
    }

    #[test]
    fn test_crunch_parentheses() {
        assert_eq!(crunch("x = (a + b) * c;"), "x=(a+b)*c");
        assert_eq!(crunch("x = a + (b * c);"), "x=a+b*c");
        assert_eq!(crunch("x = a - (b - c);"), "x=a-(b-c)");
        assert_eq!(crunch("x = (a, b);"), "x=(a,b)");
        assert_eq!(crunch("x = -(-a);"), "x=- -a");
        assert_eq!(crunch("x = a + +b;"), "x=a+ +b");
        assert_eq!(crunch("(function () { go(); })();"), "(function(){go()})()");
        assert_eq!(crunch("({a: 1}).a;"), "({a:1}).a");
        assert_eq!(crunch("x = (1).toString();"), "x=(1).toString()");
        assert_eq!(crunch("x = new (f())();"), "x=new(f())");
        assert_eq!(crunch("x = (new F).y;"), "x=new F().y");
        assert_eq!(crunch("x = !(a && b);"), "x=!(a&&b)");
        assert_eq!(crunch("x = (a ? b : c) ? d : e;"), "x=(a?b:c)?d:e");
        assert_eq!(crunch("for (var i = ('a' in o); i;) {}"), "for(var i=('a'in o);i;){}");
    }

    #[test]
    fn test_crunch_literals() {
        assert_eq!(crunch("x = [1, , 2];"), "x=[1,,2]");
        assert_eq!(crunch("x = [,];"), "x=[,]");
        assert_eq!(crunch("x = {'a': 1, b: [2]};"), "x={'a':1,b:[2]}");
        assert_eq!(crunch("x = /a b/g in o;"), "x=/a b/g in o");
        assert_eq!(crunch("x = 'a\\\nb';"), "x='ab'");
        assert_eq!(crunch("x = a / /re/.source.length;"), "x=a/ /re/.source.length");
        assert_eq!(crunch("x = 1. in o;"), "x=1. in o");
        assert_eq!(crunch("x = 1. instanceof F;"), "x=1. instanceof F");
        assert_eq!(crunch("x = 1. + 2;"), "x=1.+2");
    }

    #[test]
    fn test_crunch_keywords() {
        assert_eq!(crunch("x = typeof y;"), "x=typeof y");
        assert_eq!(crunch("delete a.b;"), "delete a.b");
        assert_eq!(
            crunch("function f() { return void 0; }"),
            "function f(){return void 0}"
        );
        assert_eq!(crunch("throw new Error('x');"), "throw new Error('x')");
        assert_eq!(crunch("a: while (1) { break a; }"), "a:while(1){break a}");
    }

    #[test]
    fn test_crunch_try_switch() {
        assert_eq!(
            crunch("try { a(); } catch (e if e > 1) { b(); } catch (f) {} finally { c(); }"),
            "try{a()}catch(e if e>1){b()}catch(f){}finally{c()}"
        );
        assert_eq!(
            crunch("switch (x) { case 1: a(); break; default: b(); }"),
            "switch(x){case 1:a();break;default:b()}"
        );
    }

    #[test]
    fn test_format_layout() {
        let src = "function f(a,b){if(a){return b}else{while(a)a--}}";
        assert_eq!(
            format(src),
            "function f(a, b) {\n    if (a) {\n        return b;\n    } else {\n        while (a)\n            a--;\n    }\n}\n"
        );
    }

    #[test]
    fn test_format_switch_setback() {
        let src = "switch (x) { case 1: a(); break; default: b(); }";
        assert_eq!(
            format(src),
            "switch (x) {\n  case 1:\n    a();\n    break;\n  default:\n    b();\n}\n"
        );
    }

    #[test]
    fn test_format_blank_line_and_tabs() {
        let layout = LayoutOptions::new(0, 4, 2, true, true);
        let src = "a();\nouter: for (;;) { break outer; }";
        assert_eq!(
            decompile(&tree(src), &DecompileOptions::expanded(layout)),
            "a();\n\nouter:\nfor (;;) {\n\tbreak outer;\n}\n"
        );
    }

    #[test]
    fn test_format_keeps_comments() {
        let options = ParseOptions {
            keep_comments: true,
            ..ParseOptions::default()
        };
        let parsed = parse("// head\nvar a = 1;\nfunction f() {\n  /* inner */\n}\n", &options)
            .unwrap()
            .tree;
        let text = decompile(
            &parsed,
            &DecompileOptions::expanded(LayoutOptions::default()).with_comments(true),
        );
        assert_eq!(text, "// head\nvar a = 1;\nfunction f() {\n    /* inner */\n}\n");

        let stripped = decompile(&parsed, &DecompileOptions::expanded(LayoutOptions::flat()));
        assert_eq!(stripped, "var a = 1;\nfunction f() {\n}\n");
    }

    fn format_commented(src: &str) -> String {
        let options = ParseOptions {
            keep_comments: true,
            ..ParseOptions::default()
        };
        let parsed = parse(src, &options).unwrap().tree;
        decompile(
            &parsed,
            &DecompileOptions::expanded(LayoutOptions::default()).with_comments(true),
        )
    }

    #[test]
    fn test_format_comments_before_body_block() {
        assert_eq!(
            format_commented("while (a) // loop\n{ b(); }"),
            "while (a) {\n    // loop\n    b();\n}\n"
        );
        assert_eq!(
            format_commented("if (a) { b(); } // note\nelse { c(); }"),
            "if (a) {\n    b();\n} else {\n    // note\n    c();\n}\n"
        );
        assert_eq!(
            format_commented("for (;;) /* forever */ { x(); }"),
            "for (;;) {\n    /* forever */\n    x();\n}\n"
        );
    }

    #[test]
    fn test_format_comment_before_else_if() {
        assert_eq!(
            format_commented("if (a) { b(); } else /* c */ if (d) { e(); }"),
            "if (a) {\n    b();\n} else\n/* c */\nif (d) {\n    e();\n}\n"
        );
    }

    #[test]
    fn test_format_offset() {
        let layout = LayoutOptions::new(2, 2, 0, false, false);
        assert_eq!(
            decompile(&tree("if (a) { b(); }"), &DecompileOptions::expanded(layout)),
            "  if (a) {\n    b();\n  }\n"
        );
    }

    #[test]
    fn test_strip_line_continuations() {
        assert_eq!(strip_line_continuations("'a\\\r\nb\\n'"), "'ab\\n'");
        assert!(matches!(strip_line_continuations("'plain'"), Cow::Borrowed(_)));
    }
}
