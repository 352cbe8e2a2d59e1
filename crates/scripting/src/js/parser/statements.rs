//! Statement grammar

use super::{LabelEntry, Parser, TargetKind};
use crate::js::ast::{FunctionData, FunctionRole, NodeId};
use crate::js::messages::{Expected, Msg};
use crate::js::token::TokenType;
use jscrunch_core::Result;

impl<'a> Parser<'a> {
    /// One statement. `top` is true directly inside a script or function body.
    pub(super) fn statement(&mut self, top: bool) -> Result<NodeId> {
        let comments = self.take_leading_comments();
        let labels = std::mem::take(&mut self.pending_labels);
        let stmt = match self.current.ty {
            TokenType::Function => {
                let role = if top {
                    FunctionRole::Statement
                } else {
                    FunctionRole::ExpressionStatement
                };
                self.function(role)?
            }
            TokenType::LC => self.block("block")?,
            TokenType::Var => {
                let var = self.variables(false)?;
                self.auto_semicolon()?;
                var
            }
            TokenType::Semi => {
                let line = self.advance()?.line;
                self.ir.create_leaf(TokenType::Empty, line)
            }
            TokenType::If => self.if_statement()?,
            TokenType::While => self.while_statement(&labels)?,
            TokenType::Do => self.do_statement(&labels)?,
            TokenType::For => self.for_statement(&labels)?,
            TokenType::Break | TokenType::Continue => self.jump_statement()?,
            TokenType::Return => self.return_statement()?,
            TokenType::With => self.with_statement()?,
            TokenType::Switch => self.switch_statement()?,
            TokenType::Throw => self.throw_statement()?,
            TokenType::Try => self.try_statement()?,
            _ => self.expression_or_label(labels)?,
        };
        self.attach_comments(stmt, comments);
        Ok(stmt)
    }

    /// `{ ... }` as a Block node
    pub(super) fn block(&mut self, what: &'static str) -> Result<NodeId> {
        let line = self.consume(TokenType::LC, Expected::BraceBeforeBody(what))?.line;
        let block = self.ir.create_leaf(TokenType::Block, line);
        self.statements_until_brace(block, false)?;
        self.consume(TokenType::RC, Expected::BraceAfterBody(what))?;
        Ok(block)
    }

    /// Parse statements into `parent` up to the closing `}` or end of input
    fn statements_until_brace(&mut self, parent: NodeId, top: bool) -> Result<()> {
        while !self.check(TokenType::RC) && !self.check(TokenType::Eof) {
            let stmt = self.statement(top)?;
            self.ir.add_child(parent, stmt);
        }
        self.attach_trailing_comments(parent);
        Ok(())
    }

    /// Function declaration or expression, starting at `function`
    pub(super) fn function(&mut self, role: FunctionRole) -> Result<NodeId> {
        let line = self.advance()?.line;

        let name = match self.current.ty {
            TokenType::Name | TokenType::Reserved => Some(self.identifier(Expected::FunctionName)?.0),
            _ if role == FunctionRole::Expression => None,
            _ => return Err(self.error(Msg::Missing(Expected::FunctionName))),
        };

        self.consume(TokenType::LP, Expected::ParenAfter("function"))?;
        let mut params = Vec::new();
        if !self.check(TokenType::RP) {
            loop {
                let (param, _) = self.identifier(Expected::FormalParameter)?;
                params.push(param);
                if !self.match_token(TokenType::Comma)? {
                    break;
                }
            }
        }
        self.consume(TokenType::RP, Expected::ParenAfterParameters)?;
        let body_line = self
            .consume(TokenType::LC, Expected::BraceBeforeBody("function"))?
            .line;

        let mut data = FunctionData::new(name, role);
        data.params = params.clone();
        let function = self.ir.create_function(data, line);
        let body = self.ir.create_leaf(TokenType::Block, body_line);
        self.ir.add_child(function, body);

        let saved = self.enter_function(function, params);
        let parsed = self.statements_until_brace(body, true);
        let closed = parsed.and_then(|()| {
            self.consume(TokenType::RC, Expected::BraceAfterBody("function"))
                .map(|_| ())
        });
        self.exit_function(function, saved);
        closed?;
        Ok(function)
    }

    /// `var a = 1, b` without the terminator. `no_in` bans `in` in initializers.
    pub(super) fn variables(&mut self, no_in: bool) -> Result<NodeId> {
        let line = self.advance()?.line;
        let var = self.ir.create_leaf(TokenType::Var, line);
        loop {
            let (name, name_line) = self.identifier(Expected::VariableName)?;
            self.declare_var(&name, name_line);
            let name_node = self.ir.create_name(&name, name_line);
            if self.check(TokenType::Assign) && self.current.datum.is_none() {
                self.advance()?;
                let init = self.assignment(no_in)?;
                self.ir.add_child(name_node, init);
            }
            self.ir.add_child(var, name_node);
            if !self.match_token(TokenType::Comma)? {
                break;
            }
        }
        Ok(var)
    }

    /// Parenthesized condition of `if`, `while` and `do`
    fn condition(&mut self, keyword: &'static str) -> Result<NodeId> {
        self.consume(TokenType::LP, Expected::ParenAfter(keyword))?;
        let cond = self.expression(false)?;
        let node = self.ir.node(cond);
        if node.ty() == TokenType::Assign && node.datum.is_none() {
            let line = node.line;
            self.warn(Msg::AssignmentAsCondition, line);
        }
        self.consume(TokenType::RP, Expected::ParenAfterCondition)?;
        Ok(cond)
    }

    fn if_statement(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        let cond = self.condition("if")?;
        let then = self.statement(false)?;
        let node = self.ir.create_node(TokenType::If, None, line, &[cond, then]);
        if self.match_token(TokenType::Else)? {
            let otherwise = self.statement(false)?;
            self.ir.add_child(node, otherwise);
        }
        Ok(node)
    }

    fn while_statement(&mut self, labels: &[usize]) -> Result<NodeId> {
        let line = self.advance()?.line;
        let node = self.ir.create_leaf(TokenType::While, line);
        let cond = self.condition("while")?;
        self.push_target(node, TargetKind::Loop, labels);
        let body = self.statement(false);
        self.pop_target();
        let body = body?;
        self.ir.add_child(node, cond);
        self.ir.add_child(node, body);
        Ok(node)
    }

    fn do_statement(&mut self, labels: &[usize]) -> Result<NodeId> {
        let line = self.advance()?.line;
        let node = self.ir.create_leaf(TokenType::Do, line);
        self.push_target(node, TargetKind::Loop, labels);
        let body = self.statement(false);
        self.pop_target();
        let body = body?;
        self.consume(TokenType::While, Expected::WhileAfterDo)?;
        let cond = self.condition("while")?;
        self.match_token(TokenType::Semi)?;
        self.ir.add_child(node, body);
        self.ir.add_child(node, cond);
        Ok(node)
    }

    fn for_statement(&mut self, labels: &[usize]) -> Result<NodeId> {
        let line = self.advance()?.line;
        self.consume(TokenType::LP, Expected::ParenAfter("for"))?;

        let init = if self.check(TokenType::Semi) {
            self.ir.create_leaf(TokenType::Empty, self.current.line)
        } else if self.check(TokenType::Var) {
            self.variables(true)?
        } else {
            self.expression(true)?
        };

        let (node, header) = if self.check(TokenType::In) {
            self.check_for_in_target(init)?;
            self.advance()?;
            let object = self.expression(false)?;
            (self.ir.create_leaf(TokenType::ForIn, line), vec![init, object])
        } else {
            self.consume(TokenType::Semi, Expected::SemicolonAfterForInit)?;
            let cond = if self.check(TokenType::Semi) {
                self.ir.create_leaf(TokenType::Empty, self.current.line)
            } else {
                self.expression(false)?
            };
            self.consume(TokenType::Semi, Expected::SemicolonAfterForCondition)?;
            let update = if self.check(TokenType::RP) {
                self.ir.create_leaf(TokenType::Empty, self.current.line)
            } else {
                self.expression(false)?
            };
            (self.ir.create_leaf(TokenType::For, line), vec![init, cond, update])
        };
        self.consume(TokenType::RP, Expected::ParenAfterForControl)?;

        self.push_target(node, TargetKind::Loop, labels);
        let body = self.statement(false);
        self.pop_target();
        let body = body?;
        for part in header {
            self.ir.add_child(node, part);
        }
        self.ir.add_child(node, body);
        Ok(node)
    }

    fn check_for_in_target(&self, init: NodeId) -> Result<()> {
        let node = self.ir.node(init);
        let valid = match node.ty() {
            TokenType::Var => self.ir.arena().child_count(init) == 1,
            ty => is_assignable(ty),
        };
        if valid {
            Ok(())
        } else {
            Err(self.error_at(node.line, Msg::BadForInLeft))
        }
    }

    fn jump_statement(&mut self) -> Result<NodeId> {
        let tok = self.advance()?;
        let label = if self.check(TokenType::Name) && !self.current.newline_before {
            Some(self.advance()?.text().to_string())
        } else {
            None
        };
        let target = self.jump_target(tok.ty, label.as_deref(), tok.line)?;
        let node = self.ir.create_jump(tok.ty, label.as_deref(), target, tok.line);
        self.auto_semicolon()?;
        Ok(node)
    }

    fn return_statement(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        if !self.in_function() {
            return Err(self.error(Msg::BadReturn));
        }
        self.advance()?;
        let node = self.ir.create_leaf(TokenType::Return, line);
        if !self.check(TokenType::Semi)
            && !self.check(TokenType::RC)
            && !self.check(TokenType::Eof)
            && !self.current.newline_before
        {
            let value = self.expression(false)?;
            self.ir.add_child(node, value);
        }
        self.auto_semicolon()?;
        Ok(node)
    }

    fn with_statement(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        self.consume(TokenType::LP, Expected::ParenAfter("with"))?;
        let object = self.expression(false)?;
        self.consume(TokenType::RP, Expected::ParenAfterCondition)?;
        self.require_activation();
        let body = self.statement(false)?;
        Ok(self.ir.create_node(TokenType::With, None, line, &[object, body]))
    }

    fn switch_statement(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        let node = self.ir.create_leaf(TokenType::Switch, line);
        self.consume(TokenType::LP, Expected::ParenAfter("switch"))?;
        let discriminant = self.expression(false)?;
        self.ir.add_child(node, discriminant);
        self.consume(TokenType::RP, Expected::ParenAfterCondition)?;
        self.consume(TokenType::LC, Expected::BraceBeforeBody("switch"))?;

        self.push_target(node, TargetKind::Switch, &[]);
        let cases = self.switch_cases(node);
        self.pop_target();
        cases?;

        self.consume(TokenType::RC, Expected::BraceAfterBody("switch"))?;
        self.ir.close_switch(node);
        Ok(node)
    }

    fn switch_cases(&mut self, switch: NodeId) -> Result<()> {
        let mut seen_default = false;
        while !self.check(TokenType::RC) {
            let comments = self.take_leading_comments();
            let clause = match self.current.ty {
                TokenType::Case => {
                    let line = self.advance()?.line;
                    let test = self.expression(false)?;
                    self.consume(TokenType::Colon, Expected::ColonAfterCase)?;
                    self.ir.create_node(TokenType::Case, None, line, &[test])
                }
                TokenType::Default => {
                    if seen_default {
                        return Err(self.error(Msg::DuplicateDefault));
                    }
                    seen_default = true;
                    let line = self.advance()?.line;
                    self.consume(TokenType::Colon, Expected::ColonAfterCase)?;
                    self.ir.create_leaf(TokenType::Default, line)
                }
                TokenType::Eof => return Err(self.error(Msg::Missing(Expected::BraceAfterBody("switch")))),
                _ => return Err(self.unexpected()),
            };
            self.attach_comments(clause, comments);
            while !matches!(
                self.current.ty,
                TokenType::Case | TokenType::Default | TokenType::RC | TokenType::Eof
            ) {
                let stmt = self.statement(false)?;
                self.ir.add_child(clause, stmt);
            }
            self.ir.add_child(switch, clause);
        }
        self.attach_trailing_comments(switch);
        Ok(())
    }

    fn throw_statement(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        if self.current.newline_before {
            return Err(self.error(Msg::ThrowNewline));
        }
        let value = self.expression(false)?;
        self.auto_semicolon()?;
        Ok(self.ir.create_node(TokenType::Throw, None, line, &[value]))
    }

    fn try_statement(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        let body = self.block("try")?;
        let node = self.ir.create_node(TokenType::Try, None, line, &[body]);

        let mut handled = false;
        while self.check(TokenType::Catch) {
            let catch_line = self.advance()?.line;
            self.consume(TokenType::LP, Expected::ParenAfter("catch"))?;
            let (name, name_line) = self.identifier(Expected::CatchVariable)?;
            let catch = self.ir.create_leaf(TokenType::Catch, catch_line);
            let name_node = self.ir.create_name(&name, name_line);
            self.ir.add_child(catch, name_node);
            if self.check(TokenType::If) {
                if !self.options.version.has_catch_guards() {
                    return Err(self.error(Msg::CatchGuardUnsupported(self.options.version)));
                }
                self.advance()?;
                let guard = self.expression(false)?;
                self.ir.add_child(catch, guard);
            }
            self.consume(TokenType::RP, Expected::ParenAfterCondition)?;
            let handler = self.block("catch")?;
            self.ir.add_child(catch, handler);
            self.ir.add_child(node, catch);
            handled = true;
        }

        if self.check(TokenType::Finally) {
            let finally_line = self.advance()?.line;
            let block = self.block("finally")?;
            let finally = self.ir.create_node(TokenType::Finally, None, finally_line, &[block]);
            self.ir.add_child(node, finally);
            handled = true;
        }

        if !handled {
            return Err(self.error(Msg::MissingCatchOrFinally));
        }
        Ok(node)
    }

    /// Expression statement, or a labeled statement when a lone name is
    /// followed by `:`
    fn expression_or_label(&mut self, mut labels: Vec<usize>) -> Result<NodeId> {
        if self.check(TokenType::Reserved) {
            return Err(self.error(Msg::ReservedWord(self.current.text().to_string())));
        }
        let line = self.current.line;
        let first_name = self.check(TokenType::Name).then(|| self.current.text().to_string());
        let already_used = first_name
            .as_ref()
            .is_some_and(|name| self.scope().uses.contains(name));
        let expr = self.expression(false)?;

        if let Some(name) = first_name {
            if self.ir.node(expr).ty() == TokenType::Name && self.check(TokenType::Colon) {
                if !already_used {
                    self.scope().uses.remove(&name);
                }
                return self.labeled_statement(name, line, &mut labels);
            }
        }

        if !has_side_effects(self, expr) {
            self.warn(Msg::NoSideEffects, line);
        }
        self.auto_semicolon()?;
        Ok(self.ir.create_node(TokenType::ExprStatement, None, line, &[expr]))
    }

    fn labeled_statement(&mut self, name: String, line: u32, labels: &mut Vec<usize>) -> Result<NodeId> {
        if self.find_label(&name).is_some() {
            return Err(self.error_at(line, Msg::DuplicateLabel(name)));
        }
        self.advance()?;
        let node = self.ir.create_label(&name, line);
        self.labels.push(LabelEntry {
            name,
            node,
            looped: None,
        });
        labels.push(self.labels.len() - 1);
        self.pending_labels = std::mem::take(labels);
        let stmt = self.statement(false);
        self.labels.pop();
        let stmt = stmt?;
        self.ir.add_child(node, stmt);
        Ok(node)
    }
}

/// Whether `ty` can stand on the left of an assignment
pub(super) fn is_assignable(ty: TokenType) -> bool {
    matches!(ty, TokenType::Name | TokenType::GetProp | TokenType::GetElem)
}

fn has_side_effects(parser: &Parser<'_>, expr: NodeId) -> bool {
    let arena = parser.ir.arena();
    let node = arena.get(expr);
    match node.ty() {
        TokenType::Assign
        | TokenType::Call
        | TokenType::New
        | TokenType::Inc
        | TokenType::Dec
        | TokenType::Function => true,
        TokenType::UnaryOp => node.datum == Some(TokenType::Delete),
        TokenType::Comma => node.last().is_some_and(|last| has_side_effects(parser, last)),
        TokenType::Or | TokenType::And => {
            node.last().is_some_and(|last| has_side_effects(parser, last))
        }
        TokenType::Hook => {
            let mut branches = arena.children(expr).skip(1);
            branches.all(|b| has_side_effects(parser, b))
        }
        _ => false,
    }
}
