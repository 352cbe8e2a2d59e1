//! Expression grammar, lowest precedence first

use super::statements::is_assignable;
use super::Parser;
use crate::js::ast::{FunctionRole, NodeId};
use crate::js::messages::{Expected, Msg};
use crate::js::token::TokenType;
use jscrunch_core::Result;

impl<'a> Parser<'a> {
    /// Comma expression. `no_in` keeps `in` out of for-loop initializers.
    pub(super) fn expression(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.assignment(no_in)?;
        while self.check(TokenType::Comma) {
            let line = self.advance()?.line;
            let right = self.assignment(no_in)?;
            expr = self.ir.create_node(TokenType::Comma, None, line, &[expr, right]);
        }
        Ok(expr)
    }

    pub(super) fn assignment(&mut self, no_in: bool) -> Result<NodeId> {
        let target = self.conditional(no_in)?;
        if !self.check(TokenType::Assign) {
            return Ok(target);
        }
        if !is_assignable(self.ir.node(target).ty()) {
            return Err(self.error(Msg::BadAssignLeft));
        }
        let tok = self.advance()?;
        let value = self.assignment(no_in)?;
        Ok(self.ir.create_assign(tok.datum, target, value, tok.line))
    }

    fn conditional(&mut self, no_in: bool) -> Result<NodeId> {
        let cond = self.or(no_in)?;
        if !self.check(TokenType::Hook) {
            return Ok(cond);
        }
        let line = self.advance()?.line;
        let then = self.assignment(false)?;
        self.consume(TokenType::Colon, Expected::ColonInConditional)?;
        let otherwise = self.assignment(no_in)?;
        Ok(self.ir.create_hook(cond, then, otherwise, line))
    }

    fn or(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.and(no_in)?;
        while self.check(TokenType::Or) {
            let line = self.advance()?.line;
            let right = self.and(no_in)?;
            expr = self.ir.create_binary(TokenType::Or, None, expr, right, line);
        }
        Ok(expr)
    }

    fn and(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.bit_or(no_in)?;
        while self.check(TokenType::And) {
            let line = self.advance()?.line;
            let right = self.bit_or(no_in)?;
            expr = self.ir.create_binary(TokenType::And, None, expr, right, line);
        }
        Ok(expr)
    }

    fn bit_or(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.bit_xor(no_in)?;
        while self.check(TokenType::BitOr) {
            let line = self.advance()?.line;
            let right = self.bit_xor(no_in)?;
            expr = self.ir.create_binary(TokenType::BitOr, None, expr, right, line);
        }
        Ok(expr)
    }

    fn bit_xor(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.bit_and(no_in)?;
        while self.check(TokenType::BitXor) {
            let line = self.advance()?.line;
            let right = self.bit_and(no_in)?;
            expr = self.ir.create_binary(TokenType::BitXor, None, expr, right, line);
        }
        Ok(expr)
    }

    fn bit_and(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.equality(no_in)?;
        while self.check(TokenType::BitAnd) {
            let line = self.advance()?.line;
            let right = self.equality(no_in)?;
            expr = self.ir.create_binary(TokenType::BitAnd, None, expr, right, line);
        }
        Ok(expr)
    }

    fn equality(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.relational(no_in)?;
        while self.check(TokenType::EqOp) {
            let tok = self.advance()?;
            let right = self.relational(no_in)?;
            expr = self.ir.create_binary(TokenType::EqOp, tok.datum, expr, right, tok.line);
        }
        Ok(expr)
    }

    fn relational(&mut self, no_in: bool) -> Result<NodeId> {
        let mut expr = self.shift()?;
        loop {
            let op = match self.current.ty {
                TokenType::RelOp => self.current.datum,
                TokenType::InstanceOf => Some(TokenType::InstanceOf),
                TokenType::In if !no_in => Some(TokenType::In),
                _ => break,
            };
            let line = self.advance()?.line;
            let right = self.shift()?;
            expr = self.ir.create_binary(TokenType::RelOp, op, expr, right, line);
        }
        Ok(expr)
    }

    fn shift(&mut self) -> Result<NodeId> {
        let mut expr = self.term()?;
        while self.check(TokenType::ShOp) {
            let tok = self.advance()?;
            let right = self.term()?;
            expr = self.ir.create_binary(TokenType::ShOp, tok.datum, expr, right, tok.line);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<NodeId> {
        let mut expr = self.factor()?;
        while self.check(TokenType::Add) || self.check(TokenType::Sub) {
            let tok = self.advance()?;
            let right = self.factor()?;
            expr = self.ir.create_binary(tok.ty, None, expr, right, tok.line);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<NodeId> {
        let mut expr = self.unary()?;
        while self.check(TokenType::Mul) || self.check(TokenType::Div) || self.check(TokenType::Mod) {
            let tok = self.advance()?;
            let right = self.unary()?;
            expr = self.ir.create_binary(tok.ty, None, expr, right, tok.line);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<NodeId> {
        match self.current.ty {
            TokenType::UnaryOp => {
                let tok = self.advance()?;
                let operand = self.unary()?;
                let op = tok.datum.unwrap_or(TokenType::Not);
                Ok(self.ir.create_unary(op, operand, tok.line))
            }
            TokenType::Add | TokenType::Sub => {
                let tok = self.advance()?;
                let operand = self.unary()?;
                let op = if tok.ty == TokenType::Add {
                    TokenType::Pos
                } else {
                    TokenType::Neg
                };
                Ok(self.ir.create_unary(op, operand, tok.line))
            }
            TokenType::Inc | TokenType::Dec => {
                let tok = self.advance()?;
                let operand = self.member(true)?;
                if !is_assignable(self.ir.node(operand).ty()) {
                    return Err(self.error_at(tok.line, Msg::BadIncDecOperand));
                }
                Ok(self.ir.create_inc_dec(tok.ty, operand, false, tok.line))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<NodeId> {
        let expr = self.member(true)?;
        let is_inc_dec = self.check(TokenType::Inc) || self.check(TokenType::Dec);
        if !is_inc_dec || self.current.newline_before {
            return Ok(expr);
        }
        if !is_assignable(self.ir.node(expr).ty()) {
            return Err(self.error(Msg::BadIncDecOperand));
        }
        let tok = self.advance()?;
        Ok(self.ir.create_inc_dec(tok.ty, expr, true, tok.line))
    }

    /// Member access, calls and `new`. Calls are not consumed when
    /// `allow_call` is false, which is how `new` finds its callee.
    fn member(&mut self, allow_call: bool) -> Result<NodeId> {
        let mut expr = match self.current.ty {
            TokenType::New => {
                let line = self.advance()?.line;
                let callee = self.member(false)?;
                let args = if self.check(TokenType::LP) {
                    self.arguments()?
                } else {
                    Vec::new()
                };
                self.ir.create_call(TokenType::New, callee, &args, line)
            }
            TokenType::Function => self.function(FunctionRole::Expression)?,
            _ => self.primary()?,
        };

        loop {
            match self.current.ty {
                TokenType::Dot => {
                    let line = self.advance()?.line;
                    let name = self.property_name()?;
                    expr = self.ir.create_prop_get(expr, &name, line);
                }
                TokenType::LB => {
                    let line = self.advance()?.line;
                    let index = self.expression(false)?;
                    self.consume(TokenType::RB, Expected::BracketInIndex)?;
                    expr = self.ir.create_elem_get(expr, index, line);
                }
                TokenType::LP if allow_call => {
                    let line = self.current.line;
                    let args = self.arguments()?;
                    let is_eval = {
                        let callee = self.ir.node(expr);
                        callee.ty() == TokenType::Name && callee.data() == Some("eval")
                    };
                    if is_eval {
                        self.require_activation();
                    }
                    expr = self.ir.create_call(TokenType::Call, expr, &args, line);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Name after `.`; future reserved words pass with a warning
    fn property_name(&mut self) -> Result<String> {
        match self.current.ty {
            TokenType::Name => Ok(self.advance()?.text().to_string()),
            TokenType::Reserved => {
                let tok = self.advance()?;
                let word = tok.text().to_string();
                self.warn(Msg::ReservedPropertyName(word.clone()), tok.line);
                Ok(word)
            }
            _ => Err(self.error(Msg::Missing(Expected::NameAfterDot))),
        }
    }

    fn arguments(&mut self) -> Result<Vec<NodeId>> {
        self.advance()?;
        let mut args = Vec::new();
        if !self.check(TokenType::RP) {
            loop {
                args.push(self.assignment(false)?);
                if !self.match_token(TokenType::Comma)? {
                    break;
                }
            }
        }
        self.consume(TokenType::RP, Expected::ParenAfterArguments)?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<NodeId> {
        if self.current.is_slash() {
            self.rescan_regexp()?;
        }
        match self.current.ty {
            TokenType::LB => self.array_literal(),
            TokenType::LC => self.object_literal(),
            TokenType::LP => {
                self.advance()?;
                let expr = self.expression(false)?;
                self.consume(TokenType::RP, Expected::ParenInParenthetical)?;
                Ok(expr)
            }
            TokenType::Name => {
                let tok = self.advance()?;
                let name = tok.text().to_string();
                self.check_future_keyword(&name, tok.line);
                self.record_use(&name);
                Ok(self.ir.create_name(&name, tok.line))
            }
            TokenType::Number => {
                let tok = self.advance()?;
                Ok(self.ir.create_number(tok.text(), tok.line))
            }
            TokenType::String => {
                let tok = self.advance()?;
                Ok(self.ir.create_string(tok.text(), tok.line))
            }
            TokenType::RegExp => {
                let tok = self.advance()?;
                Ok(self.ir.create_regexp(tok.text(), tok.line))
            }
            TokenType::Primary => {
                let tok = self.advance()?;
                let datum = tok.datum.unwrap_or(TokenType::Null);
                if datum == TokenType::This {
                    self.mark_this();
                }
                Ok(self.ir.create_primary(datum, tok.line))
            }
            TokenType::Reserved => Err(self.error(Msg::ReservedWord(self.current.text().to_string()))),
            _ => Err(self.unexpected()),
        }
    }

    /// `[a, , b]`; elisions become Empty nodes
    fn array_literal(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        let array = self.ir.create_leaf(TokenType::ArrayLit, line);
        loop {
            if self.check(TokenType::RB) {
                break;
            }
            if self.check(TokenType::Comma) {
                let hole_line = self.advance()?.line;
                let hole = self.ir.create_leaf(TokenType::Empty, hole_line);
                self.ir.add_child(array, hole);
                continue;
            }
            let element = self.assignment(false)?;
            self.ir.add_child(array, element);
            if self.check(TokenType::Comma) {
                let comma_line = self.advance()?.line;
                if self.check(TokenType::RB) {
                    self.warn(Msg::TrailingComma, comma_line);
                    break;
                }
            } else if !self.check(TokenType::RB) {
                return Err(self.error(Msg::Missing(Expected::BracketAfterElements)));
            }
        }
        self.consume(TokenType::RB, Expected::BracketAfterElements)?;
        Ok(array)
    }

    /// `{k: v, ...}`; children alternate key and value
    fn object_literal(&mut self) -> Result<NodeId> {
        let line = self.advance()?.line;
        let object = self.ir.create_leaf(TokenType::ObjectLit, line);
        while !self.check(TokenType::RC) {
            let key = match self.current.ty {
                TokenType::Name => {
                    let tok = self.advance()?;
                    self.ir.create_name(tok.text(), tok.line)
                }
                TokenType::Reserved => {
                    let tok = self.advance()?;
                    self.warn(Msg::ReservedPropertyName(tok.text().to_string()), tok.line);
                    self.ir.create_name(tok.text(), tok.line)
                }
                TokenType::String => {
                    let tok = self.advance()?;
                    self.ir.create_string(tok.text(), tok.line)
                }
                TokenType::Number => {
                    let tok = self.advance()?;
                    self.ir.create_number(tok.text(), tok.line)
                }
                _ => return Err(self.error(Msg::Missing(Expected::PropertyId))),
            };
            self.consume(TokenType::Colon, Expected::ColonAfterPropertyId)?;
            let value = self.assignment(false)?;
            self.ir.add_child(object, key);
            self.ir.add_child(object, value);

            if self.check(TokenType::Comma) {
                let comma_line = self.advance()?.line;
                if self.check(TokenType::RC) {
                    self.warn(Msg::TrailingComma, comma_line);
                    break;
                }
            } else if !self.check(TokenType::RC) {
                return Err(self.error(Msg::Missing(Expected::BraceAfterProperties)));
            }
        }
        self.consume(TokenType::RC, Expected::BraceAfterProperties)?;
        Ok(object)
    }
}
