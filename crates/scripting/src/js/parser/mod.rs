//! Recursive-descent parser
//!
//! Consumes tokens with one token of lookahead and builds the tree through
//! [`IrBuilder`]. Scope, label and jump bookkeeping lives here; the grammar
//! is split between `statements` and `expressions`.

mod expressions;
mod statements;

use super::ast::{NodeArena, NodeId};
use super::ir::IrBuilder;
use super::lexer::{Comment, Lexer, Token};
use super::messages::{Expected, Msg};
use super::props::PropKind;
use super::token::{later_keyword_version, TokenType};
use jscrunch_core::{CrunchError, Locale, Result, ScriptVersion, Warning};
use std::collections::BTreeSet;
use tracing::debug;

/// Inputs for one parse
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub source_name: String,
    pub start_line: u32,
    pub version: ScriptVersion,
    pub locale: Locale,
    pub warnings: bool,
    /// Attach comments to the tree for the formatter
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: "<script>".to_string(),
            start_line: 1,
            version: ScriptVersion::Default,
            locale: Locale::English,
            warnings: false,
            keep_comments: false,
        }
    }
}

/// A parsed script together with its arena
#[derive(Debug, Clone)]
pub struct ScriptTree {
    pub arena: NodeArena,
    pub root: NodeId,
    pub source_name: String,
    pub version: ScriptVersion,
}

impl ScriptTree {
    pub fn to_string_tree(&self) -> String {
        self.arena.to_string_tree(self.root)
    }
}

#[derive(Debug)]
pub struct ParseOutput {
    pub tree: ScriptTree,
    pub warnings: Vec<Warning>,
}

/// Parse `source` into a tree
pub fn parse(source: &str, options: &ParseOptions) -> Result<ParseOutput> {
    debug!(
        source = %options.source_name,
        version = %options.version,
        bytes = source.len(),
        "parsing script"
    );
    let parser = Parser::new(source, options)?;
    let output = parser.script()?;
    debug!(
        nodes = output.tree.arena.len(),
        warnings = output.warnings.len(),
        "parse finished"
    );
    Ok(output)
}

/// Names and flags gathered for one function body or the script
#[derive(Debug, Default)]
struct Scope {
    function: Option<NodeId>,
    params: Vec<String>,
    vars: Vec<String>,
    uses: BTreeSet<String>,
    functions: Vec<NodeId>,
    requires_activation: bool,
    check_this: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Loop,
    Switch,
}

/// A statement an unlabelled `break` or `continue` can reach
#[derive(Debug, Clone, Copy)]
struct Target {
    node: NodeId,
    kind: TargetKind,
}

#[derive(Debug, Clone)]
struct LabelEntry {
    name: String,
    node: NodeId,
    /// The loop this label names, if it labels one
    looped: Option<NodeId>,
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    options: &'a ParseOptions,
    ir: IrBuilder,
    current: Token,
    prev_line: u32,
    comments: Vec<Comment>,
    scopes: Vec<Scope>,
    targets: Vec<Target>,
    labels: Vec<LabelEntry>,
    /// Labels directly in front of the statement being parsed
    pending_labels: Vec<usize>,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, options: &'a ParseOptions) -> Result<Self> {
        let mut lexer = Lexer::new(
            source,
            &options.source_name,
            options.start_line,
            options.version,
            options.locale,
        )
        .with_comments(options.keep_comments);
        let current = lexer.next_token()?;
        let comments = lexer.take_comments();
        Ok(Self {
            lexer,
            options,
            ir: IrBuilder::new(),
            current,
            prev_line: options.start_line,
            comments,
            scopes: Vec::new(),
            targets: Vec::new(),
            labels: Vec::new(),
            pending_labels: Vec::new(),
            warnings: Vec::new(),
        })
    }

    fn script(mut self) -> Result<ParseOutput> {
        let root = self.ir.create_script(&self.options.source_name, self.options.start_line);
        self.scopes.push(Scope::default());

        while !self.check(TokenType::Eof) {
            let stmt = self.statement(true)?;
            self.ir.add_child(root, stmt);
        }
        self.attach_trailing_comments(root);

        let scope = self.scopes.pop().unwrap_or_default();
        let end_line = self.current.line as i64;
        let node = self.ir.arena_mut().get_mut(root);
        node.put_prop(PropKind::EndLine, end_line);
        node.put_prop(PropKind::Vars, scope.vars);
        node.put_prop(PropKind::Uses, scope.uses.into_iter().collect::<Vec<_>>());
        node.put_prop(PropKind::Functions, scope.functions);

        let tree = ScriptTree {
            arena: self.ir.finish(),
            root,
            source_name: self.options.source_name.clone(),
            version: self.options.version,
        };
        Ok(ParseOutput {
            tree,
            warnings: self.warnings,
        })
    }

    // Token helpers

    fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    fn match_token(&mut self, ty: TokenType) -> Result<bool> {
        if self.check(ty) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume(&mut self, ty: TokenType, expected: Expected) -> Result<Token> {
        if self.check(ty) {
            self.advance()
        } else {
            Err(self.error(Msg::Missing(expected)))
        }
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        self.comments.extend(self.lexer.take_comments());
        let prev = std::mem::replace(&mut self.current, next);
        self.prev_line = prev.line;
        Ok(prev)
    }

    /// Turn a `/` or `/=` in operand position into a regexp token
    fn rescan_regexp(&mut self) -> Result<()> {
        let re = self.lexer.scan_regexp(&self.current)?;
        self.current = re;
        Ok(())
    }

    /// Statement terminator, inserted at a line break, `}` or end of input
    fn auto_semicolon(&mut self) -> Result<()> {
        if self.check(TokenType::Semi) {
            self.advance()?;
            return Ok(());
        }
        if self.check(TokenType::RC) || self.check(TokenType::Eof) || self.current.newline_before {
            self.warn(Msg::SemicolonInserted, self.prev_line);
            Ok(())
        } else {
            Err(self.error(Msg::MissingSemicolon))
        }
    }

    /// An identifier in a binding or label position
    fn identifier(&mut self, expected: Expected) -> Result<(String, u32)> {
        match self.current.ty {
            TokenType::Name => {
                let tok = self.advance()?;
                let name = tok.text().to_string();
                self.check_future_keyword(&name, tok.line);
                Ok((name, tok.line))
            }
            TokenType::Reserved => Err(self.error(Msg::ReservedWord(self.current.text().to_string()))),
            _ => Err(self.error(Msg::Missing(expected))),
        }
    }

    fn check_future_keyword(&mut self, name: &str, line: u32) {
        if let Some(version) = later_keyword_version(name, self.options.version) {
            self.warn(Msg::FutureKeyword(name.to_string(), version), line);
        }
    }

    // Diagnostics

    fn error(&self, msg: Msg) -> CrunchError {
        self.lexer.error_at(self.current.line, msg)
    }

    fn error_at(&self, line: u32, msg: Msg) -> CrunchError {
        self.lexer.error_at(line, msg)
    }

    fn unexpected(&self) -> CrunchError {
        match self.current.ty {
            TokenType::Eof | TokenType::Semi | TokenType::RP | TokenType::RB | TokenType::RC => {
                self.error(Msg::Missing(Expected::Operand))
            }
            _ => self.error(Msg::Unexpected(self.current.text().to_string())),
        }
    }

    fn warn(&mut self, msg: Msg, line: u32) {
        if !self.options.warnings {
            return;
        }
        if let Some(kind) = msg.warning_kind() {
            self.warnings.push(Warning {
                kind,
                message: msg.text(self.options.locale),
                source_name: self.options.source_name.clone(),
                line,
            });
        }
    }

    // Comments

    fn take_leading_comments(&mut self) -> Vec<String> {
        self.comments.drain(..).map(|c| c.text).collect()
    }

    fn attach_comments(&mut self, node: NodeId, comments: Vec<String>) {
        if !comments.is_empty() {
            self.ir.arena_mut().get_mut(node).put_prop(PropKind::Comments, comments);
        }
    }

    fn attach_trailing_comments(&mut self, node: NodeId) {
        let comments = self.take_leading_comments();
        if !comments.is_empty() {
            self.ir
                .arena_mut()
                .get_mut(node)
                .put_prop(PropKind::TrailingComments, comments);
        }
    }

    // Scopes

    fn scope(&mut self) -> &mut Scope {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::default());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn in_function(&self) -> bool {
        self.scopes.last().is_some_and(|s| s.function.is_some())
    }

    fn declare_var(&mut self, name: &str, line: u32) {
        let declared = self.scope().vars.iter().any(|v| v == name);
        if declared {
            self.warn(Msg::VarRedeclared(name.to_string()), line);
        } else {
            self.scope().vars.push(name.to_string());
        }
    }

    fn record_use(&mut self, name: &str) {
        let scope = self.scope();
        if name == "arguments" {
            scope.requires_activation = true;
        }
        if !scope.uses.contains(name) {
            scope.uses.insert(name.to_string());
        }
    }

    fn require_activation(&mut self) {
        self.scope().requires_activation = true;
    }

    fn mark_this(&mut self) {
        self.scope().check_this = true;
    }

    /// Open a function body scope. Jump targets do not cross functions.
    fn enter_function(&mut self, function: NodeId, params: Vec<String>) -> (Vec<Target>, Vec<LabelEntry>) {
        let enclosing = self.scopes.last().and_then(|s| s.function);
        if let Some(enclosing) = enclosing {
            self.ir
                .arena_mut()
                .get_mut(function)
                .put_prop(PropKind::EnclosingFunction, enclosing);
        }
        self.scope().functions.push(function);
        self.scopes.push(Scope {
            function: Some(function),
            params,
            ..Scope::default()
        });
        self.pending_labels.clear();
        (std::mem::take(&mut self.targets), std::mem::take(&mut self.labels))
    }

    fn exit_function(&mut self, function: NodeId, saved: (Vec<Target>, Vec<LabelEntry>)) {
        (self.targets, self.labels) = saved;
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        let local_count = (scope.params.len() + scope.vars.len()) as i64;
        if let Some(data) = self.ir.function_mut(function) {
            data.requires_activation = scope.requires_activation;
            data.check_this = scope.check_this;
        }
        let node = self.ir.arena_mut().get_mut(function);
        node.put_prop(PropKind::Vars, scope.vars);
        node.put_prop(PropKind::Uses, scope.uses.into_iter().collect::<Vec<_>>());
        node.put_prop(PropKind::LocalCount, local_count);
        node.put_prop(PropKind::Functions, scope.functions);
    }

    // Jump targets

    fn push_target(&mut self, node: NodeId, kind: TargetKind, labels: &[usize]) {
        if kind == TargetKind::Loop {
            for &idx in labels {
                if let Some(entry) = self.labels.get_mut(idx) {
                    entry.looped = Some(node);
                }
            }
        }
        self.targets.push(Target { node, kind });
    }

    fn pop_target(&mut self) {
        self.targets.pop();
    }

    fn find_label(&self, name: &str) -> Option<&LabelEntry> {
        self.labels.iter().rev().find(|l| l.name == name)
    }

    /// Resolve a `break` or `continue`, optionally labeled
    fn jump_target(&self, ty: TokenType, label: Option<&str>, line: u32) -> Result<NodeId> {
        match (ty, label) {
            (TokenType::Break, None) => self
                .targets
                .last()
                .map(|t| t.node)
                .ok_or_else(|| self.error_at(line, Msg::BadBreak)),
            (TokenType::Break, Some(name)) => self
                .find_label(name)
                .map(|l| l.node)
                .ok_or_else(|| self.error_at(line, Msg::UndefinedLabel(name.to_string()))),
            (_, None) => self
                .targets
                .iter()
                .rev()
                .find(|t| t.kind == TargetKind::Loop)
                .map(|t| t.node)
                .ok_or_else(|| self.error_at(line, Msg::BadContinue)),
            (_, Some(name)) => {
                let entry = self
                    .find_label(name)
                    .ok_or_else(|| self.error_at(line, Msg::UndefinedLabel(name.to_string())))?;
                entry
                    .looped
                    .ok_or_else(|| self.error_at(line, Msg::ContinueToNonLoop(name.to_string())))
            }
        }
    }
}
