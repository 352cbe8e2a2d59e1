//! Token and node type tags
//!
//! One enum tags both lexical tokens and tree nodes. Operator families share
//! a tag and carry the concrete operator as a datum, e.g. `+=` lexes as
//! `Assign` with datum `Add` and `===` as `EqOp` with datum `SheQ`.

use jscrunch_core::ScriptVersion;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Eof,

    // Punctuation
    Semi,       // ;
    LB,         // [
    RB,         // ]
    LC,         // {
    RC,         // }
    LP,         // (
    RP,         // )
    Comma,      // ,
    Dot,        // .
    Colon,      // :
    Hook,       // ?

    // Operator families
    Assign,     // = and op=
    Or,         // ||
    And,        // &&
    BitOr,      // |
    BitXor,     // ^
    BitAnd,     // &
    EqOp,       // == != === !==
    RelOp,      // < <= > >= in instanceof
    ShOp,       // << >> >>>
    Add,        // +
    Sub,        // -
    Mul,        // *
    Div,        // /
    Mod,        // %
    UnaryOp,    // ! ~ typeof void delete, unary + -
    Inc,        // ++
    Dec,        // --

    // Literals and names
    Name,
    Number,
    String,
    RegExp,
    Primary,    // this null true false

    // Datum tags
    Eq,
    Ne,
    SheQ,
    ShNe,
    Lt,
    Le,
    Gt,
    Ge,
    Lsh,
    Rsh,
    Ursh,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
    Neg,
    Pos,
    This,
    Null,
    True,
    False,

    // Keywords
    Break,
    Case,
    Catch,
    Continue,
    Default,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    In,
    InstanceOf,
    New,
    Return,
    Switch,
    Throw,
    Try,
    Var,
    While,
    With,
    Reserved,

    // Tree-only node types
    Script,
    Block,
    ExprStatement,
    Label,
    Empty,
    ForIn,
    Call,
    GetProp,
    GetElem,
    ArrayLit,
    ObjectLit,
}

impl TokenType {
    /// Source text of a punctuator, operator or keyword tag.
    pub fn text(self) -> &'static str {
        use TokenType::*;
        match self {
            Eof => "end of input",
            Semi => ";",
            LB => "[",
            RB => "]",
            LC => "{",
            RC => "}",
            LP => "(",
            RP => ")",
            Comma => ",",
            Dot => ".",
            Colon => ":",
            Hook => "?",
            Assign => "=",
            Or => "||",
            And => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Inc => "++",
            Dec => "--",
            Eq => "==",
            Ne => "!=",
            SheQ => "===",
            ShNe => "!==",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            Lsh => "<<",
            Rsh => ">>",
            Ursh => ">>>",
            Not => "!",
            BitNot => "~",
            Typeof => "typeof",
            Void => "void",
            Delete => "delete",
            Neg => "-",
            Pos => "+",
            This => "this",
            Null => "null",
            True => "true",
            False => "false",
            Break => "break",
            Case => "case",
            Catch => "catch",
            Continue => "continue",
            Default => "default",
            Do => "do",
            Else => "else",
            Finally => "finally",
            For => "for",
            Function => "function",
            If => "if",
            In => "in",
            InstanceOf => "instanceof",
            New => "new",
            Return => "return",
            Switch => "switch",
            Throw => "throw",
            Try => "try",
            Var => "var",
            While => "while",
            With => "with",
            Name => "identifier",
            Number => "number",
            String => "string",
            RegExp => "regular expression",
            EqOp | RelOp | ShOp | UnaryOp | Primary | Reserved => "operator",
            Script | Block | ExprStatement | Label | Empty | ForIn | Call | GetProp | GetElem
            | ArrayLit | ObjectLit => "",
        }
    }

    /// Tag name used in tree dumps.
    pub fn name(self) -> &'static str {
        use TokenType::*;
        match self {
            Eof => "EOF",
            Semi => "SEMI",
            LB => "LB",
            RB => "RB",
            LC => "LC",
            RC => "RC",
            LP => "LP",
            RP => "RP",
            Comma => "COMMA",
            Dot => "DOT",
            Colon => "COLON",
            Hook => "HOOK",
            Assign => "ASSIGN",
            Or => "OR",
            And => "AND",
            BitOr => "BITOR",
            BitXor => "BITXOR",
            BitAnd => "BITAND",
            EqOp => "EQOP",
            RelOp => "RELOP",
            ShOp => "SHOP",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            UnaryOp => "UNARYOP",
            Inc => "INC",
            Dec => "DEC",
            Name => "NAME",
            Number => "NUMBER",
            String => "STRING",
            RegExp => "REGEXP",
            Primary => "PRIMARY",
            Eq => "EQ",
            Ne => "NE",
            SheQ => "SHEQ",
            ShNe => "SHNE",
            Lt => "LT",
            Le => "LE",
            Gt => "GT",
            Ge => "GE",
            Lsh => "LSH",
            Rsh => "RSH",
            Ursh => "URSH",
            Not => "NOT",
            BitNot => "BITNOT",
            Typeof => "TYPEOF",
            Void => "VOID",
            Delete => "DELETE",
            Neg => "NEG",
            Pos => "POS",
            This => "THIS",
            Null => "NULL",
            True => "TRUE",
            False => "FALSE",
            Break => "BREAK",
            Case => "CASE",
            Catch => "CATCH",
            Continue => "CONTINUE",
            Default => "DEFAULT",
            Do => "DO",
            Else => "ELSE",
            Finally => "FINALLY",
            For => "FOR",
            Function => "FUNCTION",
            If => "IF",
            In => "IN",
            InstanceOf => "INSTANCEOF",
            New => "NEW",
            Return => "RETURN",
            Switch => "SWITCH",
            Throw => "THROW",
            Try => "TRY",
            Var => "VAR",
            While => "WHILE",
            With => "WITH",
            Reserved => "RESERVED",
            Script => "SCRIPT",
            Block => "BLOCK",
            ExprStatement => "EXPR_STATEMENT",
            Label => "LABEL",
            Empty => "EMPTY",
            ForIn => "FORIN",
            Call => "CALL",
            GetProp => "GETPROP",
            GetElem => "GETELEM",
            ArrayLit => "ARRAYLIT",
            ObjectLit => "OBJECTLIT",
        }
    }

    pub fn is_loop(self) -> bool {
        matches!(self, TokenType::While | TokenType::Do | TokenType::For | TokenType::ForIn)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Words the language sets aside for future use in every dialect
pub const FUTURE_RESERVED: &[&str] = &[
    "abstract", "boolean", "byte", "char", "class", "const", "debugger", "double", "enum",
    "export", "extends", "final", "float", "goto", "implements", "import", "int", "interface",
    "long", "native", "package", "private", "protected", "public", "short", "static", "super",
    "synchronized", "throws", "transient", "volatile",
];

/// Resolve a word to its keyword token for `version`.
///
/// Returns `None` for plain identifiers, including words that only become
/// keywords in a later dialect.
pub fn keyword(word: &str, version: ScriptVersion) -> Option<(TokenType, Option<TokenType>)> {
    use TokenType::*;
    let found = match word {
        "break" => (Break, None),
        "continue" => (Continue, None),
        "else" => (Else, None),
        "for" => (For, None),
        "function" => (Function, None),
        "if" => (If, None),
        "in" => (In, None),
        "new" => (New, None),
        "return" => (Return, None),
        "var" => (Var, None),
        "while" => (While, None),
        "with" => (With, None),
        "typeof" => (UnaryOp, Some(Typeof)),
        "void" => (UnaryOp, Some(Void)),
        "delete" => (UnaryOp, Some(Delete)),
        "this" => (Primary, Some(This)),
        "null" => (Primary, Some(Null)),
        "true" => (Primary, Some(True)),
        "false" => (Primary, Some(False)),
        "switch" if version.has_switch() => (Switch, None),
        "case" if version.has_switch() => (Case, None),
        "default" if version.has_switch() => (Default, None),
        "do" if version.has_switch() => (Do, None),
        "try" if version.has_exceptions() => (Try, None),
        "catch" if version.has_exceptions() => (Catch, None),
        "finally" if version.has_exceptions() => (Finally, None),
        "throw" if version.has_exceptions() => (Throw, None),
        "instanceof" if version.has_exceptions() => (InstanceOf, None),
        _ if FUTURE_RESERVED.contains(&word) => (Reserved, None),
        _ => return None,
    };
    Some(found)
}

/// The dialect that turns `word` into a keyword, when `word` is a plain
/// identifier under `version` but a keyword in a later one.
pub fn later_keyword_version(word: &str, version: ScriptVersion) -> Option<ScriptVersion> {
    if keyword(word, version).is_some() {
        return None;
    }
    [ScriptVersion::V1_2, ScriptVersion::V1_4]
        .into_iter()
        .find(|v| keyword(word, *v).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_by_version() {
        assert_eq!(keyword("switch", ScriptVersion::V1_1), None);
        assert_eq!(keyword("switch", ScriptVersion::V1_2), Some((TokenType::Switch, None)));
        assert_eq!(keyword("try", ScriptVersion::V1_3), None);
        assert_eq!(keyword("try", ScriptVersion::Default), Some((TokenType::Try, None)));
        assert_eq!(
            keyword("typeof", ScriptVersion::V1_0),
            Some((TokenType::UnaryOp, Some(TokenType::Typeof)))
        );
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(keyword("class", ScriptVersion::V1_5), Some((TokenType::Reserved, None)));
        assert_eq!(keyword("klass", ScriptVersion::V1_5), None);
    }

    #[test]
    fn test_later_keyword() {
        assert_eq!(later_keyword_version("try", ScriptVersion::V1_2), Some(ScriptVersion::V1_4));
        assert_eq!(later_keyword_version("case", ScriptVersion::V1_0), Some(ScriptVersion::V1_2));
        assert_eq!(later_keyword_version("try", ScriptVersion::V1_5), None);
        assert_eq!(later_keyword_version("foo", ScriptVersion::V1_0), None);
    }
}
