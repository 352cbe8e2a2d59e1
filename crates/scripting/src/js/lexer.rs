//! JavaScript tokenizer
//!
//! Pull-based scanner over the source text. Regular expression literals
//! are not recognized on their own: the parser asks for a rescan with
//! [`Lexer::scan_regexp`] when a `/` or `/=` token sits in operand position.

use super::messages::Msg;
use super::token::{keyword, TokenType};
use jscrunch_core::{CrunchError, Locale, Result, ScriptVersion};

/// A scanned token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub datum: Option<TokenType>,
    /// Identifier name, or the raw source text of a literal
    pub text: Option<String>,
    pub line: u32,
    pub start: usize,
    pub end: usize,
    /// A line terminator appeared between the previous token and this one
    pub newline_before: bool,
}

impl Token {
    pub fn is(&self, ty: TokenType) -> bool {
        self.ty == ty
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_else(|| self.datum.unwrap_or(self.ty).text())
    }

    /// `/` or `/=`, the two tokens a regular expression can hide behind
    pub fn is_slash(&self) -> bool {
        self.ty == TokenType::Div
            || (self.ty == TokenType::Assign && self.datum == Some(TokenType::Div))
    }
}

/// A comment seen while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Full text including the delimiters
    pub text: String,
    pub line: u32,
    pub start: usize,
    pub end: usize,
    pub block: bool,
    /// The comment spans a line break
    pub has_newline: bool,
}

pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0B}' | '\u{0C}' | '\u{A0}' | '\u{FEFF}')
        || (c.is_whitespace() && !is_line_terminator(c))
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

pub(crate) fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_alphanumeric()
}

/// Whether a `/` after `prev` begins a regular expression literal.
///
/// Used when scanning without a grammar, where operand position is unknown.
pub fn slash_starts_regexp(prev: Option<&Token>) -> bool {
    match prev {
        None => true,
        Some(tok) => !matches!(
            tok.ty,
            TokenType::Name
                | TokenType::Number
                | TokenType::String
                | TokenType::RegExp
                | TokenType::Primary
                | TokenType::RP
                | TokenType::RB
                | TokenType::Inc
                | TokenType::Dec
        ),
    }
}

/// JavaScript lexer
pub struct Lexer<'a> {
    source: &'a str,
    source_name: &'a str,
    version: ScriptVersion,
    locale: Locale,
    pos: usize,
    line: u32,
    at_line_start: bool,
    keep_comments: bool,
    comments: Vec<Comment>,
}

impl<'a> Lexer<'a> {
    pub fn new(
        source: &'a str,
        source_name: &'a str,
        start_line: u32,
        version: ScriptVersion,
        locale: Locale,
    ) -> Self {
        Self {
            source,
            source_name,
            version,
            locale,
            pos: 0,
            line: start_line,
            at_line_start: true,
            keep_comments: false,
            comments: Vec::new(),
        }
    }

    /// Collect comments for [`Lexer::take_comments`]
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn version(&self) -> ScriptVersion {
        self.version
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Comments collected since the last call
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    pub(crate) fn error_at(&self, line: u32, msg: Msg) -> CrunchError {
        CrunchError::syntax(self.source_name, line, msg.text(self.locale))
    }

    fn error(&self, msg: Msg) -> CrunchError {
        self.error_at(self.line, msg)
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> Result<Token> {
        let newline_before = self.skip_trivia()?;
        let start = self.pos;
        let line = self.line;

        let Some(c) = self.peek() else {
            return Ok(Token {
                ty: TokenType::Eof,
                datum: None,
                text: None,
                line,
                start,
                end: start,
                newline_before,
            });
        };
        self.at_line_start = false;

        let (ty, datum, text) = if c.is_ascii_digit()
            || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            (TokenType::Number, None, Some(self.read_number()?))
        } else if is_identifier_start(c) || c == '\\' {
            self.read_word()?
        } else if c == '"' || c == '\'' {
            (TokenType::String, None, Some(self.read_string(c)?))
        } else {
            let (ty, datum) = self.read_punctuator(c)?;
            (ty, datum, None)
        };

        Ok(Token {
            ty,
            datum,
            text,
            line,
            start,
            end: self.pos,
            newline_before,
        })
    }

    /// Re-read a `/` or `/=` token as a regular expression literal
    pub fn scan_regexp(&mut self, slash: &Token) -> Result<Token> {
        if !self.version.has_regexp_literals() {
            return Err(self.error_at(slash.line, Msg::RegExpUnsupported(self.version)));
        }
        self.pos = slash.start + 1;
        self.line = slash.line;

        let mut in_class = false;
        loop {
            match self.peek() {
                None => return Err(self.error_at(slash.line, Msg::UnterminatedRegExp)),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error_at(slash.line, Msg::UnterminatedRegExp))
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some(c) if !is_line_terminator(c) => self.bump(),
                        _ => return Err(self.error_at(slash.line, Msg::UnterminatedRegExp)),
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.bump();
                }
                Some('/') if !in_class => {
                    self.bump();
                    break;
                }
                Some(_) => self.bump(),
            }
        }
        while self.peek().is_some_and(is_identifier_part) {
            self.bump();
        }

        Ok(Token {
            ty: TokenType::RegExp,
            datum: None,
            text: Some(self.source[slash.start..self.pos].to_string()),
            line: slash.line,
            start: slash.start,
            end: self.pos,
            newline_before: slash.newline_before,
        })
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn rest_starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume a line terminator, counting CRLF once
    fn bump_newline(&mut self) {
        if self.peek() == Some('\r') {
            self.bump();
            if self.peek() == Some('\n') {
                self.bump();
            }
        } else {
            self.bump();
        }
        self.line += 1;
    }

    /// Skip whitespace and comments. Returns true when a line break was seen.
    fn skip_trivia(&mut self) -> Result<bool> {
        let mut newline = false;
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                self.bump_newline();
                newline = true;
                self.at_line_start = true;
            } else if is_space(c) {
                self.bump();
            } else if self.rest_starts_with("//") || self.rest_starts_with("<!--") {
                self.line_comment();
            } else if self.at_line_start && self.rest_starts_with("-->") {
                self.line_comment();
            } else if self.rest_starts_with("/*") {
                if self.block_comment()? {
                    newline = true;
                }
            } else {
                break;
            }
        }
        Ok(newline)
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(|c| !is_line_terminator(c)) {
            self.bump();
        }
        self.record_comment(start, self.line, false, false);
    }

    fn block_comment(&mut self) -> Result<bool> {
        let start = self.pos;
        let line = self.line;
        self.pos += 2;
        let mut has_newline = false;
        loop {
            match self.peek() {
                None => return Err(self.error_at(line, Msg::UnterminatedComment)),
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some(c) if is_line_terminator(c) => {
                    self.bump_newline();
                    has_newline = true;
                }
                Some(_) => self.bump(),
            }
        }
        self.record_comment(start, line, true, has_newline);
        Ok(has_newline)
    }

    fn record_comment(&mut self, start: usize, line: u32, block: bool, has_newline: bool) {
        if self.keep_comments {
            self.comments.push(Comment {
                text: self.source[start..self.pos].to_string(),
                line,
                start,
                end: self.pos,
                block,
                has_newline,
            });
        }
    }

    fn read_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_digit(radix)) {
            self.bump();
            count += 1;
        }
        count
    }

    fn read_number(&mut self) -> Result<String> {
        let start = self.pos;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.pos += 2;
            if self.read_digits(16) == 0 {
                return Err(self.error(Msg::BadNumber(self.source[start..self.pos].to_string())));
            }
        } else if self.peek() == Some('0') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.read_digits(10);
            // Legacy octal unless an 8 or 9 turns it decimal
            let digits = &self.source[start..self.pos];
            if digits.bytes().any(|b| b == b'8' || b == b'9') {
                self.read_fraction_and_exponent(start)?;
            }
        } else {
            self.read_digits(10);
            self.read_fraction_and_exponent(start)?;
        }

        if self.peek().is_some_and(|c| is_identifier_start(c) || c.is_ascii_digit() || c == '\\') {
            return Err(self.error(Msg::IdentifierAfterNumber));
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn read_fraction_and_exponent(&mut self, start: usize) -> Result<()> {
        if self.peek() == Some('.') {
            self.bump();
            self.read_digits(10);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.read_digits(10) == 0 {
                return Err(self.error(Msg::BadNumber(self.source[start..self.pos].to_string())));
            }
        }
        Ok(())
    }

    fn read_hex_escape(&mut self, digits: usize) -> Option<u32> {
        let text = self.source.get(self.pos..self.pos + digits)?;
        if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        self.pos += digits;
        u32::from_str_radix(text, 16).ok()
    }

    fn read_string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        let line = self.line;
        self.bump();
        loop {
            match self.peek() {
                None => return Err(self.error_at(line, Msg::UnterminatedString)),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error_at(line, Msg::UnterminatedString))
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        None => return Err(self.error_at(line, Msg::UnterminatedString)),
                        Some(c) if is_line_terminator(c) => self.bump_newline(),
                        Some('x') => {
                            self.bump();
                            if self.read_hex_escape(2).is_none() {
                                return Err(self.error(Msg::InvalidEscape));
                            }
                        }
                        Some('u') => {
                            self.bump();
                            if self.read_hex_escape(4).is_none() {
                                return Err(self.error(Msg::InvalidEscape));
                            }
                        }
                        Some(_) => self.bump(),
                    }
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some(_) => self.bump(),
            }
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn read_word(&mut self) -> Result<(TokenType, Option<TokenType>, Option<String>)> {
        let mut word = String::new();
        let mut escaped = false;
        loop {
            match self.peek() {
                Some('\\') => {
                    if self.peek_at(1) != Some('u') {
                        return Err(self.error(Msg::BadIdentifierEscape));
                    }
                    self.pos += 2;
                    let decoded = self
                        .read_hex_escape(4)
                        .and_then(char::from_u32)
                        .filter(|&c| {
                            if word.is_empty() {
                                is_identifier_start(c)
                            } else {
                                is_identifier_part(c)
                            }
                        })
                        .ok_or_else(|| self.error(Msg::BadIdentifierEscape))?;
                    word.push(decoded);
                    escaped = true;
                }
                Some(c) if is_identifier_part(c) => {
                    word.push(c);
                    self.bump();
                }
                _ => break,
            }
        }

        match keyword(&word, self.version) {
            Some(_) if escaped => Err(self.error(Msg::ReservedWord(word))),
            Some((TokenType::Reserved, _)) => Ok((TokenType::Reserved, None, Some(word))),
            Some((ty, datum)) => Ok((ty, datum, None)),
            None => Ok((TokenType::Name, None, Some(word))),
        }
    }

    /// Consume the next char when it is `next`
    fn follow(&mut self, next: char) -> bool {
        if self.peek() == Some(next) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn read_punctuator(&mut self, c: char) -> Result<(TokenType, Option<TokenType>)> {
        use TokenType::*;
        self.bump();
        let tok = match c {
            ';' => (Semi, None),
            '[' => (LB, None),
            ']' => (RB, None),
            '{' => (LC, None),
            '}' => (RC, None),
            '(' => (LP, None),
            ')' => (RP, None),
            ',' => (Comma, None),
            '.' => (Dot, None),
            '?' => (Hook, None),
            ':' => (Colon, None),
            '~' => (UnaryOp, Some(BitNot)),
            '|' => {
                if self.follow('|') {
                    (Or, None)
                } else if self.follow('=') {
                    (Assign, Some(BitOr))
                } else {
                    (BitOr, None)
                }
            }
            '^' => {
                if self.follow('=') {
                    (Assign, Some(BitXor))
                } else {
                    (BitXor, None)
                }
            }
            '&' => {
                if self.follow('&') {
                    (And, None)
                } else if self.follow('=') {
                    (Assign, Some(BitAnd))
                } else {
                    (BitAnd, None)
                }
            }
            '=' => {
                if self.follow('=') {
                    if self.follow('=') {
                        self.strict_equality()?;
                        (EqOp, Some(SheQ))
                    } else {
                        (EqOp, Some(Eq))
                    }
                } else {
                    (Assign, None)
                }
            }
            '!' => {
                if self.follow('=') {
                    if self.follow('=') {
                        self.strict_equality()?;
                        (EqOp, Some(ShNe))
                    } else {
                        (EqOp, Some(Ne))
                    }
                } else {
                    (UnaryOp, Some(Not))
                }
            }
            '<' => {
                if self.follow('<') {
                    if self.follow('=') {
                        (Assign, Some(Lsh))
                    } else {
                        (ShOp, Some(Lsh))
                    }
                } else if self.follow('=') {
                    (RelOp, Some(Le))
                } else {
                    (RelOp, Some(Lt))
                }
            }
            '>' => {
                if self.follow('>') {
                    if self.follow('>') {
                        if self.follow('=') {
                            (Assign, Some(Ursh))
                        } else {
                            (ShOp, Some(Ursh))
                        }
                    } else if self.follow('=') {
                        (Assign, Some(Rsh))
                    } else {
                        (ShOp, Some(Rsh))
                    }
                } else if self.follow('=') {
                    (RelOp, Some(Ge))
                } else {
                    (RelOp, Some(Gt))
                }
            }
            '*' => {
                if self.follow('=') {
                    (Assign, Some(Mul))
                } else {
                    (Mul, None)
                }
            }
            '/' => {
                if self.follow('=') {
                    (Assign, Some(Div))
                } else {
                    (Div, None)
                }
            }
            '%' => {
                if self.follow('=') {
                    (Assign, Some(Mod))
                } else {
                    (Mod, None)
                }
            }
            '+' => {
                if self.follow('+') {
                    (Inc, None)
                } else if self.follow('=') {
                    (Assign, Some(Add))
                } else {
                    (Add, None)
                }
            }
            '-' => {
                if self.follow('-') {
                    (Dec, None)
                } else if self.follow('=') {
                    (Assign, Some(Sub))
                } else {
                    (Sub, None)
                }
            }
            other => return Err(self.error(Msg::IllegalCharacter(other))),
        };
        Ok(tok)
    }

    fn strict_equality(&self) -> Result<()> {
        if self.version.has_strict_equality() {
            Ok(())
        } else {
            Err(self.error(Msg::StrictEqualityUnsupported(self.version)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(src: &str) -> Lexer<'_> {
        Lexer::new(src, "test.js", 1, ScriptVersion::Default, Locale::English)
    }

    fn types(src: &str) -> Vec<(TokenType, Option<TokenType>)> {
        let mut lx = lexer(src);
        let mut out = Vec::new();
        loop {
            let tok = lx.next_token().unwrap();
            if tok.is(TokenType::Eof) {
                break;
            }
            out.push((tok.ty, tok.datum));
        }
        out
    }

    #[test]
    fn test_numbers() {
        let mut lx = lexer("123 45.67 .5 1e10 0x1F 017 1.5E-3");
        for expected in ["123", "45.67", ".5", "1e10", "0x1F", "017", "1.5E-3"] {
            let tok = lx.next_token().unwrap();
            assert_eq!(tok.ty, TokenType::Number);
            assert_eq!(tok.text(), expected);
        }
    }

    #[test]
    fn test_bad_numbers() {
        assert!(lexer("0x").next_token().is_err());
        assert!(lexer("1e").next_token().is_err());
        let err = lexer("3in").next_token().unwrap_err();
        assert!(err.to_string().contains("immediately after numeric literal"));
    }

    #[test]
    fn test_operators() {
        use TokenType::*;
        assert_eq!(
            types("+= >>>= === !== << ! ~ ++ -- &&"),
            vec![
                (Assign, Some(Add)),
                (Assign, Some(Ursh)),
                (EqOp, Some(SheQ)),
                (EqOp, Some(ShNe)),
                (ShOp, Some(Lsh)),
                (UnaryOp, Some(Not)),
                (UnaryOp, Some(BitNot)),
                (Inc, None),
                (Dec, None),
                (And, None),
            ]
        );
    }

    #[test]
    fn test_strict_equality_by_version() {
        let mut lx = Lexer::new("a === b", "t.js", 1, ScriptVersion::V1_2, Locale::English);
        lx.next_token().unwrap();
        assert!(lx.next_token().unwrap_err().is_syntax());
    }

    #[test]
    fn test_keywords_and_names() {
        use TokenType::*;
        assert_eq!(
            types("var x = typeof this"),
            vec![
                (Var, None),
                (Name, None),
                (Assign, None),
                (UnaryOp, Some(Typeof)),
                (Primary, Some(This)),
            ]
        );
        let mut lx = Lexer::new("try", "t.js", 1, ScriptVersion::V1_3, Locale::English);
        assert_eq!(lx.next_token().unwrap().ty, Name);
    }

    #[test]
    fn test_identifier_escapes() {
        let mut lx = lexer("a\\u0062c");
        assert_eq!(lx.next_token().unwrap().text(), "abc");
        assert!(lexer("\\u0076ar").next_token().is_err());
    }

    #[test]
    fn test_strings() {
        let mut lx = lexer(r#""a\"b" 'c\x41B'"#);
        assert_eq!(lx.next_token().unwrap().text(), r#""a\"b""#);
        assert_eq!(lx.next_token().unwrap().text(), r"'c\x41B'");
        assert!(lexer("'abc").next_token().is_err());
        assert!(lexer("'ab\ncd'").next_token().is_err());
        assert!(lexer(r"'\xZZ'").next_token().is_err());
    }

    #[test]
    fn test_line_continuation_counts_lines() {
        let mut lx = lexer("'a\\\r\nb' x");
        lx.next_token().unwrap();
        let tok = lx.next_token().unwrap();
        assert_eq!(tok.line, 2);
        assert!(!tok.newline_before);
    }

    #[test]
    fn test_comments_and_lines() {
        let mut lx = lexer("a // one\r\n/* two\n three */ b <!-- html\n--> close\nc").with_comments(true);
        let a = lx.next_token().unwrap();
        assert_eq!(a.line, 1);
        let b = lx.next_token().unwrap();
        assert_eq!(b.text(), "b");
        assert_eq!(b.line, 3);
        assert!(b.newline_before);
        let c = lx.next_token().unwrap();
        assert_eq!(c.text(), "c");
        assert_eq!(c.line, 5);
        let comments = lx.take_comments();
        assert_eq!(comments.len(), 4);
        assert_eq!(comments[0].text, "// one");
        assert!(comments[1].block && comments[1].has_newline);
        assert_eq!(comments[2].text, "<!-- html");
        assert_eq!(comments[3].text, "--> close");
    }

    #[test]
    fn test_unterminated_comment() {
        let mut lx = lexer("a /* never closed");
        lx.next_token().unwrap();
        assert!(lx.next_token().unwrap_err().is_syntax());
    }

    #[test]
    fn test_regexp_rescan() {
        let mut lx = lexer("/a[/]b\\//gi.x");
        let slash = lx.next_token().unwrap();
        assert!(slash.is_slash());
        let re = lx.scan_regexp(&slash).unwrap();
        assert_eq!(re.ty, TokenType::RegExp);
        assert_eq!(re.text(), "/a[/]b\\//gi");
        assert_eq!(lx.next_token().unwrap().ty, TokenType::Dot);
    }

    #[test]
    fn test_regexp_unsupported_in_old_dialect() {
        let mut lx = Lexer::new("/a/", "t.js", 1, ScriptVersion::V1_1, Locale::English);
        let slash = lx.next_token().unwrap();
        assert!(lx.scan_regexp(&slash).is_err());
    }

    #[test]
    fn test_error_locale_and_location() {
        let mut lx = Lexer::new("\n\n  #", "lib.js", 1, ScriptVersion::Default, Locale::French);
        let err = lx.next_token().unwrap_err();
        assert!(err.to_string().starts_with("lib.js:3: caractère illégal"));
    }

    #[test]
    fn test_slash_heuristic() {
        let name = lexer("x").next_token().unwrap();
        let comma = lexer(",").next_token().unwrap();
        assert!(!slash_starts_regexp(Some(&name)));
        assert!(slash_starts_regexp(Some(&comma)));
        assert!(slash_starts_regexp(None));
    }
}
