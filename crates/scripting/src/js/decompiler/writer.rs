//! Output buffer for the decompiler
//!
//! Tracks indentation, separates tokens that would otherwise fuse and,
//! in compact mode, holds back statement semicolons until it is known
//! whether one is needed.

use crate::js::lexer::is_identifier_part;
use jscrunch_core::LayoutOptions;

pub struct SourceWriter {
    out: String,
    layout: LayoutOptions,
    compact: bool,
    level: u32,
    line_start: bool,
    setback: bool,
    last: Option<char>,
    before_last: Option<char>,
    last_regexp: bool,
    last_open_number: bool,
    pending_semi: bool,
}

impl SourceWriter {
    pub fn new(layout: LayoutOptions, compact: bool) -> Self {
        Self {
            out: String::new(),
            layout,
            compact,
            level: 0,
            line_start: true,
            setback: false,
            last: None,
            before_last: None,
            last_regexp: false,
            last_open_number: false,
            pending_semi: false,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Append a token, separating it from the previous one when they would
    /// read back as a different token sequence
    pub fn token(&mut self, text: &str) {
        let Some(first) = text.chars().next() else {
            return;
        };
        if self.pending_semi {
            self.pending_semi = false;
            if text != "}" {
                self.raw(";");
            }
        }
        if self.line_start && !self.compact {
            self.write_indent();
        } else if self.needs_space(first) {
            self.out.push(' ');
        }
        self.raw(text);
        self.last_regexp = false;
        self.last_open_number = false;
    }

    pub fn regexp(&mut self, text: &str) {
        self.token(text);
        self.last_regexp = true;
    }

    /// A numeric literal. One ending in `.` must not run into a following word.
    pub fn number(&mut self, text: &str) {
        self.token(text);
        self.last_open_number = text.ends_with('.');
    }

    /// Space that only the expanded layout keeps
    pub fn space(&mut self) {
        if !self.compact && !self.line_start {
            self.out.push(' ');
            self.before_last = self.last;
            self.last = Some(' ');
        }
    }

    /// End of a statement
    pub fn semicolon(&mut self) {
        if self.compact {
            self.pending_semi = true;
        } else {
            self.token(";");
        }
    }

    /// A `;` that must stay, like an empty statement
    pub fn hard_semicolon(&mut self) {
        self.token(";");
    }

    pub fn newline(&mut self) {
        if self.compact || self.line_start {
            return;
        }
        self.out.push('\n');
        self.line_start = true;
        self.setback = false;
    }

    pub fn blank_line(&mut self) {
        if self.compact {
            return;
        }
        self.newline();
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Place the next line left of the current indentation by the label setback
    pub fn setback_next_line(&mut self) {
        self.setback = true;
    }

    /// A comment on a line of its own
    pub fn comment(&mut self, text: &str) {
        if self.compact {
            return;
        }
        self.newline();
        self.write_indent();
        self.raw(text);
        self.newline();
    }

    pub fn finish(mut self) -> String {
        if !self.compact && !self.line_start {
            self.out.push('\n');
        }
        if !self.compact {
            while self.out.ends_with("\n\n") {
                self.out.pop();
            }
        }
        std::mem::take(&mut self.out)
    }

    fn column(&self) -> u32 {
        let column = self.layout.offset + self.level * self.layout.indent;
        if self.setback {
            column.saturating_sub(self.layout.label_setback)
        } else {
            column
        }
    }

    fn write_indent(&mut self) {
        let indent = self.layout.indent_string(self.column());
        self.out.push_str(&indent);
        self.line_start = false;
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        let mut tail = text.chars().rev();
        let last = tail.next();
        self.before_last = tail.next().or(self.last);
        self.last = last;
        self.line_start = false;
    }

    fn needs_space(&self, first: char) -> bool {
        let Some(last) = self.last else {
            return false;
        };
        if last == ' ' || last == '\n' {
            return false;
        }
        if is_word_char(last) && is_word_char(first) {
            return true;
        }
        if (self.last_regexp || self.last_open_number) && is_word_char(first) {
            return true;
        }
        match (last, first) {
            ('+', '+') | ('-', '-') => true,
            ('/', '/') | ('/', '*') => true,
            ('<', '!') => true,
            ('-', '>') => self.before_last == Some('-'),
            _ => false,
        }
    }
}

fn is_word_char(c: char) -> bool {
    is_identifier_part(c) || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact() -> SourceWriter {
        SourceWriter::new(LayoutOptions::flat(), true)
    }

    #[test]
    fn test_words_are_separated() {
        let mut w = compact();
        for t in ["return", "typeof", "x", "in", "y"] {
            w.token(t);
        }
        assert_eq!(w.finish(), "return typeof x in y");
    }

    #[test]
    fn test_fusing_operators_are_separated() {
        let mut w = compact();
        for t in ["a", "+", "++", "b", "-", "-", "c", "/", "/re/"] {
            w.token(t);
        }
        assert_eq!(w.finish(), "a+ ++b- -c/ /re/");
    }

    #[test]
    fn test_regexp_flags_not_extended() {
        let mut w = compact();
        w.regexp("/a/");
        w.token("in");
        w.token("o");
        assert_eq!(w.finish(), "/a/ in o");
    }

    #[test]
    fn test_trailing_dot_number_not_extended() {
        let mut w = compact();
        w.number("1.");
        w.token("in");
        w.token("o");
        w.token("+");
        w.number("2.5");
        w.token("in");
        assert_eq!(w.finish(), "1. in o+2.5 in");
    }

    #[test]
    fn test_html_comment_openers_split() {
        let mut w = compact();
        for t in ["a", "<", "!", "--", "b"] {
            w.token(t);
        }
        assert_eq!(w.finish(), "a< !--b");
    }

    #[test]
    fn test_pending_semicolon() {
        let mut w = compact();
        w.token("{");
        w.token("a");
        w.semicolon();
        w.token("b");
        w.semicolon();
        w.token("}");
        w.token("c");
        w.semicolon();
        assert_eq!(w.finish(), "{a;b}c");
    }

    #[test]
    fn test_expanded_indent_and_setback() {
        let mut w = SourceWriter::new(LayoutOptions::default(), false);
        w.token("{");
        w.newline();
        w.indent();
        w.setback_next_line();
        w.token("case");
        w.newline();
        w.token("x");
        w.semicolon();
        w.newline();
        w.outdent();
        w.token("}");
        assert_eq!(w.finish(), "{\n  case\n    x;\n}\n");
    }

    #[test]
    fn test_tabs() {
        let mut w = SourceWriter::new(LayoutOptions::new(0, 4, 2, true, false), false);
        w.indent();
        w.indent();
        w.token("x");
        assert_eq!(w.finish(), "\t\tx\n");
    }
}
