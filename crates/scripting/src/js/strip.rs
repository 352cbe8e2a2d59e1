//! Comment removal without parsing
//!
//! Runs the lexer over the text to find comment boundaries and cuts them
//! out of the original characters, so scripts the grammar rejects can
//! still be cleaned. Everything that is not a comment is kept as written.

use super::lexer::{slash_starts_regexp, Comment, Lexer, Token};
use super::token::TokenType;
use jscrunch_core::{Locale, Result, ScriptVersion};
use tracing::debug;

/// Remove every comment from `source`.
///
/// A comment between two tokens on one line leaves a single space, a block
/// comment spanning lines leaves one line break, and lines that held
/// nothing but comments are dropped.
pub fn strip_comments(
    source: &str,
    source_name: &str,
    version: ScriptVersion,
    locale: Locale,
) -> Result<String> {
    let comments = scan_comments(source, source_name, version, locale)?;
    debug!(source_name, comments = comments.len(), "stripping comments");
    if comments.is_empty() {
        return Ok(source.to_string());
    }

    let mut out = String::with_capacity(source.len());
    let mut cuts = Vec::with_capacity(comments.len());
    let mut cursor = 0;
    for comment in &comments {
        out.push_str(&source[cursor..comment.start]);
        cuts.push(out.len());
        if comment.block && comment.has_newline {
            out.push('\n');
        } else {
            let before = out.chars().next_back();
            let after = source[comment.end..].chars().next();
            if let (Some(b), Some(a)) = (before, after) {
                if !b.is_whitespace() && !a.is_whitespace() {
                    out.push(' ');
                }
            }
        }
        cursor = comment.end;
    }
    out.push_str(&source[cursor..]);

    Ok(drop_emptied_lines(&out, &cuts))
}

fn scan_comments(
    source: &str,
    source_name: &str,
    version: ScriptVersion,
    locale: Locale,
) -> Result<Vec<Comment>> {
    let mut lexer = Lexer::new(source, source_name, 1, version, locale).with_comments(true);
    let mut context = SlashContext::default();
    loop {
        let mut tok = lexer.next_token()?;
        if tok.is(TokenType::Eof) {
            break;
        }
        if tok.is_slash() && version.has_regexp_literals() && context.starts_regexp() {
            tok = lexer.scan_regexp(&tok)?;
        }
        context.push(tok);
    }
    Ok(lexer.take_comments())
}

/// Token context for telling a regexp `/` from division without a grammar
#[derive(Default)]
struct SlashContext {
    prev: Option<Token>,
    /// One entry per open `(`, true when it opened an `if`/`while`/`for`/`with` header
    parens: Vec<bool>,
    /// The last token was the `)` of such a header, so a statement follows
    header_closed: bool,
}

impl SlashContext {
    fn starts_regexp(&self) -> bool {
        self.header_closed || slash_starts_regexp(self.prev.as_ref())
    }

    fn push(&mut self, tok: Token) {
        self.header_closed = false;
        match tok.ty {
            TokenType::LP => {
                let header = self.prev.as_ref().is_some_and(|p| {
                    matches!(
                        p.ty,
                        TokenType::If | TokenType::While | TokenType::For | TokenType::With
                    )
                });
                self.parens.push(header);
            }
            TokenType::RP => self.header_closed = self.parens.pop().unwrap_or(false),
            _ => {}
        }
        self.prev = Some(tok);
    }
}

/// Trim lines a comment was cut from and drop the ones left blank
fn drop_emptied_lines(text: &str, cuts: &[usize]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cuts = cuts.iter().peekable();
    let mut start = 0;
    for piece in text.split_inclusive('\n') {
        let end = start + piece.len();
        let mut touched = false;
        while let Some(&&cut) = cuts.peek() {
            if cut >= end {
                break;
            }
            touched = true;
            cuts.next();
        }
        // A cut at the very end of the text belongs to the last line
        if end == text.len() && cuts.peek().is_some() {
            touched = true;
        }
        start = end;

        if !touched {
            out.push_str(piece);
            continue;
        }
        let (content, ending) = split_line_ending(piece);
        let content = content.trim_end();
        if content.trim_start().is_empty() {
            continue;
        }
        out.push_str(content);
        out.push_str(ending);
    }
    out
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        (stripped, "\r\n")
    } else if let Some(stripped) = line.strip_suffix('\n') {
        (stripped, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(src: &str) -> String {
        strip_comments(src, "<script>", ScriptVersion::Default, Locale::English).unwrap()
    }

    #[test]
    fn test_line_comment_line_dropped() {
        assert_eq!(strip("var a = 1;\n// note\nvar b = 2;"), "var a = 1;\nvar b = 2;");
    }

    #[test]
    fn test_trailing_comment_trimmed() {
        assert_eq!(strip("a(); // call\nb();\n"), "a();\nb();\n");
        assert_eq!(strip("a(); /* end */"), "a();");
    }

    #[test]
    fn test_inline_comment_leaves_space() {
        assert_eq!(strip("var/**/x = 1;"), "var x = 1;");
        assert_eq!(strip("x = a /* op */ + b;"), "x = a  + b;");
    }

    #[test]
    fn test_multiline_block_keeps_break() {
        assert_eq!(strip("return /* a\n b */ x;"), "return\n x;");
    }

    #[test]
    fn test_comment_markers_inside_literals() {
        assert_eq!(strip("s = '// not'; r = /\\/*x/;"), "s = '// not'; r = /\\/*x/;");
        assert_eq!(strip("x = a / b; // half\n"), "x = a / b;\n");
    }

    #[test]
    fn test_grammar_errors_do_not_matter() {
        assert_eq!(strip("var = ; // broken\n"), "var = ;\n");
    }

    #[test]
    fn test_lexical_errors_raise() {
        let err = strip_comments("x = 'open\n", "<script>", ScriptVersion::Default, Locale::English)
            .unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn test_regexp_after_statement_header() {
        assert_eq!(strip("if (x) /'/.test(y); // c\n"), "if (x) /'/.test(y);\n");
        assert_eq!(
            strip("while (f(a)) /\\//.exec(s); /* c */"),
            "while (f(a)) /\\//.exec(s);"
        );
        assert_eq!(strip("x = (a) / 2 / b; // c"), "x = (a) / 2 / b;");
        assert_eq!(strip("if (g(a) / 2 / b) y(); // c"), "if (g(a) / 2 / b) y();");
    }

    #[test]
    fn test_crlf_preserved() {
        assert_eq!(strip("a();\r\n// c\r\nb();\r\n"), "a();\r\nb();\r\n");
    }
}
