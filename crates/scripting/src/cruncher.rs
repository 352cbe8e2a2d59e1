//! Cruncher session
//!
//! Holds the dialect, diagnostic language and warning switch for a series
//! of calls, and fans warnings out to registered listeners.

use crate::js::decompiler::{decompile, DecompileOptions};
use crate::js::parser::{parse, ParseOptions, ParseOutput, ScriptTree};
use crate::js::strip::strip_comments;
use jscrunch_core::{CrunchError, LayoutOptions, Locale, Result, ScriptVersion, Warning};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Source name used when the caller gives none
pub const DEFAULT_SOURCE_NAME: &str = "<script>";

/// Callback receiving warnings
pub type WarningListener = Arc<dyn Fn(&Warning) + Send + Sync>;

/// Settings read at the start of every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CruncherOptions {
    pub version: ScriptVersion,
    pub locale: Locale,
    /// Collect and deliver warnings
    pub warnings: bool,
}

/// A configured cruncher.
///
/// Setters take `&mut self`, so a configure-then-run sequence cannot
/// interleave with another call on the same session. Listeners can be
/// added through a shared reference.
pub struct Cruncher {
    options: CruncherOptions,
    source_name: String,
    listeners: RwLock<Vec<WarningListener>>,
}

impl Cruncher {
    pub fn new(options: CruncherOptions) -> Self {
        Self {
            options,
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn options(&self) -> CruncherOptions {
        self.options
    }

    /// Name used in diagnostics
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn set_source_name(&mut self, name: impl Into<String>) {
        self.source_name = name.into();
    }

    pub fn version(&self) -> ScriptVersion {
        self.options.version
    }

    pub fn set_version(&mut self, version: ScriptVersion) {
        self.options.version = version;
    }

    pub fn locale(&self) -> Locale {
        self.options.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.options.locale = locale;
    }

    pub fn warnings(&self) -> bool {
        self.options.warnings
    }

    pub fn set_warnings(&mut self, warnings: bool) {
        self.options.warnings = warnings;
    }

    /// Subscribe to warnings. Without any listener warnings go to the log.
    pub fn on_warning<F>(&self, listener: F)
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    pub fn clear_listeners(&self) {
        self.listeners.write().clear();
    }

    /// Compact rendering of `text`
    pub fn crunch(&self, text: &str) -> Result<String> {
        let options = self.options;
        debug!(version = %options.version, len = text.len(), "crunch");
        render(
            text,
            &self.parse_options(options, false),
            &DecompileOptions::compact(),
            |w| self.emit(w),
        )
    }

    /// Parse `text` into a tree
    pub fn parse(&self, text: &str) -> Result<ScriptTree> {
        let options = self.options;
        debug!(version = %options.version, len = text.len(), "parse");
        require_text(text)?;
        let output = parse(text, &self.parse_options(options, false))?;
        self.deliver(output.warnings);
        Ok(output.tree)
    }

    /// Parse `text`, failing on the first syntax error
    pub fn check(&self, text: &str) -> Result<()> {
        self.parse(text).map(|_| ())
    }

    /// Like [`check`](Self::check), with syntax errors reported as `false`
    pub fn check_syntax(&self, text: &str) -> Result<bool> {
        match self.check(text) {
            Ok(()) => Ok(true),
            Err(e) if e.is_syntax() => {
                debug!(error = %e, "syntax check failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop all comments, validating the grammar on the way
    pub fn remove_comments(&self, text: &str) -> Result<String> {
        self.remove_comments_with(text, true)
    }

    /// Drop all comments. With `check_syntax` the text is parsed and
    /// re-rendered; without it only the lexer runs and the remaining
    /// characters are kept as written.
    pub fn remove_comments_with(&self, text: &str, check_syntax: bool) -> Result<String> {
        let options = self.options;
        debug!(version = %options.version, check_syntax, "remove comments");
        if check_syntax {
            render(
                text,
                &self.parse_options(options, false),
                &DecompileOptions::expanded(LayoutOptions::flat()),
                |w| self.emit(w),
            )
        } else {
            require_text(text)?;
            strip_comments(text, &self.source_name, options.version, options.locale)
        }
    }

    /// Formatted rendering with comments kept
    pub fn format(&self, text: &str, layout: LayoutOptions) -> Result<String> {
        let options = self.options;
        debug!(version = %options.version, "format");
        render(
            text,
            &self.parse_options(options, true),
            &DecompileOptions::expanded(layout).with_comments(true),
            |w| self.emit(w),
        )
    }

    fn parse_options(&self, options: CruncherOptions, keep_comments: bool) -> ParseOptions {
        ParseOptions {
            source_name: self.source_name.clone(),
            start_line: 1,
            version: options.version,
            locale: options.locale,
            warnings: options.warnings,
            keep_comments,
        }
    }

    fn deliver(&self, warnings: Vec<Warning>) {
        for w in &warnings {
            self.emit(w);
        }
    }

    fn emit(&self, warning: &Warning) {
        let listeners = self.listeners.read();
        if listeners.is_empty() {
            warn!(source = %warning.source_name, line = warning.line, "{}", warning.message);
            return;
        }
        for listener in listeners.iter() {
            listener(warning);
        }
    }
}

impl Default for Cruncher {
    fn default() -> Self {
        Self::new(CruncherOptions::default())
    }
}

impl std::fmt::Debug for Cruncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cruncher")
            .field("options", &self.options)
            .field("source_name", &self.source_name)
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

/// Empty input is a caller error, not an empty script
pub(crate) fn require_text(text: &str) -> Result<()> {
    if text.is_empty() {
        Err(CrunchError::InvalidArgument("script text is empty".into()))
    } else {
        Ok(())
    }
}

/// Parse and re-render, handing each warning to `on_warning`
pub(crate) fn render(
    text: &str,
    parse_options: &ParseOptions,
    decompile_options: &DecompileOptions,
    mut on_warning: impl FnMut(&Warning),
) -> Result<String> {
    require_text(text)?;
    let ParseOutput { tree, warnings } = parse(text, parse_options)?;
    for w in &warnings {
        on_warning(w);
    }
    Ok(decompile(&tree, decompile_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscrunch_core::WarningKind;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crunch() {
        let cruncher = Cruncher::default();
        assert_eq!(
            cruncher.crunch("function foo( a , b ) {\n return a+b;\n}").unwrap(),
            "function foo(a,b){return a+b}"
        );
    }

    #[test]
    fn test_check_and_check_syntax() {
        let cruncher = Cruncher::default();
        assert!(cruncher.check("var x = 1;").is_ok());
        assert!(cruncher.check("var x = ;").unwrap_err().is_syntax());
        assert!(!cruncher.check_syntax("var x = ;").unwrap());
        assert!(cruncher.check_syntax("var x = 1;").unwrap());
    }

    #[test]
    fn test_empty_text_is_invalid_argument() {
        let cruncher = Cruncher::default();
        assert!(matches!(
            cruncher.check_syntax(""),
            Err(CrunchError::InvalidArgument(_))
        ));
        assert!(matches!(cruncher.crunch(""), Err(CrunchError::InvalidArgument(_))));
    }

    #[test]
    fn test_version_changes_grammar() {
        let mut cruncher = Cruncher::default();
        assert!(cruncher.check_syntax("a === b;").unwrap());
        cruncher.set_version(ScriptVersion::V1_2);
        assert!(!cruncher.check_syntax("a === b;").unwrap());
    }

    #[test]
    fn test_remove_comments_modes() {
        let cruncher = Cruncher::default();
        let src = "var a = 1;\n// note\nvar b = 2;";
        assert_eq!(cruncher.remove_comments(src).unwrap(), "var a = 1;\nvar b = 2;\n");
        assert_eq!(
            cruncher.remove_comments_with(src, false).unwrap(),
            "var a = 1;\nvar b = 2;"
        );
        assert!(cruncher.remove_comments("var = ; // x").unwrap_err().is_syntax());
        assert_eq!(
            cruncher.remove_comments_with("var = ; // x", false).unwrap(),
            "var = ;"
        );
    }

    #[test]
    fn test_warning_listeners() {
        let mut cruncher = Cruncher::default();
        cruncher.set_warnings(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        cruncher.on_warning(move |w| sink.lock().push(w.kind));

        cruncher.crunch("x = 1\ny = 2").unwrap();
        assert!(seen.lock().contains(&WarningKind::MissingSemicolon));

        seen.lock().clear();
        cruncher.set_warnings(false);
        cruncher.crunch("x = 1\ny = 2").unwrap();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_source_name_in_diagnostics() {
        let mut cruncher = Cruncher::default();
        cruncher.set_source_name("lib/app.js");
        let err = cruncher.check("\nreturn 1;").unwrap_err();
        assert!(err.to_string().starts_with("lib/app.js:2:"));
    }

    #[test]
    fn test_french_messages() {
        let mut cruncher = Cruncher::default();
        cruncher.set_locale(Locale::French);
        let err = cruncher.check("x = #;").unwrap_err();
        assert!(err.to_string().contains("caractère illégal"));
    }
}
