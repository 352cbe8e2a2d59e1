//! Stateless entry points
//!
//! Each call builds its own options, so these are safe to use from any
//! number of threads. File variants read the whole file up front and use
//! its path as the source name in diagnostics.

use crate::cruncher::{render, require_text, DEFAULT_SOURCE_NAME};
use crate::js::decompiler::DecompileOptions;
use crate::js::parser::{parse, ParseOptions, ScriptTree};
use jscrunch_core::{CrunchError, LayoutOptions, Result, ScriptVersion, Warning};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

fn parse_options(source_name: Option<&str>, version: ScriptVersion, keep_comments: bool) -> ParseOptions {
    ParseOptions {
        source_name: source_name.unwrap_or(DEFAULT_SOURCE_NAME).to_string(),
        version,
        keep_comments,
        ..ParseOptions::default()
    }
}

fn log_warning(warning: &Warning) {
    warn!(source = %warning.source_name, line = warning.line, "{}", warning.message);
}

/// Read a script file. The handle is closed before returning.
fn read_script(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading script");
    let mut file = File::open(path).map_err(|e| CrunchError::io(path, e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| CrunchError::io(path, e))?;
    Ok(text)
}

fn source_name(path: &Path) -> String {
    path.display().to_string()
}

/// Parse `text` into a tree
pub fn parse_script(text: &str, source_name: Option<&str>, version: ScriptVersion) -> Result<ScriptTree> {
    require_text(text)?;
    Ok(parse(text, &parse_options(source_name, version, false))?.tree)
}

pub fn parse_script_file(path: impl AsRef<Path>, version: ScriptVersion) -> Result<ScriptTree> {
    let path = path.as_ref();
    let text = read_script(path)?;
    parse_script(&text, Some(&source_name(path)), version)
}

/// Reformat with the default layout, keeping comments
pub fn format_script(text: &str, version: ScriptVersion) -> Result<String> {
    format_script_with(text, LayoutOptions::default(), version)
}

/// Reformat with an explicit layout, keeping comments
pub fn format_script_with(text: &str, layout: LayoutOptions, version: ScriptVersion) -> Result<String> {
    format_named(text, None, layout, version)
}

pub fn format_script_file(path: impl AsRef<Path>, version: ScriptVersion) -> Result<String> {
    format_script_file_with(path, LayoutOptions::default(), version)
}

pub fn format_script_file_with(
    path: impl AsRef<Path>,
    layout: LayoutOptions,
    version: ScriptVersion,
) -> Result<String> {
    let path = path.as_ref();
    let text = read_script(path)?;
    format_named(&text, Some(&source_name(path)), layout, version)
}

fn format_named(
    text: &str,
    source_name: Option<&str>,
    layout: LayoutOptions,
    version: ScriptVersion,
) -> Result<String> {
    debug!(?layout, %version, "format");
    render(
        text,
        &parse_options(source_name, version, true),
        &DecompileOptions::expanded(layout).with_comments(true),
        log_warning,
    )
}

/// Compact rendering: no comments, minimal whitespace
pub fn crunch_script(text: &str, source_name: Option<&str>, version: ScriptVersion) -> Result<String> {
    debug!(%version, len = text.len(), "crunch");
    render(
        text,
        &parse_options(source_name, version, false),
        &DecompileOptions::compact(),
        log_warning,
    )
}

pub fn crunch_script_file(path: impl AsRef<Path>, version: ScriptVersion) -> Result<String> {
    let path = path.as_ref();
    let text = read_script(path)?;
    crunch_script(&text, Some(&source_name(path)), version)
}

/// Re-render without comments and without indentation
pub fn remove_comments(text: &str, version: ScriptVersion) -> Result<String> {
    remove_comments_named(text, None, version)
}

pub fn remove_script_file_comments(path: impl AsRef<Path>, version: ScriptVersion) -> Result<String> {
    let path = path.as_ref();
    let text = read_script(path)?;
    remove_comments_named(&text, Some(&source_name(path)), version)
}

fn remove_comments_named(text: &str, source_name: Option<&str>, version: ScriptVersion) -> Result<String> {
    debug!(%version, "remove comments");
    render(
        text,
        &parse_options(source_name, version, false),
        &DecompileOptions::expanded(LayoutOptions::flat()),
        log_warning,
    )
}

/// True when `text` parses. Only syntax errors count as invalid.
pub fn is_valid_script(text: &str, version: ScriptVersion) -> Result<bool> {
    validity(parse_script(text, None, version))
}

pub fn is_valid_script_file(path: impl AsRef<Path>, version: ScriptVersion) -> Result<bool> {
    validity(parse_script_file(path, version))
}

fn validity(parsed: Result<ScriptTree>) -> Result<bool> {
    match parsed {
        Ok(_) => Ok(true),
        Err(e) if e.is_syntax() => {
            debug!(error = %e, "script is not valid");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_format_defaults() {
        assert_eq!(
            format_script("if(a){b()}", ScriptVersion::Default).unwrap(),
            "if (a) {\n    b();\n}\n"
        );
    }

    #[test]
    fn test_format_keeps_comments_remove_drops_them() {
        let src = "var a = 1;\n// note\nvar b = 2;";
        assert_eq!(
            format_script(src, ScriptVersion::Default).unwrap(),
            "var a = 1;\n// note\nvar b = 2;\n"
        );
        assert_eq!(
            remove_comments(src, ScriptVersion::Default).unwrap(),
            "var a = 1;\nvar b = 2;\n"
        );
    }

    #[test]
    fn test_source_name_in_errors() {
        let err = crunch_script("a = ;", Some("app.js"), ScriptVersion::Default).unwrap_err();
        assert!(err.to_string().starts_with("app.js:1:"));
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_script("var x = 1;", ScriptVersion::Default).unwrap());
        assert!(!is_valid_script("var x = ;", ScriptVersion::Default).unwrap());
        assert!(is_valid_script("", ScriptVersion::Default).is_err());
    }

    #[test]
    fn test_file_variants() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "// lib\nfunction id( x ) {{ return x; }}\n").unwrap();

        assert_eq!(
            crunch_script_file(file.path(), ScriptVersion::Default).unwrap(),
            "function id(x){return x}"
        );
        assert_eq!(
            remove_script_file_comments(file.path(), ScriptVersion::Default).unwrap(),
            "function id(x) {\nreturn x;\n}\n"
        );
        assert!(format_script_file(file.path(), ScriptVersion::Default)
            .unwrap()
            .starts_with("// lib\n"));
        assert!(is_valid_script_file(file.path(), ScriptVersion::Default).unwrap());
        let tree = parse_script_file(file.path(), ScriptVersion::Default).unwrap();
        assert_eq!(tree.source_name, file.path().display().to_string());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_script_file("/does/not/exist.js", ScriptVersion::Default).unwrap_err();
        assert!(matches!(err, CrunchError::Io { .. }));
        assert!(is_valid_script_file("/does/not/exist.js", ScriptVersion::Default).is_err());
    }
}
