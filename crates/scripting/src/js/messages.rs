//! Diagnostic messages in each supported locale

use jscrunch_core::{Locale, ScriptVersion, WarningKind};

/// A diagnostic raised by the tokenizer or parser.
///
/// Errors and warnings share this type; `warning_kind` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    // Lexical
    UnterminatedString,
    UnterminatedComment,
    UnterminatedRegExp,
    InvalidEscape,
    IllegalCharacter(char),
    BadNumber(String),
    IdentifierAfterNumber,
    BadIdentifierEscape,
    ReservedWord(String),
    RegExpUnsupported(ScriptVersion),
    StrictEqualityUnsupported(ScriptVersion),

    // Grammar
    Unexpected(String),
    MissingSemicolon,
    Missing(Expected),
    BadAssignLeft,
    BadIncDecOperand,
    BadForInLeft,
    BadReturn,
    BadBreak,
    BadContinue,
    UndefinedLabel(String),
    DuplicateLabel(String),
    ContinueToNonLoop(String),
    DuplicateDefault,
    MissingCatchOrFinally,
    ThrowNewline,
    CatchGuardUnsupported(ScriptVersion),

    // Warnings
    SemicolonInserted,
    NoSideEffects,
    AssignmentAsCondition,
    TrailingComma,
    FutureKeyword(String, ScriptVersion),
    VarRedeclared(String),
    ReservedPropertyName(String),
}

/// The construct a `Missing` diagnostic was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    ParenAfter(&'static str),
    ParenAfterCondition,
    ParenAfterArguments,
    ParenAfterParameters,
    ParenInParenthetical,
    ParenAfterForControl,
    BraceBeforeBody(&'static str),
    BraceAfterBody(&'static str),
    BracketInIndex,
    BracketAfterElements,
    BraceAfterProperties,
    ColonAfterPropertyId,
    ColonInConditional,
    ColonAfterCase,
    SemicolonAfterForInit,
    SemicolonAfterForCondition,
    WhileAfterDo,
    VariableName,
    FunctionName,
    FormalParameter,
    NameAfterDot,
    PropertyId,
    CatchVariable,
    Operand,
}

impl Msg {
    pub fn warning_kind(&self) -> Option<WarningKind> {
        let kind = match self {
            Msg::SemicolonInserted => WarningKind::MissingSemicolon,
            Msg::NoSideEffects => WarningKind::NoSideEffects,
            Msg::AssignmentAsCondition => WarningKind::AssignmentAsCondition,
            Msg::TrailingComma => WarningKind::TrailingComma,
            Msg::FutureKeyword(..) => WarningKind::FutureKeyword,
            Msg::VarRedeclared(_) => WarningKind::VarRedeclared,
            Msg::ReservedPropertyName(_) => WarningKind::ReservedPropertyName,
            _ => return None,
        };
        Some(kind)
    }

    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::English => self.english(),
            Locale::French => self.french(),
        }
    }

    fn english(&self) -> String {
        match self {
            Msg::UnterminatedString => "unterminated string literal".into(),
            Msg::UnterminatedComment => "unterminated comment".into(),
            Msg::UnterminatedRegExp => "unterminated regular expression literal".into(),
            Msg::InvalidEscape => "invalid escape sequence".into(),
            Msg::IllegalCharacter(c) => format!("illegal character {c:?}"),
            Msg::BadNumber(text) => format!("malformed number literal {text}"),
            Msg::IdentifierAfterNumber => "identifier starts immediately after numeric literal".into(),
            Msg::BadIdentifierEscape => "invalid Unicode escape in identifier".into(),
            Msg::ReservedWord(word) => format!("identifier is a reserved word: {word}"),
            Msg::RegExpUnsupported(v) => {
                format!("regular expression literals are not supported in JavaScript {v}")
            }
            Msg::StrictEqualityUnsupported(v) => {
                format!("strict equality operators are not supported in JavaScript {v}")
            }
            Msg::Unexpected(what) => format!("syntax error: unexpected {what}"),
            Msg::MissingSemicolon => "missing ; before statement".into(),
            Msg::Missing(expected) => expected.english(),
            Msg::BadAssignLeft => "invalid assignment left-hand side".into(),
            Msg::BadIncDecOperand => "invalid increment/decrement operand".into(),
            Msg::BadForInLeft => "invalid for/in left-hand side".into(),
            Msg::BadReturn => "invalid return".into(),
            Msg::BadBreak => "unlabelled break must be inside loop or switch".into(),
            Msg::BadContinue => "continue must be inside loop".into(),
            Msg::UndefinedLabel(name) => format!("undefined label {name}"),
            Msg::DuplicateLabel(name) => format!("duplicate label {name}"),
            Msg::ContinueToNonLoop(name) => format!("continue target {name} is not a loop"),
            Msg::DuplicateDefault => "more than one switch default".into(),
            Msg::MissingCatchOrFinally => "missing catch or finally after try".into(),
            Msg::ThrowNewline => "line terminator is not allowed after throw".into(),
            Msg::CatchGuardUnsupported(v) => {
                format!("conditional catch clauses are not supported in JavaScript {v}")
            }
            Msg::SemicolonInserted => "missing ; after statement".into(),
            Msg::NoSideEffects => "code has no side effects".into(),
            Msg::AssignmentAsCondition => {
                "test for equality (==) mistyped as assignment (=)?".into()
            }
            Msg::TrailingComma => "trailing comma is not legal in ECMA-262 literals".into(),
            Msg::FutureKeyword(word, v) => {
                format!("{word} is a keyword in JavaScript {v} and later")
            }
            Msg::VarRedeclared(name) => format!("redeclaration of var {name}"),
            Msg::ReservedPropertyName(word) => {
                format!("reserved word {word} used as a property name")
            }
        }
    }

    fn french(&self) -> String {
        match self {
            Msg::UnterminatedString => "chaîne littérale non terminée".into(),
            Msg::UnterminatedComment => "commentaire non terminé".into(),
            Msg::UnterminatedRegExp => "expression régulière littérale non terminée".into(),
            Msg::InvalidEscape => "séquence d'échappement invalide".into(),
            Msg::IllegalCharacter(c) => format!("caractère illégal {c:?}"),
            Msg::BadNumber(text) => format!("nombre littéral mal formé {text}"),
            Msg::IdentifierAfterNumber => {
                "un identificateur suit immédiatement un nombre littéral".into()
            }
            Msg::BadIdentifierEscape => "échappement Unicode invalide dans un identificateur".into(),
            Msg::ReservedWord(word) => format!("l'identificateur est un mot réservé : {word}"),
            Msg::RegExpUnsupported(v) => format!(
                "les expressions régulières littérales ne sont pas prises en charge en JavaScript {v}"
            ),
            Msg::StrictEqualityUnsupported(v) => format!(
                "les opérateurs d'égalité stricte ne sont pas pris en charge en JavaScript {v}"
            ),
            Msg::Unexpected(what) => format!("erreur de syntaxe : {what} inattendu"),
            Msg::MissingSemicolon => "; manquant avant l'instruction".into(),
            Msg::Missing(expected) => expected.french(),
            Msg::BadAssignLeft => "partie gauche de l'affectation invalide".into(),
            Msg::BadIncDecOperand => "opérande d'incrémentation/décrémentation invalide".into(),
            Msg::BadForInLeft => "partie gauche de for/in invalide".into(),
            Msg::BadReturn => "return invalide".into(),
            Msg::BadBreak => {
                "un break sans étiquette doit se trouver dans une boucle ou un switch".into()
            }
            Msg::BadContinue => "continue doit se trouver dans une boucle".into(),
            Msg::UndefinedLabel(name) => format!("étiquette {name} non définie"),
            Msg::DuplicateLabel(name) => format!("étiquette {name} en double"),
            Msg::ContinueToNonLoop(name) => format!("la cible de continue {name} n'est pas une boucle"),
            Msg::DuplicateDefault => "plus d'un default dans le switch".into(),
            Msg::MissingCatchOrFinally => "catch ou finally manquant après try".into(),
            Msg::ThrowNewline => "fin de ligne interdite après throw".into(),
            Msg::CatchGuardUnsupported(v) => format!(
                "les clauses catch conditionnelles ne sont pas prises en charge en JavaScript {v}"
            ),
            Msg::SemicolonInserted => "; manquant après l'instruction".into(),
            Msg::NoSideEffects => "le code n'a pas d'effet de bord".into(),
            Msg::AssignmentAsCondition => {
                "test d'égalité (==) saisi par erreur comme affectation (=) ?".into()
            }
            Msg::TrailingComma => {
                "une virgule finale n'est pas autorisée dans les littéraux ECMA-262".into()
            }
            Msg::FutureKeyword(word, v) => {
                format!("{word} est un mot clé à partir de JavaScript {v}")
            }
            Msg::VarRedeclared(name) => format!("redéclaration de la variable {name}"),
            Msg::ReservedPropertyName(word) => {
                format!("mot réservé {word} utilisé comme nom de propriété")
            }
        }
    }
}

impl Expected {
    fn english(&self) -> String {
        match self {
            Expected::ParenAfter(kw) => format!("missing ( after {kw}"),
            Expected::ParenAfterCondition => "missing ) after condition".into(),
            Expected::ParenAfterArguments => "missing ) after argument list".into(),
            Expected::ParenAfterParameters => "missing ) after formal parameters".into(),
            Expected::ParenInParenthetical => "missing ) in parenthetical".into(),
            Expected::ParenAfterForControl => "missing ) after for-loop control".into(),
            Expected::BraceBeforeBody(what) => format!("missing {{ before {what} body"),
            Expected::BraceAfterBody(what) => format!("missing }} after {what} body"),
            Expected::BracketInIndex => "missing ] in index expression".into(),
            Expected::BracketAfterElements => "missing ] after element list".into(),
            Expected::BraceAfterProperties => "missing } after property list".into(),
            Expected::ColonAfterPropertyId => "missing : after property id".into(),
            Expected::ColonInConditional => "missing : in conditional expression".into(),
            Expected::ColonAfterCase => "missing : after case expression".into(),
            Expected::SemicolonAfterForInit => "missing ; after for-loop initializer".into(),
            Expected::SemicolonAfterForCondition => "missing ; after for-loop condition".into(),
            Expected::WhileAfterDo => "missing while after do-loop body".into(),
            Expected::VariableName => "missing variable name".into(),
            Expected::FunctionName => "missing function name".into(),
            Expected::FormalParameter => "missing formal parameter".into(),
            Expected::NameAfterDot => "missing name after . operator".into(),
            Expected::PropertyId => "invalid property id".into(),
            Expected::CatchVariable => "missing identifier in catch".into(),
            Expected::Operand => "syntax error: missing operand".into(),
        }
    }

    fn french(&self) -> String {
        match self {
            Expected::ParenAfter(kw) => format!("( manquante après {kw}"),
            Expected::ParenAfterCondition => ") manquante après la condition".into(),
            Expected::ParenAfterArguments => ") manquante après la liste d'arguments".into(),
            Expected::ParenAfterParameters => ") manquante après les paramètres formels".into(),
            Expected::ParenInParenthetical => ") manquante dans l'expression entre parenthèses".into(),
            Expected::ParenAfterForControl => ") manquante après le contrôle de la boucle for".into(),
            Expected::BraceBeforeBody(what) => format!("{{ manquante avant le corps de {what}"),
            Expected::BraceAfterBody(what) => format!("}} manquante après le corps de {what}"),
            Expected::BracketInIndex => "] manquant dans l'expression d'index".into(),
            Expected::BracketAfterElements => "] manquant après la liste d'éléments".into(),
            Expected::BraceAfterProperties => "} manquante après la liste de propriétés".into(),
            Expected::ColonAfterPropertyId => ": manquant après l'identifiant de propriété".into(),
            Expected::ColonInConditional => ": manquant dans l'expression conditionnelle".into(),
            Expected::ColonAfterCase => ": manquant après l'expression case".into(),
            Expected::SemicolonAfterForInit => "; manquant après l'initialisation de la boucle for".into(),
            Expected::SemicolonAfterForCondition => "; manquant après la condition de la boucle for".into(),
            Expected::WhileAfterDo => "while manquant après le corps de la boucle do".into(),
            Expected::VariableName => "nom de variable manquant".into(),
            Expected::FunctionName => "nom de fonction manquant".into(),
            Expected::FormalParameter => "paramètre formel manquant".into(),
            Expected::NameAfterDot => "nom manquant après l'opérateur .".into(),
            Expected::PropertyId => "identifiant de propriété invalide".into(),
            Expected::CatchVariable => "identificateur manquant dans catch".into(),
            Expected::Operand => "erreur de syntaxe : opérande manquant".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_messages() {
        assert_eq!(Msg::MissingSemicolon.text(Locale::English), "missing ; before statement");
        assert_eq!(
            Msg::Missing(Expected::BraceBeforeBody("function")).text(Locale::English),
            "missing { before function body"
        );
        assert_eq!(
            Msg::FutureKeyword("try".into(), ScriptVersion::V1_4).text(Locale::English),
            "try is a keyword in JavaScript 1.4 and later"
        );
    }

    #[test]
    fn test_french_messages() {
        assert_eq!(Msg::MissingSemicolon.text(Locale::French), "; manquant avant l'instruction");
        assert_eq!(Msg::UndefinedLabel("x".into()).text(Locale::French), "étiquette x non définie");
    }

    #[test]
    fn test_warning_kinds() {
        assert_eq!(Msg::NoSideEffects.warning_kind(), Some(WarningKind::NoSideEffects));
        assert_eq!(Msg::BadReturn.warning_kind(), None);
    }
}
