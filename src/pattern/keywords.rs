//! Reserved words and the identifier grammar
//!
//! Used by the `IdentifierString` pattern and by path rendering, which
//! quotes keys that are not plain identifiers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Words that are never accepted as identifiers
pub const RESERVED_WORDS: &[&str] = &[
    "do", "if", "in", "for", "let", "new", "try", "var", "case", "else", "enum", "eval",
    "false", "null", "this", "true", "void", "with", "break", "catch", "class", "const",
    "super", "throw", "while", "yield", "delete", "export", "import", "public", "return",
    "static", "switch", "typeof", "default", "extends", "finally", "package", "private",
    "continue", "debugger", "function", "arguments", "interface", "protected",
    "implements", "instanceof",
];

static RESERVED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

/// Identifier grammar: a letter, `_` or `$`, then letters, digits, `_` or `$`
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z_$][0-9a-z_$]*$").expect("Invalid identifier regex"));

/// Returns true if `word` is in the reserved-word table
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_SET.contains(word)
}

/// Returns true if `candidate` follows the identifier grammar
pub fn is_identifier(candidate: &str) -> bool {
    IDENTIFIER.is_match(candidate)
}

/// Returns true if `candidate` is a valid identifier and not a reserved word
pub fn is_identifier_string(candidate: &str) -> bool {
    is_identifier(candidate) && !is_reserved_word(candidate)
}
