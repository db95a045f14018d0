//! Identifier helpers
//!
//! Quoting for emitted SQL and readable labels for generated docs.

use inflector::Inflector;

/// Quote an identifier with backticks, doubling any embedded backtick
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a list of identifiers as a comma separated list without spaces
pub fn quote_identifier_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(",")
}

/// Turn a column name into a readable label, e.g. `created_at` -> `Created at`
pub fn humanize(name: &str) -> String {
    name.to_sentence_case()
}
