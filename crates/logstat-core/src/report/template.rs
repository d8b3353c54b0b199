use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Placeholder name replaced with the JSON table
pub const TABLE_PLACEHOLDER: &str = "table_json";

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\})").unwrap();
}

/// Replace `$table_json` and `${table_json}` with `table_json`.
///
/// `$$` collapses to a literal `$`. Any other placeholder is left untouched.
pub fn substitute(template: &str, table_json: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| expand(caps, table_json))
        .into_owned()
}

/// Byte offset of the first table placeholder in `template`
pub(crate) fn first_placeholder(template: &str) -> Option<usize> {
    PLACEHOLDER
        .captures_iter(template)
        .find(|caps| placeholder_name(caps) == Some(TABLE_PLACEHOLDER))
        .and_then(|caps| caps.get(0))
        .map(|m| m.start())
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
}

fn expand(caps: &Captures, table_json: &str) -> String {
    if caps.get(1).is_some() {
        return "$".to_string();
    }
    match placeholder_name(caps) {
        Some(TABLE_PLACEHOLDER) => table_json.to_string(),
        _ => caps[0].to_string(),
    }
}
