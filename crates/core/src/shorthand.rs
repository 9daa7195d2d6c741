//! Shorthand class tokens for block attributes.
//!
//! Authors write `{.1/2 .!red}` and get `wide-6 alert-danger`. Tokens match
//! ASCII-case-insensitively; unknown tokens pass through unchanged.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::options::ScanOptions;

/// Built-in shorthand tokens and the classes they expand to.
pub const DEFAULT_CLASS_SHORTHANDS: &[(&str, &str)] = &[
    ("1/1", "wide-12"),
    ("1/2", "wide-6"),
    ("1/3", "wide-4"),
    ("1/4", "wide-3"),
    ("1/6", "wide-2"),
    ("<->", "flex-1"),
    ("!red", "alert-danger"),
    ("!yellow", "alert-warning"),
    ("!blue", "alert-primary"),
    ("!green", "alert-success"),
    ("!grey", "alert-neutral"),
    ("!gray", "alert-neutral"),
];

static DEFAULT_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DEFAULT_CLASS_SHORTHANDS.iter().copied().collect());

/// Expands a class token through the built-in table only.
pub fn expand_class(token: &str) -> Cow<'_, str> {
    match DEFAULT_INDEX.get(token.to_ascii_lowercase().as_str()) {
        Some(class) => Cow::Borrowed(*class),
        None => Cow::Borrowed(token),
    }
}

/// Expands a class token honoring user overrides and the expansion switch.
pub fn expand_class_with<'a>(token: &'a str, options: &'a ScanOptions) -> Cow<'a, str> {
    if !options.expand_shorthand_classes {
        return Cow::Borrowed(token);
    }
    if !options.class_shorthands.is_empty() {
        let key = token.to_ascii_lowercase();
        if let Some(class) = options.class_shorthands.get(&key) {
            return Cow::Borrowed(class.as_str());
        }
    }
    expand_class(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table() {
        let cases = [
            ("1/1", "wide-12"),
            ("1/2", "wide-6"),
            ("1/3", "wide-4"),
            ("1/4", "wide-3"),
            ("1/6", "wide-2"),
            ("<->", "flex-1"),
            ("!red", "alert-danger"),
            ("!YELLOW", "alert-warning"),
            ("!Blue", "alert-primary"),
            ("!green", "alert-success"),
            ("!grey", "alert-neutral"),
            ("!GRAY", "alert-neutral"),
            ("wide-class", "wide-class"),
            ("Note", "Note"),
        ];
        for (token, expected) in cases {
            assert_eq!(expand_class(token), expected, "token {token:?}");
        }
    }

    #[test]
    fn overrides_win_over_builtins() {
        let options = ScanOptions::default().with_shorthand("!RED", "danger");
        assert_eq!(expand_class_with("!red", &options), "danger");
        assert_eq!(expand_class_with("1/2", &options), "wide-6");
    }

    #[test]
    fn verbatim_options_disable_expansion() {
        let options = ScanOptions::verbatim().with_shorthand("x", "y");
        assert_eq!(expand_class_with("1/2", &options), "1/2");
        assert_eq!(expand_class_with("x", &options), "x");
    }
}
