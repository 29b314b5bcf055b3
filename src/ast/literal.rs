use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    Blob,
    Null,
}

static BLOB_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[xX]'([0-9a-fA-F]*)'$").expect("blob literal pattern"));

/// Strips one level of quoting (`'..'`, `".."`, `[..]` or `` `..` ``),
/// collapsing doubled quote characters inside.
pub fn dequote(text: &str) -> String {
    let mut chars = text.chars();
    let (open, close) = match chars.next() {
        Some('\'') => ('\'', '\''),
        Some('"') => ('"', '"'),
        Some('`') => ('`', '`'),
        Some('[') => ('[', ']'),
        _ => return text.to_string(),
    };
    let inner = &text[open.len_utf8()..];
    let mut out = String::with_capacity(inner.len());
    let mut it = inner.chars().peekable();
    while let Some(c) = it.next() {
        if c == close {
            if open != '[' && it.peek() == Some(&close) {
                out.push(close);
                it.next();
                continue;
            }
            break;
        }
        out.push(c);
    }
    out
}

/// Whether `text` is a double-quoted token, which may name a column or be a string.
pub fn is_double_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Decodes an `x'..'` blob literal; odd digit counts are malformed.
pub fn decode_blob(text: &str) -> Option<Vec<u8>> {
    let hex = BLOB_LITERAL.captures(text)?.get(1)?.as_str();
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Quotes `value` as a single-quoted SQL string literal.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequote_handles_all_quote_styles() {
        assert_eq!(dequote("'it''s'"), "it's");
        assert_eq!(dequote("\"col\"\"x\""), "col\"x");
        assert_eq!(dequote("[my col]"), "my col");
        assert_eq!(dequote("`c`"), "c");
        assert_eq!(dequote("plain"), "plain");
        assert_eq!(dequote(&quote_string("a'b")), "a'b");
    }

    #[test]
    fn blob_literals() {
        assert_eq!(decode_blob("x'0aFF'"), Some(vec![0x0a, 0xff]));
        assert_eq!(decode_blob("X''"), Some(vec![]));
        assert_eq!(decode_blob("x'abc'"), None);
        assert_eq!(decode_blob("x'zz'"), None);
    }

    #[test]
    fn double_quote_detection() {
        assert!(is_double_quoted("\"a\""));
        assert!(!is_double_quoted("'a'"));
        assert!(!is_double_quoted("\""));
    }
}
