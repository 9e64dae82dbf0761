//! Token quoting for the manifest grammar
//!
//! String values in a manifest may be written bare or double-quoted.
//! Bare tokens are restricted to a safe character set; anything else,
//! including the empty string, must be quoted with backslash escapes.

/// Characters allowed in an unquoted value token.
fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.' | '-')
}

/// Whether `value` can be written without quotes.
pub fn is_bare_token(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_bare_char)
}

/// Render a value the way the manifest grammar expects: bare when the
/// character set allows it, double-quoted with escapes otherwise.
pub fn quote_if_needed(value: &str) -> String {
    if is_bare_token(value) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Undo [`quote_if_needed`]: strip surrounding quotes and resolve escapes.
/// Bare tokens pass through unchanged.
pub fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(escaped) => value.push(escaped),
            None => value.push('\\'),
        }
    }
    value
}
