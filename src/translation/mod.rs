use std::borrow::Cow;

use crate::types::PlaceholderStyle;

mod parsers;
mod scanner;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    try_start_dollar_quote,
};
use scanner::{State, scan_named};

/// A `:name` placeholder found in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder<'a> {
    /// Byte offset of the colon.
    start: usize,
    /// Exclusive end of the name.
    end: usize,
    name: &'a str,
}

/// Walk the SQL once, skipping literals, comments and dollar-quoted blocks.
fn find_placeholders(sql: &str) -> Vec<Placeholder<'_>> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b':' => {
                    if let Some((end, name)) = scan_named(bytes, idx) {
                        found.push(Placeholder {
                            start: idx,
                            end,
                            name,
                        });
                        idx = end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    found
}

/// Distinct placeholder names in order of first appearance.
#[must_use]
pub fn named_placeholders(sql: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for placeholder in find_placeholders(sql) {
        if !names.contains(&placeholder.name) {
            names.push(placeholder.name);
        }
    }
    names
}

/// Rewrite `:name` placeholders into the backend's style.
///
/// For [`PlaceholderStyle::Positional`] each distinct name becomes `$N`, where `N`
/// is its position in [`named_placeholders`]; repeated names share an index.
/// Returns a borrowed `Cow` when nothing changes.
#[must_use]
pub fn translate_named_placeholders(sql: &str, style: PlaceholderStyle) -> Cow<'_, str> {
    if style == PlaceholderStyle::Named {
        return Cow::Borrowed(sql);
    }

    let placeholders = find_placeholders(sql);
    if placeholders.is_empty() {
        return Cow::Borrowed(sql);
    }

    let mut order: Vec<&str> = Vec::new();
    let mut out = String::with_capacity(sql.len());
    let mut cursor = 0;
    for placeholder in placeholders {
        let position = match order.iter().position(|n| *n == placeholder.name) {
            Some(pos) => pos + 1,
            None => {
                order.push(placeholder.name);
                order.len()
            }
        };
        out.push_str(&sql[cursor..placeholder.start]);
        out.push('$');
        out.push_str(&position.to_string());
        cursor = placeholder.end;
    }
    out.push_str(&sql[cursor..]);

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_named_to_positional() {
        let sql = "SELECT * FROM users WHERE key = :key";
        let res = translate_named_placeholders(sql, PlaceholderStyle::Positional);
        assert_eq!(res, "SELECT * FROM users WHERE key = $1");
    }

    #[test]
    fn repeated_names_share_an_index() {
        let sql = "select :a, :b, :a";
        assert_eq!(named_placeholders(sql), vec!["a", "b"]);
        let res = translate_named_placeholders(sql, PlaceholderStyle::Positional);
        assert_eq!(res, "select $1, $2, $1");
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select ':x', :y -- :z\n/* :w */ from t where a = \":v\"";
        assert_eq!(named_placeholders(sql), vec!["y"]);
        let res = translate_named_placeholders(sql, PlaceholderStyle::Positional);
        assert_eq!(res, "select ':x', $1 -- :z\n/* :w */ from t where a = \":v\"");
    }

    #[test]
    fn casts_are_not_placeholders() {
        let sql = "select :id::text, '1'::int";
        assert_eq!(named_placeholders(sql), vec!["id"]);
        let res = translate_named_placeholders(sql, PlaceholderStyle::Positional);
        assert_eq!(res, "select $1::text, '1'::int");
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$fn$ select :a $fn$ where b = :b";
        assert_eq!(named_placeholders(sql), vec!["b"]);
        let res = translate_named_placeholders(sql, PlaceholderStyle::Positional);
        assert_eq!(res, "$fn$ select :a $fn$ where b = $1");
    }

    #[test]
    fn named_style_borrows() {
        let sql = "select * from t where a = :a";
        let res = translate_named_placeholders(sql, PlaceholderStyle::Named);
        assert!(matches!(res, Cow::Borrowed(_)));
        let plain = "SELECT username FROM users";
        let res = translate_named_placeholders(plain, PlaceholderStyle::Positional);
        assert!(matches!(res, Cow::Borrowed(_)));
    }
}
