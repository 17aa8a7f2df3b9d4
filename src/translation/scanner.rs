#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan a `:name` placeholder whose colon sits at `colon`.
///
/// Returns the exclusive end index and the name. A colon preceded by another
/// colon (`::type` casts) or not followed by an identifier is not a placeholder.
pub(super) fn scan_named(bytes: &[u8], colon: usize) -> Option<(usize, &str)> {
    if colon > 0 && bytes[colon - 1] == b':' {
        return None;
    }
    let start = colon + 1;
    if !bytes.get(start).copied().is_some_and(is_ident_start) {
        return None;
    }
    let mut idx = start;
    while idx < bytes.len() && is_ident_continue(bytes[idx]) {
        idx += 1;
    }
    std::str::from_utf8(&bytes[start..idx])
        .ok()
        .map(|name| (idx, name))
}
