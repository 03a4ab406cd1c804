//! Case-insensitive matching on `&str` that keeps byte offsets into the
//! original text, which a `to_lowercase()` copy would not.

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Strips `prefix` from the start of `text` ignoring case, returning the rest.
pub(crate) fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.chars();
    let mut len = 0;
    for expected in prefix.chars() {
        let c = chars.next()?;
        if !eq_ignore_case(c, expected) {
            return None;
        }
        len += c.len_utf8();
    }
    Some(&text[len..])
}

/// Byte range of the first case-insensitive occurrence of `needle` in `text`
/// starting at or after byte offset `from`.
pub(crate) fn find_ci(text: &str, from: usize, needle: &str) -> Option<(usize, usize)> {
    let first = needle.chars().next()?;
    text[from..]
        .char_indices()
        .filter(|(_, c)| eq_ignore_case(*c, first))
        .find_map(|(offset, _)| {
            let start = from + offset;
            strip_prefix_ci(&text[start..], needle).map(|rest| (start, text.len() - rest.len()))
        })
}

pub(crate) fn eq_ci(text: &str, other: &str) -> bool {
    strip_prefix_ci(text, other).is_some_and(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_ignores_case() {
        assert_eq!(strip_prefix_ci("(NADPIS) Ahoj", "(nadpis)"), Some(" Ahoj"));
        assert_eq!(strip_prefix_ci("(Malý Nadpis)x", "(malý nadpis)"), Some("x"));
        assert_eq!(strip_prefix_ci("(nad", "(nadpis)"), None);
    }

    #[test]
    fn find_returns_original_offsets() {
        let text = "čau (KONEC BOXÍKU) a";
        let (start, end) = find_ci(text, 0, "(konec boxíku)").unwrap();
        assert_eq!(&text[start..end], "(KONEC BOXÍKU)");
        assert_eq!(find_ci(text, end, "(konec boxíku)"), None);
    }

    #[test]
    fn whole_string_comparison() {
        assert!(eq_ci("ZÁVORKA", "závorka"));
        assert!(!eq_ci("závorkami", "závorka"));
    }
}
