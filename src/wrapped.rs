//! Extraction of wrapped constructs: `(spoiler)…(konec)`,
//! `(boxík args)…(konec boxíku)` and `(citace args)…(konec citace)`.
//!
//! This runs over a whole document (or a wrapped body) before it is split
//! into lines, so a construct may span several lines. Matching is greedy and
//! non-overlapping: the earliest opener pairs with the nearest following
//! closer of its kind. An opener without a closer stays in the text.

use crate::util::{find_ci, strip_prefix_ci};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WrappedKind {
    Spoiler,
    Box,
    Quote,
}

impl WrappedKind {
    const ALL: [WrappedKind; 3] = [Self::Spoiler, Self::Box, Self::Quote];

    fn keyword(self) -> &'static str {
        match self {
            Self::Spoiler => "(spoiler",
            Self::Box => "(boxík",
            Self::Quote => "(citace",
        }
    }

    fn closer(self) -> &'static str {
        match self {
            Self::Spoiler => "(konec)",
            Self::Box => "(konec boxíku)",
            Self::Quote => "(konec citace)",
        }
    }

    fn takes_args(self) -> bool {
        !matches!(self, Self::Spoiler)
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Wrapped<'a> {
    pub kind: WrappedKind,
    /// Opener arguments, trimmed (`"T" vlevo` in `(boxík "T" vlevo)`).
    pub args: &'a str,
    pub body: &'a str,
    /// The whole construct including both markers.
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Text(&'a str),
    Wrapped(Wrapped<'a>),
}

/// Splits `text` into plain text and matched wrapped constructs, in order.
pub(crate) fn extract(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;
    // Once a closer is missing after some position it is missing after every
    // later one too, so each kind is searched to the end at most once.
    let mut closer_missing = [false; 3];

    while let Some(offset) = text[cursor..].find('(') {
        let open = cursor + offset;
        cursor = open + 1;

        let Some((kind, args, opener_len)) = match_opener(&text[open..]) else {
            continue;
        };
        if closer_missing[kind.index()] {
            continue;
        }

        let body_start = open + opener_len;
        let Some((close_start, close_end)) = find_ci(text, body_start, kind.closer()) else {
            closer_missing[kind.index()] = true;
            continue;
        };

        if text_start < open {
            pieces.push(Piece::Text(&text[text_start..open]));
        }
        pieces.push(Piece::Wrapped(Wrapped {
            kind,
            args,
            body: &text[body_start..close_start],
            raw: &text[open..close_end],
        }));
        text_start = close_end;
        cursor = close_end;
    }

    if text_start < text.len() {
        pieces.push(Piece::Text(&text[text_start..]));
    }
    pieces
}

/// Recognizes an opener at the start of `text`: returns its kind, trimmed
/// arguments and byte length.
fn match_opener(text: &str) -> Option<(WrappedKind, &str, usize)> {
    WrappedKind::ALL.iter().find_map(|&kind| {
        let rest = strip_prefix_ci(text, kind.keyword())?;
        let keyword_len = text.len() - rest.len();
        if rest.starts_with(')') {
            return Some((kind, "", keyword_len + 1));
        }
        if !kind.takes_args() || !rest.starts_with(char::is_whitespace) {
            return None;
        }
        // Arguments never contain `(`; stopping there keeps extraction linear.
        let close = rest.find(['(', ')'])?;
        if !rest[close..].starts_with(')') {
            return None;
        }
        Some((kind, rest[..close].trim(), keyword_len + close + 1))
    })
}
