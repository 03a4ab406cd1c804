use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DepthPolicy, LimitsConfig};
use crate::error::ParseError;
use crate::node::{Align, DividerSize, Float, HeadingLevel, List, ListItem, RenderNode, Tone};
use crate::style::{Accent, accent_from_word};
use crate::util::{eq_ci, strip_prefix_ci};
use crate::wrapped::{self, Piece, Wrapped, WrappedKind};

static LIST_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\(seznam(\s+číslovaný)?(\s+kladů\s+a\s+záporů)?\)$").unwrap()
});

const LIST_CLOSE_MARKERS: &[&str] = &["(konec)", "(konec seznamu)"];

/// Line-start markers that strip themselves and keep the rest of the line.
const LINE_MARKERS: &[(&str, LineKind)] = &[
    ("(nadpis)", LineKind::Heading(HeadingLevel::Large)),
    ("(malý nadpis)", LineKind::Heading(HeadingLevel::Small)),
    ("(oddělovač)", LineKind::Divider(DividerSize::Normal)),
    ("(malý oddělovač)", LineKind::Divider(DividerSize::Small)),
    ("(zarovnat doprava)", LineKind::Align(Align::Right)),
    ("(doprava)", LineKind::Align(Align::Right)),
    ("(zarovnat doprostřed)", LineKind::Align(Align::Center)),
    ("(doprostřed)", LineKind::Align(Align::Center)),
    ("(zarovnat doleva)", LineKind::Align(Align::Left)),
    ("(doleva)", LineKind::Align(Align::Left)),
];

#[derive(Debug, Clone, Copy)]
enum LineKind {
    Heading(HeadingLevel),
    Divider(DividerSize),
    Align(Align),
}

/// Shared state of one parse call: the limits and nothing mutable, so one
/// `Parser` may serve any number of documents.
pub(crate) struct Parser<'c> {
    limits: &'c LimitsConfig,
}

impl<'c> Parser<'c> {
    pub(crate) fn new(limits: &'c LimitsConfig) -> Self {
        Self { limits }
    }

    /// Parse a whole document into block nodes.
    pub(crate) fn parse_document(&self, text: &str) -> Result<Vec<RenderNode>, ParseError> {
        if text.len() > self.limits.max_input_bytes {
            log::warn!(
                "Rejecting {} byte input, limit is {}",
                text.len(),
                self.limits.max_input_bytes
            );
            return Err(ParseError::InputTooLarge {
                len: text.len(),
                max: self.limits.max_input_bytes,
            });
        }
        log::debug!("Parsing {} bytes of markup", text.len());
        self.parse_blocks(text, 0)
    }

    /// Block segmentation: wrapped-construct extraction, line splitting and
    /// per-line classification.
    pub(crate) fn parse_blocks(
        &self,
        text: &str,
        depth: usize,
    ) -> Result<Vec<RenderNode>, ParseError> {
        let text = text.trim_end_matches(['\n', '\r']);
        let mut blocks = Vec::new();
        if text.is_empty() {
            return Ok(blocks);
        }

        let pieces = wrapped::extract(text);
        let mut state = ParseState::default();
        for (number, line) in split_lines(&pieces).into_iter().enumerate() {
            log::trace!("Line {}: {} piece(s)", number + 1, line.len());
            self.process_line(&line, depth, &mut state, &mut blocks)?;
        }
        state.flush_list(&mut blocks);
        Ok(blocks)
    }

    fn process_line(
        &self,
        line: &[Piece<'_>],
        depth: usize,
        state: &mut ParseState,
        blocks: &mut Vec<RenderNode>,
    ) -> Result<(), ParseError> {
        let head = head_text(line);
        let trimmed = head.trim_start();
        let whole = (line.len() <= 1).then(|| trimmed.trim_end());

        // Lists
        if let Some(caps) = whole.and_then(|text| LIST_OPEN_RE.captures(text)) {
            state.flush_list(blocks);
            state.list = Some(ListBuilder {
                ordered: caps.get(1).is_some(),
                pros_cons: caps.get(2).is_some(),
                items: Vec::new(),
            });
            return Ok(());
        }
        if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("+ ")) {
            let list = state.list.get_or_insert_with(ListBuilder::implicit);
            let tone = list.pros_cons.then(|| {
                if trimmed.starts_with('+') {
                    Tone::Pro
                } else {
                    Tone::Con
                }
            });
            let children = self.parse_inline(&replace_head(line, rest), depth)?;
            list.items.push(ListItem { tone, children });
            return Ok(());
        }
        if state.list.is_some() {
            state.flush_list(blocks);
            let closes = whole
                .is_some_and(|text| LIST_CLOSE_MARKERS.iter().any(|marker| eq_ci(text, marker)));
            if closes {
                return Ok(());
            }
        }

        // Markers that own the line
        for (marker, kind) in LINE_MARKERS {
            let Some(rest) = strip_prefix_ci(trimmed, marker) else {
                continue;
            };
            let node = match *kind {
                LineKind::Divider(size) => RenderNode::Divider(size),
                LineKind::Heading(level) => RenderNode::Heading {
                    level,
                    children: self.parse_inline(&replace_head(line, rest.trim_start()), depth)?,
                },
                LineKind::Align(align) => RenderNode::Paragraph {
                    align,
                    children: self.parse_inline(&replace_head(line, rest.trim_start()), depth)?,
                },
            };
            blocks.push(node);
            return Ok(());
        }

        if is_blank(line) {
            blocks.push(RenderNode::LineBreak);
            return Ok(());
        }

        // A box or quote alone on its line is a block of its own.
        if let Some(w) = sole_block_construct(line) {
            if let Some(node) = self.wrapped_node(w, depth)? {
                blocks.push(node);
                return Ok(());
            }
        }

        blocks.push(RenderNode::Paragraph {
            align: Align::Left,
            children: self.parse_inline(line, depth)?,
        });
        Ok(())
    }

    /// Depth for parsing the contents of a nested construct, `None` when the
    /// construct must stay literal.
    pub(crate) fn enter(&self, depth: usize) -> Result<Option<usize>, ParseError> {
        let inner = depth + 1;
        if inner <= self.limits.max_depth {
            return Ok(Some(inner));
        }
        match self.limits.on_too_deep {
            DepthPolicy::Reject => {
                log::warn!("Markup nests deeper than {} levels", self.limits.max_depth);
                Err(ParseError::InputTooComplex {
                    max_depth: self.limits.max_depth,
                })
            }
            DepthPolicy::Literal => Ok(None),
        }
    }

    /// Builds the node for an extracted construct, or `None` when it is nested
    /// too deep and has to stay literal.
    pub(crate) fn wrapped_node(
        &self,
        wrapped: &Wrapped<'_>,
        depth: usize,
    ) -> Result<Option<RenderNode>, ParseError> {
        let Some(inner) = self.enter(depth)? else {
            return Ok(None);
        };
        let children = self.parse_body(wrapped.body, inner)?;
        let node = match wrapped.kind {
            WrappedKind::Spoiler => RenderNode::Spoiler(children),
            WrappedKind::Box => {
                let args = BoxArgs::parse(wrapped.args);
                RenderNode::Box {
                    title: args.title,
                    accent: args.accent,
                    float: args.float,
                    children,
                }
            }
            WrappedKind::Quote => {
                let (author, source_url) = parse_quote_args(wrapped.args);
                RenderNode::Quote {
                    author,
                    source_url,
                    children,
                }
            }
        };
        Ok(Some(node))
    }

    /// Bodies spanning several lines get block structure, single lines are inline.
    fn parse_body(&self, body: &str, depth: usize) -> Result<Vec<RenderNode>, ParseError> {
        let body = body.trim_matches(['\n', '\r']);
        if body.contains('\n') {
            self.parse_blocks(body, depth)
        } else {
            self.parse_inline(&wrapped::extract(body), depth)
        }
    }
}

#[derive(Default)]
struct ParseState {
    list: Option<ListBuilder>,
}

impl ParseState {
    fn flush_list(&mut self, blocks: &mut Vec<RenderNode>) {
        if let Some(builder) = self.list.take() {
            blocks.push(RenderNode::List(List {
                ordered: builder.ordered,
                pros_cons: builder.pros_cons,
                items: builder.items,
            }));
        }
    }
}

struct ListBuilder {
    ordered: bool,
    pros_cons: bool,
    items: Vec<ListItem>,
}

impl ListBuilder {
    /// A list opened by a bare `- ` or `+ ` line.
    fn implicit() -> Self {
        Self {
            ordered: false,
            pros_cons: false,
            items: Vec::new(),
        }
    }
}

/// Splits extracted pieces into lines. Wrapped constructs never split; they
/// belong to the line they start on.
fn split_lines<'a>(pieces: &[Piece<'a>]) -> Vec<Vec<Piece<'a>>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for piece in pieces {
        let &Piece::Text(text) = piece else {
            current.push(*piece);
            continue;
        };
        for segment in text.split_inclusive('\n') {
            let (content, ends_line) = match segment.strip_suffix('\n') {
                Some(content) => (content.strip_suffix('\r').unwrap_or(content), true),
                None => (segment, false),
            };
            if !content.is_empty() {
                current.push(Piece::Text(content));
            }
            if ends_line {
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    lines.push(current);
    lines
}

/// Leading text of a line, where line markers live.
fn head_text<'a>(line: &[Piece<'a>]) -> &'a str {
    match line.first() {
        Some(&Piece::Text(text)) => text,
        _ => "",
    }
}

/// The line with its leading text replaced by `rest`.
fn replace_head<'a>(line: &[Piece<'a>], rest: &'a str) -> Vec<Piece<'a>> {
    let tail = match line.first() {
        Some(Piece::Text(_)) => &line[1..],
        _ => line,
    };
    let mut pieces = Vec::with_capacity(tail.len() + 1);
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }
    pieces.extend_from_slice(tail);
    pieces
}

fn is_blank(line: &[Piece<'_>]) -> bool {
    line.iter()
        .all(|piece| matches!(piece, Piece::Text(text) if text.trim().is_empty()))
}

fn sole_block_construct<'l, 'a>(line: &'l [Piece<'a>]) -> Option<&'l Wrapped<'a>> {
    let mut found = None;
    for piece in line {
        match piece {
            Piece::Text(text) if text.trim().is_empty() => {}
            Piece::Wrapped(w) if found.is_none() && w.kind != WrappedKind::Spoiler => {
                found = Some(w)
            }
            _ => return None,
        }
    }
    found
}

#[derive(Debug, Default, PartialEq)]
struct BoxArgs {
    title: Option<String>,
    accent: Accent,
    float: Option<Float>,
}

impl BoxArgs {
    /// `"Title" vpravo modrý`: a quoted title, float side and accent in any
    /// order. Without a quoted title, words that are neither form the title.
    fn parse(args: &str) -> Self {
        let (quoted, rest) = split_quoted(args);
        let mut parsed = Self {
            title: quoted.map(str::to_string),
            ..Self::default()
        };
        let mut words = Vec::new();
        for word in rest.split_whitespace() {
            let lower = word.to_lowercase();
            match lower.as_str() {
                "vlevo" | "doleva" => parsed.float = Some(Float::Left),
                "vpravo" | "doprava" => parsed.float = Some(Float::Right),
                _ => match accent_from_word(word) {
                    Some(accent) => parsed.accent = accent,
                    None => words.push(word),
                },
            }
        }
        if parsed.title.is_none() && !words.is_empty() {
            parsed.title = Some(words.join(" "));
        }
        parsed
    }
}

/// `Karel Čapek https://example.com/zdroj`: author words plus an optional
/// source URL, quotes around the author removed.
fn parse_quote_args(args: &str) -> (Option<String>, Option<String>) {
    let mut source_url = None;
    let mut words = Vec::new();
    for word in args.split_whitespace() {
        if source_url.is_none() && (word.starts_with("http://") || word.starts_with("https://")) {
            source_url = Some(word.to_string());
        } else {
            words.push(word);
        }
    }
    let joined = words.join(" ");
    let (quoted, _) = split_quoted(&joined);
    let author = quoted.unwrap_or(&joined).trim();
    let author = (!author.is_empty()).then(|| author.to_string());
    (author, source_url)
}

const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('„', '“'), ('\'', '\'')];

/// Finds the first quoted span: returns its inside and the text around it.
fn split_quoted(text: &str) -> (Option<&str>, String) {
    for (start, c) in text.char_indices() {
        let Some(&(_, close)) = QUOTE_PAIRS.iter().find(|(open, _)| *open == c) else {
            continue;
        };
        let inner_start = start + c.len_utf8();
        if let Some(len) = text[inner_start..].find(close) {
            let inner_end = inner_start + len;
            let around = format!("{} {}", &text[..start], &text[inner_end + close.len_utf8()..]);
            return (Some(&text[inner_start..inner_end]), around);
        }
    }
    (None, text.to_string())
}
