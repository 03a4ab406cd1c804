//! Inline parsing of one line or segment.
//!
//! The scan walks left to right. At a `(` it tries, in order: countdown,
//! progress bar, link, style keywords (including the reset), the `závorka`
//! escape. Anything else leaves a literal `(` and moves on by one character,
//! so every step consumes input and the scan always terminates. Text between
//! brackets is emitted under the current style, with bare URLs turned into
//! links.
//!
//! The current style is a value threaded through the scan and dropped at the
//! end of the line; nothing is shared between calls.

use std::sync::LazyLock;

use regex::Regex;

use crate::countdown::Countdown;
use crate::error::ParseError;
use crate::node::{ProgressBar, RenderNode};
use crate::parser::Parser;
use crate::style::{Accent, Style, StyleCommand, accent_from_word};
use crate::util::{eq_ci, find_ci};
use crate::wrapped::Piece;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s<]+").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*odkaz\s+na\s+(https?://[^\s<]+)\s*$").unwrap());

static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(\S+)\s+)?žížalka\s+(-?\d+(?:[.,]\d+)?)\s*(?:%|/\s*(\d+(?:[.,]\d+)?))?\s*$",
    )
    .unwrap()
});

const LINK_CLOSERS: &[&str] = &["(konec)", "(konec odkazu)"];
const ESCAPE_KEYWORD: &str = "závorka";

/// Outcome of the bracket at the cursor.
enum Step {
    Node(RenderNode),
    Style(Style),
    Literal(&'static str),
}

/// Cursor over the pieces of one line.
struct Scan<'p, 'a> {
    pieces: &'p [Piece<'a>],
    index: usize,
    /// Byte offset within the current text piece.
    pos: usize,
    style: Style,
    /// Set once no link closer follows the cursor; it cannot reappear further on.
    link_closer_missing: bool,
}

impl<'p, 'a> Scan<'p, 'a> {
    fn new(pieces: &'p [Piece<'a>], style: Style) -> Self {
        Self {
            pieces,
            index: 0,
            pos: 0,
            style,
            link_closer_missing: false,
        }
    }

    fn next_piece(&mut self) {
        self.index += 1;
        self.pos = 0;
    }
}

impl Parser<'_> {
    /// Parses a line of pieces with a fresh style.
    pub(crate) fn parse_inline(
        &self,
        pieces: &[Piece<'_>],
        depth: usize,
    ) -> Result<Vec<RenderNode>, ParseError> {
        let mut runs = Runs::default();
        self.scan(&mut Scan::new(pieces, Style::default()), &mut runs, depth)?;
        Ok(runs.finish())
    }

    /// Scans from the cursor to the end of its pieces.
    fn scan(
        &self,
        scan: &mut Scan<'_, '_>,
        runs: &mut Runs,
        depth: usize,
    ) -> Result<(), ParseError> {
        while let Some(&piece) = scan.pieces.get(scan.index) {
            let text = match piece {
                Piece::Text(text) => text,
                Piece::Wrapped(wrapped) => {
                    match self.wrapped_node(&wrapped, depth)? {
                        Some(node) => runs.push_node(node),
                        None => runs.push_text(wrapped.raw, scan.style),
                    }
                    scan.next_piece();
                    continue;
                }
            };

            let rest = &text[scan.pos..];
            if rest.is_empty() {
                scan.next_piece();
                continue;
            }
            if !rest.starts_with('(') {
                let end = rest.find('(').unwrap_or(rest.len());
                push_plain_run(&rest[..end], scan.style, runs);
                scan.pos += end;
                continue;
            }

            match self.bracket(scan, text, depth)? {
                Step::Node(node) => runs.push_node(node),
                Step::Style(style) => scan.style = style,
                Step::Literal(literal) => runs.push_text(literal, scan.style),
            }
        }
        Ok(())
    }

    /// Dispatches the bracket at the cursor in `text` and moves the cursor
    /// past whatever it consumed.
    fn bracket<'a>(
        &self,
        scan: &mut Scan<'_, 'a>,
        text: &'a str,
        depth: usize,
    ) -> Result<Step, ParseError> {
        let rest = &text[scan.pos..];
        // Commands never contain `(`, which also keeps the scan linear.
        let close = match rest[1..].find(['(', ')']) {
            Some(offset) if rest[1 + offset..].starts_with(')') => 1 + offset,
            _ => {
                scan.pos += 1;
                return Ok(Step::Literal("("));
            }
        };
        let content = &rest[1..close];
        let command_end = scan.pos + close + 1;

        if let Some(countdown) = Countdown::parse_command(content) {
            log::trace!("Countdown command: {content}");
            scan.pos = command_end;
            return Ok(Step::Node(RenderNode::Countdown(countdown)));
        }
        if let Some(bar) = parse_progress_bar(content) {
            log::trace!("Progress bar command: {content}");
            scan.pos = command_end;
            return Ok(Step::Node(RenderNode::ProgressBar(bar)));
        }
        if let Some(url) = LINK_RE.captures(content).map(|caps| caps[1].to_string()) {
            if let Some(link) = self.link(scan, text, url, command_end, depth)? {
                return Ok(Step::Node(link));
            }
        }
        if let Some(command) = StyleCommand::parse(content) {
            log::trace!("Style command: {content}");
            scan.pos = command_end;
            return Ok(Step::Style(scan.style.apply(&command)));
        }
        if eq_ci(content.trim(), ESCAPE_KEYWORD) {
            scan.pos = command_end;
            return Ok(Step::Literal("("));
        }
        scan.pos += 1;
        Ok(Step::Literal("("))
    }

    /// `(odkaz na URL)label(konec)`. The label runs to the nearest closer
    /// later on the line, wrapped constructs included, and is parsed with the
    /// current style; style changes inside it end with the link. On success
    /// the cursor moves past the closer.
    fn link<'a>(
        &self,
        scan: &mut Scan<'_, 'a>,
        text: &'a str,
        url: String,
        label_start: usize,
        depth: usize,
    ) -> Result<Option<RenderNode>, ParseError> {
        if scan.link_closer_missing {
            return Ok(None);
        }
        let Some((close_index, close_start, close_end)) =
            find_link_closer(scan.pieces, scan.index, label_start)
        else {
            scan.link_closer_missing = true;
            return Ok(None);
        };
        let Some(inner) = self.enter(depth)? else {
            return Ok(None);
        };

        let mut label_pieces = Vec::new();
        if close_index == scan.index {
            label_pieces.push(Piece::Text(&text[label_start..close_start]));
        } else {
            label_pieces.push(Piece::Text(&text[label_start..]));
            label_pieces.extend_from_slice(&scan.pieces[scan.index + 1..close_index]);
            if let Piece::Text(last) = scan.pieces[close_index] {
                label_pieces.push(Piece::Text(&last[..close_start]));
            }
        }

        let mut label = Runs::default();
        self.scan(&mut Scan::new(&label_pieces, scan.style), &mut label, inner)?;
        let mut children = label.finish();
        if children.is_empty() {
            children.push(RenderNode::styled(scan.style, vec![RenderNode::text(url.as_str())]));
        }
        log::trace!("Link to {url}");
        scan.index = close_index;
        scan.pos = close_end;
        Ok(Some(RenderNode::Link { url, children }))
    }
}

/// Nearest link closer at or after byte `from` of piece `index`: returns the
/// piece index and the closer's byte range within it.
fn find_link_closer(
    pieces: &[Piece<'_>],
    index: usize,
    from: usize,
) -> Option<(usize, usize, usize)> {
    pieces[index..]
        .iter()
        .enumerate()
        .find_map(|(offset, piece)| {
            let &Piece::Text(text) = piece else {
                return None;
            };
            let from = if offset == 0 { from } else { 0 };
            LINK_CLOSERS
                .iter()
                .filter_map(|closer| find_ci(text, from, closer))
                .min()
                .map(|(start, end)| (index + offset, start, end))
        })
}

/// `[color ]žížalka value[ %| / max]`
fn parse_progress_bar(content: &str) -> Option<ProgressBar> {
    let caps = PROGRESS_RE.captures(content)?;
    let accent = match caps.get(1) {
        Some(word) => accent_from_word(word.as_str())?,
        None => Accent::Primary,
    };
    let value = parse_number(&caps[2])?;
    let max = match caps.get(3) {
        Some(max) => parse_number(max.as_str())?,
        None => 100.0,
    };
    Some(ProgressBar { value, max, accent })
}

/// Accepts a decimal comma as well as a dot.
fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', ".").parse().ok()
}

/// Emits plain text, turning bare URLs into links labelled with themselves.
fn push_plain_run(text: &str, style: Style, runs: &mut Runs) {
    let mut last = 0;
    for url in URL_RE.find_iter(text) {
        runs.push_text(&text[last..url.start()], style);
        runs.push_node(RenderNode::Link {
            url: url.as_str().to_string(),
            children: vec![RenderNode::styled(style, vec![RenderNode::text(url.as_str())])],
        });
        last = url.end();
    }
    runs.push_text(&text[last..], style);
}

/// Collects inline output, merging adjacent text of the same style into one node.
#[derive(Default)]
struct Runs {
    nodes: Vec<RenderNode>,
    buffer: String,
    buffer_style: Style,
}

impl Runs {
    fn push_text(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if style != self.buffer_style {
            self.flush();
            self.buffer_style = style;
        }
        self.buffer.push_str(text);
    }

    fn push_node(&mut self, node: RenderNode) {
        self.flush();
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.nodes
                .push(RenderNode::styled(self.buffer_style, vec![RenderNode::Text(text)]));
        }
    }

    fn finish(mut self) -> Vec<RenderNode> {
        self.flush();
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::countdown::{CountdownStyle, Direction};
    use crate::style::{Color, Foreground, Highlight};
    use crate::wrapped;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn inline(text: &str) -> Vec<RenderNode> {
        let config = Config::default();
        Parser::new(&config.limits)
            .parse_inline(&wrapped::extract(text), 0)
            .unwrap()
    }

    fn bold() -> Style {
        Style {
            bold: true,
            ..Style::default()
        }
    }

    fn styled(style: Style, text: &str) -> RenderNode {
        RenderNode::Styled {
            style,
            children: vec![RenderNode::text(text)],
        }
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(inline("hello world"), vec![RenderNode::text("hello world")]);
    }

    #[test]
    fn reset_returns_to_plain() {
        assert_eq!(
            inline("(tučně)a(obyčejně)b"),
            vec![styled(bold(), "a"), RenderNode::text("b")]
        );
    }

    #[test]
    fn styles_accumulate_until_reset() {
        let bold_red = Style {
            foreground: Some(Foreground::Color(Color::Red)),
            ..bold()
        };
        assert_eq!(
            inline("(tučně)a(červeně)b(normálně)c"),
            vec![styled(bold(), "a"), styled(bold_red, "b"), RenderNode::text("c")]
        );
    }

    #[test]
    fn escape_is_a_literal_paren() {
        assert_eq!(inline("(závorka)"), vec![RenderNode::text("(")]);
        assert_eq!(
            inline("(tučně)x(ZÁVORKA)y"),
            vec![styled(bold(), "x(y")]
        );
    }

    #[rstest]
    #[case("(")]
    #[case("((((((((((")]
    #[case("(neznámý příkaz) text")]
    #[case("(a (b) c")]
    fn unknown_brackets_stay_literal(#[case] text: &str) {
        assert_eq!(inline(text), vec![RenderNode::text(text)]);
    }

    #[test]
    fn first_color_in_table_wins() {
        let red = Style {
            foreground: Some(Foreground::Color(Color::Red)),
            ..Style::default()
        };
        assert_eq!(inline("(červeně zeleně)x"), vec![styled(red, "x")]);
    }

    #[test]
    fn highlight_and_color_are_independent() {
        let style = Style {
            foreground: Some(Foreground::Color(Color::Blue)),
            highlight: Some(Highlight::Pink),
            ..Style::default()
        };
        assert_eq!(inline("(modře)(podbarveně růžově)x"), vec![styled(style, "x")]);
    }

    #[test]
    fn bare_url_becomes_link() {
        assert_eq!(
            inline("see https://example.com/x now"),
            vec![
                RenderNode::text("see "),
                RenderNode::Link {
                    url: "https://example.com/x".to_string(),
                    children: vec![RenderNode::text("https://example.com/x")],
                },
                RenderNode::text(" now"),
            ]
        );
    }

    #[test]
    fn url_stops_at_whitespace_or_angle_bracket() {
        let nodes = inline("https://a.cz<b>\thttps://b.cz/?q=1");
        assert_eq!(
            nodes,
            vec![
                RenderNode::Link {
                    url: "https://a.cz".to_string(),
                    children: vec![RenderNode::text("https://a.cz")],
                },
                RenderNode::text("<b>\t"),
                RenderNode::Link {
                    url: "https://b.cz/?q=1".to_string(),
                    children: vec![RenderNode::text("https://b.cz/?q=1")],
                },
            ]
        );
    }

    #[test]
    fn explicit_link_with_styled_label() {
        assert_eq!(
            inline("(odkaz na https://example.com)(tučně)zde(konec odkazu) dál"),
            vec![
                RenderNode::Link {
                    url: "https://example.com".to_string(),
                    children: vec![styled(bold(), "zde")],
                },
                RenderNode::text(" dál"),
            ]
        );
    }

    #[test]
    fn link_label_inherits_style() {
        assert_eq!(
            inline("(tučně)(odkaz na https://a.cz)x(konec)"),
            vec![RenderNode::Link {
                url: "https://a.cz".to_string(),
                children: vec![styled(bold(), "x")],
            }]
        );
    }

    #[test]
    fn link_without_closer_is_literal() {
        assert_eq!(
            inline("(odkaz na https://a.cz) bez konce"),
            vec![
                RenderNode::text("(odkaz na "),
                RenderNode::Link {
                    url: "https://a.cz)".to_string(),
                    children: vec![RenderNode::text("https://a.cz)")],
                },
                RenderNode::text(" bez konce"),
            ]
        );
    }

    #[test]
    fn link_label_may_hold_a_box() {
        assert_eq!(
            inline("(odkaz na https://a.cz)x (boxík)y(konec boxíku) z(konec)"),
            vec![RenderNode::Link {
                url: "https://a.cz".to_string(),
                children: vec![
                    RenderNode::text("x "),
                    RenderNode::Box {
                        title: None,
                        accent: Accent::Primary,
                        float: None,
                        children: vec![RenderNode::text("y")],
                    },
                    RenderNode::text(" z"),
                ],
            }]
        );
    }

    #[test]
    fn link_label_may_hold_a_spoiler() {
        assert_eq!(
            inline("(tučně)(odkaz na https://a.cz)x (spoiler)y(konec) z(konec odkazu) dál"),
            vec![
                RenderNode::Link {
                    url: "https://a.cz".to_string(),
                    children: vec![
                        styled(bold(), "x "),
                        RenderNode::Spoiler(vec![RenderNode::text("y")]),
                        styled(bold(), " z"),
                    ],
                },
                styled(bold(), " dál"),
            ]
        );
    }

    #[test]
    fn countdown_command() {
        let nodes = inline("Zbývá (odpočet slovně do 24.12.2026 18:00)!");
        assert_eq!(nodes.len(), 3);
        let RenderNode::Countdown(countdown) = &nodes[1] else {
            panic!("expected a countdown, got {:?}", nodes[1]);
        };
        assert_eq!(countdown.direction, Direction::ToTarget);
        assert_eq!(countdown.style, CountdownStyle::Verbose);
    }

    #[test]
    fn countdown_with_bad_date_is_literal() {
        assert_eq!(
            inline("(odpočet do 32.1.2026)"),
            vec![RenderNode::text("(odpočet do 32.1.2026)")]
        );
    }

    #[rstest]
    #[case("(žížalka 40)", 40.0, 100.0, Accent::Primary)]
    #[case("(zelená žížalka 75 %)", 75.0, 100.0, Accent::Green)]
    #[case("(Červená Žížalka 3 / 8)", 3.0, 8.0, Accent::Red)]
    #[case("(žížalka 120,5)", 120.5, 100.0, Accent::Primary)]
    fn progress_bars(
        #[case] text: &str,
        #[case] value: f64,
        #[case] max: f64,
        #[case] accent: Accent,
    ) {
        assert_eq!(
            inline(text),
            vec![RenderNode::ProgressBar(ProgressBar { value, max, accent })]
        );
    }

    #[test]
    fn progress_bar_with_unknown_color_is_literal() {
        assert_eq!(
            inline("(kostkovaná žížalka 5)"),
            vec![RenderNode::text("(kostkovaná žížalka 5)")]
        );
    }

    #[test]
    fn spoiler_in_middle_of_styled_line() {
        assert_eq!(
            inline("(tučně)a (spoiler)b(konec) c"),
            vec![
                styled(bold(), "a "),
                RenderNode::Spoiler(vec![RenderNode::text("b")]),
                styled(bold(), " c"),
            ]
        );
    }
}
