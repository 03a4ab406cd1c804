//! Style keywords, color tables and the per-line style accumulator.
//!
//! Keyword matching is substring based on the lowercased bracket content, so
//! `(tučně červeně)` and `(psát tučně, prosím)` both turn bold on. The tables
//! are part of the markup vocabulary: reordering or renaming entries changes
//! how stored documents render.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Pink,
    Brown,
    Gray,
    Black,
    White,
    Cyan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Foreground {
    Color(Color),
    Rainbow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Yellow,
    Green,
    Blue,
    Red,
    Pink,
    Orange,
    Purple,
}

/// Color of boxes and progress bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    #[default]
    Primary,
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Pink,
    Cyan,
}

/// Adverb and accusative forms, in precedence order.
const COLOR_KEYWORDS: &[(Color, [&str; 2])] = &[
    (Color::Red, ["červeně", "červenou"]),
    (Color::Green, ["zeleně", "zelenou"]),
    (Color::Blue, ["modře", "modrou"]),
    (Color::Yellow, ["žlutě", "žlutou"]),
    (Color::Orange, ["oranžově", "oranžovou"]),
    (Color::Purple, ["fialově", "fialovou"]),
    (Color::Pink, ["růžově", "růžovou"]),
    (Color::Brown, ["hnědě", "hnědou"]),
    (Color::Gray, ["šedě", "šedou"]),
    (Color::Black, ["černě", "černou"]),
    (Color::White, ["bíle", "bílou"]),
    (Color::Cyan, ["tyrkysově", "tyrkysovou"]),
];

const HIGHLIGHT_KEYWORDS: &[(Highlight, [&str; 2])] = &[
    (Highlight::Yellow, ["žlutě", "žlutou"]),
    (Highlight::Green, ["zeleně", "zelenou"]),
    (Highlight::Blue, ["modře", "modrou"]),
    (Highlight::Red, ["červeně", "červenou"]),
    (Highlight::Pink, ["růžově", "růžovou"]),
    (Highlight::Orange, ["oranžově", "oranžovou"]),
    (Highlight::Purple, ["fialově", "fialovou"]),
];

/// Word stems, so any grammatical gender matches (`červená žížalka`, `boxík červený`).
const ACCENT_STEMS: &[(Accent, &str)] = &[
    (Accent::Primary, "výchozí"),
    (Accent::Primary, "základní"),
    (Accent::Red, "červen"),
    (Accent::Green, "zelen"),
    (Accent::Blue, "modr"),
    (Accent::Yellow, "žlut"),
    (Accent::Orange, "oranžov"),
    (Accent::Purple, "fialov"),
    (Accent::Pink, "růžov"),
    (Accent::Cyan, "tyrkysov"),
];

const RAINBOW_KEYWORDS: &[&str] = &["duhově", "duhovou"];
const RESET_KEYWORDS: &[&str] = &["obyčejně", "normálně"];
/// Start of a highlight clause; a color named after it is the highlight color.
const HIGHLIGHT_CLAUSE_KEYWORDS: &[&str] = &["podbarv", "zvýrazn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Bold,
    Italic,
    Strikethrough,
    Superscript,
    Subscript,
    Monospace,
    Capitals,
    Script,
}

const FLAG_KEYWORDS: &[(Flag, &[&str])] = &[
    (Flag::Bold, &["tučně", "tučnou"]),
    (Flag::Italic, &["kurzív", "kurziv"]),
    (Flag::Strikethrough, &["škrtnut"]),
    (Flag::Superscript, &["horní index"]),
    (Flag::Subscript, &["dolní index"]),
    (Flag::Monospace, &["strojově"]),
    (Flag::Capitals, &["kapitálkami"]),
    (Flag::Script, &["psace", "psací"]),
];

/// The style applied to plain text at a point of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub monospace: bool,
    pub capitals: bool,
    /// Serif italic, "psacím písmem".
    pub script: bool,
    pub foreground: Option<Foreground>,
    pub highlight: Option<Highlight>,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Flags add up, a color replaces the previous one of the same axis.
    pub fn apply(self, command: &StyleCommand) -> Self {
        let mut style = if command.reset { Self::default() } else { self };
        for flag in &command.flags {
            style.set(*flag);
        }
        if let Some(foreground) = command.foreground {
            style.foreground = Some(foreground);
        }
        if let Some(highlight) = command.highlight {
            style.highlight = Some(highlight);
        }
        style
    }

    fn set(&mut self, flag: Flag) {
        match flag {
            Flag::Bold => self.bold = true,
            Flag::Italic => self.italic = true,
            Flag::Strikethrough => self.strikethrough = true,
            Flag::Superscript => self.superscript = true,
            Flag::Subscript => self.subscript = true,
            Flag::Monospace => self.monospace = true,
            Flag::Capitals => self.capitals = true,
            Flag::Script => self.script = true,
        }
    }

    /// Class names (without prefix) describing this style, in a stable order.
    pub fn class_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let flags = [
            (self.bold, "bold"),
            (self.italic, "italic"),
            (self.strikethrough, "strikethrough"),
            (self.superscript, "superscript"),
            (self.subscript, "subscript"),
            (self.monospace, "monospace"),
            (self.capitals, "capitals"),
            (self.script, "script"),
        ];
        names.extend(
            flags
                .iter()
                .filter(|(on, _)| *on)
                .map(|(_, name)| name.to_string()),
        );
        match self.foreground {
            Some(Foreground::Color(color)) => names.push(format!("color-{}", color.name())),
            Some(Foreground::Rainbow) => names.push("rainbow".to_string()),
            None => {}
        }
        if let Some(highlight) = self.highlight {
            names.push(format!("highlight-{}", highlight.name()));
        }
        names
    }
}

/// What one bracket of style keywords asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCommand {
    pub reset: bool,
    flags: Vec<Flag>,
    pub foreground: Option<Foreground>,
    pub highlight: Option<Highlight>,
}

impl StyleCommand {
    /// Matches bracket content against the keyword tables. Returns `None` when
    /// no keyword occurs at all.
    pub fn parse(content: &str) -> Option<Self> {
        let lower = content.to_lowercase();

        let clause_start = HIGHLIGHT_CLAUSE_KEYWORDS
            .iter()
            .filter_map(|keyword| lower.find(keyword))
            .min();
        let (main, clause) = match clause_start {
            Some(start) => (&lower[..start], Some(&lower[start..])),
            None => (lower.as_str(), None),
        };

        let reset = contains_any(&lower, RESET_KEYWORDS);
        let flags: Vec<Flag> = FLAG_KEYWORDS
            .iter()
            .filter(|(_, keywords)| contains_any(&lower, keywords))
            .map(|(flag, _)| *flag)
            .collect();
        let foreground = COLOR_KEYWORDS
            .iter()
            .find(|(_, keywords)| contains_any(main, keywords))
            .map(|(color, _)| Foreground::Color(*color))
            .or_else(|| contains_any(main, RAINBOW_KEYWORDS).then_some(Foreground::Rainbow));
        let highlight = clause.map(|clause| {
            HIGHLIGHT_KEYWORDS
                .iter()
                .find(|(_, keywords)| contains_any(clause, keywords))
                .map_or(Highlight::Yellow, |(highlight, _)| *highlight)
        });

        let command = Self {
            reset,
            flags,
            foreground,
            highlight,
        };
        (command != Self::default()).then_some(command)
    }
}

/// Maps a color word of a progress bar or box to its accent.
pub fn accent_from_word(word: &str) -> Option<Accent> {
    let lower = word.to_lowercase();
    ACCENT_STEMS
        .iter()
        .find(|(_, stem)| lower.starts_with(stem))
        .map(|(accent, _)| *accent)
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Gray => "gray",
            Self::Black => "black",
            Self::White => "white",
            Self::Cyan => "cyan",
        }
    }
}

impl Highlight {
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Pink => "pink",
            Self::Orange => "orange",
            Self::Purple => "purple",
        }
    }
}

impl Accent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Cyan => "cyan",
        }
    }
}
