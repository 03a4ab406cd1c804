use serde::Serialize;

use crate::countdown::Countdown;
use crate::style::{Accent, Style};

/// A node of a parsed LvZJ document.
///
/// The tree is inert data: spoiler visibility and countdown ticking live in
/// [`crate::live`], not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderNode {
    Text(String),
    /// A run sharing one active style.
    Styled {
        style: Style,
        children: Vec<RenderNode>,
    },
    Paragraph {
        align: Align,
        children: Vec<RenderNode>,
    },
    Heading {
        level: HeadingLevel,
        children: Vec<RenderNode>,
    },
    List(List),
    Divider(DividerSize),
    LineBreak,
    Link {
        url: String,
        children: Vec<RenderNode>,
    },
    Spoiler(Vec<RenderNode>),
    ProgressBar(ProgressBar),
    Countdown(Countdown),
    Box {
        title: Option<String>,
        accent: Accent,
        float: Option<Float>,
        children: Vec<RenderNode>,
    },
    Quote {
        author: Option<String>,
        source_url: Option<String>,
        children: Vec<RenderNode>,
    },
    Fragment(Vec<RenderNode>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    Large,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerSize {
    Normal,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Float {
    Left,
    Right,
}

/// Whether an item of a pros/cons list is an advantage (`+`) or a drawback (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Pro,
    Con,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    /// Only set for items of a pros/cons list.
    pub tone: Option<Tone>,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub pros_cons: bool,
    pub items: Vec<ListItem>,
}

/// A "žížalka": a horizontal bar filled to `value / max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressBar {
    pub value: f64,
    pub max: f64,
    pub accent: Accent,
}

impl ProgressBar {
    /// Filled share in `[0, 1]`. The stored value is kept as written; clamping
    /// happens here, at render time.
    pub fn fraction(&self) -> f64 {
        if !self.value.is_finite() || !self.max.is_finite() || self.max <= 0.0 {
            return 0.0;
        }
        self.value.clamp(0.0, self.max) / self.max
    }
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Wraps children in a `Styled` node unless the style is plain.
    pub fn styled(style: Style, children: Vec<RenderNode>) -> Self {
        if style.is_plain() {
            match <[RenderNode; 1]>::try_from(children) {
                Ok([only]) => only,
                Err(children) => Self::Fragment(children),
            }
        } else {
            Self::Styled { style, children }
        }
    }

    /// Child nodes of a container, empty for leaves.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Styled { children, .. }
            | Self::Paragraph { children, .. }
            | Self::Heading { children, .. }
            | Self::Link { children, .. }
            | Self::Box { children, .. }
            | Self::Quote { children, .. }
            | Self::Spoiler(children)
            | Self::Fragment(children) => children,
            _ => &[],
        }
    }

    /// Visible text of the tree, one line per block, for previews and search.
    /// Spoilers are included; countdowns and progress bars are not.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out);
        out
    }

    fn push_plain(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Styled { children, .. }
            | Self::Link { children, .. }
            | Self::Spoiler(children)
            | Self::Fragment(children) => push_plain_all(children, out),
            Self::Paragraph { children, .. } | Self::Heading { children, .. } => {
                push_plain_all(children, out);
                out.push('\n');
            }
            Self::List(list) => {
                for (i, item) in list.items.iter().enumerate() {
                    if list.ordered {
                        out.push_str(&format!("{}. ", i + 1));
                    } else {
                        out.push_str(match item.tone {
                            Some(Tone::Pro) => "+ ",
                            _ => "- ",
                        });
                    }
                    push_plain_all(&item.children, out);
                    out.push('\n');
                }
            }
            Self::Box {
                title, children, ..
            } => {
                if let Some(title) = title {
                    out.push_str(title);
                    out.push('\n');
                }
                push_plain_all(children, out);
                out.push('\n');
            }
            Self::Quote {
                author, children, ..
            } => {
                push_plain_all(children, out);
                if let Some(author) = author {
                    out.push_str(" (");
                    out.push_str(author);
                    out.push(')');
                }
                out.push('\n');
            }
            Self::Divider(_) | Self::LineBreak => out.push('\n'),
            Self::ProgressBar(_) | Self::Countdown(_) => {}
        }
    }
}

pub(crate) fn push_plain_all(nodes: &[RenderNode], out: &mut String) {
    for node in nodes {
        node.push_plain(out);
    }
}
