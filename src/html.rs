use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::HtmlConfig;
use crate::countdown::{CountdownStyle, Direction};
use crate::node::{Align, DividerSize, Float, HeadingLevel, List, ProgressBar, RenderNode, Tone};

/// Convert nodes to HTML. Countdowns show their text as of `now`; a client
/// script keeps them ticking using the `data-` attributes.
pub fn render_html(nodes: &[RenderNode], now: NaiveDateTime, config: &HtmlConfig) -> String {
    let mut out = String::new();
    let emitter = Emitter { now, config };
    for node in nodes {
        emitter.emit(node, &mut out);
    }
    out
}

struct Emitter<'c> {
    now: NaiveDateTime,
    config: &'c HtmlConfig,
}

impl Emitter<'_> {
    fn emit_all(&self, nodes: &[RenderNode], out: &mut String) {
        for node in nodes {
            self.emit(node, out);
        }
    }

    fn emit(&self, node: &RenderNode, out: &mut String) {
        match node {
            RenderNode::Text(text) => out.push_str(&encode_text(text)),
            RenderNode::Styled { style, children } => {
                self.open("span", style.class_names(), out);
                self.emit_all(children, out);
                out.push_str("</span>");
            }
            RenderNode::Paragraph { align, children } => {
                // `<p>` cannot hold an `<aside>` or `<blockquote>`.
                let tag = if holds_block(children) { "div" } else { "p" };
                match align {
                    Align::Left => out.push_str(&format!("<{tag}>")),
                    Align::Center => self.open(tag, ["align-center"], out),
                    Align::Right => self.open(tag, ["align-right"], out),
                }
                self.emit_all(children, out);
                out.push_str(&format!("</{tag}>\n"));
            }
            RenderNode::Heading { level, children } => {
                let tag = match level {
                    HeadingLevel::Large => "h2",
                    HeadingLevel::Small => "h3",
                };
                out.push_str(&format!("<{tag}>"));
                self.emit_all(children, out);
                out.push_str(&format!("</{tag}>\n"));
            }
            RenderNode::List(list) => self.emit_list(list, out),
            RenderNode::Divider(size) => {
                let class = match size {
                    DividerSize::Normal => "divider",
                    DividerSize::Small => "divider-small",
                };
                self.open("hr", [class], out);
                out.push('\n');
            }
            RenderNode::LineBreak => out.push_str("<br>\n"),
            RenderNode::Link { url, children } => {
                out.push_str(&format!("<a href=\"{}\"", encode_double_quoted_attribute(url)));
                if self.config.links_new_tab {
                    out.push_str(" target=\"_blank\"");
                }
                if self.config.links_nofollow {
                    out.push_str(" rel=\"nofollow noopener\"");
                }
                out.push('>');
                self.emit_all(children, out);
                out.push_str("</a>");
            }
            RenderNode::Spoiler(children) => {
                out.push_str(&format!(
                    "<span class=\"{}\" data-revealed=\"false\">",
                    self.classes(["spoiler"])
                ));
                self.emit_all(children, out);
                out.push_str("</span>");
            }
            RenderNode::ProgressBar(bar) => self.emit_progress_bar(bar, out),
            RenderNode::Countdown(countdown) => {
                let direction = match countdown.direction {
                    Direction::ToTarget => "to",
                    Direction::SinceTarget => "since",
                };
                let style = match countdown.style {
                    CountdownStyle::Compact => "compact",
                    CountdownStyle::Verbose => "verbose",
                };
                out.push_str(&format!(
                    "<span class=\"{}\" data-target=\"{}\" data-direction=\"{direction}\" data-style=\"{style}\">{}</span>",
                    self.classes(["countdown"]),
                    countdown.target.format("%Y-%m-%dT%H:%M:%S"),
                    encode_text(&countdown.text_at(self.now)),
                ));
            }
            RenderNode::Box {
                title,
                accent,
                float,
                children,
            } => {
                let mut classes = vec!["box".to_string(), format!("accent-{}", accent.name())];
                match float {
                    Some(Float::Left) => classes.push("float-left".to_string()),
                    Some(Float::Right) => classes.push("float-right".to_string()),
                    None => {}
                }
                self.open("aside", classes, out);
                if let Some(title) = title {
                    self.open("div", ["box-title"], out);
                    out.push_str(&encode_text(title));
                    out.push_str("</div>");
                }
                self.emit_all(children, out);
                out.push_str("</aside>\n");
            }
            RenderNode::Quote {
                author,
                source_url,
                children,
            } => {
                out.push_str(&format!("<blockquote class=\"{}\"", self.classes(["quote"])));
                if let Some(url) = source_url {
                    out.push_str(&format!(" cite=\"{}\"", encode_double_quoted_attribute(url)));
                }
                out.push('>');
                self.emit_all(children, out);
                if let Some(author) = author {
                    out.push_str(&format!("<footer>{}</footer>", encode_text(author)));
                }
                out.push_str("</blockquote>\n");
            }
            RenderNode::Fragment(children) => self.emit_all(children, out),
        }
    }

    /// Prefixed, attribute-escaped class list.
    fn classes<I>(&self, names: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let joined = names
            .into_iter()
            .map(|name| self.config.class(name.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        encode_double_quoted_attribute(&joined).into_owned()
    }

    fn open<I>(&self, tag: &str, names: I, out: &mut String)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        out.push_str(&format!("<{tag} class=\"{}\">", self.classes(names)));
    }

    fn emit_list(&self, list: &List, out: &mut String) {
        let tag = if list.ordered { "ol" } else { "ul" };
        if list.pros_cons {
            self.open(tag, ["pros-cons"], out);
        } else {
            out.push_str(&format!("<{tag}>"));
        }
        out.push('\n');
        for item in &list.items {
            match item.tone {
                Some(Tone::Pro) => self.open("li", ["pro"], out),
                Some(Tone::Con) => self.open("li", ["con"], out),
                None => out.push_str("<li>"),
            }
            self.emit_all(&item.children, out);
            out.push_str("</li>\n");
        }
        out.push_str(&format!("</{tag}>\n"));
    }

    fn emit_progress_bar(&self, bar: &ProgressBar, out: &mut String) {
        let percent = bar.fraction() * 100.0;
        let (value, max) = if bar.value.is_finite() && bar.max.is_finite() {
            let max = bar.max.max(0.0);
            (bar.value.clamp(0.0, max), max)
        } else {
            (0.0, 0.0)
        };
        out.push_str(&format!(
            "<span class=\"{}\" role=\"progressbar\" aria-valuenow=\"{value}\" aria-valuemin=\"0\" aria-valuemax=\"{max}\"><span class=\"{}\" style=\"width: {percent:.1}%\"></span></span>",
            self.classes(["progress".to_string(), format!("accent-{}", bar.accent.name())]),
            self.classes(["progress-fill"]),
        ));
    }
}

/// Whether inline content carries a box or quote, which render as block
/// elements.
fn holds_block(nodes: &[RenderNode]) -> bool {
    nodes.iter().any(|node| match node {
        RenderNode::Box { .. } | RenderNode::Quote { .. } => true,
        other => holds_block(other.children()),
    })
}
