mod config;
mod countdown;
mod error;
mod html;
mod inline;
pub mod live;
mod node;
mod parser;
mod style;
mod util;
mod wrapped;

pub use config::{Config, ConfigError, DepthPolicy, HtmlConfig, LimitsConfig};
pub use countdown::{Countdown, CountdownStyle, Direction, EXPIRED_TEXT, Reading, parse_czech_date};
pub use error::ParseError;
pub use html::render_html;
pub use node::{
    Align, DividerSize, Float, HeadingLevel, List, ListItem, ProgressBar, RenderNode, Tone,
};
pub use style::{Accent, Color, Foreground, Highlight, Style};

use chrono::NaiveDateTime;

/// Parse markup into block nodes using the bundled default configuration.
pub fn parse(markup: &str) -> Result<Vec<RenderNode>, ParseError> {
    parse_with_config(markup, &Config::compiled_default())
}

/// Parse markup into block nodes.
pub fn parse_with_config(markup: &str, config: &Config) -> Result<Vec<RenderNode>, ParseError> {
    parser::Parser::new(&config.limits).parse_document(markup)
}

/// Parse markup into a single [`RenderNode::Fragment`].
pub fn parse_fragment(markup: &str) -> Result<RenderNode, ParseError> {
    parse(markup).map(RenderNode::Fragment)
}

/// Convert markup to HTML, evaluating countdowns at `now`.
pub fn markup_to_html(markup: &str, now: NaiveDateTime) -> Result<String, ParseError> {
    markup_to_html_with_config(markup, now, &Config::compiled_default())
}

pub fn markup_to_html_with_config(
    markup: &str,
    now: NaiveDateTime,
    config: &Config,
) -> Result<String, ParseError> {
    let nodes = parse_with_config(markup, config)?;
    Ok(render_html(&nodes, now, &config.html))
}

/// Convert markup to its visible plain text.
pub fn markup_to_text(markup: &str) -> Result<String, ParseError> {
    let nodes = parse(markup)?;
    let mut out = String::new();
    node::push_plain_all(&nodes, &mut out);
    Ok(out)
}
