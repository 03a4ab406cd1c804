use lvzj::{
    Align, Color, Config, DepthPolicy, EXPIRED_TEXT, Foreground, List, ListItem, ParseError,
    Reading, RenderNode, Style, parse, parse_czech_date, parse_fragment, parse_with_config,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn paragraph(children: Vec<RenderNode>) -> RenderNode {
    RenderNode::Paragraph {
        align: Align::Left,
        children,
    }
}

fn items(texts: &[&str]) -> Vec<ListItem> {
    texts
        .iter()
        .map(|text| ListItem {
            tone: None,
            children: vec![RenderNode::text(*text)],
        })
        .collect()
}

#[test]
fn reset_leaves_following_text_unstyled() {
    let bold = Style {
        bold: true,
        ..Style::default()
    };
    assert_eq!(
        parse("(tučně)a(obyčejně)b").unwrap(),
        vec![paragraph(vec![
            RenderNode::Styled {
                style: bold,
                children: vec![RenderNode::text("a")],
            },
            RenderNode::text("b"),
        ])]
    );
}

#[test]
fn style_does_not_leak_into_next_line() {
    let nodes = parse("(tučně)a\nb").unwrap();
    assert_eq!(nodes[1], paragraph(vec![RenderNode::text("b")]));
}

#[test]
fn runs_of_open_parens_terminate() {
    let input = "(".repeat(60_000);
    assert_eq!(
        parse(&input).unwrap(),
        vec![paragraph(vec![RenderNode::text(input.as_str())])]
    );
}

#[test]
fn unclosed_openers_stay_literal() {
    let input = "(boxík a(spoiler(citace x".repeat(2_000);
    assert_eq!(
        parse(&input).unwrap(),
        vec![paragraph(vec![RenderNode::text(input.as_str())])]
    );
}

#[test]
fn escape_yields_one_paren() {
    assert_eq!(
        parse("(závorka)").unwrap(),
        vec![paragraph(vec![RenderNode::text("(")])]
    );
}

#[test]
fn implicit_list_has_three_items() {
    assert_eq!(
        parse("- a\n- b\n- c").unwrap(),
        vec![RenderNode::List(List {
            ordered: false,
            pros_cons: false,
            items: items(&["a", "b", "c"]),
        })]
    );
}

#[test]
fn numbered_list_does_not_leak() {
    assert_eq!(
        parse("(seznam číslovaný)\n- x\n- y\n(konec)").unwrap(),
        vec![RenderNode::List(List {
            ordered: true,
            pros_cons: false,
            items: items(&["x", "y"]),
        })]
    );
}

#[test]
fn titled_box_with_bold_body() {
    assert_eq!(
        parse("(boxík \"T\")(tučně)inner(konec boxíku)").unwrap(),
        vec![RenderNode::Box {
            title: Some("T".to_string()),
            accent: lvzj::Accent::Primary,
            float: None,
            children: vec![RenderNode::Styled {
                style: Style {
                    bold: true,
                    ..Style::default()
                },
                children: vec![RenderNode::text("inner")],
            }],
        }]
    );
}

#[test]
fn unterminated_spoiler_is_literal() {
    assert_eq!(
        parse("(spoiler)no closing tag").unwrap(),
        vec![paragraph(vec![RenderNode::text("(spoiler)no closing tag")])]
    );
}

#[test]
fn past_countdown_is_expired() {
    let nodes = parse("(odpočet do 1.1.2000)").unwrap();
    let RenderNode::Paragraph { children, .. } = &nodes[0] else {
        panic!("expected a paragraph, got {:?}", nodes[0]);
    };
    let RenderNode::Countdown(countdown) = &children[0] else {
        panic!("expected a countdown, got {:?}", children[0]);
    };
    for now in ["1.1.2000", "1.1.2001 0:01", "31.12.2099 23:59"] {
        let now = parse_czech_date(now).unwrap();
        assert_eq!(countdown.reading(now), Reading::Expired);
        assert_eq!(countdown.text_at(now), EXPIRED_TEXT);
    }
}

#[test]
fn bare_url_splits_text() {
    assert_eq!(
        parse("see https://example.com/x now").unwrap(),
        vec![paragraph(vec![
            RenderNode::text("see "),
            RenderNode::Link {
                url: "https://example.com/x".to_string(),
                children: vec![RenderNode::text("https://example.com/x")],
            },
            RenderNode::text(" now"),
        ])]
    );
}

#[test]
fn one_color_per_bracket() {
    assert_eq!(
        parse("(červeně zeleně)x").unwrap(),
        vec![paragraph(vec![RenderNode::Styled {
            style: Style {
                foreground: Some(Foreground::Color(Color::Red)),
                ..Style::default()
            },
            children: vec![RenderNode::text("x")],
        }])]
    );
}

#[test]
fn later_color_replaces_earlier() {
    assert_eq!(
        parse("(červeně)(zeleně)x").unwrap(),
        vec![paragraph(vec![RenderNode::Styled {
            style: Style {
                foreground: Some(Foreground::Color(Color::Green)),
                ..Style::default()
            },
            children: vec![RenderNode::text("x")],
        }])]
    );
}

#[test]
fn empty_input_has_no_nodes() {
    assert_eq!(parse("").unwrap(), vec![]);
    assert_eq!(parse_fragment("").unwrap(), RenderNode::Fragment(vec![]));
}

#[test]
fn limits_come_from_config() {
    let mut config = Config::default();
    config.limits.max_input_bytes = 10;
    assert_eq!(
        parse_with_config("01234567890", &config),
        Err(ParseError::InputTooLarge { len: 11, max: 10 })
    );

    let nested = "(boxík)(citace)(spoiler)x(konec)(konec citace)(konec boxíku)";
    assert!(parse_with_config(nested, &Config::default()).is_ok());

    let mut config = Config::default();
    config.limits.max_depth = 2;
    assert_eq!(
        parse_with_config(nested, &config),
        Err(ParseError::InputTooComplex { max_depth: 2 })
    );

    config.limits.on_too_deep = DepthPolicy::Literal;
    assert_eq!(
        parse_with_config(nested, &config).unwrap(),
        vec![RenderNode::Box {
            title: None,
            accent: lvzj::Accent::Primary,
            float: None,
            children: vec![RenderNode::Quote {
                author: None,
                source_url: None,
                children: vec![RenderNode::text("(spoiler)x(konec)")],
            }],
        }]
    );
}

#[test]
fn nested_spoilers_pair_with_nearest_closer() {
    // The first closer ends the outer spoiler, so the rest stays literal.
    assert_eq!(
        parse("(spoiler)a(spoiler)b(konec)c(konec)").unwrap(),
        vec![paragraph(vec![
            RenderNode::Spoiler(vec![RenderNode::text("a(spoiler)b")]),
            RenderNode::text("c(konec)"),
        ])]
    );
}

#[test]
fn tree_serializes_to_json() {
    let nodes = parse("(nadpis) Ahoj\n(odpočet slovně do 24.12.2026 18:00)").unwrap();
    assert_eq!(
        serde_json::to_value(&nodes).unwrap(),
        json!([
            { "heading": { "level": "large", "children": [{ "text": "Ahoj" }] } },
            { "paragraph": {
                "align": "left",
                "children": [{ "countdown": {
                    "target": "2026-12-24T18:00:00",
                    "direction": "to_target",
                    "style": "verbose"
                } }]
            } }
        ])
    );
}

#[test]
fn plain_text_preview() {
    assert_eq!(
        lvzj::markup_to_text(
            "(nadpis) Recenze\n(seznam kladů a záporů)\n+ levné\n- hlučné\nVerdikt: (spoiler)(tučně)koupit(konec)"
        )
        .unwrap(),
        "Recenze\n+ levné\n- hlučné\nVerdikt: koupit\n"
    );
}

#[test]
fn link_label_spans_wrapped_constructs() {
    let nodes = parse("(odkaz na https://a.cz)x (boxík)y(konec boxíku) z(konec)").unwrap();
    let RenderNode::Paragraph { children, .. } = &nodes[0] else {
        panic!("expected a paragraph, got {:?}", nodes[0]);
    };
    let [RenderNode::Link { url, children }] = children.as_slice() else {
        panic!("expected a single link, got {children:?}");
    };
    assert_eq!(url, "https://a.cz");
    assert_eq!(children.len(), 3);
    assert!(matches!(children[1], RenderNode::Box { .. }));
}
