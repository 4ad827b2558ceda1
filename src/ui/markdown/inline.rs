use markdown::mdast::Node;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::ui::theme::Theme;

pub fn collect_text_from_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        push_text(node, &mut out);
    }
    out
}

fn push_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&text.value),
        Node::InlineCode(code) => out.push_str(&code.value),
        Node::Break(_) => out.push('\n'),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    push_text(child, out);
                }
            }
        }
    }
}

/// Inline content as spans, with nested emphasis folded into each span's
/// style.
pub fn collect_inline_spans(nodes: &[Node], base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for node in nodes {
        push_spans(node, base, &mut spans);
    }
    spans
}

fn push_spans(node: &Node, style: Style, spans: &mut Vec<Span<'static>>) {
    match node {
        Node::Text(text) => spans.push(Span::styled(text.value.clone(), style)),
        Node::InlineCode(code) => spans.push(Span::styled(code.value.clone(), Theme::code())),
        Node::Break(_) => spans.push(Span::styled("\n", style)),
        Node::Strong(strong) => {
            for child in &strong.children {
                push_spans(child, style.add_modifier(Modifier::BOLD), spans);
            }
        }
        Node::Emphasis(em) => {
            for child in &em.children {
                push_spans(child, style.add_modifier(Modifier::ITALIC), spans);
            }
        }
        Node::Delete(del) => {
            for child in &del.children {
                push_spans(child, style.add_modifier(Modifier::CROSSED_OUT), spans);
            }
        }
        Node::Link(link) => {
            for child in &link.children {
                push_spans(child, style.add_modifier(Modifier::UNDERLINED), spans);
            }
        }
        Node::Html(html) => spans.push(Span::styled(html.value.clone(), style)),
        _ => {}
    }
}
