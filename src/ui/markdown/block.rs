use markdown::mdast::{Code, Heading, List, ListItem, Node, Table};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use textwrap::core::display_width;

use crate::ui::theme::{Glyphs, Theme};

use super::context::RenderContext;
use super::inline::{collect_inline_spans, collect_text_from_nodes};

pub fn render_node(node: &Node, ctx: RenderContext) -> Vec<Line<'static>> {
    match node {
        Node::Root(root) => render_blocks(&root.children, ctx),
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::Paragraph(para) => {
            wrap_spans(collect_inline_spans(&para.children, Style::default()), ctx)
        }
        Node::List(list) => render_list(list, ctx),
        Node::Code(code) => render_code_block(code, ctx),
        Node::Blockquote(quote) => render_blocks(&quote.children, ctx.quoted()),
        Node::ThematicBreak(_) => vec![Line::from(vec![
            Span::raw(ctx.prefix()),
            Span::styled(
                Glyphs::HORIZONTAL.repeat(ctx.available_width().min(40)),
                Theme::border(),
            ),
        ])],
        Node::Table(table) => render_table(table, ctx),
        Node::Html(html) => wrap_spans(vec![Span::raw(html.value.clone())], ctx),
        _ => Vec::new(),
    }
}

/// Sibling blocks separated by one blank line.
fn render_blocks(children: &[Node], ctx: RenderContext) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for child in children {
        let block = render_node(child, ctx);
        if block.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(blank_line(ctx));
        }
        lines.extend(block);
    }
    lines
}

fn blank_line(ctx: RenderContext) -> Line<'static> {
    if ctx.quote_depth == 0 {
        Line::default()
    } else {
        Line::from(Span::styled(ctx.prefix().trim_end().to_string(), Theme::muted()))
    }
}

fn render_heading(heading: &Heading, ctx: RenderContext) -> Vec<Line<'static>> {
    let style = match heading.depth {
        1 => Theme::primary_bold().add_modifier(Modifier::UNDERLINED),
        2 => Theme::primary_bold(),
        _ => Style::default().add_modifier(Modifier::BOLD),
    };
    wrap_spans(collect_inline_spans(&heading.children, style), ctx)
}

fn render_list(list: &List, ctx: RenderContext) -> Vec<Line<'static>> {
    let start = list.start.unwrap_or(1);
    let mut lines = Vec::new();

    for (offset, child) in list.children.iter().enumerate() {
        let Node::ListItem(item) = child else {
            continue;
        };
        let marker = if list.ordered {
            format!("{}. ", u64::from(start) + offset as u64)
        } else {
            format!("{} ", Glyphs::BULLET)
        };
        lines.extend(render_list_item(item, &marker, ctx));
        if list.spread && offset + 1 < list.children.len() {
            lines.push(blank_line(ctx));
        }
    }

    lines
}

/// The marker sits in front of the item's first line; everything else hangs
/// under the item text.
fn render_list_item(item: &ListItem, marker: &str, ctx: RenderContext) -> Vec<Line<'static>> {
    let marker_width = display_width(marker);
    let inner = RenderContext {
        width: ctx.width.saturating_sub(marker_width),
        ..ctx
    };
    let hang = " ".repeat(marker_width);

    let mut lines = Vec::new();
    for child in &item.children {
        let block = match child {
            Node::List(nested) => render_list(nested, inner),
            other => render_node(other, inner),
        };
        lines.extend(block);
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw(inner.prefix())));
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let lead = if i == 0 {
                Span::styled(marker.to_string(), Theme::primary())
            } else {
                Span::raw(hang.clone())
            };
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(lead);
            spans.extend(line.spans);
            Line::from(spans)
        })
        .map(|line| shift_prefix(line, ctx))
        .collect()
}

/// Moves the context prefix (indent and quote bars) in front of a list
/// marker that was prepended after layout.
fn shift_prefix(mut line: Line<'static>, ctx: RenderContext) -> Line<'static> {
    let prefix = ctx.prefix();
    if prefix.is_empty() || line.spans.len() < 2 {
        return line;
    }
    if let Some(first_content) = line.spans.get_mut(1)
        && let Some(rest) = first_content.content.strip_prefix(prefix.as_str())
    {
        first_content.content = rest.to_string().into();
        line.spans.insert(0, Span::raw(prefix));
    }
    line
}

fn render_code_block(code: &Code, ctx: RenderContext) -> Vec<Line<'static>> {
    let prefix = ctx.prefix();
    let label = code.lang.as_deref().unwrap_or("code");

    let mut lines = Vec::with_capacity(code.value.lines().count() + 2);
    lines.push(Line::from(vec![
        Span::raw(prefix.clone()),
        Span::styled(
            format!("{}{} {label}", Glyphs::ROUND_TOP_LEFT, Glyphs::HORIZONTAL),
            Theme::border(),
        ),
    ]));

    for source_line in code.value.lines() {
        lines.push(Line::from(vec![
            Span::raw(prefix.clone()),
            Span::styled(format!("{} ", Glyphs::VERTICAL), Theme::border()),
            Span::styled(source_line.to_string(), Theme::code()),
        ]));
    }

    lines.push(Line::from(vec![
        Span::raw(prefix),
        Span::styled(
            format!("{}{}", Glyphs::ROUND_BOTTOM_LEFT, Glyphs::HORIZONTAL),
            Theme::border(),
        ),
    ]));

    lines
}

fn render_table(table: &Table, ctx: RenderContext) -> Vec<Line<'static>> {
    table
        .children
        .iter()
        .enumerate()
        .flat_map(|(row_index, row)| {
            let cells: Vec<String> = row
                .children()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|cell| {
                            cell.children()
                                .map(|c| collect_text_from_nodes(c))
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .unwrap_or_default();
            let style = if row_index == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            wrap_spans(
                vec![Span::styled(cells.join(&format!(" {} ", Glyphs::VERTICAL)), style)],
                ctx,
            )
        })
        .collect()
}

/// Greedy word wrap that keeps each word's style. Hard breaks inside spans
/// start a new line; words wider than the line are split by character.
pub fn wrap_spans(spans: Vec<Span<'static>>, ctx: RenderContext) -> Vec<Line<'static>> {
    let width = ctx.available_width();
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut used = 0usize;

    for span in spans {
        let style = span.style;
        for (segment_index, segment) in span.content.split('\n').enumerate() {
            if segment_index > 0 {
                lines.push(Vec::new());
                used = 0;
            }
            for word in segment.split_inclusive(' ') {
                let trimmed_width = display_width(word.trim_end());

                if used > 0 && used + trimmed_width > width {
                    lines.push(Vec::new());
                    used = 0;
                }

                let word = if used == 0 { word.trim_start() } else { word };
                if word.is_empty() {
                    continue;
                }

                if display_width(word.trim_end()) > width {
                    for piece in split_to_width(word, width, used) {
                        if used > 0 && used + display_width(&piece) > width {
                            lines.push(Vec::new());
                            used = 0;
                        }
                        used += display_width(&piece);
                        push_span(&mut lines, piece, style);
                    }
                } else {
                    used += display_width(word);
                    push_span(&mut lines, word.to_string(), style);
                }
            }
        }
    }

    let prefix = ctx.prefix();
    lines
        .into_iter()
        .map(|mut spans| {
            if let Some(last) = spans.last_mut() {
                let trimmed = last.content.trim_end().to_string();
                last.content = trimmed.into();
            }
            if !prefix.is_empty() {
                spans.insert(0, Span::styled(prefix.clone(), quote_style(ctx)));
            }
            Line::from(spans)
        })
        .collect()
}

fn quote_style(ctx: RenderContext) -> Style {
    if ctx.quote_depth > 0 {
        Theme::muted()
    } else {
        Style::default()
    }
}

fn push_span(lines: &mut [Vec<Span<'static>>], text: String, style: Style) {
    if let Some(line) = lines.last_mut() {
        match line.last_mut() {
            Some(prev) if prev.style == style => {
                let joined = format!("{}{}", prev.content, text);
                prev.content = joined.into();
            }
            _ => line.push(Span::styled(text, style)),
        }
    }
}

fn split_to_width(word: &str, width: usize, used: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut budget = width.saturating_sub(used).max(1);

    for ch in word.chars() {
        let ch_width = display_width(ch.encode_utf8(&mut [0; 4]));
        if current_width + ch_width > budget && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_width = 0;
            budget = width;
        }
        current.push(ch);
        current_width += ch_width;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
