use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use crossterm::style::Stylize;

/// Render Markdown source to ANSI-styled text suitable for a terminal.
pub fn render(src: &str) -> String {
    let arena = Arena::new();
    let opt = create_comrak_options();
    let root = parse_document(&arena, src, &opt);

    let mut out = String::new();
    for node in root.children() {
        render_block(node, 0, &mut out);
    }

    // Blocks carry a trailing blank line; keep a single final newline.
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn create_comrak_options() -> ComrakOptions<'static> {
    let mut opt = ComrakOptions::default();
    opt.extension.strikethrough = true;
    opt
}

fn render_block<'a>(node: &'a AstNode<'a>, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            let text = collect_inline(node);
            let styled = if heading.level == 1 {
                format!("{}", text.bold().underlined())
            } else {
                format!("{}", text.bold())
            };
            out.push_str(&pad);
            out.push_str(&styled);
            out.push_str("\n\n");
        }
        NodeValue::Paragraph => {
            for line in collect_inline(node).lines() {
                out.push_str(&pad);
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        NodeValue::List(list) => {
            for (index, item) in node.children().enumerate() {
                let marker = match list.list_type {
                    ListType::Bullet => "•".to_string(),
                    ListType::Ordered => format!("{}.", list.start + index),
                };
                render_item(item, indent, &marker, out);
            }
            out.push('\n');
        }
        NodeValue::CodeBlock(code) => {
            for line in code.literal.lines() {
                out.push_str(&pad);
                out.push_str("    ");
                out.push_str(&format!("{}", line.yellow()));
                out.push('\n');
            }
            out.push('\n');
        }
        NodeValue::BlockQuote => {
            let mut inner = String::new();
            for child in node.children() {
                render_block(child, 0, &mut inner);
            }
            for line in inner.trim_end().lines() {
                out.push_str(&pad);
                out.push_str("│ ");
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        NodeValue::ThematicBreak => {
            out.push_str(&pad);
            out.push_str(&"─".repeat(40));
            out.push_str("\n\n");
        }
        _ => {
            let text = collect_inline(node);
            if !text.is_empty() {
                out.push_str(&pad);
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
    }
}

fn render_item<'a>(item: &'a AstNode<'a>, indent: usize, marker: &str, out: &mut String) {
    let pad = "  ".repeat(indent + 1);
    let mut first = true;
    for child in item.children() {
        match &child.data.borrow().value {
            NodeValue::List(_) => render_block(child, indent + 1, out),
            _ => {
                for line in collect_inline(child).lines() {
                    out.push_str(&pad);
                    if first {
                        out.push_str(marker);
                        out.push(' ');
                        first = false;
                    } else {
                        out.push_str("  ");
                    }
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
}

fn collect_inline<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        render_inline(child, &mut text);
    }
    text
}

fn render_inline<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(literal) => out.push_str(literal),
        NodeValue::Code(code) => {
            out.push_str(&format!("{}", code.literal.as_str().yellow()));
        }
        NodeValue::Strong => {
            let inner = collect_inline(node);
            out.push_str(&format!("{}", inner.bold()));
        }
        NodeValue::Emph => {
            let inner = collect_inline(node);
            out.push_str(&format!("{}", inner.italic()));
        }
        NodeValue::Strikethrough => {
            let inner = collect_inline(node);
            out.push_str(&format!("{}", inner.crossed_out()));
        }
        NodeValue::Link(_) => {
            let inner = collect_inline(node);
            out.push_str(&format!("{}", inner.underlined()));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
        _ => {
            for child in node.children() {
                render_inline(child, out);
            }
        }
    }
}
