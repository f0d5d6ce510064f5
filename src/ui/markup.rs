//! `[color]text[-]` markup used by the AI and scan panels.
//!
//! A known tag switches the current style, `[-]` resets it. Anything in
//! brackets that isn't a known tag is kept as literal text, so AI output
//! like `[1]` or `[WARNING]` survives untouched.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use super::theme::Theme;

/// Parse markup into styled lines. `base` is the style outside any tag.
pub fn parse(input: &str, base: Style, theme: &Theme) -> Text<'static> {
    let mut style = base;
    let lines: Vec<Line<'static>> = input
        .split('\n')
        .map(|raw| {
            let mut spans = Vec::new();
            let mut buf = String::new();
            let mut rest = raw;

            while let Some(open) = rest.find('[') {
                buf.push_str(&rest[..open]);
                let after = &rest[open + 1..];
                let Some(close) = after.find(']') else {
                    buf.push_str(&rest[open..]);
                    rest = "";
                    break;
                };
                let tag = &after[..close];
                let next = if tag == "-" {
                    Some(base)
                } else {
                    theme.markup_style(tag)
                };
                match next {
                    Some(next_style) => {
                        flush(&mut spans, &mut buf, style);
                        style = next_style;
                    }
                    None => buf.push_str(&rest[open..open + close + 2]),
                }
                rest = &after[close + 1..];
            }
            buf.push_str(rest);
            flush(&mut spans, &mut buf, style);
            Line::from(spans)
        })
        .collect();
    Text::from(lines)
}

fn flush(spans: &mut Vec<Span<'static>>, buf: &mut String, style: Style) {
    if !buf.is_empty() {
        spans.push(Span::styled(std::mem::take(buf), style));
    }
}

/// Number of lines the markup produces, for scroll bounds.
pub fn line_count(input: &str) -> usize {
    input.split('\n').count()
}
