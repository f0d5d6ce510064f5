//! One-line header: name, version, last sample time, global key hints.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::state::ViewState;

pub fn render_header(frame: &mut Frame, area: Rect, state: &ViewState) {
    let t = &state.theme;

    let pulse = if state.tick_count % 2 == 0 {
        "●"
    } else {
        "○"
    };
    let mut spans = vec![
        Span::styled(pulse, Style::default().fg(t.success)),
        Span::raw(" "),
        Span::styled(t!("app.name").to_string(), t.header_style()),
        Span::styled(
            t!("app.version", version = env!("CARGO_PKG_VERSION")).to_string(),
            t.header_style(),
        ),
    ];
    if let Some(m) = &state.metrics {
        spans.push(Span::raw("     "));
        spans.push(Span::styled(
            t!("header.updated", time = m.captured_at.format("%H:%M:%S").to_string()).to_string(),
            Style::default().fg(t.text_muted),
        ));
    }
    spans.push(Span::raw("     "));
    spans.push(Span::styled(
        t!("header.hints").to_string(),
        Style::default().fg(t.text_dim),
    ));

    let header = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(header, area);
}
