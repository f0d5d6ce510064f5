//! Footer: key hints, or the current status message while it lasts.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::state::ViewState;

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &ViewState) {
    let t = &state.theme;

    if let Some((msg, _)) = &state.status_message {
        let status = Paragraph::new(Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(status, area);
        return;
    }

    let key = |k: String| Span::styled(k, Style::default().fg(t.accent));
    let desc = |d: String| Span::styled(d, Style::default().fg(t.text_primary));

    let spans = vec![
        key(t!("footer.tab").to_string()),
        desc(t!("footer.tab_desc").to_string()),
        key(t!("footer.arrows").to_string()),
        desc(t!("footer.arrows_desc").to_string()),
        key(t!("footer.inspect").to_string()),
        desc(t!("footer.inspect_desc").to_string()),
        key(t!("footer.scan").to_string()),
        desc(t!("footer.scan_desc").to_string()),
        key(t!("footer.kill").to_string()),
        desc(t!("footer.kill_desc").to_string()),
        key(t!("footer.settings").to_string()),
        desc(t!("footer.settings_desc").to_string()),
        key(t!("footer.quit").to_string()),
        desc(t!("footer.quit_desc").to_string()),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
