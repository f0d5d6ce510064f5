//! Popup overlays: kill confirmation, settings dialog.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::ProcessInfo;
use crate::ui::state::{SettingsField, SettingsForm, ViewState};
use crate::utils::truncate_str;

use super::helpers::centered_rect;

pub fn render_kill_confirm(frame: &mut Frame, area: Rect, state: &ViewState, process: &ProcessInfo) {
    let t = &state.theme;
    let popup_area = centered_rect(44.min(area.width.saturating_sub(4)), 9, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            t!("title.kill").to_string(),
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.danger));

    let label = |s: String| Span::styled(s, Style::default().fg(t.text_dim));
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            t!("kill.prompt").to_string(),
            Style::default().fg(t.text_primary).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            label(t!("kill.name").to_string()),
            Span::styled(truncate_str(&process.name, 30), t.header_style()),
        ]),
        Line::from(vec![
            label(t!("kill.pid").to_string()),
            Span::styled(process.pid.to_string(), t.header_style()),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            t!("kill.hint").to_string(),
            Style::default().fg(t.text_muted),
        )),
    ];

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(popup, popup_area);
}

pub fn render_settings(frame: &mut Frame, area: Rect, state: &ViewState, form: &SettingsForm) {
    let t = &state.theme;
    let popup_area = centered_rect(72.min(area.width.saturating_sub(4)), 11, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(t!("title.settings").to_string(), t.header_style()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style());
    let inner_width = block.inner(popup_area).width as usize;

    let field = |name: String, value: &str, active: bool| -> Vec<Line<'static>> {
        let cursor = if active { "_" } else { "" };
        let value_style = if active {
            Style::default()
                .fg(t.text_primary)
                .bg(t.table_row_selected_bg)
        } else {
            Style::default().fg(t.text_dim)
        };
        let shown = truncate_str(&format!("{}{}", value, cursor), inner_width.saturating_sub(4));
        vec![
            Line::from(Span::styled(
                format!("  {}", name),
                if active {
                    t.table_header_style()
                } else {
                    Style::default().fg(t.text_dim)
                },
            )),
            Line::from(vec![Span::raw("  "), Span::styled(shown, value_style)]),
        ]
    };

    let mut lines = vec![Line::raw("")];
    lines.extend(field(
        t!("settings.gemini").to_string(),
        &form.gemini,
        form.active == SettingsField::Gemini,
    ));
    lines.push(Line::raw(""));
    lines.extend(field(
        t!("settings.virustotal").to_string(),
        &form.virustotal,
        form.active == SettingsField::VirusTotal,
    ));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", t!("settings.hint")),
        Style::default().fg(t.text_muted),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
