//! AI and scan text panels.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::ui::focus::FocusTarget;
use crate::ui::markup;
use crate::ui::state::ViewState;

use super::helpers::{panel_block, render_scrollbar_bordered};

pub fn render_ai_panel(frame: &mut Frame, area: Rect, state: &ViewState) {
    render_markup_panel(
        frame,
        area,
        state,
        t!("title.ai_panel").to_string(),
        &state.ai_text,
        state.ai_scroll,
        state.focus.is_focused(FocusTarget::AiPanel),
    );
}

pub fn render_scan_panel(frame: &mut Frame, area: Rect, state: &ViewState) {
    render_markup_panel(
        frame,
        area,
        state,
        t!("title.scan_panel").to_string(),
        &state.scan_text,
        state.scan_scroll,
        state.focus.is_focused(FocusTarget::ScanPanel),
    );
}

fn render_markup_panel(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    title: String,
    content: &str,
    scroll: u16,
    focused: bool,
) {
    let t = &state.theme;
    let text = markup::parse(content, Style::default().fg(t.text_primary), t);
    let paragraph = Paragraph::new(text)
        .block(panel_block(title, focused, t))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    render_scrollbar_bordered(
        frame,
        area,
        markup::line_count(content),
        scroll as usize,
    );
}
