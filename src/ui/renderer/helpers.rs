//! Shared rendering helpers: scrollbar, centered rect, panel block.

use ratatui::{
    layout::{Margin, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::ui::theme::Theme;

/// Bordered block with a styled title, highlighted when focused.
pub fn panel_block<'a>(title: String, focused: bool, t: &Theme) -> Block<'a> {
    let title_style = if focused {
        t.border_highlight_style()
    } else {
        Style::default().fg(t.text_dim)
    };
    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(t.panel_border(focused))
}

/// Render a vertical scrollbar inside a bordered area (1px vertical margin).
pub fn render_scrollbar_bordered(frame: &mut Frame, area: Rect, total: usize, position: usize) {
    let visible_height = area.height.saturating_sub(2) as usize;
    if total <= visible_height {
        return;
    }
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"));
    let mut scrollbar_state = ScrollbarState::new(total).position(position);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Return a `Rect` centered within `area` with the given dimensions.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── centered_rect ─────────────────────────────────────────────

    #[test]
    fn centered_rect_normal() {
        let area = Rect::new(0, 0, 100, 50);
        let r = centered_rect(40, 20, area);
        assert_eq!(r.x, 30);
        assert_eq!(r.y, 15);
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 20);
    }

    #[test]
    fn centered_rect_larger_than_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 30, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.height, 10);
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 0);
    }

    #[test]
    fn centered_rect_with_offset_area() {
        let area = Rect::new(10, 5, 80, 40);
        let r = centered_rect(20, 10, area);
        assert_eq!(r.x, 40); // 10 + (80 - 20) / 2
        assert_eq!(r.y, 20); // 5 + (40 - 10) / 2
    }
}
