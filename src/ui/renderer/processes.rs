//! Process table.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::constants::NAME_COLUMN_WIDTH;
use crate::ui::focus::FocusTarget;
use crate::ui::state::ViewState;
use crate::utils::truncate_str;

use super::helpers::{panel_block, render_scrollbar_bordered};

pub fn render_processes(frame: &mut Frame, area: Rect, state: &ViewState) {
    let t = &state.theme;
    let focused = state.focus.is_focused(FocusTarget::ProcessList);
    let total = state.processes.len();
    let block = panel_block(
        t!("title.process_list", count = total).to_string(),
        focused,
        t,
    );

    if state.processes.is_empty() {
        let empty = Paragraph::new(Span::styled(
            t!("table.empty").to_string(),
            Style::default().fg(t.text_muted),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(t!("table.pid").to_string()).style(t.table_header_style()),
        Cell::from(t!("table.name").to_string()).style(t.table_header_style()),
        Cell::from(t!("table.cpu").to_string()).style(t.table_header_style()),
        Cell::from(t!("table.mem_mb").to_string()).style(t.table_header_style()),
        Cell::from(t!("table.mem_pct").to_string()).style(t.table_header_style()),
        Cell::from(t!("table.owner").to_string()).style(t.table_header_style()),
    ])
    .height(1);

    let rows: Vec<Row> = state
        .processes
        .iter()
        .map(|p| {
            let cpu_color = t.usage_color(p.cpu_percent);
            let mem_color = t.usage_color(p.memory_percent);
            Row::new(vec![
                Cell::from(format!("{:>6}", p.pid)).style(Style::default().fg(t.text_dim)),
                Cell::from(truncate_str(&p.name, NAME_COLUMN_WIDTH)),
                Cell::from(format!("{:>5.1}", p.cpu_percent))
                    .style(Style::default().fg(cpu_color)),
                Cell::from(format!("{:>6}", p.memory_mb())),
                Cell::from(format!("{:>4.1}", p.memory_percent))
                    .style(Style::default().fg(mem_color)),
                Cell::from(truncate_str(&p.owner, 12)).style(Style::default().fg(t.text_dim)),
            ])
            .style(t.table_row_normal())
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(NAME_COLUMN_WIDTH as u16 + 1),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Min(6),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(t.table_row_selected());

    // A selection past the end (list shrank) highlights nothing.
    let mut table_state = TableState::default();
    table_state.select(state.selected_row().map(|_| state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);

    render_scrollbar_bordered(frame, area, total, state.selected.min(total - 1));
}
