//! CPU, memory and GPU blocks in the left column.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::constants::GPU_NAME_DISPLAY_LEN;
use crate::models::GpuMetrics;
use crate::ui::state::ViewState;
use crate::ui::theme::Theme;
use crate::ui::widgets::GradientGauge;
use crate::utils::truncate_str;

/// Rows taken by the CPU, memory and GPU blocks.
pub const METRICS_HEIGHTS: [u16; 3] = [4, 4, 6];

fn metric_block<'a>(title: String, t: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(t.text_dim)))
        .borders(Borders::ALL)
        .border_style(t.border_style())
}

/// Text line above a gauge row.
fn split_two(inner: Rect) -> [Rect; 2] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    [rows[0], rows[1]]
}

pub fn render_metrics(frame: &mut Frame, areas: [Rect; 3], state: &ViewState) {
    let t = &state.theme;

    let cpu_block = metric_block(t!("title.cpu").to_string(), t);
    let mem_block = metric_block(t!("title.memory").to_string(), t);
    let cpu_inner = cpu_block.inner(areas[0]);
    let mem_inner = mem_block.inner(areas[1]);
    frame.render_widget(cpu_block, areas[0]);
    frame.render_widget(mem_block, areas[1]);

    let Some(m) = &state.metrics else {
        let waiting = Paragraph::new(Span::styled(
            t!("metrics.waiting").to_string(),
            Style::default().fg(t.text_muted),
        ));
        frame.render_widget(waiting, cpu_inner);
        render_gpu(frame, areas[2], None, t);
        return;
    };

    let [cpu_text, cpu_bar] = split_two(cpu_inner);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{:.1}% ", m.cpu.usage_percent),
                Style::default().fg(t.usage_color(m.cpu.usage_percent)),
            ),
            Span::styled(
                t!("metrics.cores", count = m.cpu.core_count).to_string(),
                Style::default().fg(t.text_dim),
            ),
        ])),
        cpu_text,
    );
    frame.render_widget(GradientGauge::new(m.cpu.usage_percent, "", t), cpu_bar);

    let [mem_text, mem_bar] = split_two(mem_inner);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{:.1}GB / {:.1}GB", m.memory.used_gb, m.memory.total_gb),
            Style::default().fg(t.text_primary),
        ))),
        mem_text,
    );
    frame.render_widget(GradientGauge::new(m.memory.percent, "", t), mem_bar);

    render_gpu(frame, areas[2], m.gpu.as_ref(), t);
}

fn render_gpu(frame: &mut Frame, area: Rect, gpu: Option<&GpuMetrics>, t: &Theme) {
    let block = metric_block(t!("title.gpu").to_string(), t);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = |s: String| Span::styled(s, Style::default().fg(t.text_dim));

    let gpu = match gpu {
        Some(g) if g.available => g,
        _ => {
            frame.render_widget(
                Paragraph::new(dim(t!("metrics.gpu_not_detected").to_string())),
                inner,
            );
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            truncate_str(&gpu.name, GPU_NAME_DISPLAY_LEN),
            Style::default().fg(t.gpu_accent),
        )),
        rows[0],
    );

    if gpu.memory_total_mb == 0 {
        frame.render_widget(
            Paragraph::new(dim(t!("metrics.gpu_no_metrics").to_string())),
            rows[1],
        );
        return;
    }

    let usage_label = t!("metrics.gpu_usage").to_string();
    frame.render_widget(
        GradientGauge::new(gpu.usage_percent, &usage_label, t),
        rows[1],
    );
    let (used, total) = gpu.memory_display();
    frame.render_widget(
        Paragraph::new(dim(format!("{}/{}", used, total))),
        rows[2],
    );
    let mem_label = t!("metrics.gpu_mem").to_string();
    frame.render_widget(
        GradientGauge::new(gpu.memory_percent(), &mem_label, t),
        rows[3],
    );
}
