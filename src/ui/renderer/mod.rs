//! Renderer module: split into focused submodules.
//!
//! - `header`: name, version, global hints
//! - `metrics`: CPU / memory / GPU blocks
//! - `panels`: AI and scan text panels
//! - `processes`: process table
//! - `status_bar`: footer hints and status messages
//! - `overlays`: kill confirmation, settings dialog
//! - `helpers`: shared rendering utilities

mod header;
pub mod helpers;
mod metrics;
mod overlays;
mod panels;
mod processes;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::constants::{LEFT_COLUMN_WIDTH, SCAN_COLUMN_WIDTH};

use super::state::{Overlay, ViewState};

/// Top-level render function.
///
/// `[ metrics + AI | scan results | process list ]` between a one-line
/// header and footer.
pub fn render(frame: &mut Frame, state: &ViewState) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(10),   // Content area
            Constraint::Length(1), // Footer
        ])
        .split(size);

    header::render_header(frame, main_chunks[0], state);
    status_bar::render_status_bar(frame, main_chunks[2], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LEFT_COLUMN_WIDTH),
            Constraint::Length(SCAN_COLUMN_WIDTH),
            Constraint::Min(30),
        ])
        .split(main_chunks[1]);

    let [cpu_h, mem_h, gpu_h] = metrics::METRICS_HEIGHTS;
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(cpu_h),
            Constraint::Length(mem_h),
            Constraint::Length(gpu_h),
            Constraint::Min(5),
        ])
        .split(columns[0]);

    metrics::render_metrics(frame, [left[0], left[1], left[2]], state);
    panels::render_ai_panel(frame, left[3], state);
    panels::render_scan_panel(frame, columns[1], state);
    processes::render_processes(frame, columns[2], state);

    match &state.overlay {
        Overlay::None => {}
        Overlay::ConfirmKill(process) => {
            overlays::render_kill_confirm(frame, size, state, process)
        }
        Overlay::Settings(form) => overlays::render_settings(frame, size, state, form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::{backend::TestBackend, Terminal};

    use crate::models::{ProcessInfo, ProcessSnapshot};
    use crate::state::SharedState;
    use crate::ui::state::SettingsForm;
    use crate::ui::updates::Update;
    use crate::ui::Theme;

    fn screen_text(state: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn view() -> ViewState {
        let (shared, _rx) = SharedState::new();
        let mut s = ViewState::new(shared, Theme::default());
        s.apply(Update::Processes(ProcessSnapshot::ranked(
            vec![ProcessInfo {
                pid: 4242,
                name: "gravedigger".into(),
                cpu_percent: 12.5,
                memory_bytes: 64 * 1024 * 1024,
                memory_percent: 0.8,
                owner: "root".into(),
                command_line: "/usr/bin/gravedigger".into(),
            }],
            100,
        )));
        s
    }

    #[test]
    fn renders_main_layout() {
        let text = screen_text(&view());
        assert!(text.contains("Graveyard"));
        assert!(text.contains("gravedigger"));
        assert!(text.contains("4242"));
        assert!(text.contains("Not detected"));
    }

    #[test]
    fn header_shows_last_sample_time() {
        use chrono::{Local, TimeZone};

        use crate::models::{CpuMetrics, MemoryMetrics, MetricsSnapshot};

        let mut s = view();
        assert!(!screen_text(&s).contains("updated"));

        s.apply(Update::Metrics(MetricsSnapshot {
            cpu: CpuMetrics {
                usage_percent: 20.0,
                core_count: 8,
            },
            memory: MemoryMetrics::from_bytes(1 << 30, 4 << 30),
            gpu: None,
            captured_at: Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 7).unwrap(),
        }));
        assert!(screen_text(&s).contains("updated 13:45:07"));
    }

    #[test]
    fn markup_tags_are_not_drawn() {
        let mut s = view();
        s.apply(Update::AiResponse("[green]all quiet[-] [1]".into()));
        let text = screen_text(&s);
        assert!(text.contains("all quiet [1]"));
        assert!(!text.contains("[green]"));
    }

    #[test]
    fn renders_overlays() {
        let mut s = view();
        let process = s.processes.get(0).cloned().unwrap();
        s.overlay = Overlay::ConfirmKill(process);
        assert!(screen_text(&s).contains("Kill process?"));

        s.overlay = Overlay::Settings(SettingsForm::new(None, None));
        assert!(screen_text(&s).contains("VirusTotal API Key"));
    }

    #[test]
    fn renders_tiny_terminal_without_panic() {
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        let s = view();
        terminal.draw(|f| render(f, &s)).unwrap();
    }
}
