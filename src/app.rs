//! Application struct and event loop.
//!
//! Owns the terminal, the view state, the action orchestrator and the
//! credentials. Sampling runs elsewhere and arrives through the update loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use crate::actions::ActionOrchestrator;
use crate::ai::{GeminiClient, ProcessAnalyzer};
use crate::config::{Config, Credentials};
use crate::constants::*;
use crate::monitor::ProcessTable;
use crate::scan::{MalwareScanner, VirusTotalClient};
use crate::state::SharedState;
use crate::ui::{
    self, EscapeOutcome, Overlay, SettingsForm, SettingsSubmission, Update, UpdateLoop,
    ViewState,
};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// What woke the event loop.
enum Step {
    Update(Update),
    Key(KeyEvent),
    Tick,
    Redraw,
    Closed,
}

pub struct App {
    view: ViewState,
    updates: UpdateLoop,
    orchestrator: ActionOrchestrator,
    shared: Arc<SharedState>,
    credentials: Credentials,
    config: Config,
    killer: Box<dyn ProcessTable>,
    ai_enabled: bool,
}

impl App {
    pub fn new(
        config: Config,
        credentials: Credentials,
        shared: Arc<SharedState>,
        updates: UpdateLoop,
        killer: Box<dyn ProcessTable>,
        ai_enabled: bool,
    ) -> Self {
        let orchestrator = ActionOrchestrator::new(
            Arc::clone(&shared),
            config.inspect_timeout(),
            config.scan_timeout(),
        );
        let app = Self {
            view: ViewState::new(Arc::clone(&shared), ui::Theme::default()),
            updates,
            orchestrator,
            shared,
            credentials,
            config,
            killer,
            ai_enabled,
        };

        if ai_enabled {
            if let Some(key) = app.credentials.gemini_key() {
                app.install_analyzer(key);
            }
            if let Some(key) = app.credentials.virustotal_key() {
                app.install_scanner(key);
            }
        } else {
            info!("AI and scan features disabled");
        }
        app
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(Duration::from_millis(UI_TICK_MS));

        loop {
            terminal.draw(|frame| ui::render(frame, &self.view))?;

            let step = tokio::select! {
                update = self.updates.next() => match update {
                    Some(update) => Step::Update(update),
                    None => Step::Closed,
                },
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Step::Key(key),
                    Some(Ok(_)) => Step::Redraw,
                    Some(Err(e)) => return Err(e.into()),
                    None => Step::Closed,
                },
                _ = ticker.tick() => Step::Tick,
            };

            match step {
                Step::Update(update) => self.view.apply(update),
                Step::Key(key) => {
                    if self.handle_key(key) {
                        break;
                    }
                }
                Step::Tick => self.view.on_tick(),
                Step::Redraw => {}
                Step::Closed => break,
            }
        }
        Ok(())
    }

    // ── Collaborators ────────────────────────────────────────────

    fn install_analyzer(&self, key: &str) -> bool {
        match GeminiClient::new(key, self.config.gemini_model.clone()) {
            Ok(client) => {
                let analyzer: Arc<dyn ProcessAnalyzer> = Arc::new(client);
                self.orchestrator.set_analyzer(Some(analyzer));
                true
            }
            Err(e) => {
                warn!("AI client unavailable: {}", e);
                false
            }
        }
    }

    fn install_scanner(&self, key: &str) -> bool {
        match VirusTotalClient::new(key) {
            Ok(client) => {
                let scanner: Arc<dyn MalwareScanner> = Arc::new(client);
                self.orchestrator.set_scanner(Some(scanner));
                true
            }
            Err(e) => {
                warn!("scan client unavailable: {}", e);
                false
            }
        }
    }

    // ── Key handling ─────────────────────────────────────────────

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.view.overlay {
            Overlay::ConfirmKill(_) => self.handle_key_kill_confirm(key),
            Overlay::Settings(_) => self.handle_key_settings(key),
            Overlay::None => return self.handle_key_normal(key),
        }
        false
    }

    fn handle_key_normal(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.view.focus.escape() == EscapeOutcome::Exit {
                    return true;
                }
            }
            KeyCode::Tab => {
                self.view.focus.cycle();
            }
            KeyCode::Char('i') => {
                if let Some(process) = self.selected_or_status() {
                    let _ = self.orchestrator.run_inspect(process);
                }
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                if let Some(process) = self.selected_or_status() {
                    let _ = self.orchestrator.run_scan(process);
                }
            }
            KeyCode::Char('k') => {
                if let Some(process) = self.selected_or_status() {
                    self.view.overlay = Overlay::ConfirmKill(process);
                }
            }
            KeyCode::Char('s') => {
                self.view.overlay = Overlay::Settings(SettingsForm::new(
                    self.credentials.gemini_key(),
                    self.credentials.virustotal_key(),
                ));
            }
            KeyCode::Up => self.view.move_by(-1),
            KeyCode::Down => self.view.move_by(1),
            KeyCode::PageUp => self.view.page_up(),
            KeyCode::PageDown => self.view.page_down(),
            KeyCode::Home => self.view.select_first(),
            KeyCode::End => self.view.select_last(),
            _ => {}
        }
        false
    }

    /// The selected process re-read from shared state. `None` means no-op.
    fn selected_or_status(&mut self) -> Option<crate::models::ProcessInfo> {
        let selected = self.shared.selected_process();
        if selected.is_none() {
            self.view.set_status(t!("status.no_selection").to_string());
        }
        selected
    }

    fn handle_key_kill_confirm(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Overlay::ConfirmKill(process) = std::mem::take(&mut self.view.overlay) {
                    self.kill(process.pid, &process.name);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.view.close_overlay(),
            _ => {}
        }
    }

    fn kill(&mut self, pid: u32, name: &str) {
        if self.killer.kill(pid) {
            info!(pid, name, "process killed");
            self.view
                .set_status(t!("kill.success", pid = pid).to_string());
        } else {
            error!(pid, name, "failed to kill process");
            self.view
                .set_status(t!("kill.failed", pid = pid, name = name).to_string());
        }
    }

    fn handle_key_settings(&mut self, key: KeyEvent) {
        let Overlay::Settings(form) = &mut self.view.overlay else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.view.close_overlay(),
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let submission = form.submission();
                self.view.close_overlay();
                self.save_settings(submission);
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.view.close_overlay();
                self.clear_keys();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.input_char(c)
            }
            _ => {}
        }
    }

    fn save_settings(&mut self, submission: SettingsSubmission) {
        if submission == SettingsSubmission::default() {
            self.view.set_status(t!("settings.nothing").to_string());
            return;
        }

        let mut clients_ok = true;
        if let Some(key) = submission.gemini {
            if let Err(e) = self.credentials.save_gemini_key(&key) {
                error!("failed to save Gemini API key: {}", e);
                self.view
                    .set_status(t!("settings.save_failed", error = e.to_string()).to_string());
                return;
            }
            if self.ai_enabled {
                clients_ok &= self.install_analyzer(&key);
            }
        }
        if let Some(key) = submission.virustotal {
            if let Err(e) = self.credentials.save_virustotal_key(&key) {
                error!("failed to save VirusTotal API key: {}", e);
                self.view
                    .set_status(t!("settings.save_failed", error = e.to_string()).to_string());
                return;
            }
            if self.ai_enabled {
                clients_ok &= self.install_scanner(&key);
            }
        }

        if clients_ok {
            self.view.set_status(t!("settings.saved").to_string());
        } else {
            self.view.set_status(t!("settings.client_failed").to_string());
        }
    }

    fn clear_keys(&mut self) {
        self.orchestrator.set_analyzer(None);
        self.orchestrator.set_scanner(None);
        match self.credentials.clear() {
            Ok(()) => {
                info!("API keys deleted");
                self.view.set_status(t!("settings.deleted").to_string());
            }
            Err(e) => {
                error!("failed to delete API keys: {}", e);
                self.view
                    .set_status(t!("settings.delete_failed", error = e.to_string()).to_string());
            }
        }
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use tokio::sync::watch;

    use crate::error::SampleError;
    use crate::models::{ProcessInfo, ProcessSnapshot};
    use crate::monitor::ProcessEntry;
    use crate::ui::FocusTarget;

    /// Records kill requests.
    struct FakeTable {
        killed: Arc<Mutex<Vec<u32>>>,
        succeed: bool,
    }

    impl ProcessTable for FakeTable {
        fn enumerate(&mut self) -> Result<Vec<ProcessEntry>, SampleError> {
            Ok(Vec::new())
        }

        fn kill(&mut self, pid: u32) -> bool {
            self.killed.lock().unwrap().push(pid);
            self.succeed
        }
    }

    fn proc(pid: u32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: format!("proc{}", pid),
            cpu_percent: pid as f32,
            memory_bytes: 1024,
            memory_percent: 0.0,
            owner: "test".into(),
            command_line: String::new(),
        }
    }

    struct Harness {
        app: App,
        shared: Arc<SharedState>,
        killed: Arc<Mutex<Vec<u32>>>,
        _dir: tempfile::TempDir,
        _cancel: watch::Sender<bool>,
    }

    fn harness(with_processes: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let creds = Credentials::load(&dir.path().join(".env")).unwrap();
        let (shared, rx) = SharedState::new();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let killed = Arc::new(Mutex::new(Vec::new()));
        let table = FakeTable {
            killed: Arc::clone(&killed),
            succeed: true,
        };
        let mut app = App::new(
            Config::default(),
            creds,
            Arc::clone(&shared),
            UpdateLoop::new(rx, cancel_rx),
            Box::new(table),
            true,
        );
        if with_processes {
            let snapshot = ProcessSnapshot::ranked(vec![proc(3), proc(2), proc(1)], 100);
            shared.update_processes(snapshot.clone());
            app.view.apply(Update::Processes(snapshot));
        }
        Harness {
            app,
            shared,
            killed,
            _dir: dir,
            _cancel: cancel_tx,
        }
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    // ── Quit / focus ──────────────────────────────────────────────

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut h = harness(false);
        assert!(press(&mut h.app, KeyCode::Char('q')));
        assert!(ctrl(&mut h.app, 'c'));
    }

    #[test]
    fn esc_returns_to_list_before_exiting() {
        let mut h = harness(false);
        assert!(!press(&mut h.app, KeyCode::Tab));
        assert_eq!(h.app.view.focus.current(), FocusTarget::AiPanel);
        assert!(!press(&mut h.app, KeyCode::Esc));
        assert_eq!(h.app.view.focus.current(), FocusTarget::ProcessList);
        assert!(press(&mut h.app, KeyCode::Esc));
    }

    // ── Actions ───────────────────────────────────────────────────

    #[test]
    fn inspect_without_key_reports_unavailable() {
        let mut h = harness(true);
        assert!(!h.app.orchestrator.has_analyzer());
        press(&mut h.app, KeyCode::Char('i'));
        assert!(h.shared.ai_response().contains("AI Service not available"));
    }

    #[test]
    fn actions_without_selection_are_noops() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Char('i'));
        press(&mut h.app, KeyCode::Char('t'));
        assert_eq!(h.shared.ai_response(), "");
        assert!(h.app.view.status_message.is_some());
    }

    // ── Kill ──────────────────────────────────────────────────────

    #[test]
    fn kill_requires_confirmation() {
        let mut h = harness(true);
        press(&mut h.app, KeyCode::Down);
        press(&mut h.app, KeyCode::Char('k'));
        assert!(matches!(h.app.view.overlay, Overlay::ConfirmKill(ref p) if p.pid == 2));

        // Keys other than y/n are swallowed by the popup.
        assert!(!press(&mut h.app, KeyCode::Char('q')));
        assert!(h.killed.lock().unwrap().is_empty());

        press(&mut h.app, KeyCode::Char('y'));
        assert_eq!(*h.killed.lock().unwrap(), vec![2]);
        assert!(!h.app.view.has_overlay());
        let (msg, _) = h.app.view.status_message.as_ref().unwrap();
        assert!(msg.contains("killed successfully"));
    }

    #[test]
    fn kill_cancel_does_nothing() {
        let mut h = harness(true);
        press(&mut h.app, KeyCode::Char('k'));
        press(&mut h.app, KeyCode::Esc);
        assert!(!h.app.view.has_overlay());
        assert!(h.killed.lock().unwrap().is_empty());
    }

    // ── Settings ──────────────────────────────────────────────────

    #[tokio::test]
    async fn settings_save_installs_collaborators() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Char('s'));
        for c in "gemini-key".chars() {
            press(&mut h.app, KeyCode::Char(c));
        }
        press(&mut h.app, KeyCode::Tab);
        for c in "vt-key".chars() {
            press(&mut h.app, KeyCode::Char(c));
        }
        press(&mut h.app, KeyCode::Enter);

        assert!(!h.app.view.has_overlay());
        assert_eq!(h.app.credentials.gemini_key(), Some("gemini-key"));
        assert_eq!(h.app.credentials.virustotal_key(), Some("vt-key"));
        assert!(h.app.orchestrator.has_analyzer());
        assert!(h.app.orchestrator.has_scanner());
    }

    #[tokio::test]
    async fn settings_ctrl_d_clears_keys_and_collaborators() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Char('s'));
        for c in "gemini-key".chars() {
            press(&mut h.app, KeyCode::Char(c));
        }
        press(&mut h.app, KeyCode::Enter);
        assert!(h.app.orchestrator.has_analyzer());

        press(&mut h.app, KeyCode::Char('s'));
        ctrl(&mut h.app, 'd');
        assert!(!h.app.view.has_overlay());
        assert!(h.app.credentials.gemini_key().is_none());
        assert!(!h.app.orchestrator.has_analyzer());
        assert!(!h.app.orchestrator.has_scanner());
    }

    #[test]
    fn settings_esc_cancels_without_saving() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Char('s'));
        press(&mut h.app, KeyCode::Char('x'));
        press(&mut h.app, KeyCode::Esc);
        assert!(!h.app.view.has_overlay());
        assert!(h.app.credentials.gemini_key().is_none());
    }
}
