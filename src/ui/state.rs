use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::actions::messages;
use crate::config::{is_valid_key, masked};
use crate::constants::*;
use crate::models::{MetricsSnapshot, ProcessInfo, ProcessSnapshot};
use crate::state::SharedState;

use super::focus::{FocusController, FocusTarget};
use super::theme::Theme;
use super::updates::Update;

/// Which input of the settings dialog has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Gemini,
    VirusTotal,
}

/// Settings popup contents. Fields start out holding the masked stored keys.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub gemini: String,
    pub virustotal: String,
    pub active: SettingsField,
    gemini_prefill: String,
    virustotal_prefill: String,
}

/// Keys the user actually typed. `None` means leave the stored key alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSubmission {
    pub gemini: Option<String>,
    pub virustotal: Option<String>,
}

impl SettingsForm {
    pub fn new(gemini_key: Option<&str>, virustotal_key: Option<&str>) -> Self {
        let gemini = gemini_key.map(masked).unwrap_or_default();
        let virustotal = virustotal_key.map(masked).unwrap_or_default();
        Self {
            gemini_prefill: gemini.clone(),
            virustotal_prefill: virustotal.clone(),
            gemini,
            virustotal,
            active: SettingsField::Gemini,
        }
    }

    pub fn toggle_field(&mut self) {
        self.active = match self.active {
            SettingsField::Gemini => SettingsField::VirusTotal,
            SettingsField::VirusTotal => SettingsField::Gemini,
        };
    }

    fn active_input(&mut self) -> &mut String {
        match self.active {
            SettingsField::Gemini => &mut self.gemini,
            SettingsField::VirusTotal => &mut self.virustotal,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.active_input().push(c);
    }

    pub fn backspace(&mut self) {
        self.active_input().pop();
    }

    pub fn submission(&self) -> SettingsSubmission {
        let pick = |value: &str, prefill: &str| {
            let value = value.trim();
            (is_valid_key(value) && value != prefill && !value.ends_with("..."))
                .then(|| value.to_string())
        };
        SettingsSubmission {
            gemini: pick(&self.gemini, &self.gemini_prefill),
            virustotal: pick(&self.virustotal, &self.virustotal_prefill),
        }
    }
}

/// Modal popup drawn above the main layout.
#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    ConfirmKill(ProcessInfo),
    Settings(SettingsForm),
}

/// Everything the renderer draws. Owned by the UI task only.
pub struct ViewState {
    pub theme: Theme,
    pub focus: FocusController,
    pub processes: ProcessSnapshot,
    pub metrics: Option<MetricsSnapshot>,
    pub ai_text: String,
    pub scan_text: String,
    pub selected: usize,
    pub ai_scroll: u16,
    pub scan_scroll: u16,
    pub overlay: Overlay,
    pub tick_count: u64,

    // ── Status message (shown in footer) ────────────────────────
    pub status_message: Option<(String, Instant)>,

    shared: Arc<SharedState>,
}

impl ViewState {
    pub fn new(shared: Arc<SharedState>, theme: Theme) -> Self {
        Self {
            theme,
            focus: FocusController::default(),
            processes: ProcessSnapshot::default(),
            metrics: None,
            ai_text: messages::ai_placeholder(),
            scan_text: messages::scan_placeholder(),
            selected: 0,
            ai_scroll: 0,
            scan_scroll: 0,
            overlay: Overlay::None,
            tick_count: 0,
            status_message: None,
            shared,
        }
    }

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Processes(snapshot) => self.processes = snapshot,
            Update::Metrics(snapshot) => self.metrics = Some(snapshot),
            Update::AiResponse(text) => {
                self.ai_text = text;
                self.ai_scroll = 0;
            }
            Update::ScanResponse(text) => {
                self.scan_text = text;
                self.scan_scroll = 0;
            }
        }
    }

    /// Set a footer message with automatic timestamp.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Advance the spinner and drop expired status messages.
    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        let expiry = Duration::from_secs(STATUS_MESSAGE_TIMEOUT_SECS);
        if let Some((_, at)) = &self.status_message {
            if at.elapsed() >= expiry {
                self.status_message = None;
            }
        }
    }

    /// The highlighted row, if it still exists in the current snapshot.
    pub fn selected_row(&self) -> Option<&ProcessInfo> {
        self.processes.get(self.selected)
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.shared.set_selected_index(index);
    }

    /// Move the selection or scroll the focused panel by `delta` lines.
    pub fn move_by(&mut self, delta: i64) {
        match self.focus.current() {
            FocusTarget::ProcessList => {
                let max = self.processes.len().saturating_sub(1) as i64;
                let next = (self.selected as i64 + delta).clamp(0, max);
                self.select(next as usize);
            }
            FocusTarget::AiPanel => self.ai_scroll = scrolled(self.ai_scroll, delta),
            FocusTarget::ScanPanel => self.scan_scroll = scrolled(self.scan_scroll, delta),
        }
    }

    pub fn page_up(&mut self) {
        match self.focus.current() {
            FocusTarget::ProcessList => self.move_by(-(PAGE_SIZE as i64)),
            _ => self.move_by(-i64::from(PANEL_PAGE_STEP)),
        }
    }

    pub fn page_down(&mut self) {
        match self.focus.current() {
            FocusTarget::ProcessList => self.move_by(PAGE_SIZE as i64),
            _ => self.move_by(i64::from(PANEL_PAGE_STEP)),
        }
    }

    pub fn select_first(&mut self) {
        if self.focus.is_focused(FocusTarget::ProcessList) {
            self.select(0);
        }
    }

    pub fn select_last(&mut self) {
        if self.focus.is_focused(FocusTarget::ProcessList) {
            self.select(self.processes.len().saturating_sub(1));
        }
    }

    pub fn has_overlay(&self) -> bool {
        !matches!(self.overlay, Overlay::None)
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }
}

fn scrolled(current: u16, delta: i64) -> u16 {
    (i64::from(current) + delta).clamp(0, i64::from(u16::MAX)) as u16
}
