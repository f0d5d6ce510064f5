//! Application-wide constants.
//!
//! Centralizes magic numbers, timeouts, and configuration defaults.

use std::path::PathBuf;
use std::time::Duration;

// ── Timing ────────────────────────────────────────────────────────
/// Minimum allowed refresh rate (ms) to prevent excessive CPU usage.
pub const MIN_REFRESH_MS: u64 = 100;
/// Default refresh interval (ms).
pub const DEFAULT_REFRESH_MS: u64 = 1000;
/// UI tick (ms) -- spinner animation and status message expiry.
pub const UI_TICK_MS: u64 = 250;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;
/// How often stale CPU baselines are purged from the sampler cache.
pub const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(10);

// ── Actions ───────────────────────────────────────────────────────
/// Deadline for a single-process AI inspection (seconds).
pub const DEFAULT_INSPECT_TIMEOUT_SECS: u64 = 30;
/// Deadline for the scan-then-analyze pipeline (seconds).
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 60;
/// Transport-level timeout on the VirusTotal HTTP client (seconds).
pub const VT_HTTP_TIMEOUT_SECS: u64 = 30;

// ── Capacities ────────────────────────────────────────────────────
/// Maximum processes kept in a ranked snapshot.
pub const DEFAULT_MAX_PROCESSES: usize = 100;
/// Top engine detections shown in scan results and prompts.
pub const MAX_TOP_DETECTIONS: usize = 5;
/// Error body excerpt length in API error messages.
pub const API_ERROR_BODY_LEN: usize = 300;

// ── UI Layout ─────────────────────────────────────────────────────
/// Width of the metrics + AI column.
pub const LEFT_COLUMN_WIDTH: u16 = 50;
/// Width of the scan results column.
pub const SCAN_COLUMN_WIDTH: u16 = 45;
/// Page up/down step size in the process list.
pub const PAGE_SIZE: usize = 20;
/// Scroll step for PageUp/PageDown in the text panels.
pub const PANEL_PAGE_STEP: u16 = 10;
/// Process name column width.
pub const NAME_COLUMN_WIDTH: usize = 15;
/// Width of text progress bars in scan results.
pub const DETECTION_BAR_WIDTH: usize = 20;
/// Displayed executable path length in scan results.
pub const SCAN_PATH_DISPLAY_LEN: usize = 35;
/// Displayed hash prefix length in scan results.
pub const SCAN_HASH_DISPLAY_LEN: usize = 16;
/// Displayed malware name length in scan results.
pub const SCAN_RESULT_DISPLAY_LEN: usize = 25;
/// GPU name display length in the metrics column.
pub const GPU_NAME_DISPLAY_LEN: usize = 25;
/// Visible characters of a stored API key in the settings dialog.
pub const KEY_MASK_VISIBLE: usize = 10;

// ── Usage Color Thresholds ────────────────────────────────────────
/// Usage percentage above which color is "critical".
pub const USAGE_CRITICAL_PCT: f32 = 90.0;
/// Usage percentage above which color is "high".
pub const USAGE_HIGH_PCT: f32 = 70.0;
/// Usage percentage above which color is "mid".
pub const USAGE_MID_PCT: f32 = 40.0;
/// Share of malicious verdicts that makes a scan HIGH risk.
pub const HIGH_THREAT_MALICIOUS_PCT: f64 = 10.0;

// ── AI / Gemini API ───────────────────────────────────────────────
/// Default Gemini model identifier.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Gemini REST endpoint base.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// VirusTotal REST endpoint base.
pub const VIRUSTOTAL_API_BASE: &str = "https://www.virustotal.com";

// ── Credentials ───────────────────────────────────────────────────
/// Environment / .env key for the Gemini API key.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment / .env key for the VirusTotal API key.
pub const VIRUSTOTAL_KEY_VAR: &str = "VIRUSTOTAL_API_KEY";

// ── Spinner Animation ─────────────────────────────────────────────
/// Spinner character sequence for loading indicators.
pub const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── Paths ─────────────────────────────────────────────────────────

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "graveyard.log";
/// Default credentials file, relative to the working directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = ".env";

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/graveyard/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("graveyard")
}

/// Returns `~/.config/graveyard/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
