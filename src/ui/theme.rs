use ratatui::style::{Color, Modifier, Style};

use crate::constants::*;

/// Every color the renderer uses, in one struct.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Brand / Primary ──────────────────────────────────────
    pub accent: Color,
    pub accent_secondary: Color,

    // ── Text ─────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // ── Semantic (also the panel markup palette) ─────────────
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // ── Gauges ───────────────────────────────────────────────
    pub gauge_low: Color,
    pub gauge_mid: Color,
    pub gauge_high: Color,
    pub gauge_critical: Color,
    pub gauge_bg: Color,

    // ── Table selection ──────────────────────────────────────
    pub table_row_selected_bg: Color,

    // ── Borders ──────────────────────────────────────────────
    pub border: Color,
    pub border_focused: Color,

    // ── GPU ──────────────────────────────────────────────────
    pub gpu_accent: Color,
}

impl Theme {
    /// Dark palette with moss-green focus highlight.
    pub fn graveyard() -> Self {
        Self {
            accent: Color::Rgb(250, 204, 21),
            accent_secondary: Color::Rgb(129, 230, 217),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(130, 130, 150),
            text_muted: Color::Rgb(85, 85, 105),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(99, 210, 237),
            gauge_low: Color::Rgb(72, 199, 142),
            gauge_mid: Color::Rgb(255, 193, 69),
            gauge_high: Color::Rgb(255, 136, 0),
            gauge_critical: Color::Rgb(255, 85, 85),
            gauge_bg: Color::Rgb(45, 45, 58),
            table_row_selected_bg: Color::Rgb(45, 55, 45),
            border: Color::Rgb(60, 60, 78),
            border_focused: Color::Rgb(132, 204, 22),
            gpu_accent: Color::Rgb(118, 185, 0),
        }
    }

    // ── Computed Styles ──────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header_style(&self) -> Style {
        Style::default()
            .fg(self.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_row_normal(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn table_row_selected(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.table_row_selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Returns a color for a usage percentage gauge.
    pub fn usage_color(&self, percent: f32) -> Color {
        if percent >= USAGE_CRITICAL_PCT {
            self.gauge_critical
        } else if percent >= USAGE_HIGH_PCT {
            self.gauge_high
        } else if percent >= USAGE_MID_PCT {
            self.gauge_mid
        } else {
            self.gauge_low
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_highlight_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Border for a panel given whether it holds focus.
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            self.border_highlight_style()
        } else {
            self.border_style()
        }
    }

    /// Style for a `[tag]` in panel markup. `None` for unknown tags.
    pub fn markup_style(&self, tag: &str) -> Option<Style> {
        let fg = match tag {
            "red" => self.danger,
            "yellow" => self.warning,
            "green" => self.success,
            "cyan" => self.info,
            "white" => self.text_primary,
            "dim" => self.text_dim,
            _ => return None,
        };
        Some(Style::default().fg(fg))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::graveyard()
    }
}
