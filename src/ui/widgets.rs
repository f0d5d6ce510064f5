use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

/// Single-line bar gauge, colored by usage band.
pub struct GradientGauge<'a> {
    pub percent: f32,
    pub label: String,
    pub show_value: bool,
    pub theme: &'a Theme,
}

impl<'a> GradientGauge<'a> {
    pub fn new(percent: f32, label: &str, theme: &'a Theme) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            label: label.to_string(),
            show_value: true,
            theme,
        }
    }
}

impl Widget for GradientGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 1 {
            return;
        }

        let label_width = if self.label.is_empty() {
            0
        } else {
            self.label.width() as u16 + 1
        };
        let value_width = if self.show_value { 7 } else { 0 };
        let bar_width = area.width.saturating_sub(label_width + value_width);

        if bar_width < 2 {
            return;
        }

        buf.set_string(
            area.x,
            area.y,
            &self.label,
            Style::default().fg(self.theme.text_dim),
        );

        let bar_x = area.x + label_width;
        let exact = (self.percent / 100.0) * bar_width as f32;
        let filled = exact as u16;
        let color = self.theme.usage_color(self.percent);

        // ░ ▒ ▓ █
        for i in 0..bar_width {
            let (ch, style) = if i < filled {
                ('█', Style::default().fg(color))
            } else if i == filled {
                let frac = exact - filled as f32;
                let partial = if frac > 0.75 {
                    '▓'
                } else if frac > 0.5 {
                    '▒'
                } else {
                    '░'
                };
                (partial, Style::default().fg(color))
            } else {
                ('░', Style::default().fg(self.theme.gauge_bg))
            };
            buf.set_string(bar_x + i, area.y, ch.to_string(), style);
        }

        if self.show_value {
            let val_str = format!("{:>5.1}%", self.percent);
            buf.set_string(
                bar_x + bar_width + 1,
                area.y,
                &val_str,
                Style::default().fg(color),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_label_bar_and_value() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        GradientGauge::new(50.0, "CPU", &theme).render(area, &mut buf);
        let line = row(&buf, 20);
        assert!(line.starts_with("CPU "));
        assert!(line.contains('█'));
        assert!(line.ends_with(" 50.0%"));
    }

    #[test]
    fn percent_is_clamped() {
        let theme = Theme::default();
        assert_eq!(GradientGauge::new(140.0, "x", &theme).percent, 100.0);
        assert_eq!(GradientGauge::new(-3.0, "x", &theme).percent, 0.0);
    }

    #[test]
    fn too_narrow_draws_nothing() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        GradientGauge::new(50.0, "CPU", &theme).render(area, &mut buf);
        assert_eq!(row(&buf, 3), "   ");
    }
}
