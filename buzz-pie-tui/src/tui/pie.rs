use crate::tui::theme::Theme;
use buzz_pie_core::PieChart;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Wedges narrower than this get no percent label inside the pie.
const MIN_LABEL_SWEEP_DEG: f64 = 20.0;

/// Filled pie drawn with upper half blocks: every cell holds two square
/// pixels (fg on top, bg below), which keeps the circle round on terminals
/// whose cells are about twice as tall as wide.
pub struct PieWidget<'a> {
    chart: &'a PieChart,
    theme: &'a Theme,
}

impl<'a> PieWidget<'a> {
    pub fn new(chart: &'a PieChart, theme: &'a Theme) -> Self {
        Self { chart, theme }
    }

    fn color_at(&self, px: f64, py: f64, cx: f64, cy: f64, r: f64) -> Option<Color> {
        let dx = px - cx;
        let dy = cy - py; // screen y grows downwards
        if dx * dx + dy * dy > r * r {
            return None;
        }
        let angle = dy.atan2(dx).to_degrees();
        self.chart
            .slice_at(angle)
            .map(|i| self.theme.slice_color(i, self.chart.is_aggregate(i)))
    }
}

impl Widget for PieWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height < 1 {
            return;
        }
        let w = area.width as f64;
        let h = area.height as f64 * 2.0;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let r = w.min(h) / 2.0 - 0.5;
        if r <= 0.0 {
            return;
        }
        for row in 0..area.height {
            for col in 0..area.width {
                let x = col as f64 + 0.5;
                let top = self.color_at(x, row as f64 * 2.0 + 0.5, cx, cy, r);
                let bottom = self.color_at(x, row as f64 * 2.0 + 1.5, cx, cy, r);
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                let style = Style::default()
                    .fg(top.unwrap_or(Color::Reset))
                    .bg(bottom.unwrap_or(Color::Reset));
                buf.set_string(area.x + col, area.y + row, "▀", style);
            }
        }
        for (i, wedge) in self.chart.wedges().iter().enumerate() {
            if wedge.sweep_deg < MIN_LABEL_SWEEP_DEG {
                continue;
            }
            let label = self.chart.percent_label(i);
            let theta = wedge.mid_deg().to_radians();
            let px = cx + 0.6 * r * theta.cos();
            let py = cy - 0.6 * r * theta.sin();
            let len = label.chars().count() as f64;
            let col = (px - len / 2.0).round().clamp(0.0, (w - len).max(0.0)) as u16;
            let row = ((py / 2.0).floor() as u16).min(area.height - 1);
            let color = self.theme.slice_color(i, self.chart.is_aggregate(i));
            buf.set_string(
                area.x + col,
                area.y + row,
                label,
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
            );
        }
    }
}
