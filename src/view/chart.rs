use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::types::ChartSeries;

/// Rendering context for the revenue chart. Built once at startup and passed
/// to whoever draws the chart; there is no process-wide chart registry.
#[derive(Debug, Clone)]
pub struct ChartContext {
    pub revenue_style: Style,
    pub expenses_style: Style,
    pub axis_style: Style,
    pub title_style: Style,
    pub marker: Marker,
}

impl Default for ChartContext {
    fn default() -> Self {
        Self {
            revenue_style: Style::default().fg(Color::Green),
            expenses_style: Style::default().fg(Color::Red),
            axis_style: Style::default().fg(Color::DarkGray),
            title_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            marker: Marker::Braille,
        }
    }
}

impl ChartContext {
    pub fn points(values: &[f64]) -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i as f64, *v))
            .collect()
    }

    /// Y range covering both series with 10% headroom; always includes zero.
    pub fn y_bounds(series: &ChartSeries) -> [f64; 2] {
        let values = series.revenue.iter().chain(&series.expenses).filter(|v| v.is_finite());
        let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let hi = if hi <= lo { lo + 1.0 } else { hi };
        [lo * 1.1, hi * 1.1]
    }

    /// First, middle and last label; enough to orient without crowding the axis.
    pub fn x_labels(series: &ChartSeries) -> Vec<String> {
        let n = series.labels.len();
        match n {
            0 => Vec::new(),
            1 | 2 => series.labels.clone(),
            _ => vec![
                series.labels[0].clone(),
                series.labels[n / 2].clone(),
                series.labels[n - 1].clone(),
            ],
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, series: &ChartSeries, title: &str) {
        let revenue = Self::points(&series.revenue);
        let expenses = Self::points(&series.expenses);
        let len = series.labels.len().max(series.revenue.len()).max(series.expenses.len());
        let [y_lo, y_hi] = Self::y_bounds(series);

        let datasets = vec![
            Dataset::default()
                .name("Revenue")
                .marker(self.marker)
                .graph_type(GraphType::Line)
                .style(self.revenue_style)
                .data(&revenue),
            Dataset::default()
                .name("Expenses")
                .marker(self.marker)
                .graph_type(GraphType::Line)
                .style(self.expenses_style)
                .data(&expenses),
        ];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.axis_style)
                    .title(Span::styled(format!(" {title} "), self.title_style)),
            )
            .x_axis(
                Axis::default()
                    .style(self.axis_style)
                    .bounds([0.0, len.saturating_sub(1).max(1) as f64])
                    .labels(Self::x_labels(series)),
            )
            .y_axis(
                Axis::default()
                    .style(self.axis_style)
                    .bounds([y_lo, y_hi])
                    .labels(vec![format!("{y_lo:.0}"), format!("{:.0}", y_hi)]),
            );

        f.render_widget(chart, area);
    }
}
