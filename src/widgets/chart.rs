//! Terminal renderings of the dashboard charts.

use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
        Widget,
    },
};

use crate::aggregate::{CategoryCount, RatingBin, YearCount};
use crate::chart_export::format_axis_label;

/// Colors shared by every chart panel.
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    pub bar: Color,
    pub peak: Color,
    pub text: Color,
    pub dimmed: Color,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            bar: Color::Blue,
            peak: Color::Red,
            text: Color::Reset,
            dimmed: Color::DarkGray,
        }
    }
}

fn panel_block(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

fn render_empty(area: Rect, buf: &mut Buffer, title: String, colors: &ChartColors) {
    Paragraph::new("No data")
        .style(Style::default().fg(colors.dimmed))
        .centered()
        .block(panel_block(title))
        .render(area, buf);
}

/// First index of a `visible`-wide window over `len` items that keeps `focus` near the middle.
pub fn window_start(len: usize, visible: usize, focus: Option<usize>) -> usize {
    if visible >= len {
        return 0;
    }
    let latest = len - visible;
    match focus {
        Some(f) => f.saturating_sub(visible / 2).min(latest),
        None => latest,
    }
}

/// Bars per year. When the years do not fit, the window is centred on the peak year.
pub fn render_yearly(
    area: Rect,
    buf: &mut Buffer,
    yearly: &[YearCount],
    peak: Option<YearCount>,
    colors: &ChartColors,
) {
    let title = match peak {
        Some(p) => format!(" Movies per year (peak {}: {}) ", p.year, p.count),
        None => " Movies per year ".to_string(),
    };
    if yearly.is_empty() {
        render_empty(area, buf, title, colors);
        return;
    }

    const BAR_WIDTH: u16 = 4;
    let inner = area.width.saturating_sub(2);
    let visible = ((inner + 1) / (BAR_WIDTH + 1)).max(1) as usize;
    let peak_idx = peak.and_then(|p| yearly.iter().position(|y| y.year == p.year));
    let start = window_start(yearly.len(), visible, peak_idx);
    let end = (start + visible).min(yearly.len());

    let bars: Vec<Bar> = yearly[start..end]
        .iter()
        .map(|yc| {
            let color = if Some(yc.year) == peak.map(|p| p.year) {
                colors.peak
            } else {
                colors.bar
            };
            Bar::default()
                .value(yc.count as u64)
                .label(Line::from(yc.year.to_string()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(colors.text).bg(color))
        })
        .collect();

    BarChart::default()
        .block(panel_block(title))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

pub fn render_ratings(area: Rect, buf: &mut Buffer, bins: &[RatingBin], colors: &ChartColors) {
    let title = " Rating distribution ".to_string();
    if bins.iter().all(|b| b.count == 0) {
        render_empty(area, buf, title, colors);
        return;
    }

    let n = bins.len() as u16;
    let inner = area.width.saturating_sub(2);
    let bar_width = (inner.saturating_sub(n.saturating_sub(1)) / n.max(1)).clamp(1, 6);
    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count as u64)
                .label(Line::from(format!("{:.1}", bin.start)))
                .style(Style::default().fg(colors.bar))
        })
        .collect();

    BarChart::default()
        .block(panel_block(title))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

/// Axis labels at the start, middle and end of `[0, max]`.
fn axis_labels(max: f64) -> Vec<String> {
    [0.0, max / 2.0, max]
        .iter()
        .map(|v| format_axis_label(*v))
        .collect()
}

pub fn render_budget_revenue(
    area: Rect,
    buf: &mut Buffer,
    points: &[(f64, f64)],
    colors: &ChartColors,
) {
    let title = format!(" Budget vs revenue ({} movies) ", points.len());
    if points.is_empty() {
        render_empty(area, buf, title, colors);
        return;
    }
    let (x_max, y_max) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(x, y), &(b, r)| (x.max(b), y.max(r)));
    let x_max = if x_max > 0.0 { x_max } else { 1.0 };
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(colors.bar))
        .data(points);

    Chart::new(vec![dataset])
        .block(panel_block(title))
        .x_axis(
            Axis::default()
                .title("Budget")
                .style(Style::default().fg(colors.dimmed))
                .bounds([0.0, x_max])
                .labels(axis_labels(x_max)),
        )
        .y_axis(
            Axis::default()
                .title("Revenue")
                .style(Style::default().fg(colors.dimmed))
                .bounds([0.0, y_max])
                .labels(axis_labels(y_max)),
        )
        .render(area, buf);
}

/// Horizontal bars, one per category, in the given order.
pub fn render_categories(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    entries: &[CategoryCount],
    colors: &ChartColors,
) {
    let title = format!(" {} ", title);
    if entries.is_empty() {
        render_empty(area, buf, title, colors);
        return;
    }
    let bars: Vec<Bar> = entries
        .iter()
        .map(|entry| {
            Bar::default()
                .value(entry.count as u64)
                .label(Line::from(entry.name.clone()))
                .text_value(entry.count.to_string())
                .style(Style::default().fg(colors.bar))
                .value_style(Style::default().fg(colors.text).bg(colors.bar))
        })
        .collect();

    BarChart::default()
        .block(panel_block(title))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_focus_visible() {
        assert_eq!(window_start(5, 10, Some(2)), 0);
        assert_eq!(window_start(100, 10, None), 90);
        assert_eq!(window_start(100, 10, Some(3)), 0);
        assert_eq!(window_start(100, 10, Some(50)), 45);
        assert_eq!(window_start(100, 10, Some(98)), 90);
    }

    #[test]
    fn empty_panels_say_no_data() {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        render_categories(area, &mut buf, "Top companies", &[], &ChartColors::default());
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("No data"), "{text}");
        assert!(text.contains("Top companies"), "{text}");
    }
}
