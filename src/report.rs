//! Plain-text rendering of a dashboard view, used by `--report`.

use color_eyre::Result;
use std::fmt::Write;

use crate::aggregate::CategoryCount;
use crate::dashboard::{insights, DashboardView};

/// Whole-dollar currency with thousands separators, e.g. `$1,234,567`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{:.2}", r),
        None => "n/a".to_string(),
    }
}

fn write_top(out: &mut String, title: &str, entries: &[CategoryCount]) -> std::fmt::Result {
    writeln!(out, "{}", title)?;
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for (rank, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<width$}  {}",
            rank + 1,
            entry.name,
            entry.count,
            width = width
        )?;
    }
    writeln!(out)
}

fn write_sections(out: &mut String, view: &DashboardView) -> std::fmt::Result {
    writeln!(out, "moviedash: {}", view.selection)?;
    writeln!(out)?;
    writeln!(out, "Movies:       {}", view.metrics.movies)?;
    writeln!(out, "Genre rows:   {}", view.metrics.rows)?;
    writeln!(
        out,
        "Total budget: {}",
        format_currency(view.metrics.budget_sum)
    )?;
    writeln!(
        out,
        "Mean rating:  {}",
        format_rating(view.metrics.mean_rating)
    )?;
    writeln!(out)?;

    writeln!(out, "Movies per year")?;
    if view.yearly.is_empty() {
        writeln!(out, "  (none)")?;
    }
    let peak = view.peak_year.map(|p| p.year);
    for yc in &view.yearly {
        let marker = if Some(yc.year) == peak { "  <- peak" } else { "" };
        writeln!(out, "  {}  {:>6}{}", yc.year, yc.count, marker)?;
    }
    writeln!(out)?;

    write_top(out, "Top original languages", &view.languages)?;
    write_top(out, "Top production companies", &view.companies)?;

    writeln!(out, "Insights")?;
    for line in insights(view) {
        writeln!(out, "  - {}", line)?;
    }
    writeln!(out)
}

/// Metrics, per-year table, top lists, insights and the data preview.
pub fn render_report(view: &DashboardView) -> Result<String> {
    let mut out = String::new();
    write_sections(&mut out, view)?;
    let preview = view.preview()?;
    writeln!(
        out,
        "Preview (first {} of {} rows)",
        preview.height(),
        view.metrics.rows
    )?;
    writeln!(out, "{}", preview)?;
    Ok(out)
}
