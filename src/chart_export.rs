//! Chart export to PNG (plotters bitmap backend).

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::aggregate::{CategoryCount, RatingBin, YearCount, RATING_MAX};
use crate::dashboard::DashboardView;

pub const YEARLY_FILE: &str = "movies_per_year.png";
pub const RATINGS_FILE: &str = "rating_distribution.png";
pub const BUDGET_REVENUE_FILE: &str = "budget_vs_revenue.png";
pub const LANGUAGES_FILE: &str = "top_languages.png";
pub const COMPANIES_FILE: &str = "top_companies.png";

const BAR: RGBColor = RGBColor(0x6b, 0xae, 0xd6);
const PEAK: RGBColor = RGBColor(0xd6, 0x27, 0x28);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 20);

/// Compact axis label: 1.2B, 350M, 12K, 7.5.
pub fn format_axis_label(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.0}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// `(start, end)` pieces of a dashed line from `from` to `to`.
pub fn dash_segments(from: f64, to: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    if dash <= 0.0 || to <= from {
        return out;
    }
    let mut start = from;
    while start < to {
        out.push((start, (start + dash).min(to)));
        start += dash + gap.max(0.0);
    }
    out
}

/// Name of the category drawn at x position `v`, if `v` is on a bar centre.
fn category_label(names: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 0.01 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Headroom above the tallest bar so its top is not clipped.
fn y_upper(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// White image with the chart title and a "No data" note.
pub fn write_empty_png(path: &Path, title: &str, (width, height): (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, CAPTION_FONT)?;
    let (w, h) = root.dim_in_pixel();
    root.draw(&Text::new(
        "No data",
        (w as i32 / 2 - 40, h as i32 / 2),
        ("sans-serif", 24).into_font().color(&BLACK.mix(0.6)),
    ))?;
    root.present()?;
    Ok(())
}

/// Bar per year; the peak year gets a dashed vertical marker.
pub fn write_yearly_png(
    path: &Path,
    yearly: &[YearCount],
    peak: Option<YearCount>,
    size: (u32, u32),
) -> Result<()> {
    const TITLE: &str = "Movies per year";
    let (Some(first), Some(last)) = (yearly.first(), yearly.last()) else {
        return write_empty_png(path, TITLE, size);
    };
    let max = yearly.iter().map(|y| y.count).max().unwrap_or(0) as f64;
    let y_max = y_upper(max);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .caption(TITLE, CAPTION_FONT)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            first.year as f64 - 0.5..last.year as f64 + 0.5,
            0.0..y_max,
        )?;
    chart
        .configure_mesh()
        .x_desc("Release year")
        .y_desc("Movies")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format_axis_label(*v))
        .draw()?;

    chart.draw_series(yearly.iter().map(|yc| {
        let x = yc.year as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, yc.count as f64)], BAR.filled())
    }))?;

    if let Some(peak) = peak {
        let x = peak.year as f64;
        let style = ShapeStyle::from(&PEAK).stroke_width(2);
        chart.draw_series(
            dash_segments(0.0, y_max, y_max / 40.0, y_max / 60.0)
                .into_iter()
                .map(|(y0, y1)| PathElement::new(vec![(x, y0), (x, y1)], style)),
        )?;
    }

    root.present()?;
    Ok(())
}

pub fn write_ratings_png(path: &Path, bins: &[RatingBin], size: (u32, u32)) -> Result<()> {
    const TITLE: &str = "Rating distribution";
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    if max == 0.0 {
        return write_empty_png(path, TITLE, size);
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .caption(TITLE, CAPTION_FONT)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..RATING_MAX, 0.0..y_upper(max))?;
    chart
        .configure_mesh()
        .x_desc("Vote average")
        .y_desc("Movies")
        .y_label_formatter(&|v| format_axis_label(*v))
        .draw()?;

    chart.draw_series(bins.iter().map(|bin| {
        let pad = (bin.end - bin.start) * 0.05;
        Rectangle::new(
            [(bin.start + pad, 0.0), (bin.end - pad, bin.count as f64)],
            BAR.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

pub fn write_budget_revenue_png(
    path: &Path,
    points: &[(f64, f64)],
    size: (u32, u32),
) -> Result<()> {
    const TITLE: &str = "Budget vs revenue";
    if points.is_empty() {
        return write_empty_png(path, TITLE, size);
    }
    let (x_min, x_max, y_min, y_max) = points.iter().fold(
        (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    );

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .caption(TITLE, CAPTION_FONT)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..y_upper(x_max), y_min..y_upper(y_max))?;
    chart
        .configure_mesh()
        .x_desc("Budget")
        .y_desc("Revenue")
        .x_label_formatter(&|v| format_axis_label(*v))
        .y_label_formatter(&|v| format_axis_label(*v))
        .draw()?;

    chart.draw_series(PointSeries::of_element(
        points.iter().copied(),
        2,
        BAR.mix(0.6),
        &|c, s, st| EmptyElement::at(c) + Circle::new((0, 0), s, st.filled()),
    ))?;

    root.present()?;
    Ok(())
}

/// One bar per category in the given order, labelled with the category name.
pub fn write_category_png(
    path: &Path,
    title: &str,
    x_desc: &str,
    entries: &[CategoryCount],
    size: (u32, u32),
) -> Result<()> {
    if entries.is_empty() {
        return write_empty_png(path, title, size);
    }
    let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
    let max = entries.iter().map(|e| e.count).max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .caption(title, CAPTION_FONT)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..entries.len() as f64 - 0.5, 0.0..y_upper(max))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len())
        .x_desc(x_desc)
        .y_desc("Movies")
        .x_label_formatter(&|v| category_label(&names, *v))
        .y_label_formatter(&|v| format_axis_label(*v))
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, entry)| {
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, entry.count as f64)], BAR.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Write the five dashboard charts into `dir` (created if missing). Returns the written paths.
pub fn export_dashboard_charts(
    view: &DashboardView,
    dir: &Path,
    size: (u32, u32),
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create chart directory {}", dir.display()))?;

    let yearly = dir.join(YEARLY_FILE);
    write_yearly_png(&yearly, &view.yearly, view.peak_year, size)?;
    let ratings = dir.join(RATINGS_FILE);
    write_ratings_png(&ratings, &view.ratings, size)?;
    let scatter = dir.join(BUDGET_REVENUE_FILE);
    write_budget_revenue_png(&scatter, &view.budget_revenue, size)?;
    let languages = dir.join(LANGUAGES_FILE);
    write_category_png(
        &languages,
        "Top original languages",
        "Language",
        &view.languages,
        size,
    )?;
    let companies = dir.join(COMPANIES_FILE);
    write_category_png(
        &companies,
        "Top production companies",
        "Company",
        &view.companies,
        size,
    )?;

    let written = vec![yearly, ratings, scatter, languages, companies];
    for path in &written {
        log::info!("wrote chart {}", path.display());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn axis_labels_are_compact() {
        assert_eq!(format_axis_label(0.0), "0");
        assert_eq!(format_axis_label(7.5), "7.5");
        assert_eq!(format_axis_label(12_000.0), "12K");
        assert_eq!(format_axis_label(350_000_000.0), "350M");
        assert_eq!(format_axis_label(2_780_000_000.0), "2.8B");
    }

    #[test]
    fn dashes_cover_range() {
        let segs = dash_segments(0.0, 10.0, 2.0, 1.0);
        assert_eq!(segs, vec![(0.0, 2.0), (3.0, 5.0), (6.0, 8.0), (9.0, 10.0)]);
        assert!(dash_segments(5.0, 5.0, 1.0, 1.0).is_empty());
        assert!(dash_segments(0.0, 1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn category_labels_only_on_bar_centres() {
        let names = vec!["en".to_string(), "fr".to_string()];
        assert_eq!(category_label(&names, 0.0), "en");
        assert_eq!(category_label(&names, 1.0), "fr");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }

    #[test]
    fn empty_inputs_write_placeholder_images() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        write_category_png(&path, "Top production companies", "Company", &[], (400, 300))
            .unwrap();
        assert!(path.exists());
        write_yearly_png(&path, &[], None, (400, 300)).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
