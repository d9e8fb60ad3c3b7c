//! The per-selection recompute: cached frame + genre selection → everything the dashboard shows.

use color_eyre::Result;
use polars::prelude::*;
use std::time::Instant;

use crate::aggregate::{
    self, budget_revenue_points, peak_year, rating_histogram, restrict_to_languages,
    top_companies, top_languages, yearly_counts, CategoryCount, RatingBin, YearCount,
};
use crate::columns::{GENRE_NAME, PREVIEW_COLUMNS};
use crate::config::AppConfig;
use crate::expand::explode_list_column;
use crate::filter::{apply_genre_filter, genre_candidates, GenreSelection};
use crate::normalize::normalize;

/// Knobs for a view, usually taken from `[dashboard]` and `[chart]` config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub top_n: usize,
    pub preview_rows: usize,
    pub rating_bins: usize,
    pub chart_row_limit: Option<usize>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            preview_rows: 20,
            rating_bins: 20,
            chart_row_limit: None,
        }
    }
}

impl DashboardOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            top_n: config.dashboard.top_n,
            preview_rows: config.dashboard.preview_rows,
            rating_bins: config.dashboard.rating_bins,
            chart_row_limit: config.chart.row_limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Distinct movies in the selection.
    pub movies: usize,
    /// Rows of the active (genre-expanded) table.
    pub rows: usize,
    pub budget_sum: f64,
    pub mean_rating: Option<f64>,
}

/// Everything rendered for one genre selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selection: GenreSelection,
    /// Filter output: one row per (movie, genre) pair of the selection.
    pub active: DataFrame,
    /// One row per movie of the selection.
    pub movies: DataFrame,
    pub metrics: Metrics,
    pub yearly: Vec<YearCount>,
    pub peak_year: Option<YearCount>,
    pub ratings: Vec<RatingBin>,
    pub budget_revenue: Vec<(f64, f64)>,
    pub languages: Vec<CategoryCount>,
    /// Movies whose language is one of `languages`.
    pub top_language_movies: usize,
    pub companies: Vec<CategoryCount>,
    pub preview_rows: usize,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.metrics.movies == 0
    }

    /// First rows of the active table, limited to the preview columns that exist.
    pub fn preview(&self) -> Result<DataFrame> {
        let names: Vec<&str> = PREVIEW_COLUMNS
            .iter()
            .copied()
            .filter(|name| self.active.column(name).is_ok())
            .collect();
        let df = self.active.select(names)?;
        Ok(df.head(Some(self.preview_rows)))
    }
}

/// Normalized and genre-expanded frames, prepared once per dataset.
#[derive(Debug, Clone)]
pub struct Catalog {
    normalized: DataFrame,
    by_genre: DataFrame,
    genres: Vec<String>,
}

impl Catalog {
    pub fn prepare(raw: &DataFrame) -> Result<Self> {
        let started = Instant::now();
        let normalized = normalize(raw)?;
        let by_genre = explode_list_column(&normalized, GENRE_NAME)?;
        let genres = genre_candidates(&by_genre)?;
        log::debug!(
            "prepared catalog: {} movies, {} genre rows, {} genres in {:?}",
            normalized.height(),
            by_genre.height(),
            genres.len(),
            started.elapsed()
        );
        Ok(Self {
            normalized,
            by_genre,
            genres,
        })
    }

    /// Sorted distinct genre names across the whole dataset.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn movie_count(&self) -> usize {
        self.normalized.height()
    }

    /// Recompute every aggregate for `selection`. An unknown genre gives an empty view.
    pub fn view(
        &self,
        selection: &GenreSelection,
        options: &DashboardOptions,
    ) -> Result<DashboardView> {
        let started = Instant::now();
        let active = apply_genre_filter(&self.by_genre, selection)?;
        let movies = match selection {
            GenreSelection::All => self.normalized.clone(),
            GenreSelection::Genre(_) => active.clone(),
        };

        let metrics = Metrics {
            movies: aggregate::movie_count(&movies),
            rows: active.height(),
            budget_sum: aggregate::budget_sum(&movies)?,
            mean_rating: aggregate::mean_rating(&movies)?,
        };
        let yearly = yearly_counts(&movies)?;
        let peak = peak_year(&yearly);
        let ratings = rating_histogram(&movies, options.rating_bins)?;
        let budget_revenue = budget_revenue_points(&movies, options.chart_row_limit)?;
        let languages = top_languages(&movies, options.top_n)?;
        let top_language_movies = restrict_to_languages(&movies, &languages)?.height();
        let companies = top_companies(&movies, options.top_n)?;

        log::debug!(
            "view for {}: {} movies, {} rows in {:?}",
            selection,
            metrics.movies,
            metrics.rows,
            started.elapsed()
        );

        Ok(DashboardView {
            selection: selection.clone(),
            active,
            movies,
            metrics,
            yearly,
            peak_year: peak,
            ratings,
            budget_revenue,
            languages,
            top_language_movies,
            companies,
            preview_rows: options.preview_rows,
        })
    }
}

/// Short narrative sentences about the view, in display order.
pub fn insights(view: &DashboardView) -> Vec<String> {
    let mut out = Vec::new();
    if view.is_empty() {
        out.push(format!("No movies match {}.", view.selection));
        return out;
    }

    if let Some(peak) = view.peak_year {
        let dated: usize = view.yearly.iter().map(|y| y.count).sum();
        out.push(format!(
            "Releases peaked in {} with {} of {} dated movies.",
            peak.year, peak.count, dated
        ));
    }

    if let Some(mean) = view.metrics.mean_rating {
        let busiest = view
            .ratings
            .iter()
            .fold(None, |best: Option<&RatingBin>, bin| match best {
                Some(b) if b.count >= bin.count => Some(b),
                _ => Some(bin),
            })
            .filter(|bin| bin.count > 0);
        match busiest {
            Some(bin) => out.push(format!(
                "Average rating is {:.2}; most ratings fall between {:.1} and {:.1}.",
                mean, bin.start, bin.end
            )),
            None => out.push(format!("Average rating is {:.2}.", mean)),
        }
    }

    if let Some(top) = view.languages.first() {
        let share = top.count as f64 / view.metrics.movies as f64 * 100.0;
        out.push(format!(
            "'{}' is the most common original language ({:.1}% of movies).",
            top.name, share
        ));
    }

    if view.languages.len() > 1 {
        let share = view.top_language_movies as f64 / view.metrics.movies as f64 * 100.0;
        out.push(format!(
            "The top {} languages account for {:.1}% of movies.",
            view.languages.len(),
            share
        ));
    }

    if let Some(top) = view.companies.first() {
        out.push(format!(
            "{} is the most frequent production company with {} movies.",
            top.name, top.count
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> DataFrame {
        df!(
            "title" => &["R1", "R2", "R3"],
            "budget" => &[Some(0i64), Some(1_000_000), None],
            "revenue" => &[Some(10i64), Some(5_000_000), Some(7)],
            "vote_average" => &[Some(5.0), Some(7.0), None],
            "release_date" => &[Some("1999-03-31"), Some("1999-12-01"), Some("2004-06-15")],
            "original_language" => &["en", "en", "fr"],
            "genres" => &[
                "[{'id': 28, 'name': 'Action'}, {'id': 35, 'name': 'Comedy'}]",
                "[{'id': 28, 'name': 'Action'}]",
                "[]",
            ],
            "production_companies" => &[
                "[{'id': 1, 'name': 'Warner Bros.'}]",
                "[{'id': 1, 'name': 'Warner Bros.'}, {'id': 2, 'name': 'Canal+'}]",
                "",
            ]
        )
        .unwrap()
    }

    fn view(selection: GenreSelection) -> DashboardView {
        Catalog::prepare(&raw())
            .unwrap()
            .view(&selection, &DashboardOptions::default())
            .unwrap()
    }

    #[test]
    fn all_counts_movies_not_genre_rows() {
        let v = view(GenreSelection::All);
        assert_eq!(v.metrics.movies, 3);
        assert_eq!(v.metrics.rows, 4);
        assert_eq!(v.metrics.budget_sum, 1_000_000.0);
        assert_eq!(v.metrics.mean_rating, Some(6.0));
    }

    #[test]
    fn candidates_cover_whole_dataset() {
        let catalog = Catalog::prepare(&raw()).unwrap();
        assert_eq!(catalog.genres(), ["Action", "Comedy"]);
        assert_eq!(catalog.movie_count(), 3);
    }

    #[test]
    fn genre_selection_narrows() {
        let action = view(GenreSelection::Genre("Action".into()));
        assert_eq!(action.metrics.movies, 2);
        assert_eq!(action.metrics.rows, 2);

        let comedy = view(GenreSelection::Genre("Comedy".into()));
        assert_eq!(comedy.metrics.movies, 1);
        assert_eq!(comedy.metrics.budget_sum, 0.0);
    }

    #[test]
    fn yearly_and_peak() {
        let v = view(GenreSelection::All);
        assert_eq!(
            v.yearly,
            vec![
                YearCount { year: 1999, count: 2 },
                YearCount { year: 2004, count: 1 }
            ]
        );
        assert_eq!(v.peak_year, Some(YearCount { year: 1999, count: 2 }));
    }

    #[test]
    fn tops_use_movie_table() {
        let v = view(GenreSelection::All);
        assert_eq!(v.languages[0].name, "en");
        assert_eq!(v.languages[0].count, 2);
        assert_eq!(v.companies[0].name, "Warner Bros.");
        assert_eq!(v.companies[0].count, 2);
        assert_eq!(v.companies.len(), 2);
        assert_eq!(v.top_language_movies, 3);

        let narrow = DashboardOptions {
            top_n: 1,
            ..DashboardOptions::default()
        };
        let v = Catalog::prepare(&raw())
            .unwrap()
            .view(&GenreSelection::All, &narrow)
            .unwrap();
        assert_eq!(v.top_language_movies, 2);
    }

    #[test]
    fn repeated_genre_counts_movie_once() {
        let raw = df!(
            "title" => &["Twice"],
            "budget" => &[Some(10i64)],
            "revenue" => &[Some(20i64)],
            "vote_average" => &[Some(6.0)],
            "release_date" => &[Some("2000-05-01")],
            "original_language" => &["en"],
            "genres" => &["[{'id': 28, 'name': 'Action'}, {'id': 28, 'name': 'Action'}]"],
            "production_companies" => &["[]"]
        )
        .unwrap();
        let v = Catalog::prepare(&raw)
            .unwrap()
            .view(
                &GenreSelection::Genre("Action".into()),
                &DashboardOptions::default(),
            )
            .unwrap();
        assert_eq!(v.metrics.movies, 1);
        assert_eq!(v.metrics.budget_sum, 10.0);
        assert_eq!(v.yearly, vec![YearCount { year: 2000, count: 1 }]);
    }

    #[test]
    fn unknown_genre_is_empty_view() {
        let v = view(GenreSelection::Genre("Western".into()));
        assert!(v.is_empty());
        assert_eq!(v.metrics.budget_sum, 0.0);
        assert_eq!(v.metrics.mean_rating, None);
        assert!(v.yearly.is_empty());
        assert!(v.peak_year.is_none());
        assert!(v.languages.is_empty());
        assert!(v.companies.is_empty());
        assert_eq!(insights(&v), vec!["No movies match Western.".to_string()]);
    }

    #[test]
    fn preview_is_capped() {
        let options = DashboardOptions {
            preview_rows: 2,
            ..DashboardOptions::default()
        };
        let v = Catalog::prepare(&raw())
            .unwrap()
            .view(&GenreSelection::All, &options)
            .unwrap();
        let preview = v.preview().unwrap();
        assert_eq!(preview.height(), 2);
        assert_eq!(preview.get_column_names()[0].as_str(), "title");
    }

    #[test]
    fn insights_mention_peak_and_language() {
        let lines = insights(&view(GenreSelection::All));
        assert!(lines[0].contains("1999"), "{:?}", lines);
        assert!(lines.iter().any(|l| l.contains("'en'")), "{:?}", lines);
        assert!(lines.iter().any(|l| l.contains("Warner Bros.")), "{:?}", lines);
    }
}
