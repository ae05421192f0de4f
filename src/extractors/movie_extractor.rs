use csv::StringRecord;

use crate::model::{
    movie::{parse_watched, Edits, MovieRecord},
    rating::RatingRange,
    schema::{Column, Schema},
};

#[derive(Debug)]
pub struct MovieExtractor {}

impl MovieExtractor {
    /// Builds a record from one CSV row, or `None` when the row has no title
    /// (blank trailing lines of spreadsheet exports look like `,,,`).
    ///
    /// Cells that cannot be read degrade to their default value with a
    /// warning.
    pub fn extract_movie_from_row(
        row: &StringRecord,
        row_num: usize,
        schema: &Schema,
        range: &RatingRange,
    ) -> Option<MovieRecord> {
        let title = MovieExtractor::cell(row, schema, Column::Title).trim();
        if title.is_empty() {
            log::warn!(
                "Skipping line {} without a title",
                row.position().map_or(0, |p| p.line())
            );
            return None;
        }

        Some(MovieRecord {
            row: row_num,
            title: title.to_string(),
            year: MovieExtractor::extract_year(row, schema, title),
            genres: MovieExtractor::text(row, schema, Column::Genres),
            actors: MovieExtractor::text(row, schema, Column::Actors),
            director: MovieExtractor::text(row, schema, Column::Director),
            plot: MovieExtractor::text(row, schema, Column::Plot),
            poster_url: MovieExtractor::link(row, schema, Column::PosterUrl),
            info_url: MovieExtractor::link(row, schema, Column::InfoUrl),
            watched: MovieExtractor::extract_watched(row, schema, title),
            rating: MovieExtractor::extract_rating(row, schema, range, title),
            raw: row.clone(),
            edits: Edits::default(),
        })
    }

    fn cell<'a>(row: &'a StringRecord, schema: &Schema, column: Column) -> &'a str {
        schema
            .position(column)
            .and_then(|idx| row.get(idx))
            .unwrap_or("")
    }

    fn text(row: &StringRecord, schema: &Schema, column: Column) -> String {
        MovieExtractor::cell(row, schema, column).trim().to_string()
    }

    fn link(row: &StringRecord, schema: &Schema, column: Column) -> Option<String> {
        Some(MovieExtractor::text(row, schema, column)).filter(|s| !s.is_empty())
    }

    fn extract_year(row: &StringRecord, schema: &Schema, title: &str) -> Option<i32> {
        let cell = MovieExtractor::cell(row, schema, Column::Year).trim();
        if cell.is_empty() {
            return None;
        }

        // Spreadsheet exports write years as "1999.0" when the column has gaps.
        let year = cell.parse::<i32>().ok().or_else(|| {
            cell.parse::<f64>()
                .ok()
                .filter(|y| y.is_finite() && y.fract() == 0.0)
                .map(|y| y as i32)
        });

        if year.is_none() {
            log::warn!("Ignoring unreadable year '{}' for '{}'", cell, title);
        }
        year
    }

    fn extract_watched(row: &StringRecord, schema: &Schema, title: &str) -> bool {
        let cell = MovieExtractor::cell(row, schema, Column::Watched);
        parse_watched(cell).unwrap_or_else(|| {
            log::warn!(
                "Ignoring unreadable watched flag '{}' for '{}'",
                cell.trim(),
                title
            );
            false
        })
    }

    fn extract_rating(
        row: &StringRecord,
        schema: &Schema,
        range: &RatingRange,
        title: &str,
    ) -> Option<f32> {
        let cell = MovieExtractor::cell(row, schema, Column::Rating).trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
            return None;
        }

        match cell.parse::<f32>() {
            Ok(rating) if range.contains(rating) => Some(rating),
            Ok(rating) => {
                log::warn!(
                    "Ignoring rating {} for '{}': outside {}..={}",
                    rating,
                    title,
                    range.min,
                    range.max
                );
                None
            }
            Err(_) => {
                log::warn!("Ignoring unreadable rating '{}' for '{}'", cell, title);
                None
            }
        }
    }
}
