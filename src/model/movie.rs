use csv::StringRecord;

use crate::model::schema::{Column, Schema};

#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub row: usize,
    pub title: String,
    pub year: Option<i32>,
    pub genres: String,
    pub actors: String,
    pub director: String,
    pub plot: String,
    pub poster_url: Option<String>,
    pub info_url: Option<String>,
    pub watched: bool,
    pub rating: Option<f32>,
    pub(crate) raw: StringRecord,
    pub(crate) edits: Edits,
}

/// Fields changed since the row was last read from or written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Edits {
    pub watched: bool,
    pub rating: bool,
}

impl MovieRecord {
    /// Genres split on the `, ` separator used by the movie list.
    pub fn genre_list(&self) -> Vec<&str> {
        split_list(&self.genres)
    }

    pub fn actor_list(&self) -> Vec<&str> {
        split_list(&self.actors)
    }

    /// Cells for this record in the layout of `schema`.
    ///
    /// Untouched cells are copied from the source row as they were read, so
    /// a table that was never edited writes back exactly what it loaded.
    /// Cells past the end of the header are kept as well.
    pub fn to_csv_row(&self, schema: &Schema) -> StringRecord {
        let mut cells = padded_cells(&self.raw, schema.len());

        if self.edits.watched {
            if let Some(idx) = schema.position(Column::Watched) {
                cells[idx] = format_watched(self.watched);
            }
        }
        if self.edits.rating {
            if let Some(idx) = schema.position(Column::Rating) {
                cells[idx] = format_rating(self.rating);
            }
        }

        StringRecord::from(cells)
    }
}

pub fn format_watched(watched: bool) -> String {
    let text = if watched { "True" } else { "False" };
    text.to_string()
}

pub fn format_rating(rating: Option<f32>) -> String {
    rating.map(|r| r.to_string()).unwrap_or_default()
}

/// Reads a `Watched` cell. `None` means the text is not a boolean at all.
pub fn parse_watched(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Some(false),
        "true" | "1" | "yes" => Some(true),
        _ => None,
    }
}

/// Cells of `raw`, padded with empty ones up to `width`. Never truncates.
pub(crate) fn padded_cells(raw: &StringRecord, width: usize) -> Vec<String> {
    let mut cells: Vec<String> = raw.iter().map(|c| c.to_string()).collect();
    if cells.len() < width {
        cells.resize(width, String::new());
    }
    cells
}

fn split_list(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw: Vec<&str>) -> MovieRecord {
        MovieRecord {
            row: 0,
            title: "Dune".to_string(),
            year: None,
            genres: "Action, Adventure, Drama".to_string(),
            actors: "Timothée Chalamet,Rebecca Ferguson".to_string(),
            director: String::new(),
            plot: String::new(),
            poster_url: None,
            info_url: None,
            watched: false,
            rating: None,
            raw: StringRecord::from(raw),
            edits: Edits::default(),
        }
    }

    #[test]
    fn watched_cells_are_case_insensitive() {
        assert_eq!(parse_watched("True"), Some(true));
        assert_eq!(parse_watched("TRUE"), Some(true));
        assert_eq!(parse_watched(" false "), Some(false));
        assert_eq!(parse_watched(""), Some(false));
        assert_eq!(parse_watched("maybe"), None);
    }

    #[test]
    fn ratings_use_shortest_decimal_form() {
        assert_eq!(format_rating(Some(8.0)), "8");
        assert_eq!(format_rating(Some(7.5)), "7.5");
        assert_eq!(format_rating(None), "");
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let movie = record(vec!["Dune"]);
        assert_eq!(movie.genre_list(), vec!["Action", "Adventure", "Drama"]);
        assert_eq!(
            movie.actor_list(),
            vec!["Timothée Chalamet", "Rebecca Ferguson"]
        );
    }

    #[test]
    fn untouched_rows_are_written_verbatim() {
        let schema =
            Schema::from_headers(&StringRecord::from(vec!["Title", "Watched", "Rating"])).unwrap();
        let movie = record(vec!["Dune", "false", "8.0"]);

        assert_eq!(
            movie.to_csv_row(&schema),
            StringRecord::from(vec!["Dune", "false", "8.0"])
        );
    }

    #[test]
    fn edited_cells_are_reformatted() {
        let schema =
            Schema::from_headers(&StringRecord::from(vec!["Title", "Watched", "Rating"])).unwrap();
        let mut movie = record(vec!["Dune", "false", ""]);
        movie.rating = Some(8.0);
        movie.edits.rating = true;

        assert_eq!(
            movie.to_csv_row(&schema),
            StringRecord::from(vec!["Dune", "false", "8"])
        );
    }

    #[test]
    fn cells_past_the_header_are_kept() {
        let schema = Schema::from_headers(&StringRecord::from(vec!["Title", "Rating"])).unwrap();
        let mut movie = record(vec!["Dune", "", "extra note"]);
        assert_eq!(
            movie.to_csv_row(&schema),
            StringRecord::from(vec!["Dune", "", "extra note"])
        );

        movie.rating = Some(7.0);
        movie.edits.rating = true;
        assert_eq!(
            movie.to_csv_row(&schema),
            StringRecord::from(vec!["Dune", "7", "extra note"])
        );
    }

    #[test]
    fn short_rows_are_padded_to_the_header() {
        let schema =
            Schema::from_headers(&StringRecord::from(vec!["Title", "Year", "Plot"])).unwrap();
        let movie = record(vec!["Dune"]);

        assert_eq!(
            movie.to_csv_row(&schema),
            StringRecord::from(vec!["Dune", "", ""])
        );
    }
}
