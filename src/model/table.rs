use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use csv::{ReaderBuilder, StringRecord};

use crate::{
    error::{Result, TrackerError},
    extractors::movie_extractor::MovieExtractor,
    matchers::title_matcher::TitleMatcher,
    model::{
        movie::{padded_cells, MovieRecord},
        rating::RatingRange,
        schema::{Column, Schema},
    },
    persisters::csv_writer::CsvWriter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Loaded,
    /// Edited since the last load or save.
    Dirty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WatchedFilter {
    #[default]
    All,
    Watched,
    Unwatched,
}

impl WatchedFilter {
    pub fn accepts(&self, movie: &MovieRecord) -> bool {
        match self {
            WatchedFilter::All => true,
            WatchedFilter::Watched => movie.watched,
            WatchedFilter::Unwatched => !movie.watched,
        }
    }
}

impl FromStr for WatchedFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(WatchedFilter::All),
            "watched" => Ok(WatchedFilter::Watched),
            "unwatched" | "not-watched" | "not watched" => Ok(WatchedFilter::Unwatched),
            other => Err(format!(
                "unknown watched status '{}', expected all, watched or unwatched",
                other
            )),
        }
    }
}

/// Every criterion the list view can combine. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieQuery {
    pub search: Option<String>,
    pub status: WatchedFilter,
    /// Substring of the actors cell.
    pub actor: Option<String>,
    /// Exact director.
    pub director: Option<String>,
    /// One of the genres in the genres list.
    pub genre: Option<String>,
}

impl MovieQuery {
    fn accepts(&self, movie: &MovieRecord) -> bool {
        self.status.accepts(movie)
            && self
                .actor
                .as_deref()
                .map_or(true, |actor| movie.actors.contains(actor))
            && self
                .director
                .as_deref()
                .map_or(true, |director| movie.director == director)
            && self
                .genre
                .as_deref()
                .map_or(true, |genre| movie.genre_list().contains(&genre))
    }
}

/// One data line of the source file, in file order.
#[derive(Debug, Clone)]
enum Line {
    /// Index into `movies`.
    Movie(usize),
    /// A row with a blank title, written back as it was read.
    Untitled(StringRecord),
}

#[derive(Debug, Clone)]
pub struct MovieTable {
    schema: Schema,
    movies: Vec<MovieRecord>,
    lines: Vec<Line>,
    range: RatingRange,
    dirty: bool,
}

impl MovieTable {
    pub fn load<R: Read>(source: R, source_name: &Path, range: RatingRange) -> Result<MovieTable> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| TrackerError::from_csv(source_name, e))?
            .clone();
        let schema = Schema::from_headers(&headers)?;

        let mut movies = vec![];
        let mut lines = vec![];
        for row in reader.records() {
            let row = row.map_err(|e| TrackerError::from_csv(source_name, e))?;
            match MovieExtractor::extract_movie_from_row(&row, movies.len(), &schema, &range) {
                Some(movie) => {
                    log::debug!("Loaded row {}: {}", movie.row, movie.title);
                    lines.push(Line::Movie(movies.len()));
                    movies.push(movie);
                }
                None => lines.push(Line::Untitled(row)),
            }
        }

        log::info!(
            "Loaded {} movies from {}",
            movies.len(),
            source_name.display()
        );

        Ok(MovieTable {
            schema,
            movies,
            lines,
            range,
            dirty: false,
        })
    }

    pub fn load_from_path(path: &Path, range: RatingRange) -> Result<MovieTable> {
        let file = File::open(path).map_err(|e| TrackerError::io(path, e))?;
        MovieTable::load(file, path, range)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rating_range(&self) -> &RatingRange {
        &self.range
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&MovieRecord> {
        self.movies.get(row)
    }

    /// Looks a movie up by case-insensitive title, falling back to a row
    /// number written as `N` or `#N`. Titles are not unique, so the first one
    /// in the table wins.
    pub fn find(&self, key: &str) -> Result<&MovieRecord> {
        let key = key.trim();
        let lowered = key.to_lowercase();
        if let Some(movie) = self.movies.iter().find(|m| m.title.to_lowercase() == lowered) {
            return Ok(movie);
        }

        key.strip_prefix('#')
            .unwrap_or(key)
            .parse::<usize>()
            .ok()
            .and_then(|row| self.get(row))
            .ok_or_else(|| TrackerError::RecordNotFound(key.to_string()))
    }

    /// Movies whose title is close to `query`, best match first. Equal
    /// scores keep table order. A blank query returns the whole table.
    pub fn search(&self, query: &str, matcher: &TitleMatcher) -> Vec<&MovieRecord> {
        self.search_scored(query, matcher)
            .into_iter()
            .map(|(movie, _)| movie)
            .collect()
    }

    pub fn search_scored(&self, query: &str, matcher: &TitleMatcher) -> Vec<(&MovieRecord, f64)> {
        if query.trim().is_empty() {
            return self.movies.iter().map(|m| (m, 1.0)).collect();
        }

        let mut hits: Vec<(&MovieRecord, f64)> = self
            .movies
            .iter()
            .filter_map(|m| matcher.score(query, &m.title).map(|score| (m, score)))
            .collect();
        // Stable sort keeps table order among equal scores.
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits
    }

    pub fn filter(&self, status: WatchedFilter) -> Vec<&MovieRecord> {
        self.movies.iter().filter(|m| status.accepts(m)).collect()
    }

    /// Search combined with every other filter of `query`.
    pub fn query(&self, query: &MovieQuery, matcher: &TitleMatcher) -> Vec<&MovieRecord> {
        self.search(query.search.as_deref().unwrap_or(""), matcher)
            .into_iter()
            .filter(|m| query.accepts(m))
            .collect()
    }

    pub fn set_rating(&mut self, row: usize, value: f32) -> Result<()> {
        let value = self.range.validate(value)?;
        let movie = self.movie_mut(row)?;
        log::debug!("Rating '{}' {}", movie.title, value);
        movie.rating = Some(value);
        movie.edits.rating = true;
        self.dirty = true;
        Ok(())
    }

    pub fn set_watched(&mut self, row: usize, watched: bool) -> Result<()> {
        let movie = self.movie_mut(row)?;
        log::debug!("Marking '{}' watched={}", movie.title, watched);
        movie.watched = watched;
        movie.edits.watched = true;
        self.dirty = true;
        Ok(())
    }

    fn movie_mut(&mut self, row: usize) -> Result<&mut MovieRecord> {
        self.movies
            .get_mut(row)
            .ok_or_else(|| TrackerError::RecordNotFound(format!("row {}", row)))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> TableState {
        if self.dirty {
            TableState::Dirty
        } else {
            TableState::Loaded
        }
    }

    /// Overwrites `destination` with the whole table and marks it clean.
    ///
    /// On failure nothing changes: the table stays dirty with its edits.
    pub fn persist(&mut self, destination: &Path) -> Result<()> {
        let schema = self.output_schema();
        let rows = self.csv_rows(&schema);
        CsvWriter::save_rows_to_csv(&schema, &rows, destination)?;

        for (line, row) in self.lines.iter_mut().zip(rows) {
            match line {
                Line::Movie(idx) => {
                    let movie = &mut self.movies[*idx];
                    movie.raw = row;
                    movie.edits = Default::default();
                }
                Line::Untitled(raw) => *raw = row,
            }
        }
        self.schema = schema;
        self.dirty = false;

        log::info!(
            "Saved {} movies to {}",
            self.movies.len(),
            destination.display()
        );
        Ok(())
    }

    /// Writes a copy of the table elsewhere; the table stays dirty if it was.
    pub fn export(&self, destination: &Path) -> Result<PathBuf> {
        let schema = self.output_schema();
        CsvWriter::save_rows_to_csv(&schema, &self.csv_rows(&schema), destination)?;
        log::info!("Exported {} movies to {}", self.movies.len(), destination.display());
        Ok(destination.to_path_buf())
    }

    /// Columns to write. A file that had no Watched or Rating column gets one
    /// appended once some movie carries a value for it.
    fn output_schema(&self) -> Schema {
        let mut schema = self.schema.clone();
        let widest = self.widest_row();
        if !schema.has(Column::Watched) && self.movies.iter().any(|m| m.edits.watched && m.watched)
        {
            schema.append(Column::Watched, widest);
        }
        if !schema.has(Column::Rating)
            && self
                .movies
                .iter()
                .any(|m| m.edits.rating && m.rating.is_some())
        {
            schema.append(Column::Rating, widest);
        }
        schema
    }

    fn widest_row(&self) -> usize {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Movie(idx) => self.movies[*idx].raw.len(),
                Line::Untitled(raw) => raw.len(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Every data line in file order, laid out for `schema`.
    fn csv_rows(&self, schema: &Schema) -> Vec<StringRecord> {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Movie(idx) => self.movies[*idx].to_csv_row(schema),
                Line::Untitled(raw) => StringRecord::from(padded_cells(raw, schema.len())),
            })
            .collect()
    }
}
