use std::path::PathBuf;

pub mod cli;
use cli::{Cli, Command};

mod clients;
pub use clients::starter_list_client::StarterListClient;

pub mod config;
use config::TrackerConfig;

pub mod display;
pub mod error;
pub use error::{Result, TrackerError};

mod extractors;
pub mod logging;

pub mod matchers;
pub use matchers::title_matcher::TitleMatcher;

pub mod model;
pub use model::{
    movie::MovieRecord,
    rating::RatingRange,
    table::{MovieQuery, MovieTable, TableState, WatchedFilter},
};

mod persisters;
pub mod stats;

/// Runs one command line invocation and returns what should be printed.
pub async fn run(cli: Cli, config: TrackerConfig) -> Result<String> {
    let path = cli.file.clone().unwrap_or_else(|| config.csv_path.clone());

    if let Command::FetchStarter { url, force } = &cli.command {
        return fetch_starter(url.as_deref(), *force, &path, &config).await;
    }

    let mut session = Session::open(path, config)?;
    session.execute(&cli.command)
}

async fn fetch_starter(
    url: Option<&str>,
    force: bool,
    path: &std::path::Path,
    config: &TrackerConfig,
) -> Result<String> {
    let url = url.unwrap_or(config.starter_url.as_str());
    let client = StarterListClient::new()?;
    let count = client
        .download_to(url, path, force, config.rating_range)
        .await?;
    Ok(format!(
        "Downloaded {} movies to {}\n",
        count,
        path.display()
    ))
}

/// One user's working copy of a movie list.
pub struct Session {
    path: PathBuf,
    config: TrackerConfig,
    table: MovieTable,
}

impl Session {
    pub fn open(path: PathBuf, config: TrackerConfig) -> Result<Session> {
        if !path.exists() {
            log::warn!(
                "{} does not exist yet, run `movie-tracker fetch-starter` to download the starter list",
                path.display()
            );
        }
        let table = MovieTable::load_from_path(&path, config.rating_range)?;
        Ok(Session {
            path,
            config,
            table,
        })
    }

    pub fn table(&self) -> &MovieTable {
        &self.table
    }

    /// Replaces the current table with a freshly loaded file.
    pub fn reload(&mut self, path: PathBuf) -> Result<()> {
        if self.table.is_dirty() {
            log::warn!(
                "Discarding unsaved changes to {}",
                self.path.display()
            );
        }
        self.table = MovieTable::load_from_path(&path, self.config.rating_range)?;
        self.path = path;
        Ok(())
    }

    pub fn execute(&mut self, command: &Command) -> Result<String> {
        match command {
            Command::List { .. } => {
                let query = command.movie_query().unwrap_or_default();
                let movies = self.table.query(&query, &self.config.matcher);
                Ok(display::movie_list(&movies))
            }
            Command::Show { movie } => {
                let movie = self.table.find(movie)?;
                Ok(display::movie_details(movie))
            }
            Command::Rate { movie, value } => {
                let row = self.table.find(movie)?.row;
                let rating = self.table.rating_range().parse_input(value)?;
                self.table.set_rating(row, rating)?;
                self.save()?;
                Ok(format!("Rated '{}' {}\n", self.title(row), rating))
            }
            Command::Watch { movie, unwatched } => {
                let row = self.table.find(movie)?.row;
                self.table.set_watched(row, !unwatched)?;
                self.save()?;
                let status = if *unwatched { "not watched" } else { "watched" };
                Ok(format!("Marked '{}' as {}\n", self.title(row), status))
            }
            Command::Stats => {
                let stats = stats::WatchStats::compute(&self.table);
                Ok(display::watch_stats(&stats))
            }
            Command::Facets => Ok(display::facets(&stats::Facets::collect(&self.table))),
            Command::Export { destination } => {
                let written = self.table.export(destination)?;
                Ok(format!(
                    "Saved a copy of {} movies to {}\n",
                    self.table.len(),
                    written.display()
                ))
            }
            Command::FetchStarter { .. } => Err(TrackerError::Validation(
                "the starter list is downloaded without opening a movie list".to_string(),
            )),
        }
    }

    pub fn save(&mut self) -> Result<()> {
        self.table.persist(&self.path)
    }

    fn title(&self, row: usize) -> &str {
        self.table.get(row).map(|m| m.title.as_str()).unwrap_or("")
    }
}
