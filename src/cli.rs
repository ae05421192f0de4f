use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::model::table::{MovieQuery, WatchedFilter};

/// Keep track of the movies you watched and how much you liked them.
#[derive(Debug, Parser)]
#[command(name = "movie-tracker", version, about)]
pub struct Cli {
    /// Movie list to work on (defaults to $MOVIE_TRACKER_CSV or my_movie_ratings.csv)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// More log output, repeat for even more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List movies, optionally searching and filtering
    List {
        /// Fuzzy title search
        #[arg(short, long)]
        search: Option<String>,

        /// all, watched or unwatched
        #[arg(long, default_value = "all")]
        status: WatchedFilter,

        /// Only movies featuring this actor
        #[arg(long)]
        actor: Option<String>,

        /// Only movies by this director
        #[arg(long)]
        director: Option<String>,

        /// Only movies in this genre
        #[arg(long)]
        genre: Option<String>,
    },

    /// Show everything known about one movie
    Show {
        /// Title, or row number as N or #N
        movie: String,
    },

    /// Rate a movie and save the list
    Rate {
        /// Title, or row number as N or #N
        movie: String,

        /// Rating, for example 7.5
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Mark a movie as watched and save the list
    Watch {
        /// Title, or row number as N or #N
        movie: String,

        /// Mark it as not watched instead
        #[arg(long)]
        unwatched: bool,
    },

    /// Statistics about the movies you watched
    Stats,

    /// Every actor, director and genre in the list
    Facets,

    /// Save a copy of the list somewhere else
    Export { destination: PathBuf },

    /// Download the 1001 movies starter list
    FetchStarter {
        /// Where to download from (defaults to $MOVIE_TRACKER_STARTER_URL)
        #[arg(long)]
        url: Option<String>,

        /// Replace the movie list if it already exists
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    /// The list filters of a `list` invocation.
    pub fn movie_query(&self) -> Option<MovieQuery> {
        match self {
            Command::List {
                search,
                status,
                actor,
                director,
                genre,
            } => Some(MovieQuery {
                search: search.clone(),
                status: *status,
                actor: actor.clone(),
                director: director.clone(),
                genre: genre.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_filters() {
        let cli = Cli::parse_from([
            "movie-tracker",
            "--file",
            "movies.csv",
            "list",
            "--search",
            "dune",
            "--status",
            "watched",
        ]);

        assert_eq!(cli.file, Some(PathBuf::from("movies.csv")));
        let query = cli.command.movie_query().unwrap();
        assert_eq!(query.search.as_deref(), Some("dune"));
        assert_eq!(query.status, WatchedFilter::Watched);
        assert_eq!(query.genre, None);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["movie-tracker", "list", "--status", "seen"]).is_err());
    }

    #[test]
    fn parses_rate() {
        let cli = Cli::parse_from(["movie-tracker", "-vv", "rate", "Dune", "8"]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Rate { movie, value } => {
                assert_eq!(movie, "Dune");
                assert_eq!(value, "8");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
