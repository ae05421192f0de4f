//! Summaries over the movies the user has watched.

use std::{cmp::Ordering, collections::HashMap};

use crate::model::{movie::MovieRecord, table::MovieTable};

pub const TOP_RATED_LIMIT: usize = 10;

/// People need at least this many watched movies to be listed.
pub const MIN_MOVIES_PER_PERSON: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct PersonTally<'a> {
    pub name: String,
    pub movies: Vec<&'a MovieRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchStats<'a> {
    pub watched_count: usize,
    pub highest_rated: Option<&'a MovieRecord>,
    pub top_rated: Vec<&'a MovieRecord>,
    pub top_directors: Vec<PersonTally<'a>>,
    pub top_actors: Vec<PersonTally<'a>>,
    /// Most frequent first, ties in order of first appearance.
    pub genre_counts: Vec<(String, usize)>,
}

impl<'a> WatchStats<'a> {
    pub fn compute(table: &'a MovieTable) -> WatchStats<'a> {
        let by_rating = watched_by_rating(table);

        let highest_rated = by_rating.first().copied().filter(|m| m.rating.is_some());
        let top_rated = by_rating.iter().take(TOP_RATED_LIMIT).copied().collect();

        let watched = watched_in_table_order(table);
        let top_directors = tally(&watched, |m| {
            Some(m.director.as_str())
                .filter(|d| !d.is_empty())
                .into_iter()
                .collect()
        });
        let top_actors = tally(&watched, |m| m.actor_list());
        let genre_counts = count_in_order(watched.iter().flat_map(|m| m.genre_list()));

        WatchStats {
            watched_count: by_rating.len(),
            highest_rated,
            top_rated,
            top_directors,
            top_actors,
            genre_counts,
        }
    }

    pub fn most_common_genre(&self) -> Option<(&str, usize)> {
        self.genre_counts
            .first()
            .map(|(genre, count)| (genre.as_str(), *count))
    }
}

/// Watched movies, highest rating first. Unrated ones go last and equal
/// ratings keep table order.
pub fn watched_by_rating(table: &MovieTable) -> Vec<&MovieRecord> {
    let mut watched: Vec<&MovieRecord> = table.movies().iter().filter(|m| m.watched).collect();
    watched.sort_by(|a, b| match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    watched
}

fn watched_in_table_order(table: &MovieTable) -> Vec<&MovieRecord> {
    table.movies().iter().filter(|m| m.watched).collect()
}

fn tally<'a, F>(movies: &[&'a MovieRecord], names_of: F) -> Vec<PersonTally<'a>>
where
    F: Fn(&'a MovieRecord) -> Vec<&'a str>,
{
    let mut tallies: Vec<PersonTally<'a>> = vec![];
    let mut index: HashMap<&str, usize> = HashMap::new();

    for &movie in movies {
        for name in names_of(movie) {
            let slot = *index.entry(name).or_insert_with(|| {
                tallies.push(PersonTally {
                    name: name.to_string(),
                    movies: vec![],
                });
                tallies.len() - 1
            });
            tallies[slot].movies.push(movie);
        }
    }

    tallies.retain(|t| t.movies.len() >= MIN_MOVIES_PER_PERSON);
    tallies.sort_by(|a, b| b.movies.len().cmp(&a.movies.len()));
    tallies
}

fn count_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = vec![];
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match index.get(item) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Distinct values offered by the list filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub genres: Vec<String>,
}

impl Facets {
    pub fn collect(table: &MovieTable) -> Facets {
        let movies = table.movies();
        Facets {
            actors: sorted_unique(movies.iter().flat_map(|m| m.actor_list())),
            directors: sorted_unique(
                movies
                    .iter()
                    .map(|m| m.director.as_str())
                    .filter(|d| !d.is_empty()),
            ),
            genres: sorted_unique(movies.iter().flat_map(|m| m.genre_list())),
        }
    }
}

fn sorted_unique<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut values: Vec<String> = items.map(|s| s.to_string()).collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rating::RatingRange;
    use std::path::Path;

    const WATCHED_CSV: &str = "\
Title,Director,Actors,Genres,Watched,Rating
Alien,Ridley Scott,\"Sigourney Weaver, Tom Skerritt\",\"Horror, Sci-Fi\",True,9
Aliens,James Cameron,\"Sigourney Weaver, Michael Biehn\",\"Action, Sci-Fi\",True,8.5
Gladiator,Ridley Scott,Russell Crowe,\"Action, Drama\",True,
Titanic,James Cameron,Kate Winslet,\"Drama, Romance\",False,7
The Terminator,James Cameron,\"Michael Biehn, Linda Hamilton\",\"Action, Sci-Fi\",True,9
";

    fn table() -> MovieTable {
        MovieTable::load(
            WATCHED_CSV.as_bytes(),
            Path::new("stats.csv"),
            RatingRange::default(),
        )
        .unwrap()
    }

    fn titles(movies: &[&MovieRecord]) -> Vec<String> {
        movies.iter().map(|m| m.title.clone()).collect()
    }

    #[test]
    fn watched_movies_are_ordered_by_rating() {
        let table = table();
        assert_eq!(
            titles(&watched_by_rating(&table)),
            vec!["Alien", "The Terminator", "Aliens", "Gladiator"]
        );
    }

    #[test]
    fn computes_watch_summary() {
        let table = table();
        let stats = WatchStats::compute(&table);

        assert_eq!(stats.watched_count, 4);
        assert_eq!(stats.highest_rated.unwrap().title, "Alien");
        assert_eq!(stats.top_rated.len(), 4);

        let directors: Vec<(&str, Vec<String>)> = stats
            .top_directors
            .iter()
            .map(|t| (t.name.as_str(), titles(&t.movies)))
            .collect();
        assert_eq!(
            directors,
            vec![
                ("Ridley Scott", vec!["Alien".to_string(), "Gladiator".to_string()]),
                ("James Cameron", vec!["Aliens".to_string(), "The Terminator".to_string()]),
            ]
        );

        let actors: Vec<&str> = stats.top_actors.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(actors, vec!["Sigourney Weaver", "Michael Biehn"]);

        assert_eq!(stats.most_common_genre(), Some(("Sci-Fi", 3)));
    }

    #[test]
    fn nothing_watched_gives_empty_summary() {
        let table = MovieTable::load(
            "Title,Watched\nAlien,False\n".as_bytes(),
            Path::new("stats.csv"),
            RatingRange::default(),
        )
        .unwrap();
        let stats = WatchStats::compute(&table);

        assert_eq!(stats.watched_count, 0);
        assert!(stats.highest_rated.is_none());
        assert!(stats.top_directors.is_empty());
        assert_eq!(stats.most_common_genre(), None);
    }

    #[test]
    fn facets_are_sorted_and_unique() {
        let facets = Facets::collect(&table());

        assert_eq!(facets.directors, vec!["James Cameron", "Ridley Scott"]);
        assert_eq!(
            facets.genres,
            vec!["Action", "Drama", "Horror", "Romance", "Sci-Fi"]
        );
        assert!(facets.actors.contains(&"Kate Winslet".to_string()));
        assert_eq!(
            facets.actors.iter().filter(|a| *a == "Michael Biehn").count(),
            1
        );
    }
}
