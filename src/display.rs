use std::fmt::Write;

use crate::{
    model::movie::{format_rating, MovieRecord},
    stats::{Facets, PersonTally, WatchStats},
};

const TITLE_WIDTH: usize = 40;

pub fn movie_list(movies: &[&MovieRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Showing {} movies matching your search/filter criteria",
        movies.len()
    );
    if movies.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        "{:>5}  {:<width$}  {:>4}  {:>6}  {:<7}  {}",
        "#",
        "Title",
        "Year",
        "Rating",
        "Watched",
        "Director",
        width = TITLE_WIDTH
    );
    for movie in movies {
        let _ = writeln!(
            out,
            "{:>5}  {:<width$}  {:>4}  {:>6}  {:<7}  {}",
            movie.row,
            truncate(&movie.title, TITLE_WIDTH),
            movie.year.map(|y| y.to_string()).unwrap_or_default(),
            format_rating(movie.rating),
            if movie.watched { "yes" } else { "no" },
            movie.director,
            width = TITLE_WIDTH
        );
    }
    out
}

pub fn movie_details(movie: &MovieRecord) -> String {
    let mut out = String::new();
    match movie.year {
        Some(year) => {
            let _ = writeln!(out, "{} ({})", movie.title, year);
        }
        None => {
            let _ = writeln!(out, "{}", movie.title);
        }
    }

    let fields = [
        ("Row", movie.row.to_string()),
        ("Genres", movie.genres.clone()),
        ("Director", movie.director.clone()),
        ("Actors", movie.actors.clone()),
        ("Plot", movie.plot.clone()),
        ("Poster", movie.poster_url.clone().unwrap_or_default()),
        ("Info", movie.info_url.clone().unwrap_or_default()),
        (
            "Watched",
            if movie.watched { "yes" } else { "no" }.to_string(),
        ),
        (
            "Rating",
            movie
                .rating
                .map(|r| format!("{}/10", r))
                .unwrap_or_else(|| "not rated".to_string()),
        ),
    ];
    for (label, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        let _ = writeln!(out, "  {:<9}{}", format!("{}:", label), value);
    }
    out
}

pub fn watch_stats(stats: &WatchStats) -> String {
    let mut out = String::new();
    if stats.watched_count == 0 {
        out.push_str("No watched movies yet. Mark movies as watched to see your statistics!\n");
        return out;
    }

    let _ = writeln!(out, "Watched movies: {}", stats.watched_count);
    if let Some(best) = stats.highest_rated {
        let _ = writeln!(
            out,
            "Highest rated movie: {} ({}/10)",
            best.title,
            format_rating(best.rating)
        );
    }

    out.push_str("\nTop rated movies:\n");
    for (pos, movie) in stats.top_rated.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} - {}",
            pos + 1,
            movie.title,
            movie
                .rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| "not rated".to_string())
        );
    }

    people(&mut out, "Top directors", &stats.top_directors);
    people(&mut out, "Top actors", &stats.top_actors);

    if let Some((genre, count)) = stats.most_common_genre() {
        let _ = writeln!(out, "\nMost common genre: {} ({} movies)", genre, count);
        for (genre, count) in &stats.genre_counts {
            let _ = writeln!(out, "  {:<20}{}", genre, count);
        }
    }
    out
}

fn people(out: &mut String, heading: &str, tallies: &[PersonTally]) {
    if tallies.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{} (2 or more watched movies):", heading);
    for tally in tallies {
        let titles: Vec<&str> = tally.movies.iter().map(|m| m.title.as_str()).collect();
        let _ = writeln!(
            out,
            "  {} ({} movies): {}",
            tally.name,
            tally.movies.len(),
            titles.join(", ")
        );
    }
}

pub fn facets(facets: &Facets) -> String {
    let mut out = String::new();
    for (heading, values) in [
        ("Actors", &facets.actors),
        ("Directors", &facets.directors),
        ("Genres", &facets.genres),
    ] {
        let _ = writeln!(out, "{} ({}):", heading, values.len());
        for value in values {
            let _ = writeln!(out, "  {}", value);
        }
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{rating::RatingRange, table::MovieTable};
    use std::path::Path;

    fn table() -> MovieTable {
        MovieTable::load(
            "Title,Year,Director,Plot,Watched,Rating\n\
             Stalker,1979,Andrei Tarkovsky,A guide leads two men.,True,10\n\
             Solaris,,Andrei Tarkovsky,,False,\n"
                .as_bytes(),
            Path::new("display.csv"),
            RatingRange::default(),
        )
        .unwrap()
    }

    #[test]
    fn list_starts_with_a_count() {
        let table = table();
        let movies: Vec<&MovieRecord> = table.movies().iter().collect();
        let out = movie_list(&movies);

        assert!(out.starts_with("Showing 2 movies"));
        assert!(out.contains("Stalker"));
        assert!(out.contains("1979"));
    }

    #[test]
    fn details_skip_empty_fields() {
        let table = table();
        let out = movie_details(table.get(1).unwrap());

        assert!(out.starts_with("Solaris\n"));
        assert!(!out.contains("Plot:"));
        assert!(out.contains("not rated"));
    }

    #[test]
    fn details_show_rating_out_of_ten() {
        let table = table();
        let out = movie_details(table.get(0).unwrap());

        assert!(out.starts_with("Stalker (1979)\n"));
        assert!(out.contains("10/10"));
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate("Dr. Strangelove", 8), "Dr. S...");
        assert_eq!(truncate("Jaws", 8), "Jaws");
    }
}
