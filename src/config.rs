use std::{env, path::PathBuf, str::FromStr};

use crate::{
    error::{Result, TrackerError},
    matchers::title_matcher::{TitleMatcher, DEFAULT_THRESHOLD},
    model::rating::RatingRange,
};

pub const DEFAULT_CSV_PATH: &str = "my_movie_ratings.csv";

/// The "1001 Movies to Watch Before You Die" starter list.
pub const DEFAULT_STARTER_URL: &str = "https://raw.githubusercontent.com/VWithun/1001_Movies_To_Watch_Moive_Ratings_And_Movie_Picker/main/my_movie_ratings.csv";

pub const CSV_PATH_VAR: &str = "MOVIE_TRACKER_CSV";
pub const RATING_MIN_VAR: &str = "MOVIE_TRACKER_RATING_MIN";
pub const RATING_MAX_VAR: &str = "MOVIE_TRACKER_RATING_MAX";
pub const SEARCH_THRESHOLD_VAR: &str = "MOVIE_TRACKER_SEARCH_THRESHOLD";
pub const STARTER_URL_VAR: &str = "MOVIE_TRACKER_STARTER_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub csv_path: PathBuf,
    pub rating_range: RatingRange,
    pub matcher: TitleMatcher,
    pub starter_url: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            rating_range: RatingRange::default(),
            matcher: TitleMatcher::default(),
            starter_url: DEFAULT_STARTER_URL.to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Result<TrackerConfig> {
        TrackerConfig::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup, starting from the
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<TrackerConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TrackerConfig::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let csv_path = get(CSV_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.csv_path);

        let rating_range = RatingRange::new(
            parse_var(RATING_MIN_VAR, get(RATING_MIN_VAR))?.unwrap_or(defaults.rating_range.min),
            parse_var(RATING_MAX_VAR, get(RATING_MAX_VAR))?.unwrap_or(defaults.rating_range.max),
        )?;

        let matcher = TitleMatcher::new(
            parse_var(SEARCH_THRESHOLD_VAR, get(SEARCH_THRESHOLD_VAR))?
                .unwrap_or(DEFAULT_THRESHOLD),
        )?;

        let starter_url = get(STARTER_URL_VAR).unwrap_or(defaults.starter_url);

        Ok(TrackerConfig {
            csv_path,
            rating_range,
            matcher,
            starter_url,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| TrackerError::Config(format!("{} has invalid value '{}'", name, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<TrackerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrackerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        assert_eq!(config_from(&[]).unwrap(), TrackerConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            (CSV_PATH_VAR, "/tmp/movies.csv"),
            (RATING_MIN_VAR, "1"),
            (RATING_MAX_VAR, "5"),
            (SEARCH_THRESHOLD_VAR, "0.9"),
        ])
        .unwrap();

        assert_eq!(config.csv_path, PathBuf::from("/tmp/movies.csv"));
        assert_eq!(config.rating_range, RatingRange { min: 1.0, max: 5.0 });
        assert_eq!(config.matcher.threshold(), 0.9);
        assert_eq!(config.starter_url, DEFAULT_STARTER_URL);
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config = config_from(&[(CSV_PATH_VAR, "  ")]).unwrap();
        assert_eq!(config.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(matches!(
            config_from(&[(RATING_MAX_VAR, "ten")]),
            Err(TrackerError::Config(_))
        ));
        assert!(matches!(
            config_from(&[(RATING_MIN_VAR, "10"), (RATING_MAX_VAR, "1")]),
            Err(TrackerError::Config(_))
        ));
        assert!(matches!(
            config_from(&[(SEARCH_THRESHOLD_VAR, "2")]),
            Err(TrackerError::Config(_))
        ));
    }
}
