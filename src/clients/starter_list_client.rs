use std::{io::Write, path::Path};

use reqwest::{header, Client};
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};

use crate::{
    error::{Result, TrackerError},
    model::{rating::RatingRange, table::MovieTable},
    persisters::csv_writer::write_atomically,
};

/// Downloads the starter movie list a new user begins from.
#[derive(Debug, Clone)]
pub struct StarterListClient {
    client: Client,
}

impl StarterListClient {
    pub fn new() -> Result<Self> {
        let user_agent = header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TrackerError::Fetch {
                url: String::new(),
                reason: format!("could not build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Fetches `url` and stores it at `destination`.
    ///
    /// The download has to load as a movie list before anything is written,
    /// and an existing file is only replaced when `overwrite` is set.
    pub async fn download_to(
        &self,
        url: &str,
        destination: &Path,
        overwrite: bool,
        range: RatingRange,
    ) -> Result<usize> {
        if destination.exists() && !overwrite {
            return Err(TrackerError::Validation(format!(
                "{} already exists, pass --force to replace it",
                destination.display()
            )));
        }

        let body = self.get_text_from_url(url).await?;
        save_starter_list(&body, url, destination, range)
    }

    pub async fn get_text_from_url(&self, url: &str) -> Result<String> {
        let retry_strategy = ExponentialBackoff::from_millis(10).map(jitter).take(5);
        Retry::spawn(retry_strategy, || async move {
            self.get_text_from_url_no_retry(url).await
        })
        .await
        .map_err(|reason| TrackerError::Fetch {
            url: url.to_string(),
            reason,
        })
    }

    async fn get_text_from_url_no_retry(&self, url: &str) -> std::result::Result<String, String> {
        log::debug!("Requesting {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("server answered {}", resp.status()));
        }

        resp.text()
            .await
            .map_err(|e| format!("could not read response body: {}", e))
    }
}

/// Checks that `body` is a usable movie list, then writes it to
/// `destination`. Returns the number of movies in it.
pub fn save_starter_list(
    body: &str,
    url: &str,
    destination: &Path,
    range: RatingRange,
) -> Result<usize> {
    let table = MovieTable::load(body.as_bytes(), Path::new(url), range)?;

    write_atomically(destination, |file| {
        file.write_all(body.as_bytes())
            .map_err(|e| TrackerError::io(destination, e))
    })?;

    log::info!(
        "Saved starter list with {} movies to {}",
        table.len(),
        destination.display()
    );
    Ok(table.len())
}
