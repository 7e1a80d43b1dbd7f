use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{MarqueeError, Result};
use crate::source::CatalogSource;
use crate::types::{Category, Movie, MovieId, Page};

#[derive(Debug)]
pub struct Tmdb {
    client: Client,
    base_url: String,
    image_base_url: String,
    web_url: String,
    language: String,
    api_key: String,
}

impl Tmdb {
    pub fn new(api: &ApiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| MarqueeError::Api(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            image_base_url: api.image_base_url.clone(),
            web_url: api.web_url.trim_end_matches('/').to_string(),
            language: api.language.clone(),
            api_key,
        })
    }

    fn listing_url(&self, category: Category, page: u32) -> String {
        format!(
            "{}/movie/{}?api_key={}&language={}&page={}",
            self.base_url,
            category.as_api_str(),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language),
            page
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| MarqueeError::Api(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MarqueeError::Api(format!(
                "HTTP error! Status: {}: {}",
                status,
                status_message(&text)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MarqueeError::Api(e.without_url().to_string()))
    }
}

/// TMDB error bodies carry a `status_message`; fall back to the raw text.
fn status_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct TmError {
        status_message: String,
    }

    serde_json::from_str::<TmError>(body)
        .map(|e| e.status_message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// TMDB API response types

#[derive(Deserialize)]
struct TmListing {
    page: u32,
    #[serde(default)]
    results: Vec<TmMovie>,
    total_pages: u32,
}

#[derive(Deserialize)]
struct TmMovie {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u32>,
}

fn parse_release_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl From<TmMovie> for Movie {
    fn from(m: TmMovie) -> Self {
        Movie {
            id: MovieId(m.id),
            title: m.title.or(m.original_title).unwrap_or_default(),
            overview: m.overview.unwrap_or_default(),
            poster_path: m.poster_path.filter(|p| !p.is_empty()),
            release_date: parse_release_date(m.release_date.as_deref()),
            vote_average: m.vote_average.unwrap_or(0.0),
            vote_count: m.vote_count.unwrap_or(0),
        }
    }
}

impl From<TmListing> for Page<Movie> {
    fn from(listing: TmListing) -> Self {
        Page {
            items: listing.results.into_iter().map(Movie::from).collect(),
            page: listing.page,
            total_pages: listing.total_pages,
        }
    }
}

#[async_trait]
impl CatalogSource for Tmdb {
    fn name(&self) -> &str {
        "TMDB"
    }

    fn web_url(&self, movie: &Movie) -> String {
        format!("{}/movie/{}", self.web_url, movie.id)
    }

    fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    async fn fetch_page(&self, category: Category, page: u32) -> Result<Page<Movie>> {
        let url = self.listing_url(category, page);
        tracing::debug!(category = category.as_api_str(), page, "fetching listing");
        let listing: TmListing = self.get_json(&url).await?;
        Ok(listing.into())
    }
}
