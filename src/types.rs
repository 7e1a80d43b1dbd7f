use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Something that can live in a [`crate::fetcher::Catalog`] and be filtered by title.
pub trait CatalogItem {
    type Id: Eq + Hash + Clone + fmt::Debug;

    fn id(&self) -> Self::Id;
    fn title(&self) -> &str;
}

/// Listing served by the remote catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    NowPlaying,
    Popular,
    Upcoming,
    TopRated,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NowPlaying,
        Category::Popular,
        Category::Upcoming,
        Category::TopRated,
    ];

    pub fn as_api_str(&self) -> &'static str {
        match self {
            Category::NowPlaying => "now_playing",
            Category::Popular => "popular",
            Category::Upcoming => "upcoming",
            Category::TopRated => "top_rated",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Category {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Category {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::NowPlaying => write!(f, "Now Playing"),
            Category::Popular => write!(f, "Popular"),
            Category::Upcoming => write!(f, "Upcoming"),
            Category::TopRated => write!(f, "Top Rated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: f64,
    pub vote_count: u32,
}

impl Movie {
    /// Full poster URL, if the movie has a poster at all.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
    }

    pub fn release_label(&self) -> String {
        self.release_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn rating_label(&self) -> String {
        format!("{:.1}/10 ({} votes)", self.vote_average, self.vote_count)
    }
}

impl CatalogItem for Movie {
    type Id = MovieId;

    fn id(&self) -> MovieId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// One batch of items returned by a single listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}

#[cfg(test)]
pub(crate) fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id: MovieId(id),
        title: title.to_string(),
        overview: String::new(),
        poster_path: None,
        release_date: None,
        vote_average: 0.0,
        vote_count: 0,
    }
}
