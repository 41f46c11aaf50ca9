// src/app/tmdb.rs — TMDB v3 client (discover + movie details)
use std::time::Duration;

use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use super::filters::{current_year, Filters, MAX_RATING, MIN_RATING, MIN_YEAR};

/// The discover endpoint always serves pages of 20; there is no "has more"
/// flag worth trusting, exhaustion is inferred from a short page.
pub const PAGE_SIZE: usize = 20;

const API_BASE: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

// ---- static genre table ----
// The discover endpoint speaks genre ids; share links and the UI speak names.
pub const GENRES: [(u32, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|(gid, _)| *gid == id).map(|(_, name)| *name)
}

pub fn genre_id(name: &str) -> Option<u32> {
    GENRES.iter().find(|(_, n)| *n == name).map(|(id, _)| *id)
}

/// Resolve raw ids to display names: unknown ids are dropped (the API may
/// grow genres we don't know about), result sorted by name.
pub fn genre_names(ids: &[u32]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = ids.iter().filter_map(|&id| genre_name(id)).collect();
    names.sort_unstable();
    names.dedup();
    names
}

// ---- wire types ----

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Movie {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
}

impl Movie {
    pub fn year(&self) -> Option<i32> {
        super::utils::release_year(&self.release_date)
    }
    pub fn genre_names(&self) -> Vec<&'static str> {
        genre_names(&self.genre_ids)
    }
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    results: Vec<Movie>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenreTag {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductionCompany {
    pub name: String,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    pub name: String,
}

/// Superset of `Movie` served by `/movie/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieDetails {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub genres: Vec<GenreTag>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl MovieDetails {
    pub fn year(&self) -> Option<i32> {
        super::utils::release_year(&self.release_date)
    }
}

/// `poster_path` from the API ("/abc.jpg") → full CDN URL at a given width.
pub fn poster_image_url(poster_path: &str, size: &str) -> String {
    format!("{IMAGE_BASE}/{size}{poster_path}")
}

/// Query parameters for one discover page. Fields at their defaults are
/// omitted; year bounds expand to the first/last day of the bounding years.
pub fn discover_params(page: u32, filters: &Filters) -> Vec<(String, String)> {
    let mut params = vec![("page".to_string(), page.to_string())];

    if filters.min_year > MIN_YEAR {
        params.push((
            "primary_release_date.gte".to_string(),
            format!("{}-01-01", filters.min_year),
        ));
    }
    if filters.max_year < current_year() {
        params.push((
            "primary_release_date.lte".to_string(),
            format!("{}-12-31", filters.max_year),
        ));
    }
    if filters.min_rating > MIN_RATING {
        params.push(("vote_average.gte".to_string(), filters.min_rating.to_string()));
    }
    if filters.max_rating < MAX_RATING {
        params.push(("vote_average.lte".to_string(), filters.max_rating.to_string()));
    }
    if !filters.genres.is_empty() {
        params.push(("with_genres".to_string(), filters.genres.iter().join(",")));
    }

    params
}

// ---- client ----

pub struct TmdbClient {
    client: reqwest::blocking::Client,
    token: String,
    language: Option<String>,
    base_url: String,
}

impl TmdbClient {
    /// One shared client for the whole session (connection pooling, keep-alive).
    pub fn new(token: String, language: Option<String>) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tmdx/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| format!("http client build: {e}"))?;

        Ok(Self {
            client,
            token,
            language,
            base_url: API_BASE.to_string(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, String> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .map_err(|e| format!("GET {url}: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {} for {url}", resp.status()));
        }
        resp.json::<T>().map_err(|e| format!("decode {url}: {e}"))
    }

    /// One page of `/discover/movie` under the given filters.
    pub fn discover_movies(&self, page: u32, filters: &Filters) -> Result<Vec<Movie>, String> {
        let mut params = discover_params(page, filters);
        if let Some(lang) = &self.language {
            params.push(("language".to_string(), lang.clone()));
        }
        let url = format!("{}/discover/movie", self.base_url);
        debug!("GET {url} page={page}");
        let resp: DiscoverResponse = self.get_json(&url, &params)?;
        Ok(resp.results)
    }

    pub fn movie_details(&self, id: u32) -> Result<MovieDetails, String> {
        let mut params = Vec::new();
        if let Some(lang) = &self.language {
            params.push(("language".to_string(), lang.clone()));
        }
        let url = format!("{}/movie/{id}", self.base_url);
        debug!("GET {url}");
        self.get_json(&url, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_map(params: &[(String, String)]) -> std::collections::HashMap<String, String> {
        params.iter().cloned().collect()
    }

    #[test]
    fn default_filters_send_only_the_page() {
        let params = discover_params(3, &Filters::default());
        assert_eq!(params, vec![("page".to_string(), "3".to_string())]);
    }

    #[test]
    fn year_bounds_expand_to_calendar_edges() {
        let filters = Filters {
            min_year: 1995,
            max_year: 2012,
            ..Filters::default()
        };
        let map = params_map(&discover_params(1, &filters));
        assert_eq!(
            map.get("primary_release_date.gte").map(String::as_str),
            Some("1995-01-01")
        );
        assert_eq!(
            map.get("primary_release_date.lte").map(String::as_str),
            Some("2012-12-31")
        );
    }

    #[test]
    fn rating_and_genres_encode_when_non_default() {
        let filters = Filters {
            min_rating: 6.5,
            genres: [18, 28].into_iter().collect(),
            ..Filters::default()
        };
        let map = params_map(&discover_params(1, &filters));
        assert_eq!(map.get("vote_average.gte").map(String::as_str), Some("6.5"));
        assert!(map.get("vote_average.lte").is_none());
        assert_eq!(map.get("with_genres").map(String::as_str), Some("18,28"));
    }

    #[test]
    fn unknown_genre_ids_resolve_to_nothing() {
        assert_eq!(genre_names(&[878, 424242, 18]), vec!["Drama", "Science Fiction"]);
        assert_eq!(genre_name(424242), None);
    }

    #[test]
    fn genre_table_round_trips() {
        for (id, name) in GENRES {
            assert_eq!(genre_id(name), Some(id));
            assert_eq!(genre_name(id), Some(name));
        }
    }

    #[test]
    fn summary_year_comes_from_release_date() {
        let movie = Movie {
            release_date: "1999-03-31".to_string(),
            ..Movie::default()
        };
        assert_eq!(movie.year(), Some(1999));
        assert_eq!(Movie::default().year(), None);
    }
}
