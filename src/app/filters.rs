// src/app/filters.rs — filter criteria + shareable query-parameter sync
use std::borrow::Cow;
use std::collections::BTreeSet;

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;

use super::tmdb::{genre_id, genre_name};

pub const MIN_YEAR: i32 = 1990;
pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 10.0;

static CURRENT_YEAR: Lazy<i32> = Lazy::new(|| Local::now().year());

/// Upper bound of the year range, fixed per run.
pub fn current_year() -> i32 {
    *CURRENT_YEAR
}

/// User-selected constraints narrowing which movies are fetched. Replaced
/// wholesale on every change, never mutated in place by consumers.
///
/// Genres are kept as an ordered id set: duplicates collapse and equality is
/// insensitive to the order the user picked them in.
#[derive(Clone, Debug, PartialEq)]
pub struct Filters {
    pub min_year: i32,
    pub max_year: i32,
    pub min_rating: f32,
    pub max_rating: f32,
    pub genres: BTreeSet<u32>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            min_year: MIN_YEAR,
            max_year: current_year(),
            min_rating: MIN_RATING,
            max_rating: MAX_RATING,
            genres: BTreeSet::new(),
        }
    }
}

impl Filters {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Field-wise equality with set semantics on genres.
    pub fn same(&self, other: &Self) -> bool {
        self == other
    }

    /// Clamp every bound into its valid range and un-invert min/max pairs.
    /// Decoded and widget-edited filters go through here before use.
    pub fn normalized(mut self) -> Self {
        self.min_year = self.min_year.clamp(MIN_YEAR, current_year());
        self.max_year = self.max_year.clamp(MIN_YEAR, current_year());
        if self.min_year > self.max_year {
            std::mem::swap(&mut self.min_year, &mut self.max_year);
        }
        self.min_rating = self.min_rating.clamp(MIN_RATING, MAX_RATING);
        self.max_rating = self.max_rating.clamp(MIN_RATING, MAX_RATING);
        if self.min_rating > self.max_rating {
            std::mem::swap(&mut self.min_rating, &mut self.max_rating);
        }
        self
    }

    /// Encode into shareable query parameters. Fields at their default are
    /// omitted so links stay minimal; default filters encode to "".
    ///
    /// Genres travel as names, not raw ids, so links survive id churn.
    pub fn encode(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.min_year > MIN_YEAR {
            parts.push(format!("year_min={}", self.min_year));
        }
        if self.max_year < current_year() {
            parts.push(format!("year_max={}", self.max_year));
        }
        if self.min_rating > MIN_RATING {
            parts.push(format!("rating_min={}", self.min_rating));
        }
        if self.max_rating < MAX_RATING {
            parts.push(format!("rating_max={}", self.max_rating));
        }

        let mut names: Vec<&str> = self.genres.iter().filter_map(|&id| genre_name(id)).collect();
        names.sort_unstable();
        if !names.is_empty() {
            parts.push(format!("genres={}", urlencoding::encode(&names.join(","))));
        }

        parts.join("&")
    }

    /// Decode a query-parameter string (or a full pasted URL). Never fails:
    /// unknown keys and garbled genre tokens are dropped, out-of-range
    /// numbers clamp, unparseable values keep their defaults.
    pub fn decode(query: &str) -> Self {
        // Accept a whole link; everything before the last '?' is noise.
        let query = match query.rfind('?') {
            Some(pos) => &query[pos + 1..],
            None => query,
        };

        let mut filters = Self::default();
        for pair in query.trim().split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let value: Cow<'_, str> = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
            let value = value.trim();

            match key {
                "year_min" => {
                    if let Ok(n) = value.parse::<i32>() {
                        filters.min_year = n;
                    }
                }
                "year_max" => {
                    if let Ok(n) = value.parse::<i32>() {
                        filters.max_year = n;
                    }
                }
                "rating_min" => {
                    if let Ok(n) = value.parse::<f32>() {
                        filters.min_rating = n;
                    }
                }
                "rating_max" => {
                    if let Ok(n) = value.parse::<f32>() {
                        filters.max_rating = n;
                    }
                }
                "genres" => {
                    filters.genres = value
                        .split(',')
                        .filter_map(|name| genre_id(name.trim()))
                        .collect();
                }
                _ => {}
            }
        }

        filters.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_genres(ids: &[u32]) -> Filters {
        Filters {
            genres: ids.iter().copied().collect(),
            ..Filters::default()
        }
    }

    #[test]
    fn equality_ignores_genre_order_and_duplicates() {
        let a = with_genres(&[18, 28, 878]);
        let b = with_genres(&[878, 28, 18, 28]);
        assert!(a.same(&b));
        assert!(b.same(&a));
        assert!(a.same(&a));
        assert!(!a.same(&with_genres(&[18])));
    }

    #[test]
    fn defaults_encode_to_nothing_and_back() {
        assert_eq!(Filters::default().encode(), "");
        assert_eq!(Filters::decode(""), Filters::default());
    }

    #[test]
    fn encode_omits_default_fields() {
        let filters = Filters {
            min_year: 1995,
            min_rating: 6.5,
            ..Filters::default()
        };
        assert_eq!(filters.encode(), "year_min=1995&rating_min=6.5");
    }

    #[test]
    fn round_trip_preserves_non_default_filters() {
        let filters = Filters {
            min_year: 2001,
            max_year: 2015,
            min_rating: 5.5,
            max_rating: 9.0,
            genres: [27, 53].into_iter().collect(),
        };
        let encoded = filters.encode();
        assert_eq!(Filters::decode(&encoded), filters);
        // encode(decode(p)) reproduces an equivalent parameter set
        assert_eq!(Filters::decode(&encoded).encode(), encoded);
    }

    #[test]
    fn genre_names_encode_url_safely() {
        let filters = with_genres(&[878]);
        assert_eq!(filters.encode(), "genres=Science%20Fiction");
        assert_eq!(Filters::decode("genres=Science%20Fiction"), filters);
    }

    #[test]
    fn decode_accepts_a_full_link() {
        let decoded = Filters::decode("https://example.com/discover?year_min=2000&genres=Drama");
        assert_eq!(decoded.min_year, 2000);
        assert_eq!(decoded.genres, [18].into_iter().collect());
    }

    #[test]
    fn decode_drops_unknown_genres_silently() {
        let decoded = Filters::decode("genres=Drama,Telenovela,,Action");
        assert_eq!(decoded.genres, [18, 28].into_iter().collect());
    }

    #[test]
    fn decode_clamps_out_of_range_bounds() {
        let decoded = Filters::decode("year_min=1200&year_max=9999&rating_min=-3&rating_max=42");
        assert_eq!(decoded.min_year, MIN_YEAR);
        assert_eq!(decoded.max_year, current_year());
        assert_eq!(decoded.min_rating, MIN_RATING);
        assert_eq!(decoded.max_rating, MAX_RATING);
    }

    #[test]
    fn decode_tolerates_garbage_values() {
        let decoded = Filters::decode("year_min=soon&rating_max=ten&bogus&=x");
        assert_eq!(decoded, Filters::default());
    }

    #[test]
    fn inverted_ranges_are_swapped() {
        let decoded = Filters::decode("year_min=2010&year_max=2000");
        assert_eq!((decoded.min_year, decoded.max_year), (2000, 2010));
    }
}
