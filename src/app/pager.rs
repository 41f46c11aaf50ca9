// src/app/pager.rs — incremental page loading with stale-fetch suppression
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, warn};

use super::filters::Filters;
use super::tmdb::{Movie, TmdbClient, PAGE_SIZE};

/// Completion message from a page-fetch worker. The generation it captured
/// at start rides along so a fetch orphaned by a reset can be dropped.
struct PageOutcome {
    generation: u64,
    result: Result<Vec<Movie>, String>,
}

/// Owns the discover result list and its loading state machine.
///
/// Invariants:
/// - loaded movies preserve API order, appended page by page, never re-sorted
///   or deduplicated;
/// - at most one fetch is current; a result whose generation no longer
///   matches is discarded without touching any state;
/// - the error state is sticky until the next reset, there is no auto-retry.
pub struct MoviePager {
    movies: Vec<Movie>,
    next_page: u32,
    loading: bool,
    exhausted: bool,
    error: Option<String>,
    generation: u64,
    tx: Sender<PageOutcome>,
    rx: Receiver<PageOutcome>,
}

impl Default for MoviePager {
    fn default() -> Self {
        Self::new()
    }
}

impl MoviePager {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            movies: Vec::new(),
            next_page: 1,
            loading: false,
            exhausted: false,
            error: None,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_load_more(&self) -> bool {
        !self.loading && !self.exhausted && self.error.is_none()
    }

    /// Back to page one with clean flags. Bumping the generation here orphans
    /// any fetch still in flight.
    pub fn reset(&mut self) {
        self.movies.clear();
        self.next_page = 1;
        self.loading = false;
        self.exhausted = false;
        self.error = None;
        self.generation += 1;
    }

    pub fn reset_and_load(&mut self, client: &Arc<TmdbClient>, filters: &Filters) {
        self.reset();
        self.load_next_page(client, filters);
    }

    /// Claim the fetch slot. Returns the (generation, page) pair the worker
    /// must echo back, or None when no fetch may start right now.
    fn begin_fetch(&mut self) -> Option<(u64, u32)> {
        if !self.can_load_more() {
            return None;
        }
        self.loading = true;
        self.generation += 1;
        Some((self.generation, self.next_page))
    }

    pub fn load_next_page(&mut self, client: &Arc<TmdbClient>, filters: &Filters) {
        let Some((generation, page)) = self.begin_fetch() else {
            return;
        };
        debug!("fetching discover page {page} (generation {generation})");

        let tx = self.tx.clone();
        let client = Arc::clone(client);
        let filters = filters.clone();
        std::thread::spawn(move || {
            let result = client.discover_movies(page, &filters);
            let _ = tx.send(PageOutcome { generation, result });
        });
    }

    /// Drain completed fetches. Returns true when anything was applied.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    fn apply(&mut self, outcome: PageOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "dropping stale page result (generation {} != {})",
                outcome.generation, self.generation
            );
            return false;
        }

        match outcome.result {
            Ok(batch) => {
                if batch.len() < PAGE_SIZE {
                    self.exhausted = true;
                }
                if !batch.is_empty() {
                    self.next_page += 1;
                    self.movies.extend(batch);
                }
            }
            Err(e) => {
                warn!("discover page fetch failed: {e}");
                self.error = Some(e);
            }
        }
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(start_id: u32, len: usize) -> Vec<Movie> {
        (0..len as u32)
            .map(|i| Movie {
                id: start_id + i,
                title: format!("movie {}", start_id + i),
                ..Movie::default()
            })
            .collect()
    }

    fn outcome(generation: u64, result: Result<Vec<Movie>, String>) -> PageOutcome {
        PageOutcome { generation, result }
    }

    #[test]
    fn full_pages_keep_the_cursor_moving() {
        let mut pager = MoviePager::new();

        let (g1, p1) = pager.begin_fetch().unwrap();
        assert_eq!(p1, 1);
        assert!(pager.is_loading());
        assert!(pager.apply(outcome(g1, Ok(batch(0, PAGE_SIZE)))));

        assert_eq!(pager.movies().len(), 20);
        assert!(!pager.is_exhausted());
        assert!(!pager.is_loading());

        let (g2, p2) = pager.begin_fetch().unwrap();
        assert_eq!(p2, 2);
        assert!(g2 > g1);
        pager.apply(outcome(g2, Ok(batch(100, 5))));

        assert_eq!(pager.movies().len(), 25);
        assert!(pager.is_exhausted());
        // short page ends the session: no further fetch starts
        assert!(pager.begin_fetch().is_none());
    }

    #[test]
    fn empty_page_exhausts_without_advancing() {
        let mut pager = MoviePager::new();
        let (g, p) = pager.begin_fetch().unwrap();
        assert_eq!(p, 1);
        pager.apply(outcome(g, Ok(Vec::new())));

        assert!(pager.movies().is_empty());
        assert!(pager.is_exhausted());
        assert_eq!(pager.next_page, 1);
    }

    #[test]
    fn loading_blocks_a_second_fetch() {
        let mut pager = MoviePager::new();
        assert!(pager.begin_fetch().is_some());
        assert!(pager.begin_fetch().is_none());
    }

    #[test]
    fn reset_orphans_the_outstanding_fetch() {
        let mut pager = MoviePager::new();
        let (stale, _) = pager.begin_fetch().unwrap();
        pager.reset();

        // the stale worker finishes after the reset: nothing may change
        assert!(!pager.apply(outcome(stale, Ok(batch(0, PAGE_SIZE)))));
        assert!(pager.movies().is_empty());
        assert_eq!(pager.next_page, 1);
        assert!(!pager.is_loading());

        // the post-reset session is unaffected
        let (fresh, page) = pager.begin_fetch().unwrap();
        assert_eq!(page, 1);
        pager.apply(outcome(fresh, Ok(batch(0, PAGE_SIZE))));
        assert_eq!(pager.movies().len(), 20);
    }

    #[test]
    fn error_is_sticky_until_reset() {
        let mut pager = MoviePager::new();
        let (g, _) = pager.begin_fetch().unwrap();
        pager.apply(outcome(g, Err("HTTP 500".into())));

        assert_eq!(pager.error(), Some("HTTP 500"));
        assert!(!pager.is_loading());
        assert!(pager.begin_fetch().is_none());

        pager.reset();
        assert!(pager.error().is_none());
        assert!(pager.begin_fetch().is_some());
    }

    #[test]
    fn stale_error_does_not_poison_a_new_session() {
        let mut pager = MoviePager::new();
        let (stale, _) = pager.begin_fetch().unwrap();
        pager.reset();
        let (fresh, _) = pager.begin_fetch().unwrap();

        assert!(!pager.apply(outcome(stale, Err("timed out".into()))));
        assert!(pager.error().is_none());
        assert!(pager.is_loading());

        pager.apply(outcome(fresh, Ok(batch(0, 3))));
        assert_eq!(pager.movies().len(), 3);
        assert!(pager.is_exhausted());
    }

    #[test]
    fn order_is_append_only_across_pages() {
        let mut pager = MoviePager::new();
        let (g1, _) = pager.begin_fetch().unwrap();
        pager.apply(outcome(g1, Ok(batch(0, PAGE_SIZE))));
        let (g2, _) = pager.begin_fetch().unwrap();
        pager.apply(outcome(g2, Ok(batch(1000, PAGE_SIZE))));

        let ids: Vec<u32> = pager.movies().iter().map(|m| m.id).collect();
        let mut expected: Vec<u32> = (0..20).collect();
        expected.extend(1000..1020);
        assert_eq!(ids, expected);
    }
}
