// src/app/details.rs — session-lifetime movie details cache
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, warn};

use super::tmdb::{MovieDetails, TmdbClient};

/// Cache slot per movie id. An explicit sum type, not a magic value: a slot
/// is either still in flight, permanently known-bad, or resolved.
pub enum DetailEntry {
    Loading,
    Invalid,
    Ready(Box<MovieDetails>),
}

struct DetailOutcome {
    id: u32,
    result: Result<MovieDetails, String>,
}

/// Lazily-filled, never-evicted cache of `/movie/{id}` lookups. One fetch per
/// id per session; `Loading → final` is the only in-place transition.
pub struct DetailsCache {
    entries: HashMap<u32, DetailEntry>,
    tx: Sender<DetailOutcome>,
    rx: Receiver<DetailOutcome>,
}

impl Default for DetailsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailsCache {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn get(&self, id: u32) -> Option<&DetailEntry> {
        self.entries.get(&id)
    }

    /// True while any of the given ids is still in flight. The favorites view
    /// keeps its loading indicator up until the whole batch settles.
    pub fn any_loading<'a>(&self, ids: impl IntoIterator<Item = &'a u32>) -> bool {
        ids.into_iter()
            .any(|id| matches!(self.entries.get(id), Some(DetailEntry::Loading)))
    }

    /// Claim the fetch slot for `id`. False means an entry already exists
    /// (resolved, failed, or in flight) and the caller must not fetch again —
    /// this is what collapses rapid duplicate requests into one.
    fn begin(&mut self, id: u32) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        if id == 0 {
            // never a valid movie id; skip the network round-trip
            self.entries.insert(id, DetailEntry::Invalid);
            return false;
        }
        self.entries.insert(id, DetailEntry::Loading);
        true
    }

    pub fn fetch(&mut self, client: &Arc<TmdbClient>, id: u32) {
        if !self.begin(id) {
            return;
        }
        debug!("fetching details for movie {id}");

        let tx = self.tx.clone();
        let client = Arc::clone(client);
        std::thread::spawn(move || {
            let result = client.movie_details(id);
            let _ = tx.send(DetailOutcome { id, result });
        });
    }

    /// Kick independent fetches for a whole id batch (favorites view). Each
    /// id succeeds or fails on its own; one bad id never blocks the rest.
    pub fn fetch_many(&mut self, client: &Arc<TmdbClient>, ids: impl IntoIterator<Item = u32>) {
        for id in ids {
            self.fetch(client, id);
        }
    }

    /// Drain fetch completions. Returns true when any entry settled.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    fn apply(&mut self, outcome: DetailOutcome) -> bool {
        let entry = match outcome.result {
            Ok(details) => DetailEntry::Ready(Box::new(details)),
            Err(e) => {
                warn!("details fetch for movie {} failed: {e}", outcome.id);
                DetailEntry::Invalid
            }
        };

        // only a Loading slot may settle; a resolved value is write-once
        match self.entries.get(&outcome.id) {
            Some(DetailEntry::Loading) | None => {
                self.entries.insert(outcome.id, entry);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: u32) -> MovieDetails {
        MovieDetails {
            id,
            title: format!("movie {id}"),
            ..MovieDetails::default()
        }
    }

    fn ok(id: u32) -> DetailOutcome {
        DetailOutcome {
            id,
            result: Ok(details(id)),
        }
    }

    fn err(id: u32) -> DetailOutcome {
        DetailOutcome {
            id,
            result: Err("HTTP 404".into()),
        }
    }

    #[test]
    fn second_request_for_same_id_is_a_no_op() {
        let mut cache = DetailsCache::new();
        assert!(cache.begin(7));
        // a second caller arrives before the first fetch resolves
        assert!(!cache.begin(7));
        assert!(matches!(cache.get(7), Some(DetailEntry::Loading)));

        cache.apply(ok(7));
        assert!(matches!(cache.get(7), Some(DetailEntry::Ready(d)) if d.id == 7));
        // and still a no-op once resolved
        assert!(!cache.begin(7));
    }

    #[test]
    fn failure_marks_only_that_id() {
        let mut cache = DetailsCache::new();
        assert!(cache.begin(999_999));
        assert!(cache.begin(123));

        cache.apply(err(999_999));
        cache.apply(ok(123));

        assert!(matches!(cache.get(999_999), Some(DetailEntry::Invalid)));
        assert!(matches!(cache.get(123), Some(DetailEntry::Ready(_))));
    }

    #[test]
    fn zero_id_short_circuits_without_a_fetch() {
        let mut cache = DetailsCache::new();
        assert!(!cache.begin(0));
        assert!(matches!(cache.get(0), Some(DetailEntry::Invalid)));
    }

    #[test]
    fn settled_entries_are_write_once() {
        let mut cache = DetailsCache::new();
        cache.begin(5);
        cache.apply(err(5));
        // a late duplicate outcome must not flip the stored value
        assert!(!cache.apply(ok(5)));
        assert!(matches!(cache.get(5), Some(DetailEntry::Invalid)));
    }

    #[test]
    fn any_loading_tracks_the_batch_barrier() {
        let mut cache = DetailsCache::new();
        let ids = [1u32, 2, 3];
        for id in ids {
            cache.begin(id);
        }
        assert!(cache.any_loading(ids.iter()));

        cache.apply(ok(1));
        cache.apply(err(2));
        assert!(cache.any_loading(ids.iter()));

        cache.apply(ok(3));
        assert!(!cache.any_loading(ids.iter()));
    }

    #[test]
    fn misses_report_none() {
        let cache = DetailsCache::new();
        assert!(cache.get(42).is_none());
    }
}
