// src/app/poster.rs — poster download pool + texture store
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui::{self as eg, TextureHandle};
use tracing::{debug, warn};

use super::cache::{download_and_store_poster, find_cached_poster, url_to_cache_key};
use super::gfx;
use super::types::PosterState;

pub(crate) const RESIZE_MAX_W: u32 = 342;
pub(crate) const RESIZE_QUALITY: u8 = 80;

// (url, cache key, already-cached path)
type WorkItem = (String, String, Option<PathBuf>);

struct PosterDone {
    url: String,
    result: Result<PathBuf, String>,
}

struct PosterSlot {
    path: Option<PathBuf>,
    tex: Option<TextureHandle>,
    state: PosterState,
}

/// One slot per poster URL, shared by every view that shows the artwork.
/// Downloads run on a small worker pool; textures upload lazily on the UI
/// thread with a per-frame budget.
pub(crate) struct PosterStore {
    slots: HashMap<String, PosterSlot>,
    work_tx: Option<Sender<WorkItem>>,
    done_rx: Option<Receiver<PosterDone>>,
    disabled: bool,
}

impl PosterStore {
    pub fn new() -> Self {
        // Allow opting out instead of opting in.
        let disabled = std::env::var_os("TMDX_DISABLE_PREFETCH").is_some();
        Self {
            slots: HashMap::new(),
            work_tx: None,
            done_rx: None,
            disabled,
        }
    }

    /// Spin up the download pool once. Safe to call again; later calls are
    /// no-ops (a changed worker-count pref applies on next launch).
    pub fn start_workers(&mut self, worker_count: usize) {
        if self.work_tx.is_some() || self.disabled {
            return;
        }

        let (work_tx, work_rx) = mpsc::channel::<WorkItem>();
        let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));

        // One shared HTTP client.
        let client = match reqwest::blocking::Client::builder()
            .user_agent("tmdx/poster")
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
        {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("poster http client build failed: {e}; posters disabled");
                self.disabled = true;
                return;
            }
        };

        for _ in 0..worker_count.clamp(1, 32) {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);

            std::thread::spawn(move || loop {
                let job = {
                    let rx = work_rx.lock().unwrap();
                    rx.recv()
                };
                let (url, key, cached_path) = match job {
                    Ok(t) => t,
                    Err(_) => break,
                };

                let result = cached_path.map_or_else(
                    || download_and_store_poster(&client, &url, &key, RESIZE_MAX_W, RESIZE_QUALITY),
                    Ok,
                );
                let _ = done_tx.send(PosterDone { url, result });
            });
        }

        self.work_tx = Some(work_tx);
        self.done_rx = Some(done_rx);
        debug!("poster workers started");
    }

    /// Make sure a slot exists for `url`, queueing a download if the file
    /// isn't on disk yet. Known URLs are a no-op.
    pub fn request(&mut self, url: &str) {
        if self.slots.contains_key(url) {
            return;
        }

        let key = url_to_cache_key(url);
        let path = find_cached_poster(&key);
        let state = if path.is_some() {
            PosterState::Cached
        } else if self.disabled || self.work_tx.is_none() {
            PosterState::Failed
        } else {
            PosterState::Pending
        };

        if state == PosterState::Pending {
            if let Some(tx) = &self.work_tx {
                let _ = tx.send((url.to_string(), key, None));
            }
        }

        self.slots.insert(
            url.to_string(),
            PosterSlot {
                path,
                tex: None,
                state,
            },
        );
    }

    /// Drain up to `max` download completions. Returns how many were applied.
    pub fn poll(&mut self, max: usize) -> usize {
        let mut drained = 0usize;
        while drained < max {
            let Some(rx) = &self.done_rx else { break };
            match rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    if let Some(slot) = self.slots.get_mut(&msg.url) {
                        match msg.result {
                            Ok(path) => {
                                slot.path = Some(path);
                                slot.state = PosterState::Cached; // uploaded lazily during paint
                            }
                            Err(e) => {
                                slot.state = PosterState::Failed;
                                debug!("poster download failed: {e}");
                            }
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    /// Texture for `url`, uploading from disk if the budget allows.
    pub fn texture(
        &mut self,
        ctx: &eg::Context,
        url: &str,
        uploads_left: &mut usize,
    ) -> Option<&TextureHandle> {
        let slot = self.slots.get_mut(url)?;

        if slot.tex.is_none() && *uploads_left > 0 && !matches!(slot.state, PosterState::Failed) {
            if let Some(path) = slot.path.clone() {
                match gfx::load_texture_from_path(ctx, &path, url) {
                    Ok(tex) => {
                        slot.tex = Some(tex);
                        slot.state = PosterState::Ready;
                        *uploads_left -= 1;
                    }
                    Err(e) => {
                        debug!("poster upload failed for {url}: {e}");
                        slot.state = PosterState::Failed;
                    }
                }
            }
        }

        self.slots.get(url).and_then(|s| s.tex.as_ref())
    }
}
