// src/app/mod.rs — discover feed + favorites + detail panel over the TMDB API

// ---- Local modules ----
pub mod cache;
pub mod details;
pub mod favorites;
pub mod filters;
mod gfx;
pub mod pager;
mod poster;
mod prefs;
pub mod tmdb;
mod types;
mod ui;
mod utils;

pub use types::{PosterState, ThemePref, View};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui as eg;
use tracing::info;

use crate::config::load_config;
use details::DetailsCache;
use favorites::Favorites;
use filters::Filters;
use pager::MoviePager;
use poster::PosterStore;
use tmdb::TmdbClient;

// ---- Tunables ----
const MAX_POSTER_DONE_PER_FRAME: usize = 12;
const MAX_UPLOADS_PER_FRAME: usize = 4;
const SCROLL_FETCH_MARGIN: f32 = 600.0; // px from the bottom that triggers the next page
const DEFAULT_WORKERS: usize = 8;

pub struct TmdxApp {
    // core stores
    filters: Filters,
    pager: MoviePager,
    details: DetailsCache,
    favorites: Favorites,
    posters: PosterStore,
    client: Option<Arc<TmdbClient>>,
    client_err: Option<String>,
    poster_size: String,

    // view state
    view: View,
    selected: Option<u32>,
    pending_filters: Filters, // topbar widget state, committed by Apply
    show_genre_popup: bool,
    show_share_popup: bool,
    share_paste: String,
    favorites_primed: bool,

    // prefs
    theme_pref: ThemePref,
    poster_width_ui: f32,
    detail_panel_width: f32,
    worker_count_ui: usize,
    prefs_dirty: bool,
    prefs_last_write: Instant,

    // one-time init guard
    did_init: bool,
}

impl Default for TmdxApp {
    fn default() -> Self {
        Self {
            filters: Filters::default(),
            pager: MoviePager::new(),
            details: DetailsCache::new(),
            favorites: Favorites::load(PathBuf::new()), // replaced in init
            posters: PosterStore::new(),
            client: None,
            client_err: None,
            poster_size: crate::config::DEFAULT_POSTER_SIZE.to_string(),

            view: View::Discover,
            selected: None,
            pending_filters: Filters::default(),
            show_genre_popup: false,
            show_share_popup: false,
            share_paste: String::new(),
            favorites_primed: false,

            theme_pref: ThemePref::System,
            poster_width_ui: 150.0,
            detail_panel_width: 360.0,
            worker_count_ui: DEFAULT_WORKERS,
            prefs_dirty: false,
            prefs_last_write: Instant::now(),

            did_init: false,
        }
    }
}

// ---------- methods ----------
impl TmdxApp {
    /// One-shot startup: config, prefs (restores the persisted filter
    /// params), favorites, HTTP client, poster workers, first page.
    fn init(&mut self) {
        let cfg = load_config();
        self.poster_size = cfg.poster_size.clone();

        self.load_prefs();
        self.pending_filters = self.filters.clone();

        self.favorites = Favorites::load(cache::cache_dir().join("favorites.json"));
        info!("{} favorite(s) loaded", self.favorites.len());

        match cfg.tmdb_api_token.as_deref() {
            Some(token) if !token.trim().is_empty() => {
                match TmdbClient::new(token.trim().to_string(), cfg.language.clone()) {
                    Ok(client) => self.client = Some(Arc::new(client)),
                    Err(e) => self.client_err = Some(e),
                }
            }
            _ => {
                self.client_err =
                    Some("No TMDB API token configured (config.json or TMDX_API_TOKEN).".into())
            }
        }

        self.posters.start_workers(self.worker_count_ui);

        if let Some(client) = self.client.clone() {
            self.pager.reset_and_load(&client, &self.filters);
        }
    }

    /// Commit a filter change. Equal filters are a no-op; anything else
    /// replaces the criteria wholesale, re-encodes the share params, and
    /// restarts pagination from page one (orphaning any fetch in flight).
    pub(crate) fn apply_filters(&mut self, new: Filters) {
        let new = new.normalized();
        if new.same(&self.filters) {
            return;
        }
        self.filters = new;
        self.pending_filters = self.filters.clone();
        self.mark_dirty();
        if let Some(client) = self.client.clone() {
            self.pager.reset_and_load(&client, &self.filters);
        }
    }

    pub(crate) fn poster_url(&self, poster_path: &str) -> String {
        tmdb::poster_image_url(poster_path, &self.poster_size)
    }

    /// Queue artwork for everything the pager currently holds. `request` is
    /// a no-op for known URLs, so calling this after every applied page is
    /// cheap.
    fn queue_loaded_posters(&mut self) {
        let urls: Vec<String> = self
            .pager
            .movies()
            .iter()
            .filter_map(|m| m.poster_path.as_deref())
            .map(|p| self.poster_url(p))
            .collect();
        for url in urls {
            self.posters.request(&url);
        }
    }

    fn apply_theme(&self, ctx: &eg::Context) {
        match self.theme_pref {
            ThemePref::Light => ctx.set_visuals(eg::Visuals::light()),
            ThemePref::Dark => ctx.set_visuals(eg::Visuals::dark()),
            // leave whatever eframe's system-theme follower picked
            ThemePref::System => {}
        }
    }

    pub(crate) fn select_movie(&mut self, id: u32) {
        self.selected = Some(id);
        if let Some(client) = self.client.clone() {
            self.details.fetch(&client, id);
        }
    }

    pub(crate) fn switch_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.view = view;
        if view == View::Favorites {
            // re-prime the batch fetch on every visit; cached ids are no-ops
            self.favorites_primed = false;
        }
    }
}

// ========== App impl ==========
impl eframe::App for TmdxApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        // First frame
        if !self.did_init {
            self.did_init = true;
            self.init();
        }

        self.apply_theme(ctx);

        // Drain background completions
        if self.pager.poll() {
            self.queue_loaded_posters();
        }
        self.details.poll();
        self.posters.poll(MAX_POSTER_DONE_PER_FRAME);

        // Without a client there is nothing to browse; show setup help.
        if self.client.is_none() {
            self.ui_render_setup_screen(ctx);
            return;
        }

        self.ui_render_topbar_panel(ctx);

        if self.selected.is_some() {
            self.ui_render_detail_panel(ctx);
        }

        eg::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Discover => {
                if self.ui_render_discover(ui, ctx) {
                    if let Some(client) = self.client.clone() {
                        self.pager.load_next_page(&client, &self.filters);
                    }
                }
            }
            View::Favorites => self.ui_render_favorites(ui, ctx),
        });

        self.ui_render_genre_popup(ctx);
        self.ui_render_share_popup(ctx);

        self.maybe_save_prefs();
    }
}
