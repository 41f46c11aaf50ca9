// src/app/prefs.rs
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::filters::Filters;
use super::types::ThemePref;

impl crate::app::TmdxApp {
    // ---- tiny flags ----
    pub(crate) fn mark_dirty(&mut self) {
        self.prefs_dirty = true;
    }

    pub(crate) fn maybe_save_prefs(&mut self) {
        // debounce a bit to avoid writing every frame
        if self.prefs_dirty && self.prefs_last_write.elapsed() >= Duration::from_millis(300) {
            self.save_prefs();
            self.prefs_dirty = false;
            self.prefs_last_write = Instant::now();
        }
    }

    // ---- load/save prefs ----
    pub(crate) fn load_prefs(&mut self) {
        let path = prefs_path();
        let Ok(txt) = fs::read_to_string(&path) else {
            return;
        };

        for line in txt.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let k = k.trim();
            let v = v.trim();

            match k {
                // absent key means "follow system preference"
                "theme" => {
                    if let Some(t) = ThemePref::from_str(v) {
                        self.theme_pref = t;
                    }
                }
                "poster_w" => {
                    if let Ok(n) = v.parse::<f32>() {
                        self.poster_width_ui = n.clamp(120.0, 220.0);
                    }
                }
                "detail_w" => {
                    if let Ok(n) = v.parse::<f32>() {
                        self.detail_panel_width = n.clamp(260.0, 600.0);
                    }
                }
                "workers" => {
                    if let Ok(n) = v.parse::<usize>() {
                        self.worker_count_ui = n.clamp(1, 32);
                    }
                }
                // the shareable parameter string doubles as filter persistence;
                // split_once above keeps the embedded '='s intact
                "filters" => {
                    self.filters = Filters::decode(v);
                }
                _ => {}
            }
        }
    }

    pub(crate) fn save_prefs(&self) {
        let path = prefs_path();
        let _ = fs::create_dir_all(path.parent().unwrap_or_else(|| std::path::Path::new(".")));

        let mut txt = String::from("# tmdx ui prefs\n");
        if self.theme_pref != ThemePref::System {
            txt.push_str(&format!("theme={}\n", self.theme_pref.as_str()));
        }
        txt.push_str(&format!("poster_w={:.1}\n", self.poster_width_ui));
        txt.push_str(&format!("detail_w={:.1}\n", self.detail_panel_width));
        txt.push_str(&format!("workers={}\n", self.worker_count_ui));
        let filters = self.filters.encode();
        if !filters.is_empty() {
            txt.push_str(&format!("filters={filters}\n"));
        }

        let _ = fs::write(path, txt);
    }
}

// ---- free helper kept as a function for reuse at startup ----
pub fn prefs_path() -> PathBuf {
    crate::app::cache::cache_dir().join("ui_prefs.txt")
}
