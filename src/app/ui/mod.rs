// src/app/ui/mod.rs
mod detail;
mod favorites;
mod grid;
mod topbar;

use eframe::egui as eg;

impl crate::app::TmdxApp {
    /// Shown instead of the app when no API token is configured.
    pub(crate) fn ui_render_setup_screen(&self, ctx: &eg::Context) {
        eg::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading("TMDB Movie Explorer");
                ui.add_space(8.0);
                if let Some(err) = &self.client_err {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }
                ui.add_space(16.0);
                ui.label("Get an API read access token from themoviedb.org, then either:");
                ui.add_space(4.0);
                ui.label("1) put it in config.json next to the binary:");
                ui.monospace(r#"{ "tmdb_api_token": "eyJhbGci..." }"#);
                ui.label("2) or set the TMDX_API_TOKEN environment variable.");
                ui.add_space(16.0);
                ui.monospace(format!("Cache: {}", crate::app::cache::cache_dir().display()));
                ui.add_space(8.0);
                ui.label("Restart the app once the token is in place.");
            });
        });
    }
}
