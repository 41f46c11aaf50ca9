// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::filters::{current_year, Filters, MAX_RATING, MIN_RATING, MIN_YEAR};
use crate::app::tmdb;
use crate::app::{ThemePref, View};

impl crate::app::TmdxApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar_panel(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::top("topbar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.ui_render_nav_row(ui);
            if self.view == View::Discover {
                ui.separator();
                self.ui_render_filter_row(ui);
            }
            ui.add_space(4.0);
        });
    }

    fn ui_render_nav_row(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            // View switch
            if ui
                .selectable_label(self.view == View::Discover, "Discover")
                .clicked()
            {
                self.switch_view(View::Discover);
            }
            let fav_label = if self.favorites.is_empty() {
                "Favorites".to_string()
            } else {
                format!("Favorites ({})", self.favorites.len())
            };
            if ui
                .selectable_label(self.view == View::Favorites, fav_label)
                .clicked()
            {
                self.switch_view(View::Favorites);
            }

            ui.separator();

            if ui.button("Share filters…").clicked() {
                self.share_paste = self.filters.encode();
                self.show_share_popup = true;
            }

            ui.separator();

            // Theme
            let mut changed_theme = false;
            eg::ComboBox::from_id_source("theme_combo")
                .selected_text(match self.theme_pref {
                    ThemePref::Light => "Theme: Light",
                    ThemePref::Dark => "Theme: Dark",
                    ThemePref::System => "Theme: System",
                })
                .show_ui(ui, |ui| {
                    for (pref, label) in [
                        (ThemePref::Light, "Light"),
                        (ThemePref::Dark, "Dark"),
                        (ThemePref::System, "System"),
                    ] {
                        if ui
                            .selectable_value(&mut self.theme_pref, pref, label)
                            .clicked()
                        {
                            changed_theme = true;
                        }
                    }
                });
            if changed_theme {
                self.mark_dirty();
            }

            ui.separator();

            // Poster size
            ui.label("Poster:");
            if ui
                .add(eg::Slider::new(&mut self.poster_width_ui, 120.0..=220.0).suffix(" px"))
                .changed()
            {
                self.mark_dirty();
            }

            ui.separator();

            // Workers
            ui.label("Workers:");
            let workers_resp = ui.add(eg::Slider::new(&mut self.worker_count_ui, 1..=32));
            if workers_resp.changed() {
                self.mark_dirty();
            }
            workers_resp.on_hover_text("Parallel poster downloads. Applies on next launch.");
        });
    }

    fn ui_render_filter_row(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            ui.label("Year:");
            ui.add(
                eg::Slider::new(&mut self.pending_filters.min_year, MIN_YEAR..=current_year())
                    .show_value(true),
            );
            ui.label("to");
            ui.add(
                eg::Slider::new(&mut self.pending_filters.max_year, MIN_YEAR..=current_year())
                    .show_value(true),
            );

            ui.separator();

            ui.label("Rating:");
            ui.add(
                eg::Slider::new(&mut self.pending_filters.min_rating, MIN_RATING..=MAX_RATING)
                    .fixed_decimals(1)
                    .step_by(0.1),
            );
            ui.label("to");
            ui.add(
                eg::Slider::new(&mut self.pending_filters.max_rating, MIN_RATING..=MAX_RATING)
                    .fixed_decimals(1)
                    .step_by(0.1),
            );

            ui.separator();

            let genre_label = if self.pending_filters.genres.is_empty() {
                "Genres…".to_string()
            } else {
                format!("Genres ({})", self.pending_filters.genres.len())
            };
            if ui.button(genre_label).clicked() {
                self.show_genre_popup = true;
            }

            ui.separator();

            if ui.button("Apply").clicked() {
                let pending = self.pending_filters.clone();
                self.apply_filters(pending);
            }
            if ui.button("Reset").clicked() {
                self.pending_filters = Filters::default();
                self.apply_filters(Filters::default());
            }

            if !self.pending_filters.clone().normalized().same(&self.filters) {
                ui.label(eg::RichText::new("(press Apply to refetch)").italics().weak());
            }
        });
    }

    // ---------- GENRE FILTER POPUP ----------
    pub(crate) fn ui_render_genre_popup(&mut self, ctx: &eg::Context) {
        if !self.show_genre_popup {
            return;
        }

        let mut open = self.show_genre_popup;
        eg::Window::new("Genres")
            .collapsible(false)
            .resizable(false)
            .default_width(240.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(eg::RichText::new("Only include these genres:").strong());
                    if !self.pending_filters.genres.is_empty() && ui.small_button("Clear").clicked()
                    {
                        self.pending_filters.genres.clear();
                    }
                });

                ui.separator();
                eg::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                    for (id, name) in tmdb::GENRES {
                        let mut checked = self.pending_filters.genres.contains(&id);
                        if ui.checkbox(&mut checked, name).clicked() {
                            if checked {
                                self.pending_filters.genres.insert(id);
                            } else {
                                self.pending_filters.genres.remove(&id);
                            }
                        }
                    }
                });

                ui.separator();
                ui.label(eg::RichText::new("Takes effect on Apply.").weak());
            });

        // Apply result (avoid E0499 by setting after .show)
        self.show_genre_popup = open;
    }

    // ---------- SHARE POPUP ----------
    pub(crate) fn ui_render_share_popup(&mut self, ctx: &eg::Context) {
        if !self.show_share_popup {
            return;
        }

        let mut open = self.show_share_popup;
        let mut pasted: Option<Filters> = None;
        eg::Window::new("Share filters")
            .collapsible(false)
            .resizable(true)
            .default_width(420.0)
            .open(&mut open)
            .show(ctx, |ui| {
                let current = self.filters.encode();
                ui.label(eg::RichText::new("Current filter parameters:").strong());
                ui.horizontal_wrapped(|ui| {
                    if current.is_empty() {
                        ui.label(eg::RichText::new("(defaults — nothing to encode)").weak());
                    } else {
                        ui.monospace(&current);
                        if ui.small_button("Copy").clicked() {
                            ui.ctx().output_mut(|o| o.copied_text = current.clone());
                        }
                    }
                });

                ui.separator();
                ui.label("Paste parameters (or a whole link) to restore a filter set:");
                ui.add(
                    eg::TextEdit::singleline(&mut self.share_paste).desired_width(f32::INFINITY),
                );
                if ui.button("Apply pasted filters").clicked() {
                    pasted = Some(Filters::decode(&self.share_paste));
                }
            });

        if let Some(filters) = pasted {
            self.apply_filters(filters);
            self.switch_view(View::Discover);
        }
        self.show_share_popup = open;
    }
}
