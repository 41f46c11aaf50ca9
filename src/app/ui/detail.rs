// src/app/ui/detail.rs
use eframe::egui as eg;

use crate::app::details::DetailEntry;
use crate::app::filters::Filters;
use crate::app::tmdb::MovieDetails;
use crate::app::utils::{format_compact_usd, format_count, format_release_date, format_runtime};
use crate::app::View;

enum DetailShow {
    Loading,
    Missing,
    Ready(Box<MovieDetails>),
}

impl crate::app::TmdxApp {
    pub(crate) fn ui_render_detail_panel(&mut self, ctx: &eg::Context) {
        let screen_w: f32 = ctx.input(|i| i.screen_rect().width());
        let max_w: f32 = (screen_w * 0.45).clamp(300.0, 560.0);
        let default_w: f32 = self.detail_panel_width.clamp(260.0, max_w);

        let panel = eg::SidePanel::right("detail_panel")
            .resizable(true)
            .default_width(default_w)
            .min_width(260.0)
            .max_width(max_w)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.heading("Details");
                    ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            self.selected = None;
                        }
                    });
                });
                ui.separator();

                let Some(id) = self.selected else {
                    ui.label("Select a movie from the grid to see details.");
                    return;
                };

                let show = match self.details.get(id) {
                    None | Some(DetailEntry::Loading) => DetailShow::Loading,
                    Some(DetailEntry::Invalid) => DetailShow::Missing,
                    Some(DetailEntry::Ready(d)) => DetailShow::Ready(d.clone()),
                };

                match show {
                    DetailShow::Loading => {
                        ui.add_space(24.0);
                        ui.vertical_centered(|ui| {
                            ui.add(eg::Spinner::new().size(24.0));
                            ui.label("Loading details…");
                        });
                    }
                    DetailShow::Missing => {
                        ui.add_space(24.0);
                        ui.vertical_centered(|ui| {
                            ui.heading("Not found");
                            ui.label("Details for this movie can't be loaded.");
                        });
                    }
                    DetailShow::Ready(details) => self.ui_render_detail_content(ui, ctx, &details),
                }
            });

        // Persist the width so it sticks between runs
        let actual_w = panel.response.rect.width();
        if (actual_w - self.detail_panel_width).abs() > 0.5 {
            self.detail_panel_width = actual_w.clamp(260.0, max_w);
            self.mark_dirty();
        }
    }

    fn ui_render_detail_content(&mut self, ui: &mut eg::Ui, ctx: &eg::Context, d: &MovieDetails) {
        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                // Poster preview
                let mut uploads_left = 2usize;
                if let Some(path) = d.poster_path.as_deref() {
                    let url = self.poster_url(path);
                    self.posters.request(&url);

                    let avail_w = ui.available_width().clamp(120.0, 360.0);
                    let poster_size = eg::vec2(avail_w, avail_w * 1.5);
                    if let Some(tex) = self.posters.texture(ctx, &url, &mut uploads_left) {
                        ui.image((tex.id(), poster_size));
                    } else {
                        let (rect, _resp) = ui.allocate_exact_size(poster_size, eg::Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 8.0, ui.visuals().extreme_bg_color);
                        ui.painter().text(
                            rect.center(),
                            eg::Align2::CENTER_CENTER,
                            "Poster loading…",
                            eg::FontId::proportional(14.0),
                            ui.visuals().weak_text_color(),
                        );
                    }
                }
                ui.add_space(8.0);

                // Title (YYYY), original title when it differs
                let title = match d.year() {
                    Some(y) => format!("{} ({y})", d.title),
                    None => d.title.clone(),
                };
                ui.heading(title);
                if !d.original_title.is_empty() && d.original_title != d.title {
                    ui.label(eg::RichText::new(&d.original_title).weak());
                }

                // date • rating • runtime
                let mut meta: Vec<String> = Vec::new();
                if !d.release_date.is_empty() {
                    meta.push(format_release_date(&d.release_date));
                }
                meta.push(format!(
                    "★ {:.1} ({})",
                    d.vote_average,
                    format_count(d.vote_count)
                ));
                if let Some(runtime) = d.runtime.filter(|&r| r > 0) {
                    meta.push(format_runtime(runtime));
                }
                ui.label(eg::RichText::new(meta.join("  •  ")).weak());

                if let Some(tagline) = d.tagline.as_deref().filter(|t| !t.is_empty()) {
                    ui.add_space(4.0);
                    ui.label(eg::RichText::new(tagline).italics());
                }

                ui.add_space(6.0);
                let faved = self.favorites.has(d.id);
                let fav_label = if faved {
                    "★ Remove from favorites"
                } else {
                    "☆ Add to favorites"
                };
                if ui.button(fav_label).clicked() {
                    self.favorites.toggle(d.id);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if !d.overview.is_empty() {
                    ui.label(&d.overview);
                    ui.add_space(8.0);
                }

                // Genre chips narrow the Discover feed to that genre
                if !d.genres.is_empty() {
                    ui.label(eg::RichText::new("Genres").strong());
                    let mut picked: Option<u32> = None;
                    ui.horizontal_wrapped(|ui| {
                        for genre in &d.genres {
                            if ui.small_button(&genre.name).clicked() {
                                picked = Some(genre.id);
                            }
                        }
                    });
                    if let Some(genre_id) = picked {
                        let mut filters = Filters::default();
                        filters.genres.insert(genre_id);
                        self.apply_filters(filters);
                        self.switch_view(View::Discover);
                    }
                    ui.add_space(8.0);
                }

                fn fact_row(ui: &mut eg::Ui, name: &str, value: String) {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(eg::RichText::new(format!("{name}:")).strong());
                        ui.label(value);
                    });
                }

                if d.budget != 0 {
                    fact_row(ui, "Budget", format_compact_usd(d.budget));
                }
                if d.revenue != 0 {
                    fact_row(ui, "Revenue", format_compact_usd(d.revenue));
                }
                if !d.production_companies.is_empty() {
                    let names: Vec<&str> =
                        d.production_companies.iter().map(|c| c.name.as_str()).collect();
                    fact_row(ui, "Production", names.join(", "));
                }
                if !d.production_countries.is_empty() {
                    let names: Vec<&str> =
                        d.production_countries.iter().map(|c| c.name.as_str()).collect();
                    fact_row(ui, "Countries", names.join(", "));
                }
                if !d.spoken_languages.is_empty() {
                    let names: Vec<&str> = d
                        .spoken_languages
                        .iter()
                        .map(|l| {
                            if l.english_name.is_empty() {
                                l.name.as_str()
                            } else {
                                l.english_name.as_str()
                            }
                        })
                        .collect();
                    fact_row(ui, "Languages", names.join(", "));
                }

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if let Some(imdb) = d.imdb_id.as_deref().filter(|s| !s.is_empty()) {
                        ui.hyperlink_to("IMDb", format!("https://www.imdb.com/title/{imdb}/"));
                    }
                    if let Some(home) = d.homepage.as_deref().filter(|s| !s.is_empty()) {
                        ui.hyperlink_to("Homepage", home.to_string());
                    }
                });
            });
    }
}
