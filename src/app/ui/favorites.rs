// src/app/ui/favorites.rs
use eframe::egui as eg;

use super::grid::{Card, H_SPACING, V_SPACING};
use crate::app::details::DetailEntry;

/// Per-favorite render slot, snapshotted from the details cache.
enum FavSlot {
    Loading,
    Missing(u32),
    Ready(Card),
}

impl crate::app::TmdxApp {
    pub(crate) fn ui_render_favorites(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        // Batch-fetch details for every favorited id on view entry. Each id
        // resolves independently; one bad id never blocks the rest.
        if !self.favorites_primed {
            self.favorites_primed = true;
            if let Some(client) = self.client.clone() {
                let ids: Vec<u32> = self.favorites.iter().collect();
                self.details.fetch_many(&client, ids);
            }
        }

        if self.favorites.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading("No favorites yet");
                ui.label("Star a movie in the Discover feed to keep it here.");
            });
            return;
        }

        let ids: Vec<u32> = self.favorites.iter().collect();
        let any_loading = self.details.any_loading(ids.iter());

        let slots: Vec<FavSlot> = ids
            .iter()
            .map(|&id| match self.details.get(id) {
                None | Some(DetailEntry::Loading) => FavSlot::Loading,
                Some(DetailEntry::Invalid) => FavSlot::Missing(id),
                Some(DetailEntry::Ready(d)) => FavSlot::Ready(Card {
                    id,
                    title: d.title.clone(),
                    year: d.year(),
                    sub: format!("★ {:.1}", d.vote_average),
                    poster_url: d.poster_path.as_deref().map(|p| self.poster_url(p)),
                }),
            })
            .collect();

        // Make sure artwork for resolved favorites is queued.
        for slot in &slots {
            if let FavSlot::Ready(card) = slot {
                if let Some(url) = &card.poster_url {
                    self.posters.request(url);
                }
            }
        }

        let mut uploads_left = super::super::MAX_UPLOADS_PER_FRAME;
        let mut unfavorite: Option<u32> = None;
        let mut clicked: Option<u32> = None;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(4.0);
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
                    for slot in &slots {
                        match slot {
                            FavSlot::Loading => self.draw_pending_card(ui),
                            FavSlot::Missing(id) => {
                                if self.draw_missing_card(ui, *id) {
                                    unfavorite = Some(*id);
                                }
                            }
                            FavSlot::Ready(card) => {
                                let resp = self.draw_movie_card(ui, ctx, card, &mut uploads_left);
                                if resp.fav_toggled {
                                    unfavorite = Some(card.id);
                                } else if resp.clicked {
                                    clicked = Some(card.id);
                                }
                            }
                        }
                    }
                });

                if any_loading {
                    ui.add_space(12.0);
                    ui.vertical_centered(|ui| ui.add(eg::Spinner::new().size(22.0)));
                }
                ui.add_space(12.0);
            });

        if let Some(id) = unfavorite {
            self.favorites.remove(id);
        }
        if let Some(id) = clicked {
            self.select_movie(id);
        }
    }

    fn card_size(&self) -> eg::Vec2 {
        let card_w = self.poster_width_ui;
        eg::vec2(card_w, card_w * 1.5 + 48.0)
    }

    fn draw_pending_card(&mut self, ui: &mut eg::Ui) {
        let size = self.card_size();
        let (rect, _resp) = ui.allocate_exact_size(size, eg::Sense::hover());
        ui.painter()
            .rect_filled(rect, 6.0, ui.visuals().extreme_bg_color);
        ui.painter().text(
            rect.center(),
            eg::Align2::CENTER_CENTER,
            "Loading…",
            eg::FontId::proportional(13.0),
            ui.visuals().weak_text_color(),
        );
    }

    /// A favorited id the API no longer resolves. Returns true when the user
    /// chooses to drop it from the list.
    fn draw_missing_card(&mut self, ui: &mut eg::Ui, id: u32) -> bool {
        let size = self.card_size();
        let mut dropped = false;
        ui.allocate_ui_with_layout(size, eg::Layout::top_down(eg::Align::Center), |ui| {
            ui.set_min_size(size);
            let rect = ui.max_rect();
            ui.painter()
                .rect_filled(rect, 6.0, ui.visuals().extreme_bg_color);

            ui.add_space(size.y * 0.35);
            ui.label(eg::RichText::new("Not found").strong());
            ui.label(eg::RichText::new(format!("movie #{id}")).weak().small());
            ui.add_space(6.0);
            if ui.small_button("Remove").clicked() {
                dropped = true;
            }
        });
        dropped
    }
}
