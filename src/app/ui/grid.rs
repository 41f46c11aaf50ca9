// src/app/ui/grid.rs
use eframe::egui as eg;

pub(crate) const H_SPACING: f32 = 8.0;
pub(crate) const V_SPACING: f32 = 12.0;

/// Display data for one poster card, snapshotted before painting so the
/// borrow of the backing store ends before the poster store is touched.
pub(crate) struct Card {
    pub id: u32,
    pub title: String,
    pub year: Option<i32>,
    pub sub: String,
    pub poster_url: Option<String>,
}

pub(crate) struct CardResponse {
    pub clicked: bool,
    pub fav_toggled: bool,
}

impl crate::app::TmdxApp {
    /// Paint one poster card with a favorite star in the corner.
    pub(crate) fn draw_movie_card(
        &mut self,
        ui: &mut eg::Ui,
        ctx: &eg::Context,
        card: &Card,
        uploads_left: &mut usize,
    ) -> CardResponse {
        let card_w = self.poster_width_ui;
        let text_h = 48.0;
        let card_h = card_w * 1.5 + text_h;
        let mut out = CardResponse {
            clicked: false,
            fav_toggled: false,
        };

        ui.allocate_ui_with_layout(
            eg::vec2(card_w, card_h),
            eg::Layout::top_down(eg::Align::Min),
            |ui| {
                ui.set_min_size(eg::vec2(card_w, card_h));
                let rect = ui.max_rect();

                // the same movie may legitimately appear twice in the feed;
                // disambiguate the widget id by position
                let seq = rect.min.y.to_bits() ^ rect.min.x.to_bits();
                let id = eg::Id::new(("movie_card", card.id, seq));
                if ui.interact(rect, id, eg::Sense::click()).clicked() {
                    out.clicked = true;
                }

                let poster_rect = eg::Rect::from_min_max(
                    rect.min,
                    eg::pos2(rect.min.x + card_w, rect.min.y + card_w * 1.5),
                );
                let text_rect =
                    eg::Rect::from_min_max(eg::pos2(rect.min.x, poster_rect.max.y), rect.max);

                // Poster (lazy upload within the per-frame budget)
                let tex_id = card
                    .poster_url
                    .as_deref()
                    .and_then(|url| self.posters.texture(ctx, url, uploads_left))
                    .map(|tex| tex.id());
                match tex_id {
                    Some(tex_id) => {
                        ui.painter().image(
                            tex_id,
                            poster_rect,
                            eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0)),
                            eg::Color32::WHITE,
                        );
                    }
                    None => {
                        ui.painter()
                            .rect_filled(poster_rect, 6.0, ui.visuals().extreme_bg_color);
                    }
                }

                // Favorite star
                let star_rect = eg::Rect::from_min_size(
                    eg::pos2(poster_rect.max.x - 26.0, poster_rect.min.y + 4.0),
                    eg::vec2(22.0, 22.0),
                );
                let star_resp =
                    ui.interact(star_rect, eg::Id::new(("fav_star", card.id, seq)), eg::Sense::click());
                let faved = self.favorites.has(card.id);
                let star_color = if faved {
                    eg::Color32::GOLD
                } else if star_resp.hovered() {
                    eg::Color32::WHITE
                } else {
                    eg::Color32::LIGHT_GRAY
                };
                ui.painter().rect_filled(
                    star_rect,
                    eg::Rounding::same(11.0),
                    eg::Color32::from_black_alpha(120),
                );
                ui.painter().text(
                    star_rect.center(),
                    eg::Align2::CENTER_CENTER,
                    if faved { "★" } else { "☆" },
                    eg::FontId::proportional(15.0),
                    star_color,
                );
                if star_resp.clicked() {
                    out.fav_toggled = true;
                    out.clicked = false;
                }

                // Label
                let title_line = match card.year {
                    Some(y) => format!("{} ({y})", card.title),
                    None => card.title.clone(),
                };
                let label_text = if card.sub.is_empty() {
                    title_line
                } else {
                    format!("{title_line}\n{}", card.sub)
                };
                ui.allocate_ui_at_rect(text_rect, |ui| {
                    ui.add(eg::Label::new(eg::RichText::new(label_text).size(13.0)).wrap());
                });

                // Selection stroke
                if self.selected == Some(card.id) {
                    ui.painter().rect_stroke(
                        rect.shrink(1.0),
                        6.0,
                        eg::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                    );
                }
            },
        );

        out
    }

    /// Discover feed. Returns true when the scroll position is near the end
    /// and another page should be requested.
    pub(crate) fn ui_render_discover(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) -> bool {
        let mut uploads_left = super::super::MAX_UPLOADS_PER_FRAME;
        let mut retry = false;

        let output = eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let avail = ui.available_width();
                let card_w = self.poster_width_ui;
                let cols = ((avail + H_SPACING) / (card_w + H_SPACING)).floor().max(1.0) as usize;

                let used = cols as f32 * card_w + (cols.saturating_sub(1)) as f32 * H_SPACING;
                let left_pad = ((avail - used) * 0.5).max(0.0);
                if left_pad > 0.0 {
                    ui.add_space(left_pad);
                }

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);

                    for idx in 0..self.pager.movies().len() {
                        if idx > 0 && idx % cols == 0 {
                            ui.end_row();
                        }

                        let card = {
                            let m = &self.pager.movies()[idx];
                            Card {
                                id: m.id,
                                title: m.title.clone(),
                                year: m.year(),
                                sub: format!(
                                    "★ {:.1}  {}",
                                    m.vote_average,
                                    m.genre_names().join(", ")
                                ),
                                poster_url: m.poster_path.as_deref().map(|p| self.poster_url(p)),
                            }
                        };

                        let resp = self.draw_movie_card(ui, ctx, &card, &mut uploads_left);
                        if resp.fav_toggled {
                            self.favorites.toggle(card.id);
                        } else if resp.clicked {
                            self.select_movie(card.id);
                        }
                    }
                    ui.end_row();
                });

                // ---- end-of-feed status ----
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    if let Some(err) = self.pager.error() {
                        ui.colored_label(
                            ui.visuals().error_fg_color,
                            format!("Error loading movies: {err}"),
                        );
                        if ui.button("Retry").clicked() {
                            retry = true;
                        }
                    } else if self.pager.is_exhausted() {
                        if self.pager.movies().is_empty() {
                            ui.label("No movies match the filters.");
                        } else {
                            ui.label(
                                eg::RichText::new("No more movies match the filters.").weak(),
                            );
                        }
                    } else {
                        ui.add(eg::Spinner::new().size(22.0));
                    }
                });
                ui.add_space(12.0);
            });

        if retry {
            // retry is a full reset, the sticky error never clears in place
            if let Some(client) = self.client.clone() {
                self.pager.reset_and_load(&client, &self.filters);
            }
        }

        let near_bottom = output.state.offset.y + output.inner_rect.height()
            >= output.content_size.y - super::super::SCROLL_FETCH_MARGIN;
        near_bottom && self.pager.can_load_more()
    }
}
