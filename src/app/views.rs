//! View rendering (sidebar, list, detail, prompt)

use super::{App, ImageSlot};
use crate::constants::*;
use crate::theme;
use crate::ui::components;
use crate::utils::{self, truncate_chars};
use eframe::egui;

/// Owned copy of one list item, so rows can be drawn while `self` is borrowed mutably.
pub(crate) struct RowData {
    pub id: String,
    pub title: String,
    pub thumb: Option<String>,
    pub alt: String,
}

impl App {
    // ========================================================================
    // SIDEBAR
    // ========================================================================

    pub(crate) fn render_sidebar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let avail_w = ui.available_width();

        ui.add_space(21.0);
        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
            if self.logo_texture.is_none() {
                if let Some((pixels, w, h)) = utils::rasterize_logo(avail_w as u32) {
                    self.logo_texture = Some(ctx.load_texture(
                        "logo",
                        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                        egui::TextureOptions::LINEAR,
                    ));
                }
            }
            if let Some(texture) = &self.logo_texture {
                let logo_w = avail_w * 0.3;
                let aspect = texture.size()[1] as f32 / texture.size()[0] as f32;
                ui.image(egui::load::SizedTexture::new(
                    texture.id(),
                    egui::vec2(logo_w, logo_w * aspect),
                ));
            }
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(APP_NAME.to_uppercase())
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
        });
        ui.add_space(theme::SPACING_LG);

        // Title input
        let mut submit = false;
        theme::input_frame().show(ui, |ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS)
                            .size(14.0)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.title_input)
                        .id(ui.make_persistent_id("title_input"))
                        .hint_text("Enter a title...")
                        .frame(false)
                        .desired_width(ui.available_width()),
                );
                if self.focus_title {
                    self.focus_title = false;
                    response.request_focus();
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
            });
        });

        ui.add_space(theme::SPACING_MD);
        let search = ui.add_sized(
            [ui.available_width(), theme::BUTTON_HEIGHT],
            theme::button_accent(format!("{}  Search", egui_phosphor::regular::MAGNIFYING_GLASS)),
        );
        if search.clicked() {
            submit = true;
        }
        if submit {
            self.submit_title(ctx);
        }

        ui.add_space(theme::SPACING_MD);
        self.render_status_line(ui);

        // Settings pinned to the bottom
        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.add_space(theme::SPACING_XL);
            let label = if self.show_settings {
                format!("{}  Hide settings", egui_phosphor::regular::CARET_DOWN)
            } else {
                format!("{}  Settings", egui_phosphor::regular::GEAR)
            };
            if ui
                .add_sized([ui.available_width(), theme::BUTTON_HEIGHT], theme::button(label))
                .clicked()
            {
                self.show_settings = !self.show_settings;
            }
            if self.show_settings {
                ui.add_space(theme::SPACING_MD);
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    theme::card_frame().show(ui, |ui| self.render_settings(ui));
                });
            }
        });
    }

    fn render_status_line(&self, ui: &mut egui::Ui) {
        if self.browser.is_loading() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new().size(12.0).color(theme::ACCENT));
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Searching...")
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
            });
            return;
        }

        let Some(title) = self.browser.last_title() else {
            return;
        };
        let count = self.browser.state().items().len();
        let noun = if count == 1 { "result" } else { "results" };
        ui.add(
            egui::Label::new(
                egui::RichText::new(format!("{} {} for \"{}\"", count, noun, truncate_chars(title, 28)))
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
            )
            .selectable(false),
        );
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.add(
            egui::Label::new(
                egui::RichText::new("SERVICE URL")
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            )
            .selectable(false),
        );
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.service_url_input)
                .desired_width(ui.available_width())
                .hint_text(DEFAULT_SERVICE_URL),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if entered || ui.add(theme::button("Apply")).clicked() {
            self.apply_service_url();
        }
        if let Some(err) = &self.service_url_error {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(err)
                        .size(theme::FONT_SMALL)
                        .color(theme::STATUS_ERROR),
                )
                .wrap(),
            );
        }

        ui.add_space(theme::SPACING_MD);
        if theme::settings_checkbox(ui, self.show_thumbnails, "Show thumbnails") {
            self.show_thumbnails = !self.show_thumbnails;
        }
    }

    // ========================================================================
    // LIST
    // ========================================================================

    pub(crate) fn render_list(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        use egui_extras::{Column, TableBuilder};

        let rows: Vec<RowData> = self
            .browser
            .state()
            .items()
            .iter()
            .map(|item| RowData {
                id: item.id().to_string(),
                title: item.title().to_string(),
                thumb: item.thumbnail_url().map(str::to_string),
                alt: item.alt_text(),
            })
            .collect();

        if rows.is_empty() {
            if self.browser.is_loading() {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Spinner::new().size(24.0).color(theme::ACCENT));
                });
            } else if self.browser.last_title().is_some() {
                components::empty_state(ui, egui_phosphor::regular::FILE_DASHED, "No content found");
            } else {
                components::empty_state(
                    ui,
                    egui_phosphor::regular::MAGNIFYING_GLASS,
                    "Search for a title to list its content",
                );
            }
            return;
        }

        let show_thumbs = self.show_thumbnails && rows.iter().any(|r| r.thumb.is_some());
        let row_height = if show_thumbs {
            theme::ROW_HEIGHT_THUMB
        } else {
            theme::ROW_HEIGHT
        };
        let thumb_size = egui::vec2(theme::THUMB_SIZE.0, theme::THUMB_SIZE.1);
        let selected = self.browser.selected();
        let mut clicked: Option<usize> = None;

        let mut table = TableBuilder::new(ui)
            .striped(false)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .sense(egui::Sense::click())
            .min_scrolled_height(0.0);
        if show_thumbs {
            table = table.column(Column::exact(thumb_size.x + theme::SPACING_LG));
        }
        table = table.column(Column::remainder().clip(true));

        table.body(|mut body| {
            body.ui_mut().visuals_mut().selection.bg_fill = theme::ROW_SELECTED;

            body.rows(row_height, rows.len(), |mut row| {
                let idx = row.index();
                let data = &rows[idx];
                row.set_selected(selected == Some(idx));

                if show_thumbs {
                    row.col(|ui| {
                        if let Some(url) = &data.thumb {
                            let slot: &ImageSlot = self.photo(ctx, url);
                            components::photo(ui, Some(slot), thumb_size, &data.alt);
                        }
                    });
                }
                row.col(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&data.title)
                                .size(theme::FONT_BODY)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .truncate()
                        .selectable(false),
                    );
                });

                let response = row.response();
                if response.hovered() {
                    ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if response.clicked() {
                    clicked = Some(idx);
                }
                response.context_menu(|ui| {
                    if self.row_context_menu(ui, data).show_detail {
                        clicked = Some(idx);
                    }
                });
            });
        });

        if let Some(idx) = clicked {
            self.browser.select(idx);
        }
    }

    // ========================================================================
    // DETAIL
    // ========================================================================

    pub(crate) fn render_detail(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(content) = self.browser.state().detail().cloned() else {
            return;
        };

        let mut refresh = false;
        let mut close = false;
        ui.add_space(theme::SPACING_MD);
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("DETAILS")
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(theme::button(egui_phosphor::regular::X))
                    .on_hover_text("Close")
                    .clicked()
                {
                    close = true;
                }
                if self.browser.is_refreshing() {
                    ui.add(egui::Spinner::new().size(14.0).color(theme::ACCENT));
                } else {
                    let can_refresh = content.id.is_object_id();
                    let button = ui
                        .add_enabled(
                            can_refresh,
                            theme::button(egui_phosphor::regular::ARROW_CLOCKWISE),
                        )
                        .on_hover_text("Reload from service");
                    if button.clicked() {
                        refresh = true;
                    }
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let slot = content
                    .photo_url
                    .as_deref()
                    .map(|url| &*self.photo(ctx, url));
                components::content_detail(ui, &content, slot);
            });

        if refresh {
            self.refresh_detail(ctx);
        }
        if close {
            self.browser.clear_detail();
        }
    }

    // ========================================================================
    // PROMPT
    // ========================================================================

    pub(crate) fn render_empty_prompt(&mut self, ctx: &egui::Context) {
        if !self.show_empty_prompt {
            return;
        }

        let mut close = false;
        let modal = egui::Modal::new(egui::Id::new("empty_title_prompt"))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(280.0);
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::WARNING)
                                .size(18.0)
                                .color(theme::ACCENT),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(EMPTY_TITLE_PROMPT)
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(theme::SPACING_LG);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let ok = ui.add(theme::button_accent("OK"));
                    if ok.clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        close = true;
                    }
                });
            });

        if close || modal.should_close() {
            self.show_empty_prompt = false;
            self.focus_title = true;
        }
    }
}
