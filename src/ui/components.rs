//! Reusable UI components
//!
//! Standalone widgets shared by the list and detail views. None of them
//! touch application state; callers pass in what to draw and act on the
//! returned responses.

use crate::app::ImageSlot;
use crate::theme;
use crate::types::Content;
use eframe::egui;

/// Scale `size` down to fit inside `max`, preserving aspect ratio. Never upscales.
pub fn fit_size(size: [usize; 2], max: egui::Vec2) -> egui::Vec2 {
    let (w, h) = (size[0] as f32, size[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (max.x / w).min(max.y / h).min(1.0);
    egui::vec2(w * scale, h * scale)
}

/// Draw a photo from the cache, or a placeholder box of `max` size.
///
/// While loading the placeholder shows a spinner; on failure it shows the alt text.
pub fn photo(ui: &mut egui::Ui, slot: Option<&ImageSlot>, max: egui::Vec2, alt: &str) -> egui::Response {
    match slot {
        Some(ImageSlot::Ready(texture)) => {
            let size = fit_size(texture.size(), max);
            ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)))
                .on_hover_text(alt)
        }
        Some(ImageSlot::Failed) => placeholder(ui, max, |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!("{} {}", egui_phosphor::regular::IMAGE_BROKEN, alt))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .wrap()
                .selectable(false),
            );
        }),
        Some(ImageSlot::Loading) | None => placeholder(ui, max, |ui| {
            ui.add(egui::Spinner::new().size(14.0).color(theme::TEXT_DIM));
        }),
    }
}

fn placeholder(
    ui: &mut egui::Ui,
    size: egui::Vec2,
    contents: impl FnOnce(&mut egui::Ui),
) -> egui::Response {
    theme::placeholder_frame()
        .show(ui, |ui| {
            ui.set_min_size(size);
            ui.set_max_size(size);
            ui.centered_and_justified(contents);
        })
        .response
}

/// Detail body: title, description, then photo if any. Nothing else is shown.
pub fn content_detail(ui: &mut egui::Ui, content: &Content, photo_slot: Option<&ImageSlot>) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(&content.title)
                .size(theme::FONT_TITLE)
                .strong()
                .color(theme::TEXT_PRIMARY),
        )
        .wrap(),
    );
    ui.add_space(theme::SPACING_MD);
    ui.add(
        egui::Label::new(
            egui::RichText::new(&content.description)
                .size(theme::FONT_BODY)
                .color(theme::TEXT_SECONDARY),
        )
        .wrap(),
    );

    if content.has_photo() {
        ui.add_space(theme::SPACING_LG);
        let max = egui::vec2(ui.available_width(), ui.available_width() * 1.5);
        photo(ui, photo_slot, max, &crate::browser::photo_alt(&content.title));
    }
}

/// Muted centered message for empty or idle states.
pub fn empty_state(ui: &mut egui::Ui, icon: &str, text: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        ui.add(
            egui::Label::new(egui::RichText::new(icon).size(32.0).color(theme::TEXT_DIM))
                .selectable(false),
        );
        ui.add_space(theme::SPACING_SM);
        ui.add(
            egui::Label::new(
                egui::RichText::new(text)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_MUTED),
            )
            .selectable(false),
        );
    });
}
