//! Context menu for list rows

use super::views::RowData;
use super::App;
use crate::theme;
use crate::utils::truncate_chars;
use eframe::egui;

pub(crate) struct RowAction {
    pub show_detail: bool,
}

impl App {
    pub(crate) fn row_context_menu(&self, ui: &mut egui::Ui, row: &RowData) -> RowAction {
        let mut action = RowAction { show_detail: false };
        ui.spacing_mut().item_spacing.y = 2.0;

        let detail_label = format!("Show \"{}\"", truncate_chars(&row.title, 24));
        let mut labels = vec![detail_label.as_str(), "Copy title", "Copy id"];
        if row.thumb.is_some() {
            labels.push("Copy photo URL");
        }
        let labels: Vec<String> = labels
            .iter()
            .map(|l| format!("{}  {}", egui_phosphor::regular::EYE, l))
            .collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        theme::set_menu_width(ui, &label_refs);

        if theme::menu_item(ui, egui_phosphor::regular::EYE, &detail_label) {
            action.show_detail = true;
            ui.close_menu();
        }
        ui.separator();
        if theme::menu_item(ui, egui_phosphor::regular::COPY, "Copy title") {
            ui.ctx().copy_text(row.title.clone());
            ui.close_menu();
        }
        if theme::menu_item(ui, egui_phosphor::regular::HASH, "Copy id") {
            ui.ctx().copy_text(row.id.clone());
            ui.close_menu();
        }
        if let Some(url) = &row.thumb {
            if theme::menu_item(ui, egui_phosphor::regular::LINK, "Copy photo URL") {
                ui.ctx().copy_text(url.clone());
                ui.close_menu();
            }
        }

        action
    }
}
