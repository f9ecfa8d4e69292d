//! Product / variant / limit grid

use eframe::egui;

use crate::gui::constants::*;
use crate::view::{sanitize_limit_input, LimitEdit, RowView, TableView};

/// Renders the limits grid and returns the edits made this frame
pub fn ui(ui: &mut egui::Ui, table: &TableView) -> Vec<LimitEdit> {
    let mut edits = Vec::new();

    egui::Grid::new("limits_table")
        .num_columns(3)
        .striped(true)
        .spacing([SECTION_SPACING, ITEM_SPACING])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Product").strong());
            ui.label(egui::RichText::new("Variant").strong());
            ui.label(egui::RichText::new("Limit").strong());
            ui.end_row();

            for row in &table.rows {
                product_cell(ui, row);
                variant_cell(ui, row);
                if let Some(edit) = limit_cell(ui, row) {
                    edits.push(edit);
                }
                ui.end_row();
            }
        });

    edits
}

fn product_cell(ui: &mut egui::Ui, row: &RowView) {
    let Some(product) = &row.product else {
        ui.label("");
        return;
    };

    ui.horizontal(|ui| {
        if let Some(url) = &product.thumbnail_url {
            ui.label(THUMBNAIL_GLYPH).on_hover_text(url);
        }
        ui.vertical(|ui| {
            ui.label(&product.title);
            if let Some(caption) = &product.caption {
                ui.label(egui::RichText::new(caption).small().color(CAPTION_COLOR));
            }
        });
    });
}

fn variant_cell(ui: &mut egui::Ui, row: &RowView) {
    ui.horizontal(|ui| {
        if let Some(url) = &row.variant_thumbnail_url {
            ui.label(THUMBNAIL_GLYPH).on_hover_text(url);
        }
        ui.label(&row.variant_title);
    });
}

fn limit_cell(ui: &mut egui::Ui, row: &RowView) -> Option<LimitEdit> {
    let field = &row.field;
    let mut text = field.value.clone();

    let response = ui
        .add(
            egui::TextEdit::singleline(&mut text)
                .id_salt(&field.name)
                .hint_text(field.placeholder)
                .desired_width(LIMIT_FIELD_WIDTH),
        )
        .on_hover_text(&field.label);

    if !response.changed() {
        return None;
    }

    let value = sanitize_limit_input(&text);
    (value != field.value).then(|| LimitEdit {
        variant_id: row.variant_id.clone(),
        value,
    })
}
