//! Limits editor window implemented with egui/eframe

use std::time::Duration;

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::info;

use super::components::{error_banner, limits_table};
use super::constants::*;
use crate::catalog::Product;
use crate::config::EditorConfig;
use crate::editor::EditorState;
use crate::projector::project;
use crate::session::Session;
use crate::view::{build_view, EditorView};
use crate::worker::PersistenceHandle;

struct LimitsEditorApp {
    products: Vec<Product>,
    editor: EditorState,
}

impl LimitsEditorApp {
    fn new(_cc: &CreationContext<'_>, session: Session, persistence: PersistenceHandle) -> Self {
        info!(
            products = session.products.len(),
            limits = session.document.len(),
            "Initializing limits editor"
        );
        Self {
            products: session.products,
            editor: EditorState::new(session.document, persistence),
        }
    }
}

impl eframe::App for LimitsEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.editor.poll_outcomes();

        let mut edits = Vec::new();
        let mut save_clicked = false;

        egui::TopBottomPanel::bottom("actions").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                if ui.button("\u{1F4BE} Save").clicked() {
                    save_clicked = true;
                }
                if self.editor.is_saving() {
                    ui.spinner();
                    ui.label("Saving...");
                }
            });
            ui.add_space(ITEM_SPACING);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            ui.heading("Product Limits");
            ui.add_space(SECTION_SPACING);

            let rows = project(&self.products);
            match build_view(&rows, self.editor.store().document(), self.editor.store().errors()) {
                EditorView::Empty { message } => {
                    ui.label(message);
                }
                EditorView::Table(table) => {
                    error_banner::ui(ui, &table.banners);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        edits = limits_table::ui(ui, &table);
                    });
                }
            }
        });

        for edit in edits {
            self.editor.apply_edit(edit);
        }
        if save_clicked {
            self.editor.save();
        }

        if self.editor.is_saving() {
            ctx.request_repaint_after(Duration::from_millis(OUTCOME_POLL_INTERVAL_MS));
        }
    }
}

pub fn run_gui(session: Session, persistence: PersistenceHandle, config: &EditorConfig) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([f32::from(config.window_width), f32::from(config.window_height)])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Product Limits"),
        ..Default::default()
    };

    eframe::run_native(
        "Product Limits",
        options,
        Box::new(|cc| Ok(Box::new(LimitsEditorApp::new(cc, session, persistence)))),
    )
    .map_err(|err| anyhow!("Failed to launch limits editor: {err}"))
}
