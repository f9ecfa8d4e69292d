//! Critical banners for the current error set

use eframe::egui;

use crate::gui::constants::*;
use crate::view::Banner;

/// Renders one banner per error; nothing when there are none
pub fn ui(ui: &mut egui::Ui, banners: &[Banner]) {
    if banners.is_empty() {
        return;
    }

    for banner in banners {
        egui::Frame::new()
            .fill(BANNER_FILL)
            .inner_margin(PADDING)
            .corner_radius(4.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(banner.heading).strong().color(BANNER_TEXT));
                ui.label(egui::RichText::new(&banner.message).color(BANNER_TEXT));
            });
        ui.add_space(ITEM_SPACING);
    }
}
