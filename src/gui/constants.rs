//! GUI-specific constants for layout, colors and intervals

/// Editor window minimum size
pub const WINDOW_MIN_WIDTH: f32 = 520.0;
pub const WINDOW_MIN_HEIGHT: f32 = 360.0;

/// Layout spacing
pub const PADDING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Limits table
pub const LIMIT_FIELD_WIDTH: f32 = 90.0;
pub const THUMBNAIL_GLYPH: &str = "\u{1F5BC}";

/// Banner colors (critical tone)
pub const BANNER_FILL: egui::Color32 = egui::Color32::from_rgb(90, 20, 20);
pub const BANNER_TEXT: egui::Color32 = egui::Color32::from_rgb(255, 200, 200);

/// Secondary text such as the "N variants" caption
pub const CAPTION_COLOR: egui::Color32 = egui::Color32::GRAY;

/// Outcome polling while a save is in flight
pub const OUTCOME_POLL_INTERVAL_MS: u64 = 100;
