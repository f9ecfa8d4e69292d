//! Display model for the editor
//!
//! Pure data derived from the rows, the document and the error set. The
//! GUI draws it without looking at the store directly.

use crate::constants::display::{ERROR_HEADING, LIMIT_PLACEHOLDER, NO_PRODUCTS};
use crate::document::ConfigurationDocument;
use crate::projector::DisplayRow;
use crate::store::ErrorSet;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorView {
    /// Nothing to configure
    Empty { message: &'static str },
    Table(TableView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub banners: Vec<Banner>,
    pub rows: Vec<RowView>,
}

/// Critical banner for one error message
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub heading: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: String,
    pub variant_id: String,
    /// Only on the first row of each product
    pub product: Option<ProductCell>,
    pub variant_title: String,
    pub variant_thumbnail_url: Option<String>,
    pub field: LimitField,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCell {
    pub title: String,
    pub thumbnail_url: Option<String>,
    /// "N variants", shown when there is more than one
    pub caption: Option<String>,
}

/// Number input bound to one variant's limit
#[derive(Debug, Clone, PartialEq)]
pub struct LimitField {
    pub name: String,
    pub label: String,
    pub placeholder: &'static str,
    pub value: String,
}

/// An edit made in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitEdit {
    pub variant_id: String,
    pub value: String,
}

pub fn build_view(
    rows: &[DisplayRow<'_>],
    document: &ConfigurationDocument,
    errors: &ErrorSet,
) -> EditorView {
    if rows.is_empty() {
        return EditorView::Empty {
            message: NO_PRODUCTS,
        };
    }

    let banners = errors
        .messages()
        .iter()
        .map(|message| Banner {
            heading: ERROR_HEADING,
            message: message.clone(),
        })
        .collect();

    let rows = rows
        .iter()
        .map(|row| RowView {
            key: row.key(),
            variant_id: row.variant_id.to_string(),
            product: row.is_first_variant.then(|| ProductCell {
                title: row.product.title.clone(),
                thumbnail_url: row.product.featured_image_url.clone(),
                caption: (row.variant_count > 1).then(|| format!("{} variants", row.variant_count)),
            }),
            variant_title: row.variant_title.to_string(),
            variant_thumbnail_url: row.variant_image_url.map(str::to_string),
            field: LimitField {
                name: format!("{}-number", row.variant_id),
                label: format!("Set a limit for {}, {}", row.product.title, row.variant_title),
                placeholder: LIMIT_PLACEHOLDER,
                value: document
                    .get(row.variant_id)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            },
        })
        .collect();

    EditorView::Table(TableView { banners, rows })
}

/// Keep only what a non-negative integer field accepts
pub fn sanitize_limit_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
