//! Flatten the catalog into display rows
//!
//! One row per (product, variant). A product whose only variant is the
//! catalog's placeholder gets a single synthetic "Default" row instead.

use crate::catalog::{Product, Variant};
use crate::constants::{catalog::DEFAULT_VARIANT_TITLE, display::DEFAULT_ROW_TITLE};

/// A row of the limits table, rebuilt on every render
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow<'a> {
    pub product: &'a Product,
    pub variant_id: &'a str,
    pub variant_title: &'a str,
    pub variant_image_url: Option<&'a str>,
    pub is_first_variant: bool,
    pub variant_count: usize,
}

impl DisplayRow<'_> {
    /// Identity for the UI layer
    ///
    /// Not guaranteed unique if two products share a title and a variant id.
    pub fn key(&self) -> String {
        format!("{}-{}", self.product.title, self.variant_id)
    }
}

fn shows_variants(variants: &[Variant]) -> bool {
    match variants {
        [only] => only.title != DEFAULT_VARIANT_TITLE,
        _ => variants.len() > 1,
    }
}

/// Project products into rows, keeping catalog order
///
/// Products without any variant have nothing to configure and yield no row.
pub fn project(products: &[Product]) -> Vec<DisplayRow<'_>> {
    let mut rows = Vec::new();

    for product in products {
        if shows_variants(&product.variants) {
            let variant_count = product.variants.len();
            rows.extend(product.variants.iter().enumerate().map(|(index, variant)| DisplayRow {
                product,
                variant_id: &variant.id,
                variant_title: &variant.title,
                variant_image_url: variant.image_url.as_deref(),
                is_first_variant: index == 0,
                variant_count,
            }));
        } else if let Some(sole) = product.variants.first() {
            rows.push(DisplayRow {
                product,
                variant_id: &sole.id,
                variant_title: DEFAULT_ROW_TITLE,
                variant_image_url: None,
                is_first_variant: true,
                variant_count: 1,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_variant_collapses_to_single_row() {
        let products = vec![Product::new("Gift card", vec![Variant::new("v1", "Default Title")])];
        let rows = project(&products);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].variant_id, "v1");
        assert_eq!(rows[0].variant_title, "Default");
        assert_eq!(rows[0].variant_count, 1);
        assert!(rows[0].is_first_variant);
    }

    #[test]
    fn test_multiple_variants_get_one_row_each() {
        let products = vec![Product::new(
            "Shirt",
            vec![Variant::new("v1", "Small"), Variant::new("v2", "Large")],
        )];
        let rows = project(&products);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_first_variant);
        assert!(!rows[1].is_first_variant);
        assert!(rows.iter().all(|row| row.variant_count == 2));
        assert_eq!(rows[1].variant_title, "Large");
    }

    #[test]
    fn test_single_named_variant_is_shown() {
        let mut variant = Variant::new("v9", "Limited edition");
        variant.image_url = Some("https://cdn.example/v9.png".to_string());
        let products = vec![Product::new("Poster", vec![variant])];
        let rows = project(&products);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].variant_title, "Limited edition");
        assert_eq!(rows[0].variant_image_url, Some("https://cdn.example/v9.png"));
        assert_eq!(rows[0].variant_count, 1);
    }

    #[test]
    fn test_empty_catalog_projects_nothing() {
        assert!(project(&[]).is_empty());
    }

    #[test]
    fn test_product_without_variants_is_skipped() {
        let products = vec![
            Product::new("Empty", Vec::new()),
            Product::new("Mug", vec![Variant::new("m1", "Default Title")]),
        ];
        let rows = project(&products);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product.title, "Mug");
    }

    #[test]
    fn test_rows_keep_catalog_order_and_keys() {
        let products = vec![
            Product::new("B", vec![Variant::new("b1", "Red"), Variant::new("b2", "Blue")]),
            Product::new("A", vec![Variant::new("a1", "Default Title")]),
        ];
        let keys: Vec<String> = project(&products).iter().map(DisplayRow::key).collect();
        assert_eq!(keys, ["B-b1", "B-b2", "A-a1"]);
    }
}
