//! Product catalog as read from the host
//!
//! Products and variants are owned by the catalog; the editor only reads them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::host::{Host, HostRequest};

/// A purchasable configuration of a product
///
/// Ids are unique across the whole catalog, not only within one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[cfg(test)]
impl Variant {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: None,
        }
    }
}

#[cfg(test)]
impl Product {
    pub fn new(title: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self {
            title: title.into(),
            featured_image_url: None,
            variants,
        }
    }
}

// Response shape of the products query
#[derive(Deserialize)]
struct ProductsResponse {
    data: Option<ProductsData>,
}

#[derive(Deserialize)]
struct ProductsData {
    products: Option<Nodes<ProductNode>>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Nodes<T> {
    #[serde(default)]
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    title: String,
    featured_media: Option<MediaNode>,
    variants: Option<Nodes<VariantNode>>,
}

#[derive(Deserialize)]
struct MediaNode {
    preview: Option<PreviewNode>,
}

#[derive(Deserialize)]
struct PreviewNode {
    image: Option<ImageNode>,
}

#[derive(Deserialize)]
struct ImageNode {
    url: String,
}

#[derive(Deserialize)]
struct VariantNode {
    id: String,
    title: String,
    image: Option<ImageNode>,
}

impl From<ProductNode> for Product {
    fn from(node: ProductNode) -> Self {
        Self {
            title: node.title,
            featured_image_url: node
                .featured_media
                .and_then(|media| media.preview)
                .and_then(|preview| preview.image)
                .map(|image| image.url),
            variants: node
                .variants
                .map(|variants| variants.nodes.into_iter().map(Variant::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<VariantNode> for Variant {
    fn from(node: VariantNode) -> Self {
        Self {
            id: node.id,
            title: node.title,
            image_url: node.image.map(|image| image.url),
        }
    }
}

/// Fetch the first page of products with their first variants
pub async fn fetch_products<H: Host + ?Sized>(
    host: &H,
    first: usize,
    variants_first: usize,
) -> Result<Vec<Product>> {
    let response = host
        .query(HostRequest::FetchProducts { first, variants_first })
        .await
        .context("Failed to fetch products")?;

    let parsed: ProductsResponse =
        serde_json::from_value(response).context("Failed to parse products response")?;

    let Some(products) = parsed.data.and_then(|data| data.products) else {
        warn!("Products response carried no product list, showing empty catalog");
        return Ok(Vec::new());
    };

    let products: Vec<Product> = products.nodes.into_iter().map(Product::from).collect();
    info!(count = products.len(), "Fetched product catalog");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::ScriptedHost;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_products_maps_nested_nodes() {
        let host = ScriptedHost::new(|_| {
            Ok(json!({
                "data": {"products": {"nodes": [
                    {
                        "title": "Snowboard",
                        "featuredMedia": {"preview": {"image": {"url": "https://cdn.example/board.png"}}},
                        "variants": {"nodes": [
                            {"id": "gid://shopify/ProductVariant/1", "title": "Small", "image": null},
                            {"id": "gid://shopify/ProductVariant/2", "title": "Large",
                             "image": {"url": "https://cdn.example/large.png"}}
                        ]}
                    },
                    {"title": "Gift card", "featuredMedia": null, "variants": {"nodes": []}}
                ]}}
            }))
        });

        let products = fetch_products(&host, 8, 4).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].featured_image_url.as_deref(), Some("https://cdn.example/board.png"));
        assert_eq!(products[0].variants[0], Variant::new("gid://shopify/ProductVariant/1", "Small"));
        assert_eq!(products[0].variants[1].image_url.as_deref(), Some("https://cdn.example/large.png"));
        assert!(products[1].featured_image_url.is_none());
        assert!(products[1].variants.is_empty());

        assert_eq!(
            host.recorded(),
            vec![HostRequest::FetchProducts { first: 8, variants_first: 4 }]
        );
    }

    #[tokio::test]
    async fn test_fetch_products_without_data_is_empty() {
        let host = ScriptedHost::new(|_| Ok(json!({"errors": [{"message": "throttled"}]})));
        assert!(fetch_products(&host, 8, 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_products_transport_error_propagates() {
        let host = ScriptedHost::new(|_| Err(anyhow::anyhow!("connection reset")));
        let err = fetch_products(&host, 8, 4).await.unwrap_err();
        assert!(format!("{err:#}").contains("connection reset"));
    }
}
