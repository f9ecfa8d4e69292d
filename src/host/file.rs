//! File-backed host
//!
//! Simulates the remote validation object with two JSON files: a store
//! holding metafield definitions and values, and a read-only catalog.

use anyhow::{Context, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{DefinitionInput, Host, HostRequest};
use crate::catalog::Product;

/// Host over a store file and a catalog file
pub struct FileHost {
    store_path: PathBuf,
    catalog_path: PathBuf,
    /// Serializes read-modify-write cycles on the store file
    lock: Mutex<()>,
}

/// On-disk layout of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    definitions: Vec<StoredDefinition>,
    /// `namespace.key` → raw value
    #[serde(default)]
    metafields: IndexMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDefinition {
    id: String,
    #[serde(flatten)]
    input: DefinitionInput,
}

impl StoreFile {
    fn find_definition(&self, namespace: &str, key: &str) -> Option<&StoredDefinition> {
        self.definitions
            .iter()
            .find(|d| d.input.namespace == namespace && d.input.key == key)
    }
}

impl FileHost {
    pub fn new(store_path: PathBuf, catalog_path: PathBuf) -> Self {
        Self {
            store_path,
            catalog_path,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl Host for FileHost {
    async fn query(&self, request: HostRequest) -> Result<Value> {
        debug!(request = ?request, "FileHost query");
        let _guard = self.lock.lock().await;
        let store_path = self.store_path.clone();
        let catalog_path = self.catalog_path.clone();
        tokio::task::spawn_blocking(move || handle_request(&store_path, &catalog_path, request))
            .await
            .context("FileHost worker task failed")?
    }
}

fn handle_request(store_path: &Path, catalog_path: &Path, request: HostRequest) -> Result<Value> {
    match request {
        HostRequest::GetDefinition { namespace, key } => {
            let store = read_store(store_path)?;
            let nodes: Vec<Value> = store
                .find_definition(&namespace, &key)
                .map(|definition| json!({ "id": definition.id }))
                .into_iter()
                .collect();
            Ok(json!({ "data": { "metafieldDefinitions": { "nodes": nodes } } }))
        }

        HostRequest::CreateDefinition(input) => {
            let mut store = read_store(store_path)?;
            if store.find_definition(&input.namespace, &input.key).is_some() {
                warn!(namespace = %input.namespace, key = %input.key, "Definition already exists");
                return Ok(json!({ "data": { "metafieldDefinitionCreate": {
                    "createdDefinition": null,
                    "userErrors": [{ "message": format!(
                        "Key is in use for {} metafields on the '{}' namespace.",
                        input.owner_type, input.namespace
                    ) }]
                } } }));
            }

            let id = format!("gid://shopify/MetafieldDefinition/{}", store.definitions.len() + 1);
            info!(id = %id, namespace = %input.namespace, key = %input.key, "Created metafield definition");
            store.definitions.push(StoredDefinition {
                id: id.clone(),
                input,
            });
            write_store(store_path, &store)?;
            Ok(json!({ "data": { "metafieldDefinitionCreate": {
                "createdDefinition": { "id": id },
                "userErrors": []
            } } }))
        }

        HostRequest::ReadMetafield { namespace, key } => {
            let store = read_store(store_path)?;
            Ok(match store.metafields.get(&slot_key(&namespace, &key)) {
                Some(value) => json!({ "value": value }),
                None => json!({}),
            })
        }

        HostRequest::FetchProducts { first, variants_first } => {
            let products = read_catalog(catalog_path)?;
            let nodes: Vec<Value> = products
                .iter()
                .take(first)
                .map(|product| product_node(product, variants_first))
                .collect();
            Ok(json!({ "data": { "products": { "nodes": nodes } } }))
        }

        HostRequest::UpdateMetafield { namespace, key, value } => {
            Ok(update_metafield(store_path, &namespace, &key, value))
        }
    }
}

/// Apply a full replacement; rejections are reported in the response body
fn update_metafield(store_path: &Path, namespace: &str, key: &str, value: String) -> Value {
    let mut store = match read_store(store_path) {
        Ok(store) => store,
        Err(e) => return error_response(format!("{e:#}")),
    };

    let Some(definition) = store.find_definition(namespace, key) else {
        return error_response(format!("No metafield definition exists for {namespace}.{key}"));
    };

    if definition.input.value_type == crate::constants::metafield::VALUE_TYPE
        && let Err(e) = serde_json::from_str::<Value>(&value)
    {
        return error_response(format!("Value must be valid JSON: {e}"));
    }

    store.metafields.insert(slot_key(namespace, key), value);
    match write_store(store_path, &store) {
        Ok(()) => json!({ "type": "success" }),
        Err(e) => error_response(format!("{e:#}")),
    }
}

fn error_response(message: String) -> Value {
    warn!(message = %message, "Rejecting metafield update");
    json!({ "type": "error", "message": message })
}

fn slot_key(namespace: &str, key: &str) -> String {
    format!("{namespace}.{key}")
}

fn product_node(product: &Product, variants_first: usize) -> Value {
    let variants: Vec<Value> = product
        .variants
        .iter()
        .take(variants_first)
        .map(|variant| {
            json!({
                "id": variant.id,
                "title": variant.title,
                "image": variant.image_url.as_ref().map(|url| json!({ "url": url })),
            })
        })
        .collect();

    json!({
        "title": product.title,
        "featuredMedia": product
            .featured_image_url
            .as_ref()
            .map(|url| json!({ "preview": { "image": { "url": url } } })),
        "variants": { "nodes": variants },
    })
}

fn read_store(path: &Path) -> Result<StoreFile> {
    if !path.exists() {
        return Ok(StoreFile::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse store at {}", path.display()))
}

fn write_store(path: &Path, store: &StoreFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create store directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(store).context("Failed to serialize store")?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write store to {}", path.display()))
}

fn read_catalog(path: &Path) -> Result<Vec<Product>> {
    if !path.exists() {
        warn!(path = %path.display(), "Catalog file not found, serving empty catalog");
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalog at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Variant;
    use crate::host::DefinitionAccess;
    use tempfile::TempDir;

    fn host_in(dir: &TempDir) -> FileHost {
        FileHost::new(dir.path().join("store.json"), dir.path().join("catalog.json"))
    }

    fn definition(namespace: &str, key: &str) -> DefinitionInput {
        DefinitionInput {
            access: DefinitionAccess {
                admin: "MERCHANT_READ_WRITE".to_string(),
            },
            key: key.to_string(),
            name: "Validation Configuration".to_string(),
            namespace: namespace.to_string(),
            owner_type: "VALIDATION".to_string(),
            value_type: "json".to_string(),
        }
    }

    fn update(value: &str) -> HostRequest {
        HostRequest::UpdateMetafield {
            namespace: "ns".to_string(),
            key: "limits".to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let host = host_in(&dir);

        let definitions = host
            .query(HostRequest::GetDefinition {
                namespace: "ns".to_string(),
                key: "limits".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(definitions["data"]["metafieldDefinitions"]["nodes"], json!([]));

        let products = host
            .query(HostRequest::FetchProducts { first: 8, variants_first: 4 })
            .await
            .unwrap();
        assert_eq!(products["data"]["products"]["nodes"], json!([]));
    }

    #[tokio::test]
    async fn test_create_then_lookup_definition() {
        let dir = TempDir::new().unwrap();
        let host = host_in(&dir);

        let created = host
            .query(HostRequest::CreateDefinition(definition("ns", "limits")))
            .await
            .unwrap();
        let id = created["data"]["metafieldDefinitionCreate"]["createdDefinition"]["id"].clone();
        assert_eq!(id, json!("gid://shopify/MetafieldDefinition/1"));

        let found = host
            .query(HostRequest::GetDefinition {
                namespace: "ns".to_string(),
                key: "limits".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(found["data"]["metafieldDefinitions"]["nodes"][0]["id"], id);

        let duplicate = host
            .query(HostRequest::CreateDefinition(definition("ns", "limits")))
            .await
            .unwrap();
        assert!(duplicate["data"]["metafieldDefinitionCreate"]["createdDefinition"].is_null());
    }

    #[tokio::test]
    async fn test_update_requires_definition() {
        let dir = TempDir::new().unwrap();
        let host = host_in(&dir);

        let response = host.query(update(r#"{"v1":"5"}"#)).await.unwrap();
        assert_eq!(response["type"], "error");
        assert!(response["message"].as_str().unwrap().contains("ns.limits"));
    }

    #[tokio::test]
    async fn test_update_replaces_value_and_validates_json() {
        let dir = TempDir::new().unwrap();
        let host = host_in(&dir);
        host.query(HostRequest::CreateDefinition(definition("ns", "limits")))
            .await
            .unwrap();

        let ok = host.query(update(r#"{"v1":"5"}"#)).await.unwrap();
        assert_eq!(ok, json!({ "type": "success" }));

        let ok = host.query(update(r#"{"v2":"3"}"#)).await.unwrap();
        assert_eq!(ok["type"], "success");

        let rejected = host.query(update("{broken")).await.unwrap();
        assert_eq!(rejected["type"], "error");

        let read = host
            .query(HostRequest::ReadMetafield {
                namespace: "ns".to_string(),
                key: "limits".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(read["value"], r#"{"v2":"3"}"#);
    }

    #[tokio::test]
    async fn test_fetch_products_applies_page_sizes() {
        let dir = TempDir::new().unwrap();
        let products: Vec<Product> = (1..=3)
            .map(|p| {
                Product::new(
                    format!("Product {p}"),
                    (1..=5).map(|v| Variant::new(format!("p{p}v{v}"), format!("Size {v}"))).collect(),
                )
            })
            .collect();
        fs::write(
            dir.path().join("catalog.json"),
            serde_json::to_string(&products).unwrap(),
        )
        .unwrap();

        let host = host_in(&dir);
        let response = host
            .query(HostRequest::FetchProducts { first: 2, variants_first: 4 })
            .await
            .unwrap();
        let nodes = response["data"]["products"]["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["variants"]["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(nodes[1]["variants"]["nodes"][0]["id"], "p2v1");
        assert!(nodes[0]["featuredMedia"].is_null());
    }

    #[tokio::test]
    async fn test_corrupt_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("store.json"), "not json").unwrap();
        let host = host_in(&dir);

        let lookup = host
            .query(HostRequest::GetDefinition {
                namespace: "ns".to_string(),
                key: "limits".to_string(),
            })
            .await;
        assert!(lookup.is_err());

        // Updates report the failure in-band
        let response = host.query(update("{}")).await.unwrap();
        assert_eq!(response["type"], "error");
    }
}
