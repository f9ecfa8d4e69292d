//! Editor session start-up
//!
//! Provision the slot, load the persisted document and read the catalog.
//! Only provisioning and transport failures abort; an unreadable document
//! just starts the session empty.

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{fetch_products, Product};
use crate::config::EditorConfig;
use crate::document::{decode, ConfigurationDocument};
use crate::host::Host;
use crate::persistence::read_configuration;
use crate::projector::{project, DisplayRow};
use crate::provisioning::ensure_definition;

pub struct Session {
    pub definition_id: String,
    pub document: ConfigurationDocument,
    pub products: Vec<Product>,
}

impl Session {
    pub async fn start<H: Host + ?Sized>(host: &H, config: &EditorConfig) -> Result<Self> {
        let definition_id = ensure_definition(host)
            .await
            .context("Failed to provision the limits metafield")?;

        let raw = read_configuration(host).await?;
        let document = decode(raw.as_deref());
        if document.is_empty() {
            info!("No limits configured yet");
        }

        let products = fetch_products(host, config.product_page_size, config.variant_page_size).await?;

        info!(
            definition = %definition_id,
            limits = document.len(),
            products = products.len(),
            "Session started"
        );

        Ok(Self {
            definition_id,
            document,
            products,
        })
    }

    pub fn rows(&self) -> Vec<DisplayRow<'_>> {
        project(&self.products)
    }
}
