//! Persistence slot provisioning
//!
//! The metafield definition must exist before the first write. Looking it
//! up and creating it when missing is idempotent; any failure here stops
//! the session before an editor is shown.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::constants::metafield;
use crate::host::{DefinitionAccess, DefinitionInput, Host, HostRequest};

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("Failed to look up metafield definition: {0:#}")]
    Lookup(anyhow::Error),

    #[error("Failed to create metafield definition: {0:#}")]
    Create(anyhow::Error),

    #[error("Failed to create metafield definition{}", format_user_errors(.user_errors))]
    NotCreated { user_errors: Vec<String> },
}

fn format_user_errors(user_errors: &[String]) -> String {
    if user_errors.is_empty() {
        String::new()
    } else {
        format!(": {}", user_errors.join("; "))
    }
}

/// Definition of the limits slot
pub fn limits_definition() -> DefinitionInput {
    DefinitionInput {
        access: DefinitionAccess {
            admin: metafield::ADMIN_ACCESS.to_string(),
        },
        key: metafield::KEY.to_string(),
        name: metafield::DEFINITION_NAME.to_string(),
        namespace: metafield::NAMESPACE.to_string(),
        owner_type: metafield::OWNER_TYPE.to_string(),
        value_type: metafield::VALUE_TYPE.to_string(),
    }
}

/// Make sure the limits slot exists; returns its definition id
pub async fn ensure_definition<H: Host + ?Sized>(host: &H) -> Result<String, ProvisioningError> {
    let lookup = host
        .query(HostRequest::GetDefinition {
            namespace: metafield::NAMESPACE.to_string(),
            key: metafield::KEY.to_string(),
        })
        .await
        .map_err(ProvisioningError::Lookup)?;

    if let Some(id) = string_at(&lookup, "/data/metafieldDefinitions/nodes/0/id") {
        info!(id = %id, "Found existing metafield definition");
        return Ok(id);
    }

    info!(namespace = metafield::NAMESPACE, key = metafield::KEY, "Creating metafield definition");
    let created = host
        .query(HostRequest::CreateDefinition(limits_definition()))
        .await
        .map_err(ProvisioningError::Create)?;

    match string_at(&created, "/data/metafieldDefinitionCreate/createdDefinition/id") {
        Some(id) => {
            info!(id = %id, "Created metafield definition");
            Ok(id)
        }
        None => {
            let user_errors: Vec<String> = created
                .pointer("/data/metafieldDefinitionCreate/userErrors")
                .and_then(Value::as_array)
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(|e| e.get("message").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            error!(user_errors = ?user_errors, "Metafield definition was not created");
            Err(ProvisioningError::NotCreated { user_errors })
        }
    }
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_string)
}
