//! Request types sent from the editor to its host

use serde::{Deserialize, Serialize};

/// Requests the editor issues against the remote validation object
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Look up the metafield definition for a namespace/key pair
    GetDefinition { namespace: String, key: String },

    /// Declare the persistence slot
    CreateDefinition(DefinitionInput),

    /// Read the current value stored in the slot
    ReadMetafield { namespace: String, key: String },

    /// First page of the product catalog
    FetchProducts { first: usize, variants_first: usize },

    /// Replace the value stored in the slot (never a patch)
    UpdateMetafield {
        namespace: String,
        key: String,
        value: String,
    },
}

/// Metafield definition as declared to the host
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionInput {
    pub access: DefinitionAccess,
    pub key: String,
    pub name: String,
    pub namespace: String,
    pub owner_type: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

/// Read/write grants on the definition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DefinitionAccess {
    pub admin: String,
}
