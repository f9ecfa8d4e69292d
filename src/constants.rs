//! Application-wide constants
//!
//! Names of the persistence slot, catalog paging defaults and the
//! display strings shared between the projector and the editor.

/// Persistence slot on the remote validation object
pub mod metafield {
    /// Namespace owned by this app
    pub const NAMESPACE: &str = "$app:product-limits";

    /// Key of the configuration blob inside the namespace
    pub const KEY: &str = "product-limits-values";

    /// Human-readable definition name shown in the admin
    pub const DEFINITION_NAME: &str = "Validation Configuration";

    /// Owner classification of the definition
    pub const OWNER_TYPE: &str = "VALIDATION";

    /// Value type: structured text
    pub const VALUE_TYPE: &str = "json";

    /// Admin access grant
    pub const ADMIN_ACCESS: &str = "MERCHANT_READ_WRITE";
}

/// Catalog read limits
pub mod catalog {
    /// Products fetched per session
    pub const PRODUCT_PAGE_SIZE: usize = 8;

    /// Variants fetched per product
    pub const VARIANT_PAGE_SIZE: usize = 4;

    /// Title the catalog gives the only variant of a product without options
    pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";
}

/// Strings rendered by the editor
pub mod display {
    /// Title shown for the synthetic row of a single-variant product
    pub const DEFAULT_ROW_TITLE: &str = "Default";

    pub const NO_PRODUCTS: &str = "No products found.";

    pub const ERROR_HEADING: &str = "Error";

    pub const LIMIT_PLACEHOLDER: &str = "Set limit";
}

/// Config file location
pub mod config {
    /// Directory under the platform config/data dirs
    pub const APP_DIR: &str = "product-limits-editor";

    pub const FILENAME: &str = "config.json";

    pub const STORE_FILENAME: &str = "store.json";

    pub const CATALOG_FILENAME: &str = "catalog.json";
}
