pub mod error_banner;
pub mod limits_table;
