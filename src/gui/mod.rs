//! Limits editor GUI

mod components;
mod constants;
mod manager;

pub use manager::run_gui;
