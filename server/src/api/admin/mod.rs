//! Admin console routes (require the `admin` role)

pub mod cache;
pub mod catalog;
pub mod languages;
pub mod orders;
pub mod ui_sections;
