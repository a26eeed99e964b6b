//! Client for a transaction spreadsheet analysis backend: uploads the
//! spreadsheets, hands the returned report across the page boundary, and
//! renders it as structured HTML.

pub mod alert;
pub mod api;
pub mod logging;
pub mod pages;
pub mod render;
pub mod report;
pub mod state;
pub mod transfer;
pub mod upload;
