//! Train wagon defect detection dashboard.
//!
//! Uploads a wagon image to the detection service, shows the defects it
//! reports and saves the original and annotated images locally.

pub mod api;
pub mod app;
pub mod config;
pub mod download;
pub mod error;
pub mod upload;
pub mod utils;
