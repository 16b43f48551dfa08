//! Photo harvesting for vehicle listings.
//!
//! Stimulates lazy-loading galleries through the browser layer, collects
//! and filters photo URLs from the page snapshot, and downloads them into
//! per-listing folders.

pub mod download;
pub mod error;
pub mod images;
pub mod stimulate;

pub use download::{download_images, folder_name, DownloadReport};
pub use error::{HarvestError, Result};
pub use images::harvest_images;
pub use stimulate::{prepare_page, settle_page, stimulate_gallery};
