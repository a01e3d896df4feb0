//! Item data model.
//!
//! An [`Item`] is a torrent discovered by a search. Once a download starts
//! it carries the latest [`DownloadStatus`] reported for it.

mod metrics;
mod record;
mod types;

pub use metrics::{compute_eta, format_rate, format_size, parse_size};
pub use types::*;
