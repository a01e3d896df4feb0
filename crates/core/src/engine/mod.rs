//! Download engine abstraction.
//!
//! A [`DownloadEngine`] performs the actual transfer for a locator and
//! reports [`EngineSnapshot`]s through a bounded channel until the download
//! finishes.

mod librqbit;
mod types;

pub use self::librqbit::LibrqbitEngine;
pub use types::*;
