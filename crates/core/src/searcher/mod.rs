//! Torrent search abstraction.
//!
//! A [`Searcher`] turns a free-text query into a finite list of
//! [`SearchHit`]s. [`JackettSearcher`] queries a Jackett server.

mod dedup;
mod jackett;
mod types;

pub use dedup::deduplicate_hits;
pub use jackett::JackettSearcher;
pub use types::*;
