//! Feed pagination
//!
//! Drives a group feed page until enough distinct posts have rendered:
//! scroll a step, wait out the lazy loader, expand collapsed content,
//! re-parse the document and fold the new posts into the accumulated lead
//! set. All UI interactions along the way are best effort; the page
//! re-parse is the only step allowed to fail the collection.

pub mod interaction;
pub mod paginator;

pub use paginator::{Collected, FeedPaginator, PaginationConfig};
