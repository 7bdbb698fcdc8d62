//! # feedlead
//!
//! A browser-driven group feed crawler built on the Chrome DevTools
//! Protocol (CDP). It restores an authenticated social-platform session
//! from stored cookies (logging in again when the session has expired),
//! scrolls each subscribed group's feed until enough posts have rendered,
//! parses every post into a structured lead, and returns only the leads
//! newer than each group's watermark.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedlead::{Account, CrawlConfig, Crawler};
//!
//! # fn main() -> feedlead::Result<()> {
//! let account: Account = serde_json::from_str(r#"{
//!     "username": "alice@example.com",
//!     "password": "hunter2",
//!     "groups": [{"group_link": "https://www.example-network.com/groups/42"}]
//! }"#).expect("valid account JSON");
//!
//! let mut crawler = Crawler::new(CrawlConfig::new("https://www.example-network.com/"));
//! let report = crawler.crawl(&account)?;
//!
//! for (group, leads) in &report.posts {
//!     println!("{}: {} new leads", group, leads.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome session launch, proxying and CDP helpers
//! - [`auth`]: cookie restore, login-wall detection and fallback login
//! - [`feed`]: scroll-and-expand pagination over a group feed
//! - [`parse`]: the structural post parser behind the [`PostParser`] trait
//! - [`watermark`]: truncation of lead lists at a group's watermark
//! - [`crawler`]: per-account orchestration producing a [`CrawlReport`]
//! - [`error`]: error types and result alias
//!
//! The feed markup carries no semantic class names, so [`parse`] works
//! purely off node structure. That makes the parser a versioned strategy:
//! when the platform ships a new markup revision, implement [`PostParser`]
//! for it and plug it in via [`Crawler::with_parts`].

pub mod account;
pub mod auth;
pub mod browser;
pub mod crawler;
pub mod error;
pub mod feed;
pub mod lead;
pub mod parse;
pub mod timing;
pub mod watermark;

pub use account::{Account, Group, SessionCookie};
pub use browser::{BrowserConfig, BrowserSession};
pub use crawler::{CrawlConfig, CrawlReport, Crawler, FeedResult};
pub use error::{CrawlError, Result};
pub use feed::{Collected, FeedPaginator, PaginationConfig};
pub use lead::{Lead, LeadSet, NO_TEXT_SENTINEL};
pub use parse::{PostParser, StructuralPostParser};
pub use timing::{FixedJitter, JitterSource, SystemJitter};
pub use watermark::truncate_at_watermark;
