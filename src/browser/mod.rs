//! Browser session management
//!
//! Wraps a Chrome/Chromium instance driven over the Chrome DevTools
//! Protocol. One [`BrowserSession`] is acquired per account crawl and
//! released when it goes out of scope, including on error paths.

pub mod config;
pub mod session;

pub use config::BrowserConfig;
pub use session::BrowserSession;
