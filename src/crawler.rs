use crate::account::{Account, SessionCookie};
use crate::auth::SessionManager;
use crate::browser::{BrowserConfig, BrowserSession};
use crate::error::Result;
use crate::feed::{FeedPaginator, PaginationConfig};
use crate::lead::Lead;
use crate::parse::{PostParser, StructuralPostParser};
use crate::timing::{JitterSource, SystemJitter};
use crate::watermark::truncate_at_watermark;
use serde::Serialize;
use std::collections::BTreeMap;

/// Leads per group feed address, newest first.
pub type FeedResult = BTreeMap<String, Vec<Lead>>;

/// Everything one account crawl produced.
#[derive(Debug, Default, Serialize)]
pub struct CrawlReport {
    /// New leads per group, already truncated at each group's watermark
    pub posts: FeedResult,

    /// Fresh cookie set when the crawl had to log in again; the caller
    /// persists it (or not)
    pub refreshed_cookies: Option<Vec<SessionCookie>>,

    /// Groups whose scroll budget ran out before the requested lead count
    pub partial_groups: Vec<String>,

    /// Groups that never stabilized, with the failure rendered as text.
    /// A failed group does not abort the account's remaining groups.
    pub failed_groups: Vec<(String, String)>,
}

/// Top-level crawl configuration.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Address of the platform's entry page used for session restore
    pub portal_url: String,

    /// Distinct leads to accumulate per group before stopping
    pub min_posts: usize,

    pub browser: BrowserConfig,
    pub pagination: PaginationConfig,
}

impl CrawlConfig {
    pub fn new(portal_url: impl Into<String>) -> Self {
        Self {
            portal_url: portal_url.into(),
            min_posts: 8,
            browser: BrowserConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// Crawls all groups of one account through a single browser session.
///
/// Accounts are independent: callers may run one `Crawler` per account
/// concurrently, each with its own browser and proxy. There is no shared
/// mutable state between them.
pub struct Crawler {
    config: CrawlConfig,
    parser: Box<dyn PostParser>,
    jitter: Box<dyn JitterSource>,
}

impl Crawler {
    /// Crawler with the production parser and RNG-backed jitter.
    pub fn new(config: CrawlConfig) -> Self {
        Self {
            config,
            parser: Box::new(StructuralPostParser),
            jitter: Box::new(SystemJitter),
        }
    }

    /// Crawler with injected parser and jitter source, for tests and for
    /// future markup revisions.
    pub fn with_parts(
        config: CrawlConfig,
        parser: Box<dyn PostParser>,
        jitter: Box<dyn JitterSource>,
    ) -> Self {
        Self {
            config,
            parser,
            jitter,
        }
    }

    /// Run a full crawl for one account: launch the browser through the
    /// account's proxy, restore or establish the session, then walk every
    /// subscribed group. The browser is released when this returns, on
    /// success and on error alike.
    pub fn crawl(&mut self, account: &Account) -> Result<CrawlReport> {
        let mut browser_config = self.config.browser.clone();
        browser_config.proxy_url = account.proxy_url.clone();

        let session = BrowserSession::launch(&browser_config)?;
        session.assert_not_automated()?;

        let manager = SessionManager::new(
            &self.config.portal_url,
            self.config.pagination.wait_base,
            self.config.pagination.wait_jitter,
        );
        let auth = manager.authorize(&session, account, self.jitter.as_mut())?;

        let mut report = CrawlReport {
            refreshed_cookies: auth.refreshed_cookies,
            ..Default::default()
        };

        let paginator = FeedPaginator::new(&session, self.parser.as_ref(), &self.config.pagination);

        for group in &account.groups {
            match Self::crawl_group(&paginator, group, self.config.min_posts, self.jitter.as_mut())
            {
                Ok((leads, complete)) => {
                    if !complete {
                        report.partial_groups.push(group.group_link.clone());
                    }
                    report.posts.insert(group.group_link.clone(), leads);
                }
                Err(e) => {
                    log::error!("group {} failed: {}", group.group_link, e);
                    report
                        .failed_groups
                        .push((group.group_link.clone(), e.to_string()));
                    report.posts.insert(group.group_link.clone(), Vec::new());
                }
            }
        }

        Ok(report)
    }

    fn crawl_group(
        paginator: &FeedPaginator<'_>,
        group: &crate::account::Group,
        min_posts: usize,
        jitter: &mut dyn JitterSource,
    ) -> Result<(Vec<Lead>, bool)> {
        paginator.open(&group.group_link, jitter)?;
        let collected = paginator.collect(min_posts, jitter)?;

        let leads = truncate_at_watermark(collected.leads, group.last_post_link.as_deref());
        Ok((leads, collected.complete))
    }
}
