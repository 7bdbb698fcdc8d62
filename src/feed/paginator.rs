use crate::browser::BrowserSession;
use crate::error::{CrawlError, Result};
use crate::feed::interaction;
use crate::lead::{Lead, LeadSet};
use crate::parse::{is_valid_post, PostParser};
use crate::timing::JitterSource;
use scraper::{Html, Selector};
use std::time::Duration;

/// Feed container selector; its presence marks a usable group page.
const FEED_SELECTOR: &str = "div[role='feed']";

/// One rendered post inside the feed container.
const ARTICLE_SELECTOR: &str = "div[role='article']";

/// Expansion affordances, matched by their exact rendered label.
const SEE_ORIGINAL_XPATH: &str = "//div[text()='See original' and @role='button']";
const SEE_MORE_XPATH: &str = "//div[text()='See more' and @role='button']";

/// Placeholder anchors whose content materializes on hover.
const PLACEHOLDER_ANCHOR_XPATH: &str = "//a[@href='#']";

/// The fixed sweep granularity: each iteration scrolls one sixth of the
/// document height further down.
const SCROLL_STEPS: u32 = 6;

/// Tuning knobs for feed pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Attempts before giving up on opening a group page
    pub max_nav_attempts: u32,

    /// First retry delay; doubles on every further attempt
    pub nav_backoff: Duration,

    /// Scroll iterations before a collection is declared partial
    pub max_scroll_iterations: u32,

    /// Fixed wait after each scroll step
    pub wait_base: Duration,

    /// Upper bound of the random wait added on top of `wait_base`
    pub wait_jitter: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_nav_attempts: 5,
            nav_backoff: Duration::from_secs(2),
            // three full sweeps of the growing document
            max_scroll_iterations: 18,
            wait_base: Duration::from_secs(5),
            wait_jitter: Duration::from_secs(3),
        }
    }
}

/// Outcome of one collection pass over a group feed.
#[derive(Debug)]
pub struct Collected {
    /// Accumulated unique leads, newest first
    pub leads: Vec<Lead>,

    /// False when the iteration budget ran out before `min_count` was
    /// reached; the leads are still valid, just fewer than asked for
    pub complete: bool,
}

/// Drives scrolling and expansion of one group feed page.
pub struct FeedPaginator<'a> {
    session: &'a BrowserSession,
    parser: &'a dyn PostParser,
    config: &'a PaginationConfig,
}

impl<'a> FeedPaginator<'a> {
    pub fn new(
        session: &'a BrowserSession,
        parser: &'a dyn PostParser,
        config: &'a PaginationConfig,
    ) -> Self {
        Self {
            session,
            parser,
            config,
        }
    }

    /// Navigate to the group feed and verify the page actually stabilized
    /// there: the address must match exactly (a silent redirect to a login
    /// or interstitial page changes it) and the feed container must exist.
    /// Retries with doubling backoff up to the configured attempt budget.
    pub fn open(&self, group_link: &str, jitter: &mut dyn JitterSource) -> Result<()> {
        let mut backoff = self.config.nav_backoff;
        let mut last_failure = String::new();

        for attempt in 1..=self.config.max_nav_attempts {
            match self.try_open(group_link, jitter) {
                Ok(()) => {
                    // Drop any overlay dialog that grabbed focus on load
                    self.session.press_escape();
                    return Ok(());
                }
                Err(reason) => {
                    log::warn!(
                        "open attempt {}/{} for {} failed: {}",
                        attempt,
                        self.config.max_nav_attempts,
                        group_link,
                        reason
                    );
                    last_failure = reason;
                    if attempt < self.config.max_nav_attempts {
                        std::thread::sleep(backoff);
                        backoff *= 2;
                    }
                }
            }
        }

        Err(CrawlError::NavigationFailed {
            url: group_link.to_string(),
            attempts: self.config.max_nav_attempts,
            reason: last_failure,
        })
    }

    fn try_open(&self, group_link: &str, jitter: &mut dyn JitterSource) -> std::result::Result<(), String> {
        self.session
            .navigate(group_link)
            .map_err(|e| e.to_string())?;

        jitter.wait(self.config.wait_base, self.config.wait_jitter);

        let current = self.session.current_url();
        if current != group_link {
            return Err(format!("redirected to {}", current));
        }

        if !self.session.has_element(FEED_SELECTOR) {
            return Err("feed container missing".to_string());
        }

        Ok(())
    }

    /// Scroll-and-expand until at least `min_count` distinct valid leads
    /// have accumulated, or the iteration budget runs out.
    pub fn collect(&self, min_count: usize, jitter: &mut dyn JitterSource) -> Result<Collected> {
        let mut set = LeadSet::new();

        for iteration in 1..=self.config.max_scroll_iterations {
            self.session.scroll_to_fraction(iteration, SCROLL_STEPS)?;
            jitter.wait(self.config.wait_base, self.config.wait_jitter);

            interaction::click_all_by_xpath(self.session, SEE_ORIGINAL_XPATH);
            interaction::click_all_by_xpath(self.session, SEE_MORE_XPATH);
            interaction::hover_all_by_xpath(self.session, PLACEHOLDER_ANCHOR_XPATH);

            let html = self.session.page_html()?;
            let new = harvest_document(&html, self.parser, &mut set)?;

            log::debug!(
                "iteration {}: {} new leads, {} accumulated",
                iteration,
                new,
                set.len()
            );

            if set.len() >= min_count {
                return Ok(Collected {
                    leads: set.into_leads(),
                    complete: true,
                });
            }
        }

        log::warn!(
            "scroll budget exhausted with {} of {} requested leads",
            set.len(),
            min_count
        );
        Ok(Collected {
            leads: set.into_leads(),
            complete: false,
        })
    }
}

/// Parse one rendered document and merge every valid post into the
/// accumulated set. Returns how many leads were new.
pub(crate) fn harvest_document(
    html: &str,
    parser: &dyn PostParser,
    set: &mut LeadSet,
) -> Result<usize> {
    let feed_selector = Selector::parse(FEED_SELECTOR)
        .map_err(|e| CrawlError::PageParseFailed(e.to_string()))?;
    let article_selector = Selector::parse(ARTICLE_SELECTOR)
        .map_err(|e| CrawlError::PageParseFailed(e.to_string()))?;

    let document = Html::parse_document(html);

    let Some(feed) = document.select(&feed_selector).next() else {
        // The container existed at open time; a transient re-render can
        // drop it for one iteration
        log::warn!("feed container missing from rendered document");
        return Ok(0);
    };

    let mut new = 0;
    for article in feed.select(&article_selector) {
        if !is_valid_post(article) {
            continue;
        }
        if set.insert(parser.parse(article)) {
            new += 1;
        }
    }

    Ok(new)
}
