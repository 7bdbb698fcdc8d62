use crate::account::SessionCookie;
use crate::browser::config::BrowserConfig;
use crate::error::{CrawlError, Result};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages one Chrome/Chromium instance for a crawl.
///
/// The underlying browser process is terminated when the session is
/// dropped, so holding the session in a scope guarantees cleanup on every
/// exit path.
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// The single tab all crawl traffic goes through
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options.
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Hardening flags for containerized, image-free crawling
        launch_opts.args.push(OsStr::new("--disable-gpu"));
        launch_opts.args.push(OsStr::new("--disable-dev-shm-usage"));
        launch_opts.args.push(OsStr::new("--ignore-certificate-errors"));
        launch_opts.args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        launch_opts.args.push(OsStr::new("--disable-notifications"));

        // A full crawl with jittered waits can easily outlive the default
        // 30-second idle timeout
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = config.headless;
        launch_opts.window_size = Some((config.window_width, config.window_height));
        launch_opts.sandbox = config.sandbox;

        if let Some(path) = &config.chrome_path {
            launch_opts.path = Some(path.clone());
        }

        // Route all session traffic through the account's proxy
        launch_opts.proxy_server = config.proxy_url.as_deref();

        let browser = Browser::new(launch_opts).map_err(|e| CrawlError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| CrawlError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    /// Get the crawl tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Fail unless the rendering engine denies being automated.
    ///
    /// The platform fingerprints `navigator.webdriver`; a session that
    /// reports true is already burned and not worth crawling with.
    pub fn assert_not_automated(&self) -> Result<()> {
        let flagged = self.evaluate_bool("navigator.webdriver === true")?;
        if flagged {
            return Err(CrawlError::SessionRejected(
                "navigator.webdriver reports an automated agent".to_string(),
            ));
        }
        Ok(())
    }

    /// Navigate to a URL and wait for the navigation to settle.
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("Navigation timeout: {}", e)))?;
        Ok(())
    }

    /// Current address of the crawl tab.
    pub fn current_url(&self) -> String {
        self.tab.get_url()
    }

    /// Full serialized HTML of the rendered document.
    pub fn page_html(&self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|e| CrawlError::PageParseFailed(format!("Failed to fetch page content: {}", e)))
    }

    /// Evaluate a JavaScript expression expected to yield a boolean.
    pub fn evaluate_bool(&self, expression: &str) -> Result<bool> {
        let result = self
            .tab
            .evaluate(expression, false)
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("'{}': {}", expression, e)))?;

        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    /// Scroll the window to `numerator/denominator` of the full document
    /// height. Steps past the bottom clamp to the bottom.
    pub fn scroll_to_fraction(&self, numerator: u32, denominator: u32) -> Result<()> {
        let js = format!(
            "window.scrollTo(0, {} * document.body.scrollHeight / {});",
            numerator, denominator
        );
        self.tab
            .evaluate(&js, false)
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("scroll failed: {}", e)))?;
        Ok(())
    }

    /// Whether an element matching the CSS selector currently exists.
    pub fn has_element(&self, css_selector: &str) -> bool {
        self.tab.find_element(css_selector).is_ok()
    }

    /// Whether an element matching the XPath query currently exists.
    pub fn has_xpath(&self, xpath: &str) -> bool {
        self.tab.find_element_by_xpath(xpath).is_ok()
    }

    /// Type text into the element matching the CSS selector.
    pub fn type_into(&self, css_selector: &str, text: &str) -> Result<()> {
        let element = self
            .tab
            .find_element(css_selector)
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("Element '{}' not found: {}", css_selector, e)))?;
        element
            .type_into(text)
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("Typing into '{}' failed: {}", css_selector, e)))?;
        Ok(())
    }

    /// Click the element matching the CSS selector.
    pub fn click(&self, css_selector: &str) -> Result<()> {
        let element = self
            .tab
            .find_element(css_selector)
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("Element '{}' not found: {}", css_selector, e)))?;
        element
            .click()
            .map_err(|e| CrawlError::PageEvaluationFailed(format!("Click on '{}' failed: {}", css_selector, e)))?;
        Ok(())
    }

    /// Send Escape to the page, closing any focus-stealing dialog.
    pub fn press_escape(&self) {
        if let Err(e) = self.tab.press_key("Escape") {
            log::debug!("Escape keypress ignored: {}", e);
        }
    }

    /// Inject stored cookies, normalizing same-site values first.
    pub fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<()> {
        if cookies.is_empty() {
            return Ok(());
        }

        let params = cookies
            .iter()
            .map(SessionCookie::to_cookie_param)
            .collect::<Result<Vec<_>>>()?;

        self.tab
            .set_cookies(params)
            .map_err(|e| CrawlError::SessionRejected(format!("Cookie injection failed: {}", e)))?;
        Ok(())
    }

    /// Capture the session's current cookie set, e.g. after a fresh login.
    pub fn capture_cookies(&self) -> Result<Vec<SessionCookie>> {
        let cookies = self
            .tab
            .get_cookies()
            .map_err(|e| CrawlError::SessionRejected(format!("Cookie capture failed: {}", e)))?;

        Ok(cookies.iter().map(SessionCookie::from_captured).collect())
    }

    /// Close the browser explicitly. Dropping the session has the same
    /// effect; this exists for callers that want the error.
    pub fn close(self) -> Result<()> {
        let _ = self.tab.close(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    fn test_launch_browser() {
        let result = BrowserSession::launch(&BrowserConfig::new().headless(true));
        assert!(result.is_ok());
    }

    #[test]
    #[ignore]
    fn test_navigate_and_url() {
        let session = BrowserSession::launch(&BrowserConfig::new().headless(true)).expect("Failed to launch browser");

        session.navigate("about:blank").expect("Failed to navigate");
        assert_eq!(session.current_url(), "about:blank");
    }

    #[test]
    #[ignore]
    fn test_automation_flag_hidden() {
        let session = BrowserSession::launch(&BrowserConfig::new().headless(true)).expect("Failed to launch browser");

        session.navigate("about:blank").expect("Failed to navigate");
        // The AutomationControlled blink feature is disabled at launch, so
        // the page must not see the webdriver flag.
        assert!(session.assert_not_automated().is_ok());
    }

    #[test]
    #[ignore]
    fn test_page_html_roundtrip() {
        let session = BrowserSession::launch(&BrowserConfig::new().headless(true)).expect("Failed to launch browser");

        session
            .navigate("data:text/html,<html><body><div role='feed'>hi</div></body></html>")
            .expect("Failed to navigate");

        let html = session.page_html().expect("Failed to fetch content");
        assert!(html.contains("role=\"feed\"") || html.contains("role='feed'"));
        assert!(session.has_element("div[role='feed']"));
    }
}
