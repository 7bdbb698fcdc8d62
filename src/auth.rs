use crate::account::{Account, SessionCookie};
use crate::browser::BrowserSession;
use crate::error::{CrawlError, Result};
use crate::feed::interaction::{self, InteractionOutcome};
use crate::timing::JitterSource;
use std::time::Duration;

/// Exact text of the node the platform renders on its login wall. Its
/// absence means the restored session is still authenticated.
const LOGIN_WALL_XPATH: &str = "//div[text()='You must log in to continue.']";

/// Consent dialog opt-out, matched by its button title.
const DECLINE_COOKIES_XPATH: &str = "//button[@title='Decline optional cookies']";

const EMAIL_FIELD: &str = "#email";
const PASSWORD_FIELD: &str = "#pass";
const LOGIN_BUTTON: &str = "#loginbutton";

/// Result of establishing an authenticated session.
#[derive(Debug, Default)]
pub struct AuthOutcome {
    /// Present when a fallback login ran and produced a fresh cookie set.
    /// The caller decides whether and where to persist it; the account
    /// passed in is never mutated.
    pub refreshed_cookies: Option<Vec<SessionCookie>>,
}

/// Establishes an authenticated browser context for one account.
pub struct SessionManager<'a> {
    /// Address of the platform's entry page, where cookies are scoped
    portal_url: &'a str,

    /// Fixed delay between credential interactions
    wait_base: Duration,

    /// Random delay bound added on top, for human-like pacing
    wait_jitter: Duration,
}

impl<'a> SessionManager<'a> {
    pub fn new(portal_url: &'a str, wait_base: Duration, wait_jitter: Duration) -> Self {
        Self {
            portal_url,
            wait_base,
            wait_jitter,
        }
    }

    /// Restore or establish an authenticated session for the account.
    ///
    /// Stored cookies are injected before navigating so the portal sees
    /// them on first load. If the login wall still appears, a credential
    /// login runs with jittered pacing; the cookies captured afterwards
    /// are surfaced in the outcome. A wall that survives the login attempt
    /// is an authentication failure.
    pub fn authorize(
        &self,
        session: &BrowserSession,
        account: &Account,
        jitter: &mut dyn JitterSource,
    ) -> Result<AuthOutcome> {
        session.navigate(self.portal_url)?;

        if !account.cookies.is_empty() {
            session.set_cookies(&account.cookies)?;
            // Reload so the injected cookies take effect
            session.navigate(self.portal_url)?;
        }

        jitter.wait(self.wait_base, self.wait_jitter);

        // Consent dialog shows up for fresh sessions only; absence is fine
        if interaction::click_if_present(session, DECLINE_COOKIES_XPATH) == InteractionOutcome::Done {
            log::debug!("declined optional cookies");
        }

        if !session.has_xpath(LOGIN_WALL_XPATH) {
            log::info!("session for {} restored from cookies", account.username);
            return Ok(AuthOutcome::default());
        }

        log::info!("login wall present, logging {} in", account.username);
        self.login(session, account, jitter)?;

        if session.has_xpath(LOGIN_WALL_XPATH) {
            return Err(CrawlError::AuthenticationFailed {
                username: account.username.clone(),
                reason: "login wall still present after submit".to_string(),
            });
        }

        let refreshed = session.capture_cookies()?;
        log::warn!("cookies were updated for {}", account.username);

        // Keep the fresh set active for the rest of the crawl
        session.set_cookies(&refreshed)?;

        Ok(AuthOutcome {
            refreshed_cookies: Some(refreshed),
        })
    }

    fn login(
        &self,
        session: &BrowserSession,
        account: &Account,
        jitter: &mut dyn JitterSource,
    ) -> Result<()> {
        session
            .type_into(EMAIL_FIELD, &account.username)
            .map_err(|e| auth_failure(&account.username, e))?;
        jitter.wait(self.wait_base, self.wait_jitter);

        session
            .type_into(PASSWORD_FIELD, &account.password)
            .map_err(|e| auth_failure(&account.username, e))?;
        jitter.wait(self.wait_base, self.wait_jitter);

        session
            .click(LOGIN_BUTTON)
            .map_err(|e| auth_failure(&account.username, e))?;
        jitter.wait(self.wait_base, self.wait_jitter);

        Ok(())
    }
}

fn auth_failure(username: &str, cause: CrawlError) -> CrawlError {
    CrawlError::AuthenticationFailed {
        username: username.to_string(),
        reason: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserConfig;
    use crate::timing::FixedJitter;

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_authorize_without_wall() {
        let session = BrowserSession::launch(&BrowserConfig::new().headless(true))
            .expect("Failed to launch browser");

        // A page without the wall text counts as an authenticated session
        let manager = SessionManager::new(
            "data:text/html,<html><body><p>welcome back</p></body></html>",
            Duration::from_millis(10),
            Duration::from_millis(10),
        );

        let account = Account {
            username: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
            proxy_url: None,
            cookies: Vec::new(),
            groups: Vec::new(),
        };

        let outcome = manager
            .authorize(&session, &account, &mut FixedJitter(0.0))
            .expect("authorize should pass without a wall");
        assert!(outcome.refreshed_cookies.is_none());
    }
}
