use crate::browser::BrowserSession;

/// Result of one best-effort UI interaction.
///
/// Stale elements, intercepted clicks and interaction timeouts are
/// expected while the feed is still re-rendering; they cost at most some
/// un-expanded text and must never abort the crawl, so they are recorded
/// rather than raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// The interaction went through
    Done,
    /// The element was missing, stale or not interactable; skipped
    Skipped,
}

/// Counts of performed and skipped interactions in one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub done: usize,
    pub skipped: usize,
}

/// Click every element matching the XPath query, best effort.
pub fn click_all_by_xpath(session: &BrowserSession, xpath: &str) -> SweepStats {
    let mut stats = SweepStats::default();

    let elements = match session.tab().find_elements_by_xpath(xpath) {
        Ok(elements) => elements,
        Err(e) => {
            log::debug!("no elements for '{}': {}", xpath, e);
            return stats;
        }
    };

    for element in &elements {
        match element.click() {
            Ok(_) => stats.done += 1,
            Err(e) => {
                stats.skipped += 1;
                log::debug!("click on '{}' skipped: {}", xpath, e);
            }
        }
    }

    stats
}

/// Hover every element matching the XPath query, best effort. Hovering
/// placeholder anchors makes the renderer materialize their lazy content.
pub fn hover_all_by_xpath(session: &BrowserSession, xpath: &str) -> SweepStats {
    let mut stats = SweepStats::default();

    let elements = match session.tab().find_elements_by_xpath(xpath) {
        Ok(elements) => elements,
        Err(e) => {
            log::debug!("no elements for '{}': {}", xpath, e);
            return stats;
        }
    };

    for element in &elements {
        match element.move_mouse_over() {
            Ok(_) => stats.done += 1,
            Err(e) => {
                stats.skipped += 1;
                log::debug!("hover on '{}' skipped: {}", xpath, e);
            }
        }
    }

    stats
}

/// Click the first element matching the XPath query if it exists at all.
pub fn click_if_present(session: &BrowserSession, xpath: &str) -> InteractionOutcome {
    match session.tab().find_element_by_xpath(xpath) {
        Ok(element) => match element.click() {
            Ok(_) => InteractionOutcome::Done,
            Err(e) => {
                log::debug!("click on '{}' skipped: {}", xpath, e);
                InteractionOutcome::Skipped
            }
        },
        Err(_) => InteractionOutcome::Skipped,
    }
}
