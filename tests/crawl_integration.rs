//! End-to-end tests against a real Chrome instance. Ignored by default;
//! run with: cargo test -- --ignored

use feedlead::{
    BrowserConfig, BrowserSession, FeedPaginator, FixedJitter, PaginationConfig,
    StructuralPostParser,
};

fn feed_page(posts: &str) -> String {
    format!(
        "data:text/html,<html><body><div role='feed'>{}</div></body></html>",
        posts
    )
}

fn minimal_post(posinset: u32, user: &str, post: &str, text: &str) -> String {
    format!(
        "<div role='article' class='x1' aria-posinset='{posinset}'>\
           <div style='width:100%'>\
             <div><div><div><div>\
               <div>header</div>\
               <div><div><div>avatar</div><div><div>\
                 <div><a href='{user}'>Author</a></div>\
                 <div><a href='{post}'>3h</a></div>\
               </div></div></div></div>\
               <div><div data-x='1'><div><div>{text}</div></div></div></div>\
             </div></div></div></div>\
           </div>\
         </div>"
    )
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_collect_from_rendered_feed() {
    let session = BrowserSession::launch(&BrowserConfig::new().headless(true))
        .expect("Failed to launch browser");

    let posts = format!(
        "{}{}",
        minimal_post(1, "https://site/u/1", "https://site/p/1", "first"),
        minimal_post(2, "https://site/u/2", "https://site/p/2", "second"),
    );
    session
        .navigate(&feed_page(&posts))
        .expect("Failed to navigate");

    let parser = StructuralPostParser;
    let config = PaginationConfig {
        max_scroll_iterations: 2,
        wait_base: std::time::Duration::from_millis(50),
        wait_jitter: std::time::Duration::from_millis(0),
        ..Default::default()
    };
    let paginator = FeedPaginator::new(&session, &parser, &config);

    let collected = paginator
        .collect(2, &mut FixedJitter(0.0))
        .expect("collect should succeed");

    assert!(collected.complete);
    assert_eq!(collected.leads.len(), 2);
    assert_eq!(collected.leads[0].post_link.as_deref(), Some("https://site/p/1"));
}

#[test]
#[ignore]
fn test_collect_partial_when_feed_is_small() {
    let session = BrowserSession::launch(&BrowserConfig::new().headless(true))
        .expect("Failed to launch browser");

    let posts = minimal_post(1, "https://site/u/1", "https://site/p/1", "only one");
    session
        .navigate(&feed_page(&posts))
        .expect("Failed to navigate");

    let parser = StructuralPostParser;
    let config = PaginationConfig {
        max_scroll_iterations: 2,
        wait_base: std::time::Duration::from_millis(50),
        wait_jitter: std::time::Duration::from_millis(0),
        ..Default::default()
    };
    let paginator = FeedPaginator::new(&session, &parser, &config);

    // Asking for more than the feed holds must terminate with a partial
    // result instead of hanging
    let collected = paginator
        .collect(10, &mut FixedJitter(0.0))
        .expect("collect should succeed");

    assert!(!collected.complete);
    assert_eq!(collected.leads.len(), 1);
}

#[test]
#[ignore]
fn test_open_fails_after_bounded_retries() {
    let session = BrowserSession::launch(&BrowserConfig::new().headless(true))
        .expect("Failed to launch browser");

    let parser = StructuralPostParser;
    let config = PaginationConfig {
        max_nav_attempts: 2,
        nav_backoff: std::time::Duration::from_millis(10),
        wait_base: std::time::Duration::from_millis(10),
        wait_jitter: std::time::Duration::from_millis(0),
        ..Default::default()
    };
    let paginator = FeedPaginator::new(&session, &parser, &config);

    // A page without a feed container never stabilizes
    let result = paginator.open(
        "data:text/html,<html><body><p>not a feed</p></body></html>",
        &mut FixedJitter(0.0),
    );
    assert!(matches!(
        result,
        Err(feedlead::CrawlError::NavigationFailed { attempts: 2, .. })
    ));
}
