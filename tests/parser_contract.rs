//! Contract tests for the structural post parser, driven from fixture
//! documents that mirror the feed markup shape observed in production.
//! When the platform ships a markup revision, these fixtures are what
//! catches the drift.

use feedlead::{
    parse::is_valid_post, truncate_at_watermark, Lead, LeadSet, PostParser, StructuralPostParser,
    NO_TEXT_SENTINEL,
};
use scraper::{Html, Selector};

/// A feed document with three rendered posts: a plain text post, a
/// translated post, and a hidden one. Markup is minified the way the
/// renderer emits it.
fn feed_fixture() -> String {
    format!(
        "<html><body><div role='feed'>{}{}{}</div></body></html>",
        post_fixture(
            1,
            "https://site/u/ann",
            "https://site/groups/9/posts/101",
            "<div><div data-x='1'><div><div>Selling a bike, pickup only</div></div></div></div>",
        ),
        post_fixture(
            2,
            "https://site/u/bob",
            "https://site/groups/9/posts/100",
            "<div><blockquote><div><div>Vendo bicicleta</div></div></blockquote></div>",
        ),
        hidden_post_fixture(3),
    )
}

fn post_fixture(posinset: u32, user_link: &str, post_link: &str, body: &str) -> String {
    format!(
        "<div role='article' class='x1' aria-posinset='{posinset}'>\
           <div style='width:100%'>\
             <div>\
               <div>\
                 <div>\
                   <div>\
                     <div>header</div>\
                     <div>\
                       <div>\
                         <div>avatar</div>\
                         <div>\
                           <div>\
                             <div><a href='{user_link}?__cft__[0]=track'>Author</a></div>\
                             <div><span><a href='{post_link}?__cft__[0]=track&amp;n=1'>3h</a></span></div>\
                           </div>\
                         </div>\
                       </div>\
                     </div>\
                     {body}\
                   </div>\
                 </div>\
               </div>\
             </div>\
           </div>\
         </div>"
    )
}

fn hidden_post_fixture(posinset: u32) -> String {
    format!(
        "<div role='article' class='x1' aria-posinset='{posinset}'>\
           <div style='width:100%' aria-hidden='true'><div>hidden content</div></div>\
         </div>"
    )
}

fn parse_feed(html: &str) -> Vec<Lead> {
    let document = Html::parse_document(html);
    let feed = Selector::parse("div[role='feed']").unwrap();
    let article = Selector::parse("div[role='article']").unwrap();
    let parser = StructuralPostParser;

    let mut leads = Vec::new();
    for post in document
        .select(&feed)
        .next()
        .expect("fixture has a feed")
        .select(&article)
    {
        if is_valid_post(post) {
            leads.push(parser.parse(post));
        }
    }
    leads
}

#[test]
fn plain_post_fields_extracted() {
    let leads = parse_feed(&feed_fixture());
    let first = &leads[0];

    assert_eq!(first.user_link.as_deref(), Some("https://site/u/ann"));
    assert_eq!(
        first.post_link.as_deref(),
        Some("https://site/groups/9/posts/101")
    );
    assert_eq!(first.post_text, "Selling a bike, pickup only\n");
}

#[test]
fn translated_post_prefixed() {
    let leads = parse_feed(&feed_fixture());
    assert_eq!(leads[1].post_text, "Translated text: Vendo bicicleta");
}

#[test]
fn hidden_post_degrades_to_empty_lead() {
    let leads = parse_feed(&feed_fixture());

    // The hidden post passes the validity predicate (its first chain is
    // not marked `hidden`) but the parser refuses it on `aria-hidden`.
    assert_eq!(leads.len(), 3);
    let hidden = &leads[2];
    assert!(hidden.user_link.is_none());
    assert!(hidden.post_link.is_none());
    assert_eq!(hidden.post_text, NO_TEXT_SENTINEL);
}

#[test]
fn incomplete_leads_never_enter_the_set() {
    let leads = parse_feed(&feed_fixture());

    let mut set = LeadSet::new();
    set.merge(leads);

    // Only the two complete leads survive, document order intact
    assert_eq!(set.len(), 2);
    let links: Vec<_> = set
        .into_leads()
        .into_iter()
        .map(|l| l.post_link.unwrap())
        .collect();
    assert_eq!(
        links,
        vec![
            "https://site/groups/9/posts/101",
            "https://site/groups/9/posts/100"
        ]
    );
}

#[test]
fn watermark_bounds_the_fixture_feed() {
    let leads = parse_feed(&feed_fixture());
    let mut set = LeadSet::new();
    set.merge(leads);

    let new = truncate_at_watermark(set.into_leads(), Some("https://site/groups/9/posts/100"));
    assert_eq!(new.len(), 1);
    assert_eq!(
        new[0].post_link.as_deref(),
        Some("https://site/groups/9/posts/101")
    );
}

#[test]
fn tracking_suffix_never_leaks_into_links() {
    for lead in parse_feed(&feed_fixture()) {
        if let Some(link) = &lead.post_link {
            assert!(!link.contains("__cft__"), "untrimmed link: {link}");
        }
        if let Some(link) = &lead.user_link {
            assert!(!link.contains("__cft__"), "untrimmed link: {link}");
        }
    }
}
