use crate::lead::{Lead, NO_TEXT_SENTINEL};
use crate::parse::node::{
    attr, child, child_count, children, find_by_attr_value, first_anchor_href, has_attr,
    last_child, tag, text, trim_tracking_suffix, DomNode,
};
use crate::parse::PostParser;
use scraper::ElementRef;

/// Attribute the renderer puts on the preview block of a sponsored-style
/// post body.
const AD_PREVIEW_ATTR: &str = "data-ad-comet-preview";

/// Placeholder for an embedded share that carries no text of its own.
const EMPTY_EMBED_TEXT: &str = "Inserted message doesn't contain any text\n";

/// Parser for the feed markup revision currently observed in production.
///
/// The walk never fails: hidden posts and unrecognized shapes come back as
/// an all-null lead, partially recognized shapes as a lead with whatever
/// fields did resolve.
#[derive(Debug, Default)]
pub struct StructuralPostParser;

impl PostParser for StructuralPostParser {
    fn parse(&self, post: ElementRef<'_>) -> Lead {
        let Some(post_info) = post_info_blocks(*post) else {
            return Lead::empty();
        };

        let user_info = user_info(&post_info);
        let user_link = user_info.and_then(user_link);
        let post_link = user_info.and_then(post_link);
        let post_text = post_text(&post_info, post_link.as_deref());

        Lead {
            post_text,
            user_link,
            post_link,
        }
    }
}

/// Locate the post-info sibling blocks inside one post container.
///
/// Descends the first-child chain until a node with a non-empty `style`
/// attribute appears. A node flagged `aria-hidden` along the way marks the
/// whole post as hidden. From the styled node, the first child's children
/// are scanned for a block that has content but no generic `class`
/// attribute; the info blocks are that block's grandchild children from
/// index 1 on.
fn post_info_blocks(mut node: DomNode<'_>) -> Option<Vec<DomNode<'_>>> {
    loop {
        match attr(node, "style") {
            Some(style) if !style.is_empty() => {
                if has_attr(node, "aria-hidden") {
                    // Hidden post, nothing extractable
                    return None;
                }

                let first = child(node, 0)?;
                for block in children(first) {
                    if attr(block, "class").is_none() && child_count(block) > 0 {
                        let inner = child(child(block, 0)?, 0)?;
                        let blocks: Vec<_> = children(inner).skip(1).collect();
                        return if blocks.is_empty() { None } else { Some(blocks) };
                    }
                }

                log::warn!("post container has no recognizable info block");
                return None;
            }
            // No usable style attribute yet: descend into the first child,
            // giving up when the chain runs out
            _ => node = child(node, 0)?,
        }
    }
}

/// The user-info node sits at a fixed offset inside the first info block.
fn user_info<'a>(post_info: &[DomNode<'a>]) -> Option<DomNode<'a>> {
    child(child(*post_info.first()?, 0)?, 1)
}

/// First anchor anywhere under the user-info node, tracking suffix removed.
fn user_link(user_info: DomNode<'_>) -> Option<String> {
    first_anchor_href(user_info).map(trim_tracking_suffix)
}

/// First anchor under the user-info node's first child's second child,
/// tracking suffix removed. That offset is where the renderer puts the
/// post's timestamp permalink.
fn post_link(user_info: DomNode<'_>) -> Option<String> {
    let slot = child(child(user_info, 0)?, 1)?;
    first_anchor_href(slot).map(trim_tracking_suffix)
}

/// Concatenate the post body, classifying each child of the second info
/// block by shape.
fn post_text(post_info: &[DomNode<'_>], post_link: Option<&str>) -> String {
    let Some(body) = post_info.get(1) else {
        log::warn!(
            "post {} has no body block",
            post_link.unwrap_or("<unknown>")
        );
        return NO_TEXT_SENTINEL.to_string();
    };

    let mut out = String::new();

    for el in children(*body) {
        let first = child(el, 0);

        // Ad-style preview block: its inner text is the body
        if let Some(f) = first {
            if has_attr(f, AD_PREVIEW_ATTR) {
                if let Some(inner) = child(f, 0) {
                    out.push_str(&text(inner));
                    out.push('\n');
                }
                continue;
            }
        }

        // Machine-translated body rendered as a quotation
        if tag(el) == Some("blockquote") {
            match first.and_then(|f| child(f, 0)) {
                Some(inner) => {
                    out.push_str("Translated text: ");
                    out.push_str(&text(inner));
                }
                None => log::warn!(
                    "translated block in post {} lacks expected nesting",
                    post_link.unwrap_or("<unknown>")
                ),
            }
            continue;
        }

        // Embedded share: detected by a grandchild with exactly three
        // children. A link there is decoration; anything else carries the
        // embedded text in its last child.
        if let Some(probe) = first.and_then(|f| child(f, 0)) {
            if child_count(probe) == 3 {
                if tag(probe) == Some("a") {
                    continue;
                }
                match last_child(probe).and_then(|l| child(l, 0)) {
                    Some(innermost) => {
                        out.push_str(&text(innermost));
                        out.push('\n');
                    }
                    None => out.push_str(EMPTY_EMBED_TEXT),
                }
                continue;
            }
        }

        // Alternate preview wrapper: three children one level up, with the
        // ad-preview message somewhere beneath
        if let Some(f) = first {
            if child_count(f) == 3 {
                match find_by_attr_value(el, AD_PREVIEW_ATTR, "message") {
                    Some(preview) => out.push_str(&text(preview)),
                    None => log::warn!(
                        "undetected text in post {}",
                        post_link.unwrap_or("<unknown>")
                    ),
                }
                continue;
            }
        }

        // Pure decoration carries exactly a class and an id and nothing else
        if crate::parse::node::attr_names(el) == ["class", "id"] {
            continue;
        }

        out.push_str(&text(el));
        out.push('\n');
    }

    if out.is_empty() {
        NO_TEXT_SENTINEL.to_string()
    } else {
        out
    }
}
