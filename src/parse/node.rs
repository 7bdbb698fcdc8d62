//! Low-level helpers for walking a parsed document by structure.
//!
//! Child indexing counts element nodes and non-blank text nodes, skipping
//! the whitespace-only text the HTML serializer may interleave; the feed
//! markup itself is minified, so indices line up with what the renderer
//! emitted.

use ego_tree::NodeRef;
use scraper::Node;

/// A structural handle into the parsed document. Borrows from the parsed
/// [`scraper::Html`], so it cannot outlive the pagination iteration that
/// produced the document.
pub type DomNode<'a> = NodeRef<'a, Node>;

fn is_significant(node: &DomNode<'_>) -> bool {
    match node.value() {
        Node::Element(_) => true,
        Node::Text(text) => !text.trim().is_empty(),
        _ => false,
    }
}

/// Iterate the significant children of a node in document order.
pub fn children<'a>(node: DomNode<'a>) -> impl Iterator<Item = DomNode<'a>> {
    node.children().filter(is_significant)
}

/// The `index`-th significant child, if present.
pub fn child<'a>(node: DomNode<'a>, index: usize) -> Option<DomNode<'a>> {
    children(node).nth(index)
}

/// The last significant child, if any.
pub fn last_child<'a>(node: DomNode<'a>) -> Option<DomNode<'a>> {
    children(node).last()
}

/// Number of significant children.
pub fn child_count(node: DomNode<'_>) -> usize {
    children(node).count()
}

/// Attribute value, if the node is an element carrying it.
pub fn attr<'a>(node: DomNode<'a>, name: &str) -> Option<&'a str> {
    node.value().as_element().and_then(|el| el.attr(name))
}

/// Whether the node is an element carrying the attribute at all.
pub fn has_attr(node: DomNode<'_>, name: &str) -> bool {
    attr(node, name).is_some()
}

/// Lowercase tag name, if the node is an element.
pub fn tag<'a>(node: DomNode<'a>) -> Option<&'a str> {
    node.value().as_element().map(|el| el.name())
}

/// Sorted attribute names of an element node; empty for non-elements.
pub fn attr_names(node: DomNode<'_>) -> Vec<&str> {
    let mut names: Vec<&str> = node
        .value()
        .as_element()
        .map(|el| el.attrs().map(|(name, _)| name).collect())
        .unwrap_or_default();
    names.sort_unstable();
    names
}

/// All descendant text concatenated in document order, like a rendered
/// node's visible text.
pub fn text(node: DomNode<'_>) -> String {
    node.descendants()
        .filter_map(|n| n.value().as_text())
        .map(|t| t.to_string())
        .collect()
}

/// First `<a href>` in document order at or beneath this node.
pub fn first_anchor_href<'a>(node: DomNode<'a>) -> Option<&'a str> {
    node.descendants()
        .find(|n| tag(*n) == Some("a"))
        .and_then(|a| attr(a, "href"))
}

/// First descendant element whose attribute equals the given value.
pub fn find_by_attr_value<'a>(node: DomNode<'a>, name: &str, value: &str) -> Option<DomNode<'a>> {
    node.descendants().find(|n| attr(*n, name) == Some(value))
}

/// Strip the feed's click-tracking query suffix from a link. Links without
/// the marker pass through untouched.
pub fn trim_tracking_suffix(href: &str) -> String {
    match href.find("?__cft__[0]") {
        Some(idx) => href[..idx].to_string(),
        None => href.to_string(),
    }
}
