//! Structural post parsing
//!
//! The platform strips semantic class names from its feed markup, so posts
//! cannot be targeted with meaningful selectors. Parsing instead walks the
//! node structure itself: fixed child offsets, attribute presence and
//! nesting depth. That coupling to one observed markup revision is
//! deliberately isolated behind the [`PostParser`] trait, with
//! [`StructuralPostParser`] as the implementation for the revision
//! currently in the wild; a platform redesign means a new implementation,
//! not a rewrite of the pagination engine.

pub mod node;
pub mod structural;

pub use structural::StructuralPostParser;

use crate::lead::Lead;
use scraper::ElementRef;

/// Capability interface for turning one raw post node into a [`Lead`].
///
/// Implementations never fail: a shape they do not recognize degrades to a
/// lead with null links and sentinel text.
pub trait PostParser: Send + Sync {
    fn parse(&self, post: ElementRef<'_>) -> Lead;
}

/// Whether a candidate feed child is a rendered post container rather than
/// a placeholder.
///
/// Empirically a visible post carries the generic styling (`class`)
/// attribute and the renderer's ordinal marker (`aria-posinset`), has
/// children, and its first descendant chain is not marked `hidden`.
pub fn is_valid_post(post: ElementRef<'_>) -> bool {
    use self::node::{attr, child, has_attr};

    if attr(*post, "class").is_none() || attr(*post, "aria-posinset").is_none() {
        return false;
    }

    let Some(first) = child(*post, 0) else {
        return false;
    };
    // A post without the inner chain has nothing rendered in it
    let Some(inner) = child(first, 0) else {
        return false;
    };

    !has_attr(inner, "hidden")
}
