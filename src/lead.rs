use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder text for a post whose body could not be extracted.
pub const NO_TEXT_SENTINEL: &str = "No text available";

/// Structured extraction of one feed post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lead {
    /// Visible post text; never empty, falls back to [`NO_TEXT_SENTINEL`]
    pub post_text: String,

    /// Address of the post author's profile
    pub user_link: Option<String>,

    /// Permanent address of the post itself; doubles as the watermark key
    pub post_link: Option<String>,
}

impl Lead {
    /// A lead with no extractable content, produced for hidden or
    /// unparseable post nodes.
    pub fn empty() -> Self {
        Self {
            post_text: NO_TEXT_SENTINEL.to_string(),
            user_link: None,
            post_link: None,
        }
    }

    /// Identity key. Two leads are the same post iff both links match.
    pub fn key(&self) -> Option<LeadKey> {
        match (&self.user_link, &self.post_link) {
            (Some(user), Some(post)) => Some(LeadKey {
                user_link: user.clone(),
                post_link: post.clone(),
            }),
            _ => None,
        }
    }

    /// A lead qualifies for the final result only with both links present.
    pub fn is_complete(&self) -> bool {
        self.user_link.is_some() && self.post_link.is_some()
    }
}

/// Dedup key for accumulated leads: `(user_link, post_link)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadKey {
    pub user_link: String,
    pub post_link: String,
}

/// Accumulated set of unique leads across scroll iterations.
///
/// Insertion order is preserved, so feeding leads in document order keeps
/// the newest-first ordering of the feed. Re-inserting a key already seen
/// is a no-op, which makes repeated merges of the same rendered document
/// idempotent.
#[derive(Debug, Default)]
pub struct LeadSet {
    entries: IndexMap<LeadKey, Lead>,
}

impl LeadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a lead. Incomplete leads (missing either link) are discarded;
    /// duplicates keep the first-seen entry. Returns true if the set grew.
    pub fn insert(&mut self, lead: Lead) -> bool {
        match lead.key() {
            Some(key) => {
                if self.entries.contains_key(&key) {
                    false
                } else {
                    self.entries.insert(key, lead);
                    true
                }
            }
            None => false,
        }
    }

    /// Merge every lead from an iterator, returning how many were new.
    pub fn merge<I: IntoIterator<Item = Lead>>(&mut self, leads: I) -> usize {
        leads.into_iter().filter(|l| self.insert(l.clone())).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the set, yielding leads in insertion (newest-first) order.
    pub fn into_leads(self) -> Vec<Lead> {
        self.entries.into_values().collect()
    }
}
