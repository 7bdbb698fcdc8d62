use crate::lead::Lead;

/// Trim a newest-first lead list to the entries strictly newer than the
/// group's watermark.
///
/// The watermark is the post link of the newest lead from the previous
/// crawl. A missing or unmatched watermark returns the list unchanged:
/// either everything really is new, or the watermarked post scrolled out
/// of the collected window, and in both cases over-reporting beats losing
/// posts. The caller deduplicates against its own store.
pub fn truncate_at_watermark(leads: Vec<Lead>, watermark: Option<&str>) -> Vec<Lead> {
    let Some(mark) = watermark else {
        return leads;
    };

    match leads
        .iter()
        .position(|lead| lead.post_link.as_deref() == Some(mark))
    {
        Some(idx) => leads.into_iter().take(idx).collect(),
        None => leads,
    }
}
