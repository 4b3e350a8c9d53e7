//! Relevance scoring for listing search.
//!
//! The score is a pure function of (title, description, created-at, query),
//! so results for a fixed catalog and clock are fully deterministic.

use chrono::{DateTime, Utc};

const TITLE_MATCH: i64 = 100;
const EXACT_TITLE_BONUS: i64 = 50;
const DESCRIPTION_MATCH: i64 = 30;
const RECENCY_WINDOW_DAYS: i64 = 20;

/// Whether the listing belongs to the candidate set for `query`:
/// a case-insensitive substring match on title or description.
pub fn matches_query(title: &str, description: Option<&str>, query: &str) -> bool {
    let q = query.to_lowercase();
    title.to_lowercase().contains(&q)
        || description
            .map(|d| d.to_lowercase().contains(&q))
            .unwrap_or(false)
}

/// Relevance score for a candidate listing:
/// - title contains the query: +100, an exact title match adds +50
/// - description contains the query: +30
/// - recency: max(0, 20 - age_in_days), whole days truncated toward zero
pub fn relevance_score(
    title: &str,
    description: Option<&str>,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    query: &str,
) -> i64 {
    let q = query.to_lowercase();
    let title_lc = title.to_lowercase();

    let mut score = 0;
    if title_lc.contains(&q) {
        score += TITLE_MATCH;
        if title_lc == q {
            score += EXACT_TITLE_BONUS;
        }
    }
    if let Some(description) = description {
        if description.to_lowercase().contains(&q) {
            score += DESCRIPTION_MATCH;
        }
    }

    let age_days = (now - created_at).num_days();
    score += (RECENCY_WINDOW_DAYS - age_days).max(0);

    score
}
