// src/jobs/parser.rs
//! Strict parser for the pipe-delimited listing micro-format.
//!
//! The job-search prompt instructs the model to answer one listing per
//! line:
//!
//! ```text
//! listing := title '|' company ('|' location ('|' url ('|' days)?)?)?
//! title   := '[' text ']' | text
//! days    := integer count of days since the listing was posted
//! ```
//!
//! Lines without a delimiter are narration and skipped. A delimited line
//! that breaks the grammar rejects the whole payload with a tagged error:
//! a retryable failure beats silently partial records.
//!
//! URL recovery order for each listing: explicit field, then a grounding
//! source whose title mentions the company (falling back to the chunk at
//! the listing's position), then a constructed search-engine URL.

use thiserror::Error;

use super::models::{GroundingLink, JobPosting};

/// Version of the line grammar the search prompt requests.
pub const FORMAT_VERSION: u32 = 1;

const DEFAULT_LOCATION: &str = "Saudi Arabia";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingParseError {
    #[error("payload contains no listings")]
    Empty,

    #[error("line {line}: expected at least a title and a company")]
    MalformedLine { line: usize },

    #[error("line {line}: day count {value:?} is not a number")]
    InvalidDayCount { line: usize, value: String },
}

pub fn parse_listings(
    text: &str,
    grounding: &[GroundingLink],
) -> Result<Vec<JobPosting>, ListingParseError> {
    let mut postings = Vec::new();

    for (line_index, raw) in text.lines().enumerate() {
        if !raw.contains('|') {
            continue;
        }
        let line = line_index + 1;

        let fields: Vec<&str> = raw.split('|').map(str::trim).collect();
        let title = strip_brackets(fields[0]);
        let company = fields.get(1).map(|f| strip_brackets(f)).unwrap_or_default();
        if title.is_empty() || company.is_empty() {
            return Err(ListingParseError::MalformedLine { line });
        }

        let location = fields
            .get(2)
            .map(|f| strip_brackets(f))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let url_field = fields
            .get(3)
            .map(|f| strip_brackets(f))
            .filter(|f| !f.is_empty() && f.as_str() != "#");

        let days_ago = match fields.get(4).map(|f| strip_brackets(f)) {
            None => 0,
            Some(value) if value.is_empty() => 0,
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| ListingParseError::InvalidDayCount { line, value })?,
        };

        let url = url_field
            .or_else(|| grounded_url(grounding, &company, postings.len()))
            .unwrap_or_else(|| fallback_search_url(&title, &company));
        let platform = platform_for(&url);

        postings.push(JobPosting {
            title,
            company,
            location,
            platform,
            url,
            days_ago,
        });
    }

    if postings.is_empty() {
        return Err(ListingParseError::Empty);
    }
    Ok(postings)
}

fn strip_brackets(field: &str) -> String {
    field
        .trim_matches(|c| c == '[' || c == ']')
        .trim()
        .to_string()
}

/// Prefer a grounding source whose title mentions the company; otherwise
/// take the chunk at the listing's position.
fn grounded_url(grounding: &[GroundingLink], company: &str, index: usize) -> Option<String> {
    let company_lower = company.to_lowercase();
    grounding
        .iter()
        .find(|link| !company_lower.is_empty() && link.title.to_lowercase().contains(&company_lower))
        .or_else(|| grounding.get(index))
        .map(|link| link.uri.clone())
}

/// Last resort: hand the user a web search for the listing.
fn fallback_search_url(title: &str, company: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(&format!("{} {}", title, company))
    )
}

fn platform_for(url: &str) -> String {
    let host = url.to_lowercase();
    let platform = if host.contains("linkedin") {
        "LinkedIn"
    } else if host.contains("bayt") {
        "Bayt"
    } else if host.contains("indeed") {
        "Indeed"
    } else if host.contains("glassdoor") {
        "Glassdoor"
    } else {
        "Job Portal"
    };
    platform.to_string()
}
