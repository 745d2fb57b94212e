// src/jobs/models.rs

use serde::{Deserialize, Serialize};

/// A source-URL hint returned alongside a search-grounded reply; used to
/// recover real listing links.
#[derive(Debug, Clone)]
pub struct GroundingLink {
    pub uri: String,
    pub title: String,
}

/// One discovered job listing shown on the jobs board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Board the listing came from, derived from the URL host.
    pub platform: String,
    pub url: String,
    pub days_ago: u32,
}

/// Cover letter plus strengths produced when tailoring an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredApplication {
    pub cover_letter: String,
    pub key_points: Vec<String>,
}
