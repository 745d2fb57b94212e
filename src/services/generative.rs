// src/services/generative.rs

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::common::config::AppConfig;
use crate::interview::{Difficulty, InterviewFeedback, InterviewQuestion};
use crate::jobs::models::{GroundingLink, JobPosting, TailoredApplication};
use crate::jobs::parser::{self, ListingParseError};
use crate::profile::models::UserProfile;

#[derive(Debug, Error)]
pub enum GenerativeError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("listing payload rejected: {0}")]
    Listing(#[from] ListingParseError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Wire types (generateContent)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: Value,
}

impl Tool {
    fn search_grounding() -> Self {
        Self {
            google_search: json!({}),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

impl GenerationConfig {
    fn structured(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: String,
    title: Option<String>,
}

/// Text plus the search-grounding sources that backed it.
struct Reply {
    text: String,
    grounding: Vec<GroundingLink>,
}

// ============================================================================
// Service
// ============================================================================

/// Client of the generative API's single `generateContent` call shape.
/// Four request families ride on it: search-grounded job discovery,
/// schema-constrained question generation and scoring, and free-text CV
/// rewriting. Every call is synchronous and billed; nothing is cached or
/// retried.
pub struct GenerativeService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenerativeService {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.generative_base_url.trim_end_matches('/').to_string(),
            api_key: config.generative_api_key.clone(),
            model: config.generative_model.clone(),
        }
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<Reply, GenerativeError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| GenerativeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "generateContent request failed");
            return Err(GenerativeError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerativeError::InvalidResponse(e.to_string()))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerativeError::EmptyResponse)?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let grounding = candidate
            .grounding_metadata
            .unwrap_or_default()
            .grounding_chunks
            .into_iter()
            .filter_map(|chunk| chunk.web)
            .map(|web| GroundingLink {
                uri: web.uri,
                title: web.title.unwrap_or_default(),
            })
            .collect();

        Ok(Reply { text, grounding })
    }

    fn parse_structured<T: DeserializeOwned>(&self, text: &str) -> Result<T, GenerativeError> {
        serde_json::from_str(&strip_code_fences(text))
            .map_err(|e| GenerativeError::InvalidResponse(e.to_string()))
    }

    /// Search-grounded job discovery: free-text reply in the pipe-delimited
    /// listing format, parsed strictly, with listing URLs recovered from the
    /// grounding metadata where the model left them out.
    pub async fn search_jobs(
        &self,
        interests: &[String],
    ) -> Result<Vec<JobPosting>, GenerativeError> {
        let query = format!(
            "Find real, currently open jobs in Saudi Arabia for these titles: {}.\n\
             For every job you find, answer strictly in this format, one job per line:\n\
             [Title] | [Company] | [City] | [URL] | [Days since posted]",
            interests.join(" and ")
        );

        let request = GenerateContentRequest {
            contents: vec![Content::text(query)],
            system_instruction: Some(Content::text(
                "You are a job search engine specialized in the Saudi labour market.",
            )),
            tools: Some(vec![Tool::search_grounding()]),
            generation_config: None,
        };

        let reply = self.generate(&request).await?;
        let postings = parser::parse_listings(&reply.text, &reply.grounding)?;
        info!(count = postings.len(), "Job search completed");
        Ok(postings)
    }

    /// Schema-constrained generation of five interview questions.
    pub async fn interview_questions(
        &self,
        job_title: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<InterviewQuestion>, GenerativeError> {
        let prompt = format!(
            "You are a professional hiring manager. Generate 5 interview questions \
             for the role \"{}\" at {} difficulty. Reply strictly as a JSON array of \
             objects with: id, type, question. type is one of opening, technical, \
             behavioral, closing.",
            job_title, difficulty
        );

        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "id": { "type": "INTEGER" },
                    "type": { "type": "STRING" },
                    "question": { "type": "STRING" },
                },
                "required": ["id", "type", "question"],
            },
        });

        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            system_instruction: None,
            tools: None,
            generation_config: Some(GenerationConfig::structured(schema)),
        };

        let reply = self.generate(&request).await?;
        let questions: Vec<InterviewQuestion> = self.parse_structured(&reply.text)?;
        info!(
            job_title = %job_title,
            question_count = questions.len(),
            "Interview questions generated"
        );
        Ok(questions)
    }

    /// Schema-constrained scoring of an answer transcript.
    pub async fn score_interview(
        &self,
        answers: &[String],
        job_title: &str,
    ) -> Result<InterviewFeedback, GenerativeError> {
        let prompt = format!(
            "Assess these interview answers for the role \"{}\". Answers: {}.\n\
             Reply as JSON with: fluency (0-100), confidence, technicalRating, \
             generalAdvice.",
            job_title,
            answers.join(" | ")
        );

        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "fluency": { "type": "INTEGER" },
                "confidence": { "type": "STRING" },
                "technicalRating": { "type": "STRING" },
                "generalAdvice": { "type": "STRING" },
            },
            "required": ["fluency", "confidence", "technicalRating", "generalAdvice"],
        });

        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            system_instruction: None,
            tools: None,
            generation_config: Some(GenerationConfig::structured(schema)),
        };

        let reply = self.generate(&request).await?;
        self.parse_structured(&reply.text)
    }

    /// Schema-constrained cover-letter tailoring for one listing.
    pub async fn tailor_application(
        &self,
        profile: &UserProfile,
        job_title: &str,
        company: &str,
    ) -> Result<TailoredApplication, GenerativeError> {
        let profile_json = serde_json::to_string(profile)
            .map_err(|e| GenerativeError::Serialization(e.to_string()))?;
        let prompt = format!(
            "Given this candidate profile: {}\n\
             Write a professional cover letter for the role \"{}\" at \"{}\", and \
             list 3 strengths that make this candidate a fit. Reply strictly as \
             JSON: {{\"coverLetter\": \"...\", \"keyPoints\": [\"...\", \"...\", \"...\"]}}",
            profile_json, job_title, company
        );

        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "coverLetter": { "type": "STRING" },
                "keyPoints": { "type": "ARRAY", "items": { "type": "STRING" } },
            },
            "required": ["coverLetter", "keyPoints"],
        });

        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            system_instruction: None,
            tools: None,
            generation_config: Some(GenerationConfig::structured(schema)),
        };

        let reply = self.generate(&request).await?;
        self.parse_structured(&reply.text)
    }

    /// Free-text CV rewrite: professional summary plus ATS-friendly task
    /// lines, as Markdown.
    pub async fn enhance_cv(&self, profile: &UserProfile) -> Result<String, GenerativeError> {
        let profile_json = serde_json::to_string(profile)
            .map_err(|e| GenerativeError::Serialization(e.to_string()))?;
        let prompt = format!(
            "Based on this profile, write a professional summary and rewrite the \
             experience task lines to be ATS-friendly. Profile: {}\n\
             The output must be well-structured Markdown.",
            profile_json
        );

        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            system_instruction: None,
            tools: None,
            generation_config: None,
        };

        let reply = self.generate(&request).await?;
        if reply.text.trim().is_empty() {
            return Err(GenerativeError::EmptyResponse);
        }
        Ok(reply.text)
    }
}

/// Models occasionally wrap structured output in Markdown fences even when a
/// schema was requested; strip them before parsing.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> AppConfig {
        AppConfig {
            backend_url: "http://unused".to_string(),
            backend_api_key: "unused".to_string(),
            admin_emails: Default::default(),
            generative_base_url: base_url.to_string(),
            generative_api_key: "test-key".to_string(),
            generative_model: "gemini-3-flash-preview".to_string(),
            session_cache_path: "./unused.json".into(),
        }
    }

    fn candidate_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] },
            }],
        })
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("hello")],
            system_instruction: Some(Content::text("be brief")),
            tools: Some(vec![Tool::search_grounding()]),
            generation_config: Some(GenerationConfig::structured(json!({"type": "ARRAY"}))),
        };

        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(value["tools"][0]["googleSearch"].is_object());
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_plain_request_omits_optional_fields() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("hello")],
            system_instruction: None,
            tools: None,
            generation_config: None,
        };

        let value = serde_json::to_value(&request).expect("serializes");
        assert!(value.get("tools").is_none());
        assert!(value.get("systemInstruction").is_none());
        assert!(value.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_search_jobs_backfills_urls_from_grounding() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(
                "/v1beta/models/gemini-3-flash-preview:generateContent",
            ))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "tools": [{ "googleSearch": {} }],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{
                        "text": "[Accountant] | Elm | Riyadh\n[Data Analyst] | STC | Jeddah",
                    }] },
                    "groundingMetadata": {
                        "groundingChunks": [
                            { "web": { "uri": "https://www.bayt.com/en/job/1", "title": "Accountant at Elm" } },
                            { "web": { "uri": "https://www.linkedin.com/jobs/2", "title": "STC openings" } },
                        ],
                    },
                }],
            })))
            .mount(&server)
            .await;

        let service = GenerativeService::new(&test_config(&server.uri()));
        let jobs = service
            .search_jobs(&["Accountant".to_string(), "Data Analyst".to_string()])
            .await
            .expect("search succeeds");

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].url, "https://www.bayt.com/en/job/1");
        assert_eq!(jobs[0].platform, "Bayt");
        assert_eq!(jobs[1].url, "https://www.linkedin.com/jobs/2");
    }

    #[tokio::test]
    async fn test_search_jobs_rejects_listing_free_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(
                "I could not find any current openings.",
            )))
            .mount(&server)
            .await;

        let service = GenerativeService::new(&test_config(&server.uri()));
        let error = service
            .search_jobs(&["Accountant".to_string()])
            .await
            .expect_err("payload rejected");

        assert!(matches!(
            error,
            GenerativeError::Listing(ListingParseError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_interview_questions_tolerate_code_fences() {
        let server = MockServer::start().await;

        let fenced = "```json\n[\n  {\"id\": 1, \"type\": \"opening\", \"question\": \"Tell me about yourself.\"}\n]\n```";
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_response(fenced)),
            )
            .mount(&server)
            .await;

        let service = GenerativeService::new(&test_config(&server.uri()));
        let questions = service
            .interview_questions("Accountant", Difficulty::Medium)
            .await
            .expect("questions parse");

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, 1);
    }

    #[tokio::test]
    async fn test_http_error_is_request_failed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let service = GenerativeService::new(&test_config(&server.uri()));
        let error = service
            .enhance_cv(&UserProfile::default())
            .await
            .expect_err("request fails");

        assert!(matches!(error, GenerativeError::RequestFailed(_)));
    }
}
