// src/profile/models.rs

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::common::helpers::timestamp;
use crate::common::{
    generate_application_id, generate_education_id, generate_experience_id, generate_interview_id,
};

/// Credits seeded into every new profile; each AI-enhanced CV rewrite
/// spends one.
pub const INITIAL_CREDITS: u32 = 3;

/// A job seeker may track at most this many target titles.
pub const MAX_JOB_INTERESTS: usize = 3;

// ============================================================================
// Profile Aggregate
// ============================================================================

/// The aggregate record describing one job seeker: identity, education,
/// experience, skills, and preferences. Serialized as-is into the remote
/// profile row and the local session cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: ExperienceBlock,
    pub skills: SkillsBlock,
    pub certifications: CertificationsBlock,
    pub job_interests: JobInterests,
    pub readiness: Readiness,
    pub links: Links,
    pub activity: ActivityLog,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            // The wizard always starts with one open education entry.
            education: vec![EducationEntry::new()],
            experience: ExperienceBlock::default(),
            skills: SkillsBlock::default(),
            certifications: CertificationsBlock::default(),
            job_interests: JobInterests::default(),
            readiness: Readiness::default(),
            links: Links::default(),
            activity: ActivityLog::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: String,
    pub nationality: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            gender: Gender::Male,
            birth_date: String::new(),
            nationality: "Saudi".to_string(),
            city: String::new(),
            email: String::new(),
            phone: String::new(),
            avatar: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

// ============================================================================
// Education
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub degree: Degree,
    pub major: String,
    pub university: String,
    pub grad_year: String,
    /// The wizard refuses to leave the education step until this is true
    /// for every entry.
    pub document_attached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentAttachment>,
}

impl EducationEntry {
    pub fn new() -> Self {
        Self {
            id: generate_education_id(),
            degree: Degree::Bachelor,
            major: String::new(),
            university: String::new(),
            grad_year: String::new(),
            document_attached: false,
            document: None,
        }
    }

    pub fn attach_document(&mut self, document: DocumentAttachment) {
        self.document_attached = true;
        self.document = Some(document);
    }
}

impl Default for EducationEntry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degree {
    HighSchool,
    Diploma,
    Bachelor,
    Master,
    Doctorate,
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Degree::HighSchool => "High school",
            Degree::Diploma => "Diploma",
            Degree::Bachelor => "Bachelor",
            Degree::Master => "Master",
            Degree::Doctorate => "Doctorate",
        };
        write!(f, "{}", label)
    }
}

/// An uploaded document carried inline as a data URL, the way the browser
/// shell stores file uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    pub name: String,
    pub mime: String,
    pub data_url: String,
}

impl DocumentAttachment {
    /// Build an attachment from raw upload bytes; the mime type is sniffed
    /// from the content, not the file name.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        let mime = infer::get(bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data_url = format!("data:{};base64,{}", mime, BASE64.encode(bytes));
        Self {
            name: name.into(),
            mime,
            data_url,
        }
    }
}

// ============================================================================
// Experience
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceBlock {
    pub has_experience: bool,
    pub years: String,
    pub list: Vec<ExperienceEntry>,
}

impl Default for ExperienceBlock {
    fn default() -> Self {
        Self {
            has_experience: false,
            years: "0".to_string(),
            list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub title: String,
    pub company: String,
    pub period_from: String,
    pub period_to: String,
    pub is_current: bool,
    pub tasks: String,
}

impl ExperienceEntry {
    pub fn new() -> Self {
        Self {
            id: generate_experience_id(),
            title: String::new(),
            company: String::new(),
            period_from: String::new(),
            period_to: String::new(),
            is_current: false,
            tasks: String::new(),
        }
    }
}

impl Default for ExperienceEntry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsBlock {
    pub technical: Vec<String>,
    pub tools: Vec<String>,
    pub english_level: EnglishLevel,
    pub soft_skills: Vec<String>,
}

impl SkillsBlock {
    /// Add a technical skill; blank and duplicate entries are no-ops.
    pub fn add_technical(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.technical.iter().any(|s| s == skill) {
            return false;
        }
        self.technical.push(skill.to_string());
        true
    }

    pub fn remove_technical(&mut self, skill: &str) -> bool {
        let before = self.technical.len();
        self.technical.retain(|s| s != skill);
        self.technical.len() != before
    }
}

impl Default for SkillsBlock {
    fn default() -> Self {
        Self {
            technical: Vec::new(),
            tools: Vec::new(),
            english_level: EnglishLevel::Intermediate,
            soft_skills: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnglishLevel {
    Beginner,
    Intermediate,
    Advanced,
    Fluent,
}

// ============================================================================
// Certifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationsBlock {
    pub has_certs: bool,
    pub list: Vec<Certification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// ============================================================================
// Interests, readiness, links
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInterests {
    pub titles: Vec<String>,
    pub job_type: JobType,
    pub work_style: WorkStyle,
}

impl JobInterests {
    /// Add a target title. A blank title, a duplicate, or a fourth distinct
    /// title is a no-op.
    pub fn add_title(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty()
            || self.titles.len() >= MAX_JOB_INTERESTS
            || self.titles.iter().any(|t| t == title)
        {
            return false;
        }
        self.titles.push(title.to_string());
        true
    }

    pub fn remove_title(&mut self, title: &str) -> bool {
        let before = self.titles.len();
        self.titles.retain(|t| t != title);
        self.titles.len() != before
    }
}

impl Default for JobInterests {
    fn default() -> Self {
        Self {
            titles: Vec::new(),
            job_type: JobType::FullTime,
            work_style: WorkStyle::OnSite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Freelance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStyle {
    OnSite,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub available: bool,
    pub start_window: StartWindow,
    pub work_permit: bool,
}

impl Default for Readiness {
    fn default() -> Self {
        Self {
            available: true,
            start_window: StartWindow::Immediately,
            work_permit: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartWindow {
    Immediately,
    WithinWeek,
    WithinMonth,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Links {
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

impl Links {
    pub fn has_professional_link(&self) -> bool {
        !self.linkedin.trim().is_empty()
            || !self.github.trim().is_empty()
            || !self.portfolio.trim().is_empty()
    }
}

// ============================================================================
// Activity
// ============================================================================

/// Side-effect log appended to by interview and job-application actions,
/// plus the credit balance gating AI-enhanced features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub applied_jobs: Vec<AppliedJob>,
    pub interviews: Vec<InterviewRecord>,
    pub credits: u32,
}

impl ActivityLog {
    /// Spend one credit. Returns false when the balance is already zero.
    pub fn spend_credit(&mut self) -> bool {
        if self.credits == 0 {
            return false;
        }
        self.credits -= 1;
        true
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self {
            applied_jobs: Vec::new(),
            interviews: Vec::new(),
            credits: INITIAL_CREDITS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub platform: String,
    pub applied_at: String,
}

impl AppliedJob {
    pub fn new(title: &str, company: &str, platform: &str) -> Self {
        Self {
            id: generate_application_id(),
            title: title.to_string(),
            company: company.to_string(),
            platform: platform.to_string(),
            applied_at: timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub job_title: String,
    pub fluency: u8,
    pub completed_at: String,
}

impl InterviewRecord {
    pub fn new(job_title: &str, fluency: u8) -> Self {
        Self {
            id: generate_interview_id(),
            job_title: job_title.to_string(),
            fluency,
            completed_at: timestamp(),
        }
    }
}

// ============================================================================
// Account
// ============================================================================

/// Identity wrapper around a profile: one row of the remote profiles table,
/// and the exact shape of the locally cached session object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub profile: UserProfile,
}

impl UserAccount {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}
