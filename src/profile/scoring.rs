// src/profile/scoring.rs
//! Profile completion scoring.
//!
//! A pure mapping from a profile to a percentage plus the checklist of
//! missing items shown on the dashboard. The point table is product
//! configuration rather than a contract; two presets ship, one for the
//! seeker dashboard and a coarser one for the admin user table.

use serde::{Deserialize, Serialize};

use super::models::UserProfile;

// Missing-item labels, in the order the checklist renders them.
pub const MISSING_FULL_NAME: &str = "Add your full name";
pub const MISSING_EMAIL: &str = "Add your email address";
pub const MISSING_PHONE: &str = "Add your mobile number";
pub const MISSING_EDUCATION: &str = "Add an education entry with a field of study";
pub const MISSING_SKILLS: &str = "Add at least 3 technical skills";
pub const MISSING_EXPERIENCE: &str = "Add your work experience details";
pub const MISSING_JOB_INTERESTS: &str = "Pick at least one target job title";
pub const MISSING_LINK: &str = "Add a professional profile link";

/// Point weights per profile component. A component with weight zero is
/// skipped entirely: no points, no checklist label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub full_name: u32,
    pub email: u32,
    pub phone: u32,
    /// Credited when any education entry names a field of study.
    pub education: u32,
    /// Full credit at `skills_full_threshold` technical skills.
    pub skills_full: u32,
    /// Partial credit for at least one skill below the threshold.
    pub skills_partial: u32,
    pub skills_full_threshold: usize,
    /// Credited for listed experience, or for explicitly having none.
    pub experience: u32,
    pub job_interests: u32,
    pub professional_link: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            full_name: 10,
            email: 10,
            phone: 10,
            education: 20,
            skills_full: 20,
            skills_partial: 10,
            skills_full_threshold: 3,
            experience: 10,
            job_interests: 10,
            professional_link: 10,
        }
    }
}

impl ScoreWeights {
    /// Coarse table used for the per-user column in the admin panel.
    pub fn admin_overview() -> Self {
        Self {
            full_name: 20,
            email: 0,
            phone: 0,
            education: 30,
            skills_full: 20,
            skills_partial: 0,
            skills_full_threshold: 1,
            experience: 30,
            job_interests: 0,
            professional_link: 0,
        }
    }

    /// Highest achievable score under this table.
    pub fn max_score(&self) -> u32 {
        self.full_name
            + self.email
            + self.phone
            + self.education
            + self.skills_full
            + self.experience
            + self.job_interests
            + self.professional_link
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    /// 0..=100, rounded against the table's maximum.
    pub percentage: u8,
    /// Human-readable labels for everything still missing.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CompletionScorer {
    weights: ScoreWeights,
}

impl CompletionScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score a profile. Absent fields contribute exactly zero and append
    /// their checklist label; nothing errors.
    pub fn score(&self, profile: &UserProfile) -> CompletionReport {
        fn component(
            present: bool,
            weight: u32,
            label: &str,
            earned: &mut u32,
            missing: &mut Vec<String>,
        ) {
            if weight == 0 {
                return;
            }
            if present {
                *earned += weight;
            } else {
                missing.push(label.to_string());
            }
        }

        let w = &self.weights;
        let mut earned: u32 = 0;
        let mut missing: Vec<String> = Vec::new();

        component(
            !profile.personal_info.full_name.trim().is_empty(),
            w.full_name,
            MISSING_FULL_NAME,
            &mut earned,
            &mut missing,
        );
        component(
            !profile.personal_info.email.trim().is_empty(),
            w.email,
            MISSING_EMAIL,
            &mut earned,
            &mut missing,
        );
        component(
            !profile.personal_info.phone.trim().is_empty(),
            w.phone,
            MISSING_PHONE,
            &mut earned,
            &mut missing,
        );
        component(
            profile
                .education
                .iter()
                .any(|entry| !entry.major.trim().is_empty()),
            w.education,
            MISSING_EDUCATION,
            &mut earned,
            &mut missing,
        );

        if w.skills_full > 0 {
            let count = profile.skills.technical.len();
            if count >= w.skills_full_threshold {
                earned += w.skills_full;
            } else {
                if count > 0 {
                    earned += w.skills_partial;
                }
                missing.push(MISSING_SKILLS.to_string());
            }
        }

        // Declared no-experience counts as a complete answer; only an empty
        // list behind a has-experience flag is a gap.
        let experience = &profile.experience;
        component(
            !experience.has_experience || !experience.list.is_empty(),
            w.experience,
            MISSING_EXPERIENCE,
            &mut earned,
            &mut missing,
        );

        component(
            !profile.job_interests.titles.is_empty(),
            w.job_interests,
            MISSING_JOB_INTERESTS,
            &mut earned,
            &mut missing,
        );
        component(
            profile.links.has_professional_link(),
            w.professional_link,
            MISSING_LINK,
            &mut earned,
            &mut missing,
        );

        let max = self.weights.max_score();
        let percentage = if max == 0 {
            0
        } else {
            ((earned * 100 + max / 2) / max) as u8
        };

        CompletionReport {
            percentage,
            missing,
        }
    }
}

impl Default for CompletionScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}
