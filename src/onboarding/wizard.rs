// src/onboarding/wizard.rs
//! The onboarding wizard: a linear seven-step form that accumulates a
//! profile draft and emits it on the terminal advance. Nothing persists
//! until emission; dropping the wizard discards all input.

use tracing::debug;

use crate::common::helpers::timestamp;
use crate::common::{AppError, ValidationResult, Validator};
use crate::profile::models::{
    Certification, DocumentAttachment, EducationEntry, EnglishLevel, ExperienceEntry, JobType,
    Links, PersonalInfo, StartWindow, UserProfile, WorkStyle,
};
use crate::profile::validators::{EducationDocumentsValidator, PersonalInfoValidator};

/// The seven linear onboarding steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    PersonalInfo,
    Education,
    Experience,
    Skills,
    Certifications,
    Interests,
    Links,
}

impl WizardStep {
    pub const COUNT: u8 = 7;

    /// 1-based position shown in the step header.
    pub fn index(self) -> u8 {
        match self {
            WizardStep::PersonalInfo => 1,
            WizardStep::Education => 2,
            WizardStep::Experience => 3,
            WizardStep::Skills => 4,
            WizardStep::Certifications => 5,
            WizardStep::Interests => 6,
            WizardStep::Links => 7,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::PersonalInfo => Some(WizardStep::Education),
            WizardStep::Education => Some(WizardStep::Experience),
            WizardStep::Experience => Some(WizardStep::Skills),
            WizardStep::Skills => Some(WizardStep::Certifications),
            WizardStep::Certifications => Some(WizardStep::Interests),
            WizardStep::Interests => Some(WizardStep::Links),
            WizardStep::Links => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::PersonalInfo => None,
            WizardStep::Education => Some(WizardStep::PersonalInfo),
            WizardStep::Experience => Some(WizardStep::Education),
            WizardStep::Skills => Some(WizardStep::Experience),
            WizardStep::Certifications => Some(WizardStep::Skills),
            WizardStep::Interests => Some(WizardStep::Certifications),
            WizardStep::Links => Some(WizardStep::Interests),
        }
    }

    /// Progress gauge value, rounded the way the header renders it.
    pub fn progress_percent(self) -> u8 {
        ((self.index() as u16 * 100 + Self::COUNT as u16 / 2) / Self::COUNT as u16) as u8
    }
}

/// Outcome of a successful forward transition.
#[derive(Debug)]
pub enum Advance {
    Next(WizardStep),
    /// Terminal step: the accumulated profile is emitted to the caller.
    Completed(Box<UserProfile>),
}

#[derive(Debug, Default)]
struct CertificationDraft {
    name: String,
    issuer: String,
    file_attached: bool,
}

/// Linear wizard over the profile draft. Forward transitions are gated by
/// per-step validation; backward transitions are always allowed except from
/// the first step.
#[derive(Debug)]
pub struct OnboardingWizard {
    step: WizardStep,
    draft: UserProfile,
    certification_draft: CertificationDraft,
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::PersonalInfo,
            draft: UserProfile::default(),
            certification_draft: CertificationDraft::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Read-only view of the accumulated draft.
    pub fn draft(&self) -> &UserProfile {
        &self.draft
    }

    /// Try to move forward. Blocked steps return a validation error carrying
    /// the user-facing message; the terminal step emits the profile.
    pub fn advance(&mut self) -> Result<Advance, AppError> {
        let gate = self.validate_step(self.step);
        if !gate.is_valid {
            debug!(step = self.step.index(), "Wizard advance blocked");
            return Err(gate.into());
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(Advance::Next(next))
            }
            None => Ok(Advance::Completed(Box::new(self.draft.clone()))),
        }
    }

    /// Move backward. Returns false on the first step.
    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    fn validate_step(&self, step: WizardStep) -> ValidationResult {
        match step {
            WizardStep::PersonalInfo => PersonalInfoValidator.validate(&self.draft),
            WizardStep::Education => EducationDocumentsValidator.validate(&self.draft),
            WizardStep::Certifications => {
                let mut result = ValidationResult::new();
                let draft = &self.certification_draft;
                if !draft.name.trim().is_empty() && !draft.file_attached {
                    result.add_error(
                        "certifications",
                        "Attach the certificate image or clear the draft fields",
                    );
                }
                result
            }
            _ => ValidationResult::new(),
        }
    }

    // ========================================================================
    // Step 1: personal info
    // ========================================================================

    pub fn set_personal_info(&mut self, info: PersonalInfo) {
        self.draft.personal_info = info;
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.draft.personal_info.avatar = avatar;
    }

    // ========================================================================
    // Step 2: education
    // ========================================================================

    /// Add another education entry and return its id.
    pub fn add_education(&mut self) -> String {
        let entry = EducationEntry::new();
        let id = entry.id.clone();
        self.draft.education.push(entry);
        id
    }

    pub fn update_education(
        &mut self,
        id: &str,
        apply: impl FnOnce(&mut EducationEntry),
    ) -> bool {
        match self.draft.education.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }

    /// Remove an entry. The last remaining entry cannot be removed.
    pub fn remove_education(&mut self, id: &str) -> bool {
        if self.draft.education.len() <= 1 {
            return false;
        }
        let before = self.draft.education.len();
        self.draft.education.retain(|e| e.id != id);
        self.draft.education.len() != before
    }

    pub fn attach_education_document(&mut self, id: &str, document: DocumentAttachment) -> bool {
        self.update_education(id, |entry| entry.attach_document(document))
    }

    // ========================================================================
    // Step 3: experience
    // ========================================================================

    /// Toggle the has-experience answer. Turning it on seeds one blank entry;
    /// turning it off clears the list.
    pub fn set_has_experience(&mut self, has_experience: bool) {
        let experience = &mut self.draft.experience;
        experience.has_experience = has_experience;
        if has_experience {
            if experience.list.is_empty() {
                experience.list.push(ExperienceEntry::new());
            }
        } else {
            experience.list.clear();
        }
    }

    pub fn set_experience_years(&mut self, years: impl Into<String>) {
        self.draft.experience.years = years.into();
    }

    pub fn add_experience(&mut self) -> String {
        let entry = ExperienceEntry::new();
        let id = entry.id.clone();
        self.draft.experience.list.push(entry);
        id
    }

    pub fn update_experience(
        &mut self,
        id: &str,
        apply: impl FnOnce(&mut ExperienceEntry),
    ) -> bool {
        match self.draft.experience.list.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }

    pub fn remove_experience(&mut self, id: &str) -> bool {
        let before = self.draft.experience.list.len();
        self.draft.experience.list.retain(|e| e.id != id);
        self.draft.experience.list.len() != before
    }

    // ========================================================================
    // Step 4: skills and language
    // ========================================================================

    pub fn add_technical_skill(&mut self, skill: &str) -> bool {
        self.draft.skills.add_technical(skill)
    }

    pub fn remove_technical_skill(&mut self, skill: &str) -> bool {
        self.draft.skills.remove_technical(skill)
    }

    pub fn set_english_level(&mut self, level: EnglishLevel) {
        self.draft.skills.english_level = level;
    }

    // ========================================================================
    // Step 5: certifications
    // ========================================================================

    /// Start or update the certification draft fields.
    pub fn set_certification_draft(&mut self, name: impl Into<String>, issuer: impl Into<String>) {
        self.certification_draft.name = name.into();
        self.certification_draft.issuer = issuer.into();
    }

    pub fn attach_certification_file(&mut self) {
        self.certification_draft.file_attached = true;
    }

    /// Commit the draft certification to the profile. Requires a name and an
    /// attached file.
    pub fn add_certification(&mut self) -> Result<(), AppError> {
        let draft = &self.certification_draft;
        if draft.name.trim().is_empty() || !draft.file_attached {
            return Err(AppError::Validation(
                "Complete the certificate name and attach the file".to_string(),
            ));
        }

        self.draft.certifications.list.push(Certification {
            name: draft.name.trim().to_string(),
            issuer: draft.issuer.trim().to_string(),
            date: timestamp(),
            expiry: None,
            image: None,
        });
        self.draft.certifications.has_certs = true;
        self.certification_draft = CertificationDraft::default();
        Ok(())
    }

    // ========================================================================
    // Step 6: interests and readiness
    // ========================================================================

    pub fn add_job_title(&mut self, title: &str) -> bool {
        self.draft.job_interests.add_title(title)
    }

    pub fn remove_job_title(&mut self, title: &str) -> bool {
        self.draft.job_interests.remove_title(title)
    }

    pub fn set_job_type(&mut self, job_type: JobType) {
        self.draft.job_interests.job_type = job_type;
    }

    pub fn set_work_style(&mut self, work_style: WorkStyle) {
        self.draft.job_interests.work_style = work_style;
    }

    pub fn set_start_window(&mut self, window: StartWindow) {
        self.draft.readiness.start_window = window;
    }

    pub fn set_availability(&mut self, available: bool) {
        self.draft.readiness.available = available;
    }

    pub fn set_work_permit(&mut self, work_permit: bool) {
        self.draft.readiness.work_permit = work_permit;
    }

    // ========================================================================
    // Step 7: links and photo
    // ========================================================================

    pub fn set_links(&mut self, links: Links) {
        self.draft.links = links;
    }
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}
