//! Tests for the onboarding wizard
//!
//! These tests verify the step gates, the backward transitions, and the
//! terminal emission of the accumulated profile.

use super::wizard::{Advance, OnboardingWizard, WizardStep};
use crate::common::AppError;
use crate::profile::models::{DocumentAttachment, EnglishLevel, Links, PersonalInfo, StartWindow};

fn valid_personal_info() -> PersonalInfo {
    PersonalInfo {
        full_name: "Khalid Al-Otaibi".to_string(),
        phone: "512345678".to_string(),
        email: "khalid@example.com".to_string(),
        city: "Riyadh".to_string(),
        ..PersonalInfo::default()
    }
}

fn attach_all_documents(wizard: &mut OnboardingWizard) {
    let ids: Vec<String> = wizard.draft().education.iter().map(|e| e.id.clone()).collect();
    for id in ids {
        assert!(wizard.attach_education_document(
            &id,
            DocumentAttachment::from_bytes("degree.pdf", b"%PDF-1.4 test"),
        ));
    }
}

fn expect_blocked(result: Result<Advance, AppError>) -> String {
    match result {
        Err(AppError::Validation(message)) => message,
        other => panic!("expected a validation block, got {:?}", other),
    }
}

// ============================================================================
// Step gates
// ============================================================================

#[test]
fn test_step_one_blocks_without_phone() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(PersonalInfo {
        full_name: "Khalid Al-Otaibi".to_string(),
        ..PersonalInfo::default()
    });

    let message = expect_blocked(wizard.advance());
    assert!(message.contains("Mobile number"));
    assert_eq!(wizard.step(), WizardStep::PersonalInfo);
}

#[test]
fn test_step_one_blocks_malformed_phone() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(PersonalInfo {
        full_name: "Khalid Al-Otaibi".to_string(),
        phone: "12345".to_string(),
        ..PersonalInfo::default()
    });

    let message = expect_blocked(wizard.advance());
    assert!(message.contains("starting with 5"));
}

#[test]
fn test_step_one_passes_with_valid_input() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(valid_personal_info());

    match wizard.advance() {
        Ok(Advance::Next(step)) => assert_eq!(step, WizardStep::Education),
        other => panic!("expected advance to education, got {:?}", other),
    }
}

#[test]
fn test_step_two_blocks_undocumented_education() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(valid_personal_info());
    wizard.advance().expect("step one passes");

    // Two entries, only the first documented.
    let second = wizard.add_education();
    let first = wizard.draft().education[0].id.clone();
    assert!(wizard.attach_education_document(
        &first,
        DocumentAttachment::from_bytes("degree.pdf", b"%PDF-1.4 test"),
    ));

    let message = expect_blocked(wizard.advance());
    assert!(message.contains("entry 2"));
    assert_eq!(wizard.step(), WizardStep::Education);

    // Documenting the second entry unblocks the step.
    assert!(wizard.attach_education_document(
        &second,
        DocumentAttachment::from_bytes("diploma.pdf", b"%PDF-1.4 test"),
    ));
    assert!(matches!(
        wizard.advance(),
        Ok(Advance::Next(WizardStep::Experience))
    ));
}

#[test]
fn test_certification_draft_gate() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(valid_personal_info());
    attach_all_documents(&mut wizard);
    wizard.advance().expect("step one");
    wizard.advance().expect("step two");
    wizard.advance().expect("step three");
    wizard.advance().expect("step four");
    assert_eq!(wizard.step(), WizardStep::Certifications);

    // A named draft without a file blocks the step.
    wizard.set_certification_draft("PMP", "PMI");
    let message = expect_blocked(wizard.advance());
    assert!(message.contains("certificate"));

    // Attaching the file lets the draft commit and the step advance.
    wizard.attach_certification_file();
    wizard.add_certification().expect("draft commits");
    assert!(matches!(
        wizard.advance(),
        Ok(Advance::Next(WizardStep::Interests))
    ));
    assert!(wizard.draft().certifications.has_certs);
    assert_eq!(wizard.draft().certifications.list[0].name, "PMP");
}

#[test]
fn test_commit_certification_requires_name_and_file() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_certification_draft("", "PMI");
    wizard.attach_certification_file();
    assert!(wizard.add_certification().is_err());

    wizard.set_certification_draft("PMP", "PMI");
    assert!(wizard.add_certification().is_ok());
}

// ============================================================================
// Backward transitions
// ============================================================================

#[test]
fn test_back_is_refused_on_first_step() {
    let mut wizard = OnboardingWizard::new();
    assert!(!wizard.back());
    assert_eq!(wizard.step(), WizardStep::PersonalInfo);
}

#[test]
fn test_back_is_always_allowed_after_first_step() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(valid_personal_info());
    wizard.advance().expect("step one");

    assert!(wizard.back());
    assert_eq!(wizard.step(), WizardStep::PersonalInfo);
}

// ============================================================================
// Draft editing
// ============================================================================

#[test]
fn test_last_education_entry_cannot_be_removed() {
    let mut wizard = OnboardingWizard::new();
    let only = wizard.draft().education[0].id.clone();
    assert!(!wizard.remove_education(&only));

    let second = wizard.add_education();
    assert!(wizard.remove_education(&second));
    assert_eq!(wizard.draft().education.len(), 1);
}

#[test]
fn test_experience_toggle_seeds_and_clears() {
    let mut wizard = OnboardingWizard::new();

    wizard.set_has_experience(true);
    assert_eq!(wizard.draft().experience.list.len(), 1);

    let id = wizard.draft().experience.list[0].id.clone();
    assert!(wizard.update_experience(&id, |entry| {
        entry.title = "Accountant".to_string();
        entry.company = "Elm".to_string();
    }));

    wizard.set_has_experience(false);
    assert!(wizard.draft().experience.list.is_empty());
    assert!(!wizard.draft().experience.has_experience);
}

#[test]
fn test_job_title_cap_applies_in_wizard() {
    let mut wizard = OnboardingWizard::new();
    assert!(wizard.add_job_title("Accountant"));
    assert!(wizard.add_job_title("Data Analyst"));
    assert!(wizard.add_job_title("Project Manager"));
    assert!(!wizard.add_job_title("Lawyer"));
    assert!(!wizard.add_job_title("Accountant"));
    assert_eq!(wizard.draft().job_interests.titles.len(), 3);
}

// ============================================================================
// Terminal emission
// ============================================================================

#[test]
fn test_completion_emits_accumulated_profile() {
    let mut wizard = OnboardingWizard::new();
    wizard.set_personal_info(valid_personal_info());

    let education_id = wizard.draft().education[0].id.clone();
    wizard.update_education(&education_id, |entry| {
        entry.major = "Accounting".to_string();
        entry.university = "King Saud University".to_string();
        entry.grad_year = "2024".to_string();
    });
    attach_all_documents(&mut wizard);

    wizard.add_technical_skill("Excel");
    wizard.add_technical_skill("SQL");
    wizard.set_english_level(EnglishLevel::Advanced);
    wizard.add_job_title("Accountant");
    wizard.set_start_window(StartWindow::WithinWeek);
    wizard.set_links(Links {
        linkedin: "https://linkedin.com/in/khalid".to_string(),
        ..Links::default()
    });

    let mut emitted = None;
    for _ in 0..WizardStep::COUNT {
        match wizard.advance().expect("no step is blocked") {
            Advance::Next(_) => {}
            Advance::Completed(profile) => emitted = Some(profile),
        }
    }

    let profile = *emitted.expect("terminal advance emits the profile");
    // The emitted profile is deep-equal to the wizard's accumulated state.
    assert_eq!(&profile, wizard.draft());
    assert_eq!(profile.personal_info.full_name, "Khalid Al-Otaibi");
    assert_eq!(profile.education[0].major, "Accounting");
    assert_eq!(profile.skills.technical, vec!["Excel", "SQL"]);
    assert_eq!(profile.job_interests.titles, vec!["Accountant"]);
}

#[test]
fn test_progress_percent_matches_gauge() {
    assert_eq!(WizardStep::PersonalInfo.progress_percent(), 14);
    assert_eq!(WizardStep::Skills.progress_percent(), 57);
    assert_eq!(WizardStep::Links.progress_percent(), 100);
}
