// src/profile/validators.rs

use std::sync::OnceLock;

use regex::Regex;

use super::models::UserProfile;
use crate::common::{ValidationResult, Validator};

/// Mobile numbers are national format: exactly nine digits, leading 5.
pub fn is_valid_phone(phone: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    let pattern = PHONE.get_or_init(|| Regex::new(r"^5[0-9]{8}$").expect("phone pattern compiles"));
    pattern.is_match(phone)
}

// ============================================================================
// Wizard step validators
// ============================================================================

/// Gate for the personal-info step: name and a well-formed mobile number.
pub struct PersonalInfoValidator;

impl Validator<UserProfile> for PersonalInfoValidator {
    fn validate(&self, profile: &UserProfile) -> ValidationResult {
        let mut result = ValidationResult::new();
        let info = &profile.personal_info;

        if info.full_name.trim().is_empty() {
            result.add_error("full_name", "Full name is required");
        }

        if info.phone.trim().is_empty() {
            result.add_error("phone", "Mobile number is required");
        } else if !is_valid_phone(&info.phone) {
            result.add_error(
                "phone",
                "Enter a valid 9-digit mobile number starting with 5",
            );
        }

        result
    }
}

/// Gate for the education step: every entry must carry its graduation
/// document before the wizard may move on.
pub struct EducationDocumentsValidator;

impl Validator<UserProfile> for EducationDocumentsValidator {
    fn validate(&self, profile: &UserProfile) -> ValidationResult {
        let mut result = ValidationResult::new();

        for (index, entry) in profile.education.iter().enumerate() {
            if !entry.document_attached {
                result.add_error(
                    "education",
                    &format!(
                        "Attach the graduation document for education entry {}",
                        index + 1
                    ),
                );
            }
        }

        result
    }
}
