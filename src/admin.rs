// src/admin.rs
//! Admin panel operations: user-table summaries and spreadsheet export.

use serde::Serialize;

use crate::profile::models::UserAccount;
use crate::profile::scoring::{CompletionScorer, ScoreWeights};

/// One row of the admin user table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub major: String,
    /// Completion under the coarse admin table.
    pub completion: u8,
}

pub fn summarize_users(users: &[UserAccount]) -> Vec<UserSummary> {
    let scorer = CompletionScorer::new(ScoreWeights::admin_overview());

    users
        .iter()
        .map(|user| UserSummary {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.profile.personal_info.full_name.clone(),
            major: user
                .profile
                .education
                .first()
                .map(|entry| entry.major.clone())
                .unwrap_or_default(),
            completion: scorer.score(&user.profile).percentage,
        })
        .collect()
}

/// Spreadsheet-ready CSV of the full user table. Leads with a UTF-8 BOM so
/// non-ASCII names survive spreadsheet imports; phone cells carry a leading
/// apostrophe so the digits are not re-formatted as numbers.
pub fn export_users_csv(users: &[UserAccount]) -> String {
    let mut csv = String::from("\u{feff}");
    csv.push_str(
        "Full Name,Email,Nationality,City,Phone,Birth Date,Gender,Degree,Major,University,\
         Experience Titles,Years of Experience,Target Titles,Certifications\n",
    );

    for user in users {
        let p = &user.profile;
        let education = p.education.first();
        let experiences = p
            .experience
            .list
            .iter()
            .map(|entry| entry.title.as_str())
            .collect::<Vec<_>>()
            .join(" - ");
        let interests = p.job_interests.titles.join(" - ");
        let certifications = p
            .certifications
            .list
            .iter()
            .map(|cert| cert.name.as_str())
            .collect::<Vec<_>>()
            .join(" - ");

        let row = [
            p.personal_info.full_name.clone(),
            user.email.clone(),
            p.personal_info.nationality.clone(),
            p.personal_info.city.clone(),
            format!("'{}", p.personal_info.phone),
            p.personal_info.birth_date.clone(),
            p.personal_info.gender.to_string(),
            education
                .map(|entry| entry.degree.to_string())
                .unwrap_or_default(),
            education
                .map(|entry| entry.major.clone())
                .unwrap_or_default(),
            education
                .map(|entry| entry.university.clone())
                .unwrap_or_default(),
            experiences,
            p.experience.years.clone(),
            interests,
            certifications,
        ];

        let line = row
            .iter()
            .map(|cell| csv_cell(cell))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
