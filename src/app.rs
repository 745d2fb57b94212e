// src/app.rs
//! Top-level application controller: the screen router plus one operation
//! per user action. Owns the session store and both service adapters.

use std::sync::Arc;

use tracing::{info, warn};

use crate::admin::{self, UserSummary};
use crate::common::config::AppConfig;
use crate::common::error::AppError;
use crate::interview::{Difficulty, InterviewFeedback, InterviewSession};
use crate::jobs::models::{JobPosting, TailoredApplication};
use crate::onboarding::OnboardingWizard;
use crate::profile::models::{AppliedJob, InterviewRecord, UserProfile};
use crate::profile::scoring::{CompletionReport, CompletionScorer, ScoreWeights};
use crate::services::{BackendService, GenerativeService};
use crate::session::{FileSessionCache, SessionStore};

/// Fallback interview role when the profile names no target titles.
const DEFAULT_INTERVIEW_TITLE: &str = "Software Developer";

/// Fallback search titles when the profile names no target titles.
const DEFAULT_SEARCH_TITLES: [&str; 2] = ["Accountant", "Project Manager"];

/// Shown in place of a tailored cover letter when the generative call fails.
const PLACEHOLDER_COVER_LETTER: &str = "We could not prepare a tailored letter right now. \
     You can still apply directly through the listing link.";

/// Top-level screens. Flat: no nested routing, no history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Onboarding,
    Dashboard,
    Interview,
    CvBuilder,
    Jobs,
    Profile,
    Admin,
}

impl Screen {
    fn requires_session(self) -> bool {
        !matches!(self, Screen::Welcome | Screen::Onboarding)
    }
}

pub struct App {
    backend: Arc<BackendService>,
    generative: Arc<GenerativeService>,
    session: SessionStore,
    scorer: CompletionScorer,
    screen: Screen,
}

impl App {
    /// Wire the application core from configuration: both adapters, the
    /// file-backed session cache, and the default score table.
    pub fn new(config: &AppConfig) -> Self {
        let backend = Arc::new(BackendService::new(config));
        let session = SessionStore::new(
            Box::new(FileSessionCache::new(&config.session_cache_path)),
            backend.clone(),
        );

        Self::with_parts(backend, Arc::new(GenerativeService::new(config)), session)
    }

    /// Custom wiring for shells and tests that bring their own adapters.
    pub fn with_parts(
        backend: Arc<BackendService>,
        generative: Arc<GenerativeService>,
        session: SessionStore,
    ) -> Self {
        Self {
            backend,
            generative,
            session,
            scorer: CompletionScorer::new(ScoreWeights::default()),
            screen: Screen::Welcome,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.profile()
    }

    /// Restore a cached session at startup; lands on the dashboard when one
    /// exists.
    pub fn restore_session(&mut self) -> bool {
        if self.session.restore().is_some() {
            self.screen = Screen::Dashboard;
            true
        } else {
            false
        }
    }

    /// Switch screens. Guarded: everything past onboarding needs a session,
    /// and the admin screen needs the admin role.
    pub fn navigate(&mut self, screen: Screen) -> Result<(), AppError> {
        if screen.requires_session() && !self.session.is_logged_in() {
            return Err(AppError::Auth("Sign in to continue".to_string()));
        }
        if screen == Screen::Admin && !self.session.is_admin() {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        self.screen = screen;
        Ok(())
    }

    // ========================================================================
    // Welcome screen
    // ========================================================================

    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        let account = self.backend.sign_up(email, password).await?;
        self.session.open(account);
        self.screen = Screen::Onboarding;
        Ok(())
    }

    pub async fn log_in(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        let account = self.backend.login(email, password).await?;
        self.session.open(account);
        self.screen = Screen::Dashboard;
        Ok(())
    }

    /// Destroy the session and return to the welcome screen.
    pub async fn log_out(&mut self) {
        self.backend.clear_token().await;
        self.session.close();
        self.screen = Screen::Welcome;
        info!("Session closed");
    }

    // ========================================================================
    // Onboarding screen
    // ========================================================================

    pub fn start_onboarding(&self) -> OnboardingWizard {
        OnboardingWizard::new()
    }

    /// Persist the profile emitted by the wizard's terminal step and move to
    /// the dashboard.
    pub async fn complete_onboarding(&mut self, profile: UserProfile) -> Result<(), AppError> {
        self.session
            .mutate_profile(|current| *current = profile)
            .await?;
        self.screen = Screen::Dashboard;
        info!("Onboarding completed");
        Ok(())
    }

    // ========================================================================
    // Dashboard screen
    // ========================================================================

    pub fn completion_report(&self) -> Option<CompletionReport> {
        self.session.profile().map(|p| self.scorer.score(p))
    }

    // ========================================================================
    // Interview screen
    // ========================================================================

    /// Generate questions and open an interview session. Defaults the role
    /// to the profile's first target title.
    pub async fn start_interview(
        &self,
        job_title: Option<String>,
        difficulty: Difficulty,
    ) -> Result<InterviewSession, AppError> {
        let title = job_title
            .or_else(|| {
                self.session
                    .profile()
                    .and_then(|p| p.job_interests.titles.first().cloned())
            })
            .unwrap_or_else(|| DEFAULT_INTERVIEW_TITLE.to_string());

        let questions = self.generative.interview_questions(&title, difficulty).await?;
        Ok(InterviewSession::new(title, difficulty, questions))
    }

    /// Score the finished interview and append the attempt to the activity
    /// log.
    pub async fn finish_interview(
        &mut self,
        session: InterviewSession,
    ) -> Result<InterviewFeedback, AppError> {
        let feedback = self
            .generative
            .score_interview(session.answers(), session.job_title())
            .await?;

        let record = InterviewRecord::new(session.job_title(), feedback.fluency);
        self.session
            .mutate_profile(|p| p.activity.interviews.push(record))
            .await?;

        Ok(feedback)
    }

    // ========================================================================
    // Jobs screen
    // ========================================================================

    /// Search grounded in the profile's target titles. Failures degrade to
    /// an empty board rather than an error screen.
    pub async fn discover_jobs(&self) -> Vec<JobPosting> {
        let interests: Vec<String> = match self.session.profile() {
            Some(p) if !p.job_interests.titles.is_empty() => p.job_interests.titles.clone(),
            _ => DEFAULT_SEARCH_TITLES.iter().map(|t| t.to_string()).collect(),
        };

        match self.generative.search_jobs(&interests).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(error = %e, "Job search failed; showing empty board");
                Vec::new()
            }
        }
    }

    /// Tailor an application for one listing and log it as applied. A failed
    /// tailoring call degrades to a placeholder letter; the application is
    /// still logged.
    pub async fn apply_to_job(
        &mut self,
        job: &JobPosting,
    ) -> Result<TailoredApplication, AppError> {
        let profile = self
            .session
            .profile()
            .ok_or_else(|| AppError::Auth("No active session".to_string()))?
            .clone();

        let tailored = match self
            .generative
            .tailor_application(&profile, &job.title, &job.company)
            .await
        {
            Ok(tailored) => tailored,
            Err(e) => {
                warn!(error = %e, "Tailoring failed; using placeholder letter");
                TailoredApplication {
                    cover_letter: PLACEHOLDER_COVER_LETTER.to_string(),
                    key_points: Vec::new(),
                }
            }
        };

        let record = AppliedJob::new(&job.title, &job.company, &job.platform);
        self.session
            .mutate_profile(|p| p.activity.applied_jobs.push(record))
            .await?;

        Ok(tailored)
    }

    // ========================================================================
    // CV builder screen
    // ========================================================================

    /// AI rewrite of the CV content. Gated on the credit balance; one credit
    /// is spent per successful rewrite.
    pub async fn enhance_cv(&mut self) -> Result<String, AppError> {
        let profile = self
            .session
            .profile()
            .ok_or_else(|| AppError::Auth("No active session".to_string()))?
            .clone();

        if profile.activity.credits == 0 {
            return Err(AppError::CreditsExhausted);
        }

        let enhanced = self.generative.enhance_cv(&profile).await?;
        self.session
            .mutate_profile(|p| {
                p.activity.spend_credit();
            })
            .await?;

        Ok(enhanced)
    }

    // ========================================================================
    // Profile screen
    // ========================================================================

    /// Apply a profile edit through the single mutation path.
    pub async fn update_profile<F>(&mut self, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut UserProfile),
    {
        self.session.mutate_profile(apply).await
    }

    // ========================================================================
    // Admin screen
    // ========================================================================

    pub async fn admin_users(&self) -> Result<Vec<UserSummary>, AppError> {
        self.require_admin()?;
        let users = self.backend.list_users().await?;
        Ok(admin::summarize_users(&users))
    }

    pub async fn admin_export_csv(&self) -> Result<String, AppError> {
        self.require_admin()?;
        let users = self.backend.list_users().await?;
        Ok(admin::export_users_csv(&users))
    }

    fn require_admin(&self) -> Result<(), AppError> {
        if self.session.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{Role, UserAccount};
    use crate::services::backend::BackendError;
    use crate::session::cache::{SessionCache, SessionCacheError};
    use crate::session::store::ProfileSync;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MemoryCache(Mutex<Option<UserAccount>>);

    impl SessionCache for MemoryCache {
        fn load(&self) -> Result<Option<UserAccount>, SessionCacheError> {
            Ok(self.0.lock().expect("lock").clone())
        }
        fn store(&self, account: &UserAccount) -> Result<(), SessionCacheError> {
            *self.0.lock().expect("lock") = Some(account.clone());
            Ok(())
        }
        fn clear(&self) -> Result<(), SessionCacheError> {
            *self.0.lock().expect("lock") = None;
            Ok(())
        }
    }

    struct NullSync;

    #[async_trait]
    impl ProfileSync for NullSync {
        async fn push_profile(
            &self,
            _user_id: &str,
            _profile: &UserProfile,
        ) -> Result<(), BackendError> {
            Ok(())
        }
    }

    fn offline_app() -> App {
        let config = AppConfig {
            backend_url: "http://localhost:1".to_string(),
            backend_api_key: "unused".to_string(),
            admin_emails: Default::default(),
            generative_base_url: "http://localhost:1".to_string(),
            generative_api_key: "unused".to_string(),
            generative_model: "unused".to_string(),
            session_cache_path: "./unused.json".into(),
        };
        let backend = Arc::new(BackendService::new(&config));
        let session = SessionStore::new(
            Box::new(MemoryCache(Mutex::new(None))),
            Arc::new(NullSync),
        );
        App::with_parts(backend, Arc::new(GenerativeService::new(&config)), session)
    }

    fn account(role: Role) -> UserAccount {
        let mut profile = UserProfile::default();
        profile.personal_info.full_name = "Sara Al-Harbi".to_string();
        UserAccount {
            id: "u-1".to_string(),
            email: "sara@example.com".to_string(),
            role,
            created_at: "2026-02-01T08:00:00Z".to_string(),
            profile,
        }
    }

    fn open_session(app: &mut App, role: Role) {
        let account = account(role);
        // Reaching into the store the way the login path does.
        let store = &mut app.session;
        store.open(account);
    }

    #[test]
    fn test_navigation_requires_session() {
        let mut app = offline_app();
        assert_eq!(app.screen(), Screen::Welcome);

        assert!(matches!(
            app.navigate(Screen::Dashboard),
            Err(AppError::Auth(_))
        ));
        assert!(app.navigate(Screen::Onboarding).is_ok());

        open_session(&mut app, Role::User);
        assert!(app.navigate(Screen::Dashboard).is_ok());
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_admin_screen_requires_admin_role() {
        let mut app = offline_app();
        open_session(&mut app, Role::User);
        assert!(matches!(
            app.navigate(Screen::Admin),
            Err(AppError::Forbidden(_))
        ));

        let mut admin_app = offline_app();
        open_session(&mut admin_app, Role::Admin);
        assert!(admin_app.navigate(Screen::Admin).is_ok());
    }

    #[tokio::test]
    async fn test_enhance_cv_gates_on_credits() {
        let mut app = offline_app();
        open_session(&mut app, Role::User);

        app.update_profile(|p| p.activity.credits = 0)
            .await
            .expect("mutation succeeds");

        assert!(matches!(
            app.enhance_cv().await,
            Err(AppError::CreditsExhausted)
        ));
    }

    #[tokio::test]
    async fn test_complete_onboarding_lands_on_dashboard() {
        let mut app = offline_app();
        open_session(&mut app, Role::User);

        let mut profile = UserProfile::default();
        profile.personal_info.full_name = "Khalid Al-Otaibi".to_string();

        app.complete_onboarding(profile.clone())
            .await
            .expect("completes");

        assert_eq!(app.screen(), Screen::Dashboard);
        assert_eq!(
            app.profile().expect("profile").personal_info.full_name,
            "Khalid Al-Otaibi"
        );
    }

    #[tokio::test]
    async fn test_admin_calls_refused_for_users() {
        let mut app = offline_app();
        open_session(&mut app, Role::User);

        assert!(matches!(
            app.admin_users().await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            app.admin_export_csv().await,
            Err(AppError::Forbidden(_))
        ));
    }
}
