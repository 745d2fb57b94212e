// src/session/store.rs

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::cache::SessionCache;
use crate::common::AppError;
use crate::profile::models::{UserAccount, UserProfile};
use crate::services::backend::BackendError;

/// Remote side of profile persistence. Pushes are full-payload and
/// last-write-wins; there is no conflict detection and no retry.
#[async_trait]
pub trait ProfileSync: Send + Sync {
    async fn push_profile(&self, user_id: &str, profile: &UserProfile)
        -> Result<(), BackendError>;
}

/// Holds the active account and funnels every persistent profile mutation
/// through one entry point: apply in memory, push the full payload to the
/// remote row, rewrite the local cache. A failed push is logged and never
/// rolls the local mutation back.
pub struct SessionStore {
    account: Option<UserAccount>,
    cache: Box<dyn SessionCache>,
    sync: Arc<dyn ProfileSync>,
}

impl SessionStore {
    pub fn new(cache: Box<dyn SessionCache>, sync: Arc<dyn ProfileSync>) -> Self {
        Self {
            account: None,
            cache,
            sync,
        }
    }

    /// Restore the cached session, if any. A cached profile that has a name
    /// is treated as a logged-in session; an unnamed one is ignored.
    pub fn restore(&mut self) -> Option<&UserAccount> {
        match self.cache.load() {
            Ok(Some(account))
                if !account.profile.personal_info.full_name.trim().is_empty() =>
            {
                debug!(user_id = %account.id, "Restored cached session");
                self.account = Some(account);
                self.account.as_ref()
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to restore cached session");
                None
            }
        }
    }

    /// Open a session for a freshly authenticated account and mirror it to
    /// the cache.
    pub fn open(&mut self, account: UserAccount) {
        if let Err(e) = self.cache.store(&account) {
            warn!(error = %e, "Failed to write session cache");
        }
        self.account = Some(account);
    }

    pub fn account(&self) -> Option<&UserAccount> {
        self.account.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.account.as_ref().map(|a| &a.profile)
    }

    pub fn is_logged_in(&self) -> bool {
        self.account.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.account.as_ref().is_some_and(|a| a.is_admin())
    }

    /// The single mutation entry point. Applies `apply` to the in-memory
    /// profile, pushes the result to the remote row (failure logged, not
    /// surfaced, not rolled back), and rewrites the local cache.
    pub async fn mutate_profile<F>(&mut self, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut UserProfile),
    {
        let account = self
            .account
            .as_mut()
            .ok_or_else(|| AppError::Auth("No active session".to_string()))?;

        apply(&mut account.profile);

        if let Err(e) = self.sync.push_profile(&account.id, &account.profile).await {
            warn!(
                user_id = %account.id,
                error = %e,
                "Remote profile sync failed; keeping local state"
            );
        }

        if let Err(e) = self.cache.store(account) {
            warn!(error = %e, "Failed to rewrite session cache");
        }

        Ok(())
    }

    /// Destroy the session: drop the account and clear the local mirror.
    pub fn close(&mut self) {
        if let Err(e) = self.cache.clear() {
            warn!(error = %e, "Failed to clear session cache");
        }
        self.account = None;
    }
}
