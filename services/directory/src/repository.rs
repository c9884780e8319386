//! User directory repository
//!
//! Existence checks, inserts and searches over the `profiles` table. Every
//! method issues a single statement through the injected [`ProfileStore`];
//! failures are logged here and reported through the return type instead of
//! being propagated.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{DirectoryConfig, Settings};
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::UserProfile;
use crate::outcome::{InsertOutcome, Outcome};
use crate::password;
use crate::store::{PgProfileStore, ProfileStore};

/// What [`UserDirectory::user_exists`] reports when the check itself fails.
///
/// Answering "exists" keeps callers from inserting a duplicate while the store
/// is unreachable, at the cost of misreporting during outages.
pub const EXISTS_ON_ERROR: bool = true;

/// Data-access component for user profiles
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn ProfileStore>,
    config: DirectoryConfig,
}

impl UserDirectory {
    /// Create a directory over a store it does not own
    pub fn new(store: Arc<dyn ProfileStore>, config: DirectoryConfig) -> Self {
        Self { store, config }
    }

    /// Build a PostgreSQL-backed directory from settings
    pub async fn connect(settings: &Settings) -> DirectoryResult<Self> {
        let store = PgProfileStore::connect(&settings.database).await?;
        Ok(Self::new(Arc::new(store), settings.directory.clone()))
    }

    /// Whether any row uses `username` or `email`, with the cause on failure
    pub async fn check_user_exists(&self, username: &str, email: &str) -> DirectoryResult<bool> {
        let count = self
            .store
            .count_by_username_or_email(username, email)
            .await?;
        Ok(count > 0)
    }

    /// Whether any row uses `username` or `email`
    ///
    /// Returns [`EXISTS_ON_ERROR`] when the check fails.
    pub async fn user_exists(&self, username: &str, email: &str) -> bool {
        match self.check_user_exists(username, email).await {
            Ok(exists) => exists,
            Err(e) => {
                error!(
                    category = e.category(),
                    "Existence check failed for username {}: {}", username, e
                );
                EXISTS_ON_ERROR
            }
        }
    }

    /// Insert a new profile, then check that its username or email is present
    ///
    /// `profile.id` is ignored. The generated id is not returned; look the
    /// profile up again to obtain it. The write and the check are separate
    /// statements, so a concurrent insert of the same username or email between
    /// them can make the check disagree with the write.
    pub async fn insert_user(&self, profile: &UserProfile) -> InsertOutcome {
        info!("Inserting new user: {}", profile.username);

        let write_error = match self.write_profile(profile).await {
            Ok(_) => None,
            Err(e) => {
                error!(
                    category = e.category(),
                    "Insert failed for username {}: {}", profile.username, e
                );
                Some(e)
            }
        };

        let verified_exists = self.user_exists(&profile.username, &profile.email).await;
        if write_error.is_none() && !verified_exists {
            warn!(
                "Insert for username {} completed but no matching row was found",
                profile.username
            );
        }

        InsertOutcome {
            write_error,
            verified_exists,
        }
    }

    async fn write_profile(&self, profile: &UserProfile) -> DirectoryResult<u64> {
        if !self.config.hash_passwords {
            return self.store.insert(profile).await;
        }

        let mut hashed = profile.clone();
        hashed.password = password::hash_password(&profile.password)?;
        self.store.insert(&hashed).await
    }

    /// Profiles whose last name equals `last_name`, in store order
    ///
    /// Only id, last name, first name, email and department are populated.
    pub async fn search_by_last_name(&self, last_name: &str) -> Outcome<Vec<UserProfile>> {
        info!("Searching users by last name: {}", last_name);

        let result = self.store.find_by_last_name(last_name).await;
        Self::search_outcome("last name", result)
    }

    /// Profiles whose department equals `department`, in store order
    ///
    /// Same projection as [`search_by_last_name`](Self::search_by_last_name).
    /// Rows with no department never match.
    pub async fn search_by_department(&self, department: &str) -> Outcome<Vec<UserProfile>> {
        info!("Searching users by department: {}", department);

        let result = self.store.find_by_department(department).await;
        Self::search_outcome("department", result)
    }

    /// Every profile, in store order, with the search projection
    pub async fn list_all(&self) -> Outcome<Vec<UserProfile>> {
        info!("Listing all users");

        let result = self.store.find_all().await;
        Self::search_outcome("list all", result)
    }

    fn search_outcome<R>(search: &str, result: DirectoryResult<Vec<R>>) -> Outcome<Vec<UserProfile>>
    where
        R: Into<UserProfile>,
    {
        let result: DirectoryResult<Vec<UserProfile>> =
            result.map(|rows| rows.into_iter().map(Into::into).collect());
        if let Err(e) = &result {
            if e.is_store_error() {
                error!(category = e.category(), "Search by {} failed in store: {}", search, e);
            } else {
                error!(category = e.category(), "Search by {} failed: {}", search, e);
            }
        }
        Outcome::from_rows(result)
    }

    /// One full profile by id, password left empty
    pub async fn access_profile(&self, id: i32) -> Outcome<UserProfile> {
        info!("Accessing profile with ID: {}", id);

        match self.store.find_by_id(id).await {
            Ok(Some(row)) => Outcome::Value(row.into()),
            Ok(None) => Outcome::Empty,
            Err(e) => {
                error!(category = e.category(), "Profile lookup failed for ID {}: {}", id, e);
                Outcome::Failed(e)
            }
        }
    }

    /// Overwrite the contact fields of a persisted profile
    ///
    /// Username and password are left untouched.
    pub async fn update_profile(&self, profile: &UserProfile) -> Outcome<u64> {
        let Some(id) = profile.id else {
            warn!("Refusing to update profile without an id: {}", profile.username);
            return Outcome::Failed(DirectoryError::MissingId);
        };
        info!("Updating profile with ID: {}", id);

        let result = self.store.update(id, profile).await;
        if let Err(e) = &result {
            error!(category = e.category(), "Update failed for ID {}: {}", id, e);
        }
        Outcome::from_affected(result)
    }

    /// Remove a profile by id
    pub async fn delete_user(&self, id: i32) -> Outcome<u64> {
        info!("Deleting profile with ID: {}", id);

        let result = self.store.delete(id).await;
        if let Err(e) = &result {
            error!(category = e.category(), "Delete failed for ID {}: {}", id, e);
        }
        Outcome::from_affected(result)
    }
}
