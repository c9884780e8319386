//! Storage backends for the `profiles` table
//!
//! The directory talks to the table only through [`ProfileStore`]. Every call
//! acquires its own connection, runs one parameterized statement and gives the
//! connection back before returning, whichever way it returns.

use async_trait::async_trait;

use crate::error::DirectoryResult;
use crate::models::{ProfileRow, ProfileSummaryRow, UserProfile};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryProfileStore, StoreFault};
pub use postgres::PgProfileStore;

/// One-statement-per-call access to the `profiles` table
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Count rows whose username or email matches
    async fn count_by_username_or_email(&self, username: &str, email: &str)
    -> DirectoryResult<i64>;

    /// Insert the thirteen non-id columns, returning the number of rows written
    async fn insert(&self, profile: &UserProfile) -> DirectoryResult<u64>;

    /// Search projection for an exact last name
    async fn find_by_last_name(&self, last_name: &str) -> DirectoryResult<Vec<ProfileSummaryRow>>;

    /// Search projection for an exact department
    async fn find_by_department(&self, department: &str)
    -> DirectoryResult<Vec<ProfileSummaryRow>>;

    /// Search projection for every row
    async fn find_all(&self) -> DirectoryResult<Vec<ProfileSummaryRow>>;

    /// Every column but the password for one id
    async fn find_by_id(&self, id: i32) -> DirectoryResult<Option<ProfileRow>>;

    /// Overwrite the contact columns of the row with `id`
    async fn update(&self, id: i32, profile: &UserProfile) -> DirectoryResult<u64>;

    /// Remove the row with `id`
    async fn delete(&self, id: i32) -> DirectoryResult<u64>;
}
