//! Profile directory data-access layer
//!
//! This crate checks username/email uniqueness, inserts new users and searches
//! the `profiles` table. [`UserDirectory`] is the entry point; it works over any
//! [`store::ProfileStore`], with [`store::PgProfileStore`] for PostgreSQL and
//! [`store::InMemoryProfileStore`] for tests.
//!
//! ```rust,no_run
//! use directory::{Settings, UserDirectory, UserProfile};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     directory::telemetry::init_tracing()?;
//!
//!     let settings = Settings::from_env()?;
//!     let directory = UserDirectory::connect(&settings).await?;
//!
//!     let profile = UserProfile::new("jdoe", "jdoe@example.com", "s3cret").with_name("John", "Doe");
//!     let outcome = directory.insert_user(&profile).await;
//!     println!("exists after write: {}", outcome.verified_exists_after_write());
//!
//!     for found in directory.search_by_last_name("Doe").await.into_profiles() {
//!         println!("{} {} <{}>", found.firstname, found.lastname, found.email);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod outcome;
pub mod password;
pub mod repository;
pub mod store;
pub mod telemetry;

pub use config::{DirectoryConfig, Settings};
pub use error::{DirectoryError, DirectoryResult};
pub use models::UserProfile;
pub use outcome::{InsertOutcome, Outcome};
pub use repository::{EXISTS_ON_ERROR, UserDirectory};
