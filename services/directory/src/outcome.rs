//! Results of directory operations
//!
//! An [`Outcome`] keeps "nothing matched" and "the store failed" apart. The
//! `into_*` helpers give callers the collapsed view when they only care about
//! the data.

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::UserProfile;

/// Value, nothing, or failure with its cause
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation succeeded and produced something
    Value(T),
    /// The operation succeeded but matched or affected nothing
    Empty,
    /// The operation failed
    Failed(DirectoryError),
}

impl<T> Outcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DirectoryError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Back to a plain result, with `Empty` as `Ok(None)`
    pub fn into_result(self) -> DirectoryResult<Option<T>> {
        match self {
            Outcome::Value(value) => Ok(Some(value)),
            Outcome::Empty => Ok(None),
            Outcome::Failed(err) => Err(err),
        }
    }
}

impl Outcome<Vec<UserProfile>> {
    /// Build from a row list; no rows is `Empty`
    pub fn from_rows(result: DirectoryResult<Vec<UserProfile>>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => Outcome::Empty,
            Ok(rows) => Outcome::Value(rows),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Matching profiles, or an empty list when none matched or the query failed
    pub fn into_profiles(self) -> Vec<UserProfile> {
        self.into_value().unwrap_or_default()
    }
}

impl Outcome<u64> {
    /// Build from an affected-row count; zero rows is `Empty`
    pub fn from_affected(result: DirectoryResult<u64>) -> Self {
        match result {
            Ok(0) => Outcome::Empty,
            Ok(rows) => Outcome::Value(rows),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Whether at least one row changed
    pub fn applied(&self) -> bool {
        matches!(self, Outcome::Value(rows) if *rows > 0)
    }
}

/// What happened when a profile was inserted
///
/// The write and the existence check that follows it are reported separately.
/// [`verified_exists_after_write`](Self::verified_exists_after_write) says a
/// row with the username or email is present after the attempt, which is also
/// true when the row was already there or when the check itself failed.
#[derive(Debug)]
pub struct InsertOutcome {
    /// Why the write failed, if it did
    pub write_error: Option<DirectoryError>,
    /// Result of the existence check run after the write
    pub verified_exists: bool,
}

impl InsertOutcome {
    /// A row with this username or email exists after the write attempt
    pub fn verified_exists_after_write(&self) -> bool {
        self.verified_exists
    }

    /// The insert statement itself completed
    pub fn write_succeeded(&self) -> bool {
        self.write_error.is_none()
    }
}
