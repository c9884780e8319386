//! In-process profile store
//!
//! Behaves like the `profiles` table for the statements the directory issues:
//! ids are assigned on insert, username and email are unique, and department
//! may be NULL. Faults can be injected to exercise the error paths, and
//! connection checkouts are counted so callers can assert that every path
//! gives its connection back.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sqlx::Error as SqlxError;
use tokio::sync::Mutex;

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{ProfileRow, ProfileSummaryRow, UserProfile};

use super::ProfileStore;

/// Failure to raise on every call until cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// No connection can be acquired
    Connection,
    /// The statement fails after the connection is acquired
    Query,
    /// A returned row cannot be decoded
    Mapping,
}

#[derive(Debug, Clone)]
struct StoredProfile {
    row: ProfileRow,
    password: String,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<StoredProfile>,
    next_id: i32,
}

#[derive(Debug, Default)]
struct Connections {
    open: AtomicUsize,
    acquired: AtomicUsize,
}

/// Checked-out connection; releases on drop
struct ConnectionGuard {
    connections: Arc<Connections>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connections.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory profile store
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    table: Arc<Mutex<Table>>,
    fault: Arc<Mutex<Option<StoreFault>>>,
    connections: Arc<Connections>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail, or clear the fault with `None`
    pub async fn set_fault(&self, fault: Option<StoreFault>) {
        *self.fault.lock().await = fault;
    }

    /// Insert a raw row, bypassing uniqueness, and return its id. `row.id` is ignored.
    pub async fn seed(&self, mut row: ProfileRow, password: impl Into<String>) -> i32 {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        row.id = table.next_id;
        table.rows.push(StoredProfile {
            row,
            password: password.into(),
        });
        table.next_id
    }

    /// The password column as stored for `username`
    pub async fn stored_password(&self, username: &str) -> Option<String> {
        let table = self.table.lock().await;
        table
            .rows
            .iter()
            .find(|stored| stored.row.username == username)
            .map(|stored| stored.password.clone())
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Connections currently checked out
    pub fn open_connections(&self) -> usize {
        self.connections.open.load(Ordering::SeqCst)
    }

    /// Connections checked out since creation
    pub fn acquired_connections(&self) -> usize {
        self.connections.acquired.load(Ordering::SeqCst)
    }

    async fn connection(&self) -> DirectoryResult<ConnectionGuard> {
        if *self.fault.lock().await == Some(StoreFault::Connection) {
            return Err(DirectoryError::from_connection(SqlxError::PoolTimedOut));
        }

        self.connections.open.fetch_add(1, Ordering::SeqCst);
        self.connections.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(ConnectionGuard {
            connections: Arc::clone(&self.connections),
        })
    }

    /// Fail the statement if a post-acquire fault is set
    async fn statement_fault(&self) -> DirectoryResult<()> {
        match *self.fault.lock().await {
            Some(StoreFault::Query) => Err(DirectoryError::from_query(SqlxError::Protocol(
                "simulated statement failure".to_string(),
            ))),
            Some(StoreFault::Mapping) => Err(DirectoryError::from_query(
                SqlxError::ColumnNotFound("lastname".to_string()),
            )),
            _ => Ok(()),
        }
    }

    async fn select<F>(&self, filter: F) -> DirectoryResult<Vec<ProfileSummaryRow>>
    where
        F: Fn(&ProfileRow) -> bool + Send,
    {
        let _conn = self.connection().await?;
        self.statement_fault().await?;

        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .filter(|stored| filter(&stored.row))
            .map(|stored| stored.row.summary())
            .collect())
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn count_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DirectoryResult<i64> {
        let _conn = self.connection().await?;
        self.statement_fault().await?;

        let table = self.table.lock().await;
        let count = table
            .rows
            .iter()
            .filter(|stored| stored.row.username == username || stored.row.email == email)
            .count();
        Ok(count as i64)
    }

    async fn insert(&self, profile: &UserProfile) -> DirectoryResult<u64> {
        let _conn = self.connection().await?;
        self.statement_fault().await?;

        let mut table = self.table.lock().await;
        let duplicate = table.rows.iter().any(|stored| {
            stored.row.username == profile.username || stored.row.email == profile.email
        });
        if duplicate {
            return Err(DirectoryError::from_query(SqlxError::Protocol(
                "duplicate key value violates unique constraint".to_string(),
            )));
        }

        table.next_id += 1;
        let row = ProfileRow {
            id: table.next_id,
            firstname: profile.firstname.clone(),
            lastname: profile.lastname.clone(),
            email: profile.email.clone(),
            company: profile.company.clone(),
            department: profile.stored_department().map(str::to_string),
            title: profile.title.clone(),
            work_address: profile.work_address.clone(),
            work_city: profile.work_city.clone(),
            work_state: profile.work_state.clone(),
            work_zip: profile.work_zip.clone(),
            phone: profile.phone.clone(),
            username: profile.username.clone(),
        };
        table.rows.push(StoredProfile {
            row,
            password: profile.password.clone(),
        });
        Ok(1)
    }

    async fn find_by_last_name(&self, last_name: &str) -> DirectoryResult<Vec<ProfileSummaryRow>> {
        self.select(|row| row.lastname == last_name).await
    }

    async fn find_by_department(
        &self,
        department: &str,
    ) -> DirectoryResult<Vec<ProfileSummaryRow>> {
        // NULL never equals a bound parameter
        self.select(|row| row.department.as_deref() == Some(department))
            .await
    }

    async fn find_all(&self) -> DirectoryResult<Vec<ProfileSummaryRow>> {
        self.select(|_| true).await
    }

    async fn find_by_id(&self, id: i32) -> DirectoryResult<Option<ProfileRow>> {
        let _conn = self.connection().await?;
        self.statement_fault().await?;

        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .find(|stored| stored.row.id == id)
            .map(|stored| stored.row.clone()))
    }

    async fn update(&self, id: i32, profile: &UserProfile) -> DirectoryResult<u64> {
        let _conn = self.connection().await?;
        self.statement_fault().await?;

        let mut table = self.table.lock().await;
        // A missing row is not updated, so its constraints are never checked
        if !table.rows.iter().any(|stored| stored.row.id == id) {
            return Ok(0);
        }

        let email_taken = table
            .rows
            .iter()
            .any(|stored| stored.row.id != id && stored.row.email == profile.email);
        if email_taken {
            return Err(DirectoryError::from_query(SqlxError::Protocol(
                "duplicate key value violates unique constraint".to_string(),
            )));
        }

        let Some(stored) = table.rows.iter_mut().find(|stored| stored.row.id == id) else {
            return Ok(0);
        };
        let row = &mut stored.row;
        row.firstname = profile.firstname.clone();
        row.lastname = profile.lastname.clone();
        row.email = profile.email.clone();
        row.company = profile.company.clone();
        row.department = profile.stored_department().map(str::to_string);
        row.title = profile.title.clone();
        row.work_address = profile.work_address.clone();
        row.work_city = profile.work_city.clone();
        row.work_state = profile.work_state.clone();
        row.work_zip = profile.work_zip.clone();
        row.phone = profile.phone.clone();
        Ok(1)
    }

    async fn delete(&self, id: i32) -> DirectoryResult<u64> {
        let _conn = self.connection().await?;
        self.statement_fault().await?;

        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table.rows.retain(|stored| stored.row.id != id);
        Ok((before - table.rows.len()) as u64)
    }
}
