//! PostgreSQL profile store

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, pool::PoolConnection};
use tracing::debug;

use common::database::{DatabaseConfig, init_pool};

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{ProfileRow, ProfileSummaryRow, UserProfile};

use super::ProfileStore;

/// Profile store backed by an injected PostgreSQL pool
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Create a store over a pool owned by the caller
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool from configuration and wrap it
    pub async fn connect(config: &DatabaseConfig) -> DirectoryResult<Self> {
        let pool = init_pool(config).await?;
        Ok(Self::new(pool))
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check out a connection for a single statement. It returns to the pool on drop.
    async fn connection(&self) -> DirectoryResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(DirectoryError::from_connection)
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn count_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DirectoryResult<i64> {
        debug!("Counting profiles by username or email");
        let mut conn = self.connection().await?;

        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE username = $1 OR email = $2")
            .bind(username)
            .bind(email)
            .fetch_one(&mut *conn)
            .await
            .map_err(DirectoryError::from_query)
    }

    async fn insert(&self, profile: &UserProfile) -> DirectoryResult<u64> {
        debug!("Inserting profile for username: {}", profile.username);
        let mut conn = self.connection().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO profiles (firstname, lastname, email, company, department, title,
                                  work_address, work_city, work_state, work_zip, phone,
                                  username, password)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&profile.firstname)
        .bind(&profile.lastname)
        .bind(&profile.email)
        .bind(&profile.company)
        .bind(profile.stored_department())
        .bind(&profile.title)
        .bind(&profile.work_address)
        .bind(&profile.work_city)
        .bind(&profile.work_state)
        .bind(&profile.work_zip)
        .bind(&profile.phone)
        .bind(&profile.username)
        .bind(&profile.password)
        .execute(&mut *conn)
        .await
        .map_err(DirectoryError::from_query)?;

        Ok(result.rows_affected())
    }

    async fn find_by_last_name(&self, last_name: &str) -> DirectoryResult<Vec<ProfileSummaryRow>> {
        debug!("Searching profiles by last name: {}", last_name);
        let mut conn = self.connection().await?;

        sqlx::query_as::<_, ProfileSummaryRow>(
            "SELECT id, lastname, firstname, email, department FROM profiles WHERE lastname = $1",
        )
        .bind(last_name)
        .fetch_all(&mut *conn)
        .await
        .map_err(DirectoryError::from_query)
    }

    async fn find_by_department(
        &self,
        department: &str,
    ) -> DirectoryResult<Vec<ProfileSummaryRow>> {
        debug!("Searching profiles by department: {}", department);
        let mut conn = self.connection().await?;

        sqlx::query_as::<_, ProfileSummaryRow>(
            "SELECT id, lastname, firstname, email, department FROM profiles WHERE department = $1",
        )
        .bind(department)
        .fetch_all(&mut *conn)
        .await
        .map_err(DirectoryError::from_query)
    }

    async fn find_all(&self) -> DirectoryResult<Vec<ProfileSummaryRow>> {
        debug!("Listing all profiles");
        let mut conn = self.connection().await?;

        sqlx::query_as::<_, ProfileSummaryRow>(
            "SELECT id, lastname, firstname, email, department FROM profiles",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(DirectoryError::from_query)
    }

    async fn find_by_id(&self, id: i32) -> DirectoryResult<Option<ProfileRow>> {
        debug!("Finding profile by ID: {}", id);
        let mut conn = self.connection().await?;

        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, firstname, lastname, email, company, department, title,
                   work_address, work_city, work_state, work_zip, phone, username
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DirectoryError::from_query)
    }

    async fn update(&self, id: i32, profile: &UserProfile) -> DirectoryResult<u64> {
        debug!("Updating profile with ID: {}", id);
        let mut conn = self.connection().await?;

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET firstname = $1, lastname = $2, email = $3, company = $4, department = $5,
                title = $6, work_address = $7, work_city = $8, work_state = $9,
                work_zip = $10, phone = $11
            WHERE id = $12
            "#,
        )
        .bind(&profile.firstname)
        .bind(&profile.lastname)
        .bind(&profile.email)
        .bind(&profile.company)
        .bind(profile.stored_department())
        .bind(&profile.title)
        .bind(&profile.work_address)
        .bind(&profile.work_city)
        .bind(&profile.work_state)
        .bind(&profile.work_zip)
        .bind(&profile.phone)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(DirectoryError::from_query)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> DirectoryResult<u64> {
        debug!("Deleting profile with ID: {}", id);
        let mut conn = self.connection().await?;

        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(DirectoryError::from_query)?;

        Ok(result.rows_affected())
    }
}
