//! Profile model and its row projections

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One directory entry
///
/// Instances are transient: they either carry input for an insert or hold a
/// disconnected copy of one result row. Fields a query did not project are
/// left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Store-assigned identifier, `None` until persisted
    pub id: Option<i32>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub company: String,
    /// Never null; a missing department reads back as `""`
    pub department: String,
    pub title: String,
    pub work_address: String,
    pub work_city: String,
    pub work_state: String,
    pub work_zip: String,
    pub phone: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl UserProfile {
    /// Start a profile with the fields that identify an account
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        self.firstname = firstname.into();
        self.lastname = lastname.into();
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>, title: impl Into<String>) -> Self {
        self.company = company.into();
        self.title = title.into();
        self
    }

    pub fn with_work_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        self.work_address = address.into();
        self.work_city = city.into();
        self.work_state = state.into();
        self.work_zip = zip.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Department as written to the store; an empty one is NULL
    pub fn stored_department(&self) -> Option<&str> {
        if self.department.is_empty() {
            None
        } else {
            Some(&self.department)
        }
    }
}

/// The five columns returned by directory searches
#[derive(Debug, Clone, FromRow)]
pub struct ProfileSummaryRow {
    pub id: i32,
    pub lastname: String,
    pub firstname: String,
    pub email: String,
    pub department: Option<String>,
}

impl From<ProfileSummaryRow> for UserProfile {
    fn from(row: ProfileSummaryRow) -> Self {
        UserProfile {
            id: Some(row.id),
            lastname: row.lastname,
            firstname: row.firstname,
            email: row.email,
            department: row.department.unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// Every column except the password
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub company: String,
    pub department: Option<String>,
    pub title: String,
    pub work_address: String,
    pub work_city: String,
    pub work_state: String,
    pub work_zip: String,
    pub phone: String,
    pub username: String,
}

impl ProfileRow {
    /// Narrow to the search projection
    pub fn summary(&self) -> ProfileSummaryRow {
        ProfileSummaryRow {
            id: self.id,
            lastname: self.lastname.clone(),
            firstname: self.firstname.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
        }
    }
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: Some(row.id),
            firstname: row.firstname,
            lastname: row.lastname,
            email: row.email,
            company: row.company,
            department: row.department.unwrap_or_default(),
            title: row.title,
            work_address: row.work_address,
            work_city: row.work_city,
            work_state: row.work_state,
            work_zip: row.work_zip,
            phone: row.phone,
            username: row.username,
            password: String::new(),
        }
    }
}
