//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{complaints, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the complaints table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub policy_number: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub department: String,
    pub priority: String,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new complaint records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaints)]
pub(crate) struct NewComplaintRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub policy_number: &'a str,
    pub category: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub department: &'a str,
    pub priority: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for admin updates to complaint records.
///
/// `None` fields are skipped by Diesel, so a patch only touches what it
/// sets; `updated_at` is always bumped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = complaints)]
pub(crate) struct ComplaintChanges<'a> {
    pub status: Option<&'a str>,
    pub admin_response: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
