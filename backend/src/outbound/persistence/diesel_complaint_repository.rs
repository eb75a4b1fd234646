//! PostgreSQL-backed `ComplaintRepository` implementation using Diesel.
//!
//! Every read joins the owners table so the port can hand back complaints
//! with owner contact details in one round trip; the inbound layer decides
//! whether the contact is exposed to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ComplaintPersistenceError, ComplaintRepository};
use crate::domain::{
    Category, Complaint, ComplaintId, ComplaintPatch, ComplaintWithOwner, Department,
    OwnerContact, Priority, Status, UserId,
};

use super::models::{ComplaintChanges, ComplaintRow, NewComplaintRow};
use super::pool::{DbPool, PoolError};
use super::schema::{complaints, users};

/// A complaint row joined with its owner's contact columns.
type JoinedRow = (ComplaintRow, String, String);

/// Diesel-backed implementation of the `ComplaintRepository` port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain complaint persistence errors.
fn map_pool_error(error: PoolError) -> ComplaintPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ComplaintPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain complaint persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> ComplaintPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ComplaintPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => ComplaintPersistenceError::query("record not found"),
        _ => ComplaintPersistenceError::query("database error"),
    }
}

fn invalid_row(field: &str, value: &str) -> ComplaintPersistenceError {
    ComplaintPersistenceError::query(format!("stored complaint has invalid {field}: {value}"))
}

/// Convert a joined database row to a domain view.
///
/// The CHECK constraints make invalid enum values unreachable in practice;
/// a row that still fails to parse is reported rather than skipped.
fn row_to_view(row: JoinedRow) -> Result<ComplaintWithOwner, ComplaintPersistenceError> {
    let (row, owner_name, owner_email) = row;
    let category =
        Category::parse(&row.category).ok_or_else(|| invalid_row("category", &row.category))?;
    let status = Status::parse(&row.status).ok_or_else(|| invalid_row("status", &row.status))?;
    let department = Department::parse(&row.department)
        .ok_or_else(|| invalid_row("department", &row.department))?;
    let priority =
        Priority::parse(&row.priority).ok_or_else(|| invalid_row("priority", &row.priority))?;

    Ok(ComplaintWithOwner {
        complaint: Complaint {
            id: ComplaintId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            policy_number: row.policy_number,
            category,
            title: row.title,
            description: row.description,
            status,
            department,
            priority,
            admin_response: row.admin_response,
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
        owner: OwnerContact {
            name: owner_name,
            email: owner_email,
        },
    })
}

async fn fetch_view<C>(conn: &mut C, id: &Uuid) -> Result<Option<JoinedRow>, diesel::result::Error>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    complaints::table
        .inner_join(users::table)
        .filter(complaints::id.eq(id))
        .select((ComplaintRow::as_select(), users::name, users::email))
        .first::<JoinedRow>(conn)
        .await
        .optional()
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewComplaintRow {
            id: *complaint.id.as_uuid(),
            owner_id: *complaint.owner_id.as_uuid(),
            policy_number: &complaint.policy_number,
            category: complaint.category.as_str(),
            title: &complaint.title,
            description: &complaint.description,
            status: complaint.status.as_str(),
            department: complaint.department.as_str(),
            priority: complaint.priority.as_str(),
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        };

        diesel::insert_into(complaints::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = fetch_view(&mut conn, id.as_uuid())
            .await
            .map_err(map_diesel_error)?;
        row.map(row_to_view).transpose()
    }

    async fn list_all(&self) -> Result<Vec<ComplaintWithOwner>, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<JoinedRow> = complaints::table
            .inner_join(users::table)
            .order(complaints::created_at.desc())
            .select((ComplaintRow::as_select(), users::name, users::email))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_view).collect()
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<JoinedRow> = complaints::table
            .inner_join(users::table)
            .filter(complaints::owner_id.eq(owner_id.as_uuid()))
            .order(complaints::created_at.desc())
            .select((ComplaintRow::as_select(), users::name, users::email))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_view).collect()
    }

    async fn update(
        &self,
        id: &ComplaintId,
        patch: &ComplaintPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ComplaintChanges {
            status: patch.status().map(Status::as_str),
            admin_response: patch.admin_response(),
            updated_at: now,
        };

        let updated_rows = diesel::update(complaints::table.find(id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated_rows == 0 {
            return Ok(None);
        }

        let row = fetch_view(&mut conn, id.as_uuid())
            .await
            .map_err(map_diesel_error)?;
        row.map(row_to_view).transpose()
    }

    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(complaints::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
