//! Complaint service implementing the [`ComplaintsCommand`] and
//! [`ComplaintsQuery`] driving ports.
//!
//! Authorisation rules live here, not in handlers: owners see and manage
//! only their own complaints, admins see and manage everything, and owner
//! deletion is limited to the Pending status.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::complaint::{
    Complaint, ComplaintDraft, ComplaintId, ComplaintPatch, ComplaintWithOwner, Status,
};
use super::error::Error;
use super::ports::{
    ComplaintPersistenceError, ComplaintRepository, ComplaintsCommand, ComplaintsQuery,
};
use super::user::User;

/// Complaint service backed by the ticket store.
#[derive(Clone)]
pub struct ComplaintService {
    complaints: Arc<dyn ComplaintRepository>,
}

impl ComplaintService {
    /// Create a new service with the given repository.
    pub fn new(complaints: Arc<dyn ComplaintRepository>) -> Self {
        Self { complaints }
    }

    fn map_persistence_error(error: ComplaintPersistenceError) -> Error {
        match error {
            ComplaintPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("ticket store unavailable: {message}"))
            }
            ComplaintPersistenceError::Query { message } => {
                Error::internal(format!("ticket store error: {message}"))
            }
        }
    }

    async fn require_existing(&self, id: &ComplaintId) -> Result<ComplaintWithOwner, Error> {
        self.complaints
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("complaint not found"))
    }
}

#[async_trait]
impl ComplaintsQuery for ComplaintService {
    async fn list(&self, caller: &User) -> Result<Vec<ComplaintWithOwner>, Error> {
        let listing = if caller.is_admin() {
            self.complaints.list_all().await
        } else {
            self.complaints.list_by_owner(caller.id()).await
        };
        listing.map_err(Self::map_persistence_error)
    }

    async fn get(&self, caller: &User, id: &ComplaintId) -> Result<ComplaintWithOwner, Error> {
        let view = self.require_existing(id).await?;
        if !caller.is_admin() && view.complaint.owner_id != *caller.id() {
            return Err(Error::unauthorized("not authorized"));
        }
        Ok(view)
    }
}

#[async_trait]
impl ComplaintsCommand for ComplaintService {
    async fn create(&self, caller: &User, draft: &ComplaintDraft) -> Result<Complaint, Error> {
        let complaint = Complaint::file(caller.id(), draft, Utc::now());
        self.complaints
            .insert(&complaint)
            .await
            .map_err(Self::map_persistence_error)?;
        debug!(
            complaint_id = %complaint.id,
            department = %complaint.department,
            priority = %complaint.priority,
            "complaint filed"
        );
        Ok(complaint)
    }

    async fn update(
        &self,
        caller: &User,
        id: &ComplaintId,
        patch: &ComplaintPatch,
    ) -> Result<ComplaintWithOwner, Error> {
        self.require_existing(id).await?;
        // Ownership alone is insufficient: only admins may update.
        if !caller.is_admin() {
            return Err(Error::unauthorized("not authorized"));
        }
        self.complaints
            .update(id, patch, Utc::now())
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("complaint not found"))
    }

    async fn delete(&self, caller: &User, id: &ComplaintId) -> Result<ComplaintId, Error> {
        let view = self.require_existing(id).await?;

        if !caller.is_admin() {
            if view.complaint.owner_id != *caller.id() {
                return Err(Error::unauthorized("not authorized"));
            }
            // Owners may only withdraw complaints nobody has started on.
            if view.complaint.status != Status::Pending {
                return Err(Error::invalid_request("cannot delete active ticket"));
            }
        }

        let removed = self
            .complaints
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?;
        if !removed {
            return Err(Error::not_found("complaint not found"));
        }
        debug!(complaint_id = %id, "complaint deleted");
        Ok(*id)
    }
}
