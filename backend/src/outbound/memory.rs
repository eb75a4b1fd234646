//! In-memory repository adapters.
//!
//! Back the server when no `DATABASE_URL` is configured (development) and
//! the integration tests. A mutex-guarded map stands in for the document
//! store's per-record atomicity; semantics otherwise match the Diesel
//! adapters, including newest-first listings and duplicate-email detection.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ComplaintPersistenceError, ComplaintRepository, CredentialRecord, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Complaint, ComplaintId, ComplaintPatch, ComplaintWithOwner, OwnerContact, User, UserId,
};

fn recover<'a, T>(result: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>) -> MutexGuard<'a, T> {
    // A panic while holding the lock only happens in tests; the data is
    // still structurally sound, so keep serving it.
    result.unwrap_or_else(PoisonError::into_inner)
}

/// In-memory credential store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: Mutex<HashMap<UserId, CredentialRecord>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut records = recover(self.records.lock());
        let duplicate = records
            .values()
            .any(|record| record.user.email() == user.email());
        if duplicate {
            return Err(UserPersistenceError::duplicate_email(user.email().as_str()));
        }
        records.insert(
            *user.id(),
            CredentialRecord {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, UserPersistenceError> {
        let records = recover(self.records.lock());
        Ok(records
            .values()
            .find(|record| record.user.email().as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let records = recover(self.records.lock());
        Ok(records.get(id).map(|record| record.user.clone()))
    }
}

/// In-memory ticket store.
///
/// Holds a reference to the user store so reads can expand owner contact
/// details the way the SQL join does.
pub struct InMemoryComplaintRepository {
    users: std::sync::Arc<InMemoryUserRepository>,
    records: Mutex<HashMap<ComplaintId, Complaint>>,
}

impl InMemoryComplaintRepository {
    /// Create an empty store joined against `users`.
    #[must_use]
    pub fn new(users: std::sync::Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            records: Mutex::new(HashMap::new()),
        }
    }

    fn owner_contact(&self, owner_id: &UserId) -> OwnerContact {
        let records = recover(self.users.records.lock());
        records.get(owner_id).map_or_else(
            || OwnerContact {
                name: String::new(),
                email: String::new(),
            },
            |record| OwnerContact {
                name: record.user.name().as_str().to_owned(),
                email: record.user.email().as_str().to_owned(),
            },
        )
    }

    fn with_owner(&self, complaint: Complaint) -> ComplaintWithOwner {
        let owner = self.owner_contact(&complaint.owner_id);
        ComplaintWithOwner { complaint, owner }
    }

    fn collect_sorted(&self, mut complaints: Vec<Complaint>) -> Vec<ComplaintWithOwner> {
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        complaints
            .into_iter()
            .map(|complaint| self.with_owner(complaint))
            .collect()
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintPersistenceError> {
        let mut records = recover(self.records.lock());
        records.insert(complaint.id, complaint.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintPersistenceError> {
        let complaint = recover(self.records.lock()).get(id).cloned();
        Ok(complaint.map(|complaint| self.with_owner(complaint)))
    }

    async fn list_all(&self) -> Result<Vec<ComplaintWithOwner>, ComplaintPersistenceError> {
        let complaints: Vec<Complaint> = recover(self.records.lock()).values().cloned().collect();
        Ok(self.collect_sorted(complaints))
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<ComplaintWithOwner>, ComplaintPersistenceError> {
        let complaints: Vec<Complaint> = recover(self.records.lock())
            .values()
            .filter(|complaint| complaint.owner_id == *owner_id)
            .cloned()
            .collect();
        Ok(self.collect_sorted(complaints))
    }

    async fn update(
        &self,
        id: &ComplaintId,
        patch: &ComplaintPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<ComplaintWithOwner>, ComplaintPersistenceError> {
        let updated = {
            let mut records = recover(self.records.lock());
            records.get_mut(id).map(|complaint| {
                complaint.apply(patch, now);
                complaint.clone()
            })
        };
        Ok(updated.map(|complaint| self.with_owner(complaint)))
    }

    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintPersistenceError> {
        Ok(recover(self.records.lock()).remove(id).is_some())
    }
}
