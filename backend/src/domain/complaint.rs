//! Complaint (grievance ticket) model.
//!
//! Defines the closed category/status/triage vocabulary, the validated
//! creation and update commands built at the HTTP boundary, and the persisted
//! complaint record. Wire strings match the store's CHECK constraints
//! exactly; the enums make any other value unrepresentable in the domain.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::user::UserId;

/// Maximum allowed length for a policy number.
pub const POLICY_NUMBER_MAX: usize = 64;
/// Maximum allowed length for a complaint title.
pub const TITLE_MAX: usize = 200;

/// Stable complaint identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ComplaintId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Complaint category chosen by the policy holder at filing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Problems with a filed claim.
    #[serde(rename = "Claim Issue")]
    ClaimIssue,
    /// Billing and premium payment problems.
    #[serde(rename = "Premium Payment")]
    PremiumPayment,
    /// Missing or incorrect policy documents.
    #[serde(rename = "Policy Document")]
    PolicyDocument,
    /// Requests to change personal details on the policy.
    #[serde(rename = "Update Personal Details")]
    UpdatePersonalDetails,
    /// Anything that does not fit the categories above.
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every recognised category, in display order.
    pub const ALL: [Self; 5] = [
        Self::ClaimIssue,
        Self::PremiumPayment,
        Self::PolicyDocument,
        Self::UpdatePersonalDetails,
        Self::Other,
    ];

    /// Stable string used on the wire and in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClaimIssue => "Claim Issue",
            Self::PremiumPayment => "Premium Payment",
            Self::PolicyDocument => "Policy Document",
            Self::UpdatePersonalDetails => "Update Personal Details",
            Self::Other => "Other",
        }
    }

    /// Parse a wire string into a category.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Derive the handling department and priority for this category.
    ///
    /// The mapping is fixed and server-authoritative:
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Category, Department, Priority};
    ///
    /// let triage = Category::ClaimIssue.triage();
    /// assert_eq!(triage.department, Department::Claims);
    /// assert_eq!(triage.priority, Priority::High);
    /// ```
    pub fn triage(self) -> Triage {
        match self {
            Self::PremiumPayment => Triage {
                department: Department::Finance,
                priority: Priority::High,
            },
            Self::ClaimIssue => Triage {
                department: Department::Claims,
                priority: Priority::High,
            },
            Self::PolicyDocument => Triage {
                department: Department::Administrative,
                priority: Priority::Medium,
            },
            Self::UpdatePersonalDetails | Self::Other => Triage {
                department: Department::GeneralSupport,
                priority: Priority::Low,
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Department a complaint is routed to, derived from its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    /// Handles premium payment issues.
    #[serde(rename = "Finance Department")]
    Finance,
    /// Handles claim disputes.
    #[serde(rename = "Claims Department")]
    Claims,
    /// Handles policy documentation.
    #[serde(rename = "Administrative Department")]
    Administrative,
    /// Catch-all for everything else.
    #[serde(rename = "General Support")]
    GeneralSupport,
}

impl Department {
    /// Stable string used on the wire and in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finance => "Finance Department",
            Self::Claims => "Claims Department",
            Self::Administrative => "Administrative Department",
            Self::GeneralSupport => "General Support",
        }
    }

    /// Parse a wire string into a department.
    pub fn parse(value: &str) -> Option<Self> {
        [
            Self::Finance,
            Self::Claims,
            Self::Administrative,
            Self::GeneralSupport,
        ]
        .into_iter()
        .find(|d| d.as_str() == value)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handling priority, derived from the complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Needs prompt attention.
    High,
    /// Routine handling.
    Medium,
    /// Best effort.
    Low,
}

impl Priority {
    /// Stable string used on the wire and in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a wire string into a priority.
    pub fn parse(value: &str) -> Option<Self> {
        [Self::High, Self::Medium, Self::Low]
            .into_iter()
            .find(|p| p.as_str() == value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Department/priority pair assigned at filing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triage {
    /// Department the complaint is routed to.
    pub department: Department,
    /// Handling priority.
    pub priority: Priority,
}

/// Lifecycle status of a complaint.
///
/// Transitions are admin-only and unordered: any status may be set from any
/// status by a direct admin update. Resolved and Rejected are terminal only
/// by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Filed and awaiting triage. The only status owners may delete from.
    Pending,
    /// Picked up by the assigned department.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Closed with a resolution.
    Resolved,
    /// Closed without a resolution.
    Rejected,
}

impl Status {
    /// Stable string used on the wire and in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }

    /// Parse a wire string into a status.
    pub fn parse(value: &str) -> Option<Self> {
        [Self::Pending, Self::InProgress, Self::Resolved, Self::Rejected]
            .into_iter()
            .find(|s| s.as_str() == value)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when constructing a [`ComplaintDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplaintValidationError {
    /// Policy number was missing or blank once trimmed.
    #[error("policy number must not be empty")]
    EmptyPolicyNumber,
    /// Policy number exceeds the storage limit.
    #[error("policy number must be at most {max} characters")]
    PolicyNumberTooLong { max: usize },
    /// Title was missing or blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeds the storage limit.
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// Description was missing or blank once trimmed.
    #[error("description must not be empty")]
    EmptyDescription,
    /// Category is not one of the recognised values.
    #[error("unknown category: {value}")]
    UnknownCategory { value: String },
}

/// Validated complaint-creation command built at the service boundary.
#[derive(Debug, Clone)]
pub struct ComplaintDraft {
    policy_number: String,
    category: Category,
    title: String,
    description: String,
}

impl ComplaintDraft {
    /// Construct a draft from raw string inputs.
    pub fn try_from_parts(
        policy_number: &str,
        category: &str,
        title: &str,
        description: &str,
    ) -> Result<Self, ComplaintValidationError> {
        let policy_number = policy_number.trim();
        if policy_number.is_empty() {
            return Err(ComplaintValidationError::EmptyPolicyNumber);
        }
        if policy_number.chars().count() > POLICY_NUMBER_MAX {
            return Err(ComplaintValidationError::PolicyNumberTooLong {
                max: POLICY_NUMBER_MAX,
            });
        }
        let category = Category::parse(category).ok_or_else(|| {
            ComplaintValidationError::UnknownCategory {
                value: category.to_owned(),
            }
        })?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ComplaintValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ComplaintValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ComplaintValidationError::EmptyDescription);
        }
        Ok(Self {
            policy_number: policy_number.to_owned(),
            category,
            title: title.to_owned(),
            description: description.to_owned(),
        })
    }

    /// Policy the grievance is filed against.
    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }

    /// Chosen category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Short summary of the grievance.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Full description of the grievance.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Validation errors returned when constructing a [`ComplaintPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchValidationError {
    /// Neither status nor admin response was supplied.
    #[error("update must change at least one field")]
    EmptyPatch,
    /// Status is not one of the recognised values.
    #[error("unknown status: {value}")]
    UnknownStatus { value: String },
    /// Admin response was supplied but blank.
    #[error("admin response must not be empty")]
    EmptyAdminResponse,
}

/// Validated admin update command: new status and/or resolution note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintPatch {
    status: Option<Status>,
    admin_response: Option<String>,
}

impl ComplaintPatch {
    /// Construct a patch from optional raw inputs.
    ///
    /// At least one field must be present; a supplied admin response must be
    /// non-blank.
    pub fn try_from_parts(
        status: Option<&str>,
        admin_response: Option<&str>,
    ) -> Result<Self, PatchValidationError> {
        let status = status
            .map(|value| {
                Status::parse(value).ok_or_else(|| PatchValidationError::UnknownStatus {
                    value: value.to_owned(),
                })
            })
            .transpose()?;
        let admin_response = admin_response
            .map(|value| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Err(PatchValidationError::EmptyAdminResponse)
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .transpose()?;
        if status.is_none() && admin_response.is_none() {
            return Err(PatchValidationError::EmptyPatch);
        }
        Ok(Self {
            status,
            admin_response,
        })
    }

    /// New status, when the patch changes it.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// New admin resolution note, when the patch sets one.
    pub fn admin_response(&self) -> Option<&str> {
        self.admin_response.as_deref()
    }
}

/// Persisted complaint record.
///
/// ## Invariants
/// - exactly one owner, set at filing time and immutable thereafter
/// - `department` and `priority` always agree with `category.triage()` as of
///   filing time
#[derive(Debug, Clone, PartialEq)]
pub struct Complaint {
    /// Stable identifier.
    pub id: ComplaintId,
    /// Owning user; immutable.
    pub owner_id: UserId,
    /// Policy the grievance is filed against (free text).
    pub policy_number: String,
    /// Chosen category.
    pub category: Category,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Lifecycle status.
    pub status: Status,
    /// Routed department, derived from the category.
    pub department: Department,
    /// Handling priority, derived from the category.
    pub priority: Priority,
    /// Optional admin resolution note.
    pub admin_response: Option<String>,
    /// Filing timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    /// File a new complaint for `owner` from a validated draft.
    ///
    /// Assigns a fresh id, derives department and priority from the
    /// category, and starts the lifecycle at [`Status::Pending`].
    pub fn file(owner: &UserId, draft: &ComplaintDraft, now: DateTime<Utc>) -> Self {
        let Triage {
            department,
            priority,
        } = draft.category().triage();
        Self {
            id: ComplaintId::random(),
            owner_id: *owner,
            policy_number: draft.policy_number().to_owned(),
            category: draft.category(),
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            status: Status::Pending,
            department,
            priority,
            admin_response: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an admin patch, bumping the modification timestamp.
    pub fn apply(&mut self, patch: &ComplaintPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status() {
            self.status = status;
        }
        if let Some(response) = patch.admin_response() {
            self.admin_response = Some(response.to_owned());
        }
        self.updated_at = now;
    }
}

/// Owner identity attached to admin-facing complaint views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerContact {
    /// Owner display name.
    pub name: String,
    /// Owner email address.
    pub email: String,
}

/// A complaint joined with its owner's contact details.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintWithOwner {
    /// The complaint record.
    pub complaint: Complaint,
    /// Contact details of the owning user.
    pub owner: OwnerContact,
}
