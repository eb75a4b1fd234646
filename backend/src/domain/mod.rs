//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities and business rules of the
//! grievance tracker, independent of transport and storage. Inbound adapters
//! construct the validated command types at the boundary; outbound adapters
//! implement the ports in [`ports`].

pub mod account_service;
pub mod auth;
pub mod complaint;
pub mod complaint_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthenticatedIdentity, LoginCredentials, LoginValidationError, RegistrationDetails,
    RegistrationValidationError,
};
pub use self::complaint::{
    Category, Complaint, ComplaintDraft, ComplaintId, ComplaintPatch, ComplaintValidationError,
    ComplaintWithOwner, Department, OwnerContact, PatchValidationError, Priority, Status, Triage,
};
pub use self::complaint_service::ComplaintService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::token::{TokenCodec, TokenError, TOKEN_TTL_SECS};
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{DisplayName, EmailAddress, Role, User, UserId, UserValidationError};
