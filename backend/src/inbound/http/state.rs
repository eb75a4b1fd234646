//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, ComplaintsCommand, ComplaintsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and bearer-token resolution.
    pub auth: Arc<dyn AuthService>,
    /// Complaint mutations.
    pub complaints: Arc<dyn ComplaintsCommand>,
    /// Role-scoped complaint reads.
    pub complaints_query: Arc<dyn ComplaintsQuery>,
}

impl HttpState {
    /// Bundle the port implementations used by the HTTP layer.
    pub fn new(
        auth: Arc<dyn AuthService>,
        complaints: Arc<dyn ComplaintsCommand>,
        complaints_query: Arc<dyn ComplaintsQuery>,
    ) -> Self {
        Self {
            auth,
            complaints,
            complaints_query,
        }
    }
}
