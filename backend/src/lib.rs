//! Backend library for the insurance grievance tracker.
//!
//! Layout follows a hexagonal shape: [`domain`] holds the entities,
//! services, and ports; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports over PostgreSQL or in-memory
//! stores; [`middleware`] carries cross-cutting request concerns.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Per-request trace identifier.
pub use domain::TraceId;
/// Request tracing middleware.
pub use middleware::Trace;
