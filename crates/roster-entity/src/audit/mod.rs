//! Audit log domain entities.

pub mod model;
pub mod snapshot;

pub use model::{AuditEntry, CreateAuditEntry};
pub use snapshot::ReplaySnapshot;
