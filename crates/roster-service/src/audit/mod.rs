//! Audit log access.

pub mod service;

pub use service::AuditService;
