//! # roster-entity
//!
//! Domain entity models for Roster: users, roles, permissions, audit
//! entries, and the replay snapshot decoded from audited edits.

pub mod audit;
pub mod permission;
pub mod role;
pub mod user;

pub use audit::{AuditEntry, CreateAuditEntry, ReplaySnapshot};
pub use permission::Permission;
pub use role::Role;
pub use user::{CreateUser, User, UserWithRoles};
