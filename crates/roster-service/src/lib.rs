//! # roster-service
//!
//! Business logic service layer for Roster. Each service orchestrates
//! repositories, policies, and credential handling to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod audit;
pub mod context;
pub mod password;
pub mod policy;
pub mod user;

pub use audit::AuditService;
pub use context::RequestContext;
pub use password::{PasswordHasher, PasswordValidator};
pub use policy::{ProtectedUserPolicy, UserPolicy};
pub use user::{AdminUserService, ReplayService};
