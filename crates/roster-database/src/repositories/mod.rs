//! Repository implementations for all Roster entities.

pub mod audit;
pub mod permission;
pub mod role;
pub mod store;
pub mod user;

pub use audit::AuditRepository;
pub use permission::PermissionRepository;
pub use role::RoleRepository;
pub use store::{AuditStore, UserStore};
pub use user::UserRepository;
