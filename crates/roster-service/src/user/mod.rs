//! User management services.

pub mod admin;
pub mod replay;

pub use admin::AdminUserService;
pub use replay::ReplayService;
