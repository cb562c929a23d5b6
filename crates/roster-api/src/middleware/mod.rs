//! Tower layers and request guards.

pub mod compression;
pub mod cors;
pub mod rbac;
