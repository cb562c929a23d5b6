//! Role domain entities.

pub mod model;

pub use model::Role;
