//! Data models for users and stored documents.

pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
