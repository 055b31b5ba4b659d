//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod enrollments;
pub mod error;
pub mod health;
pub mod lessons;
pub mod schemas;
pub mod session;
pub mod state;
pub mod student_self;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
