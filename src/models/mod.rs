//! Data models for the MovieDB web app.
//!
//! Catalog models match the OMDb JSON shapes so responses deserialize directly.

mod movie;
mod session;

pub use movie::*;
pub use session::*;
