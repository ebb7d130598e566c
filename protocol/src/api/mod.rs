//! API DTOs module
//!
//! This module contains all API data transfer objects organized by domain:
//! - `auth`: Authentication, profile and user management
//! - `placement`: Students, companies, placement progress, stages and events

pub mod auth;
pub mod placement;

pub use auth::*;
pub use placement::*;
