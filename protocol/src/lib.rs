//! Shared protocol types for the placetrack client
//!
//! Split into two layers:
//! - `common`: domain types reused across endpoints (roles, claims, entity
//!   enumerations)
//! - `api`: request/response DTOs organized by endpoint family

pub mod api;
pub mod common;

pub use api::*;
pub use common::*;
