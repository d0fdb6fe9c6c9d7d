//! # Patrol Shared
//!
//! Wire types of the GeeksPatrol HTTP API.
//! Kept free of server dependencies so clients (ingestion bots, the admin UI) can reuse them.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, Empty, ErrorResponse};
