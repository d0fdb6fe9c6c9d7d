//! # Patrol Core
//!
//! The domain layer of the GeeksPatrol backend.
//! Articles, their publication lifecycle and the ports the infrastructure
//! has to implement. No database or HTTP dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
