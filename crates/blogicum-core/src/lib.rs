//! # Blogicum Core
//!
//! The domain layer of the Blogicum publishing service: entities, the
//! visibility and access policy, pagination, ports and use cases.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::DomainError;
