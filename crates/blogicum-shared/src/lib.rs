//! # Blogicum Shared
//!
//! Wire types of the HTTP API. Kept free of server dependencies so that
//! clients can compile against the same definitions.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, RedirectResponse};
