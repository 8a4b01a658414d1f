//! # Blogicum Shared
//!
//! Wire types of the Blogicum HTTP API: request bodies, the JSON page
//! models rendered by the server and problem-details errors.

pub mod dto;
pub mod pages;
pub mod response;

pub use response::ErrorResponse;
