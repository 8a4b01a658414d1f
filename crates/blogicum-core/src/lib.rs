//! # Blogicum Core
//!
//! The domain layer of Blogicum.
//! This crate contains the blog's business rules (who sees which post, how
//! listings are paginated, how forms are validated) with zero infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod query;
pub mod service;
pub mod visibility;

pub use error::DomainError;
pub use service::BlogService;
