//! # SQLite Storage Module
//!
//! Repositories for the two relational entities, sharing one pooled
//! [`DbConnection`](crate::db::DbConnection). Each repository call is a single
//! short-lived statement; the services never span transactions across calls.
//!
//! Constraint violations are translated here into domain errors: the
//! `unique_collection` constraint becomes `DomainError::DuplicateEntry` and a
//! foreign-key failure on `customer_code` becomes `DomainError::NotFound`.

pub mod collection_repository;
pub mod customer_repository;

pub use collection_repository::{CollectionRepository, NewCollection};
pub use customer_repository::CustomerRepository;
