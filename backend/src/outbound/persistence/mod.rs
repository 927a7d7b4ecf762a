//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here are thin translators between Diesel row structs and
//! domain types. Row structs (`models.rs`) and table definitions (`schema.rs`)
//! stay private to this module. Uniqueness is enforced by database
//! constraints and reported through the ports' `UniqueViolation` variants.
//!
//! # Example
//!
//! ```no_run
//! use conduit::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/conduit")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_article_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
