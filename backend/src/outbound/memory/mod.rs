//! In-memory repositories used when no database URL is configured.
//!
//! State lives for the lifetime of the process.

mod article_repository;
mod user_repository;

pub use article_repository::InMemoryArticleRepository;
pub use user_repository::InMemoryUserRepository;
