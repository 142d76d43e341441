//! Storage layer for the keyword notification service.
//!
//! Provides the unit of work and repository abstractions together with the
//! PostgreSQL implementation used in production and an in-memory
//! implementation used in tests.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod unit_of_work;

pub use error::{Result, StorageError};
pub use memory::InMemoryUnitOfWork;
pub use postgres::PostgresUnitOfWork;
pub use repository::ChannelRepository;
pub use unit_of_work::{ChannelTx, UnitOfWork};
