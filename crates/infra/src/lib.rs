//! Infrastructure layer: record storage, the ledger store, view projections
//! and sample data.

pub mod projections;
pub mod repository;
pub mod seed;
pub mod store;


pub use repository::{InMemoryRepository, Repository};
pub use seed::seed_sample_data;
pub use store::{LedgerStore, Repositories};
