//! `ledgerdesk-core`: domain building blocks shared by every crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::{Entity, Timestamps};
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
pub use value_object::{Money, ValueObject};
