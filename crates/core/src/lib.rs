//! `billgen-core` — identifiers and the error model shared by every crate.
//!
//! Pure building blocks: no IO, no HTTP, no async.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, ValidationError};
pub use id::{BillId, ProductId};
pub use value_object::ValueObject;
