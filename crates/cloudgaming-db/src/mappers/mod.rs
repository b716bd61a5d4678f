//! Model to entity mappers
//!
//! Rows are parsed back into domain types; a row the domain cannot represent
//! (unknown status, invalid stored email) surfaces as `DomainError::DatabaseError`.

mod account;
mod game;

pub use account::AccountInsert;
