//! Business logic services
//!
//! Services borrow a [`ServiceContext`] for the duration of one operation.

pub mod auth;
pub mod context;
pub mod error;
pub mod game;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use game::GameService;
