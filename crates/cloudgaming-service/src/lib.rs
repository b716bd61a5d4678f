//! # cloudgaming-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    AuthResponse, GameResponse, HealthChecks, HealthResponse, LoginRequest, MeResponse,
    ReadinessResponse, RegisterRequest,
};
pub use services::{
    AuthService, GameService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
