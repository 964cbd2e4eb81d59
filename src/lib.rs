#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Contains the authentication core (token service, auth service,"]
#![doc = "middleware), the ownership-scoped task repository, domain models,"]
#![doc = "routing configuration, and error handling. The binary in `main.rs`"]
#![doc = "wires these together into a running server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repo;
pub mod routes;

pub use crate::auth::{AuthService, TokenService};
pub use crate::error::AppError;
pub use crate::repo::TaskRepository;
