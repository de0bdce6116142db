pub mod auth;
pub mod config;
mod constructors;
pub mod controllers;
pub mod entities;
pub mod error;
pub(crate) mod interactors;
pub mod presenters;
pub(crate) mod repositories;
pub mod session;
pub mod usecases;
pub(crate) mod utils;

pub use auth::{Claims, PasswordService, TokenService};
pub use config::{Config, Environment};
pub use constructors::*;
pub use controllers::{router, AppState};
pub use error::AppError;
pub use session::{SessionContext, SessionUser};
