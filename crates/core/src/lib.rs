// Queue Board Core - Configuration Resolution, Discovery & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use config::AppConfig;
pub use error::{AppError, Result};
