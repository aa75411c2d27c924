// cmdrun Core - Domain, Ports & Runner Service
// NO process or terminal dependencies: adapters live in infra-system

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::CommandService;
pub use config::RunnerConfig;
pub use error::{ConfigError, Result, RunError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
