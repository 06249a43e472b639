pub mod config;
pub mod deploy;
pub mod error;
pub mod models;
pub mod storage;
pub mod terminal;
pub mod upload;

pub use deploy::{DeployPlan, DeployReport};
pub use error::{DeployError, Result};
