pub mod config;
pub mod error;

pub use config::{load_dotenv, EngineConfig};
pub use error::*;
