//! Hero Foundry rules engine.
//!
//! Host-facing layer over `herofoundry-domain`.
//!
//! ## Structure
//!
//! - `engine` - `RulesEngine` facade, the single entry point for callers
//! - `config` - settings from `.env` files and environment variables
//! - `infrastructure/` - port traits and adapters (clock, content probe)
//! - `logging` - tracing subscriber setup

pub mod config;
pub mod engine;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use config::{load_dotenv, EngineSettings};
pub use engine::{RulesEngine, SharedProbe};
pub use error::EngineError;
pub use infrastructure::clock::SystemClock;
pub use infrastructure::content_probe::FsContentProbe;
pub use infrastructure::ports::ClockPort;
pub use logging::init_tracing;
