pub mod config;

pub use config::{ConfigError, HarnessConfig, SignerOutput, ToolCommand};
