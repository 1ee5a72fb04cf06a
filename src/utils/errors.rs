use std::io;
use thiserror::Error;

use crate::config::ConfigError;

/// Startup-time failures. The tick loop itself never fails: transport
/// errors are skipped tick by tick and malformed frames are dropped.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
