//! Engine load errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup failure: the game cannot run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The game-data file could not be read.
    #[error("failed to read WAD file {path:?}: {source}")]
    Wad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The embedded engine failed to instantiate or crashed during startup.
    #[error("engine failed to initialize: {0}")]
    Engine(String),
}
