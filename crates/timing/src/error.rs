use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the export surface. Timing and allocation tracking never fail.
#[derive(Debug, Error)]
pub enum ProfError {
    #[error("can't open {path:?} for writing: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing profile to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProfError>;
