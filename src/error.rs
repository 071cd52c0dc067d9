use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to load plugin `{path}`: {source}")]
    PluginLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("plugin was compiled against libretro API version `{found}`, expected `{expected}`")]
    AbiMismatch { found: u32, expected: u32 },

    #[error("I/O error at `{path}`: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to allocate {what}")]
    Allocation { what: &'static str },

    #[error("plugin reported failure: {what}")]
    PluginReported { what: &'static str },
}
