use std::path::PathBuf;

use crate::Platform;

/// Errors raised while resolving a library set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unrecognized platform: {0}")]
    UnknownPlatform(String),

    #[error("unrecognized build configuration: {0}")]
    UnknownConfiguration(String),

    #[error("unrecognized policy: {0}")]
    UnknownPolicy(String),

    #[error("no prebuilt libraries are available for {platform}")]
    UnsupportedPlatform { platform: Platform },

    #[error("invalid library name: {0:?}")]
    InvalidLibraryName(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("no module named {0:?} in manifest")]
    UnknownModule(String),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid module manifest")]
    Manifest(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
