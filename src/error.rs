use std::path::PathBuf;
use thiserror::Error;

/// Exit status reserved for "no usable default profile" failures.
pub const PROFILE_MATCH_EXIT_CODE: i32 = 89;

#[derive(Debug, Error)]
pub enum Error {
    #[error("environment variable {var} is not set")]
    Configuration { var: &'static str },
    #[error("profile base directory {} not found", path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no directory in {} matches `{pattern}`", base.display())]
    NoProfileMatch { base: PathBuf, pattern: String },
    #[error("directory '{name}' in {} does not match `{pattern}`", base.display())]
    ProfileMismatch {
        name: String,
        base: PathBuf,
        pattern: String,
    },
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NoProfileMatch { .. } | Error::ProfileMismatch { .. } => {
                PROFILE_MATCH_EXIT_CODE
            }
            Error::Configuration { .. } | Error::PathNotFound { .. } => 1,
        }
    }
}

/// Exit status for an error returned from a subcommand.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::exit_code)
        .unwrap_or(1)
}
