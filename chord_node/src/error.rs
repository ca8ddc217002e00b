use thiserror::Error;

/// Non-RPC-shaped failures: join, lookup, and startup validation.
///
/// RPC handlers still speak `tonic::Status` directly (see `service.rs`) since
/// that's the vocabulary their callers expect; this type is for internal
/// operations that don't have a `Status` to return but do have a caller who
/// needs to distinguish failure modes.
#[derive(Error, Debug)]
pub enum ChordError {
    #[error("bootstrap peer {address} unreachable: {source}")]
    BootstrapUnreachable {
        address: String,
        #[source]
        source: tonic::Status,
    },

    #[error("lookup for id {id} exceeded step bound of {bound}")]
    LookupStepBoundExceeded { id: String, bound: u32 },

    #[error("transport error contacting {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: tonic::Status,
    },

    #[error("invalid id override {0:?}: must be exactly 40 hex characters")]
    InvalidIdOverride(String),

    #[error("invalid argument: {0}")]
    ArgValidation(String),
}

pub type ChordResult<T> = Result<T, ChordError>;

impl From<ChordError> for tonic::Status {
    fn from(err: ChordError) -> Self {
        match err {
            ChordError::LookupStepBoundExceeded { .. } => {
                tonic::Status::deadline_exceeded(err.to_string())
            }
            ChordError::BootstrapUnreachable { .. } | ChordError::Transport { .. } => {
                tonic::Status::unavailable(err.to_string())
            }
            ChordError::InvalidIdOverride(_) | ChordError::ArgValidation(_) => {
                tonic::Status::invalid_argument(err.to_string())
            }
        }
    }
}
