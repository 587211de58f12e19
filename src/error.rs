use thiserror::Error;

/// Errors produced by the alerting and archive upload paths.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration field was blank or absent
    #[error("config is missing {0}")]
    MissingField(&'static str),

    /// Configuration JSON could not be parsed
    #[error("error reading destination config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Per-set configuration JSON could not be parsed
    #[error("error reading config for archive set '{set}': {source}")]
    InvalidSetConfig {
        set: String,
        #[source]
        source: serde_json::Error,
    },

    /// No adapter is registered for the destination type
    #[error("unknown destination type '{0}'")]
    UnknownDestination(String),

    /// Alerting was requested without AWS credentials
    #[error("AWS credentials not provided for email alerts")]
    MissingCredentials,

    /// An authenticated API client could not be built
    #[error("error initializing {service} client: {reason}")]
    ClientInit {
        service: &'static str,
        reason: String,
    },

    /// A single alert email was rejected
    #[error("error sending email to {recipient}: {reason}")]
    Send { recipient: String, reason: String },

    /// The storage backend rejected an object write
    #[error("error saving data to {bucket}/{key}: {reason}")]
    Upload {
        bucket: String,
        key: String,
        reason: String,
    },

    /// The wall clock is outside the range of nanosecond timestamps
    #[error("system clock is out of range for a nanosecond timestamp")]
    Timestamp,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a client initialization error from a seam failure.
    pub fn client_init(service: &'static str, err: anyhow::Error) -> Self {
        Error::ClientInit {
            service,
            reason: format!("{:#}", err),
        }
    }
}
