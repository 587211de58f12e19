//! Archive destinations.
//!
//! A destination is anywhere an archive run can put its data. The archiver
//! configures one from a [`DestinationConfig`], points it at an archive set
//! with [`Destination::for_set`], then hands it payloads through
//! [`Destination::write`]. Each write reports its outcome twice: as the
//! returned `Result`, for flow control, and as an [`EventLogItem`] pushed to
//! the caller's channel, for the audit trail.
//!
//! ## Usage Example
//!
//! ```no_run
//! use archive_notify::config::DestinationConfig;
//! use archive_notify::destination::{new_destination, Destination};
//! use serde_json::json;
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> archive_notify::Result<()> {
//! let config = DestinationConfig::new("S3", json!({
//!     "BucketName": "archive-bucket",
//!     "AwsConfig": {
//!         "Region": "us-east-1",
//!         "AccessKeyId": "AKID",
//!         "SecretAccessKey": "SECRET"
//!     }
//! }));
//!
//! let mut destination = new_destination(config)?;
//! destination.for_set("orders", "{}")?;
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! destination.write(b"[{\"id\": 1}]", &tx).await?;
//! println!("{}", rx.recv().await.unwrap());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::cloud::s3::StorageConnector;
use crate::config::DestinationConfig;
use crate::constants::S3_ADAPTER_TYPE;
use crate::error::{Error, Result};

mod event_log;
pub mod s3;

pub use event_log::{EventLogItem, Severity};
pub use s3::{S3Adapter, S3Config, S3Set};

/// A place archived data can be written.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Apply the per-set settings in `set_config` (a JSON object) for `set_name`.
    fn for_set(&mut self, set_name: &str, set_config: &str) -> Result<()>;

    /// Store `data`, push one outcome record to `event_log` and return the outcome.
    async fn write(&self, data: &[u8], event_log: &Sender<EventLogItem>) -> Result<()>;
}

/// Build the destination adapter named by `config.adapter_type`.
pub fn new_destination(config: DestinationConfig) -> Result<Box<dyn Destination>> {
    if config.adapter_type.eq_ignore_ascii_case(S3_ADAPTER_TYPE) {
        Ok(Box::new(S3Adapter::configure(config)?))
    } else {
        Err(Error::UnknownDestination(config.adapter_type))
    }
}

/// Like [`new_destination`], with storage clients built by `connector`.
pub fn new_destination_with(
    config: DestinationConfig,
    connector: Arc<dyn StorageConnector>,
) -> Result<Box<dyn Destination>> {
    if config.adapter_type.eq_ignore_ascii_case(S3_ADAPTER_TYPE) {
        Ok(Box::new(S3Adapter::with_connector(config, connector)?))
    } else {
        Err(Error::UnknownDestination(config.adapter_type))
    }
}
