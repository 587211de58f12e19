use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc::Sender;

use crate::cloud::client::RusotoConnector;
use crate::cloud::s3::StorageConnector;
use crate::config::{AwsConfig, DestinationConfig};
use crate::constants::{DEFAULT_OBJECT_NAME_PREFIX, S3_SERVICE};
use crate::destination::{Destination, EventLogItem};
use crate::error::{Error, Result};
use crate::security::safe_error_message;

/// Adapter-specific settings read from `DestinationConfig::adapter_config`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct S3Config {
    #[serde(rename = "AwsConfig")]
    pub aws_config: AwsConfig,

    #[serde(rename = "BucketName")]
    pub bucket_name: String,
}

/// Settings that differ for each archive set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct S3Set {
    #[serde(rename = "ObjectNamePrefix")]
    pub object_name_prefix: String,
}

/// Archive destination that stores each write as a new S3 object.
///
/// Object keys are the set's prefix followed by the wall clock in
/// nanoseconds since the Unix epoch, e.g. `orders/data_1718000000123456789`.
/// Nothing checks for collisions.
pub struct S3Adapter {
    destination_config: DestinationConfig,
    s3_config: S3Config,
    s3_set: S3Set,
    connector: Arc<dyn StorageConnector>,
}

impl S3Adapter {
    /// Build an adapter that writes through rusoto's S3 client.
    ///
    /// Fails before any network call if the bucket name, region, access key
    /// or secret key is blank.
    pub fn configure(destination_config: DestinationConfig) -> Result<Self> {
        Self::with_connector(destination_config, Arc::new(RusotoConnector))
    }

    /// Build an adapter that obtains its storage client from `connector`
    pub fn with_connector(
        destination_config: DestinationConfig,
        connector: Arc<dyn StorageConnector>,
    ) -> Result<Self> {
        let s3_config = read_config(&destination_config.adapter_config)?;

        Ok(Self {
            destination_config,
            s3_config,
            s3_set: S3Set::default(),
            connector,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.s3_config.bucket_name
    }

    pub fn object_name_prefix(&self) -> &str {
        &self.s3_set.object_name_prefix
    }

    pub fn destination_config(&self) -> &DestinationConfig {
        &self.destination_config
    }

    /// Upload `data` under `key`, building a fresh client for the call
    async fn save_object(&self, data: &[u8], key: &str) -> Result<()> {
        let bucket = &self.s3_config.bucket_name;

        let store = self
            .connector
            .object_store(&self.s3_config.aws_config)
            .map_err(|e| Error::client_init(S3_SERVICE, e))?;

        store
            .write_object(bucket, key, data.to_vec())
            .await
            .map_err(|e| Error::Upload {
                bucket: bucket.clone(),
                key: key.to_string(),
                reason: format!("{:#}", e),
            })
    }
}

#[async_trait]
impl Destination for S3Adapter {
    fn for_set(&mut self, set_name: &str, set_config: &str) -> Result<()> {
        let mut s3_set: S3Set =
            serde_json::from_str(set_config).map_err(|source| Error::InvalidSetConfig {
                set: set_name.to_string(),
                source,
            })?;

        if s3_set.object_name_prefix.is_empty() {
            s3_set.object_name_prefix = format!("{}/{}", set_name, DEFAULT_OBJECT_NAME_PREFIX);
        }

        debug!(
            "Archive set '{}' writes to s3://{}/{}*",
            set_name, self.s3_config.bucket_name, s3_set.object_name_prefix
        );
        self.s3_set = s3_set;
        Ok(())
    }

    async fn write(&self, data: &[u8], event_log: &Sender<EventLogItem>) -> Result<()> {
        let result = match object_key(&self.s3_set.object_name_prefix) {
            Ok(key) => self.save_object(data, &key).await.map(|_| key),
            Err(e) => Err(e),
        };

        match result {
            Ok(key) => {
                emit(
                    event_log,
                    EventLogItem::info(format!(
                        "saved to {} on bucket {}",
                        key, self.s3_config.bucket_name
                    )),
                )
                .await;
                Ok(())
            }
            Err(e) => {
                let message = safe_error_message(&e, &self.s3_config.aws_config);
                emit(event_log, EventLogItem::alert(format!("error saving to S3: {}", message)))
                    .await;
                Err(e)
            }
        }
    }
}

/// Parse and check the adapter settings, reporting the first blank field
fn read_config(adapter_config: &Value) -> Result<S3Config> {
    let config = S3Config::deserialize(adapter_config)?;

    if config.bucket_name.is_empty() {
        return Err(Error::MissingField("an S3 bucket name"));
    }
    config.aws_config.validate()?;

    Ok(config)
}

/// Object key for a write happening now
fn object_key(prefix: &str) -> Result<String> {
    let nanos = Utc::now().timestamp_nanos_opt().ok_or(Error::Timestamp)?;
    Ok(format!("{}{}", prefix, nanos))
}

async fn emit(event_log: &Sender<EventLogItem>, item: EventLogItem) {
    if let Err(e) = event_log.send(item).await {
        warn!("Event log channel closed, dropping record: {}", e.0);
    }
}
