use std::fmt;

use serde::Deserialize;

use crate::constants::REDACTED;
use crate::error::{Error, Result};

/// Region and static credentials used to build AWS clients.
///
/// Field names follow the PascalCase JSON used by destination configs:
///
/// ```json
/// { "Region": "us-east-1", "AccessKeyId": "AKIA...", "SecretAccessKey": "..." }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl AwsConfig {
    pub fn new(region: &str, access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            region: region.to_string(),
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        }
    }

    /// True when both halves of the static credential pair are present
    pub fn has_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    /// Check region and credentials for presence, reporting the first blank field.
    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(Error::MissingField("an AWS region"));
        }
        if self.access_key_id.is_empty() {
            return Err(Error::MissingField("an AWS access key"));
        }
        if self.secret_access_key.is_empty() {
            return Err(Error::MissingField("an AWS secret access key"));
        }
        Ok(())
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .finish()
    }
}
