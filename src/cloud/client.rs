use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::debug;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::StaticProvider;
use rusoto_s3::S3Client;
use rusoto_ses::SesClient;

use crate::cloud::s3::{ObjectStore, StorageConnector};
use crate::cloud::ses::{MailConnector, MailSender};
use crate::config::AwsConfig;

/// Parse an AWS region name.
///
/// Unknown names are an error rather than a silent fallback to the default
/// region, so a typo cannot send data to the wrong place.
pub fn parse_region(name: &str) -> Result<Region> {
    name.parse::<Region>()
        .map_err(|e| anyhow!("invalid AWS region '{}': {}", name, e))
}

/// Static credentials built from the configured key pair
fn static_credentials(aws: &AwsConfig) -> StaticProvider {
    StaticProvider::new_minimal(aws.access_key_id.clone(), aws.secret_access_key.clone())
}

/// Create an S3 client for the configured region and static credentials
pub fn create_s3_client(aws: &AwsConfig) -> Result<S3Client> {
    let region = parse_region(&aws.region)?;
    let http_client = HttpClient::new().context("Failed to create HTTP client")?;

    debug!("Creating S3 client in region {}", region.name());
    Ok(S3Client::new_with(http_client, static_credentials(aws), region))
}

/// Create an SES client for the configured region and static credentials
pub fn create_ses_client(aws: &AwsConfig) -> Result<SesClient> {
    let region = parse_region(&aws.region)?;
    let http_client = HttpClient::new().context("Failed to create HTTP client")?;

    debug!("Creating SES client in region {}", region.name());
    Ok(SesClient::new_with(http_client, static_credentials(aws), region))
}

/// Builds real rusoto clients for both the mail and storage seams.
#[derive(Clone, Copy, Debug, Default)]
pub struct RusotoConnector;

impl StorageConnector for RusotoConnector {
    fn object_store(&self, aws: &AwsConfig) -> Result<Arc<dyn ObjectStore>> {
        Ok(Arc::new(create_s3_client(aws)?))
    }
}

impl MailConnector for RusotoConnector {
    fn mail_sender(&self, aws: &AwsConfig) -> Result<Arc<dyn MailSender>> {
        Ok(Arc::new(create_ses_client(aws)?))
    }
}
