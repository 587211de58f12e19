use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusoto_ses::{Destination as SesDestination, SendEmailRequest, Ses, SesClient};

use crate::alert::EmailMessage;
use crate::config::AwsConfig;

/// A mail-sending API that delivers one message to one address per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send `message` from `from` to the single address `to`.
    ///
    /// Returns the provider-assigned message identifier.
    async fn send_email(&self, from: &str, to: &str, message: &EmailMessage) -> Result<String>;
}

/// Builds an authenticated [`MailSender`] from region and credentials.
#[cfg_attr(test, mockall::automock)]
pub trait MailConnector: Send + Sync {
    fn mail_sender(&self, aws: &AwsConfig) -> Result<Arc<dyn MailSender>>;
}

#[async_trait]
impl MailSender for SesClient {
    async fn send_email(&self, from: &str, to: &str, message: &EmailMessage) -> Result<String> {
        let request = SendEmailRequest {
            destination: SesDestination {
                to_addresses: Some(vec![to.to_string()]),
                ..Default::default()
            },
            message: message.to_ses_message(),
            source: from.to_string(),
            ..Default::default()
        };

        let response = Ses::send_email(self, request)
            .await
            .context("SendEmail request failed")?;

        Ok(response.message_id)
    }
}
