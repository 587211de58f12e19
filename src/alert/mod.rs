//! Email alerts for failed archive runs.
//!
//! Alerts go out through SES one recipient at a time. Each address gets its
//! own request, so a malformed or rejected address only loses that one
//! delivery. Alerting never returns an error to the caller: problems are
//! logged and the calling pipeline carries on.
//!
//! ## Usage
//!
//! ```no_run
//! use archive_notify::alert::{send_email, AlertConfig};
//!
//! # async fn example() {
//! let config = AlertConfig {
//!     aws_region: "us-east-1".to_string(),
//!     char_set: "UTF-8".to_string(),
//!     return_to_addr: "archiver@example.org".to_string(),
//!     subject_text: "Archive run failed".to_string(),
//!     recipient_emails: vec!["ops@example.org".to_string()],
//!     aws_access_key_id: "AKID".to_string(),
//!     aws_secret_access_key: "SECRET".to_string(),
//! };
//!
//! send_email(&config, "set 'orders' could not be read").await;
//! # }
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::cloud::client::RusotoConnector;
use crate::cloud::ses::{MailConnector, MailSender};
use crate::config::AwsConfig;
use crate::constants::{RECIPIENT_SEPARATOR, REDACTED, SES_SERVICE};
use crate::error::{Error, Result};
use crate::security::{safe_error_message, scrub_with_config};

mod message;

pub use message::{EmailMessage, MessageContent};

/// Settings for one alert.
///
/// Deserializes from the PascalCase JSON used by archiver configs. Missing
/// fields are left blank.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    #[serde(rename = "AWSRegion")]
    pub aws_region: String,

    #[serde(rename = "CharSet")]
    pub char_set: String,

    #[serde(rename = "ReturnToAddr")]
    pub return_to_addr: String,

    #[serde(rename = "SubjectText")]
    pub subject_text: String,

    #[serde(rename = "RecipientEmails")]
    pub recipient_emails: Vec<String>,

    #[serde(rename = "AWSAccessKeyID")]
    pub aws_access_key_id: String,

    #[serde(rename = "AWSSecretAccessKey")]
    pub aws_secret_access_key: String,
}

impl AlertConfig {
    /// Region and credentials for the SES client
    pub fn aws_config(&self) -> AwsConfig {
        AwsConfig::new(
            &self.aws_region,
            &self.aws_access_key_id,
            &self.aws_secret_access_key,
        )
    }
}

impl fmt::Debug for AlertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertConfig")
            .field("aws_region", &self.aws_region)
            .field("char_set", &self.char_set)
            .field("return_to_addr", &self.return_to_addr)
            .field("subject_text", &self.subject_text)
            .field("recipient_emails", &self.recipient_emails)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &REDACTED)
            .finish()
    }
}

/// A delivered alert and the identifier SES assigned to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentAlert {
    pub recipient: String,
    pub message_id: String,
}

/// Outcome of one fan-out over the recipient list.
///
/// Every failed address is recorded, but only the most recent error is
/// kept. Earlier errors are dropped so that the summary stays one line.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub sent: Vec<SentAlert>,
    pub failed_recipients: Vec<String>,
    pub last_error: Option<Error>,
}

impl DeliveryReport {
    /// True when every recipient accepted the alert
    pub fn is_success(&self) -> bool {
        self.failed_recipients.is_empty()
    }

    /// The consolidated failure line, or `None` when nothing failed.
    pub fn summary(&self, from: &str) -> Option<String> {
        let last_error = self.last_error.as_ref()?;
        Some(format!(
            "Error sending email from '{}' to '{}': {}",
            from,
            self.failed_recipients.join(RECIPIENT_SEPARATOR),
            last_error
        ))
    }
}

/// Sends alert emails, holding on to its mail client between alerts.
///
/// The client is rebuilt only when the region or credentials change.
pub struct Notifier {
    connector: Arc<dyn MailConnector>,
    client: Mutex<Option<(AwsConfig, Arc<dyn MailSender>)>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Create a notifier backed by SES
    pub fn new() -> Self {
        Self::with_connector(Arc::new(RusotoConnector))
    }

    /// Create a notifier that obtains its mail client from `connector`
    pub fn with_connector(connector: Arc<dyn MailConnector>) -> Self {
        Self {
            connector,
            client: Mutex::new(None),
        }
    }

    /// Send `body` to every recipient in `config`, logging any failure.
    ///
    /// This never fails. Missing credentials produce a warning and no
    /// network traffic. A client that cannot be built aborts the alert.
    /// Failed recipients are reported in a single error line quoting the
    /// last error seen.
    pub async fn send(&self, config: &AlertConfig, body: &str) {
        let aws = config.aws_config();

        match self.deliver(config, body).await {
            Ok(report) => {
                if let Some(summary) = report.summary(&config.return_to_addr) {
                    error!("{}", scrub_with_config(&summary, &aws));
                }
            }
            Err(Error::MissingCredentials) => {
                warn!("AWS credentials not provided for email alerts");
            }
            Err(e) => {
                error!("error loading AWS config: {}", safe_error_message(&e, &aws));
            }
        }
    }

    /// Deliver `body` to each recipient in turn and report what happened.
    ///
    /// Fails only on the preconditions: blank credentials
    /// ([`Error::MissingCredentials`]) or an unusable client
    /// ([`Error::ClientInit`]). Per-recipient failures land in the report.
    pub async fn deliver(&self, config: &AlertConfig, body: &str) -> Result<DeliveryReport> {
        let aws = config.aws_config();
        if !aws.has_credentials() {
            return Err(Error::MissingCredentials);
        }

        let sender = self.mail_sender(&aws)?;
        let message = EmailMessage::new(&config.char_set, &config.subject_text, body);
        let mut report = DeliveryReport::default();

        // Sequential on purpose: failures stay attributable and the provider
        // never sees a burst
        for recipient in &config.recipient_emails {
            match sender
                .send_email(&config.return_to_addr, recipient, &message)
                .await
            {
                Ok(message_id) => {
                    info!("alert message sent to {}, message ID: {}", recipient, message_id);
                    report.sent.push(SentAlert {
                        recipient: recipient.clone(),
                        message_id,
                    });
                }
                Err(e) => {
                    debug!("alert to {} failed", recipient);
                    report.failed_recipients.push(recipient.clone());
                    report.last_error = Some(Error::Send {
                        recipient: recipient.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Reuse the cached client when it was built for the same settings
    fn mail_sender(&self, aws: &AwsConfig) -> Result<Arc<dyn MailSender>> {
        let mut cached = self.client.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((settings, sender)) = cached.as_ref() {
            if settings == aws {
                return Ok(Arc::clone(sender));
            }
        }

        let sender = self
            .connector
            .mail_sender(aws)
            .map_err(|e| Error::client_init(SES_SERVICE, e))?;
        *cached = Some((aws.clone(), Arc::clone(&sender)));

        Ok(sender)
    }
}

/// Send an alert through SES with a one-off notifier.
///
/// See [`Notifier::send`] for the failure behavior.
pub async fn send_email(config: &AlertConfig, body: &str) {
    Notifier::new().send(config, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::ses::{MockMailConnector, MockMailSender};
    use anyhow::anyhow;
    use log::Level;

    /// Records log output per thread so parallel tests see only their own lines
    mod captured_log {
        use std::cell::RefCell;
        use std::sync::Once;

        use log::{Level, LevelFilter, Log, Metadata, Record};

        thread_local! {
            static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
        }

        struct CapturingLogger;

        impl Log for CapturingLogger {
            fn enabled(&self, _metadata: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                RECORDS.with(|records| {
                    records
                        .borrow_mut()
                        .push((record.level(), record.args().to_string()))
                });
            }

            fn flush(&self) {}
        }

        static LOGGER: CapturingLogger = CapturingLogger;
        static INSTALL: Once = Once::new();

        /// Install the logger once and clear this thread's records
        pub fn start() {
            INSTALL.call_once(|| {
                log::set_logger(&LOGGER).expect("no other logger in unit tests");
                log::set_max_level(LevelFilter::Trace);
            });
            RECORDS.with(|records| records.borrow_mut().clear());
        }

        /// Messages logged on this thread at exactly `level`
        pub fn at(level: Level) -> Vec<String> {
            RECORDS.with(|records| {
                records
                    .borrow()
                    .iter()
                    .filter(|(l, _)| *l == level)
                    .map(|(_, message)| message.clone())
                    .collect()
            })
        }
    }

    fn alert_config(recipients: &[&str]) -> AlertConfig {
        AlertConfig {
            aws_region: "us-east-1".to_string(),
            char_set: "UTF-8".to_string(),
            return_to_addr: "archiver@example.org".to_string(),
            subject_text: "Archive failed".to_string(),
            recipient_emails: recipients.iter().map(|r| r.to_string()).collect(),
            aws_access_key_id: "AKID".to_string(),
            aws_secret_access_key: "SECRET".to_string(),
        }
    }

    fn connector_with(sender: MockMailSender) -> MockMailConnector {
        let mut connector = MockMailConnector::new();
        connector
            .expect_mail_sender()
            .times(1)
            .return_once(move |_| Ok(Arc::new(sender) as Arc<dyn MailSender>));
        connector
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_client() {
        let mut connector = MockMailConnector::new();
        connector.expect_mail_sender().times(0);
        let notifier = Notifier::with_connector(Arc::new(connector));

        let mut config = alert_config(&["ops@example.org"]);
        config.aws_secret_access_key.clear();

        let result = notifier.deliver(&config, "body").await;
        assert!(matches!(result, Err(Error::MissingCredentials)));

        // send swallows the same condition
        notifier.send(&config, "body").await;
    }

    #[tokio::test]
    async fn test_client_init_failure_aborts() {
        let mut connector = MockMailConnector::new();
        connector
            .expect_mail_sender()
            .returning(|_| Err(anyhow!("invalid AWS region 'nowhere'")));
        let notifier = Notifier::with_connector(Arc::new(connector));

        let result = notifier.deliver(&alert_config(&["ops@example.org"]), "body").await;
        match result {
            Err(Error::ClientInit { service, reason }) => {
                assert_eq!(service, "SES");
                assert!(reason.contains("nowhere"));
            }
            other => panic!("expected ClientInit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_request_per_recipient() {
        let mut sender = MockMailSender::new();
        sender
            .expect_send_email()
            .times(3)
            .returning(|from, to, message| {
                assert_eq!(from, "archiver@example.org");
                assert_eq!(message.subject.data, "Archive failed");
                assert_eq!(message.body.data, "run failed");
                Ok(format!("id-{}", to))
            });
        let notifier = Notifier::with_connector(Arc::new(connector_with(sender)));

        let config = alert_config(&["a@example.org", "b@example.org", "c@example.org"]);
        let report = notifier.deliver(&config, "run failed").await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.sent.len(), 3);
        assert_eq!(report.sent[1].recipient, "b@example.org");
        assert_eq!(report.sent[1].message_id, "id-b@example.org");
        assert!(report.summary("archiver@example.org").is_none());
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_fan_out() {
        let mut sender = MockMailSender::new();
        sender.expect_send_email().times(4).returning(|_, to, _| {
            if to.starts_with("bad") {
                Err(anyhow!("rejected {}", to))
            } else {
                Ok("msg-1".to_string())
            }
        });
        let notifier = Notifier::with_connector(Arc::new(connector_with(sender)));

        let config = alert_config(&[
            "bad1@example.org",
            "ok@example.org",
            "bad2@example.org",
            "ok2@example.org",
        ]);
        let report = notifier.deliver(&config, "body").await.unwrap();

        assert_eq!(report.sent.len(), 2);
        assert_eq!(
            report.failed_recipients,
            vec!["bad1@example.org", "bad2@example.org"]
        );

        let summary = report.summary("archiver@example.org").unwrap();
        assert_eq!(
            summary,
            "Error sending email from 'archiver@example.org' to 'bad1@example.org, bad2@example.org': \
             error sending email to bad2@example.org: rejected bad2@example.org"
        );
        assert!(!summary.contains("rejected bad1"));
    }

    #[tokio::test]
    async fn test_empty_recipient_list() {
        let mut sender = MockMailSender::new();
        sender.expect_send_email().times(0);
        let notifier = Notifier::with_connector(Arc::new(connector_with(sender)));

        let report = notifier.deliver(&alert_config(&[]), "body").await.unwrap();
        assert!(report.sent.is_empty());
        assert!(report.summary("archiver@example.org").is_none());
    }

    #[tokio::test]
    async fn test_client_reused_for_same_settings() {
        let mut sender = MockMailSender::new();
        sender
            .expect_send_email()
            .times(2)
            .returning(|_, _, _| Ok("id".to_string()));
        let notifier = Notifier::with_connector(Arc::new(connector_with(sender)));

        let config = alert_config(&["ops@example.org"]);
        notifier.deliver(&config, "first").await.unwrap();
        notifier.deliver(&config, "second").await.unwrap();
    }

    #[tokio::test]
    async fn test_client_rebuilt_when_credentials_change() {
        let mut connector = MockMailConnector::new();
        connector.expect_mail_sender().times(2).returning(|_| {
            let mut sender = MockMailSender::new();
            sender
                .expect_send_email()
                .returning(|_, _, _| Ok("id".to_string()));
            Ok(Arc::new(sender) as Arc<dyn MailSender>)
        });
        let notifier = Notifier::with_connector(Arc::new(connector));

        let mut config = alert_config(&["ops@example.org"]);
        notifier.deliver(&config, "first").await.unwrap();

        config.aws_access_key_id = "AKID2".to_string();
        notifier.deliver(&config, "second").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_logs_one_summary_for_failures() {
        let mut sender = MockMailSender::new();
        sender.expect_send_email().times(3).returning(|_, to, _| {
            if to.starts_with("bad") {
                Err(anyhow!("rejected {}", to))
            } else {
                Ok("msg-1".to_string())
            }
        });
        let notifier = Notifier::with_connector(Arc::new(connector_with(sender)));
        let config = alert_config(&["bad1@example.org", "ok@example.org", "bad2@example.org"]);

        captured_log::start();
        notifier.send(&config, "body").await;

        assert_eq!(
            captured_log::at(Level::Error),
            vec![
                "Error sending email from 'archiver@example.org' to 'bad1@example.org, bad2@example.org': \
                 error sending email to bad2@example.org: rejected bad2@example.org"
                    .to_string()
            ]
        );
        assert_eq!(
            captured_log::at(Level::Info),
            vec!["alert message sent to ok@example.org, message ID: msg-1".to_string()]
        );
        assert!(captured_log::at(Level::Warn).is_empty());
    }

    #[tokio::test]
    async fn test_send_logs_no_error_for_empty_recipients() {
        let mut sender = MockMailSender::new();
        sender.expect_send_email().times(0);
        let notifier = Notifier::with_connector(Arc::new(connector_with(sender)));

        captured_log::start();
        notifier.send(&alert_config(&[]), "body").await;

        assert!(captured_log::at(Level::Error).is_empty());
        assert!(captured_log::at(Level::Warn).is_empty());
    }

    #[tokio::test]
    async fn test_send_warns_once_without_credentials() {
        let mut connector = MockMailConnector::new();
        connector.expect_mail_sender().times(0);
        let notifier = Notifier::with_connector(Arc::new(connector));

        let mut config = alert_config(&["ops@example.org"]);
        config.aws_access_key_id.clear();

        captured_log::start();
        notifier.send(&config, "body").await;

        assert_eq!(
            captured_log::at(Level::Warn),
            vec!["AWS credentials not provided for email alerts".to_string()]
        );
        assert!(captured_log::at(Level::Error).is_empty());
    }

    #[tokio::test]
    async fn test_send_logs_client_init_failure() {
        let mut connector = MockMailConnector::new();
        connector
            .expect_mail_sender()
            .times(1)
            .returning(|_| Err(anyhow!("invalid AWS region 'nowhere'")));
        let notifier = Notifier::with_connector(Arc::new(connector));

        captured_log::start();
        notifier.send(&alert_config(&["ops@example.org"]), "body").await;

        let errors = captured_log::at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("error loading AWS config"));
        assert!(errors[0].contains("nowhere"));
        assert!(captured_log::at(Level::Warn).is_empty());
    }

    #[test]
    fn test_alert_config_from_json() {
        let config: AlertConfig = serde_json::from_str(
            r#"{
                "AWSRegion": "us-east-1",
                "CharSet": "UTF-8",
                "ReturnToAddr": "archiver@example.org",
                "SubjectText": "Archive failed",
                "RecipientEmails": ["a@example.org", "b@example.org"],
                "AWSAccessKeyID": "AKID",
                "AWSSecretAccessKey": "SECRET"
            }"#,
        )
        .unwrap();

        assert_eq!(config.recipient_emails.len(), 2);
        assert_eq!(config.aws_config(), AwsConfig::new("us-east-1", "AKID", "SECRET"));
        assert!(!format!("{:?}", config).contains("SECRET"));
    }
}
