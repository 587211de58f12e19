//! AWS integration for alert delivery and archive uploads.
//!
//! Each AWS API the crate calls sits behind a small trait so the alerting
//! and upload logic never touches rusoto directly:
//!
//! - [`ses::MailSender`]: one email to one address through SES
//! - [`s3::ObjectStore`]: one object write through S3
//!
//! Clients are built by connectors ([`ses::MailConnector`] and
//! [`s3::StorageConnector`]) from an explicit [`AwsConfig`](crate::config::AwsConfig)
//! holding the region and a static key pair. Nothing is read from the
//! environment or the shared credentials file. [`client::RusotoConnector`] is
//! the production connector for both seams.
//!
//! ```text
//! ┌─────────────────┐                       ┌─────────────────┐
//! │    Notifier     │                       │    S3Adapter    │
//! └────────┬────────┘                       └────────┬────────┘
//!          │ MailConnector                           │ StorageConnector
//!    ┌─────▼──────┐                            ┌─────▼──────┐
//!    │ SesClient  │                            │  S3Client  │
//!    └─────┬──────┘                            └─────┬──────┘
//!          │ SendEmail (one recipient)               │ PutObject
//!    ┌─────▼──────┐                            ┌─────▼──────┐
//!    │    SES     │                            │  S3 Bucket │
//!    └────────────┘                            └────────────┘
//! ```

/// Client construction and the rusoto-backed connector
pub mod client;

/// Object storage seam and its S3 implementation
pub mod s3;

/// Mail-sending seam and its SES implementation
pub mod ses;
