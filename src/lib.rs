//! # archive-notify
//!
//! Operational glue for a data archiver running on AWS: email alerts through
//! SES and archive uploads to S3.
//!
//! ## Overview
//!
//! The crate has two independent pieces:
//!
//! - **Alert notifier** ([`alert`]): sends a rendered failure message to a list
//!   of recipients, one SES request per address. Failures are logged and never
//!   returned, so alerting cannot take down the pipeline that called it.
//! - **Archive uploader** ([`destination`]): writes each payload to a new,
//!   timestamp-named object in an S3 bucket. It returns the outcome and also
//!   pushes a severity-tagged record onto the caller's event log channel.
//!
//! All AWS access goes through small traits in [`cloud`], so tests and
//! embedders can substitute their own clients and credentials.
//!
//! ## Usage
//!
//! ### Sending an alert
//!
//! ```no_run
//! use archive_notify::alert::{AlertConfig, Notifier};
//!
//! # async fn example(config: AlertConfig) {
//! let notifier = Notifier::new();
//! notifier.send(&config, "archive set 'orders' failed: timeout").await;
//! # }
//! ```
//!
//! ### Writing an archive
//!
//! ```no_run
//! use archive_notify::destination::{Destination, S3Adapter};
//! use archive_notify::config::DestinationConfig;
//! use tokio::sync::mpsc;
//!
//! # async fn example(config: DestinationConfig) -> archive_notify::Result<()> {
//! let mut adapter = S3Adapter::configure(config)?;
//! adapter.for_set("orders", "{}")?;
//!
//! let (tx, _rx) = mpsc::channel(16);
//! adapter.write(b"payload", &tx).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Logging
//!
//! The crate only emits through the `log` facade. An embedder without a
//! logger of its own calls [`logging::initialize_logging`] once at startup,
//! and can hand its event log receiver to [`logging::drain_event_log`] so
//! upload records reach the same output.
//!
//! ```no_run
//! use archive_notify::logging::{drain_event_log, initialize_logging};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! initialize_logging(false)?;
//!
//! let (tx, rx) = mpsc::channel(16);
//! tokio::spawn(drain_event_log(rx));
//! # drop(tx);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`alert`]: alert configuration, message building and per-recipient delivery
//! - [`destination`]: the destination trait, event log records and the S3 adapter
//! - [`cloud`]: AWS client seams and their rusoto implementations
//! - [`config`]: shared AWS and destination configuration
//! - [`security`]: credential scrubbing for logged text
//! - [`logging`]: terminal logger setup and event log forwarding
//! - [`constants`]: shared names and defaults

/// Email alerts through SES
pub mod alert;

/// AWS client seams (SES, S3)
pub mod cloud;

/// Configuration shared by the alerting and upload paths
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Archive destinations and event log records
pub mod destination;

/// Crate error type
pub mod error;

/// Logger setup and event log forwarding
pub mod logging;

/// Security utilities for credential protection
pub mod security;

pub use error::{Error, Result};
