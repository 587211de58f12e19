//! Security utilities.
//!
//! This module keeps AWS credential material out of log lines and event
//! log records.

pub mod credential_scrubber;

pub use credential_scrubber::{safe_error_message, scrub_credentials, scrub_with_config};
