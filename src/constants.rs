//! Global constants for archive-notify.
//!
//! This module centralizes the hardcoded names and defaults shared by the
//! alerting and upload paths.

// Destination constants
/// Destination type handled by the S3 adapter
pub const S3_ADAPTER_TYPE: &str = "S3";

/// Object name prefix used after the set name when a set does not supply one
pub const DEFAULT_OBJECT_NAME_PREFIX: &str = "data_";

// Service names used in client errors
/// Service label for the object storage client
pub const S3_SERVICE: &str = "S3";

/// Service label for the mail-sending client
pub const SES_SERVICE: &str = "SES";

// Alerting constants
/// Separator used when listing failed recipients in the summary line
pub const RECIPIENT_SEPARATOR: &str = ", ";

/// Placeholder printed in place of secrets in `Debug` output
pub const REDACTED: &str = "<redacted>";
