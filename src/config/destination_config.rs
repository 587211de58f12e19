use serde::Deserialize;
use serde_json::Value;

/// Configuration envelope shared by every destination adapter.
///
/// `adapter_type` selects the adapter and `adapter_config` carries the
/// adapter-specific settings, left as raw JSON until the adapter reads it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    #[serde(rename = "Type")]
    pub adapter_type: String,

    #[serde(rename = "AdapterConfig")]
    pub adapter_config: Value,
}

impl DestinationConfig {
    pub fn new(adapter_type: &str, adapter_config: Value) -> Self {
        Self {
            adapter_type: adapter_type.to_string(),
            adapter_config,
        }
    }
}
