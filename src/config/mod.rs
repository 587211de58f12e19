// Re-export all items from the submodules
mod aws_config;
mod destination_config;

pub use aws_config::AwsConfig;
pub use destination_config::DestinationConfig;
