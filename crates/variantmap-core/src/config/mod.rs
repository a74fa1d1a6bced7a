// Variantmap Config API
// Job manifests describing several generation runs

pub mod parser;

pub use parser::{Config, ConfigError, JobToml, ManifestToml};
