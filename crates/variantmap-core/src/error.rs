// Variantmap Errors
// Crate-level error wrapping the per-module errors

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::generator::GenerateError;
use crate::mapping::TableError;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type MapResult<T> = Result<T, MapError>;
