// Variantmap Core Library
// Turns layout mapping tables into keyboard rules-file symbols sections

pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod mapping;
pub mod pipeline;

pub use config::{Config, ConfigError};
pub use error::{MapError, MapResult};
pub use generator::{
    render_to_string, write_table, GenerateError, GenerationRequest, Generator, LayoutIndex, Want,
};
pub use layout::{split_compact, LayoutToken, TokenError, TokenShape};
pub use mapping::{
    parse_line, read_table, read_table_from, strip_comment, LineError, MappingPair, MappingTable,
    TableError,
};
pub use pipeline::{check_tables, map_variants, run_job, Destination, Job};
