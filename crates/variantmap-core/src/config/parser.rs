// Variantmap Config Parser - TOML with Serde
// Parses job manifests from TOML files

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::generator::{GenerateError, GenerationRequest, Want};
use crate::pipeline::{Destination, Job};

/// Manifest parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid job: {0}")]
    InvalidJob(String),
}

/// Root TOML table of a manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestToml {
    /// Jobs, run in file order
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobToml>,
}

/// One `[[job]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobToml {
    /// "mls" or "mlvs"
    pub want: String,

    /// Layout index; absent or 0 means none
    pub number: Option<u32>,

    /// Output path, or "-" for standard output
    pub dest: String,

    /// Mapping tables, in order
    pub files: Vec<PathBuf>,

    /// Emit the header before the first table
    #[serde(default = "default_header")]
    pub header: bool,
}

fn default_header() -> bool {
    true
}

/// Parsed manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub jobs: Vec<Job>,
}

impl Config {
    /// Load a manifest file; relative paths resolve against its directory
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_in(&content, base_dir)
    }

    /// Parse a manifest with paths taken as written
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml_in(content, Path::new(""))
    }

    /// Parse a manifest, resolving relative paths against `base_dir`
    pub fn from_toml_in(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let manifest: ManifestToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        if manifest.jobs.is_empty() {
            return Err(ConfigError::InvalidJob("manifest defines no jobs".to_string()));
        }

        let jobs = manifest
            .jobs
            .into_iter()
            .enumerate()
            .map(|(i, job)| {
                job.into_job(base_dir)
                    .map_err(|e| ConfigError::InvalidJob(format!("job {}: {}", i + 1, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("loaded {} job(s) from manifest", jobs.len());
        Ok(Self { jobs })
    }
}

impl JobToml {
    fn into_job(self, base_dir: &Path) -> Result<Job, String> {
        let want: Want = self.want.parse().map_err(|e: GenerateError| e.to_string())?;

        if self.files.is_empty() {
            return Err("no mapping files listed".to_string());
        }

        let dest = match Destination::parse(&self.dest) {
            Destination::File(path) => Destination::File(base_dir.join(path)),
            Destination::Stdout => Destination::Stdout,
        };

        Ok(Job {
            request: GenerationRequest::new(want, self.number),
            dest,
            files: self.files.iter().map(|f| base_dir.join(f)).collect(),
            header: self.header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, LayoutIndex};

    #[test]
    fn test_parse_manifest() {
        let toml = r#"
[[job]]
want = "mls"
dest = "-"
files = ["layoutMappings.lst"]

[[job]]
want = "mlvs"
number = 2
dest = "out/mlnvn_s.part"
files = ["variantMappings.lst", "extra.lst"]
header = false
"#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.jobs.len(), 2);

        let first = &config.jobs[0];
        assert_eq!(first.request.generator(), Generator::FixedLayout);
        assert_eq!(first.dest, Destination::Stdout);
        assert!(first.header);

        let second = &config.jobs[1];
        assert_eq!(
            second.request.generator(),
            Generator::LayoutVariantIndexed(LayoutIndex::new(2).unwrap())
        );
        assert_eq!(second.dest, Destination::File(PathBuf::from("out/mlnvn_s.part")));
        assert_eq!(second.files.len(), 2);
        assert!(!second.header);
    }

    #[test]
    fn test_zero_number_means_none() {
        let toml = r#"
[[job]]
want = "mls"
number = 0
dest = "-"
files = ["a.lst"]
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.jobs[0].request.index, None);
    }

    #[test]
    fn test_relative_paths_resolve_against_base_dir() {
        let toml = r#"
[[job]]
want = "mls"
dest = "ml_s.part"
files = ["a.lst"]
"#;
        let config = Config::from_toml_in(toml, Path::new("/rules/compat")).unwrap();
        let job = &config.jobs[0];
        assert_eq!(job.dest, Destination::File(PathBuf::from("/rules/compat/ml_s.part")));
        assert_eq!(job.files, vec![PathBuf::from("/rules/compat/a.lst")]);
    }

    #[test]
    fn test_unsupported_want() {
        let toml = r#"
[[job]]
want = "mlnvs"
dest = "-"
files = ["a.lst"]
"#;
        let result = Config::from_toml(toml);
        assert!(matches!(result, Err(ConfigError::InvalidJob(msg)) if msg.contains("mlnvs")));
    }

    #[test]
    fn test_empty_manifest() {
        assert!(matches!(Config::from_toml(""), Err(ConfigError::InvalidJob(_))));
    }

    #[test]
    fn test_job_without_files() {
        let toml = r#"
[[job]]
want = "mls"
dest = "-"
files = []
"#;
        assert!(matches!(Config::from_toml(toml), Err(ConfigError::InvalidJob(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
[[job]]
want = "mls"
dest = "-"
files = ["a.lst"]
colour = "blue"
"#;
        assert!(matches!(Config::from_toml(toml), Err(ConfigError::TomlParse(_))));
    }
}
