// Variantmap Pipeline
// Reads each mapping table in order and renders it to a single output

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{MapError, MapResult};
use crate::generator::{write_table, GenerateError, GenerationRequest};
use crate::mapping::read_table;

/// Value of a destination argument that means standard output
pub const STDOUT_SENTINEL: &str = "-";

/// Where generated rules go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Interpret a destination argument, `-` being standard output
    pub fn parse(value: &str) -> Self {
        if value == STDOUT_SENTINEL {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(value))
        }
    }

    /// Open the destination for writing, truncating files
    pub fn open(&self) -> MapResult<Box<dyn Write>> {
        match self {
            Destination::Stdout => Ok(Box::new(io::stdout().lock())),
            Destination::File(path) => {
                let file = File::create(path).map_err(|source| MapError::Output {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A single generation run: which rules, from which tables, to where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub request: GenerationRequest,
    pub dest: Destination,
    pub files: Vec<PathBuf>,
    /// Emit the header before the first table
    pub header: bool,
}

impl Job {
    pub fn new(request: GenerationRequest, dest: Destination, files: Vec<PathBuf>) -> Self {
        Self {
            request,
            dest,
            files,
            header: true,
        }
    }
}

/// Render every table in `files` to `dest`
///
/// The header (when `header` is set) is written once, before the first
/// table, so several tables form one section. Stops at the first error.
/// Returns the number of pairs written.
pub fn map_variants<W, P>(
    dest: &mut W,
    files: &[P],
    request: GenerationRequest,
    header: bool,
) -> MapResult<usize>
where
    W: Write + ?Sized,
    P: AsRef<Path>,
{
    let generator = request.generator();
    let mut written = 0;

    for (idx, path) in files.iter().enumerate() {
        let table = read_table(path)?;
        write_table(dest, &table, generator, header && idx == 0)?;
        written += table.len();
    }

    dest.flush().map_err(GenerateError::from)?;
    Ok(written)
}

/// Read every table and check it against the requested generator
///
/// Nothing is written. Returns the number of pairs checked.
pub fn check_tables<P: AsRef<Path>>(files: &[P], request: GenerationRequest) -> MapResult<usize> {
    let generator = request.generator();
    let mut checked = 0;

    for path in files {
        let table = read_table(path)?;
        for pair in &table {
            generator.check(pair)?;
        }
        log::debug!(
            "{}: {} mapping(s) valid for {}",
            path.as_ref().display(),
            table.len(),
            generator.section_name()
        );
        checked += table.len();
    }

    Ok(checked)
}

/// Open the job's destination and run it
///
/// The output is closed on every path; lines written before a failing
/// pair are kept.
pub fn run_job(job: &Job) -> MapResult<usize> {
    log::debug!(
        "running {} job with {} table(s) into {}",
        job.request.generator().section_name(),
        job.files.len(),
        job.dest
    );

    let mut out = job.dest.open()?;
    map_variants(&mut out, &job.files, job.request, job.header)
}
