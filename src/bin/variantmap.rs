// Variantmap CLI
// Generates keyboard rules-file symbols sections from layout mapping tables

use std::path::PathBuf;

use clap::Parser;

use variantmap_core::{check_tables, run_job, Config, Destination, GenerationRequest, Job, Want};

/// Layout mapping table to rules-file converter
#[derive(Parser, Debug)]
#[command(name = "variantmap")]
#[command(author = "variantmap contributors")]
#[command(version)]
#[command(about = "Convert layout mapping tables into rules-file symbols sections", long_about = None)]
struct Args {
    /// Kind of rules to generate: mls or mlvs
    #[arg(long, value_name = "WANT", required_unless_present = "config")]
    want: Option<Want>,

    /// Layout index the rules apply to (0 means none)
    #[arg(long, value_name = "N")]
    number: Option<u32>,

    /// Do not write the section header
    #[arg(long)]
    no_header: bool,

    /// TOML manifest listing jobs to run instead of the positional job
    #[arg(short, long, value_name = "CONFIG", conflicts_with_all = ["want", "number", "no_header"])]
    config: Option<PathBuf>,

    /// Validate the mapping tables and exit without writing
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Output file, or "-" for standard output
    #[arg(value_name = "DEST", required_unless_present = "config")]
    dest: Option<String>,

    /// Mapping tables, processed in order
    #[arg(value_name = "FILES", required_unless_present = "config")]
    files: Vec<PathBuf>,
}

/// Build the list of jobs to run from the arguments
fn resolve_jobs(args: &Args) -> Result<Vec<Job>, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = args.config {
        let config = Config::from_toml_path(config_path)?;
        return Ok(config.jobs);
    }

    let want = args.want.ok_or("--want is required when not using --config")?;
    let dest = args
        .dest
        .as_deref()
        .ok_or("DEST is required when not using --config")?;
    if args.files.is_empty() {
        return Err("at least one mapping file is required".into());
    }

    let mut job = Job::new(
        GenerationRequest::new(want, args.number),
        Destination::parse(dest),
        args.files.clone(),
    );
    job.header = !args.no_header;
    Ok(vec![job])
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let jobs = resolve_jobs(&args)?;

    for job in &jobs {
        let section = job.request.generator().section_name();
        if args.check {
            let checked = check_tables(&job.files, job.request)?;
            println!("{}: {} mapping(s) valid", section, checked);
        } else {
            let written = run_job(job)?;
            log::info!("{}: wrote {} mapping(s) to {}", section, written, job.dest);
        }
    }

    Ok(())
}
